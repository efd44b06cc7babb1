//! Repository for the `billing_records` table.

use flowiq_core::status::BillingRecordType;
use flowiq_core::types::{DbId, Money, Timestamp};
use sqlx::PgPool;

use crate::models::billing_record::BillingRecord;

const COLUMNS: &str = "id, project_id, record_type, amount, record_date, created_at";

pub struct BillingRepo;

impl BillingRepo {
    /// Book a ledger line. `date` defaults to now.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        record_type: BillingRecordType,
        amount: Money,
        date: Option<Timestamp>,
    ) -> Result<BillingRecord, sqlx::Error> {
        let query = format!(
            "INSERT INTO billing_records (project_id, record_type, amount, record_date)
             VALUES ($1, $2, $3, COALESCE($4, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, BillingRecord>(&query)
            .bind(project_id)
            .bind(record_type.as_str())
            .bind(amount)
            .bind(date)
            .fetch_one(pool)
            .await
    }

    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<BillingRecord>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM billing_records WHERE project_id = $1
             ORDER BY record_date DESC, id DESC"
        );
        sqlx::query_as::<_, BillingRecord>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Total revenue and expense lines of one project.
    pub async fn totals(pool: &PgPool, project_id: DbId) -> Result<(Money, Money), sqlx::Error> {
        sqlx::query_as::<_, (Money, Money)>(
            "SELECT
                COALESCE(SUM(amount) FILTER (WHERE record_type = 'revenue'), 0),
                COALESCE(SUM(amount) FILTER (WHERE record_type = 'expense'), 0)
             FROM billing_records
             WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
