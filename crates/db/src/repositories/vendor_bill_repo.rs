//! Repository for the `vendor_bills` table.

use flowiq_core::documents::DocumentKind;
use flowiq_core::roles::ProjectScope;
use flowiq_core::status::VendorBillStatus;
use flowiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::vendor_bill::{CreateVendorBill, VendorBill};
use crate::repositories::SequenceRepo;
use crate::scope::{ledger_clause, scope_bind};

const COLUMNS: &str = "id, number, vendor, purchase_order_id, project_id, amount, status, \
    doc_date, attachment_url, created_at, updated_at";

pub struct VendorBillRepo;

impl VendorBillRepo {
    /// Insert a `Pending` bill with the next `BILL-` number.
    ///
    /// `attachment_url` points at a file the caller has already stored; if
    /// this fails the caller is responsible for removing it.
    pub async fn create(
        pool: &PgPool,
        input: &CreateVendorBill,
        attachment_url: Option<&str>,
    ) -> Result<VendorBill, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let number = SequenceRepo::next_number(&mut tx, DocumentKind::VendorBill).await?;

        let query = format!(
            "INSERT INTO vendor_bills
                (number, vendor, purchase_order_id, project_id, amount, doc_date, attachment_url)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()), $7)
             RETURNING {COLUMNS}"
        );
        let bill = sqlx::query_as::<_, VendorBill>(&query)
            .bind(&number)
            .bind(&input.vendor)
            .bind(input.purchase_order_id)
            .bind(input.project_id)
            .bind(input.amount)
            .bind(input.date)
            .bind(attachment_url)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(bill)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<VendorBill>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM vendor_bills WHERE id = $1");
        sqlx::query_as::<_, VendorBill>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents visible in `scope`, newest first.
    pub async fn list(pool: &PgPool, scope: ProjectScope) -> Result<Vec<VendorBill>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM vendor_bills WHERE {} ORDER BY created_at DESC, id DESC",
            ledger_clause(1)
        );
        sqlx::query_as::<_, VendorBill>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: VendorBillStatus,
        target: VendorBillStatus,
    ) -> Result<Option<VendorBill>, sqlx::Error> {
        let query = format!(
            "UPDATE vendor_bills SET status = $3 WHERE id = $1 AND status = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VendorBill>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(target.as_str())
            .fetch_optional(pool)
            .await
    }
}
