//! Repository for the `purchase_orders` table.

use flowiq_core::documents::DocumentKind;
use flowiq_core::roles::ProjectScope;
use flowiq_core::status::PurchaseOrderStatus;
use flowiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::purchase_order::{CreatePurchaseOrder, PurchaseOrder};
use crate::repositories::SequenceRepo;
use crate::scope::{ledger_clause, scope_bind};

const COLUMNS: &str = "id, number, vendor, project_id, amount, description, status, doc_date, \
    created_at, updated_at";

pub struct PurchaseOrderRepo;

impl PurchaseOrderRepo {
    /// Insert a `Draft` purchase order with the next `PO-` number.
    pub async fn create(
        pool: &PgPool,
        input: &CreatePurchaseOrder,
    ) -> Result<PurchaseOrder, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let number = SequenceRepo::next_number(&mut tx, DocumentKind::PurchaseOrder).await?;

        let query = format!(
            "INSERT INTO purchase_orders (number, vendor, project_id, amount, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, PurchaseOrder>(&query)
            .bind(&number)
            .bind(&input.vendor)
            .bind(input.project_id)
            .bind(input.amount)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<PurchaseOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM purchase_orders WHERE id = $1");
        sqlx::query_as::<_, PurchaseOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents visible in `scope`, newest first.
    pub async fn list(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<PurchaseOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM purchase_orders WHERE {} ORDER BY created_at DESC, id DESC",
            ledger_clause(1)
        );
        sqlx::query_as::<_, PurchaseOrder>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: PurchaseOrderStatus,
        target: PurchaseOrderStatus,
    ) -> Result<Option<PurchaseOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE purchase_orders SET status = $3 WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, PurchaseOrder>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(target.as_str())
            .fetch_optional(pool)
            .await
    }
}
