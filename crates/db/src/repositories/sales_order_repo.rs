//! Repository for the `sales_orders` table.

use flowiq_core::documents::DocumentKind;
use flowiq_core::roles::ProjectScope;
use flowiq_core::status::SalesOrderStatus;
use flowiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::sales_order::{CreateSalesOrder, SalesOrder};
use crate::repositories::SequenceRepo;
use crate::scope::{ledger_clause, scope_bind};

const COLUMNS: &str = "id, number, customer, project_id, amount, description, status, doc_date, \
    created_at, updated_at";

pub struct SalesOrderRepo;

impl SalesOrderRepo {
    /// Insert a `Draft` sales order with the next `SO-` number.
    pub async fn create(
        pool: &PgPool,
        input: &CreateSalesOrder,
    ) -> Result<SalesOrder, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let number = SequenceRepo::next_number(&mut tx, DocumentKind::SalesOrder).await?;

        let query = format!(
            "INSERT INTO sales_orders (number, customer, project_id, amount, description)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        let order = sqlx::query_as::<_, SalesOrder>(&query)
            .bind(&number)
            .bind(&input.customer)
            .bind(input.project_id)
            .bind(input.amount)
            .bind(&input.description)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(order)
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<SalesOrder>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM sales_orders WHERE id = $1");
        sqlx::query_as::<_, SalesOrder>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents visible in `scope`, newest first.
    pub async fn list(pool: &PgPool, scope: ProjectScope) -> Result<Vec<SalesOrder>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM sales_orders WHERE {} ORDER BY created_at DESC, id DESC",
            ledger_clause(1)
        );
        sqlx::query_as::<_, SalesOrder>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }

    /// Set `target` if the order is still in `expected`; `None` otherwise.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: SalesOrderStatus,
        target: SalesOrderStatus,
    ) -> Result<Option<SalesOrder>, sqlx::Error> {
        let query = format!(
            "UPDATE sales_orders SET status = $3 WHERE id = $1 AND status = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, SalesOrder>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(target.as_str())
            .fetch_optional(pool)
            .await
    }
}
