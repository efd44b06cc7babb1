//! Repository for the `customer_invoices` table.

use flowiq_core::documents::DocumentKind;
use flowiq_core::roles::ProjectScope;
use flowiq_core::status::InvoiceStatus;
use flowiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::customer_invoice::{CreateCustomerInvoice, CustomerInvoice};
use crate::repositories::SequenceRepo;
use crate::scope::{ledger_clause, scope_bind};

const COLUMNS: &str = "id, number, customer, sales_order_id, project_id, amount, status, \
    doc_date, created_at, updated_at";

pub struct CustomerInvoiceRepo;

impl CustomerInvoiceRepo {
    /// Insert a `Draft` invoice with the next `INV-` number.
    pub async fn create(
        pool: &PgPool,
        input: &CreateCustomerInvoice,
    ) -> Result<CustomerInvoice, sqlx::Error> {
        let mut tx = pool.begin().await?;
        let number = SequenceRepo::next_number(&mut tx, DocumentKind::CustomerInvoice).await?;

        let query = format!(
            "INSERT INTO customer_invoices
                (number, customer, sales_order_id, project_id, amount, doc_date)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {COLUMNS}"
        );
        let invoice = sqlx::query_as::<_, CustomerInvoice>(&query)
            .bind(&number)
            .bind(&input.customer)
            .bind(input.sales_order_id)
            .bind(input.project_id)
            .bind(input.amount)
            .bind(input.date)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(invoice)
    }

    pub async fn find_by_id(
        pool: &PgPool,
        id: DbId,
    ) -> Result<Option<CustomerInvoice>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM customer_invoices WHERE id = $1");
        sqlx::query_as::<_, CustomerInvoice>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Documents visible in `scope`, newest first.
    pub async fn list(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<CustomerInvoice>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM customer_invoices WHERE {} ORDER BY created_at DESC, id DESC",
            ledger_clause(1)
        );
        sqlx::query_as::<_, CustomerInvoice>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }

    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: InvoiceStatus,
        target: InvoiceStatus,
    ) -> Result<Option<CustomerInvoice>, sqlx::Error> {
        let query = format!(
            "UPDATE customer_invoices SET status = $3 WHERE id = $1 AND status = $2
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, CustomerInvoice>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(target.as_str())
            .fetch_optional(pool)
            .await
    }
}
