//! Finance ledger aggregates over invoices, vendor bills and expenses.
//!
//! Every aggregate takes a ledger scope (see [`ProjectScope::for_ledger`]).
//! An unrestricted scope includes documents of soft-deleted projects.

use flowiq_core::finance::{LedgerTotals, ProjectAmount};
use flowiq_core::roles::ProjectScope;
use flowiq_core::types::{DbId, Money};
use sqlx::PgPool;

use crate::models::dashboard::VendorSpend;
use crate::scope::{ledger_clause, scope_bind};

pub struct LedgerRepo;

impl LedgerRepo {
    pub async fn totals(pool: &PgPool, scope: ProjectScope) -> Result<LedgerTotals, sqlx::Error> {
        let filter = ledger_clause(1);
        let query = format!(
            "SELECT
                (SELECT COALESCE(SUM(amount), 0) FROM customer_invoices
                  WHERE status = 'Paid' AND {filter}),
                (SELECT COALESCE(SUM(amount), 0) FROM customer_invoices
                  WHERE status <> 'Paid' AND {filter}),
                (SELECT COALESCE(SUM(amount), 0) FROM vendor_bills
                  WHERE status = 'Paid' AND {filter}),
                (SELECT COALESCE(SUM(amount), 0) FROM vendor_bills
                  WHERE status <> 'Paid' AND {filter}),
                (SELECT COALESCE(SUM(amount), 0) FROM expenses
                  WHERE status = 'approved' AND {filter})"
        );
        let (paid_invoices, unpaid_invoices, paid_bills, unpaid_bills, approved_expenses) =
            sqlx::query_as::<_, (Money, Money, Money, Money, Money)>(&query)
                .bind(scope_bind(scope))
                .fetch_one(pool)
                .await?;

        Ok(LedgerTotals {
            paid_invoices,
            paid_bills,
            approved_expenses,
            unpaid_invoices,
            unpaid_bills,
        })
    }

    /// Paid invoice revenue grouped by project.
    pub async fn revenue_by_project(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<ProjectAmount>, sqlx::Error> {
        grouped(pool, scope, "customer_invoices", "Paid").await
    }

    /// Paid vendor bill cost grouped by project.
    pub async fn bill_cost_by_project(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<ProjectAmount>, sqlx::Error> {
        grouped(pool, scope, "vendor_bills", "Paid").await
    }

    /// Approved expense cost grouped by project.
    pub async fn expense_cost_by_project(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<ProjectAmount>, sqlx::Error> {
        grouped(pool, scope, "expenses", "approved").await
    }

    /// Bill amounts per vendor, largest first.
    pub async fn vendor_spend(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<VendorSpend>, sqlx::Error> {
        let query = format!(
            "SELECT vendor, SUM(amount) AS amount FROM vendor_bills
             WHERE {}
             GROUP BY vendor ORDER BY amount DESC, vendor",
            ledger_clause(1)
        );
        sqlx::query_as::<_, VendorSpend>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }
}

/// Sum `amount` per project over rows of `table` in `status`.
async fn grouped(
    pool: &PgPool,
    scope: ProjectScope,
    table: &str,
    status: &str,
) -> Result<Vec<ProjectAmount>, sqlx::Error> {
    let query = format!(
        "SELECT project_id, SUM(amount) FROM {table}
         WHERE status = $2 AND {}
         GROUP BY project_id ORDER BY MIN(created_at), project_id",
        ledger_clause(1)
    );
    let rows = sqlx::query_as::<_, (DbId, Money)>(&query)
        .bind(scope_bind(scope))
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows
        .into_iter()
        .map(|(project_id, amount)| ProjectAmount { project_id, amount })
        .collect())
}
