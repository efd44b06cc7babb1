//! Repository for the `expenses` table.

use flowiq_core::status::ExpenseStatus;
use flowiq_core::types::DbId;
use sqlx::PgPool;

use crate::models::expense::{CreateExpense, Expense};

const COLUMNS: &str = "id, project_id, description, amount, billable, status, submitted_by, \
    expense_date, created_at, updated_at";

pub struct ExpenseRepo;

impl ExpenseRepo {
    /// Submit an expense. New expenses are always `pending`.
    pub async fn create(
        pool: &PgPool,
        project_id: DbId,
        submitted_by: DbId,
        input: &CreateExpense,
    ) -> Result<Expense, sqlx::Error> {
        let query = format!(
            "INSERT INTO expenses (project_id, description, amount, billable, submitted_by, expense_date)
             VALUES ($1, $2, $3, $4, $5, COALESCE($6, NOW()))
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(project_id)
            .bind(&input.description)
            .bind(input.amount)
            .bind(input.billable)
            .bind(submitted_by)
            .bind(input.date)
            .fetch_one(pool)
            .await
    }

    pub async fn find_in_project(
        pool: &PgPool,
        project_id: DbId,
        id: DbId,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM expenses WHERE id = $1 AND project_id = $2");
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(project_id)
            .fetch_optional(pool)
            .await
    }

    /// Expenses of a project, newest first.
    pub async fn list(pool: &PgPool, project_id: DbId) -> Result<Vec<Expense>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM expenses WHERE project_id = $1
             ORDER BY expense_date DESC, id DESC"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(project_id)
            .fetch_all(pool)
            .await
    }

    /// Move an expense from `expected` to `target`.
    ///
    /// Returns `None` if the row is no longer in `expected`, i.e. a
    /// concurrent decision won.
    pub async fn update_status(
        pool: &PgPool,
        id: DbId,
        expected: ExpenseStatus,
        target: ExpenseStatus,
    ) -> Result<Option<Expense>, sqlx::Error> {
        let query = format!(
            "UPDATE expenses SET status = $3 WHERE id = $1 AND status = $2 RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Expense>(&query)
            .bind(id)
            .bind(expected.as_str())
            .bind(target.as_str())
            .fetch_optional(pool)
            .await
    }
}
