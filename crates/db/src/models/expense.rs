//! Expense entity model and DTOs.

use flowiq_core::types::{DbId, Money, Timestamp};
use flowiq_core::validation::positive_amount;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

use super::timesheet::default_billable;

/// A row from the `expenses` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: DbId,
    pub project_id: DbId,
    pub description: String,
    pub amount: Money,
    pub billable: bool,
    pub status: String,
    pub submitted_by: DbId,
    #[serde(rename = "date")]
    pub expense_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpense {
    #[validate(length(min = 2, message = "description must be at least 2 characters"))]
    pub description: String,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Money,
    #[serde(default = "default_billable")]
    pub billable: bool,
    pub date: Option<Timestamp>,
}
