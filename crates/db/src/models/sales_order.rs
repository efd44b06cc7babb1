//! Sales order model and DTOs.

use flowiq_core::types::{DbId, Money, Timestamp};
use flowiq_core::validation::positive_amount;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `sales_orders` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesOrder {
    pub id: DbId,
    pub number: String,
    pub customer: String,
    pub project_id: DbId,
    pub amount: Money,
    pub description: Option<String>,
    pub status: String,
    #[serde(rename = "date")]
    pub doc_date: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateSalesOrder {
    #[validate(length(min = 2, message = "customer must be at least 2 characters"))]
    pub customer: String,
    pub project_id: DbId,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Money,
    pub description: Option<String>,
}
