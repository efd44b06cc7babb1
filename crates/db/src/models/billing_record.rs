//! Billing ledger lines attached to a project.

use flowiq_core::types::{DbId, Money, Timestamp};
use flowiq_core::validation::positive_amount;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillingRecord {
    pub id: DbId,
    pub project_id: DbId,
    #[serde(rename = "type")]
    pub record_type: String,
    pub amount: Money,
    #[serde(rename = "date")]
    pub record_date: Timestamp,
    pub created_at: Timestamp,
}

/// Body of `POST /pm/projects/{id}/billing/invoice`, which books revenue.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateBillingInvoice {
    #[validate(custom(function = "positive_amount"))]
    pub amount: Money,
    pub date: Option<Timestamp>,
}
