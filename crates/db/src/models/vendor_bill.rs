//! Vendor bill model and DTOs.

use flowiq_core::types::{DbId, Money, Timestamp};
use flowiq_core::validation::positive_amount;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `vendor_bills` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorBill {
    pub id: DbId,
    pub number: String,
    pub vendor: String,
    pub purchase_order_id: Option<DbId>,
    pub project_id: DbId,
    pub amount: Money,
    pub status: String,
    #[serde(rename = "date")]
    pub doc_date: Timestamp,
    /// Public path of the uploaded bill, e.g. `/uploads/bills/<file>`.
    pub attachment_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Fields of the multipart vendor bill form, minus the file.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateVendorBill {
    #[validate(length(min = 2, message = "vendor must be at least 2 characters"))]
    pub vendor: String,
    pub project_id: DbId,
    #[validate(custom(function = "positive_amount"))]
    pub amount: Money,
    pub purchase_order_id: Option<DbId>,
    pub date: Option<Timestamp>,
}
