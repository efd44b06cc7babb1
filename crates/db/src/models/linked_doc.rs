//! External documents linked to a project.

use flowiq_core::status::LinkedDocType;
use flowiq_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDoc {
    pub id: DbId,
    pub project_id: DbId,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub ref_id: String,
    pub meta: serde_json::Value,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLinkedDoc {
    #[serde(rename = "type")]
    pub doc_type: LinkedDocType,
    #[validate(length(min = 1, message = "refId must not be empty"))]
    pub ref_id: String,
    #[serde(default)]
    pub meta: serde_json::Map<String, serde_json::Value>,
}
