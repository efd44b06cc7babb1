//! Timesheet entity model and DTOs.

use flowiq_core::types::{DbId, Timestamp};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::Validate;

/// A row from the `timesheets` table.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timesheet {
    pub id: DbId,
    pub project_id: DbId,
    pub task_id: Option<DbId>,
    pub user_id: DbId,
    pub hours: f64,
    pub billable: bool,
    pub note: Option<String>,
    #[serde(rename = "date")]
    pub work_date: Timestamp,
    pub created_at: Timestamp,
}

/// DTO for logging time. `user_id` defaults to the caller.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTimesheet {
    pub task_id: Option<DbId>,
    pub user_id: Option<DbId>,
    #[validate(range(
        exclusive_min = 0.0,
        max = 24.0,
        message = "hours must be greater than 0 and at most 24"
    ))]
    pub hours: f64,
    #[serde(default = "default_billable")]
    pub billable: bool,
    pub note: Option<String>,
    pub date: Option<Timestamp>,
}

pub(crate) fn default_billable() -> bool {
    true
}

/// Total hours one user logged on a project.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MemberHours {
    pub user_id: DbId,
    pub name: String,
    pub hours: f64,
}
