//! Project entity model and DTOs.

use chrono::NaiveDate;
use flowiq_core::status::ProjectStatus;
use flowiq_core::types::{DbId, Money, Timestamp};
use flowiq_core::validation::non_negative_amount;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A project row, with its member ids gathered from `project_members`.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DbId,
    pub name: String,
    pub description: Option<String>,
    pub client: Option<String>,
    pub budget: Money,
    pub revenue: Money,
    pub cost: Money,
    pub progress: i16,
    pub status: String,
    pub manager_id: DbId,
    pub team_members: Vec<DbId>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a project.
///
/// `manager_id` is only honoured for admins; everyone else manages the
/// projects they create.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateProject {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: String,
    pub description: Option<String>,
    pub client: Option<String>,
    #[validate(custom(function = "non_negative_amount"))]
    #[serde(default)]
    pub budget: Money,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub manager_id: Option<DbId>,
    #[serde(default)]
    pub team_members: Vec<DbId>,
}

/// DTO for a partial project update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_project"))]
pub struct UpdateProject {
    #[validate(length(min = 2, message = "name must be at least 2 characters"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub client: Option<String>,
    #[validate(custom(function = "non_negative_amount"))]
    pub budget: Option<Money>,
    pub start_date: Option<Timestamp>,
    pub end_date: Option<Timestamp>,
    pub deadline: Option<Timestamp>,
    pub status: Option<ProjectStatus>,
    #[validate(range(min = 0, max = 100, message = "progress must be between 0 and 100"))]
    pub progress: Option<i16>,
    #[validate(custom(function = "non_negative_amount"))]
    pub revenue: Option<Money>,
    #[validate(custom(function = "non_negative_amount"))]
    pub cost: Option<Money>,
    pub team_members: Option<Vec<DbId>>,
}

fn validate_update_project(input: &UpdateProject) -> Result<(), ValidationError> {
    super::require_any(
        input.name.is_some()
            || input.description.is_some()
            || input.client.is_some()
            || input.budget.is_some()
            || input.start_date.is_some()
            || input.end_date.is_some()
            || input.deadline.is_some()
            || input.status.is_some()
            || input.progress.is_some()
            || input.revenue.is_some()
            || input.cost.is_some()
            || input.team_members.is_some(),
    )
}

/// Query-string filters for the project list. `from`/`to` bound the
/// deadline, both inclusive.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProjectFilter {
    pub status: Option<ProjectStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

/// Figures shown on the project detail page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    pub budget: Money,
    pub revenue: Money,
    pub cost: Money,
    pub profit: Money,
    pub progress: i16,
}
