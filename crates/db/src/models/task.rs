//! Task entity model, its history rows, and DTOs.

use flowiq_core::kanban::ColumnPosition;
use flowiq_core::status::{TaskPriority, TaskStatus};
use flowiq_core::types::{DbId, Timestamp};
use flowiq_core::validation::attachment_url;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use validator::{Validate, ValidationError};

/// A row from the `tasks` table. `order` is the position within the
/// task's (project, status) column.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: DbId,
    pub project_id: DbId,
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<DbId>,
    pub priority: String,
    pub status: String,
    #[sqlx(rename = "sort_order")]
    pub order: i32,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// A task assigned to the caller, with its project's name.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTask {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub task: Task,
    pub project_name: String,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskComment {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: DbId,
    pub text: String,
    pub created_at: Timestamp,
}

/// Metadata of a file attached to a task. The file itself lives elsewhere.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskAttachment {
    pub id: DbId,
    pub task_id: DbId,
    pub url: String,
    pub name: String,
    #[serde(rename = "size")]
    pub size_bytes: Option<i64>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
    pub added_by: Option<DbId>,
    pub added_at: Timestamp,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskActivity {
    pub id: DbId,
    pub task_id: DbId,
    pub user_id: Option<DbId>,
    #[serde(rename = "type")]
    pub activity_type: String,
    pub meta: serde_json::Value,
    pub at: Timestamp,
}

/// A task together with its comments, attachments and activity log.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskWithHistory {
    #[serde(flatten)]
    pub task: Task,
    pub comments: Vec<TaskComment>,
    pub attachments: Vec<TaskAttachment>,
    pub activity: Vec<TaskActivity>,
}

/// DTO for creating a task. New tasks are appended to the end of their
/// column.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateTask {
    #[validate(length(min = 2, message = "title must be at least 2 characters"))]
    pub title: String,
    pub description: Option<String>,
    pub assignee_id: Option<DbId>,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub status: TaskStatus,
    pub due_date: Option<Timestamp>,
}

/// DTO for a team member adding a task to one of their projects. The task
/// is assigned to the caller and starts in `todo`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateOwnTask {
    #[validate(length(min = 2, message = "title must be at least 2 characters"))]
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub priority: TaskPriority,
    pub due_date: Option<Timestamp>,
}

impl CreateOwnTask {
    pub fn assigned_to(self, user_id: DbId) -> CreateTask {
        CreateTask {
            title: self.title,
            description: self.description,
            assignee_id: Some(user_id),
            priority: self.priority,
            status: TaskStatus::Todo,
            due_date: self.due_date,
        }
    }
}

/// DTO for a partial task update.
///
/// Position is not editable here: a status change moves the task to the end
/// of its new column, and explicit placement goes through the reorder
/// endpoint.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_update_task"))]
pub struct UpdateTask {
    #[validate(length(min = 2, message = "title must be at least 2 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub assignee_id: Option<DbId>,
    pub priority: Option<TaskPriority>,
    pub status: Option<TaskStatus>,
    pub due_date: Option<Timestamp>,
    pub completed_at: Option<Timestamp>,
}

fn validate_update_task(input: &UpdateTask) -> Result<(), ValidationError> {
    super::require_any(
        input.title.is_some()
            || input.description.is_some()
            || input.assignee_id.is_some()
            || input.priority.is_some()
            || input.status.is_some()
            || input.due_date.is_some()
            || input.completed_at.is_some(),
    )
}

/// Body of `POST /pm/projects/{id}/kanban/reorder`.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ReorderTask {
    pub task_id: DbId,
    #[validate(nested)]
    pub from: ColumnPosition,
    #[validate(nested)]
    pub to: ColumnPosition,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
}

/// Kanban board filters. `q` matches titles case-insensitively.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct KanbanFilter {
    pub q: Option<String>,
    pub assignee: Option<DbId>,
    pub priority: Option<TaskPriority>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateComment {
    #[validate(length(min = 1, message = "text must not be empty"))]
    pub text: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CreateAttachment {
    #[validate(custom(function = "attachment_url"))]
    pub url: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub name: String,
    #[validate(range(min = 0, message = "size must not be negative"))]
    pub size: Option<i64>,
    #[serde(rename = "type")]
    pub content_type: Option<String>,
}
