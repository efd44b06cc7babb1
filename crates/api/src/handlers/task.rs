//! Handlers for `/pm/projects/{id}/tasks`, including comments and
//! attachments.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use flowiq_core::error::CoreError;
use flowiq_core::types::DbId;
use flowiq_db::models::task::{
    CreateAttachment, CreateComment, CreateTask, Task, TaskFilter, TaskWithHistory, UpdateTask,
};
use flowiq_db::repositories::TaskRepo;
use serde::Serialize;
use sqlx::PgPool;

use super::load_scoped_project;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidJson};
use crate::middleware::rbac::{RequireManageTasks, RequirePmDashboard};
use crate::response::{created, ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct TaskListBody {
    pub tasks: Vec<Task>,
}

#[derive(Serialize)]
pub struct TaskBody {
    pub task: Task,
}

#[derive(Serialize)]
pub struct TaskHistoryBody {
    pub task: TaskWithHistory,
}

/// GET /pm/projects/{id}/tasks?status=
pub async fn list(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ApiQuery(filter): ApiQuery<TaskFilter>,
) -> AppResult<ApiJson<TaskListBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let tasks = TaskRepo::list(&state.pool, project_id, &filter).await?;
    Ok(ok(TaskListBody { tasks }))
}

/// POST /pm/projects/{id}/tasks
pub async fn create(
    RequireManageTasks(user): RequireManageTasks,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateTask>,
) -> AppResult<(StatusCode, ApiJson<TaskBody>)> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let task = TaskRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, task_id = task.id, "Task created");
    Ok(created(TaskBody { task }))
}

/// PATCH /pm/projects/{id}/tasks/{task_id}
///
/// A status change moves the task to the end of its new column.
pub async fn update(
    RequireManageTasks(user): RequireManageTasks,
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
    ValidJson(input): ValidJson<UpdateTask>,
) -> AppResult<ApiJson<TaskBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let task = TaskRepo::update(&state.pool, project_id, task_id, &input, user.user_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Task", task_id)))?;
    tracing::info!(project_id, task_id, "Task updated");
    Ok(ok(TaskBody { task }))
}

/// POST /pm/projects/{id}/tasks/{task_id}/comments
pub async fn add_comment(
    RequireManageTasks(user): RequireManageTasks,
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
    ValidJson(input): ValidJson<CreateComment>,
) -> AppResult<(StatusCode, ApiJson<TaskHistoryBody>)> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    ensure_task_in_project(&state.pool, project_id, task_id).await?;

    TaskRepo::add_comment(&state.pool, task_id, user.user_id, &input.text).await?;
    let task = with_history(&state.pool, task_id).await?;
    Ok(created(TaskHistoryBody { task }))
}

/// POST /pm/projects/{id}/tasks/{task_id}/attachments
///
/// Records attachment metadata; the file itself lives at `url`.
pub async fn add_attachment(
    RequireManageTasks(user): RequireManageTasks,
    State(state): State<AppState>,
    Path((project_id, task_id)): Path<(DbId, DbId)>,
    ValidJson(input): ValidJson<CreateAttachment>,
) -> AppResult<(StatusCode, ApiJson<TaskHistoryBody>)> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    ensure_task_in_project(&state.pool, project_id, task_id).await?;

    TaskRepo::add_attachment(&state.pool, task_id, user.user_id, &input).await?;
    let task = with_history(&state.pool, task_id).await?;
    Ok(created(TaskHistoryBody { task }))
}

async fn ensure_task_in_project(pool: &PgPool, project_id: DbId, task_id: DbId) -> AppResult<()> {
    TaskRepo::find_in_project(pool, project_id, task_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::Core(CoreError::not_found("Task", task_id)))
}

async fn with_history(pool: &PgPool, task_id: DbId) -> AppResult<TaskWithHistory> {
    TaskRepo::find_with_history(pool, task_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Task", task_id)))
}
