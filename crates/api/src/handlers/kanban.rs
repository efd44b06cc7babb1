//! Kanban board view and drag-and-drop reorder.

use axum::extract::{Path, State};
use flowiq_core::kanban::group_columns;
use flowiq_core::status::TaskStatus;
use flowiq_core::types::DbId;
use flowiq_db::models::task::{KanbanFilter, ReorderTask, Task};
use flowiq_db::repositories::TaskRepo;
use indexmap::IndexMap;
use serde::Serialize;

use super::load_scoped_project;
use crate::error::AppResult;
use crate::extract::{ApiQuery, ValidJson};
use crate::middleware::rbac::{RequireManageTasks, RequirePmDashboard};
use crate::response::{ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BoardBody {
    /// Column name to tasks, in board order. All five columns are present.
    pub columns: IndexMap<&'static str, Vec<Task>>,
}

#[derive(Serialize)]
pub struct ReorderBody {
    pub task: Task,
}

/// GET /pm/projects/{id}/kanban?q=&assignee=&priority=
pub async fn board(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ApiQuery(filter): ApiQuery<KanbanFilter>,
) -> AppResult<ApiJson<BoardBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let tasks = TaskRepo::list_for_board(&state.pool, project_id, &filter).await?;
    let columns = group_columns(tasks, |task| TaskStatus::parse(&task.status));
    Ok(ok(BoardBody { columns }))
}

/// POST /pm/projects/{id}/kanban/reorder
///
/// 409 when `from` no longer matches the task's stored position.
pub async fn reorder(
    RequireManageTasks(user): RequireManageTasks,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<ReorderTask>,
) -> AppResult<ApiJson<ReorderBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let task = TaskRepo::reorder(&state.pool, project_id, &input, user.user_id).await?;
    Ok(ok(ReorderBody { task }))
}
