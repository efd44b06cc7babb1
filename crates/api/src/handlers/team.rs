//! Team member views: own projects, assigned tasks, self-assigned tasks.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use flowiq_core::error::CoreError;
use flowiq_core::types::DbId;
use flowiq_db::models::project::Project;
use flowiq_db::models::task::{AssignedTask, CreateOwnTask, Task};
use flowiq_db::repositories::{ProjectRepo, TaskRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::rbac::{RequireCreateOwnTasks, RequireTeamWork};
use crate::response::{created, ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct TeamProjectsBody {
    pub projects: Vec<Project>,
}

#[derive(Serialize)]
pub struct AssignedTasksBody {
    pub tasks: Vec<AssignedTask>,
}

#[derive(Serialize)]
pub struct TaskBody {
    pub task: Task,
}

/// GET /team/projects
pub async fn projects(
    RequireTeamWork(user): RequireTeamWork,
    State(state): State<AppState>,
) -> AppResult<ApiJson<TeamProjectsBody>> {
    let projects = ProjectRepo::list_for_member(&state.pool, user.user_id).await?;
    Ok(ok(TeamProjectsBody { projects }))
}

/// GET /team/tasks
pub async fn tasks(
    RequireTeamWork(user): RequireTeamWork,
    State(state): State<AppState>,
) -> AppResult<ApiJson<AssignedTasksBody>> {
    let tasks = TaskRepo::list_assigned(&state.pool, user.user_id).await?;
    Ok(ok(AssignedTasksBody { tasks }))
}

/// POST /team/projects/{id}/tasks
///
/// The task is assigned to the caller and starts in `todo`. The caller must
/// be a member of the project or be able to manage it.
pub async fn create_task(
    RequireCreateOwnTasks(user): RequireCreateOwnTasks,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateOwnTask>,
) -> AppResult<(StatusCode, ApiJson<TaskBody>)> {
    let project = ProjectRepo::find_by_id(&state.pool, project_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", project_id)))?;

    let permitted = user.scope().permits(project.manager_id)
        || ProjectRepo::is_member(&state.pool, project_id, user.user_id).await?;
    if !permitted {
        return Err(AppError::Core(CoreError::Forbidden(
            "Not a member of this project".into(),
        )));
    }

    let input = input.assigned_to(user.user_id);
    let task = TaskRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, task_id = task.id, user_id = user.user_id, "Own task created");
    Ok(created(TaskBody { task }))
}
