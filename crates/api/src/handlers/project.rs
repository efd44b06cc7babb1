//! Handlers for `/pm/projects`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use flowiq_core::error::CoreError;
use flowiq_core::finance::derived_progress;
use flowiq_core::roles::Role;
use flowiq_core::types::DbId;
use flowiq_db::models::project::{
    CreateProject, Project, ProjectFilter, ProjectSummary, UpdateProject,
};
use flowiq_db::repositories::{BillingRepo, DashboardRepo, ProjectRepo};
use serde::Serialize;

use super::load_scoped_project;
use crate::error::{AppError, AppResult};
use crate::extract::{ApiQuery, ValidJson};
use crate::middleware::rbac::{RequireManageProjects, RequirePmDashboard};
use crate::response::{created, ok, ApiJson, Deleted, Envelope};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProjectListBody {
    pub projects: Vec<Project>,
}

#[derive(Serialize)]
pub struct ProjectBody {
    pub project: Project,
}

#[derive(Serialize)]
pub struct ProjectDetailBody {
    pub project: Project,
    pub summary: ProjectSummary,
}

/// GET /pm/projects?status=&from=&to=
pub async fn list(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    ApiQuery(filter): ApiQuery<ProjectFilter>,
) -> AppResult<ApiJson<ProjectListBody>> {
    let projects = ProjectRepo::list(&state.pool, user.scope(), &filter).await?;
    Ok(ok(ProjectListBody { projects }))
}

/// POST /pm/projects
///
/// Admins may name any manager. Everyone else manages what they create.
pub async fn create(
    RequireManageProjects(user): RequireManageProjects,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateProject>,
) -> AppResult<(StatusCode, ApiJson<ProjectBody>)> {
    let manager_id = match user.role {
        Role::Admin => input.manager_id.unwrap_or(user.user_id),
        _ => user.user_id,
    };
    let project = ProjectRepo::create(&state.pool, manager_id, &input).await?;
    tracing::info!(project_id = project.id, manager_id, "Project created");
    Ok(created(ProjectBody { project }))
}

/// GET /pm/projects/{id}
pub async fn get_by_id(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<ProjectDetailBody>> {
    let project = load_scoped_project(&state.pool, &user, id).await?;
    let (revenue, cost) = BillingRepo::totals(&state.pool, id).await?;
    let (total, done) = DashboardRepo::task_counts(&state.pool, id).await?;

    let summary = ProjectSummary {
        budget: project.budget,
        revenue,
        cost,
        profit: revenue - cost,
        progress: derived_progress(total, done, project.progress),
    };
    Ok(ok(ProjectDetailBody { project, summary }))
}

/// PATCH /pm/projects/{id}
pub async fn update(
    RequireManageProjects(user): RequireManageProjects,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    ValidJson(input): ValidJson<UpdateProject>,
) -> AppResult<ApiJson<ProjectBody>> {
    load_scoped_project(&state.pool, &user, id).await?;
    let project = ProjectRepo::update(&state.pool, id, &input)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", id)))?;
    tracing::info!(project_id = id, "Project updated");
    Ok(ok(ProjectBody { project }))
}

/// DELETE /pm/projects/{id}
///
/// Soft delete: the row and its dependents stay, but the project drops out
/// of every scoped query.
pub async fn delete(
    RequireManageProjects(user): RequireManageProjects,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<Deleted>> {
    load_scoped_project(&state.pool, &user, id).await?;
    if !ProjectRepo::soft_delete(&state.pool, id).await? {
        return Err(AppError::Core(CoreError::not_found("Project", id)));
    }
    tracing::info!(project_id = id, "Project deleted");
    Ok(Json(
        Envelope::ok(Deleted { deleted: true }).with_message("Project deleted"),
    ))
}
