//! Request handlers, one module per resource group.
//!
//! Handlers declare their capability through a `Require*` extractor, load
//! any project through [`load_scoped_project`], and delegate to the
//! repositories in `flowiq_db`.

pub mod billing;
pub mod dashboard;
pub mod expense;
pub mod finance;
pub mod health;
pub mod kanban;
pub mod linked_doc;
pub mod project;
pub mod task;
pub mod team;
pub mod timesheet;
pub mod ui;

use flowiq_core::error::CoreError;
use flowiq_core::types::DbId;
use flowiq_db::models::project::Project;
use flowiq_db::repositories::ProjectRepo;
use sqlx::PgPool;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;

/// Load a live project and check it is inside the caller's scope.
///
/// Missing and soft-deleted projects are 404; projects managed by someone
/// else are 403.
pub async fn load_scoped_project(
    pool: &PgPool,
    user: &AuthUser,
    project_id: DbId,
) -> AppResult<Project> {
    let project = ProjectRepo::find_by_id(pool, project_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Project", project_id)))?;
    user.scope().ensure_permits(project.manager_id)?;
    Ok(project)
}
