//! Handlers for `/pm/projects/{id}/timesheets`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use flowiq_core::types::DbId;
use flowiq_db::models::timesheet::{CreateTimesheet, MemberHours, Timesheet};
use flowiq_db::repositories::{TaskRepo, TimesheetRepo};
use serde::Serialize;

use super::load_scoped_project;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::rbac::{RequireLogTime, RequirePmDashboard};
use crate::response::{created, ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct TimesheetListBody {
    pub timesheets: Vec<Timesheet>,
}

#[derive(Serialize)]
pub struct TimesheetBody {
    pub timesheet: Timesheet,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartBody {
    pub hours_per_member: Vec<MemberHours>,
}

/// GET /pm/projects/{id}/timesheets
pub async fn list(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<ApiJson<TimesheetListBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let timesheets = TimesheetRepo::list(&state.pool, project_id).await?;
    Ok(ok(TimesheetListBody { timesheets }))
}

/// POST /pm/projects/{id}/timesheets
///
/// Hours are logged for `userId` when given, otherwise for the caller.
/// A `taskId` must belong to the same project.
pub async fn create(
    RequireLogTime(user): RequireLogTime,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateTimesheet>,
) -> AppResult<(StatusCode, ApiJson<TimesheetBody>)> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    if let Some(task_id) = input.task_id {
        if TaskRepo::find_in_project(&state.pool, project_id, task_id)
            .await?
            .is_none()
        {
            return Err(AppError::BadRequest(format!(
                "Task {task_id} does not belong to project {project_id}"
            )));
        }
    }

    let user_id = input.user_id.unwrap_or(user.user_id);
    let timesheet = TimesheetRepo::create(&state.pool, project_id, user_id, &input).await?;
    tracing::info!(project_id, timesheet_id = timesheet.id, hours = timesheet.hours, "Time logged");
    Ok(created(TimesheetBody { timesheet }))
}

/// GET /pm/projects/{id}/timesheets/chart
pub async fn chart(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<ApiJson<ChartBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let hours_per_member = TimesheetRepo::hours_per_member(&state.pool, project_id).await?;
    Ok(ok(ChartBody { hours_per_member }))
}
