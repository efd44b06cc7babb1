//! Handlers for `/pm/projects/{id}/expenses` and the approval decisions.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use flowiq_core::documents::{check_transition, Transition};
use flowiq_core::error::CoreError;
use flowiq_core::status::{parse_stored, ExpenseStatus};
use flowiq_core::types::DbId;
use flowiq_db::models::expense::{CreateExpense, Expense};
use flowiq_db::repositories::ExpenseRepo;
use serde::Serialize;

use super::load_scoped_project;
use crate::error::{AppError, AppResult};
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::middleware::rbac::{RequireApproveExpenses, RequireManageExpenses, RequirePmDashboard};
use crate::response::{created, ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ExpenseListBody {
    pub expenses: Vec<Expense>,
}

#[derive(Serialize)]
pub struct ExpenseBody {
    pub expense: Expense,
}

/// GET /pm/projects/{id}/expenses
pub async fn list(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<ApiJson<ExpenseListBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let expenses = ExpenseRepo::list(&state.pool, project_id).await?;
    Ok(ok(ExpenseListBody { expenses }))
}

/// POST /pm/projects/{id}/expenses
pub async fn create(
    RequireManageExpenses(user): RequireManageExpenses,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateExpense>,
) -> AppResult<(StatusCode, ApiJson<ExpenseBody>)> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let expense = ExpenseRepo::create(&state.pool, project_id, user.user_id, &input).await?;
    tracing::info!(project_id, expense_id = expense.id, "Expense submitted");
    Ok(created(ExpenseBody { expense }))
}

/// POST /pm/projects/{id}/expenses/{expense_id}/approve
pub async fn approve(
    RequireApproveExpenses(user): RequireApproveExpenses,
    State(state): State<AppState>,
    Path((project_id, expense_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<ExpenseBody>> {
    decide(&state, &user, project_id, expense_id, ExpenseStatus::Approved).await
}

/// POST /pm/projects/{id}/expenses/{expense_id}/reject
pub async fn reject(
    RequireApproveExpenses(user): RequireApproveExpenses,
    State(state): State<AppState>,
    Path((project_id, expense_id)): Path<(DbId, DbId)>,
) -> AppResult<ApiJson<ExpenseBody>> {
    decide(&state, &user, project_id, expense_id, ExpenseStatus::Rejected).await
}

async fn decide(
    state: &AppState,
    user: &AuthUser,
    project_id: DbId,
    expense_id: DbId,
    target: ExpenseStatus,
) -> AppResult<ApiJson<ExpenseBody>> {
    load_scoped_project(&state.pool, user, project_id).await?;
    let expense = ExpenseRepo::find_in_project(&state.pool, project_id, expense_id)
        .await?
        .ok_or_else(|| AppError::Core(CoreError::not_found("Expense", expense_id)))?;

    let current: ExpenseStatus = parse_stored(&expense.status)?;
    if check_transition(current, target)? == Transition::Unchanged {
        return Ok(ok(ExpenseBody { expense }));
    }

    // A concurrent decision changes the stored status and the guarded update misses.
    let expense = ExpenseRepo::update_status(&state.pool, expense_id, current, target)
        .await?
        .ok_or_else(|| {
            AppError::Core(CoreError::Conflict(format!(
                "Expense {expense_id} was modified concurrently"
            )))
        })?;
    tracing::info!(project_id, expense_id, status = %target, "Expense decided");
    Ok(ok(ExpenseBody { expense }))
}
