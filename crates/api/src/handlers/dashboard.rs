//! PM dashboard KPIs and analytics.

use axum::extract::State;
use flowiq_core::finance::{profit_ratio, utilization, CAPACITY_HOURS};
use flowiq_db::models::dashboard::{CostVsRevenue, PmKpis, ProjectProgress, UserUtilization};
use flowiq_db::repositories::DashboardRepo;
use serde::Serialize;

use crate::error::AppResult;
use crate::middleware::rbac::RequirePmDashboard;
use crate::response::{ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct DashboardBody {
    #[serde(rename = "KPIs")]
    pub kpis: PmKpis,
}

/// GET /pm/dashboard
pub async fn dashboard(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
) -> AppResult<ApiJson<DashboardBody>> {
    let totals = DashboardRepo::kpi_totals(&state.pool, user.scope()).await?;
    let kpis = PmKpis {
        active_projects: totals.active_projects,
        hours_logged: totals.hours_logged,
        pending_approvals: totals.pending_approvals,
        profit_percent: profit_ratio(totals.billed_revenue, totals.billed_expenses),
    };
    Ok(ok(DashboardBody { kpis }))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsBody {
    pub project_progress: Vec<ProjectProgress>,
    pub cost_vs_revenue: Vec<CostVsRevenue>,
    pub utilization: Vec<UserUtilization>,
}

/// GET /pm/analytics
///
/// Utilization counts hours logged on scoped projects only.
pub async fn analytics(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
) -> AppResult<ApiJson<AnalyticsBody>> {
    let scope = user.scope();
    let project_progress = DashboardRepo::project_progress(&state.pool, scope).await?;
    let cost_vs_revenue = DashboardRepo::cost_vs_revenue(&state.pool, scope).await?;
    let per_user = DashboardRepo::hours_by_user(&state.pool, scope)
        .await?
        .into_iter()
        .map(|row| UserUtilization {
            user_id: row.user_id,
            hours: row.hours,
            capacity: CAPACITY_HOURS,
            utilization: utilization(row.hours),
        })
        .collect();

    Ok(ok(AnalyticsBody {
        project_progress,
        cost_vs_revenue,
        utilization: per_user,
    }))
}
