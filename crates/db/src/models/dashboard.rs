//! Aggregate shapes returned by the PM and finance dashboards.

use flowiq_core::finance::{FinanceSummary, ProjectRollup};
use flowiq_core::types::{DbId, Money};
use serde::Serialize;
use sqlx::FromRow;

/// Headline numbers of the PM dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PmKpis {
    pub active_projects: i64,
    pub hours_logged: f64,
    pub pending_approvals: i64,
    pub profit_percent: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectProgress {
    pub project_id: DbId,
    pub name: String,
    pub progress: i16,
}

/// Billing-record cost and revenue of one project.
#[derive(Debug, Clone, FromRow, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CostVsRevenue {
    pub project_id: DbId,
    pub name: String,
    pub cost: Money,
    pub revenue: Money,
}

#[derive(Debug, Clone, FromRow)]
pub struct UserHours {
    pub user_id: DbId,
    pub hours: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserUtilization {
    pub user_id: DbId,
    pub hours: f64,
    pub capacity: f64,
    pub utilization: f64,
}

#[derive(Debug, Clone, FromRow, Serialize)]
pub struct VendorSpend {
    pub vendor: String,
    pub amount: Money,
}

/// Response body of `GET /finance/dashboard`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceDashboard {
    #[serde(flatten)]
    pub summary: FinanceSummary,
    pub cost_vs_revenue_by_project: Vec<ProjectRollup>,
    pub vendor_spend: Vec<VendorSpend>,
}
