//! Scoped aggregates for the PM dashboard, analytics and project detail.

use flowiq_core::roles::ProjectScope;
use flowiq_core::types::{DbId, Money};
use sqlx::PgPool;

use crate::models::dashboard::{CostVsRevenue, ProjectProgress, UserHours};
use crate::scope::{scope_bind, scope_clause};

/// Raw KPI sums before the profit ratio is derived.
#[derive(Debug, Clone, Copy, PartialEq, sqlx::FromRow)]
pub struct KpiTotals {
    pub active_projects: i64,
    pub hours_logged: f64,
    pub pending_approvals: i64,
    pub billed_revenue: Money,
    pub billed_expenses: Money,
}

pub struct DashboardRepo;

impl DashboardRepo {
    pub async fn kpi_totals(pool: &PgPool, scope: ProjectScope) -> Result<KpiTotals, sqlx::Error> {
        let query = format!(
            "WITH scoped AS (SELECT p.id, p.status FROM projects p WHERE {scope})
             SELECT
                (SELECT COUNT(*) FROM scoped WHERE status = 'active') AS active_projects,
                (SELECT COALESCE(SUM(ts.hours), 0)::FLOAT8
                   FROM timesheets ts JOIN scoped s ON s.id = ts.project_id) AS hours_logged,
                (SELECT COUNT(*)
                   FROM expenses e JOIN scoped s ON s.id = e.project_id
                  WHERE e.status = 'pending') AS pending_approvals,
                (SELECT COALESCE(SUM(b.amount), 0)
                   FROM billing_records b JOIN scoped s ON s.id = b.project_id
                  WHERE b.record_type = 'revenue') AS billed_revenue,
                (SELECT COALESCE(SUM(b.amount), 0)
                   FROM billing_records b JOIN scoped s ON s.id = b.project_id
                  WHERE b.record_type = 'expense') AS billed_expenses",
            scope = scope_clause(1),
        );
        sqlx::query_as::<_, KpiTotals>(&query)
            .bind(scope_bind(scope))
            .fetch_one(pool)
            .await
    }

    pub async fn project_progress(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<ProjectProgress>, sqlx::Error> {
        let query = format!(
            "SELECT p.id AS project_id, p.name, p.progress FROM projects p
             WHERE {scope}
             ORDER BY p.created_at, p.id",
            scope = scope_clause(1),
        );
        sqlx::query_as::<_, ProjectProgress>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }

    /// Billing-record cost and revenue per scoped project. Projects without
    /// records report zero.
    pub async fn cost_vs_revenue(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<CostVsRevenue>, sqlx::Error> {
        let query = format!(
            "SELECT p.id AS project_id, p.name,
                    COALESCE(SUM(b.amount) FILTER (WHERE b.record_type = 'expense'), 0) AS cost,
                    COALESCE(SUM(b.amount) FILTER (WHERE b.record_type = 'revenue'), 0) AS revenue
             FROM projects p
             LEFT JOIN billing_records b ON b.project_id = p.id
             WHERE {scope}
             GROUP BY p.id, p.name, p.created_at
             ORDER BY p.created_at, p.id",
            scope = scope_clause(1),
        );
        sqlx::query_as::<_, CostVsRevenue>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }

    /// Hours each user logged on scoped projects.
    pub async fn hours_by_user(
        pool: &PgPool,
        scope: ProjectScope,
    ) -> Result<Vec<UserHours>, sqlx::Error> {
        let query = format!(
            "SELECT ts.user_id, SUM(ts.hours)::FLOAT8 AS hours
             FROM timesheets ts
             JOIN projects p ON p.id = ts.project_id
             WHERE {scope}
             GROUP BY ts.user_id
             ORDER BY ts.user_id",
            scope = scope_clause(1),
        );
        sqlx::query_as::<_, UserHours>(&query)
            .bind(scope_bind(scope))
            .fetch_all(pool)
            .await
    }

    /// `(total, done)` task counts of one project.
    pub async fn task_counts(pool: &PgPool, project_id: DbId) -> Result<(i64, i64), sqlx::Error> {
        sqlx::query_as::<_, (i64, i64)>(
            "SELECT COUNT(*), COUNT(*) FILTER (WHERE status = 'done')
             FROM tasks WHERE project_id = $1",
        )
        .bind(project_id)
        .fetch_one(pool)
        .await
    }
}
