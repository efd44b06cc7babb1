//! Financial roll-ups shared by the finance and PM dashboards.

use indexmap::IndexMap;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::types::{DbId, Money};

/// Monthly hours a team member is expected to log.
pub const CAPACITY_HOURS: f64 = 160.0;

/// Hours logged as a fraction of [`CAPACITY_HOURS`], clamped to `[0, 1]`.
pub fn utilization(hours: f64) -> f64 {
    if hours <= 0.0 {
        return 0.0;
    }
    (hours / CAPACITY_HOURS).min(1.0)
}

/// Profit as a fraction of revenue; `0.0` when there is no revenue.
pub fn profit_ratio(revenue: Money, expenses: Money) -> f64 {
    if revenue.is_zero() {
        return 0.0;
    }
    ((revenue - expenses) / revenue).to_f64().unwrap_or(0.0)
}

/// Project progress: share of done tasks when the project has tasks,
/// otherwise the manually recorded value.
pub fn derived_progress(total_tasks: i64, done_tasks: i64, recorded: i16) -> i16 {
    if total_tasks <= 0 {
        return recorded;
    }
    let pct = (done_tasks as f64 / total_tasks as f64 * 100.0).round();
    pct.clamp(0.0, 100.0) as i16
}

/// Raw sums feeding [`FinanceSummary`].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct LedgerTotals {
    pub paid_invoices: Money,
    pub paid_bills: Money,
    pub approved_expenses: Money,
    pub unpaid_invoices: Money,
    pub unpaid_bills: Money,
}

/// Top-line figures of the finance dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinanceSummary {
    pub revenue: Money,
    pub total_cost: Money,
    pub gross_profit: Money,
    pub outstanding_payments: Money,
}

impl LedgerTotals {
    pub fn summarize(&self) -> FinanceSummary {
        let revenue = self.paid_invoices;
        let total_cost = self.paid_bills + self.approved_expenses;
        FinanceSummary {
            revenue,
            total_cost,
            gross_profit: revenue - total_cost,
            outstanding_payments: self.unpaid_invoices + self.unpaid_bills,
        }
    }
}

/// One `(project, sum)` row of a grouped aggregate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectAmount {
    pub project_id: DbId,
    pub amount: Money,
}

/// Per-project cost against revenue.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectRollup {
    pub project_id: DbId,
    pub revenue: Money,
    pub cost: Money,
}

/// Merge grouped revenue and cost aggregates by project.
///
/// Projects appear in first-seen order: revenue rows first, then projects
/// that only have bills, then projects that only have expenses.
pub fn merge_project_rollups(
    revenue: &[ProjectAmount],
    bill_costs: &[ProjectAmount],
    expense_costs: &[ProjectAmount],
) -> Vec<ProjectRollup> {
    let mut merged: IndexMap<DbId, ProjectRollup> = IndexMap::new();

    for row in revenue {
        merged
            .entry(row.project_id)
            .or_insert_with(|| empty_rollup(row.project_id))
            .revenue += row.amount;
    }
    for row in bill_costs.iter().chain(expense_costs) {
        merged
            .entry(row.project_id)
            .or_insert_with(|| empty_rollup(row.project_id))
            .cost += row.amount;
    }

    merged.into_values().collect()
}

fn empty_rollup(project_id: DbId) -> ProjectRollup {
    ProjectRollup {
        project_id,
        revenue: Decimal::ZERO,
        cost: Decimal::ZERO,
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn amt(project_id: DbId, amount: i64) -> ProjectAmount {
        ProjectAmount {
            project_id,
            amount: Decimal::from(amount),
        }
    }

    #[test]
    fn test_summary_from_paid_documents() {
        let totals = LedgerTotals {
            paid_invoices: Decimal::from(100),
            paid_bills: Decimal::from(40),
            approved_expenses: Decimal::from(10),
            ..LedgerTotals::default()
        };
        let summary = totals.summarize();
        assert_eq!(summary.revenue, Decimal::from(100));
        assert_eq!(summary.total_cost, Decimal::from(50));
        assert_eq!(summary.gross_profit, Decimal::from(50));
        assert_eq!(summary.outstanding_payments, Decimal::ZERO);
    }

    #[test]
    fn test_outstanding_adds_unpaid_invoices_and_bills() {
        let totals = LedgerTotals {
            unpaid_invoices: Decimal::from(30),
            unpaid_bills: Decimal::from(12),
            ..LedgerTotals::default()
        };
        assert_eq!(totals.summarize().outstanding_payments, Decimal::from(42));
    }

    #[test]
    fn test_utilization_is_clamped() {
        assert_eq!(utilization(200.0), 1.0);
        assert_eq!(utilization(80.0), 0.5);
        assert_eq!(utilization(0.0), 0.0);
    }

    #[test]
    fn test_profit_ratio() {
        assert_eq!(profit_ratio(Decimal::from(200), Decimal::from(50)), 0.75);
        assert_eq!(profit_ratio(Decimal::ZERO, Decimal::from(50)), 0.0);
    }

    #[test]
    fn test_merge_defaults_missing_sides_to_zero() {
        let merged = merge_project_rollups(
            &[amt(1, 100)],
            &[amt(1, 40), amt(2, 25)],
            &[amt(3, 5), amt(1, 10)],
        );
        assert_eq!(
            merged,
            vec![
                ProjectRollup {
                    project_id: 1,
                    revenue: Decimal::from(100),
                    cost: Decimal::from(50),
                },
                ProjectRollup {
                    project_id: 2,
                    revenue: Decimal::ZERO,
                    cost: Decimal::from(25),
                },
                ProjectRollup {
                    project_id: 3,
                    revenue: Decimal::ZERO,
                    cost: Decimal::from(5),
                },
            ]
        );
    }

    #[test]
    fn test_progress_prefers_task_ratio() {
        assert_eq!(derived_progress(3, 1, 90), 33);
        assert_eq!(derived_progress(3, 2, 0), 67);
        assert_eq!(derived_progress(0, 0, 40), 40);
    }
}
