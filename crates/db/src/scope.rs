//! SQL rendering of [`ProjectScope`].
//!
//! Every project-scoped query joins `projects p` and appends the clause
//! produced here, binding [`ProjectScope::manager_filter`] at the given
//! parameter position. Nothing else in the crate builds a manager filter.

use flowiq_core::roles::ProjectScope;
use flowiq_core::types::DbId;

/// `p.deleted_at IS NULL AND ($n::BIGINT IS NULL OR p.manager_id = $n)`.
pub fn scope_clause(param: usize) -> String {
    format!("p.deleted_at IS NULL AND (${param}::BIGINT IS NULL OR p.manager_id = ${param})")
}

/// Filter for tables carrying a `project_id`, used by the finance ledger.
///
/// An unrestricted scope matches every row, including documents booked
/// against soft-deleted projects. A manager scope matches only live
/// projects the manager owns.
pub fn ledger_clause(param: usize) -> String {
    format!(
        "(${param}::BIGINT IS NULL OR project_id IN \
         (SELECT p.id FROM projects p WHERE p.deleted_at IS NULL AND p.manager_id = ${param}))"
    )
}

/// Value to bind at the position passed to [`scope_clause`].
pub fn scope_bind(scope: ProjectScope) -> Option<DbId> {
    scope.manager_filter()
}
