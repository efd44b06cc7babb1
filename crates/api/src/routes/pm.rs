//! Route definitions for the `/pm` surface.

use axum::routing::{get, patch, post};
use axum::Router;

use crate::handlers::{billing, dashboard, expense, kanban, linked_doc, project, task, timesheet};
use crate::state::AppState;

/// Routes mounted at `/pm`.
///
/// ```text
/// GET    /dashboard                                   -> dashboard
/// GET    /analytics                                   -> analytics
///
/// GET    /projects                                    -> list (?status=&from=&to=)
/// POST   /projects                                    -> create
/// GET    /projects/{id}                               -> get_by_id (with summary)
/// PATCH  /projects/{id}                               -> update
/// DELETE /projects/{id}                               -> delete (soft)
///
/// GET    /projects/{id}/tasks                         -> list (?status=)
/// POST   /projects/{id}/tasks                         -> create
/// PATCH  /projects/{id}/tasks/{task_id}               -> update
/// POST   /projects/{id}/tasks/{task_id}/comments      -> add_comment
/// POST   /projects/{id}/tasks/{task_id}/attachments   -> add_attachment
///
/// GET    /projects/{id}/kanban                        -> board (?q=&assignee=&priority=)
/// POST   /projects/{id}/kanban/reorder                -> reorder
///
/// GET    /projects/{id}/timesheets                    -> list
/// POST   /projects/{id}/timesheets                    -> create
/// GET    /projects/{id}/timesheets/chart              -> chart
///
/// GET    /projects/{id}/expenses                      -> list
/// POST   /projects/{id}/expenses                      -> create
/// POST   /projects/{id}/expenses/{expense_id}/approve -> approve
/// POST   /projects/{id}/expenses/{expense_id}/reject  -> reject
///
/// GET    /projects/{id}/linked-docs                   -> list
/// POST   /projects/{id}/linked-docs                   -> create
///
/// GET    /projects/{id}/billing                       -> list
/// POST   /projects/{id}/billing/invoice               -> invoice
/// ```
pub fn router() -> Router<AppState> {
    let project_routes = Router::new()
        .route("/", get(project::list).post(project::create))
        .route(
            "/{id}",
            get(project::get_by_id)
                .patch(project::update)
                .delete(project::delete),
        )
        .route("/{id}/tasks", get(task::list).post(task::create))
        .route("/{id}/tasks/{task_id}", patch(task::update))
        .route("/{id}/tasks/{task_id}/comments", post(task::add_comment))
        .route(
            "/{id}/tasks/{task_id}/attachments",
            post(task::add_attachment),
        )
        .route("/{id}/kanban", get(kanban::board))
        .route("/{id}/kanban/reorder", post(kanban::reorder))
        .route(
            "/{id}/timesheets",
            get(timesheet::list).post(timesheet::create),
        )
        .route("/{id}/timesheets/chart", get(timesheet::chart))
        .route("/{id}/expenses", get(expense::list).post(expense::create))
        .route(
            "/{id}/expenses/{expense_id}/approve",
            post(expense::approve),
        )
        .route("/{id}/expenses/{expense_id}/reject", post(expense::reject))
        .route(
            "/{id}/linked-docs",
            get(linked_doc::list).post(linked_doc::create),
        )
        .route("/{id}/billing", get(billing::list))
        .route("/{id}/billing/invoice", post(billing::invoice));

    Router::new()
        .route("/dashboard", get(dashboard::dashboard))
        .route("/analytics", get(dashboard::analytics))
        .nest("/projects", project_routes)
}
