pub mod finance;
pub mod health;
pub mod pm;
pub mod team;
pub mod ui;

use axum::Router;

use crate::state::AppState;

/// Build the authenticated route tree.
///
/// Route hierarchy:
///
/// ```text
/// /pm/...        project manager surface (scoped to managed projects)
/// /team/...      team member surface (own projects and tasks)
/// /finance/...   finance documents and dashboard (unscoped)
/// /ui/...        role profile and element gating
/// ```
///
/// Every handler under these prefixes takes an `AuthUser` or a `Require*`
/// extractor, so a missing or invalid token is 401 before any work is done.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/pm", pm::router())
        .nest("/team", team::router())
        .nest("/finance", finance::router())
        .nest("/ui", ui::router())
}
