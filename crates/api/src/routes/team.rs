use axum::routing::{get, post};
use axum::Router;

use crate::handlers::team;
use crate::state::AppState;

/// Routes mounted at `/team`.
///
/// ```text
/// GET    /projects             -> projects (caller is a member)
/// GET    /tasks                -> tasks (assigned to caller)
/// POST   /projects/{id}/tasks  -> create_task (self-assigned)
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/projects", get(team::projects))
        .route("/tasks", get(team::tasks))
        .route("/projects/{id}/tasks", post(team::create_task))
}
