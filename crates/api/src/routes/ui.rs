use axum::routing::{get, post};
use axum::Router;

use crate::handlers::ui;
use crate::state::AppState;

/// Routes mounted at `/ui`.
///
/// ```text
/// GET    /profile  -> profile
/// POST   /gate     -> gate
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/profile", get(ui::profile))
        .route("/gate", post(ui::gate))
}
