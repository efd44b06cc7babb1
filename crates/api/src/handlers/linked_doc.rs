use axum::extract::{Path, State};
use axum::http::StatusCode;
use flowiq_core::types::DbId;
use flowiq_db::models::linked_doc::{CreateLinkedDoc, LinkedDoc};
use flowiq_db::repositories::LinkedDocRepo;
use serde::Serialize;

use super::load_scoped_project;
use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::middleware::rbac::{RequireManageBilling, RequirePmDashboard};
use crate::response::{created, ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDocListBody {
    pub linked_docs: Vec<LinkedDoc>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedDocBody {
    pub linked_doc: LinkedDoc,
}

/// GET /pm/projects/{id}/linked-docs
pub async fn list(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<ApiJson<LinkedDocListBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let linked_docs = LinkedDocRepo::list(&state.pool, project_id).await?;
    Ok(ok(LinkedDocListBody { linked_docs }))
}

/// POST /pm/projects/{id}/linked-docs
pub async fn create(
    RequireManageBilling(user): RequireManageBilling,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateLinkedDoc>,
) -> AppResult<(StatusCode, ApiJson<LinkedDocBody>)> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let linked_doc = LinkedDocRepo::create(&state.pool, project_id, &input).await?;
    tracing::info!(project_id, linked_doc_id = linked_doc.id, doc_type = %linked_doc.doc_type, "Document linked");
    Ok(created(LinkedDocBody { linked_doc }))
}
