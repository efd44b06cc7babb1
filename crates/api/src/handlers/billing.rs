//! Project billing ledger.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use flowiq_core::status::BillingRecordType;
use flowiq_core::types::DbId;
use flowiq_db::models::billing_record::{BillingRecord, CreateBillingInvoice};
use flowiq_db::repositories::BillingRepo;
use serde::Serialize;

use super::load_scoped_project;
use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::middleware::rbac::{RequireManageBilling, RequirePmDashboard};
use crate::response::{created, ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct BillingBody {
    pub billing: Vec<BillingRecord>,
}

#[derive(Serialize)]
pub struct RecordBody {
    pub record: BillingRecord,
}

/// GET /pm/projects/{id}/billing
pub async fn list(
    RequirePmDashboard(user): RequirePmDashboard,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
) -> AppResult<ApiJson<BillingBody>> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let billing = BillingRepo::list(&state.pool, project_id).await?;
    Ok(ok(BillingBody { billing }))
}

/// POST /pm/projects/{id}/billing/invoice
///
/// Books a revenue line against the project.
pub async fn invoice(
    RequireManageBilling(user): RequireManageBilling,
    State(state): State<AppState>,
    Path(project_id): Path<DbId>,
    ValidJson(input): ValidJson<CreateBillingInvoice>,
) -> AppResult<(StatusCode, ApiJson<RecordBody>)> {
    load_scoped_project(&state.pool, &user, project_id).await?;
    let record = BillingRepo::create(
        &state.pool,
        project_id,
        BillingRecordType::Revenue,
        input.amount,
        input.date,
    )
    .await?;
    tracing::info!(project_id, record_id = record.id, amount = %record.amount, "Revenue booked");
    Ok(created(RecordBody { record }))
}
