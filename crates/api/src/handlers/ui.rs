//! Role profile and element gating for the dashboards.

use flowiq_core::gating::{evaluate, GateDecision, GateRule};
use flowiq_core::roles::{Capability, Role};
use flowiq_core::types::DbId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppResult;
use crate::extract::ValidJson;
use crate::middleware::auth::AuthUser;
use crate::response::{ok, ApiJson};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileBody {
    pub user_id: DbId,
    pub role: Role,
    pub capabilities: &'static [Capability],
}

#[derive(Debug, Deserialize, Validate)]
pub struct GateRequest {
    pub elements: Vec<GateRule>,
}

#[derive(Debug, Serialize)]
pub struct ElementDecision {
    pub id: String,
    pub decision: GateDecision,
}

#[derive(Serialize)]
pub struct GateBody {
    pub role: Role,
    pub decisions: Vec<ElementDecision>,
}

/// GET /ui/profile
pub async fn profile(user: AuthUser) -> ApiJson<ProfileBody> {
    ok(ProfileBody {
        user_id: user.user_id,
        role: user.role,
        capabilities: user.role.capabilities(),
    })
}

/// POST /ui/gate
pub async fn gate(
    user: AuthUser,
    ValidJson(request): ValidJson<GateRequest>,
) -> AppResult<ApiJson<GateBody>> {
    let decisions = request
        .elements
        .into_iter()
        .map(|rule| ElementDecision {
            decision: evaluate(user.role, &rule),
            id: rule.id,
        })
        .collect();
    Ok(ok(GateBody {
        role: user.role,
        decisions,
    }))
}
