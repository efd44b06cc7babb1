//! Capability extractors.
//!
//! Each extractor wraps [`AuthUser`] and rejects the request with 403 unless
//! the caller's role holds the named capability. Handlers declare their
//! requirement in the signature:
//!
//! ```ignore
//! async fn reorder(RequireManageTasks(user): RequireManageTasks) -> AppResult<..> { .. }
//! ```

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use flowiq_core::roles::Capability;

use super::auth::AuthUser;
use crate::error::AppError;
use crate::state::AppState;

macro_rules! require_capability {
    ($( $(#[$meta:meta])* $name:ident => $capability:ident ),+ $(,)?) => {
        $(
            $(#[$meta])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name(pub AuthUser);

            impl FromRequestParts<AppState> for $name {
                type Rejection = AppError;

                async fn from_request_parts(
                    parts: &mut Parts,
                    state: &AppState,
                ) -> Result<Self, Self::Rejection> {
                    let user = AuthUser::from_request_parts(parts, state).await?;
                    user.role.authorize(Capability::$capability)?;
                    Ok($name(user))
                }
            }
        )+
    };
}

require_capability! {
    /// PM dashboard, analytics and read access to managed projects.
    RequirePmDashboard => ViewPmDashboard,
    RequireManageProjects => ManageProjects,
    RequireManageTasks => ManageTasks,
    RequireLogTime => LogTime,
    RequireManageExpenses => ManageExpenses,
    RequireApproveExpenses => ApproveExpenses,
    RequireManageBilling => ManageBilling,
    /// Team member views of own projects and assigned tasks.
    RequireTeamWork => ViewTeamWork,
    RequireCreateOwnTasks => CreateOwnTasks,
    RequireViewFinance => ViewFinance,
    /// Create finance documents and advance them short of Paid.
    RequireManageFinance => ManageFinanceDocuments,
    /// Mark finance documents Paid.
    RequireSettleFinance => SettleFinanceDocuments,
}
