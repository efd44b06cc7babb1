//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use flowiq_core::error::CoreError;
use flowiq_core::roles::{ProjectScope, Role};
use flowiq_core::types::DbId;

use crate::auth::jwt::validate_token;
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated user extracted from a JWT Bearer token in the `Authorization` header.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    /// The user's internal database id (from `claims.sub`).
    pub user_id: DbId,
    pub role: Role,
}

impl AuthUser {
    /// The projects this user may see through the PM surface.
    pub fn scope(&self) -> ProjectScope {
        ProjectScope::for_user(self.user_id, self.role)
    }

    /// The projects whose finance documents this user may see.
    pub fn ledger_scope(&self) -> ProjectScope {
        ProjectScope::for_ledger(self.user_id, self.role)
    }
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let auth_header = parts
            .headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized(
                    "Missing Authorization header".into(),
                ))
            })?;

        let token = auth_header.strip_prefix("Bearer ").ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(
                "Invalid Authorization format. Expected: Bearer <token>".into(),
            ))
        })?;

        let claims = validate_token(token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        let role = Role::parse(&claims.role).ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(format!(
                "Unknown role '{}' in token",
                claims.role
            )))
        })?;

        Ok(AuthUser {
            user_id: claims.sub,
            role,
        })
    }
}
