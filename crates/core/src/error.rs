//! Domain error type shared by every FlowIQ crate.

use crate::types::DbId;

/// Errors raised by domain rules, independent of transport.
///
/// The API layer maps each variant onto an HTTP status; see
/// `flowiq_api::error::AppError`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    #[error("{entity} with id {id} not found")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed schema validation. The message is already user-facing.
    #[error("{0}")]
    Validation(String),

    /// The request conflicts with the current state of a record
    /// (backwards status change, stale Kanban position, duplicate number).
    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated, but the role or project scope does not allow it.
    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Internal(String),
}

impl CoreError {
    pub fn not_found(entity: &'static str, id: DbId) -> Self {
        CoreError::NotFound { entity, id }
    }
}
