//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- the caller, from a JWT Bearer token.
//! - [`rbac`] -- one extractor per capability, e.g. [`rbac::RequireManageTasks`].

pub mod auth;
pub mod rbac;
