//! FlowIQ domain logic.
//!
//! Everything in this crate is pure: no I/O, no database access. The db and
//! api crates call into it for the rules that must be applied identically
//! everywhere (role capabilities, project scoping, Kanban ordering, status
//! transitions, financial roll-ups).

pub mod documents;
pub mod error;
pub mod finance;
pub mod gating;
pub mod kanban;
pub mod roles;
pub mod status;
pub mod types;
pub mod validation;
