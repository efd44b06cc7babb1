//! Row models and request DTOs.
//!
//! Row structs derive `FromRow` and serialize camelCase. Status columns are
//! kept as the stored `String`; DTOs take the typed enums from
//! `flowiq_core::status` so invalid values are rejected at deserialization.

pub mod billing_record;
pub mod customer_invoice;
pub mod dashboard;
pub mod expense;
pub mod linked_doc;
pub mod project;
pub mod purchase_order;
pub mod sales_order;
pub mod task;
pub mod timesheet;
pub mod user;
pub mod vendor_bill;

use validator::ValidationError;

/// Struct-level check for PATCH bodies: at least one field must be present.
pub(crate) fn require_any(present: bool) -> Result<(), ValidationError> {
    if present {
        Ok(())
    } else {
        let mut err = ValidationError::new("empty_update");
        err.message = Some("at least one field must be provided".into());
        Err(err)
    }
}
