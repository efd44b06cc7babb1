//! Finance document numbering and status lifecycles.
//!
//! Numbers are `<PREFIX>-<n>` where `n` comes from a durable per-kind
//! counter seeded at [`DocumentKind::seed`]; the first document of a kind is
//! `seed + 1` (SO-1001, PO-2001, INV-3001, BILL-4001).
//!
//! Transition policy for every lifecycle:
//! - moving forward is allowed, including skipping steps (Draft -> Paid);
//! - re-applying the current status is an idempotent no-op;
//! - moving backwards is a conflict.

use crate::error::CoreError;
use crate::status::{
    ExpenseStatus, InvoiceStatus, PurchaseOrderStatus, SalesOrderStatus, VendorBillStatus,
};

/// The four numbered finance document kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    SalesOrder,
    PurchaseOrder,
    CustomerInvoice,
    VendorBill,
}

impl DocumentKind {
    pub const ALL: [DocumentKind; 4] = [
        DocumentKind::SalesOrder,
        DocumentKind::PurchaseOrder,
        DocumentKind::CustomerInvoice,
        DocumentKind::VendorBill,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            DocumentKind::SalesOrder => "SO",
            DocumentKind::PurchaseOrder => "PO",
            DocumentKind::CustomerInvoice => "INV",
            DocumentKind::VendorBill => "BILL",
        }
    }

    /// Counter value before the first document is issued.
    pub fn seed(self) -> i64 {
        match self {
            DocumentKind::SalesOrder => 1000,
            DocumentKind::PurchaseOrder => 2000,
            DocumentKind::CustomerInvoice => 3000,
            DocumentKind::VendorBill => 4000,
        }
    }

    /// Key of the counter row in `document_sequences`.
    pub fn sequence_key(self) -> &'static str {
        match self {
            DocumentKind::SalesOrder => "sales_order",
            DocumentKind::PurchaseOrder => "purchase_order",
            DocumentKind::CustomerInvoice => "customer_invoice",
            DocumentKind::VendorBill => "vendor_bill",
        }
    }

    /// Entity name used in error messages.
    pub fn entity(self) -> &'static str {
        match self {
            DocumentKind::SalesOrder => "SalesOrder",
            DocumentKind::PurchaseOrder => "PurchaseOrder",
            DocumentKind::CustomerInvoice => "CustomerInvoice",
            DocumentKind::VendorBill => "VendorBill",
        }
    }

    pub fn format_number(self, value: i64) -> String {
        format!("{}-{value}", self.prefix())
    }
}

/// Outcome of a permitted status change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    /// The status changes and must be written.
    Applied,
    /// Already in the target status; nothing to write.
    Unchanged,
}

/// A status enum with a position in a forward-only lifecycle.
pub trait Lifecycle: Copy + Eq + std::fmt::Display {
    /// Entity name used in conflict messages.
    const ENTITY: &'static str;

    /// Position in the lifecycle. Terminal alternatives share a rank.
    fn rank(self) -> u8;
}

impl Lifecycle for SalesOrderStatus {
    const ENTITY: &'static str = "Sales order";

    fn rank(self) -> u8 {
        match self {
            SalesOrderStatus::Draft => 0,
            SalesOrderStatus::Confirmed => 1,
            SalesOrderStatus::Paid => 2,
        }
    }
}

impl Lifecycle for PurchaseOrderStatus {
    const ENTITY: &'static str = "Purchase order";

    fn rank(self) -> u8 {
        match self {
            PurchaseOrderStatus::Draft => 0,
            PurchaseOrderStatus::Approved => 1,
            PurchaseOrderStatus::Paid => 2,
        }
    }
}

impl Lifecycle for InvoiceStatus {
    const ENTITY: &'static str = "Invoice";

    fn rank(self) -> u8 {
        match self {
            InvoiceStatus::Draft => 0,
            InvoiceStatus::Paid => 1,
        }
    }
}

impl Lifecycle for VendorBillStatus {
    const ENTITY: &'static str = "Vendor bill";

    fn rank(self) -> u8 {
        match self {
            VendorBillStatus::Pending => 0,
            VendorBillStatus::Paid => 1,
        }
    }
}

impl Lifecycle for ExpenseStatus {
    const ENTITY: &'static str = "Expense";

    fn rank(self) -> u8 {
        match self {
            ExpenseStatus::Pending => 0,
            ExpenseStatus::Approved | ExpenseStatus::Rejected => 1,
        }
    }
}

/// Check a status change against the lifecycle policy.
pub fn check_transition<S: Lifecycle>(current: S, target: S) -> Result<Transition, CoreError> {
    if current == target {
        Ok(Transition::Unchanged)
    } else if target.rank() > current.rank() {
        Ok(Transition::Applied)
    } else {
        Err(CoreError::Conflict(format!(
            "{} cannot move from {current} to {target}",
            S::ENTITY
        )))
    }
}
