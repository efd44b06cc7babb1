//! String-backed status and category enums.
//!
//! The database stores these as TEXT columns guarded by CHECK constraints
//! (see the migrations in `flowiq-db`); the wire format uses the same
//! strings. Row structs keep the raw `String` and parse with
//! [`ProjectStatus::parse`] and friends when a rule needs the typed value.

use crate::error::CoreError;

macro_rules! define_string_enum {
    (
        $(#[$meta:meta])*
        $name:ident ($label:literal) {
            $( $(#[$vmeta:meta])* $variant:ident = $val:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $val)] $variant ),+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// The stored / serialized representation.
            pub fn as_str(self) -> &'static str {
                match self {
                    $( $name::$variant => $val ),+
                }
            }

            /// Parse the stored representation. Returns `None` for unknown values.
            pub fn parse(value: &str) -> Option<Self> {
                match value {
                    $( $val => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::error::CoreError;

            fn from_str(value: &str) -> Result<Self, Self::Err> {
                Self::parse(value).ok_or_else(|| {
                    let allowed: Vec<&str> = Self::ALL.iter().map(|v| v.as_str()).collect();
                    $crate::error::CoreError::Validation(format!(
                        "Invalid {} '{value}'. Must be one of: {}",
                        $label,
                        allowed.join(", ")
                    ))
                })
            }
        }
    };
}

pub(crate) use define_string_enum;

define_string_enum! {
    /// Project lifecycle status.
    ProjectStatus("project status") {
        Planning = "planning",
        Active = "active",
        OnHold = "on-hold",
        Completed = "completed",
        Cancelled = "cancelled",
    }
}

define_string_enum! {
    /// Kanban column a task sits in.
    TaskStatus("task status") {
        Todo = "todo",
        InProgress = "in-progress",
        Blocked = "blocked",
        Review = "review",
        Done = "done",
    }
}

define_string_enum! {
    TaskPriority("task priority") {
        Low = "low",
        Medium = "medium",
        High = "high",
        Critical = "critical",
    }
}

define_string_enum! {
    /// Kind of entry in a task's activity log.
    ActivityType("activity type") {
        StatusChange = "status_change",
        Comment = "comment",
        Attachment = "attachment",
        Timesheet = "timesheet",
        Update = "update",
    }
}

define_string_enum! {
    /// Expense approval status.
    ExpenseStatus("expense status") {
        Pending = "pending",
        Approved = "approved",
        Rejected = "rejected",
    }
}

define_string_enum! {
    /// Direction of a billing ledger line.
    BillingRecordType("billing record type") {
        Revenue = "revenue",
        Expense = "expense",
    }
}

define_string_enum! {
    /// Document kinds that can be linked to a project.
    LinkedDocType("linked document type") {
        SalesOrder = "SO",
        PurchaseOrder = "PO",
        CustomerInvoice = "CustomerInvoice",
        VendorBill = "VendorBill",
        Expense = "Expense",
    }
}

define_string_enum! {
    SalesOrderStatus("sales order status") {
        Draft = "Draft",
        Confirmed = "Confirmed",
        Paid = "Paid",
    }
}

define_string_enum! {
    PurchaseOrderStatus("purchase order status") {
        Draft = "Draft",
        Approved = "Approved",
        Paid = "Paid",
    }
}

define_string_enum! {
    InvoiceStatus("invoice status") {
        Draft = "Draft",
        Paid = "Paid",
    }
}

define_string_enum! {
    VendorBillStatus("vendor bill status") {
        Pending = "Pending",
        Paid = "Paid",
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// Parse a stored status, treating an unknown value as data corruption.
pub fn parse_stored<T: std::str::FromStr<Err = CoreError>>(value: &str) -> Result<T, CoreError> {
    value
        .parse()
        .map_err(|_| CoreError::Internal(format!("Unrecognised stored status '{value}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_of_hyphenated_values() {
        assert_eq!(TaskStatus::InProgress.as_str(), "in-progress");
        assert_eq!(TaskStatus::parse("in-progress"), Some(TaskStatus::InProgress));
        assert_eq!(ProjectStatus::parse("on-hold"), Some(ProjectStatus::OnHold));
    }

    #[test]
    fn test_unknown_value_is_validation_error() {
        let err = "archived".parse::<ProjectStatus>().unwrap_err();
        match err {
            CoreError::Validation(msg) => {
                assert!(msg.contains("Invalid project status 'archived'"));
                assert!(msg.contains("planning, active, on-hold, completed, cancelled"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_serde_uses_stored_strings() {
        let json = serde_json::to_string(&LinkedDocType::SalesOrder).unwrap();
        assert_eq!(json, "\"SO\"");
        let parsed: SalesOrderStatus = serde_json::from_str("\"Confirmed\"").unwrap();
        assert_eq!(parsed, SalesOrderStatus::Confirmed);
    }

    #[test]
    fn test_parse_stored_reports_internal_error() {
        let err = parse_stored::<ExpenseStatus>("maybe").unwrap_err();
        assert!(matches!(err, CoreError::Internal(_)));
    }

    #[test]
    fn test_column_order_matches_board_layout() {
        let columns: Vec<&str> = TaskStatus::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(columns, ["todo", "in-progress", "blocked", "review", "done"]);
    }
}
