//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods that
//! accept `&PgPool` as the first argument. Queries touching projects are
//! filtered through [`crate::scope::scope_clause`].

pub mod billing_repo;
pub mod customer_invoice_repo;
pub mod dashboard_repo;
pub mod expense_repo;
pub mod ledger_repo;
pub mod linked_doc_repo;
pub mod project_repo;
pub mod purchase_order_repo;
pub mod sales_order_repo;
pub mod sequence_repo;
pub mod task_repo;
pub mod timesheet_repo;
pub mod user_repo;
pub mod vendor_bill_repo;

pub use billing_repo::BillingRepo;
pub use customer_invoice_repo::CustomerInvoiceRepo;
pub use dashboard_repo::DashboardRepo;
pub use expense_repo::ExpenseRepo;
pub use ledger_repo::LedgerRepo;
pub use linked_doc_repo::LinkedDocRepo;
pub use project_repo::ProjectRepo;
pub use purchase_order_repo::PurchaseOrderRepo;
pub use sales_order_repo::SalesOrderRepo;
pub use sequence_repo::SequenceRepo;
pub use task_repo::TaskRepo;
pub use timesheet_repo::TimesheetRepo;
pub use user_repo::UserRepo;
pub use vendor_bill_repo::VendorBillRepo;
