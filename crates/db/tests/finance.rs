//! Document numbering, guarded status updates and ledger aggregates.

mod common;

use flowiq_core::finance::LedgerTotals;
use flowiq_core::roles::{ProjectScope, Role};
use flowiq_core::status::{ExpenseStatus, SalesOrderStatus, VendorBillStatus};
use flowiq_core::types::DbId;
use flowiq_db::models::customer_invoice::CreateCustomerInvoice;
use flowiq_db::models::expense::CreateExpense;
use flowiq_db::models::sales_order::CreateSalesOrder;
use flowiq_db::models::vendor_bill::CreateVendorBill;
use flowiq_db::repositories::{
    CustomerInvoiceRepo, ExpenseRepo, LedgerRepo, ProjectRepo, SalesOrderRepo, VendorBillRepo,
};
use rust_decimal::Decimal;
use sqlx::PgPool;

fn sales_order(project_id: DbId, amount: i64) -> CreateSalesOrder {
    CreateSalesOrder {
        customer: "Acme Ltd".into(),
        project_id,
        amount: Decimal::from(amount),
        description: None,
    }
}

fn vendor_bill(project_id: DbId, vendor: &str, amount: i64) -> CreateVendorBill {
    CreateVendorBill {
        vendor: vendor.into(),
        project_id,
        amount: Decimal::from(amount),
        purchase_order_id: None,
        date: None,
    }
}

#[sqlx::test(migrations = "./migrations")]
async fn test_numbers_continue_from_seed(pool: PgPool) {
    let pm = common::user(&pool, "pm@example.com", Role::ProjectManager).await;
    let project = common::project(&pool, pm, "Ledger").await;

    let first = SalesOrderRepo::create(&pool, &sales_order(project, 10)).await.unwrap();
    let second = SalesOrderRepo::create(&pool, &sales_order(project, 20)).await.unwrap();
    assert_eq!(first.number, "SO-1001");
    assert_eq!(second.number, "SO-1002");
    assert_eq!(first.status, "Draft");

    let bill = VendorBillRepo::create(&pool, &vendor_bill(project, "Parts Co", 5), None)
        .await
        .unwrap();
    assert_eq!(bill.number, "BILL-4001");
    assert_eq!(bill.status, "Pending");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_failed_insert_does_not_consume_number(pool: PgPool) {
    let pm = common::user(&pool, "pm@example.com", Role::ProjectManager).await;
    let project = common::project(&pool, pm, "Ledger").await;

    let missing_project = sales_order(project + 1000, 10);
    assert!(SalesOrderRepo::create(&pool, &missing_project).await.is_err());

    let created = SalesOrderRepo::create(&pool, &sales_order(project, 10)).await.unwrap();
    assert_eq!(created.number, "SO-1001");
}

#[sqlx::test(migrations = "./migrations")]
async fn test_status_update_requires_expected_status(pool: PgPool) {
    let pm = common::user(&pool, "pm@example.com", Role::ProjectManager).await;
    let project = common::project(&pool, pm, "Ledger").await;
    let order = SalesOrderRepo::create(&pool, &sales_order(project, 10)).await.unwrap();

    let paid = SalesOrderRepo::update_status(
        &pool,
        order.id,
        SalesOrderStatus::Draft,
        SalesOrderStatus::Paid,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(paid.status, "Paid");

    let stale = SalesOrderRepo::update_status(
        &pool,
        order.id,
        SalesOrderStatus::Draft,
        SalesOrderStatus::Confirmed,
    )
    .await
    .unwrap();
    assert!(stale.is_none());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ledger_totals_and_rollups(pool: PgPool) {
    let pm = common::user(&pool, "pm@example.com", Role::ProjectManager).await;
    let project = common::project(&pool, pm, "Ledger").await;

    let invoice = CustomerInvoiceRepo::create(
        &pool,
        &CreateCustomerInvoice {
            customer: "Acme Ltd".into(),
            project_id: project,
            amount: Decimal::from(100),
            sales_order_id: None,
            date: None,
        },
    )
    .await
    .unwrap();
    CustomerInvoiceRepo::update_status(
        &pool,
        invoice.id,
        flowiq_core::status::InvoiceStatus::Draft,
        flowiq_core::status::InvoiceStatus::Paid,
    )
    .await
    .unwrap();

    let bill = VendorBillRepo::create(&pool, &vendor_bill(project, "Parts Co", 40), None)
        .await
        .unwrap();
    VendorBillRepo::update_status(&pool, bill.id, VendorBillStatus::Pending, VendorBillStatus::Paid)
        .await
        .unwrap();
    VendorBillRepo::create(&pool, &vendor_bill(project, "Cable Inc", 15), None)
        .await
        .unwrap();

    let expense = ExpenseRepo::create(
        &pool,
        project,
        pm,
        &CreateExpense {
            description: "Taxi".into(),
            amount: Decimal::from(10),
            billable: true,
            date: None,
        },
    )
    .await
    .unwrap();
    ExpenseRepo::update_status(&pool, expense.id, ExpenseStatus::Pending, ExpenseStatus::Approved)
        .await
        .unwrap();

    let totals = LedgerRepo::totals(&pool, ProjectScope::All).await.unwrap();
    assert_eq!(
        totals,
        LedgerTotals {
            paid_invoices: Decimal::from(100),
            paid_bills: Decimal::from(40),
            approved_expenses: Decimal::from(10),
            unpaid_invoices: Decimal::ZERO,
            unpaid_bills: Decimal::from(15),
        }
    );

    let costs = LedgerRepo::bill_cost_by_project(&pool, ProjectScope::All).await.unwrap();
    assert_eq!(costs.len(), 1);
    assert_eq!(costs[0].amount, Decimal::from(40));

    let spend = LedgerRepo::vendor_spend(&pool, ProjectScope::All).await.unwrap();
    let vendors: Vec<&str> = spend.iter().map(|v| v.vendor.as_str()).collect();
    assert_eq!(vendors, ["Parts Co", "Cable Inc"]);
}

#[sqlx::test(migrations = "./migrations")]
async fn test_ledger_scope_hides_other_managers_documents(pool: PgPool) {
    let alice = common::user(&pool, "alice@example.com", Role::ProjectManager).await;
    let bob = common::user(&pool, "bob@example.com", Role::ProjectManager).await;
    let alice_project = common::project(&pool, alice, "Alice").await;
    let bob_project = common::project(&pool, bob, "Bob").await;

    SalesOrderRepo::create(&pool, &sales_order(alice_project, 10)).await.unwrap();
    SalesOrderRepo::create(&pool, &sales_order(bob_project, 20)).await.unwrap();
    VendorBillRepo::create(&pool, &vendor_bill(bob_project, "Parts Co", 40), None)
        .await
        .unwrap();

    let all = SalesOrderRepo::list(&pool, ProjectScope::All).await.unwrap();
    assert_eq!(all.len(), 2);

    let mine = SalesOrderRepo::list(&pool, ProjectScope::ManagedBy(alice)).await.unwrap();
    let projects: Vec<DbId> = mine.iter().map(|o| o.project_id).collect();
    assert_eq!(projects, vec![alice_project]);

    let bills = VendorBillRepo::list(&pool, ProjectScope::ManagedBy(alice)).await.unwrap();
    assert!(bills.is_empty());
    let totals = LedgerRepo::totals(&pool, ProjectScope::ManagedBy(alice)).await.unwrap();
    assert_eq!(totals.unpaid_bills, Decimal::ZERO);
    let spend = LedgerRepo::vendor_spend(&pool, ProjectScope::ManagedBy(alice)).await.unwrap();
    assert!(spend.is_empty());
}

#[sqlx::test(migrations = "./migrations")]
async fn test_unrestricted_ledger_keeps_deleted_projects(pool: PgPool) {
    let pm = common::user(&pool, "pm@example.com", Role::ProjectManager).await;
    let project = common::project(&pool, pm, "Closed").await;
    VendorBillRepo::create(&pool, &vendor_bill(project, "Parts Co", 40), None)
        .await
        .unwrap();
    ProjectRepo::soft_delete(&pool, project).await.unwrap();

    let totals = LedgerRepo::totals(&pool, ProjectScope::All).await.unwrap();
    assert_eq!(totals.unpaid_bills, Decimal::from(40));
    let managed = LedgerRepo::totals(&pool, ProjectScope::ManagedBy(pm)).await.unwrap();
    assert_eq!(managed.unpaid_bills, Decimal::ZERO);
}
