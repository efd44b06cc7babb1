//! Finance documents (sales orders, purchase orders, customer invoices,
//! vendor bills) and the finance dashboard.
//!
//! Listings and the dashboard use the caller's ledger scope: Finance and
//! Admin see every project, a project manager only the projects they manage.
//! Status actions follow the forward-only policy in
//! [`flowiq_core::documents`]: skipping ahead succeeds, repeating the current
//! status returns the document unchanged, and going back is 409.

use std::str::FromStr;

use axum::extract::multipart::{Multipart, MultipartRejection};
use axum::extract::{Path, State};
use axum::http::StatusCode;
use chrono::{DateTime, NaiveDate, Utc};
use flowiq_core::documents::{check_transition, DocumentKind, Lifecycle, Transition};
use flowiq_core::error::CoreError;
use flowiq_core::finance::merge_project_rollups;
use flowiq_core::status::{
    parse_stored, InvoiceStatus, PurchaseOrderStatus, SalesOrderStatus, VendorBillStatus,
};
use flowiq_core::types::{DbId, Money, Timestamp};
use flowiq_db::models::customer_invoice::{CreateCustomerInvoice, CustomerInvoice};
use flowiq_db::models::dashboard::FinanceDashboard;
use flowiq_db::models::purchase_order::{CreatePurchaseOrder, PurchaseOrder};
use flowiq_db::models::sales_order::{CreateSalesOrder, SalesOrder};
use flowiq_db::models::vendor_bill::{CreateVendorBill, VendorBill};
use flowiq_db::repositories::{
    CustomerInvoiceRepo, LedgerRepo, PurchaseOrderRepo, SalesOrderRepo, VendorBillRepo,
};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::extract::{validate, ValidJson};
use crate::middleware::rbac::{RequireManageFinance, RequireSettleFinance, RequireViewFinance};
use crate::response::{created, ok, ApiJson};
use crate::state::AppState;

#[derive(Serialize)]
pub struct ItemsBody<T: Serialize> {
    pub items: Vec<T>,
}

#[derive(Serialize)]
pub struct ItemBody<T: Serialize> {
    pub item: T,
}

// ---------------------------------------------------------------------------
// Dashboard
// ---------------------------------------------------------------------------

/// GET /finance/dashboard
pub async fn dashboard(
    RequireViewFinance(user): RequireViewFinance,
    State(state): State<AppState>,
) -> AppResult<ApiJson<FinanceDashboard>> {
    let scope = user.ledger_scope();
    let summary = LedgerRepo::totals(&state.pool, scope).await?.summarize();
    let revenue = LedgerRepo::revenue_by_project(&state.pool, scope).await?;
    let bills = LedgerRepo::bill_cost_by_project(&state.pool, scope).await?;
    let expenses = LedgerRepo::expense_cost_by_project(&state.pool, scope).await?;
    let vendor_spend = LedgerRepo::vendor_spend(&state.pool, scope).await?;

    Ok(ok(FinanceDashboard {
        summary,
        cost_vs_revenue_by_project: merge_project_rollups(&revenue, &bills, &expenses),
        vendor_spend,
    }))
}

// ---------------------------------------------------------------------------
// Status transitions
// ---------------------------------------------------------------------------

/// `Some(current)` when the stored status must change to reach `target`,
/// `None` when it is already there.
fn pending_change<S>(stored: &str, target: S) -> AppResult<Option<S>>
where
    S: Lifecycle + FromStr<Err = CoreError>,
{
    let current: S = parse_stored(stored)?;
    Ok(match check_transition(current, target)? {
        Transition::Applied => Some(current),
        Transition::Unchanged => None,
    })
}

/// Generates `async fn $name(state, id, target)` that loads a document,
/// checks the transition and applies it with a guarded UPDATE.
macro_rules! status_action {
    ($name:ident, $repo:ident, $row:ty, $status:ty, $kind:expr) => {
        async fn $name(
            state: &AppState,
            id: DbId,
            target: $status,
        ) -> AppResult<ApiJson<ItemBody<$row>>> {
            let document = $repo::find_by_id(&state.pool, id)
                .await?
                .ok_or_else(|| AppError::Core(CoreError::not_found($kind.entity(), id)))?;
            let Some(current) = pending_change::<$status>(&document.status, target)? else {
                return Ok(ok(ItemBody { item: document }));
            };

            let item = $repo::update_status(&state.pool, id, current, target)
                .await?
                .ok_or_else(|| {
                    AppError::Core(CoreError::Conflict(format!(
                        "{} {} was modified concurrently",
                        $kind.entity(),
                        document.number
                    )))
                })?;
            tracing::info!(number = %item.number, status = %target, "Finance document status changed");
            Ok(ok(ItemBody { item }))
        }
    };
}

status_action!(
    set_sales_order_status,
    SalesOrderRepo,
    SalesOrder,
    SalesOrderStatus,
    DocumentKind::SalesOrder
);
status_action!(
    set_purchase_order_status,
    PurchaseOrderRepo,
    PurchaseOrder,
    PurchaseOrderStatus,
    DocumentKind::PurchaseOrder
);
status_action!(
    set_invoice_status,
    CustomerInvoiceRepo,
    CustomerInvoice,
    InvoiceStatus,
    DocumentKind::CustomerInvoice
);
status_action!(
    set_vendor_bill_status,
    VendorBillRepo,
    VendorBill,
    VendorBillStatus,
    DocumentKind::VendorBill
);

// ---------------------------------------------------------------------------
// Sales orders
// ---------------------------------------------------------------------------

/// GET /finance/sales-orders
pub async fn list_sales_orders(
    RequireViewFinance(user): RequireViewFinance,
    State(state): State<AppState>,
) -> AppResult<ApiJson<ItemsBody<SalesOrder>>> {
    let items = SalesOrderRepo::list(&state.pool, user.ledger_scope()).await?;
    Ok(ok(ItemsBody { items }))
}

/// POST /finance/sales-orders
pub async fn create_sales_order(
    RequireManageFinance(_user): RequireManageFinance,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateSalesOrder>,
) -> AppResult<(StatusCode, ApiJson<ItemBody<SalesOrder>>)> {
    let item = SalesOrderRepo::create(&state.pool, &input).await?;
    tracing::info!(number = %item.number, project_id = item.project_id, "Sales order created");
    Ok(created(ItemBody { item }))
}

/// POST /finance/sales-orders/{id}/confirm
pub async fn confirm_sales_order(
    RequireManageFinance(_user): RequireManageFinance,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<ItemBody<SalesOrder>>> {
    set_sales_order_status(&state, id, SalesOrderStatus::Confirmed).await
}

/// POST /finance/sales-orders/{id}/paid
pub async fn pay_sales_order(
    RequireSettleFinance(_user): RequireSettleFinance,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<ItemBody<SalesOrder>>> {
    set_sales_order_status(&state, id, SalesOrderStatus::Paid).await
}

// ---------------------------------------------------------------------------
// Purchase orders
// ---------------------------------------------------------------------------

/// GET /finance/purchase-orders
pub async fn list_purchase_orders(
    RequireViewFinance(user): RequireViewFinance,
    State(state): State<AppState>,
) -> AppResult<ApiJson<ItemsBody<PurchaseOrder>>> {
    let items = PurchaseOrderRepo::list(&state.pool, user.ledger_scope()).await?;
    Ok(ok(ItemsBody { items }))
}

/// POST /finance/purchase-orders
pub async fn create_purchase_order(
    RequireManageFinance(_user): RequireManageFinance,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreatePurchaseOrder>,
) -> AppResult<(StatusCode, ApiJson<ItemBody<PurchaseOrder>>)> {
    let item = PurchaseOrderRepo::create(&state.pool, &input).await?;
    tracing::info!(number = %item.number, project_id = item.project_id, "Purchase order created");
    Ok(created(ItemBody { item }))
}

/// POST /finance/purchase-orders/{id}/approve
pub async fn approve_purchase_order(
    RequireManageFinance(_user): RequireManageFinance,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<ItemBody<PurchaseOrder>>> {
    set_purchase_order_status(&state, id, PurchaseOrderStatus::Approved).await
}

/// POST /finance/purchase-orders/{id}/paid
pub async fn pay_purchase_order(
    RequireSettleFinance(_user): RequireSettleFinance,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<ItemBody<PurchaseOrder>>> {
    set_purchase_order_status(&state, id, PurchaseOrderStatus::Paid).await
}

// ---------------------------------------------------------------------------
// Customer invoices
// ---------------------------------------------------------------------------

/// GET /finance/invoices
pub async fn list_invoices(
    RequireViewFinance(user): RequireViewFinance,
    State(state): State<AppState>,
) -> AppResult<ApiJson<ItemsBody<CustomerInvoice>>> {
    let items = CustomerInvoiceRepo::list(&state.pool, user.ledger_scope()).await?;
    Ok(ok(ItemsBody { items }))
}

/// POST /finance/invoices
pub async fn create_invoice(
    RequireManageFinance(_user): RequireManageFinance,
    State(state): State<AppState>,
    ValidJson(input): ValidJson<CreateCustomerInvoice>,
) -> AppResult<(StatusCode, ApiJson<ItemBody<CustomerInvoice>>)> {
    let item = CustomerInvoiceRepo::create(&state.pool, &input).await?;
    tracing::info!(number = %item.number, project_id = item.project_id, "Customer invoice created");
    Ok(created(ItemBody { item }))
}

/// POST /finance/invoices/{id}/paid
pub async fn pay_invoice(
    RequireSettleFinance(_user): RequireSettleFinance,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<ItemBody<CustomerInvoice>>> {
    set_invoice_status(&state, id, InvoiceStatus::Paid).await
}

// ---------------------------------------------------------------------------
// Vendor bills
// ---------------------------------------------------------------------------

/// GET /finance/vendor-bills
pub async fn list_vendor_bills(
    RequireViewFinance(user): RequireViewFinance,
    State(state): State<AppState>,
) -> AppResult<ApiJson<ItemsBody<VendorBill>>> {
    let items = VendorBillRepo::list(&state.pool, user.ledger_scope()).await?;
    Ok(ok(ItemsBody { items }))
}

/// POST /finance/vendor-bills (multipart)
///
/// Text fields: `vendor`, `projectId`, `amount`, `purchaseOrderId`, `date`.
/// Optional file field: `attachment`. The file is stored before the insert
/// and removed again if the insert fails.
pub async fn create_vendor_bill(
    RequireManageFinance(_user): RequireManageFinance,
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<(StatusCode, ApiJson<ItemBody<VendorBill>>)> {
    let multipart = multipart.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;
    let (input, upload) = read_bill_form(multipart).await?;
    validate(&input)?;

    let stored = match upload {
        Some(upload) => Some(
            state
                .uploads
                .save_bill(&upload.file_name, &upload.data)
                .await
                .map_err(|e| AppError::InternalError(format!("Failed to store attachment: {e}")))?,
        ),
        None => None,
    };

    let result =
        VendorBillRepo::create(&state.pool, &input, stored.as_ref().map(|f| f.url.as_str())).await;
    let item = match result {
        Ok(bill) => bill,
        Err(err) => {
            if let Some(file) = &stored {
                state.uploads.discard(file).await;
            }
            return Err(err.into());
        }
    };

    tracing::info!(
        number = %item.number,
        project_id = item.project_id,
        attachment = item.attachment_url.as_deref().unwrap_or("-"),
        "Vendor bill created"
    );
    Ok(created(ItemBody { item }))
}

/// POST /finance/vendor-bills/{id}/paid
pub async fn pay_vendor_bill(
    RequireSettleFinance(_user): RequireSettleFinance,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<ApiJson<ItemBody<VendorBill>>> {
    set_vendor_bill_status(&state, id, VendorBillStatus::Paid).await
}

struct Upload {
    file_name: String,
    data: Vec<u8>,
}

async fn read_bill_form(mut multipart: Multipart) -> AppResult<(CreateVendorBill, Option<Upload>)> {
    let mut input = CreateVendorBill::default();
    let mut project_id: Option<DbId> = None;
    let mut amount: Option<Money> = None;
    let mut upload = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        if name == "attachment" {
            let file_name = field.file_name().unwrap_or("attachment").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| AppError::BadRequest(e.body_text()))?;
            if !data.is_empty() {
                upload = Some(Upload {
                    file_name,
                    data: data.to_vec(),
                });
            }
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::BadRequest(e.body_text()))?;
        let value = value.trim();
        if value.is_empty() {
            continue;
        }
        match name.as_str() {
            "vendor" => input.vendor = value.to_string(),
            "projectId" => project_id = Some(parse_field("projectId", value)?),
            "amount" => amount = Some(parse_field("amount", value)?),
            "purchaseOrderId" => input.purchase_order_id = Some(parse_field("purchaseOrderId", value)?),
            "date" => input.date = Some(parse_date(value)?),
            other => tracing::debug!(field = other, "Ignoring unknown vendor bill field"),
        }
    }

    input.project_id = project_id.ok_or_else(|| required("projectId"))?;
    input.amount = amount.ok_or_else(|| required("amount"))?;
    Ok((input, upload))
}

fn required(field: &str) -> AppError {
    AppError::Core(CoreError::Validation(format!("{field} is required")))
}

fn parse_field<T: FromStr>(field: &str, value: &str) -> AppResult<T> {
    value
        .parse()
        .map_err(|_| AppError::Core(CoreError::Validation(format!("{field} is invalid"))))
}

/// RFC 3339 timestamp or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_date(value: &str) -> AppResult<Timestamp> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
        return Ok(ts.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| AppError::Core(CoreError::Validation("date is invalid".into())))
}
