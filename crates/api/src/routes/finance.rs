//! Route definitions for the `/finance` surface.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::finance;
use crate::state::AppState;

/// Routes mounted at `/finance`.
///
/// ```text
/// GET    /dashboard                     -> dashboard
///
/// GET    /sales-orders                  -> list_sales_orders
/// POST   /sales-orders                  -> create_sales_order
/// POST   /sales-orders/{id}/confirm     -> confirm_sales_order
/// POST   /sales-orders/{id}/paid        -> pay_sales_order
///
/// GET    /purchase-orders               -> list_purchase_orders
/// POST   /purchase-orders               -> create_purchase_order
/// POST   /purchase-orders/{id}/approve  -> approve_purchase_order
/// POST   /purchase-orders/{id}/paid     -> pay_purchase_order
///
/// GET    /invoices                      -> list_invoices
/// POST   /invoices                      -> create_invoice
/// POST   /invoices/{id}/paid            -> pay_invoice
///
/// GET    /vendor-bills                  -> list_vendor_bills
/// POST   /vendor-bills                  -> create_vendor_bill (multipart)
/// POST   /vendor-bills/{id}/paid        -> pay_vendor_bill
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(finance::dashboard))
        .route(
            "/sales-orders",
            get(finance::list_sales_orders).post(finance::create_sales_order),
        )
        .route(
            "/sales-orders/{id}/confirm",
            post(finance::confirm_sales_order),
        )
        .route("/sales-orders/{id}/paid", post(finance::pay_sales_order))
        .route(
            "/purchase-orders",
            get(finance::list_purchase_orders).post(finance::create_purchase_order),
        )
        .route(
            "/purchase-orders/{id}/approve",
            post(finance::approve_purchase_order),
        )
        .route(
            "/purchase-orders/{id}/paid",
            post(finance::pay_purchase_order),
        )
        .route(
            "/invoices",
            get(finance::list_invoices).post(finance::create_invoice),
        )
        .route("/invoices/{id}/paid", post(finance::pay_invoice))
        .route(
            "/vendor-bills",
            get(finance::list_vendor_bills).post(finance::create_vendor_bill),
        )
        .route("/vendor-bills/{id}/paid", post(finance::pay_vendor_bill))
}
