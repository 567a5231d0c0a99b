//! HTTP route handlers for the POS.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                       - Landing page
//! GET  /health                 - Liveness
//! GET  /health/ready           - Database readiness
//!
//! # Inventory (admin)
//! GET    /product/view         - Product list, sorted by name
//! POST   /product/add          - Add product
//! POST   /product/quantity/add - Add stock
//! PUT    /product/{id}         - Overwrite product
//! DELETE /product/{id}         - Retire product
//! POST   /product/{id}         - HTML form with `_method` = PUT or DELETE
//!
//! # Billing (any user)
//! GET  /billing                - Billing form
//! POST /billing/add            - Record a sale
//!
//! # Sales (admin)
//! GET  /sale/get               - All sales
//! GET  /sale/get/{id}          - One sale's line items
//! GET  /currentdaysale         - Today's sales
//! GET  /weeksale               - Last seven days
//! GET  /monthsale              - Last thirty days
//!
//! # Reporting (any user)
//! GET  /dashboard              - Totals, best sellers, low stock
//!
//! # Auth
//! GET  /login                  - Login page
//! POST /login                  - Login action
//! POST /logout                 - Logout action
//! GET  /seed                   - Create default accounts
//! ```

pub mod auth;
pub mod billing;
pub mod dashboard;
pub mod home;
pub mod products;
pub mod sales;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tower_sessions::{SessionManagerLayer, SessionStore};
use tracing::Span;

use crate::middleware::{request_id_middleware, security_headers_middleware};
use crate::state::AppState;

/// Directory static assets are served from, relative to the workspace root.
pub const STATIC_DIR: &str = "crates/pos/static";

/// Create the inventory routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/view", get(products::index))
        .route("/add", post(products::add))
        .route("/quantity/add", post(products::add_quantity))
        .route(
            "/{id}",
            axum::routing::put(products::update)
                .delete(products::retire)
                .post(products::method_override),
        )
}

/// Create the sales routes router.
pub fn sale_routes() -> Router<AppState> {
    Router::new()
        .route("/get", get(sales::index))
        .route("/get/{id}", get(sales::show))
}

/// Create all page routes for the POS.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        // Inventory
        .nest("/product", product_routes())
        // Billing
        .route("/billing", get(billing::page))
        .route("/billing/add", post(billing::add))
        // Sales history
        .nest("/sale", sale_routes())
        .route("/currentdaysale", get(sales::today))
        .route("/weeksale", get(sales::week))
        .route("/monthsale", get(sales::month))
        // Reporting
        .route("/dashboard", get(dashboard::page))
        // Auth
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/seed", get(auth::seed))
}

/// Build the full application: routes, static files and the middleware stack.
///
/// Sentry layers are added by the binary, outside this stack.
pub fn app<Store>(state: AppState, session_layer: SessionManagerLayer<Store>) -> Router
where
    Store: SessionStore + Clone,
{
    Router::new()
        .merge(routes())
        .nest_service("/static", ServeDir::new(STATIC_DIR))
        .layer(session_layer)
        .layer(axum::middleware::from_fn(security_headers_middleware))
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state)
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
