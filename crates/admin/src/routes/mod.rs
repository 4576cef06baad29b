//! HTTP route handlers for admin.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                   - Health check
//!
//! # Picklist (server-rendered)
//! GET  /products                 - Filtered, paginated product list
//! POST /products/selection       - Toggle selection, redirects back to the list
//! GET  /products/{id}            - Single-product editor
//!
//! # JSON API
//! GET  /api/products             - Filtered, paginated product list
//! GET  /api/collections/suggest  - Breadcrumb suggestions (?q=)
//! POST /api/bulk-rewrite         - Rewrite selected products (form)
//! POST /api/rewrite              - Generate content for one title/description
//! POST /api/update-product       - Save one product's fields and metafields
//! ```

pub mod api;
pub mod products;

use axum::{
    Router,
    routing::{get, post},
};
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::catalog::read_catalog;
use crate::error::AppError;
use crate::shopify::CatalogProduct;
use crate::state::AppState;

/// Create the picklist routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/selection", post(products::update_selection))
        .route("/{id}", get(products::edit))
}

/// Create the JSON API routes router.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(api::list_products))
        .route("/collections/suggest", get(api::suggest_collections))
        .route("/bulk-rewrite", post(api::bulk_rewrite))
        .route("/rewrite", post(api::rewrite))
        .route("/update-product", post(api::update_product))
}

/// Build the application router with request tracing.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/products", product_routes())
        .nest("/api", api_routes())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
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

/// Read the catalog snapshot with the configured fulfillment filter.
async fn load_catalog(state: &AppState) -> Result<Vec<CatalogProduct>, AppError> {
    let filter = state.config().catalog.fulfillment_service.as_deref();
    Ok(read_catalog(state.shopify(), filter).await?)
}
