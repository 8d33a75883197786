//! HTTP API server for the walk-in ordering system.
//!
//! Exposes the session cart, the checkout submission protocol, and order
//! lookup over REST, with structured logging (tracing) and Prometheus
//! metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{delete, get, post, put};
use checkout::OrderSubmitter;
use domain::{CartStore, SessionMirror};
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::{Catalog, OrderStore};
use tokio::sync::Mutex;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// Shared application state: one interactive session's cart and
/// submitter, plus the read-side services.
pub struct AppState {
    pub cart: Mutex<CartStore>,
    pub submitter: OrderSubmitter<Arc<dyn OrderStore>>,
    pub orders: Arc<dyn OrderStore>,
    pub catalog: Arc<dyn Catalog>,
}

/// Creates application state over the given backing services, reloading
/// any mirrored cart for the session.
pub fn create_state(
    orders: Arc<dyn OrderStore>,
    catalog: Arc<dyn Catalog>,
    mirror: impl SessionMirror + 'static,
) -> Arc<AppState> {
    Arc::new(AppState {
        cart: Mutex::new(CartStore::load(mirror)),
        submitter: OrderSubmitter::new(orders.clone()),
        orders,
        catalog,
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/menu", get(routes::menu::list))
        .route("/cart", get(routes::cart::get))
        .route("/cart", delete(routes::cart::clear))
        .route("/cart/items", post(routes::cart::add_item))
        .route("/cart/items", put(routes::cart::update_quantity))
        .route("/cart/items", delete(routes::cart::remove_item))
        .route("/checkout", post(routes::checkout::submit))
        .route("/orders/{order_number}", get(routes::checkout::find_order))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
