//! API server entry point.

use std::sync::Arc;

use api::config::Config;
use domain::{CatalogItem, FileMirror, InMemoryMirror, Money};
use order_store::{
    Catalog, InMemoryOrderStore, OrderStore, PostgresCatalog, PostgresOrderStore, StaticCatalog,
};
use tokio::signal;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Waits for a shutdown signal (SIGINT or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install SIGINT handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("received SIGINT, starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("received SIGTERM, starting graceful shutdown");
        }
    }
}

/// Demo menu served when no database is configured.
fn demo_menu() -> Vec<CatalogItem> {
    vec![
        CatalogItem::new("dish-001", "Kung Pao Chicken", Money::from_cents(4200)),
        CatalogItem::new("dish-002", "Mapo Tofu", Money::from_cents(2800)),
        CatalogItem::new("dish-003", "Dan Dan Noodles", Money::from_cents(2400)),
        CatalogItem::new("dish-004", "Jasmine Tea", Money::from_cents(800)),
    ]
}

#[tokio::main]
async fn main() {
    let config = Config::from_env();

    // 1. Initialize tracing
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_level.clone())),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // 2. Install Prometheus metrics recorder
    let prometheus_builder = metrics_exporter_prometheus::PrometheusBuilder::new();
    let metrics_handle = prometheus_builder
        .install_recorder()
        .expect("failed to install Prometheus recorder");

    // 3. Select the order store and catalog backend
    let (orders, catalog): (Arc<dyn OrderStore>, Arc<dyn Catalog>) = match &config.database_url {
        Some(url) => {
            let pool = sqlx::PgPool::connect(url)
                .await
                .expect("failed to connect to database");
            let store = PostgresOrderStore::new(pool.clone());
            store.run_migrations().await.expect("migrations failed");
            tracing::info!("using PostgreSQL order store");
            (Arc::new(store), Arc::new(PostgresCatalog::new(pool)))
        }
        None => {
            tracing::info!("DATABASE_URL not set, using in-memory order store and demo menu");
            (
                Arc::new(InMemoryOrderStore::new()),
                Arc::new(StaticCatalog::new(demo_menu())),
            )
        }
    };

    // 4. Create application state, reloading any mirrored cart
    let state = match &config.cart_mirror_dir {
        Some(dir) => {
            let mirror = FileMirror::new(dir).expect("failed to prepare cart mirror directory");
            api::create_state(orders, catalog, mirror)
        }
        None => api::create_state(orders, catalog, InMemoryMirror::new()),
    };

    // 5. Build and start the server
    let app = api::create_app(state, metrics_handle);
    let addr = config.addr();
    tracing::info!(%addr, "starting API server");

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .expect("failed to bind address");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("server error");

    tracing::info!("server shut down gracefully");
}
