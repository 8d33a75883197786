//! PostgreSQL integration tests
//!
//! These tests share one PostgreSQL container and run serially:
//!
//! ```bash
//! cargo test -p order-store --test postgres_integration
//! ```

use std::sync::Arc;

use domain::{
    CustomerInfo, MenuItemId, Money, NewOrderHeader, NewOrderLineItem, OrderStatus, PaymentStatus,
};
use order_store::{Catalog, OrderStore, PostgresCatalog, PostgresOrderStore};
use serial_test::serial;
use sqlx::PgPool;
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for the schema
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_order_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresOrderStore {
    let info = get_container_info().await;

    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE order_items, orders, menu_items")
        .execute(&pool)
        .await
        .unwrap();

    PostgresOrderStore::new(pool)
}

fn pending_header(number: &str, total_cents: i64) -> NewOrderHeader {
    NewOrderHeader::pending(
        number.to_string(),
        &CustomerInfo::new("Li Wei", "13800138000"),
        Money::from_cents(total_cents),
    )
}

fn line_item(id: &str, quantity: u32, cents: i64) -> NewOrderLineItem {
    NewOrderLineItem {
        item_id: MenuItemId::new(id),
        quantity,
        unit_price: Money::from_cents(cents),
        total_price: Money::from_cents(cents).multiply(quantity),
        special_instructions: String::new(),
    }
}

#[tokio::test]
#[serial]
async fn header_and_items_roundtrip() {
    let store = get_test_store().await;

    let header = store
        .create_order_header(pending_header("ORD1001", 9800))
        .await
        .unwrap();
    assert_eq!(header.status, OrderStatus::Pending);
    assert_eq!(header.payment_status, PaymentStatus::Pending);

    store
        .create_order_line_items(
            header.id,
            vec![line_item("dish-001", 1, 4200), line_item("dish-002", 2, 2800)],
        )
        .await
        .unwrap();

    let record = store.find_by_number("ORD1001").await.unwrap().unwrap();
    assert_eq!(record.header.id, header.id);
    assert_eq!(record.items.len(), 2);
    assert_eq!(record.items_total(), Money::from_cents(9800));
    assert_eq!(record.items_total(), record.header.total_amount);
}

#[tokio::test]
#[serial]
async fn duplicate_order_number_is_rejected() {
    let store = get_test_store().await;

    store
        .create_order_header(pending_header("ORD1001", 4200))
        .await
        .unwrap();
    let result = store
        .create_order_header(pending_header("ORD1001", 2800))
        .await;
    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn item_batch_is_all_or_nothing() {
    let store = get_test_store().await;

    let header = store
        .create_order_header(pending_header("ORD1001", 7000))
        .await
        .unwrap();

    // Second row violates the quantity check constraint, so the whole
    // batch must roll back.
    let result = store
        .create_order_line_items(
            header.id,
            vec![line_item("dish-001", 1, 4200), line_item("dish-002", 0, 2800)],
        )
        .await;
    assert!(result.is_err());

    let record = store.find_by_number("ORD1001").await.unwrap().unwrap();
    assert!(record.items.is_empty());
}

#[tokio::test]
#[serial]
async fn cancel_compensates_pending_header() {
    let store = get_test_store().await;

    let header = store
        .create_order_header(pending_header("ORD1001", 4200))
        .await
        .unwrap();

    store.cancel_order_header(header.id).await.unwrap();
    // Idempotent: a second compensation attempt succeeds without change.
    store.cancel_order_header(header.id).await.unwrap();

    let record = store.find_by_number("ORD1001").await.unwrap().unwrap();
    assert_eq!(record.header.status, OrderStatus::Cancelled);
}

#[tokio::test]
#[serial]
async fn cancel_unknown_header_fails() {
    let store = get_test_store().await;
    let result = store.cancel_order_header(common::OrderId::new()).await;
    assert!(result.is_err());
}

#[tokio::test]
#[serial]
async fn find_by_number_misses_cleanly() {
    let store = get_test_store().await;
    assert!(store.find_by_number("ORD9999").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn catalog_lists_only_available_items() {
    let store = get_test_store().await;
    let pool = store.pool().clone();

    sqlx::query(
        r#"
        INSERT INTO menu_items (id, name, price_cents, is_available) VALUES
            ('dish-001', 'Kung Pao Chicken', 4200, TRUE),
            ('dish-002', 'Mapo Tofu', 2800, TRUE),
            ('dish-003', 'Seasonal Special', 6800, FALSE)
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let catalog = PostgresCatalog::new(pool);
    let items = catalog.list_available_items().await.unwrap();
    assert_eq!(items.len(), 2);

    let item = catalog
        .find_item(&MenuItemId::new("dish-001"))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(item.price, Money::from_cents(4200));

    assert!(
        catalog
            .find_item(&MenuItemId::new("dish-003"))
            .await
            .unwrap()
            .is_none()
    );
}
