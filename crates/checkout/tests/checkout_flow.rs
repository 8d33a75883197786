//! End-to-end submission scenarios against the in-memory order store.

use std::sync::Arc;

use async_trait::async_trait;
use checkout::{CheckoutError, OrderSubmitter, ValidationError};
use common::OrderId;
use domain::{
    CartStore, CatalogItem, CustomerInfo, InMemoryMirror, Money, NewOrderHeader, NewOrderLineItem,
    OrderHeader, OrderRecord, OrderStatus,
};
use order_store::{InMemoryOrderStore, OrderStore};
use tokio::sync::Notify;

fn catalog_item(id: &str, name: &str, cents: i64) -> CatalogItem {
    CatalogItem::new(id, name, Money::from_cents(cents))
}

fn filled_cart() -> CartStore {
    let mut cart = CartStore::load(InMemoryMirror::new());
    cart.add_item(&catalog_item("dish-001", "Kung Pao Chicken", 4200), 1, "")
        .unwrap();
    cart.add_item(&catalog_item("dish-002", "Mapo Tofu", 2800), 2, "extra spicy")
        .unwrap();
    cart
}

fn customer() -> CustomerInfo {
    CustomerInfo::new("Li Wei", "13800138000")
}

#[tokio::test]
async fn empty_cart_is_rejected_before_any_remote_call() {
    let store = InMemoryOrderStore::new();
    let submitter = OrderSubmitter::new(store.clone());
    let mut cart = CartStore::load(InMemoryMirror::new());

    let result = submitter.submit(&mut cart, &customer()).await;
    assert!(matches!(
        result,
        Err(CheckoutError::Validation(ValidationError::EmptyCart))
    ));
    assert_eq!(store.total_calls(), 0);
}

#[tokio::test]
async fn blank_customer_fields_are_rejected_before_any_remote_call() {
    let store = InMemoryOrderStore::new();
    let submitter = OrderSubmitter::new(store.clone());
    let mut cart = filled_cart();

    let result = submitter
        .submit(&mut cart, &CustomerInfo::new("", "13800138000"))
        .await;
    assert!(matches!(
        result,
        Err(CheckoutError::Validation(ValidationError::MissingName))
    ));

    let result = submitter
        .submit(&mut cart, &CustomerInfo::new("Li Wei", ""))
        .await;
    assert!(matches!(
        result,
        Err(CheckoutError::Validation(ValidationError::MissingPhone))
    ));

    assert_eq!(store.total_calls(), 0);
    assert_eq!(cart.total_items(), 3);
}

#[tokio::test]
async fn successful_submission_persists_order_and_clears_cart() {
    let store = InMemoryOrderStore::new();
    let submitter = OrderSubmitter::new(store.clone());
    let mut cart = filled_cart();

    let order_number = submitter.submit(&mut cart, &customer()).await.unwrap();

    let digits = order_number.strip_prefix("ORD").expect("missing ORD prefix");
    assert!(digits.chars().all(|c| c.is_ascii_digit()));

    assert!(cart.is_empty());
    assert_eq!(store.header_count(), 1);
    assert_eq!(store.create_header_calls(), 1);
    assert_eq!(store.create_items_calls(), 1);
    assert_eq!(store.cancel_calls(), 0);

    let record = store.find_by_number(&order_number).await.unwrap().unwrap();
    assert_eq!(record.header.status, OrderStatus::Pending);
    assert_eq!(record.header.total_amount, Money::from_cents(9800));
    assert_eq!(record.items.len(), 2);
    assert_eq!(record.items_total(), record.header.total_amount);

    let spicy = record
        .items
        .iter()
        .find(|i| i.special_instructions == "extra spicy")
        .unwrap();
    assert_eq!(spicy.quantity, 2);
    assert_eq!(spicy.unit_price, Money::from_cents(2800));
    assert_eq!(spicy.total_price, Money::from_cents(5600));
}

#[tokio::test]
async fn header_write_failure_leaves_cart_and_store_untouched() {
    let store = InMemoryOrderStore::new();
    store.set_fail_on_create_header(true);
    let submitter = OrderSubmitter::new(store.clone());
    let mut cart = filled_cart();

    let result = submitter.submit(&mut cart, &customer()).await;
    assert!(matches!(result, Err(CheckoutError::Persistence(_))));

    assert_eq!(cart.total_items(), 3);
    assert_eq!(store.header_count(), 0);
    assert_eq!(store.create_header_calls(), 1);
    assert_eq!(store.create_items_calls(), 0);
    assert_eq!(store.cancel_calls(), 0);
}

#[tokio::test]
async fn line_item_failure_compensates_header_and_preserves_cart() {
    let store = InMemoryOrderStore::new();
    store.set_fail_on_create_items(true);
    let submitter = OrderSubmitter::new(store.clone());
    let mut cart = filled_cart();

    let result = submitter.submit(&mut cart, &customer()).await;
    assert!(matches!(result, Err(CheckoutError::Persistence(_))));

    // Cart preserved for retry.
    assert_eq!(cart.total_items(), 3);

    // Exactly one header, no line items, compensated to cancelled.
    let headers = store.headers();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].status, OrderStatus::Cancelled);
    assert!(store.line_items(headers[0].id).is_empty());
    assert_eq!(store.cancel_calls(), 1);
}

#[tokio::test]
async fn failed_compensation_leaves_pending_orphan() {
    let store = InMemoryOrderStore::new();
    store.set_fail_on_create_items(true);
    store.set_fail_on_cancel(true);
    let submitter = OrderSubmitter::new(store.clone());
    let mut cart = filled_cart();

    let result = submitter.submit(&mut cart, &customer()).await;
    assert!(matches!(result, Err(CheckoutError::Persistence(_))));

    // The orphan stays pending; the cart is still not lost.
    let headers = store.headers();
    assert_eq!(headers.len(), 1);
    assert_eq!(headers[0].status, OrderStatus::Pending);
    assert!(store.line_items(headers[0].id).is_empty());
    assert_eq!(cart.total_items(), 3);
}

#[tokio::test]
async fn retry_after_failure_generates_a_new_order_number() {
    let store = InMemoryOrderStore::new();
    store.set_fail_on_create_items(true);
    let submitter = OrderSubmitter::new(store.clone());
    let mut cart = filled_cart();

    let result = submitter.submit(&mut cart, &customer()).await;
    assert!(matches!(result, Err(CheckoutError::Persistence(_))));

    store.set_fail_on_create_items(false);
    let order_number = submitter.submit(&mut cart, &customer()).await.unwrap();

    assert!(cart.is_empty());
    let headers = store.headers();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].status, OrderStatus::Cancelled);
    assert_eq!(headers[1].status, OrderStatus::Pending);
    assert_ne!(headers[0].order_number, headers[1].order_number);
    assert_eq!(headers[1].order_number, order_number);
}

/// Order store wrapper that parks the header write until released,
/// keeping a submission in flight for as long as the test needs.
#[derive(Clone)]
struct GatedStore {
    inner: InMemoryOrderStore,
    gate: Arc<Notify>,
}

#[async_trait]
impl OrderStore for GatedStore {
    async fn create_order_header(
        &self,
        header: NewOrderHeader,
    ) -> order_store::Result<OrderHeader> {
        self.gate.notified().await;
        self.inner.create_order_header(header).await
    }

    async fn create_order_line_items(
        &self,
        order_id: OrderId,
        items: Vec<NewOrderLineItem>,
    ) -> order_store::Result<()> {
        self.inner.create_order_line_items(order_id, items).await
    }

    async fn cancel_order_header(&self, order_id: OrderId) -> order_store::Result<()> {
        self.inner.cancel_order_header(order_id).await
    }

    async fn find_by_number(&self, order_number: &str) -> order_store::Result<Option<OrderRecord>> {
        self.inner.find_by_number(order_number).await
    }
}

#[tokio::test]
async fn concurrent_submission_is_rejected_while_one_is_in_flight() {
    let inner = InMemoryOrderStore::new();
    let gate = Arc::new(Notify::new());
    let store = GatedStore {
        inner: inner.clone(),
        gate: gate.clone(),
    };
    let submitter = Arc::new(OrderSubmitter::new(store));

    let first = {
        let submitter = submitter.clone();
        tokio::spawn(async move {
            let mut cart = filled_cart();
            submitter.submit(&mut cart, &customer()).await
        })
    };

    // Wait until the first submission has claimed the in-flight flag and
    // parked on the gated header write.
    while !submitter.is_in_flight() {
        tokio::task::yield_now().await;
    }

    let mut second_cart = filled_cart();
    let second = submitter.submit(&mut second_cart, &customer()).await;
    assert!(matches!(second, Err(CheckoutError::SubmissionInFlight)));
    // The rejected attempt never reached the store.
    assert_eq!(inner.total_calls(), 0);

    gate.notify_one();
    let first = first.await.unwrap();
    assert!(first.is_ok());
    assert!(!submitter.is_in_flight());
    assert_eq!(inner.header_count(), 1);
}
