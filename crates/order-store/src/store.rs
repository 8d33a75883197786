use std::sync::Arc;

use async_trait::async_trait;
use common::OrderId;
use domain::{NewOrderHeader, NewOrderLineItem, OrderHeader, OrderRecord};

use crate::Result;

/// Core trait for order record service implementations.
///
/// The two creation calls are sequential, dependent writes with no
/// transactional guarantee across them; the submission protocol owns the
/// partial-failure handling. All implementations must be thread-safe
/// (Send + Sync).
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists an order header and returns the materialized record with
    /// its service-assigned identifier.
    async fn create_order_header(&self, header: NewOrderHeader) -> Result<OrderHeader>;

    /// Attaches line items to an existing header as a single batch.
    ///
    /// All-or-nothing from the caller's perspective: any partial success
    /// upstream is treated as failure.
    async fn create_order_line_items(
        &self,
        order_id: OrderId,
        items: Vec<NewOrderLineItem>,
    ) -> Result<()>;

    /// Compensating write: marks a header cancelled after its line items
    /// failed to persist.
    ///
    /// Only a `pending` header is touched; cancelling an already-cancelled
    /// header is a no-op so compensation can be retried safely.
    async fn cancel_order_header(&self, order_id: OrderId) -> Result<()>;

    /// Reads an order and its line items back by order number.
    async fn find_by_number(&self, order_number: &str) -> Result<Option<OrderRecord>>;
}

#[async_trait]
impl<T: OrderStore + ?Sized> OrderStore for Arc<T> {
    async fn create_order_header(&self, header: NewOrderHeader) -> Result<OrderHeader> {
        (**self).create_order_header(header).await
    }

    async fn create_order_line_items(
        &self,
        order_id: OrderId,
        items: Vec<NewOrderLineItem>,
    ) -> Result<()> {
        (**self).create_order_line_items(order_id, items).await
    }

    async fn cancel_order_header(&self, order_id: OrderId) -> Result<()> {
        (**self).cancel_order_header(order_id).await
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Option<OrderRecord>> {
        (**self).find_by_number(order_number).await
    }
}
