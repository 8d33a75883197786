use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use chrono::Utc;
use common::OrderId;
use domain::{NewOrderHeader, NewOrderLineItem, OrderHeader, OrderLineItem, OrderRecord,
    OrderStatus};

use crate::error::{OrderStoreError, Result};
use crate::store::OrderStore;

#[derive(Debug, Default)]
struct InMemoryState {
    headers: HashMap<OrderId, OrderHeader>,
    items: HashMap<OrderId, Vec<OrderLineItem>>,
    insertion_order: Vec<OrderId>,
    fail_on_create_header: bool,
    fail_on_create_items: bool,
    fail_on_cancel: bool,
    create_header_calls: usize,
    create_items_calls: usize,
    cancel_calls: usize,
}

/// In-memory order store implementation for testing.
///
/// Stores records behind a shared lock and exposes the same interface as
/// the PostgreSQL implementation, plus failure injection and call
/// counters so tests can assert exactly which remote writes happened.
#[derive(Debug, Clone, Default)]
pub struct InMemoryOrderStore {
    state: Arc<RwLock<InMemoryState>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the store to fail header creation.
    pub fn set_fail_on_create_header(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create_header = fail;
    }

    /// Configures the store to fail line item batches.
    pub fn set_fail_on_create_items(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create_items = fail;
    }

    /// Configures the store to fail the compensating cancel.
    pub fn set_fail_on_cancel(&self, fail: bool) {
        self.state.write().unwrap().fail_on_cancel = fail;
    }

    /// Returns the number of persisted headers.
    pub fn header_count(&self) -> usize {
        self.state.read().unwrap().headers.len()
    }

    /// Returns all persisted headers in insertion order.
    pub fn headers(&self) -> Vec<OrderHeader> {
        let state = self.state.read().unwrap();
        state
            .insertion_order
            .iter()
            .filter_map(|id| state.headers.get(id).cloned())
            .collect()
    }

    /// Returns the line items attached to an order, if any.
    pub fn line_items(&self, order_id: OrderId) -> Vec<OrderLineItem> {
        self.state
            .read()
            .unwrap()
            .items
            .get(&order_id)
            .cloned()
            .unwrap_or_default()
    }

    /// Number of `create_order_header` calls received, including failed
    /// ones.
    pub fn create_header_calls(&self) -> usize {
        self.state.read().unwrap().create_header_calls
    }

    /// Number of `create_order_line_items` calls received, including
    /// failed ones.
    pub fn create_items_calls(&self) -> usize {
        self.state.read().unwrap().create_items_calls
    }

    /// Number of `cancel_order_header` calls received, including failed
    /// ones.
    pub fn cancel_calls(&self) -> usize {
        self.state.read().unwrap().cancel_calls
    }

    /// Total remote calls received across all operations.
    pub fn total_calls(&self) -> usize {
        let state = self.state.read().unwrap();
        state.create_header_calls + state.create_items_calls + state.cancel_calls
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn create_order_header(&self, header: NewOrderHeader) -> Result<OrderHeader> {
        let mut state = self.state.write().unwrap();
        state.create_header_calls += 1;

        if state.fail_on_create_header {
            return Err(OrderStoreError::Unavailable(
                "injected header write failure".to_string(),
            ));
        }

        let id = OrderId::new();
        let record = OrderHeader::from_input(id, header, Utc::now());
        state.headers.insert(id, record.clone());
        state.insertion_order.push(id);
        Ok(record)
    }

    async fn create_order_line_items(
        &self,
        order_id: OrderId,
        items: Vec<NewOrderLineItem>,
    ) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.create_items_calls += 1;

        if state.fail_on_create_items {
            return Err(OrderStoreError::Unavailable(
                "injected line item write failure".to_string(),
            ));
        }

        if !state.headers.contains_key(&order_id) {
            return Err(OrderStoreError::OrderNotFound(order_id));
        }

        let rows = items
            .into_iter()
            .map(|input| OrderLineItem::from_input(order_id, input))
            .collect();
        state.items.insert(order_id, rows);
        Ok(())
    }

    async fn cancel_order_header(&self, order_id: OrderId) -> Result<()> {
        let mut state = self.state.write().unwrap();
        state.cancel_calls += 1;

        if state.fail_on_cancel {
            return Err(OrderStoreError::Unavailable(
                "injected cancel failure".to_string(),
            ));
        }

        let header = state
            .headers
            .get_mut(&order_id)
            .ok_or(OrderStoreError::OrderNotFound(order_id))?;
        if header.status == OrderStatus::Pending {
            header.status = OrderStatus::Cancelled;
        }
        Ok(())
    }

    async fn find_by_number(&self, order_number: &str) -> Result<Option<OrderRecord>> {
        let state = self.state.read().unwrap();
        let header = state
            .headers
            .values()
            .find(|h| h.order_number == order_number)
            .cloned();
        Ok(header.map(|header| {
            let items = state.items.get(&header.id).cloned().unwrap_or_default();
            OrderRecord { header, items }
        }))
    }
}
