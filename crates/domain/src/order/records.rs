//! Persisted order records and their input forms.

use chrono::{DateTime, Utc};
use common::OrderId;
use serde::{Deserialize, Serialize};

use super::status::{OrderStatus, PaymentStatus};
use crate::cart::CartLine;
use crate::value_objects::{CustomerInfo, MenuItemId, Money, PaymentMethod};

/// Input record for creating an order header.
///
/// Everything except the service-assigned `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderHeader {
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_notes: String,
    pub payment_method: PaymentMethod,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
}

impl NewOrderHeader {
    /// Builds the header for a fresh submission attempt: both statuses
    /// start out pending.
    pub fn pending(order_number: String, customer: &CustomerInfo, total_amount: Money) -> Self {
        Self {
            order_number,
            customer_name: customer.name.clone(),
            customer_phone: customer.phone.clone(),
            customer_notes: customer.notes.clone(),
            payment_method: customer.payment_method,
            total_amount,
            status: OrderStatus::Pending,
            payment_status: PaymentStatus::Pending,
        }
    }
}

/// The top-level persisted order record.
///
/// Immutable after creation from this core's perspective; later status
/// transitions are driven by staff through other tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderHeader {
    pub id: OrderId,
    pub order_number: String,
    pub customer_name: String,
    pub customer_phone: String,
    pub customer_notes: String,
    pub payment_method: PaymentMethod,
    pub total_amount: Money,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl OrderHeader {
    /// Materializes a header from its input record, as the persistence
    /// service does on write.
    pub fn from_input(id: OrderId, input: NewOrderHeader, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            order_number: input.order_number,
            customer_name: input.customer_name,
            customer_phone: input.customer_phone,
            customer_notes: input.customer_notes,
            payment_method: input.payment_method,
            total_amount: input.total_amount,
            status: input.status,
            payment_status: input.payment_status,
            created_at,
        }
    }
}

/// Input record for one order line item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewOrderLineItem {
    pub item_id: MenuItemId,
    pub quantity: u32,
    /// Price snapshot at submission time, decoupled from later catalog
    /// price changes.
    pub unit_price: Money,
    pub total_price: Money,
    pub special_instructions: String,
}

impl NewOrderLineItem {
    /// Freezes one cart line into an order line item input.
    pub fn from_cart_line(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.clone(),
            quantity: line.quantity,
            unit_price: line.unit_price,
            total_price: line.total_price(),
            special_instructions: line.special_instructions.clone(),
        }
    }
}

/// A persisted snapshot of one cart line, attached to its order header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub order_id: OrderId,
    pub item_id: MenuItemId,
    pub quantity: u32,
    pub unit_price: Money,
    pub total_price: Money,
    pub special_instructions: String,
}

impl OrderLineItem {
    /// Attaches a line item input to its parent header.
    pub fn from_input(order_id: OrderId, input: NewOrderLineItem) -> Self {
        Self {
            order_id,
            item_id: input.item_id,
            quantity: input.quantity,
            unit_price: input.unit_price,
            total_price: input.total_price,
            special_instructions: input.special_instructions,
        }
    }
}

/// An order header together with its line items, as read back from the
/// persistence service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRecord {
    pub header: OrderHeader,
    pub items: Vec<OrderLineItem>,
}

impl OrderRecord {
    /// Sum of line item totals; equals `header.total_amount` for any order
    /// this core created.
    pub fn items_total(&self) -> Money {
        self.items.iter().map(|i| i.total_price).sum()
    }
}
