//! Domain layer for the walk-in ordering system.
//!
//! This crate provides the core domain abstractions including:
//! - Value objects shared by the cart and order sides (`Money`, `MenuItemId`)
//! - The cart aggregate: lines, merge semantics, totals, and session mirroring
//! - Order records and the order/payment status state machines
//! - Order number generation

pub mod cart;
pub mod order;
pub mod value_objects;

pub use cart::{
    CartError, CartLine, CartSnapshot, CartStore, FileMirror, InMemoryMirror, LineKey,
    MirrorError, SessionMirror,
};
pub use order::{
    NewOrderHeader, NewOrderLineItem, OrderHeader, OrderLineItem, OrderRecord, OrderStatus,
    PaymentStatus, generate_order_number,
};
pub use value_objects::{CatalogItem, CustomerInfo, MenuItemId, Money, PaymentMethod};
