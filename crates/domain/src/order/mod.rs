//! Order records, status state machines, and order number generation.

mod number;
mod records;
mod status;

pub use number::generate_order_number;
pub use records::{NewOrderHeader, NewOrderLineItem, OrderHeader, OrderLineItem, OrderRecord};
pub use status::{OrderStatus, PaymentStatus};
