//! Order submission protocol.
//!
//! Converts a cart snapshot plus customer form data into two dependent
//! writes against the order record service: the order header first, then
//! its line items as one batch. There is no transaction across the two
//! writes, so the submitter compensates a header whose line items never
//! made it by marking it cancelled, and always leaves the cart untouched
//! on failure so the user can retry. Retries are user-initiated only.

pub mod error;
pub mod submitter;

pub use error::{CheckoutError, ValidationError};
pub use submitter::OrderSubmitter;
