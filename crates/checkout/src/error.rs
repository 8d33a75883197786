use order_store::OrderStoreError;
use thiserror::Error;

/// Pre-flight rejections, always detected before any remote call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// An empty cart cannot be submitted.
    #[error("Cart is empty")]
    EmptyCart,

    /// Customer name is required.
    #[error("Customer name is required")]
    MissingName,

    /// Customer phone number is required.
    #[error("Customer phone number is required")]
    MissingPhone,
}

/// Errors that can occur during order submission.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// The submission was rejected before any network interaction.
    #[error("Validation failed: {0}")]
    Validation(#[from] ValidationError),

    /// A remote write failed; the cart was preserved for retry.
    #[error("Order could not be saved: {0}")]
    Persistence(#[source] OrderStoreError),

    /// Another submission for this session is still in flight.
    #[error("A submission is already in progress")]
    SubmissionInFlight,
}
