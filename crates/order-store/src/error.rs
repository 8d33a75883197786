use common::OrderId;
use thiserror::Error;

/// Errors that can occur when interacting with the order record service.
#[derive(Debug, Error)]
pub enum OrderStoreError {
    /// The referenced order does not exist.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// A database error occurred.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A database migration error occurred.
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// A stored value could not be interpreted.
    #[error("Invalid stored value: {0}")]
    InvalidRecord(String),

    /// The service rejected or could not handle the request.
    #[error("Service unavailable: {0}")]
    Unavailable(String),
}

/// Result type for order store operations.
pub type Result<T> = std::result::Result<T, OrderStoreError>;
