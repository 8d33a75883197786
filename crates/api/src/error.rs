//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use checkout::CheckoutError;
use domain::CartError;
use order_store::OrderStoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Cart operation error.
    Cart(CartError),
    /// Submission error.
    Checkout(CheckoutError),
    /// Order record service error outside a submission.
    Store(OrderStoreError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Cart(err) => (StatusCode::BAD_REQUEST, err.to_string()),
            ApiError::Checkout(err) => checkout_error_to_response(err),
            ApiError::Store(err) => {
                tracing::error!(error = %err, "order record service error");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
        };

        let body = serde_json::json!({ "error": message });
        (status, axum::Json(body)).into_response()
    }
}

fn checkout_error_to_response(err: CheckoutError) -> (StatusCode, String) {
    match &err {
        CheckoutError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CheckoutError::SubmissionInFlight => (StatusCode::CONFLICT, err.to_string()),
        CheckoutError::Persistence(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

impl From<CartError> for ApiError {
    fn from(err: CartError) -> Self {
        ApiError::Cart(err)
    }
}

impl From<CheckoutError> for ApiError {
    fn from(err: CheckoutError) -> Self {
        ApiError::Checkout(err)
    }
}

impl From<OrderStoreError> for ApiError {
    fn from(err: OrderStoreError) -> Self {
        ApiError::Store(err)
    }
}
