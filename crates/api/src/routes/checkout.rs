//! Checkout submission and order lookup endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use domain::{CustomerInfo, OrderRecord, PaymentMethod};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CheckoutRequest {
    pub customer_name: String,
    pub customer_phone: String,
    #[serde(default)]
    pub customer_notes: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
}

#[derive(Serialize)]
pub struct CheckoutResponse {
    pub order_number: String,
}

#[derive(Serialize)]
pub struct OrderItemResponse {
    pub item_id: String,
    pub quantity: u32,
    pub unit_price_cents: i64,
    pub total_price_cents: i64,
    pub special_instructions: String,
}

#[derive(Serialize)]
pub struct OrderResponse {
    pub order_number: String,
    pub customer_name: String,
    pub status: String,
    pub payment_status: String,
    pub payment_method: String,
    pub total_amount_cents: i64,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub items: Vec<OrderItemResponse>,
}

impl From<OrderRecord> for OrderResponse {
    fn from(record: OrderRecord) -> Self {
        Self {
            order_number: record.header.order_number,
            customer_name: record.header.customer_name,
            status: record.header.status.as_str().to_string(),
            payment_status: record.header.payment_status.as_str().to_string(),
            payment_method: record.header.payment_method.as_str().to_string(),
            total_amount_cents: record.header.total_amount.cents(),
            created_at: record.header.created_at,
            items: record
                .items
                .into_iter()
                .map(|item| OrderItemResponse {
                    item_id: item.item_id.to_string(),
                    quantity: item.quantity,
                    unit_price_cents: item.unit_price.cents(),
                    total_price_cents: item.total_price.cents(),
                    special_instructions: item.special_instructions,
                })
                .collect(),
        }
    }
}

/// POST /checkout — submits the session cart as an order.
#[tracing::instrument(skip(state, req), fields(customer_name = %req.customer_name))]
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CheckoutRequest>,
) -> Result<(StatusCode, Json<CheckoutResponse>), ApiError> {
    let customer = CustomerInfo {
        name: req.customer_name,
        phone: req.customer_phone,
        notes: req.customer_notes,
        payment_method: req.payment_method,
    };

    let mut cart = state.cart.lock().await;
    let order_number = state.submitter.submit(&mut cart, &customer).await?;
    Ok((StatusCode::CREATED, Json(CheckoutResponse { order_number })))
}

/// GET /orders/{order_number} — looks up a submitted order by its
/// human-facing number.
pub async fn find_order(
    State(state): State<Arc<AppState>>,
    Path(order_number): Path<String>,
) -> Result<Json<OrderResponse>, ApiError> {
    let record = state
        .orders
        .find_by_number(&order_number)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Order {order_number} not found")))?;
    Ok(Json(record.into()))
}
