//! Cart operation endpoints.
//!
//! All cart mutations are keyed by the `(item_id, special_instructions)`
//! identity pair and respond with the full updated cart.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::{CartLine, CartStore, LineKey, MenuItemId};
use serde::{Deserialize, Serialize};

use crate::AppState;
use crate::error::ApiError;

// -- Request types --

#[derive(Deserialize)]
pub struct AddItemRequest {
    pub item_id: String,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
    #[serde(default)]
    pub special_instructions: String,
}

fn default_quantity() -> u32 {
    1
}

#[derive(Deserialize)]
pub struct UpdateQuantityRequest {
    pub item_id: String,
    #[serde(default)]
    pub special_instructions: String,
    pub quantity: u32,
}

#[derive(Deserialize)]
pub struct RemoveItemRequest {
    pub item_id: String,
    #[serde(default)]
    pub special_instructions: String,
}

// -- Response types --

#[derive(Serialize)]
pub struct CartLineResponse {
    pub item_id: String,
    pub name: String,
    pub unit_price_cents: i64,
    pub quantity: u32,
    pub special_instructions: String,
}

impl From<&CartLine> for CartLineResponse {
    fn from(line: &CartLine) -> Self {
        Self {
            item_id: line.item_id.to_string(),
            name: line.name.clone(),
            unit_price_cents: line.unit_price.cents(),
            quantity: line.quantity,
            special_instructions: line.special_instructions.clone(),
        }
    }
}

#[derive(Serialize)]
pub struct CartResponse {
    pub lines: Vec<CartLineResponse>,
    pub total_cents: i64,
    pub total_items: u32,
    pub open: bool,
}

impl CartResponse {
    fn from_store(cart: &CartStore) -> Self {
        Self {
            lines: cart.lines().iter().map(Into::into).collect(),
            total_cents: cart.total_price().cents(),
            total_items: cart.total_items(),
            open: cart.is_open(),
        }
    }
}

// -- Handlers --

/// GET /cart — returns the session cart.
pub async fn get(State(state): State<Arc<AppState>>) -> Json<CartResponse> {
    let cart = state.cart.lock().await;
    Json(CartResponse::from_store(&cart))
}

/// POST /cart/items — adds a catalog item to the cart.
#[tracing::instrument(skip(state, req), fields(item_id = %req.item_id))]
pub async fn add_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let item_id = MenuItemId::new(req.item_id);
    let item = state
        .catalog
        .find_item(&item_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Menu item {item_id} not found")))?;

    let mut cart = state.cart.lock().await;
    cart.add_item(&item, req.quantity, &req.special_instructions)?;
    Ok(Json(CartResponse::from_store(&cart)))
}

/// PUT /cart/items — replaces a line's quantity (zero removes it).
pub async fn update_quantity(
    State(state): State<Arc<AppState>>,
    Json(req): Json<UpdateQuantityRequest>,
) -> Json<CartResponse> {
    let key = LineKey::new(req.item_id, req.special_instructions);
    let mut cart = state.cart.lock().await;
    cart.update_quantity(&key, req.quantity);
    Json(CartResponse::from_store(&cart))
}

/// DELETE /cart/items — removes a line.
pub async fn remove_item(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RemoveItemRequest>,
) -> Json<CartResponse> {
    let key = LineKey::new(req.item_id, req.special_instructions);
    let mut cart = state.cart.lock().await;
    cart.remove_item(&key);
    Json(CartResponse::from_store(&cart))
}

/// DELETE /cart — empties the cart.
pub async fn clear(State(state): State<Arc<AppState>>) -> Json<CartResponse> {
    let mut cart = state.cart.lock().await;
    cart.clear();
    Json(CartResponse::from_store(&cart))
}
