//! Menu pass-through endpoint.
//!
//! Thin read over the catalog reader; the core only needs id, name, and
//! price to populate cart lines.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use domain::CatalogItem;
use serde::Serialize;

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct MenuItemResponse {
    pub id: String,
    pub name: String,
    pub price_cents: i64,
}

impl From<CatalogItem> for MenuItemResponse {
    fn from(item: CatalogItem) -> Self {
        Self {
            id: item.id.to_string(),
            name: item.name,
            price_cents: item.price.cents(),
        }
    }
}

/// GET /menu — lists currently orderable items.
#[tracing::instrument(skip(state))]
pub async fn list(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<MenuItemResponse>>, ApiError> {
    let items = state.catalog.list_available_items().await?;
    Ok(Json(items.into_iter().map(Into::into).collect()))
}
