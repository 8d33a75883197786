//! Read-only catalog of orderable items.
//!
//! Consumed, not owned: the catalog supplies the id, name, and price used
//! to populate a cart line at add-time. Anything beyond that (categories,
//! descriptions, availability management) belongs to other tooling.

use async_trait::async_trait;
use domain::{CatalogItem, MenuItemId, Money};
use sqlx::{PgPool, Row};

use crate::Result;

/// Trait for catalog sources.
#[async_trait]
pub trait Catalog: Send + Sync {
    /// Lists all currently orderable items.
    async fn list_available_items(&self) -> Result<Vec<CatalogItem>>;

    /// Looks up a single orderable item by ID.
    ///
    /// Returns None for unknown or currently unavailable items.
    async fn find_item(&self, id: &MenuItemId) -> Result<Option<CatalogItem>>;
}

/// Fixed in-memory catalog for tests and demo deployments.
#[derive(Debug, Clone, Default)]
pub struct StaticCatalog {
    items: Vec<CatalogItem>,
}

impl StaticCatalog {
    /// Creates a catalog from a fixed item list.
    pub fn new(items: Vec<CatalogItem>) -> Self {
        Self { items }
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_available_items(&self) -> Result<Vec<CatalogItem>> {
        Ok(self.items.clone())
    }

    async fn find_item(&self, id: &MenuItemId) -> Result<Option<CatalogItem>> {
        Ok(self.items.iter().find(|i| &i.id == id).cloned())
    }
}

/// PostgreSQL-backed catalog reading the `menu_items` table.
#[derive(Clone)]
pub struct PostgresCatalog {
    pool: PgPool,
}

impl PostgresCatalog {
    /// Creates a new PostgreSQL catalog.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl Catalog for PostgresCatalog {
    async fn list_available_items(&self) -> Result<Vec<CatalogItem>> {
        let rows = sqlx::query(
            "SELECT id, name, price_cents FROM menu_items WHERE is_available ORDER BY name",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter()
            .map(|row| {
                Ok(CatalogItem {
                    id: MenuItemId::new(row.try_get::<String, _>("id")?),
                    name: row.try_get("name")?,
                    price: Money::from_cents(row.try_get("price_cents")?),
                })
            })
            .collect()
    }

    async fn find_item(&self, id: &MenuItemId) -> Result<Option<CatalogItem>> {
        let row = sqlx::query(
            "SELECT id, name, price_cents FROM menu_items WHERE id = $1 AND is_available",
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        row.map(|row| {
            Ok(CatalogItem {
                id: MenuItemId::new(row.try_get::<String, _>("id")?),
                name: row.try_get("name")?,
                price: Money::from_cents(row.try_get("price_cents")?),
            })
        })
        .transpose()
    }
}
