//! Cart lines and their identity key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::value_objects::{CatalogItem, MenuItemId, Money};

/// Identity key of a cart line.
///
/// Two additions merge into one line exactly when both the item and the
/// special instructions match. The key is an explicit composite so that
/// delimiter characters inside instructions text can never cause two
/// distinct lines to collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineKey {
    /// The catalog item the line refers to.
    pub item_id: MenuItemId,

    /// Special instructions attached to the line (possibly empty).
    pub special_instructions: String,
}

impl LineKey {
    /// Creates a new line key.
    pub fn new(item_id: impl Into<MenuItemId>, special_instructions: impl Into<String>) -> Self {
        Self {
            item_id: item_id.into(),
            special_instructions: special_instructions.into(),
        }
    }
}

/// One distinct (item, special-instructions) entry in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartLine {
    /// The catalog item the line refers to.
    pub item_id: MenuItemId,

    /// Item name, copied from the catalog at add-time.
    pub name: String,

    /// Unit price, copied from the catalog at add-time.
    pub unit_price: Money,

    /// Quantity; always at least 1 while the line exists.
    pub quantity: u32,

    /// Special instructions attached to the line (possibly empty).
    pub special_instructions: String,

    /// When the line was first added to the cart.
    pub added_at: DateTime<Utc>,
}

impl CartLine {
    /// Creates a new line for a catalog item, timestamped now.
    pub fn new(item: &CatalogItem, quantity: u32, special_instructions: impl Into<String>) -> Self {
        Self {
            item_id: item.id.clone(),
            name: item.name.clone(),
            unit_price: item.price,
            quantity,
            special_instructions: special_instructions.into(),
            added_at: Utc::now(),
        }
    }

    /// Returns the identity key of this line.
    pub fn key(&self) -> LineKey {
        LineKey {
            item_id: self.item_id.clone(),
            special_instructions: self.special_instructions.clone(),
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn total_price(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// An immutable copy of the cart's lines.
///
/// Taken once at the start of a submission attempt and treated as frozen
/// for its duration, so later cart or catalog changes cannot leak into an
/// order being written.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CartSnapshot {
    lines: Vec<CartLine>,
}

impl CartSnapshot {
    /// Creates a snapshot from a copy of the cart's lines.
    pub fn new(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }

    /// Returns the snapshotted lines.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns true if the snapshot holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Sum of line totals over all lines.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }
}
