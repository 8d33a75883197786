//! The cart store: owns merge, quantity, and totals logic.

use thiserror::Error;
use tokio::sync::watch;

use super::line::{CartLine, CartSnapshot, LineKey};
use super::mirror::SessionMirror;
use crate::value_objects::{CatalogItem, Money};

/// Errors that can occur during cart operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CartError {
    /// Quantity passed to an add must be at least 1.
    #[error("Invalid quantity: {quantity} (must be greater than 0)")]
    InvalidQuantity { quantity: u32 },
}

/// In-process collection of cart lines, durably mirrored per session.
///
/// The store is scoped to one interactive session, so all mutations run
/// synchronously within the handling of the triggering action. Every
/// mutation rewrites the session mirror in the same turn and notifies
/// subscribers with a fresh snapshot.
pub struct CartStore {
    lines: Vec<CartLine>,
    open: bool,
    mirror: Box<dyn SessionMirror>,
    snapshot_tx: watch::Sender<CartSnapshot>,
}

impl CartStore {
    /// Creates a store by reloading the mirrored lines for this session.
    ///
    /// Absent or corrupt mirror data degrades to an empty cart; it is
    /// logged but never surfaced to the caller. Duplicate identity keys in
    /// the mirrored data (which a well-behaved session never writes) are
    /// merged on load so the in-memory invariant holds from the start.
    pub fn load(mirror: impl SessionMirror + 'static) -> Self {
        let lines = match mirror.load() {
            Ok(lines) => lines,
            Err(e) => {
                tracing::warn!(error = %e, "mirrored cart unreadable, starting empty");
                Vec::new()
            }
        };

        let mut merged: Vec<CartLine> = Vec::with_capacity(lines.len());
        for line in lines {
            match merged.iter_mut().find(|l| l.key() == line.key()) {
                Some(existing) => existing.quantity += line.quantity,
                None => merged.push(line),
            }
        }

        let (snapshot_tx, _) = watch::channel(CartSnapshot::new(merged.clone()));
        Self {
            lines: merged,
            open: false,
            mirror: Box::new(mirror),
            snapshot_tx,
        }
    }

    /// Adds a catalog item to the cart.
    ///
    /// An existing line with the same `(item, special instructions)` key
    /// has its quantity incremented; otherwise a new line is appended. As
    /// a side effect the cart-view intent flag is raised.
    pub fn add_item(
        &mut self,
        item: &CatalogItem,
        quantity: u32,
        special_instructions: &str,
    ) -> Result<(), CartError> {
        if quantity == 0 {
            return Err(CartError::InvalidQuantity { quantity });
        }

        let key = LineKey::new(item.id.clone(), special_instructions);
        match self.lines.iter_mut().find(|l| l.key() == key) {
            Some(line) => line.quantity += quantity,
            None => self
                .lines
                .push(CartLine::new(item, quantity, special_instructions)),
        }
        self.open = true;
        self.committed();
        Ok(())
    }

    /// Replaces a line's quantity.
    ///
    /// A quantity of zero behaves exactly like [`remove_item`]. A missing
    /// key is a no-op, not an error.
    ///
    /// [`remove_item`]: CartStore::remove_item
    pub fn update_quantity(&mut self, key: &LineKey, quantity: u32) {
        if quantity == 0 {
            self.remove_item(key);
            return;
        }

        if let Some(line) = self.lines.iter_mut().find(|l| l.key() == *key) {
            line.quantity = quantity;
            self.committed();
        }
    }

    /// Deletes the line with the given key, if present.
    pub fn remove_item(&mut self, key: &LineKey) {
        let before = self.lines.len();
        self.lines.retain(|l| l.key() != *key);
        if self.lines.len() != before {
            self.committed();
        }
    }

    /// Empties the cart and resets the cart-view intent flag.
    pub fn clear(&mut self) {
        self.lines.clear();
        self.open = false;
        self.committed();
    }

    /// Sum of `unit_price * quantity` over all lines. Always derived,
    /// never cached.
    pub fn total_price(&self) -> Money {
        self.lines.iter().map(CartLine::total_price).sum()
    }

    /// Sum of quantities over all lines.
    pub fn total_items(&self) -> u32 {
        self.lines.iter().map(|l| l.quantity).sum()
    }

    /// Returns the current lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// Returns true if the cart holds no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Returns the cart-view intent flag: whether the cart panel should be
    /// shown after the last mutation.
    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Overrides the cart-view intent flag (e.g. when the user closes the
    /// panel).
    pub fn set_open(&mut self, open: bool) {
        self.open = open;
    }

    /// Takes an immutable copy of the current lines.
    pub fn snapshot(&self) -> CartSnapshot {
        CartSnapshot::new(self.lines.clone())
    }

    /// Subscribes to cart changes. The receiver observes a fresh snapshot
    /// after every mutation.
    pub fn subscribe(&self) -> watch::Receiver<CartSnapshot> {
        self.snapshot_tx.subscribe()
    }

    /// Mirrors the full line collection and notifies subscribers.
    ///
    /// Mirror failures must not break the in-memory cart; they are logged
    /// and the session continues un-mirrored.
    fn committed(&mut self) {
        if let Err(e) = self.mirror.save(&self.lines) {
            tracing::warn!(error = %e, "failed to mirror cart");
        }
        self.snapshot_tx.send_replace(self.snapshot());
    }
}
