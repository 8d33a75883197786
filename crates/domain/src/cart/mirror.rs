//! Durable per-session mirror of the cart's lines.
//!
//! Every cart mutation rewrites the full line collection into a single
//! fixed slot; at session start the store reloads from it. The persisted
//! format is a JSON array of [`CartLine`] records and must round-trip
//! losslessly. Absent or corrupt data degrades to an empty cart at the
//! store level rather than failing.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use thiserror::Error;

use super::line::CartLine;

/// Errors that can occur while reading or writing the mirror slot.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// The underlying storage failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The slot content could not be (de)serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A durable key-value slot holding the serialized cart.
pub trait SessionMirror: Send + Sync {
    /// Serializes the full line collection into the slot, replacing any
    /// previous content.
    fn save(&self, lines: &[CartLine]) -> Result<(), MirrorError>;

    /// Loads the line collection from the slot.
    ///
    /// An absent slot is an empty cart, not an error. Corrupt content is
    /// an error; the caller decides how to degrade.
    fn load(&self) -> Result<Vec<CartLine>, MirrorError>;
}

/// In-memory mirror used in tests and as the default when no durable
/// directory is configured.
#[derive(Debug, Clone, Default)]
pub struct InMemoryMirror {
    slot: Arc<RwLock<Option<String>>>,
}

impl InMemoryMirror {
    /// Creates a new empty mirror.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the raw slot content, bypassing serialization.
    ///
    /// Lets tests inject corrupt data.
    pub fn set_raw(&self, raw: impl Into<String>) {
        *self.slot.write().unwrap() = Some(raw.into());
    }

    /// Returns the raw slot content, if any.
    pub fn raw(&self) -> Option<String> {
        self.slot.read().unwrap().clone()
    }
}

impl SessionMirror for InMemoryMirror {
    fn save(&self, lines: &[CartLine]) -> Result<(), MirrorError> {
        let json = serde_json::to_string(lines)?;
        *self.slot.write().unwrap() = Some(json);
        Ok(())
    }

    fn load(&self) -> Result<Vec<CartLine>, MirrorError> {
        match self.slot.read().unwrap().as_deref() {
            Some(json) => Ok(serde_json::from_str(json)?),
            None => Ok(Vec::new()),
        }
    }
}

/// File-backed mirror storing the cart as `cart.json` under a session
/// directory.
#[derive(Debug, Clone)]
pub struct FileMirror {
    path: PathBuf,
}

impl FileMirror {
    const SLOT_FILE: &'static str = "cart.json";

    /// Creates a mirror rooted at the given session directory.
    ///
    /// The directory is created if it does not exist yet.
    pub fn new(session_dir: impl AsRef<Path>) -> Result<Self, MirrorError> {
        let dir = session_dir.as_ref();
        std::fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join(Self::SLOT_FILE),
        })
    }

    /// Returns the path of the slot file.
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionMirror for FileMirror {
    fn save(&self, lines: &[CartLine]) -> Result<(), MirrorError> {
        let json = serde_json::to_string(lines)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn load(&self) -> Result<Vec<CartLine>, MirrorError> {
        match std::fs::read_to_string(&self.path) {
            Ok(json) => Ok(serde_json::from_str(&json)?),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value_objects::{CatalogItem, Money};

    fn sample_lines() -> Vec<CartLine> {
        let item = CatalogItem::new("dish-001", "Kung Pao Chicken", Money::from_cents(4200));
        vec![CartLine::new(&item, 2, "no peanuts")]
    }

    #[test]
    fn memory_mirror_roundtrip() {
        let mirror = InMemoryMirror::new();
        let lines = sample_lines();

        mirror.save(&lines).unwrap();
        assert_eq!(mirror.load().unwrap(), lines);
    }

    #[test]
    fn memory_mirror_empty_slot_loads_empty() {
        let mirror = InMemoryMirror::new();
        assert!(mirror.load().unwrap().is_empty());
    }

    #[test]
    fn memory_mirror_corrupt_slot_is_an_error() {
        let mirror = InMemoryMirror::new();
        mirror.set_raw("{not json");
        assert!(matches!(
            mirror.load(),
            Err(MirrorError::Serialization(_))
        ));
    }

    #[test]
    fn file_mirror_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path()).unwrap();
        let lines = sample_lines();

        mirror.save(&lines).unwrap();
        assert_eq!(mirror.load().unwrap(), lines);
    }

    #[test]
    fn file_mirror_missing_file_loads_empty() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path()).unwrap();
        assert!(mirror.load().unwrap().is_empty());
    }

    #[test]
    fn file_mirror_corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mirror = FileMirror::new(dir.path()).unwrap();
        std::fs::write(mirror.path(), "][").unwrap();
        assert!(mirror.load().is_err());
    }
}
