//! Cart aggregate: lines, merge semantics, totals, and session mirroring.

mod line;
mod mirror;
mod store;

pub use line::{CartLine, CartSnapshot, LineKey};
pub use mirror::{FileMirror, InMemoryMirror, MirrorError, SessionMirror};
pub use store::{CartError, CartStore};
