//! Persistence adapters for the remote order record service.
//!
//! The [`OrderStore`] trait is the narrow contract this system consumes:
//! create an order header, attach its line items as one batch, compensate
//! a header whose items never made it, and read an order back by number.
//! The [`Catalog`] trait covers the read-only menu source. Both come with
//! an in-memory implementation for tests and a PostgreSQL implementation
//! for deployment.

pub mod catalog;
pub mod error;
pub mod memory;
pub mod postgres;
pub mod store;

pub use catalog::{Catalog, PostgresCatalog, StaticCatalog};
pub use error::{OrderStoreError, Result};
pub use memory::InMemoryOrderStore;
pub use postgres::PostgresOrderStore;
pub use store::OrderStore;
