// storefront/src/stores/mod.rs

//! Persistence contracts and their Postgres implementations.
//!
//! Each store is an object-safe async trait so business rules can run
//! against in-memory stand-ins in tests. Lookups signal absence with
//! `Ok(None)`, never an error; services decide what absence means.

pub mod carts;
pub mod expeditions;
pub mod inventory;
pub mod orders;

pub use carts::{CartStore, PgCartStore};
pub use expeditions::{ExpeditionDirectory, PgExpeditionDirectory};
pub use inventory::{InventoryStore, NewProduct, PgInventoryStore, ProductPatch};
pub use orders::{OrderFilter, OrderLedger, PgOrderLedger, ResolvedLine};
