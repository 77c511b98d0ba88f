// storefront/src/services/mod.rs

//! Business rules. Services own the workflow logic and talk to persistence
//! only through the store traits.

pub mod access;
pub mod carts;
pub mod orders;

pub use access::{Actor, Role};
pub use carts::CartService;
pub use orders::{NewOrder, OrderItemRequest, OrderService};
