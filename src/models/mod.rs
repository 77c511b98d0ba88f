// storefront/src/models/mod.rs

//! Data structures representing database entities.

pub mod cart_line;
pub mod expedition_service;
pub mod order;
pub mod product;

// Re-export the model structs for convenient access
pub use cart_line::CartLine;
pub use expedition_service::ExpeditionService;
pub use order::{Order, OrderDetails, OrderLine, OrderStatus, OrderStatusRecord};
pub use product::Product;
