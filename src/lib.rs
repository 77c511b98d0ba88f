// storefront/src/lib.rs

//! A layered e-commerce backend: HTTP handlers validate input and format
//! output, services apply business rules, stores persist to PostgreSQL.
//! The heart of the system is the checkout workflow in
//! [`services::orders::OrderService`].

pub mod config;
pub mod errors;
pub mod models;
pub mod services;
pub mod state;
pub mod stores;
pub mod web;
