// storefront/src/state.rs

use std::sync::Arc;

use sqlx::PgPool;

use crate::config::AppConfig;
use crate::services::{CartService, OrderService};
use crate::stores::{
  ExpeditionDirectory, InventoryStore, PgCartStore, PgExpeditionDirectory, PgInventoryStore, PgOrderLedger,
};

#[derive(Clone)]
pub struct AppState {
  pub config: Arc<AppConfig>,
  pub inventory: Arc<dyn InventoryStore>,
  pub expeditions: Arc<dyn ExpeditionDirectory>,
  pub carts: CartService,
  pub orders: OrderService,
}

impl AppState {
  /// Wires the Postgres-backed stores into the service graph.
  pub fn new(db_pool: PgPool, config: Arc<AppConfig>) -> Self {
    let inventory: Arc<dyn InventoryStore> = Arc::new(PgInventoryStore::new(db_pool.clone()));
    let cart_store = Arc::new(PgCartStore::new(db_pool.clone()));
    let expeditions: Arc<dyn ExpeditionDirectory> = Arc::new(PgExpeditionDirectory::new(db_pool.clone()));
    let ledger = Arc::new(PgOrderLedger::new(db_pool));

    let carts = CartService::new(inventory.clone(), cart_store.clone());
    let orders = OrderService::new(inventory.clone(), cart_store, expeditions.clone(), ledger);

    Self {
      config,
      inventory,
      expeditions,
      carts,
      orders,
    }
  }
}
