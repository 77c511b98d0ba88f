// storefront/src/services/carts.rs

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::CartLine;
use crate::services::access::Actor;
use crate::stores::{CartStore, InventoryStore};

#[derive(Clone)]
pub struct CartService {
  inventory: Arc<dyn InventoryStore>,
  carts: Arc<dyn CartStore>,
}

impl CartService {
  pub fn new(inventory: Arc<dyn InventoryStore>, carts: Arc<dyn CartStore>) -> Self {
    Self { inventory, carts }
  }

  /// Adds a product to the caller's cart, snapshotting the current catalog
  /// price into the line. Re-adding a product replaces quantity and
  /// refreshes the snapshot.
  #[instrument(name = "cart::add_line", skip(self, actor), fields(user_id = %actor.user_id, product_id = %product_id, quantity = quantity))]
  pub async fn add_line(&self, actor: &Actor, product_id: Uuid, quantity: i32) -> Result<CartLine> {
    if quantity <= 0 {
      return Err(AppError::InvalidQuantity(quantity));
    }

    let product = self
      .inventory
      .product_by_id(product_id)
      .await?
      .ok_or(AppError::ProductNotFound(product_id))?;

    if product.stock < quantity {
      return Err(AppError::InsufficientStock {
        product_id,
        available: product.stock,
        requested: quantity,
      });
    }

    let line = self
      .carts
      .upsert_line(actor.user_id, product_id, quantity, product.price_cents)
      .await?;
    info!(cart_line_id = %line.id, "Cart line added/updated");
    Ok(line)
  }

  pub async fn lines(&self, actor: &Actor, limit: i64, offset: i64) -> Result<Vec<CartLine>> {
    self.carts.lines_for_user(actor.user_id, limit, offset).await
  }

  #[instrument(name = "cart::remove_line", skip(self, actor), fields(user_id = %actor.user_id, product_id = %product_id))]
  pub async fn remove_line(&self, actor: &Actor, product_id: Uuid) -> Result<()> {
    if self.carts.remove_line(actor.user_id, product_id).await? {
      Ok(())
    } else {
      Err(AppError::CartItemNotFound(product_id))
    }
  }

  /// True iff there was anything to clear.
  pub async fn clear(&self, actor: &Actor) -> Result<bool> {
    self.carts.clear_for_user(actor.user_id).await
  }
}
