// storefront/src/services/orders.rs

//! The checkout orchestrator and the order read/update entry points.

use std::sync::Arc;

use serde::Deserialize;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

use crate::errors::{AppError, Result};
use crate::models::{OrderDetails, OrderStatus, OrderStatusRecord};
use crate::services::access::{self, Actor};
use crate::stores::{CartStore, ExpeditionDirectory, InventoryStore, OrderFilter, OrderLedger, ResolvedLine};

// Cart-sourced checkouts read one bounded page, effectively "the whole
// cart" for any realistic user.
const CART_FETCH_LIMIT: i64 = 1000;

/// One requested purchase line. Without `price_at_time` the product's
/// current catalog price is used.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderItemRequest {
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_at_time: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct NewOrder {
  pub expedition_service_id: Uuid,
  pub items: Option<Vec<OrderItemRequest>>,
}

#[derive(Clone)]
pub struct OrderService {
  inventory: Arc<dyn InventoryStore>,
  carts: Arc<dyn CartStore>,
  expeditions: Arc<dyn ExpeditionDirectory>,
  ledger: Arc<dyn OrderLedger>,
}

impl OrderService {
  pub fn new(
    inventory: Arc<dyn InventoryStore>,
    carts: Arc<dyn CartStore>,
    expeditions: Arc<dyn ExpeditionDirectory>,
    ledger: Arc<dyn OrderLedger>,
  ) -> Self {
    Self {
      inventory,
      carts,
      expeditions,
      ledger,
    }
  }

  /// Creates an order from the explicit item list, or from the caller's
  /// cart when no items are given. Stock is reserved line by line through
  /// the atomic conditional decrement; if any line fails, every
  /// reservation already taken in this call is handed back before the
  /// error surfaces.
  #[instrument(
    name = "orders::create",
    skip(self, actor, new_order),
    fields(user_id = %actor.user_id, expedition_service_id = %new_order.expedition_service_id)
  )]
  pub async fn create_order(&self, actor: &Actor, new_order: NewOrder) -> Result<OrderDetails> {
    self
      .expeditions
      .by_id(new_order.expedition_service_id)
      .await?
      .ok_or(AppError::ExpeditionNotFound(new_order.expedition_service_id))?;

    let explicit = new_order.items.unwrap_or_default();
    let (requested, sourced_from_cart) = if explicit.is_empty() {
      let cart = self.carts.lines_for_user(actor.user_id, CART_FETCH_LIMIT, 0).await?;
      if cart.is_empty() {
        return Err(AppError::EmptyCart);
      }
      let items = cart
        .into_iter()
        .map(|line| OrderItemRequest {
          product_id: line.product_id,
          quantity: line.quantity,
          price_at_time: Some(line.price_at_time),
        })
        .collect();
      (items, true)
    } else {
      (explicit, false)
    };

    let mut reserved: Vec<ResolvedLine> = Vec::with_capacity(requested.len());
    for item in &requested {
      if let Err(err) = self.resolve_and_reserve(item, &mut reserved).await {
        self.release_reservations(&reserved).await;
        return Err(err);
      }
    }

    let order = match self
      .ledger
      .create(actor.user_id, new_order.expedition_service_id, &reserved)
      .await
    {
      Ok(order) => order,
      Err(err) => {
        self.release_reservations(&reserved).await;
        return Err(err);
      }
    };

    if sourced_from_cart {
      // Best-effort: the order stands even when cleanup fails; stale cart
      // lines are visible to the user and harmless.
      if let Err(err) = self.carts.clear_for_user(actor.user_id).await {
        warn!(order_id = %order.id, error = %err, "Order persisted but cart cleanup failed");
      }
    }

    info!(order_id = %order.id, total = order.total, items = order.items.len(), "Transaction created");
    Ok(order)
  }

  async fn resolve_and_reserve(&self, item: &OrderItemRequest, reserved: &mut Vec<ResolvedLine>) -> Result<()> {
    if item.quantity <= 0 {
      return Err(AppError::InvalidQuantity(item.quantity));
    }

    let product = self
      .inventory
      .product_by_id(item.product_id)
      .await?
      .ok_or(AppError::ProductNotFound(item.product_id))?;

    if product.stock < item.quantity {
      return Err(AppError::InsufficientStock {
        product_id: item.product_id,
        available: product.stock,
        requested: item.quantity,
      });
    }

    let unit_price = item.price_at_time.unwrap_or(product.price_cents);

    // The conditional decrement is the authoritative guard; the read above
    // only exists to produce a useful error message. Losing the race to a
    // concurrent checkout fails the same way as plain shortage.
    if !self.inventory.reserve_stock(item.product_id, item.quantity).await? {
      return Err(AppError::InsufficientStock {
        product_id: item.product_id,
        available: product.stock,
        requested: item.quantity,
      });
    }

    reserved.push(ResolvedLine {
      product_id: item.product_id,
      quantity: item.quantity,
      price_at_time: unit_price,
    });
    Ok(())
  }

  async fn release_reservations(&self, reserved: &[ResolvedLine]) {
    for line in reserved {
      if let Err(err) = self.inventory.release_stock(line.product_id, line.quantity).await {
        // The discrepancy needs operator attention; there is nothing more
        // this call can do about it.
        error!(product_id = %line.product_id, quantity = line.quantity, error = %err, "Failed to release reserved stock");
      }
    }
  }

  pub async fn order_by_id(&self, actor: &Actor, order_id: Uuid) -> Result<OrderDetails> {
    let order = self.ledger.by_id(order_id).await?.ok_or(AppError::OrderNotFound(order_id))?;
    access::ensure_owner_or_admin(actor, order.user_id)?;
    Ok(order)
  }

  /// Non-admin callers are pinned to their own orders regardless of the
  /// filter they asked for.
  pub async fn list_orders(
    &self,
    actor: &Actor,
    mut filter: OrderFilter,
    limit: i64,
    offset: i64,
  ) -> Result<Vec<OrderDetails>> {
    if !actor.is_admin() {
      filter.user_id = Some(actor.user_id);
    }
    self.ledger.list(&filter, limit, offset).await
  }

  #[instrument(name = "orders::update_status", skip(self, actor), fields(order_id = %order_id, status = %status))]
  pub async fn update_status(&self, actor: &Actor, order_id: Uuid, status: OrderStatus) -> Result<OrderStatusRecord> {
    access::ensure_admin(actor)?;

    let current = self
      .ledger
      .status_of(order_id)
      .await?
      .ok_or(AppError::OrderNotFound(order_id))?;
    if !current.status.can_transition(status) {
      return Err(AppError::InvalidStatus(current.status));
    }

    self
      .ledger
      .update_status(order_id, status)
      .await?
      .ok_or(AppError::OrderNotFound(order_id))
  }

  /// Moves a pending order to another expedition service and returns the
  /// refreshed order.
  #[instrument(
    name = "orders::reassign_expedition",
    skip(self, actor),
    fields(order_id = %order_id, expedition_service_id = %expedition_service_id)
  )]
  pub async fn reassign_expedition(
    &self,
    actor: &Actor,
    order_id: Uuid,
    expedition_service_id: Uuid,
  ) -> Result<OrderDetails> {
    let order = self.ledger.by_id(order_id).await?.ok_or(AppError::OrderNotFound(order_id))?;
    access::ensure_owner_or_admin(actor, order.user_id)?;

    if !order.status.allows_expedition_reassignment() {
      return Err(AppError::InvalidStatusForReassignment(order.status));
    }

    self
      .expeditions
      .by_id(expedition_service_id)
      .await?
      .ok_or(AppError::ExpeditionNotFound(expedition_service_id))?;

    if !self.ledger.reassign_expedition(order_id, expedition_service_id).await? {
      return Err(AppError::OrderNotFound(order_id));
    }
    self.ledger.by_id(order_id).await?.ok_or(AppError::OrderNotFound(order_id))
  }

  /// Local stand-in for a payment gateway: a restricted alias of
  /// `update_status` that only moves `pending` to `paid`.
  #[instrument(name = "orders::simulate_payment", skip(self, actor), fields(order_id = %order_id))]
  pub async fn simulate_payment(&self, actor: &Actor, order_id: Uuid) -> Result<OrderDetails> {
    let order = self.ledger.by_id(order_id).await?.ok_or(AppError::OrderNotFound(order_id))?;
    access::ensure_owner_or_admin(actor, order.user_id)?;

    if !order.status.is_pending() {
      return Err(AppError::InvalidStatus(order.status));
    }

    self
      .ledger
      .update_status(order_id, OrderStatus::Paid)
      .await?
      .ok_or(AppError::OrderNotFound(order_id))?;
    self.ledger.by_id(order_id).await?.ok_or(AppError::OrderNotFound(order_id))
  }
}
