// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use storefront::errors::{AppError, Result};
use storefront::models::{CartLine, ExpeditionService, OrderDetails, OrderLine, OrderStatus, OrderStatusRecord, Product};
use storefront::services::access::{Actor, Role};
use storefront::services::{CartService, OrderService};
use storefront::stores::{
  CartStore, ExpeditionDirectory, InventoryStore, NewProduct, OrderFilter, OrderLedger, ProductPatch, ResolvedLine,
};

pub fn setup_tracing() {
  let _ = tracing_subscriber::fmt()
    .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
    .with_test_writer()
    .try_init();
}

pub fn customer() -> Actor {
  Actor {
    user_id: Uuid::new_v4(),
    role: Role::Customer,
  }
}

pub fn admin() -> Actor {
  Actor {
    user_id: Uuid::new_v4(),
    role: Role::Admin,
  }
}

// --- In-memory stores ---

#[derive(Default)]
pub struct MemoryInventory {
  products: Mutex<HashMap<Uuid, Product>>,
  // Products whose next reservation is forced to fail, simulating a lost
  // race against a concurrent checkout.
  reserve_failures: Mutex<HashSet<Uuid>>,
}

impl MemoryInventory {
  pub fn seed(&self, name: &str, price_cents: i64, stock: i32) -> Uuid {
    let now = Utc::now();
    let product = Product {
      id: Uuid::new_v4(),
      name: name.to_string(),
      description: None,
      price_cents,
      image_url: None,
      stock,
      created_at: now,
      updated_at: now,
    };
    let id = product.id;
    self.products.lock().unwrap().insert(id, product);
    id
  }

  pub fn stock_of(&self, product_id: Uuid) -> i32 {
    self.products.lock().unwrap()[&product_id].stock
  }

  pub fn fail_next_reserve(&self, product_id: Uuid) {
    self.reserve_failures.lock().unwrap().insert(product_id);
  }
}

#[async_trait]
impl InventoryStore for MemoryInventory {
  async fn product_by_id(&self, product_id: Uuid) -> Result<Option<Product>> {
    Ok(self.products.lock().unwrap().get(&product_id).cloned())
  }

  async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>> {
    let mut products: Vec<Product> = self.products.lock().unwrap().values().cloned().collect();
    products.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(products.into_iter().skip(offset as usize).take(limit as usize).collect())
  }

  async fn create_product(&self, new_product: NewProduct) -> Result<Product> {
    let id = self.seed(&new_product.name, new_product.price_cents, new_product.stock);
    let mut products = self.products.lock().unwrap();
    let product = products.get_mut(&id).unwrap();
    product.description = new_product.description;
    product.image_url = new_product.image_url;
    Ok(product.clone())
  }

  async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> Result<Option<Product>> {
    let mut products = self.products.lock().unwrap();
    let Some(product) = products.get_mut(&product_id) else {
      return Ok(None);
    };
    if let Some(name) = patch.name {
      product.name = name;
    }
    if let Some(description) = patch.description {
      product.description = Some(description);
    }
    if let Some(price_cents) = patch.price_cents {
      product.price_cents = price_cents;
    }
    if let Some(image_url) = patch.image_url {
      product.image_url = Some(image_url);
    }
    product.updated_at = Utc::now();
    Ok(Some(product.clone()))
  }

  async fn set_stock(&self, product_id: Uuid, quantity: i32) -> Result<Option<i32>> {
    let mut products = self.products.lock().unwrap();
    let Some(product) = products.get_mut(&product_id) else {
      return Ok(None);
    };
    product.stock = quantity;
    Ok(Some(product.stock))
  }

  async fn reserve_stock(&self, product_id: Uuid, quantity: i32) -> Result<bool> {
    if self.reserve_failures.lock().unwrap().remove(&product_id) {
      return Ok(false);
    }
    let mut products = self.products.lock().unwrap();
    let Some(product) = products.get_mut(&product_id) else {
      return Ok(false);
    };
    if product.stock < quantity {
      return Ok(false);
    }
    product.stock -= quantity;
    Ok(true)
  }

  async fn release_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    let mut products = self.products.lock().unwrap();
    if let Some(product) = products.get_mut(&product_id) {
      product.stock += quantity;
    }
    Ok(())
  }
}

#[derive(Default)]
pub struct MemoryCarts {
  lines: Mutex<Vec<CartLine>>,
}

impl MemoryCarts {
  pub fn count_for(&self, user_id: Uuid) -> usize {
    self.lines.lock().unwrap().iter().filter(|line| line.user_id == user_id).count()
  }
}

#[async_trait]
impl CartStore for MemoryCarts {
  async fn lines_for_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<CartLine>> {
    Ok(
      self
        .lines
        .lock()
        .unwrap()
        .iter()
        .filter(|line| line.user_id == user_id)
        .skip(offset as usize)
        .take(limit as usize)
        .cloned()
        .collect(),
    )
  }

  async fn upsert_line(&self, user_id: Uuid, product_id: Uuid, quantity: i32, price_at_time: i64) -> Result<CartLine> {
    let mut lines = self.lines.lock().unwrap();
    let now = Utc::now();
    if let Some(line) = lines
      .iter_mut()
      .find(|line| line.user_id == user_id && line.product_id == product_id)
    {
      line.quantity = quantity;
      line.price_at_time = price_at_time;
      line.updated_at = now;
      return Ok(line.clone());
    }
    let line = CartLine {
      id: Uuid::new_v4(),
      user_id,
      product_id,
      quantity,
      price_at_time,
      created_at: now,
      updated_at: now,
    };
    lines.push(line.clone());
    Ok(line)
  }

  async fn remove_line(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
    let mut lines = self.lines.lock().unwrap();
    let before = lines.len();
    lines.retain(|line| !(line.user_id == user_id && line.product_id == product_id));
    Ok(lines.len() < before)
  }

  async fn clear_for_user(&self, user_id: Uuid) -> Result<bool> {
    let mut lines = self.lines.lock().unwrap();
    let before = lines.len();
    lines.retain(|line| line.user_id != user_id);
    Ok(lines.len() < before)
  }
}

#[derive(Default)]
pub struct MemoryExpeditions {
  services: Mutex<HashMap<Uuid, ExpeditionService>>,
}

impl MemoryExpeditions {
  pub fn seed(&self, name: &str) -> Uuid {
    let service = ExpeditionService {
      id: Uuid::new_v4(),
      name: name.to_string(),
    };
    let id = service.id;
    self.services.lock().unwrap().insert(id, service);
    id
  }
}

#[async_trait]
impl ExpeditionDirectory for MemoryExpeditions {
  async fn by_id(&self, id: Uuid) -> Result<Option<ExpeditionService>> {
    Ok(self.services.lock().unwrap().get(&id).cloned())
  }

  async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ExpeditionService>> {
    let mut services: Vec<ExpeditionService> = self.services.lock().unwrap().values().cloned().collect();
    services.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(services.into_iter().skip(offset as usize).take(limit as usize).collect())
  }

  async fn create(&self, name: &str) -> Result<ExpeditionService> {
    let id = self.seed(name);
    Ok(self.services.lock().unwrap()[&id].clone())
  }
}

struct LedgerEntry {
  details: OrderDetails,
  status_id: Uuid,
}

/// In-memory ledger. Entries are kept in creation order; `list` walks them
/// backwards for newest-first.
#[derive(Default)]
pub struct MemoryLedger {
  entries: Mutex<Vec<LedgerEntry>>,
  sequence: AtomicI64,
}

impl MemoryLedger {
  pub fn order_count(&self) -> usize {
    self.entries.lock().unwrap().len()
  }
}

#[async_trait]
impl OrderLedger for MemoryLedger {
  async fn create(&self, user_id: Uuid, expedition_service_id: Uuid, lines: &[ResolvedLine]) -> Result<OrderDetails> {
    let order_id = Uuid::new_v4();
    // Distinct, monotonically increasing timestamps so ordering assertions
    // are deterministic.
    let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
    let created_at = Utc::now() + chrono::Duration::milliseconds(seq);
    let items: Vec<OrderLine> = lines
      .iter()
      .map(|line| OrderLine {
        id: Uuid::new_v4(),
        order_id,
        product_id: line.product_id,
        quantity: line.quantity,
        price_at_time: line.price_at_time,
      })
      .collect();
    let total = lines.iter().map(|line| i64::from(line.quantity) * line.price_at_time).sum();
    let details = OrderDetails {
      id: order_id,
      user_id,
      expedition_service_id,
      total,
      status: OrderStatus::Pending,
      items,
      created_at,
      updated_at: created_at,
    };
    self.entries.lock().unwrap().push(LedgerEntry {
      details: details.clone(),
      status_id: Uuid::new_v4(),
    });
    Ok(details)
  }

  async fn by_id(&self, order_id: Uuid) -> Result<Option<OrderDetails>> {
    Ok(
      self
        .entries
        .lock()
        .unwrap()
        .iter()
        .find(|entry| entry.details.id == order_id)
        .map(|entry| entry.details.clone()),
    )
  }

  async fn status_of(&self, order_id: Uuid) -> Result<Option<OrderStatusRecord>> {
    Ok(
      self
        .entries
        .lock()
        .unwrap()
        .iter()
        .find(|entry| entry.details.id == order_id)
        .map(|entry| OrderStatusRecord {
          id: entry.status_id,
          order_id,
          status: entry.details.status,
          updated_at: entry.details.updated_at,
        }),
    )
  }

  async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Option<OrderStatusRecord>> {
    let mut entries = self.entries.lock().unwrap();
    let Some(entry) = entries.iter_mut().find(|entry| entry.details.id == order_id) else {
      return Ok(None);
    };
    entry.details.status = status;
    entry.details.updated_at = Utc::now();
    Ok(Some(OrderStatusRecord {
      id: entry.status_id,
      order_id,
      status,
      updated_at: entry.details.updated_at,
    }))
  }

  async fn reassign_expedition(&self, order_id: Uuid, expedition_service_id: Uuid) -> Result<bool> {
    let mut entries = self.entries.lock().unwrap();
    let Some(entry) = entries.iter_mut().find(|entry| entry.details.id == order_id) else {
      return Ok(false);
    };
    entry.details.expedition_service_id = expedition_service_id;
    entry.details.updated_at = Utc::now();
    Ok(true)
  }

  async fn list(&self, filter: &OrderFilter, limit: i64, offset: i64) -> Result<Vec<OrderDetails>> {
    Ok(
      self
        .entries
        .lock()
        .unwrap()
        .iter()
        .rev()
        .filter(|entry| filter.user_id.map_or(true, |user_id| entry.details.user_id == user_id))
        .filter(|entry| filter.status.map_or(true, |status| entry.details.status == status))
        .filter(|entry| {
          filter
            .expedition_service_id
            .map_or(true, |id| entry.details.expedition_service_id == id)
        })
        .skip(offset as usize)
        .take(limit as usize)
        .map(|entry| entry.details.clone())
        .collect(),
    )
  }
}

/// A ledger whose `create` always fails; everything else delegates to an
/// empty in-memory ledger. Used to exercise reservation rollback.
#[derive(Default)]
pub struct FailingLedger {
  inner: MemoryLedger,
}

#[async_trait]
impl OrderLedger for FailingLedger {
  async fn create(&self, _user_id: Uuid, _expedition_service_id: Uuid, _lines: &[ResolvedLine]) -> Result<OrderDetails> {
    Err(AppError::Internal("ledger write refused by test".to_string()))
  }

  async fn by_id(&self, order_id: Uuid) -> Result<Option<OrderDetails>> {
    self.inner.by_id(order_id).await
  }

  async fn status_of(&self, order_id: Uuid) -> Result<Option<OrderStatusRecord>> {
    self.inner.status_of(order_id).await
  }

  async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Option<OrderStatusRecord>> {
    self.inner.update_status(order_id, status).await
  }

  async fn reassign_expedition(&self, order_id: Uuid, expedition_service_id: Uuid) -> Result<bool> {
    self.inner.reassign_expedition(order_id, expedition_service_id).await
  }

  async fn list(&self, filter: &OrderFilter, limit: i64, offset: i64) -> Result<Vec<OrderDetails>> {
    self.inner.list(filter, limit, offset).await
  }
}

// --- Service harness over the in-memory stores ---

pub struct Harness {
  pub inventory: Arc<MemoryInventory>,
  pub carts: Arc<MemoryCarts>,
  pub expeditions: Arc<MemoryExpeditions>,
  pub ledger: Arc<MemoryLedger>,
  pub orders: OrderService,
  pub cart_service: CartService,
}

impl Harness {
  pub fn new() -> Self {
    let inventory = Arc::new(MemoryInventory::default());
    let carts = Arc::new(MemoryCarts::default());
    let expeditions = Arc::new(MemoryExpeditions::default());
    let ledger = Arc::new(MemoryLedger::default());

    let orders = OrderService::new(
      inventory.clone(),
      carts.clone(),
      expeditions.clone(),
      ledger.clone(),
    );
    let cart_service = CartService::new(inventory.clone(), carts.clone());

    Self {
      inventory,
      carts,
      expeditions,
      ledger,
      orders,
      cart_service,
    }
  }

  /// Same harness, but orders hit a ledger that refuses every write.
  pub fn with_failing_ledger() -> (Self, Arc<FailingLedger>) {
    let harness = Self::new();
    let failing = Arc::new(FailingLedger::default());
    let orders = OrderService::new(
      harness.inventory.clone(),
      harness.carts.clone(),
      harness.expeditions.clone(),
      failing.clone(),
    );
    (
      Self {
        inventory: harness.inventory.clone(),
        carts: harness.carts.clone(),
        expeditions: harness.expeditions.clone(),
        ledger: harness.ledger.clone(),
        orders,
        cart_service: harness.cart_service.clone(),
      },
      failing,
    )
  }
}
