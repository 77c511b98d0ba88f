// storefront/src/stores/orders.rs

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::errors::Result;
use crate::models::{OrderDetails, OrderLine, OrderStatus, OrderStatusRecord};

/// A fully resolved (product, quantity, unit price) line, ready to be
/// copied into the ledger.
#[derive(Debug, Clone)]
pub struct ResolvedLine {
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_at_time: i64,
}

#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
  pub user_id: Option<Uuid>,
  pub status: Option<OrderStatus>,
  pub expedition_service_id: Option<Uuid>,
}

/// Persists orders, their lines and their status record as one durable
/// unit. Guards (pending-only reassignment, ownership) belong to the
/// service layer; writes here are unconditional.
#[async_trait]
pub trait OrderLedger: Send + Sync {
  /// Computes the total and writes the order row, every line and one
  /// `pending` status record inside a single database transaction. Either
  /// the whole order exists afterwards or nothing does.
  async fn create(&self, user_id: Uuid, expedition_service_id: Uuid, lines: &[ResolvedLine]) -> Result<OrderDetails>;

  async fn by_id(&self, order_id: Uuid) -> Result<Option<OrderDetails>>;

  /// Guard read used before status-sensitive updates.
  async fn status_of(&self, order_id: Uuid) -> Result<Option<OrderStatusRecord>>;

  async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Option<OrderStatusRecord>>;

  /// True iff the order existed and the write happened.
  async fn reassign_expedition(&self, order_id: Uuid, expedition_service_id: Uuid) -> Result<bool>;

  /// Newest-created-first, lines aggregated per order.
  async fn list(&self, filter: &OrderFilter, limit: i64, offset: i64) -> Result<Vec<OrderDetails>>;
}

pub fn order_total(lines: &[ResolvedLine]) -> i64 {
  lines.iter().map(|line| i64::from(line.quantity) * line.price_at_time).sum()
}

// Order row joined with its current status.
#[derive(Debug, FromRow)]
struct OrderHeadRow {
  id: Uuid,
  user_id: Uuid,
  expedition_service_id: Uuid,
  total: i64,
  created_at: DateTime<Utc>,
  updated_at: DateTime<Utc>,
  status: OrderStatus,
}

impl OrderHeadRow {
  fn into_details(self, items: Vec<OrderLine>) -> OrderDetails {
    OrderDetails {
      id: self.id,
      user_id: self.user_id,
      expedition_service_id: self.expedition_service_id,
      total: self.total,
      status: self.status,
      items,
      created_at: self.created_at,
      updated_at: self.updated_at,
    }
  }
}

const HEAD_COLUMNS: &str = "o.id, o.user_id, o.expedition_service_id, o.total, \
                            o.created_at, o.updated_at, s.status";

pub struct PgOrderLedger {
  pool: PgPool,
}

impl PgOrderLedger {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl OrderLedger for PgOrderLedger {
  async fn create(&self, user_id: Uuid, expedition_service_id: Uuid, lines: &[ResolvedLine]) -> Result<OrderDetails> {
    let total = order_total(lines);
    let mut tx = self.pool.begin().await?;

    let (order_id, created_at, updated_at): (Uuid, DateTime<Utc>, DateTime<Utc>) = sqlx::query_as(
      "INSERT INTO orders (user_id, expedition_service_id, total) \
       VALUES ($1, $2, $3) RETURNING id, created_at, updated_at",
    )
    .bind(user_id)
    .bind(expedition_service_id)
    .bind(total)
    .fetch_one(&mut *tx)
    .await?;

    let mut items = Vec::with_capacity(lines.len());
    for line in lines {
      let item = sqlx::query_as::<_, OrderLine>(
        "INSERT INTO order_lines (order_id, product_id, quantity, price_at_time) \
         VALUES ($1, $2, $3, $4) \
         RETURNING id, order_id, product_id, quantity, price_at_time",
      )
      .bind(order_id)
      .bind(line.product_id)
      .bind(line.quantity)
      .bind(line.price_at_time)
      .fetch_one(&mut *tx)
      .await?;
      items.push(item);
    }

    let status: OrderStatus = sqlx::query_scalar(
      "INSERT INTO order_status (order_id, status) VALUES ($1, $2) RETURNING status",
    )
    .bind(order_id)
    .bind(OrderStatus::Pending)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    Ok(OrderDetails {
      id: order_id,
      user_id,
      expedition_service_id,
      total,
      status,
      items,
      created_at,
      updated_at,
    })
  }

  async fn by_id(&self, order_id: Uuid) -> Result<Option<OrderDetails>> {
    let head = sqlx::query_as::<_, OrderHeadRow>(&format!(
      "SELECT {HEAD_COLUMNS} FROM orders o JOIN order_status s ON s.order_id = o.id WHERE o.id = $1",
    ))
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;

    let head = match head {
      Some(head) => head,
      None => return Ok(None),
    };

    let items = sqlx::query_as::<_, OrderLine>(
      "SELECT id, order_id, product_id, quantity, price_at_time FROM order_lines WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_all(&self.pool)
    .await?;

    Ok(Some(head.into_details(items)))
  }

  async fn status_of(&self, order_id: Uuid) -> Result<Option<OrderStatusRecord>> {
    let record = sqlx::query_as::<_, OrderStatusRecord>(
      "SELECT id, order_id, status, updated_at FROM order_status WHERE order_id = $1",
    )
    .bind(order_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(record)
  }

  async fn update_status(&self, order_id: Uuid, status: OrderStatus) -> Result<Option<OrderStatusRecord>> {
    let record = sqlx::query_as::<_, OrderStatusRecord>(
      "UPDATE order_status SET status = $2, updated_at = now() WHERE order_id = $1 \
       RETURNING id, order_id, status, updated_at",
    )
    .bind(order_id)
    .bind(status)
    .fetch_optional(&self.pool)
    .await?;
    Ok(record)
  }

  async fn reassign_expedition(&self, order_id: Uuid, expedition_service_id: Uuid) -> Result<bool> {
    let result = sqlx::query("UPDATE orders SET expedition_service_id = $2, updated_at = now() WHERE id = $1")
      .bind(order_id)
      .bind(expedition_service_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() == 1)
  }

  async fn list(&self, filter: &OrderFilter, limit: i64, offset: i64) -> Result<Vec<OrderDetails>> {
    let heads = sqlx::query_as::<_, OrderHeadRow>(&format!(
      "SELECT {HEAD_COLUMNS} FROM orders o JOIN order_status s ON s.order_id = o.id \
       WHERE ($1::uuid IS NULL OR o.user_id = $1) \
         AND ($2::order_status_enum IS NULL OR s.status = $2) \
         AND ($3::uuid IS NULL OR o.expedition_service_id = $3) \
       ORDER BY o.created_at DESC LIMIT $4 OFFSET $5",
    ))
    .bind(filter.user_id)
    .bind(filter.status)
    .bind(filter.expedition_service_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await?;

    if heads.is_empty() {
      return Ok(Vec::new());
    }

    let order_ids: Vec<Uuid> = heads.iter().map(|head| head.id).collect();
    let lines = sqlx::query_as::<_, OrderLine>(
      "SELECT id, order_id, product_id, quantity, price_at_time FROM order_lines WHERE order_id = ANY($1)",
    )
    .bind(&order_ids)
    .fetch_all(&self.pool)
    .await?;

    let mut by_order: HashMap<Uuid, Vec<OrderLine>> = HashMap::new();
    for line in lines {
      by_order.entry(line.order_id).or_default().push(line);
    }

    Ok(
      heads
        .into_iter()
        .map(|head| {
          let items = by_order.remove(&head.id).unwrap_or_default();
          head.into_details(items)
        })
        .collect(),
    )
  }
}
