// storefront/src/stores/carts.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::CartLine;

#[async_trait]
pub trait CartStore: Send + Sync {
  /// The user's pending lines. No ordering is guaranteed; checkout treats
  /// the cart as a set.
  async fn lines_for_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<CartLine>>;

  /// Adds a line, or replaces quantity and snapshot price when the user
  /// already has one for this product.
  async fn upsert_line(&self, user_id: Uuid, product_id: Uuid, quantity: i32, price_at_time: i64) -> Result<CartLine>;

  /// True iff a line existed and was removed.
  async fn remove_line(&self, user_id: Uuid, product_id: Uuid) -> Result<bool>;

  /// True iff at least one line existed and was removed.
  async fn clear_for_user(&self, user_id: Uuid) -> Result<bool>;
}

pub struct PgCartStore {
  pool: PgPool,
}

impl PgCartStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl CartStore for PgCartStore {
  async fn lines_for_user(&self, user_id: Uuid, limit: i64, offset: i64) -> Result<Vec<CartLine>> {
    let lines = sqlx::query_as::<_, CartLine>(
      "SELECT id, user_id, product_id, quantity, price_at_time, created_at, updated_at \
       FROM cart_lines WHERE user_id = $1 LIMIT $2 OFFSET $3",
    )
    .bind(user_id)
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await?;
    Ok(lines)
  }

  async fn upsert_line(&self, user_id: Uuid, product_id: Uuid, quantity: i32, price_at_time: i64) -> Result<CartLine> {
    let line = sqlx::query_as::<_, CartLine>(
      "INSERT INTO cart_lines (user_id, product_id, quantity, price_at_time) \
       VALUES ($1, $2, $3, $4) \
       ON CONFLICT (user_id, product_id) DO UPDATE \
       SET quantity = EXCLUDED.quantity, price_at_time = EXCLUDED.price_at_time, updated_at = now() \
       RETURNING id, user_id, product_id, quantity, price_at_time, created_at, updated_at",
    )
    .bind(user_id)
    .bind(product_id)
    .bind(quantity)
    .bind(price_at_time)
    .fetch_one(&self.pool)
    .await?;
    Ok(line)
  }

  async fn remove_line(&self, user_id: Uuid, product_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = $1 AND product_id = $2")
      .bind(user_id)
      .bind(product_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }

  async fn clear_for_user(&self, user_id: Uuid) -> Result<bool> {
    let result = sqlx::query("DELETE FROM cart_lines WHERE user_id = $1")
      .bind(user_id)
      .execute(&self.pool)
      .await?;
    Ok(result.rows_affected() > 0)
  }
}
