// storefront/src/models/cart_line.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A pending purchase intent. `price_at_time` is a snapshot taken when the
/// line was added or last updated, not a live reference to the catalog
/// price.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct CartLine {
  pub id: Uuid,
  pub user_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_at_time: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
