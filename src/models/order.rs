// storefront/src/models/order.rs

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};
use uuid::Uuid;

// Matches the order_status_enum type in the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
#[sqlx(type_name = "order_status_enum", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
  Pending,
  Paid,
  Failed,
  Cancelled,
  Packing,
  Shipped,
  Completed,
}

impl OrderStatus {
  pub fn as_str(self) -> &'static str {
    match self {
      OrderStatus::Pending => "pending",
      OrderStatus::Paid => "paid",
      OrderStatus::Failed => "failed",
      OrderStatus::Cancelled => "cancelled",
      OrderStatus::Packing => "packing",
      OrderStatus::Shipped => "shipped",
      OrderStatus::Completed => "completed",
    }
  }

  /// Allow-list for status updates. Every pair is currently legal: the
  /// ledger records whatever the operator decides, with no ordering imposed
  /// between states. Tighten individual pairs here as flows demand it.
  pub fn can_transition(self, _to: OrderStatus) -> bool {
    true
  }

  pub fn is_pending(self) -> bool {
    matches!(self, OrderStatus::Pending)
  }

  /// The shipping service on an order may only change before the order has
  /// moved out of `pending`.
  pub fn allows_expedition_reassignment(self) -> bool {
    self.is_pending()
  }
}

impl fmt::Display for OrderStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: Uuid,
  pub user_id: Uuid,
  pub expedition_service_id: Uuid,
  pub total: i64,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}

/// An immutable copy of one purchased line, taken at order-creation time.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderLine {
  pub id: Uuid,
  pub order_id: Uuid,
  pub product_id: Uuid,
  pub quantity: i32,
  pub price_at_time: i64,
}

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderStatusRecord {
  pub id: Uuid,
  pub order_id: Uuid,
  pub status: OrderStatus,
  pub updated_at: DateTime<Utc>,
}

/// An order as the API serializes it: the row itself, its current status
/// and its aggregated lines.
#[derive(Debug, Clone, Serialize)]
pub struct OrderDetails {
  pub id: Uuid,
  pub user_id: Uuid,
  pub expedition_service_id: Uuid,
  pub total: i64,
  pub status: OrderStatus,
  pub items: Vec<OrderLine>,
  pub created_at: DateTime<Utc>,
  pub updated_at: DateTime<Utc>,
}
