// storefront/src/models/expedition_service.rs

use serde::Serialize;
use sqlx::FromRow;
use uuid::Uuid;

/// A named shipping/carrier option referenced by orders.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ExpeditionService {
  pub id: Uuid,
  pub name: String,
}
