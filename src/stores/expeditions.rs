// storefront/src/stores/expeditions.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::ExpeditionService;

/// Read-mostly directory of shipping services. Checkout only ever asks
/// "does this one exist"; the write path is catalog management.
#[async_trait]
pub trait ExpeditionDirectory: Send + Sync {
  async fn by_id(&self, id: Uuid) -> Result<Option<ExpeditionService>>;

  async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ExpeditionService>>;

  async fn create(&self, name: &str) -> Result<ExpeditionService>;
}

pub struct PgExpeditionDirectory {
  pool: PgPool,
}

impl PgExpeditionDirectory {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl ExpeditionDirectory for PgExpeditionDirectory {
  async fn by_id(&self, id: Uuid) -> Result<Option<ExpeditionService>> {
    let service = sqlx::query_as::<_, ExpeditionService>("SELECT id, name FROM expedition_services WHERE id = $1")
      .bind(id)
      .fetch_optional(&self.pool)
      .await?;
    Ok(service)
  }

  async fn list(&self, limit: i64, offset: i64) -> Result<Vec<ExpeditionService>> {
    let services = sqlx::query_as::<_, ExpeditionService>(
      "SELECT id, name FROM expedition_services ORDER BY name ASC LIMIT $1 OFFSET $2",
    )
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await?;
    Ok(services)
  }

  async fn create(&self, name: &str) -> Result<ExpeditionService> {
    let service =
      sqlx::query_as::<_, ExpeditionService>("INSERT INTO expedition_services (name) VALUES ($1) RETURNING id, name")
        .bind(name)
        .fetch_one(&self.pool)
        .await?;
    Ok(service)
  }
}
