// storefront/src/stores/inventory.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::Result;
use crate::models::Product;

/// Fields accepted when creating a catalog product. The stock row is
/// created together with the product.
#[derive(Debug, Clone)]
pub struct NewProduct {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub image_url: Option<String>,
  pub stock: i32,
}

/// Partial update for a product; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ProductPatch {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price_cents: Option<i64>,
  pub image_url: Option<String>,
}

#[async_trait]
pub trait InventoryStore: Send + Sync {
  async fn product_by_id(&self, product_id: Uuid) -> Result<Option<Product>>;

  async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>>;

  async fn create_product(&self, new_product: NewProduct) -> Result<Product>;

  async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> Result<Option<Product>>;

  /// Absolute stock set used by catalog management. Returns the new
  /// quantity, or `None` when the product has no stock row.
  async fn set_stock(&self, product_id: Uuid, quantity: i32) -> Result<Option<i32>>;

  /// Atomic conditional decrement: succeeds (true) only when the row still
  /// holds at least `quantity`. Two concurrent checkouts racing over the
  /// same product cannot drive stock negative through this path.
  async fn reserve_stock(&self, product_id: Uuid, quantity: i32) -> Result<bool>;

  /// Compensating increment used to hand back a reservation when a later
  /// step of the same checkout fails.
  async fn release_stock(&self, product_id: Uuid, quantity: i32) -> Result<()>;
}

const PRODUCT_COLUMNS: &str = "p.id, p.name, p.description, p.price_cents, p.image_url, \
                               s.quantity AS stock, p.created_at, p.updated_at";

pub struct PgInventoryStore {
  pool: PgPool,
}

impl PgInventoryStore {
  pub fn new(pool: PgPool) -> Self {
    Self { pool }
  }
}

#[async_trait]
impl InventoryStore for PgInventoryStore {
  async fn product_by_id(&self, product_id: Uuid) -> Result<Option<Product>> {
    let product = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products p JOIN stock s ON s.product_id = p.id WHERE p.id = $1",
    ))
    .bind(product_id)
    .fetch_optional(&self.pool)
    .await?;
    Ok(product)
  }

  async fn list_products(&self, limit: i64, offset: i64) -> Result<Vec<Product>> {
    let products = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products p JOIN stock s ON s.product_id = p.id \
       ORDER BY p.name ASC LIMIT $1 OFFSET $2",
    ))
    .bind(limit)
    .bind(offset)
    .fetch_all(&self.pool)
    .await?;
    Ok(products)
  }

  async fn create_product(&self, new_product: NewProduct) -> Result<Product> {
    // Product row and its stock row commit together.
    let mut tx = self.pool.begin().await?;

    let product_id: Uuid = sqlx::query_scalar(
      "INSERT INTO products (name, description, price_cents, image_url) \
       VALUES ($1, $2, $3, $4) RETURNING id",
    )
    .bind(&new_product.name)
    .bind(&new_product.description)
    .bind(new_product.price_cents)
    .bind(&new_product.image_url)
    .fetch_one(&mut *tx)
    .await?;

    sqlx::query("INSERT INTO stock (product_id, quantity) VALUES ($1, $2)")
      .bind(product_id)
      .bind(new_product.stock)
      .execute(&mut *tx)
      .await?;

    let product = sqlx::query_as::<_, Product>(&format!(
      "SELECT {PRODUCT_COLUMNS} FROM products p JOIN stock s ON s.product_id = p.id WHERE p.id = $1",
    ))
    .bind(product_id)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;
    Ok(product)
  }

  async fn update_product(&self, product_id: Uuid, patch: ProductPatch) -> Result<Option<Product>> {
    let updated = sqlx::query(
      "UPDATE products SET \
         name = COALESCE($2, name), \
         description = COALESCE($3, description), \
         price_cents = COALESCE($4, price_cents), \
         image_url = COALESCE($5, image_url), \
         updated_at = now() \
       WHERE id = $1",
    )
    .bind(product_id)
    .bind(&patch.name)
    .bind(&patch.description)
    .bind(patch.price_cents)
    .bind(&patch.image_url)
    .execute(&self.pool)
    .await?;

    if updated.rows_affected() == 0 {
      return Ok(None);
    }
    self.product_by_id(product_id).await
  }

  async fn set_stock(&self, product_id: Uuid, quantity: i32) -> Result<Option<i32>> {
    let new_quantity = sqlx::query_scalar::<_, i32>(
      "UPDATE stock SET quantity = $2, updated_at = now() WHERE product_id = $1 RETURNING quantity",
    )
    .bind(product_id)
    .bind(quantity)
    .fetch_optional(&self.pool)
    .await?;
    Ok(new_quantity)
  }

  async fn reserve_stock(&self, product_id: Uuid, quantity: i32) -> Result<bool> {
    let result = sqlx::query(
      "UPDATE stock SET quantity = quantity - $2, updated_at = now() \
       WHERE product_id = $1 AND quantity >= $2",
    )
    .bind(product_id)
    .bind(quantity)
    .execute(&self.pool)
    .await?;
    Ok(result.rows_affected() == 1)
  }

  async fn release_stock(&self, product_id: Uuid, quantity: i32) -> Result<()> {
    sqlx::query("UPDATE stock SET quantity = quantity + $2, updated_at = now() WHERE product_id = $1")
      .bind(product_id)
      .bind(quantity)
      .execute(&self.pool)
      .await?;
    Ok(())
  }
}
