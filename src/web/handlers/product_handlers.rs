// storefront/src/web/handlers/product_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::access::{self, Actor};
use crate::state::AppState;
use crate::stores::{NewProduct, ProductPatch};

use super::page;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct ListProductsQuery {
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct CreateProductPayload {
  pub name: String,
  pub description: Option<String>,
  pub price_cents: i64,
  pub image_url: Option<String>,
  #[serde(default)]
  pub stock: i32,
}

#[derive(Deserialize, Debug, Default)]
pub struct UpdateProductPayload {
  pub name: Option<String>,
  pub description: Option<String>,
  pub price_cents: Option<i64>,
  pub image_url: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct SetStockPayload {
  pub stock: i32,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_products", skip(app_state, query))]
pub async fn list_products_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListProductsQuery>,
) -> Result<HttpResponse, AppError> {
  let (limit, offset) = page(query.limit, query.offset);
  let products = app_state.inventory.list_products(limit, offset).await?;

  info!("Successfully fetched {} products.", products.len());
  Ok(HttpResponse::Ok().json(json!({
    "message": "Products fetched successfully.",
    "products": products,
    "pagination": { "limit": limit, "offset": offset, "total": products.len() }
  })))
}

#[instrument(name = "handler::get_product", skip(app_state, path), fields(product_id = %path.as_ref()))]
pub async fn get_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();

  match app_state.inventory.product_by_id(product_id).await? {
    Some(product) => Ok(HttpResponse::Ok().json(json!({
      "message": "Product fetched successfully.",
      "product": product
    }))),
    None => {
      warn!("Product with ID {} not found.", product_id);
      Err(AppError::ProductNotFound(product_id))
    }
  }
}

#[instrument(name = "handler::create_product", skip(app_state, payload, actor), fields(user_id = %actor.user_id))]
pub async fn create_product_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateProductPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  access::ensure_admin(&actor)?;
  let payload = payload.into_inner();

  if payload.name.trim().is_empty() {
    return Err(AppError::Validation("Product name must not be empty.".to_string()));
  }
  if payload.price_cents < 0 {
    return Err(AppError::Validation("Product price must not be negative.".to_string()));
  }
  if payload.stock < 0 {
    return Err(AppError::Validation("Initial stock must not be negative.".to_string()));
  }

  let product = app_state
    .inventory
    .create_product(NewProduct {
      name: payload.name,
      description: payload.description,
      price_cents: payload.price_cents,
      image_url: payload.image_url,
      stock: payload.stock,
    })
    .await?;

  info!(product_id = %product.id, "Product created");
  Ok(HttpResponse::Created().json(json!({
    "message": "Product created successfully.",
    "product": product
  })))
}

#[instrument(name = "handler::update_product", skip(app_state, path, payload, actor), fields(user_id = %actor.user_id, product_id = %path.as_ref()))]
pub async fn update_product_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateProductPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  access::ensure_admin(&actor)?;
  let product_id = path.into_inner();
  let payload = payload.into_inner();

  if let Some(price_cents) = payload.price_cents {
    if price_cents < 0 {
      return Err(AppError::Validation("Product price must not be negative.".to_string()));
    }
  }

  let updated = app_state
    .inventory
    .update_product(
      product_id,
      ProductPatch {
        name: payload.name,
        description: payload.description,
        price_cents: payload.price_cents,
        image_url: payload.image_url,
      },
    )
    .await?
    .ok_or(AppError::ProductNotFound(product_id))?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Product updated successfully.",
    "product": updated
  })))
}

#[instrument(name = "handler::set_stock", skip(app_state, path, payload, actor), fields(user_id = %actor.user_id, product_id = %path.as_ref()))]
pub async fn set_stock_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<SetStockPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  access::ensure_admin(&actor)?;
  let product_id = path.into_inner();

  if payload.stock < 0 {
    return Err(AppError::Validation("Stock must not be negative.".to_string()));
  }

  let stock = app_state
    .inventory
    .set_stock(product_id, payload.stock)
    .await?
    .ok_or(AppError::ProductNotFound(product_id))?;

  info!(product_id = %product_id, stock = stock, "Stock updated");
  Ok(HttpResponse::Ok().json(json!({
    "message": "Stock updated successfully.",
    "product_id": product_id,
    "stock": stock
  })))
}
