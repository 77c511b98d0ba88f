// storefront/src/web/handlers/cart_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::access::Actor;
use crate::state::AppState;

use super::page;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct AddToCartPayload {
  pub product_id: Uuid,
  pub quantity: i32,
}

#[derive(Deserialize, Debug)]
pub struct ViewCartQuery {
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

// --- Handler Implementations ---

#[instrument(
  name = "handler::add_to_cart",
  skip(app_state, payload, actor),
  fields(user_id = %actor.user_id, product_id = %payload.product_id, quantity = %payload.quantity)
)]
pub async fn add_to_cart_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<AddToCartPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  info!(
    "Add to cart attempt by user: {}, product: {}, quantity: {}",
    actor.user_id, payload.product_id, payload.quantity
  );

  let line = app_state.carts.add_line(&actor, payload.product_id, payload.quantity).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Item added to cart successfully.",
    "cart_line": line
  })))
}

#[instrument(name = "handler::view_cart", skip(app_state, query, actor), fields(user_id = %actor.user_id))]
pub async fn view_cart_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ViewCartQuery>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let (limit, offset) = page(query.limit, query.offset);
  let lines = app_state.carts.lines(&actor, limit, offset).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Cart retrieved successfully.",
    "cart_lines": lines,
    "pagination": { "limit": limit, "offset": offset, "total": lines.len() }
  })))
}

#[instrument(name = "handler::remove_cart_item", skip(app_state, path, actor), fields(user_id = %actor.user_id, product_id = %path.as_ref()))]
pub async fn remove_cart_item_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let product_id = path.into_inner();
  app_state.carts.remove_line(&actor, product_id).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Item removed from cart successfully.",
    "product_id": product_id
  })))
}

#[instrument(name = "handler::clear_cart", skip(app_state, actor), fields(user_id = %actor.user_id))]
pub async fn clear_cart_handler(app_state: web::Data<AppState>, actor: Actor) -> Result<HttpResponse, AppError> {
  let cleared = app_state.carts.clear(&actor).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Cart cleared.",
    "cleared": cleared
  })))
}
