// storefront/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::OrderStatus;
use crate::services::access::Actor;
use crate::services::orders::{NewOrder, OrderItemRequest};
use crate::state::AppState;
use crate::stores::OrderFilter;

use super::page;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct CreateOrderPayload {
  pub expedition_service_id: Uuid,
  pub items: Option<Vec<OrderItemRequest>>,
}

#[derive(Deserialize, Debug)]
pub struct ListOrdersQuery {
  pub user_id: Option<Uuid>,
  pub status: Option<OrderStatus>,
  pub expedition_service_id: Option<Uuid>,
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct UpdateStatusPayload {
  pub status: OrderStatus,
}

#[derive(Deserialize, Debug)]
pub struct ReassignExpeditionQuery {
  pub expedition_service_id: Uuid,
}

#[derive(Deserialize, Debug)]
pub struct SimulatePaymentPayload {
  pub order_id: Uuid,
}

// --- Handler Implementations ---

#[instrument(name = "handler::create_order", skip(app_state, payload, actor), fields(user_id = %actor.user_id))]
pub async fn create_order_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateOrderPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  info!(
    "Transaction creation attempt by user {} (explicit items: {}).",
    actor.user_id,
    payload.items.as_ref().map_or(0, Vec::len)
  );

  let order = app_state
    .orders
    .create_order(
      &actor,
      NewOrder {
        expedition_service_id: payload.expedition_service_id,
        items: payload.items,
      },
    )
    .await
    // Business failures surface under the endpoint's stable envelope code;
    // infrastructure failures keep their own shape.
    .map_err(|err| match err {
      err @ (AppError::Sqlx(_) | AppError::Internal(_)) => err,
      business => AppError::create_failed(business),
    })?;

  Ok(HttpResponse::Created().json(json!({
    "message": "Transaction created successfully",
    "order": order
  })))
}

#[instrument(name = "handler::list_orders", skip(app_state, query, actor), fields(user_id = %actor.user_id))]
pub async fn list_orders_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListOrdersQuery>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let query = query.into_inner();
  let (limit, offset) = page(query.limit, query.offset);
  let filter = OrderFilter {
    user_id: query.user_id,
    status: query.status,
    expedition_service_id: query.expedition_service_id,
  };

  let orders = app_state.orders.list_orders(&actor, filter, limit, offset).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Transactions retrieved successfully",
    "orders": orders,
    "pagination": { "limit": limit, "offset": offset, "total": orders.len() }
  })))
}

#[instrument(name = "handler::get_order", skip(app_state, path, actor), fields(user_id = %actor.user_id, order_id = %path.as_ref()))]
pub async fn get_order_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state.orders.order_by_id(&actor, order_id).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Transaction retrieved successfully",
    "order": order
  })))
}

#[instrument(name = "handler::update_order_status", skip(app_state, path, payload, actor), fields(user_id = %actor.user_id, order_id = %path.as_ref()))]
pub async fn update_order_status_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  payload: web::Json<UpdateStatusPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let record = app_state.orders.update_status(&actor, order_id, payload.status).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Transaction status updated successfully",
    "order_id": order_id,
    "status": record.status
  })))
}

#[instrument(name = "handler::reassign_expedition", skip(app_state, path, query, actor), fields(user_id = %actor.user_id, order_id = %path.as_ref()))]
pub async fn reassign_expedition_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
  query: web::Query<ReassignExpeditionQuery>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let order_id = path.into_inner();
  let order = app_state
    .orders
    .reassign_expedition(&actor, order_id, query.expedition_service_id)
    .await
    // Absence and ownership keep their own statuses; the business guards
    // surface under the endpoint's stable envelope code.
    .map_err(|err| match err {
      err @ (AppError::OrderNotFound(_) | AppError::Forbidden(_) | AppError::Sqlx(_) | AppError::Internal(_)) => err,
      business => AppError::update_failed(business),
    })?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Expedition service updated successfully",
    "order": order
  })))
}

#[instrument(name = "handler::simulate_payment", skip(app_state, payload, actor), fields(user_id = %actor.user_id, order_id = %payload.order_id))]
pub async fn simulate_payment_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<SimulatePaymentPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  let order = app_state.orders.simulate_payment(&actor, payload.order_id).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Payment simulated successfully",
    "order": order
  })))
}
