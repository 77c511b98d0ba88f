// storefront/src/web/handlers/expedition_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::access::{self, Actor};
use crate::state::AppState;

use super::page;

// --- Request DTOs ---

#[derive(Deserialize, Debug)]
pub struct ListExpeditionsQuery {
  pub limit: Option<i64>,
  pub offset: Option<i64>,
}

#[derive(Deserialize, Debug)]
pub struct CreateExpeditionPayload {
  pub name: String,
}

// --- Handler Implementations ---

#[instrument(name = "handler::list_expeditions", skip(app_state, query))]
pub async fn list_expeditions_handler(
  app_state: web::Data<AppState>,
  query: web::Query<ListExpeditionsQuery>,
) -> Result<HttpResponse, AppError> {
  let (limit, offset) = page(query.limit, query.offset);
  let services = app_state.expeditions.list(limit, offset).await?;

  Ok(HttpResponse::Ok().json(json!({
    "message": "Expedition services fetched successfully.",
    "expedition_services": services,
    "pagination": { "limit": limit, "offset": offset, "total": services.len() }
  })))
}

#[instrument(name = "handler::get_expedition", skip(app_state, path), fields(expedition_service_id = %path.as_ref()))]
pub async fn get_expedition_handler(
  app_state: web::Data<AppState>,
  path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
  let id = path.into_inner();

  match app_state.expeditions.by_id(id).await? {
    Some(service) => Ok(HttpResponse::Ok().json(json!({
      "message": "Expedition service fetched successfully.",
      "expedition_service": service
    }))),
    None => {
      warn!("Expedition service with ID {} not found.", id);
      Err(AppError::ExpeditionNotFound(id))
    }
  }
}

#[instrument(name = "handler::create_expedition", skip(app_state, payload, actor), fields(user_id = %actor.user_id))]
pub async fn create_expedition_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<CreateExpeditionPayload>,
  actor: Actor,
) -> Result<HttpResponse, AppError> {
  access::ensure_admin(&actor)?;

  let name = payload.name.trim();
  if name.is_empty() {
    return Err(AppError::Validation("Expedition service name must not be empty.".to_string()));
  }

  let service = app_state.expeditions.create(name).await?;
  info!(expedition_service_id = %service.id, "Expedition service created");

  Ok(HttpResponse::Created().json(json!({
    "message": "Expedition service created successfully.",
    "expedition_service": service
  })))
}
