// storefront/src/errors.rs

use actix_web::{HttpResponse, ResponseError};
use serde_json::json;
use thiserror::Error;
use uuid::Uuid;

use crate::models::OrderStatus;

#[derive(Debug, Error)]
pub enum AppError {
  #[error("Validation Error: {0}")]
  Validation(String),

  #[error("Authentication Failed: {0}")]
  Auth(String),

  #[error("Not authorized: {0}")]
  Forbidden(String),

  #[error("Expedition service {0} not found")]
  ExpeditionNotFound(Uuid),

  #[error("Product {0} not found")]
  ProductNotFound(Uuid),

  #[error("Transaction {0} not found")]
  OrderNotFound(Uuid),

  #[error("Cart item for product {0} not found")]
  CartItemNotFound(Uuid),

  #[error("No cart items found for the user")]
  EmptyCart,

  #[error("Quantity must be greater than zero (got {0})")]
  InvalidQuantity(i32),

  #[error("Insufficient stock for product {product_id}: {available} available, {requested} requested")]
  InsufficientStock {
    product_id: Uuid,
    available: i32,
    requested: i32,
  },

  #[error("Only pending transactions can be paid (current status: {0})")]
  InvalidStatus(OrderStatus),

  #[error("Only pending transactions can update expedition service (current status: {0})")]
  InvalidStatusForReassignment(OrderStatus),

  #[error("Configuration Error: {0}")]
  Config(String),

  #[error("Database Error: {0}")]
  Sqlx(#[from] sqlx::Error),

  #[error("Internal Server Error: {0}")]
  Internal(String),

  // Wrappers matching the envelope the order endpoints expose: any business
  // failure during create/update surfaces as one stable code with the
  // underlying reason as the message.
  #[error("Transaction creation failed: {source}")]
  CreateOrderFailed { source: Box<AppError> },

  #[error("Transaction update failed: {source}")]
  UpdateOrderFailed { source: Box<AppError> },
}

impl AppError {
  /// Wraps a business failure from the order-creation workflow.
  pub fn create_failed(source: AppError) -> Self {
    AppError::CreateOrderFailed { source: Box::new(source) }
  }

  /// Wraps a business failure from the expedition-reassignment workflow.
  pub fn update_failed(source: AppError) -> Self {
    AppError::UpdateOrderFailed { source: Box::new(source) }
  }

  /// Stable machine-readable code for API consumers. Messages may change;
  /// these strings may not.
  pub fn error_code(&self) -> &'static str {
    match self {
      AppError::Validation(_) => "VALIDATION_FAILED",
      AppError::Auth(_) => "UNAUTHENTICATED",
      AppError::Forbidden(_) => "FORBIDDEN",
      AppError::ExpeditionNotFound(_) => "EXPEDITION_NOT_FOUND",
      AppError::ProductNotFound(_) => "PRODUCT_NOT_FOUND",
      AppError::OrderNotFound(_) => "TRANSACTION_NOT_FOUND",
      AppError::CartItemNotFound(_) => "CART_ITEM_NOT_FOUND",
      AppError::EmptyCart => "EMPTY_CART",
      AppError::InvalidQuantity(_) => "INVALID_QUANTITY",
      AppError::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
      AppError::InvalidStatus(_) => "INVALID_STATUS",
      AppError::InvalidStatusForReassignment(_) => "INVALID_STATUS_FOR_REASSIGNMENT",
      AppError::Config(_) => "CONFIG_ERROR",
      AppError::Sqlx(_) => "STORAGE_ERROR",
      AppError::Internal(_) => "INTERNAL_ERROR",
      AppError::CreateOrderFailed { .. } => "TRANSACTION_CREATE_FAILED",
      AppError::UpdateOrderFailed { .. } => "TRANSACTION_UPDATE_FAILED",
    }
  }
}

// Allow anyhow::Error to be converted into AppError for convenience in
// handlers that use `?` on functions returning anyhow::Result.
impl From<anyhow::Error> for AppError {
  fn from(err: anyhow::Error) -> Self {
    match err.downcast::<sqlx::Error>() {
      Ok(sqlx_err) => AppError::Sqlx(sqlx_err),
      Err(other) => AppError::Internal(other.to_string()),
    }
  }
}

impl ResponseError for AppError {
  fn error_response(&self) -> HttpResponse {
    // Log the full error when it's turned into a response
    tracing::error!(application_error = %self, code = self.error_code(), "Responding with error");
    let code = self.error_code();
    match self {
      AppError::Validation(_)
      | AppError::EmptyCart
      | AppError::InvalidQuantity(_)
      | AppError::InvalidStatus(_)
      | AppError::CreateOrderFailed { .. }
      | AppError::UpdateOrderFailed { .. } => {
        HttpResponse::BadRequest().json(json!({"error": self.to_string(), "code": code}))
      }
      AppError::Auth(m) => HttpResponse::Unauthorized().json(json!({"error": m, "code": code})),
      AppError::Forbidden(m) => HttpResponse::Forbidden().json(json!({"error": m, "code": code})),
      AppError::ExpeditionNotFound(_)
      | AppError::ProductNotFound(_)
      | AppError::OrderNotFound(_)
      | AppError::CartItemNotFound(_) => {
        HttpResponse::NotFound().json(json!({"error": self.to_string(), "code": code}))
      }
      AppError::InsufficientStock { .. } | AppError::InvalidStatusForReassignment(_) => {
        HttpResponse::Conflict().json(json!({"error": self.to_string(), "code": code}))
      }
      AppError::Config(m) => {
        HttpResponse::InternalServerError().json(json!({"error": "Configuration issue", "detail": m, "code": code}))
      }
      // Never leak raw storage errors to the caller.
      AppError::Sqlx(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "Database operation failed", "code": code}))
      }
      AppError::Internal(_) => {
        HttpResponse::InternalServerError().json(json!({"error": "An internal error occurred", "code": code}))
      }
    }
  }
}

// Define a Result type alias for the application
pub type Result<T, E = AppError> = std::result::Result<T, E>;
