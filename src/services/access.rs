// storefront/src/services/access.rs

//! The capability checks every read/update entry point goes through.
//! Authentication itself is an external collaborator; by the time an
//! `Actor` exists the identity is taken at face value.

use uuid::Uuid;

use crate::errors::{AppError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
  Admin,
  Customer,
}

impl Role {
  /// Anything that is not literally "admin" is a customer.
  pub fn from_header(value: &str) -> Role {
    if value.eq_ignore_ascii_case("admin") {
      Role::Admin
    } else {
      Role::Customer
    }
  }
}

/// The authenticated caller of a request.
#[derive(Debug, Clone, Copy)]
pub struct Actor {
  pub user_id: Uuid,
  pub role: Role,
}

impl Actor {
  pub fn is_admin(&self) -> bool {
    self.role == Role::Admin
  }
}

/// Admin-only operations.
pub fn ensure_admin(actor: &Actor) -> Result<()> {
  if actor.is_admin() {
    Ok(())
  } else {
    Err(AppError::Forbidden("administrator role required".to_string()))
  }
}

/// Owner-scoped resources: the owner and any admin pass.
pub fn ensure_owner_or_admin(actor: &Actor, owner_id: Uuid) -> Result<()> {
  if actor.is_admin() || actor.user_id == owner_id {
    Ok(())
  } else {
    Err(AppError::Forbidden("resource belongs to another user".to_string()))
  }
}
