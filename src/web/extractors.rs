// storefront/src/web/extractors.rs

use actix_web::{dev::Payload, FromRequest, HttpRequest};
use futures_util::future::{ready, Ready};
use tracing::warn;
use uuid::Uuid;

use crate::errors::AppError;
use crate::services::access::{Actor, Role};

// Authentication is an external collaborator: an upstream gateway is
// expected to have verified the caller and stamped these headers. For
// local testing they can be set by hand.
const USER_ID_HEADER: &str = "X-User-ID";
const USER_ROLE_HEADER: &str = "X-User-Role";

impl FromRequest for Actor {
  type Error = AppError;
  type Future = Ready<Result<Self, Self::Error>>;

  fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
    let user_id = req
      .headers()
      .get(USER_ID_HEADER)
      .and_then(|value| value.to_str().ok())
      .and_then(|value| Uuid::parse_str(value).ok());

    match user_id {
      Some(user_id) => {
        let role = req
          .headers()
          .get(USER_ROLE_HEADER)
          .and_then(|value| value.to_str().ok())
          .map(Role::from_header)
          .unwrap_or(Role::Customer);
        ready(Ok(Actor { user_id, role }))
      }
      None => {
        warn!("Actor extractor: missing or invalid {} header.", USER_ID_HEADER);
        ready(Err(AppError::Auth(format!(
          "User authentication required. Missing or invalid {} header.",
          USER_ID_HEADER
        ))))
      }
    }
  }
}
