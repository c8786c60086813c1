//! Learner identity extraction.
//!
//! The identity provider sits in front of this service and forwards the
//! learner as request headers. No header means an anonymous visitor.

use axum::{
  Json,
  extract::FromRequestParts,
  http::{StatusCode, request::Parts},
  response::{IntoResponse, Response},
};

use crate::domain::{Identity, IdentityKind, LearnerId};
use crate::state::AppState;

pub const LEARNER_ID_HEADER: &str = "x-learner-id";
pub const LEARNER_KIND_HEADER: &str = "x-learner-kind";

/// Request identity. Add this as a handler parameter to read the learner.
#[derive(Debug, Clone)]
pub struct LearnerContext {
  pub identity: Identity,
}

fn header<'a>(parts: &'a Parts, name: &str) -> Result<Option<&'a str>, Response> {
  match parts.headers.get(name) {
    Some(value) => value
      .to_str()
      .map(Some)
      .map_err(|_| reject(format!("{} is not valid text", name))),
    None => Ok(None),
  }
}

fn reject(message: String) -> Response {
  (StatusCode::BAD_REQUEST, Json(serde_json::json!({ "error": message }))).into_response()
}

impl FromRequestParts<AppState> for LearnerContext {
  type Rejection = Response;

  async fn from_request_parts(parts: &mut Parts, _state: &AppState) -> Result<Self, Self::Rejection> {
    let learner_id = header(parts, LEARNER_ID_HEADER)?.and_then(LearnerId::new);
    let kind = match header(parts, LEARNER_KIND_HEADER)? {
      Some(raw) => IdentityKind::from_str(raw.trim())
        .ok_or_else(|| reject(format!("unknown learner kind '{}'", raw)))?,
      None => IdentityKind::Guest,
    };

    let identity = match (learner_id, kind) {
      (None, _) | (_, IdentityKind::Anonymous) => Identity::anonymous(),
      (Some(id), IdentityKind::Guest) => Identity::guest(id),
      (Some(id), IdentityKind::Account) => Identity::account(id),
    };
    Ok(Self { identity })
  }
}
