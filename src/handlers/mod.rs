//! JSON API handlers.

pub mod identity;
pub mod questions;
pub mod study;

pub use identity::{LEARNER_ID_HEADER, LEARNER_KIND_HEADER, LearnerContext};
pub use questions::{list_questions, update_question};
pub use study::{current_session, list_topics, next_pass, start_session, submit_review};

use axum::{
  Json,
  http::StatusCode,
  response::{IntoResponse, Response},
};

use crate::error::{ScheduleError, StoreError};

/// Error returned by API handlers, rendered as `{"error": "..."}`
#[derive(Debug)]
pub enum ApiError {
  Schedule(ScheduleError),
  Store(StoreError),
  NotFound(String),
  Unauthorized,
  Unprocessable(String),
}

impl ApiError {
  pub fn status(&self) -> StatusCode {
    match self {
      Self::Schedule(ScheduleError::InvalidQuality(_)) => StatusCode::UNPROCESSABLE_ENTITY,
      Self::Schedule(ScheduleError::MissingCard(_)) => StatusCode::NOT_FOUND,
      Self::Schedule(ScheduleError::OutOfOrder { .. })
      | Self::Schedule(ScheduleError::Finished)
      | Self::Schedule(ScheduleError::FixedOrder) => StatusCode::CONFLICT,
      Self::Store(_) => StatusCode::SERVICE_UNAVAILABLE,
      Self::NotFound(_) => StatusCode::NOT_FOUND,
      Self::Unauthorized => StatusCode::UNAUTHORIZED,
      Self::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
    }
  }

  fn message(&self) -> String {
    match self {
      Self::Schedule(e) => e.to_string(),
      Self::Store(e) => e.to_string(),
      Self::NotFound(what) => format!("{} not found", what),
      Self::Unauthorized => "a learner id is required".to_string(),
      Self::Unprocessable(message) => message.clone(),
    }
  }
}

impl From<ScheduleError> for ApiError {
  fn from(e: ScheduleError) -> Self {
    Self::Schedule(e)
  }
}

impl From<StoreError> for ApiError {
  fn from(e: StoreError) -> Self {
    Self::Store(e)
  }
}

impl IntoResponse for ApiError {
  fn into_response(self) -> Response {
    if let Self::Store(e) = &self {
      tracing::warn!("Store error in request: {}", e);
    }
    (self.status(), Json(serde_json::json!({ "error": self.message() }))).into_response()
  }
}
