//! HTTP router.

use axum::{
  Router,
  routing::{get, post, put},
};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

pub fn router(state: AppState) -> Router {
  Router::new()
    .route("/api/topics", get(handlers::list_topics))
    .route("/api/topics/{topic_id}/sessions", post(handlers::start_session))
    .route("/api/sessions/{session_id}", get(handlers::current_session))
    .route("/api/sessions/{session_id}/reviews", post(handlers::submit_review))
    .route("/api/sessions/{session_id}/passes", post(handlers::next_pass))
    .route("/api/questions", get(handlers::list_questions))
    .route("/api/questions/{question_id}", put(handlers::update_question))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}
