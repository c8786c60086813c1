//! Flashcard review handlers.
//!
//! A client starts a session for a topic, then repeatedly shows
//! `current`, collects a grade and posts it to `/reviews` until the session
//! reports `finished`.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::OwnedMutexGuard;

use super::{ApiError, LearnerContext};
use crate::domain::{Card, CardId};
use crate::session::{ReviewOutcome, ReviewSession, SessionKind};
use crate::srs::{self, SchedulingStrategy};
use crate::state::AppState;
use crate::store::LogOnError;

// ============================================================================
// Topics
// ============================================================================

#[derive(Debug, Serialize)]
pub struct TopicSummary {
  pub id: String,
  pub title: String,
  pub card_count: usize,
  /// Cards due now; only known for learners with stored progress
  #[serde(skip_serializing_if = "Option::is_none")]
  pub due_count: Option<usize>,
}

/// GET /api/topics
pub async fn list_topics(learner: LearnerContext, State(state): State<AppState>) -> impl IntoResponse {
  let progress = match learner.identity.learner_id() {
    Some(id) => state.store.load(id).await.log_warn("Failed to load progress for topic list"),
    None => None,
  };
  let now = Utc::now();

  let topics: Vec<TopicSummary> = state
    .library
    .topics()
    .iter()
    .map(|topic| TopicSummary {
      id: topic.id.clone(),
      title: topic.title.clone(),
      card_count: topic.flashcards.len(),
      due_count: progress
        .as_ref()
        .map(|doc| srs::due_count(&topic.flashcards, doc, now)),
    })
    .collect();

  Json(topics)
}

// ============================================================================
// Sessions
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
  /// "scheduled" (default) or "practice"
  #[serde(default)]
  pub mode: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SessionView {
  pub session_id: String,
  pub topic_id: String,
  pub kind: SessionKind,
  pub strategy: SchedulingStrategy,
  pub pass: u32,
  pub position: usize,
  pub total: usize,
  pub current: Option<Card>,
  pub finished: bool,
  pub caught_up: bool,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub next_review_at: Option<DateTime<Utc>>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub degraded: Option<String>,
}

impl SessionView {
  fn new(session_id: &str, session: &ReviewSession, now: DateTime<Utc>) -> Self {
    Self {
      session_id: session_id.to_string(),
      topic_id: session.topic_id().to_string(),
      kind: session.kind(),
      strategy: session.strategy(),
      pass: session.pass(),
      position: session.position(),
      total: session.total(),
      current: session.current().cloned(),
      finished: session.is_finished(),
      caught_up: session.caught_up(),
      next_review_at: if session.caught_up() {
        session.next_review_after(now)
      } else {
        None
      },
      degraded: session.degraded().map(str::to_string),
    }
  }
}

/// Session owned by the requesting learner, or 404
async fn owned_session(
  state: &AppState,
  learner: &LearnerContext,
  session_id: &str,
) -> Result<OwnedMutexGuard<ReviewSession>, ApiError> {
  let not_found = || ApiError::NotFound(format!("session '{}'", session_id));
  let shared = state.sessions.get(session_id).ok_or_else(not_found)?;
  let session = shared.lock_owned().await;
  if !session.belongs_to(&learner.identity) {
    return Err(not_found());
  }
  Ok(session)
}

/// POST /api/topics/{topic_id}/sessions
pub async fn start_session(
  learner: LearnerContext,
  State(state): State<AppState>,
  Path(topic_id): Path<String>,
  Json(request): Json<StartSessionRequest>,
) -> Result<impl IntoResponse, ApiError> {
  let topic = state
    .library
    .topic(&topic_id)
    .ok_or_else(|| ApiError::NotFound(format!("topic '{}'", topic_id)))?;

  let kind = match request.mode.as_deref() {
    None => SessionKind::Scheduled,
    Some(mode) => SessionKind::from_str(mode)
      .ok_or_else(|| ApiError::Unprocessable(format!("unknown session mode '{}'", mode)))?,
  };

  let learner_kind = learner.identity.kind();
  let now = Utc::now();
  let session = match kind {
    SessionKind::Scheduled => {
      ReviewSession::start(state.store.as_ref(), learner.identity, &topic.id, &topic.flashcards, now).await
    }
    SessionKind::Practice => ReviewSession::practice(learner.identity, &topic.id, &topic.flashcards),
  };

  tracing::info!(
    "Started {} session for {} learner on {} ({}, {} cards)",
    kind.as_str(),
    learner_kind.as_str(),
    topic.id,
    session.strategy().as_str(),
    session.total()
  );

  let mut view = SessionView::new("", &session, now);
  view.session_id = state.sessions.insert(session);

  Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/sessions/{session_id}
pub async fn current_session(
  learner: LearnerContext,
  State(state): State<AppState>,
  Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  let session = owned_session(&state, &learner, &session_id).await?;
  Ok(Json(SessionView::new(&session_id, &session, Utc::now())))
}

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
  pub card_id: CardId,
  /// Raw grade; validated against the 0/3/4/5 scale when grading
  pub quality: i64,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
  #[serde(flatten)]
  pub outcome: ReviewOutcome,
  pub next: Option<Card>,
  pub finished: bool,
}

/// POST /api/sessions/{session_id}/reviews
pub async fn submit_review(
  learner: LearnerContext,
  State(state): State<AppState>,
  Path(session_id): Path<String>,
  Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
  let mut session = owned_session(&state, &learner, &session_id).await?;

  let outcome = session
    .grade(state.store.as_ref(), &request.card_id, request.quality, Utc::now())
    .await?;

  Ok(Json(ReviewResponse {
    outcome,
    next: session.current().cloned(),
    finished: session.is_finished(),
  }))
}

/// POST /api/sessions/{session_id}/passes
pub async fn next_pass(
  learner: LearnerContext,
  State(state): State<AppState>,
  Path(session_id): Path<String>,
) -> Result<Json<SessionView>, ApiError> {
  let mut session = owned_session(&state, &learner, &session_id).await?;

  session.next_pass()?;
  Ok(Json(SessionView::new(&session_id, &session, Utc::now())))
}
