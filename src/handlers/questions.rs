//! Quiz and active-recall question state handlers.

use axum::{
  Json,
  extract::{Path, Query, State},
};
use serde::Deserialize;

use super::{ApiError, LearnerContext};
use crate::domain::{LearnerId, QuestionState};
use crate::state::AppState;
use crate::store::QuestionStates;

/// Question ids look like `{topic}-quiz-{n}` or `{topic}-recall-{n}`
pub fn is_question_id(id: &str) -> bool {
  ["-quiz-", "-recall-"].iter().any(|marker| {
    id.rsplit_once(marker).is_some_and(|(topic, n)| {
      !topic.is_empty() && !n.is_empty() && n.chars().all(|c| c.is_ascii_digit())
    })
  })
}

/// Checklist view over stored question states
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuestionFilter {
  All,
  Checked,
  Unchecked,
}

impl QuestionFilter {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "all" => Some(Self::All),
      "checked" => Some(Self::Checked),
      "unchecked" => Some(Self::Unchecked),
      _ => None,
    }
  }

  pub fn matches(&self, state: &QuestionState) -> bool {
    match self {
      Self::All => true,
      Self::Checked => state.checked,
      Self::Unchecked => !state.checked,
    }
  }
}

#[derive(Debug, Deserialize)]
pub struct QuestionQuery {
  pub filter: Option<String>,
}

fn require_learner(learner: &LearnerContext) -> Result<&LearnerId, ApiError> {
  learner.identity.learner_id().ok_or(ApiError::Unauthorized)
}

/// GET /api/questions
pub async fn list_questions(
  learner: LearnerContext,
  State(state): State<AppState>,
  Query(query): Query<QuestionQuery>,
) -> Result<Json<QuestionStates>, ApiError> {
  let learner_id = require_learner(&learner)?;
  let filter = match query.filter.as_deref() {
    None => QuestionFilter::All,
    Some(raw) => QuestionFilter::from_str(raw)
      .ok_or_else(|| ApiError::Unprocessable(format!("unknown question filter '{}'", raw)))?,
  };

  let mut questions = state.store.load_questions(learner_id).await?;
  questions.retain(|_, question| filter.matches(question));
  Ok(Json(questions))
}

/// PUT /api/questions/{question_id}
pub async fn update_question(
  learner: LearnerContext,
  State(state): State<AppState>,
  Path(question_id): Path<String>,
  Json(question): Json<QuestionState>,
) -> Result<Json<QuestionState>, ApiError> {
  let learner_id = require_learner(&learner)?;
  if !is_question_id(&question_id) {
    return Err(ApiError::Unprocessable(format!("'{}' is not a question id", question_id)));
  }

  state
    .store
    .save_question(learner_id, &question_id, question.clone())
    .await?;
  tracing::debug!("Saved question state {} for {}", question_id, learner_id);
  Ok(Json(question))
}
