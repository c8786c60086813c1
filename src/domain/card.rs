use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Card identifier, unique within a topic (e.g. `threat-modeling-fc-3`)
pub type CardId = String;

/// Difficulty hint attached by the content authors. Informational only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
  Easy,
  #[default]
  Medium,
  Hard,
}

impl Difficulty {
  pub fn from_str(s: &str) -> Option<Self> {
    match s.trim().to_ascii_lowercase().as_str() {
      "easy" => Some(Self::Easy),
      "medium" => Some(Self::Medium),
      "hard" => Some(Self::Hard),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Easy => "easy",
      Self::Medium => "medium",
      Self::Hard => "hard",
    }
  }
}

/// Immutable flashcard as supplied by the content layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
  pub id: CardId,
  pub front: String,
  pub back: String,
  pub difficulty: Option<Difficulty>,
}

impl Card {
  pub fn new(id: impl Into<CardId>, front: impl Into<String>, back: impl Into<String>) -> Self {
    Self {
      id: id.into(),
      front: front.into(),
      back: back.into(),
      difficulty: None,
    }
  }

  pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
    self.difficulty = Some(difficulty);
    self
  }
}

/// Minimum ease factor; enforced after every grading
pub const MIN_EASE_FACTOR: f64 = 1.3;

/// Ease factor given to a card the first time it is graded
pub const INITIAL_EASE_FACTOR: f64 = 2.5;

/// Per-learner SM-2 scheduling record for one card.
///
/// The serialized field names and the millisecond timestamp match the
/// progress documents written by the web client, so existing learner data
/// loads unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CardState {
  #[serde(rename = "ef")]
  pub ease_factor: f64,
  /// Whole days until the next review
  pub interval: u32,
  /// Consecutive successful recalls since the last failure
  pub repetition: u32,
  #[serde(rename = "nextReviewDate", with = "chrono::serde::ts_milliseconds")]
  pub next_review_at: DateTime<Utc>,
}

impl CardState {
  /// State of a card that has never been graded.
  pub const NEW: CardState = CardState {
    ease_factor: INITIAL_EASE_FACTOR,
    interval: 0,
    repetition: 0,
    next_review_at: DateTime::<Utc>::UNIX_EPOCH,
  };

  pub fn is_due(&self, now: DateTime<Utc>) -> bool {
    self.next_review_at <= now
  }
}

impl Default for CardState {
  fn default() -> Self {
    Self::NEW
  }
}
