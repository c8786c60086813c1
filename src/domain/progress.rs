use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::card::{CardId, CardState};

/// A learner's scheduling state for every card they have graded.
///
/// Serializes as `{"cards": {"<card id>": {...}}}`, the layout used by the
/// client-side progress documents.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProgressDocument {
  #[serde(default)]
  pub cards: BTreeMap<CardId, CardState>,
}

/// Partial write: only the listed cards are replaced, everything else in the
/// stored document stays as it is.
pub type ProgressUpdate = BTreeMap<CardId, CardState>;

impl ProgressDocument {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn get(&self, card_id: &str) -> Option<&CardState> {
    self.cards.get(card_id)
  }

  /// Stored state, or the never-reviewed default
  pub fn state_or_new(&self, card_id: &str) -> CardState {
    self.cards.get(card_id).copied().unwrap_or(CardState::NEW)
  }

  /// Field-level merge: each card in `update` replaces its own entry only
  pub fn merge(&mut self, update: ProgressUpdate) {
    self.cards.extend(update);
  }

  pub fn len(&self) -> usize {
    self.cards.len()
  }

  pub fn is_empty(&self) -> bool {
    self.cards.is_empty()
  }

  /// Earliest upcoming review strictly after `now`
  pub fn next_review_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    self
      .cards
      .values()
      .map(|s| s.next_review_at)
      .filter(|at| *at > now)
      .min()
  }
}

/// Checked flag and personal note for a quiz or active-recall item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionState {
  #[serde(default)]
  pub checked: bool,
  #[serde(default)]
  pub note: String,
}
