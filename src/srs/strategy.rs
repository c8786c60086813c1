//! Scheduling strategy selection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{Card, Identity, ProgressDocument};

use super::due::select_due;
use super::weights::WeightTable;

/// How a session orders its cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SchedulingStrategy {
  /// Date-scheduled SM-2 backed by the progress store
  Sm2,
  /// In-memory weak-area ordering, nothing persisted
  WeightHeuristic,
}

impl SchedulingStrategy {
  /// SM-2 needs somewhere to keep state: a learner id to store it under
  pub fn for_identity(identity: &Identity) -> Self {
    if identity.is_persistent() {
      Self::Sm2
    } else {
      Self::WeightHeuristic
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Sm2 => "sm2",
      Self::WeightHeuristic => "weight_heuristic",
    }
  }

  pub fn persists(&self) -> bool {
    matches!(self, Self::Sm2)
  }
}

/// Input each strategy orders the deck from.
pub enum PlanInput<'a> {
  Scheduled {
    progress: &'a ProgressDocument,
    now: DateTime<Utc>,
  },
  Weighted(&'a WeightTable),
}

impl SchedulingStrategy {
  /// Cards for a session, in presentation order.
  ///
  /// Mismatched input (weights for SM-2 or a document for the heuristic)
  /// degrades to the unscheduled full deck.
  pub fn plan<'a>(&self, cards: &'a [Card], input: PlanInput<'_>) -> Vec<&'a Card> {
    match (self, input) {
      (Self::Sm2, PlanInput::Scheduled { progress, now }) => select_due(cards, progress, now),
      (Self::WeightHeuristic, PlanInput::Weighted(weights)) => weights.order(cards),
      (_, _) => cards.iter().collect(),
    }
  }
}
