//! Due-set selection for scheduled sessions.

use chrono::{DateTime, Utc};

use crate::domain::{Card, ProgressDocument};

/// Cards due at `now`, most overdue first.
///
/// A card is due when it has no stored state or its next review is not in
/// the future. Never-reviewed cards sort ahead of everything else; ties keep
/// the content order so the result is fully determined by the inputs.
pub fn select_due<'a>(
  cards: &'a [Card],
  progress: &ProgressDocument,
  now: DateTime<Utc>,
) -> Vec<&'a Card> {
  let mut due: Vec<(Option<DateTime<Utc>>, &Card)> = cards
    .iter()
    .map(|card| (progress.get(&card.id).map(|s| s.next_review_at), card))
    .filter(|(at, _)| at.is_none_or(|at| at <= now))
    .collect();

  // None < Some(_), so unreviewed cards lead
  due.sort_by_key(|(at, _)| *at);
  due.into_iter().map(|(_, card)| card).collect()
}

/// Unscheduled pass over the whole deck in content order.
///
/// Used for "study anyway" once the learner is caught up. Reviews in a
/// practice pass never touch stored scheduling state.
pub fn practice_pass(cards: &[Card]) -> Vec<&Card> {
  cards.iter().collect()
}

/// Number of cards [`select_due`] would return
pub fn due_count(cards: &[Card], progress: &ProgressDocument, now: DateTime<Utc>) -> usize {
  cards
    .iter()
    .filter(|card| progress.get(&card.id).is_none_or(|s| s.is_due(now)))
    .count()
}
