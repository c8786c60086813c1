use chrono::{DateTime, TimeDelta, Utc};

use crate::domain::{CardState, MIN_EASE_FACTOR, Quality};

/// Grade one review and return the card's next scheduling state.
///
/// Interval and ease factor are both derived from `prior`; nothing computed
/// here feeds back into another field of the same update.
pub fn grade(prior: &CardState, quality: Quality, now: DateTime<Utc>) -> CardState {
  let q = quality.value() as f64;

  let (interval, repetition) = if !quality.is_correct() {
    (1, 0)
  } else {
    let interval = match prior.repetition {
      0 => 1,
      1 => 6,
      _ => (prior.interval as f64 * prior.ease_factor).round() as u32,
    };
    (interval, prior.repetition.saturating_add(1))
  };

  // EF' = EF + (0.1 - (5 - q) * (0.08 + (5 - q) * 0.02))
  let ease_delta = 0.1 - (5.0 - q) * (0.08 + (5.0 - q) * 0.02);
  let ease_factor = (prior.ease_factor + ease_delta).max(MIN_EASE_FACTOR);

  CardState {
    ease_factor,
    interval,
    repetition,
    next_review_at: due_after(now, interval),
  }
}

/// `now` plus whole days, pinned to the latest representable instant on overflow
fn due_after(now: DateTime<Utc>, interval_days: u32) -> DateTime<Utc> {
  TimeDelta::try_days(i64::from(interval_days))
    .and_then(|delta| now.checked_add_signed(delta))
    .unwrap_or(DateTime::<Utc>::MAX_UTC)
}
