//! Review session runner.
//!
//! A session fixes its card order once at start, then walks it one card at a
//! time: the learner sees the current card, grades it, and the session
//! advances. Grading persists through the [`ProgressStore`] when the session
//! is SM-2 scheduled; store failures are logged and reported but never stop
//! the learner from moving on.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::domain::{Card, CardId, CardState, Identity, LearnerId, ProgressDocument, Quality};
use crate::error::ScheduleError;
use crate::srs::{self, PlanInput, SchedulingStrategy, WeightTable};
use crate::store::{LogOnError, ProgressStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionKind {
  /// Due cards only, graded results are scheduled
  Scheduled,
  /// Whole deck, nothing is scheduled or persisted
  Practice,
}

impl SessionKind {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "scheduled" => Some(Self::Scheduled),
      "practice" => Some(Self::Practice),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Scheduled => "scheduled",
      Self::Practice => "practice",
    }
  }
}

/// Result of grading one card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewOutcome {
  pub card_id: CardId,
  pub quality: Quality,
  /// New scheduling state; None for practice reviews
  pub state: Option<CardState>,
  /// Card weight after the review, for weighted sessions
  #[serde(skip_serializing_if = "Option::is_none")]
  pub weight: Option<u32>,
  /// True once the new state reached the progress store
  pub persisted: bool,
  /// Store failure while saving; the state above still applies locally
  #[serde(rename = "warning", skip_serializing_if = "Option::is_none")]
  pub persist_error: Option<String>,
}

#[derive(Debug)]
pub struct ReviewSession {
  topic_id: String,
  identity: Identity,
  kind: SessionKind,
  strategy: SchedulingStrategy,
  deck: Vec<Card>,
  queue: Vec<Card>,
  position: usize,
  pass: u32,
  progress: ProgressDocument,
  weights: WeightTable,
  degraded: Option<String>,
}

impl ReviewSession {
  fn with_queue(
    topic_id: &str,
    identity: Identity,
    kind: SessionKind,
    strategy: SchedulingStrategy,
    deck: &[Card],
    queue: Vec<Card>,
  ) -> Self {
    Self {
      topic_id: topic_id.to_string(),
      identity,
      kind,
      strategy,
      deck: deck.to_vec(),
      queue,
      position: 0,
      pass: 1,
      progress: ProgressDocument::new(),
      weights: WeightTable::new(),
      degraded: None,
    }
  }

  /// Start a scheduled session over `deck`.
  ///
  /// With a learner id the stored document is loaded and the due cards are
  /// selected once. Without one, or when the load fails, the session runs the
  /// weight heuristic over the full deck instead.
  pub async fn start(
    store: &dyn ProgressStore,
    identity: Identity,
    topic_id: &str,
    deck: &[Card],
    now: DateTime<Utc>,
  ) -> Self {
    let strategy = SchedulingStrategy::for_identity(&identity);

    let loaded = match (strategy, identity.learner_id()) {
      (SchedulingStrategy::Sm2, Some(learner)) => Some(store.load(learner).await),
      _ => None,
    };

    match loaded {
      Some(Ok(progress)) => {
        let queue: Vec<Card> = strategy
          .plan(deck, PlanInput::Scheduled { progress: &progress, now })
          .into_iter()
          .cloned()
          .collect();
        tracing::debug!(
          "Scheduled session for {}: {} of {} cards due",
          topic_id,
          queue.len(),
          deck.len()
        );
        let mut session = Self::with_queue(topic_id, identity, SessionKind::Scheduled, strategy, deck, queue);
        session.progress = progress;
        session
      }
      Some(Err(e)) => {
        tracing::warn!("Progress load failed, falling back to unscheduled session: {}", e);
        let mut session = Self::weighted(identity, topic_id, deck);
        session.degraded = Some(e.to_string());
        session
      }
      None => Self::weighted(identity, topic_id, deck),
    }
  }

  fn weighted(identity: Identity, topic_id: &str, deck: &[Card]) -> Self {
    let strategy = SchedulingStrategy::WeightHeuristic;
    let weights = WeightTable::new();
    let queue = strategy
      .plan(deck, PlanInput::Weighted(&weights))
      .into_iter()
      .cloned()
      .collect();
    Self::with_queue(topic_id, identity, SessionKind::Scheduled, strategy, deck, queue)
  }

  /// Practice pass over the whole deck in content order.
  pub fn practice(identity: Identity, topic_id: &str, deck: &[Card]) -> Self {
    let strategy = SchedulingStrategy::for_identity(&identity);
    let queue = srs::practice_pass(deck).into_iter().cloned().collect();
    Self::with_queue(topic_id, identity, SessionKind::Practice, strategy, deck, queue)
  }

  /// Grade the current card and advance.
  ///
  /// Checks run in order: quality, membership, finished, then position. A
  /// rejected grade leaves the session untouched.
  pub async fn grade(
    &mut self,
    store: &dyn ProgressStore,
    card_id: &str,
    quality: i64,
    now: DateTime<Utc>,
  ) -> Result<ReviewOutcome, ScheduleError> {
    let quality = Quality::try_from(quality)?;

    if !self.queue.iter().any(|c| c.id == card_id) {
      return Err(ScheduleError::MissingCard(card_id.to_string()));
    }
    let current = self.current().ok_or(ScheduleError::Finished)?;
    if current.id != card_id {
      return Err(ScheduleError::OutOfOrder {
        expected: current.id.clone(),
        got: card_id.to_string(),
      });
    }

    let outcome = match (self.kind, self.strategy, self.identity.learner_id().cloned()) {
      (SessionKind::Practice, _, _) => ReviewOutcome {
        card_id: card_id.to_string(),
        quality,
        state: None,
        weight: None,
        persisted: false,
        persist_error: None,
      },
      (SessionKind::Scheduled, strategy, Some(learner)) if strategy.persists() => {
        self.grade_scheduled(store, &learner, card_id, quality, now).await
      }
      (SessionKind::Scheduled, _, _) => self.grade_weighted(card_id, quality, now),
    };

    self.position += 1;
    Ok(outcome)
  }

  async fn grade_scheduled(
    &mut self,
    store: &dyn ProgressStore,
    learner: &LearnerId,
    card_id: &str,
    quality: Quality,
    now: DateTime<Utc>,
  ) -> ReviewOutcome {
    // Fresh read so gradings from another device are not overwritten with a
    // stale prior; the session's own copy covers a failed read.
    let prior = match store.load(learner).await.log_warn("Progress reload failed") {
      Some(doc) => doc.state_or_new(card_id),
      None => self.progress.state_or_new(card_id),
    };

    let state = srs::grade(&prior, quality, now);
    tracing::debug!(
      "Graded {} as {} for {}: interval {}d, ef {:.2}",
      card_id,
      quality.as_str(),
      learner,
      state.interval,
      state.ease_factor
    );

    let update = BTreeMap::from([(card_id.to_string(), state)]);
    self.progress.merge(update.clone());

    let (persisted, persist_error) = match store.save(learner, update).await {
      Ok(()) => (true, None),
      Err(e) => {
        tracing::warn!("Failed to save progress for {}: {}", card_id, e);
        (false, Some(e.to_string()))
      }
    };

    ReviewOutcome {
      card_id: card_id.to_string(),
      quality,
      state: Some(state),
      weight: None,
      persisted,
      persist_error,
    }
  }

  fn grade_weighted(&mut self, card_id: &str, quality: Quality, now: DateTime<Utc>) -> ReviewOutcome {
    let weight = self.weights.record(card_id, quality);
    let state = srs::grade(&self.progress.state_or_new(card_id), quality, now);
    self.progress.merge(BTreeMap::from([(card_id.to_string(), state)]));

    ReviewOutcome {
      card_id: card_id.to_string(),
      quality,
      state: Some(state),
      weight: Some(weight),
      persisted: false,
      persist_error: None,
    }
  }

  /// Restart the walk. Weighted sessions reorder by the weights gathered so
  /// far; practice sessions repeat the deck.
  pub fn next_pass(&mut self) -> Result<(), ScheduleError> {
    let queue = match (self.kind, self.strategy) {
      (SessionKind::Practice, _) => srs::practice_pass(&self.deck),
      (SessionKind::Scheduled, SchedulingStrategy::WeightHeuristic) => self
        .strategy
        .plan(&self.deck, PlanInput::Weighted(&self.weights)),
      (SessionKind::Scheduled, SchedulingStrategy::Sm2) => return Err(ScheduleError::FixedOrder),
    };
    self.queue = queue.into_iter().cloned().collect();
    self.position = 0;
    self.pass += 1;
    Ok(())
  }

  pub fn current(&self) -> Option<&Card> {
    self.queue.get(self.position)
  }

  pub fn is_finished(&self) -> bool {
    self.position >= self.queue.len()
  }

  /// Scheduled session with nothing due
  pub fn caught_up(&self) -> bool {
    self.kind == SessionKind::Scheduled && self.queue.is_empty()
  }

  /// Earliest upcoming review among the cards this session knows about
  pub fn next_review_after(&self, now: DateTime<Utc>) -> Option<DateTime<Utc>> {
    self.progress.next_review_after(now)
  }

  pub fn belongs_to(&self, identity: &Identity) -> bool {
    self.identity.learner_id() == identity.learner_id()
  }

  pub fn topic_id(&self) -> &str {
    &self.topic_id
  }

  pub fn kind(&self) -> SessionKind {
    self.kind
  }

  pub fn strategy(&self) -> SchedulingStrategy {
    self.strategy
  }

  pub fn position(&self) -> usize {
    self.position
  }

  pub fn total(&self) -> usize {
    self.queue.len()
  }

  pub fn pass(&self) -> u32 {
    self.pass
  }

  /// Why the session fell back from SM-2, if it did
  pub fn degraded(&self) -> Option<&str> {
    self.degraded.as_deref()
  }

  pub fn queue(&self) -> &[Card] {
    &self.queue
  }
}
