//! Persistence collaborator for learner progress.
//!
//! Stores hold one progress document and one question-state map per learner.
//! Writes are merges keyed by card or question id; a store never replaces a
//! whole document, so concurrent writes touching different keys both land.

pub mod memory;
pub mod schema;
pub mod sqlite;

use async_trait::async_trait;
use std::collections::BTreeMap;

use crate::domain::{LearnerId, ProgressDocument, ProgressUpdate, QuestionState};
use crate::error::StoreError;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

/// Per-learner question states keyed by question id
pub type QuestionStates = BTreeMap<String, QuestionState>;

#[async_trait]
pub trait ProgressStore: Send + Sync {
    /// Learner's progress document; empty if nothing was stored yet
    async fn load(&self, learner: &LearnerId) -> Result<ProgressDocument, StoreError>;

    /// Merge `update` into the learner's document, card by card
    async fn save(&self, learner: &LearnerId, update: ProgressUpdate) -> Result<(), StoreError>;

    async fn load_questions(&self, learner: &LearnerId) -> Result<QuestionStates, StoreError>;

    async fn save_question(
        &self,
        learner: &LearnerId,
        question_id: &str,
        state: QuestionState,
    ) -> Result<(), StoreError>;
}

/// Extension trait for logging errors before discarding them
pub trait LogOnError<T> {
    /// Log the error at warn level and return None
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for std::result::Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        match self {
            Ok(v) => Some(v),
            Err(e) => {
                tracing::warn!("{}: {}", context, e);
                None
            }
        }
    }
}
