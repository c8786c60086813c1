//! In-process progress store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use super::{ProgressStore, QuestionStates};
use crate::domain::{LearnerId, ProgressDocument, ProgressUpdate, QuestionState};
use crate::error::StoreError;

#[derive(Default)]
struct Documents {
    progress: HashMap<LearnerId, ProgressDocument>,
    questions: HashMap<LearnerId, QuestionStates>,
}

/// Store backed by process memory. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    docs: Mutex<Documents>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Documents>, StoreError> {
        self.docs
            .lock()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".into()))
    }
}

#[async_trait]
impl ProgressStore for MemoryStore {
    async fn load(&self, learner: &LearnerId) -> Result<ProgressDocument, StoreError> {
        let docs = self.lock()?;
        Ok(docs.progress.get(learner).cloned().unwrap_or_default())
    }

    async fn save(&self, learner: &LearnerId, update: ProgressUpdate) -> Result<(), StoreError> {
        let mut docs = self.lock()?;
        docs.progress.entry(learner.clone()).or_default().merge(update);
        Ok(())
    }

    async fn load_questions(&self, learner: &LearnerId) -> Result<QuestionStates, StoreError> {
        let docs = self.lock()?;
        Ok(docs.questions.get(learner).cloned().unwrap_or_default())
    }

    async fn save_question(
        &self,
        learner: &LearnerId,
        question_id: &str,
        state: QuestionState,
    ) -> Result<(), StoreError> {
        let mut docs = self.lock()?;
        docs.questions
            .entry(learner.clone())
            .or_default()
            .insert(question_id.to_string(), state);
        Ok(())
    }
}
