//! Test utilities: temporary data directories, content fixtures and store
//! doubles.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::content::{ContentLibrary, Topic};
use crate::domain::{Card, LearnerId, ProgressDocument, ProgressUpdate, QuestionState};
use crate::error::StoreError;
use crate::store::{MemoryStore, ProgressStore, QuestionStates};

/// Temporary data directory, removed when dropped.
pub struct TestEnv {
    /// Kept alive for the lifetime of the environment
    pub temp: TempDir,
}

impl TestEnv {
    pub fn new() -> std::io::Result<Self> {
        Ok(Self {
            temp: TempDir::new()?,
        })
    }

    pub fn path(&self) -> &Path {
        self.temp.path()
    }

    /// Location for an on-disk progress database (not created yet)
    pub fn db_path(&self) -> PathBuf {
        self.temp.path().join("data").join("progress.db")
    }

    /// Write a topic deck file into `<temp>/topics/`
    pub fn write_topic(&self, file_name: &str, json: &str) -> std::io::Result<PathBuf> {
        let dir = self.temp.path().join("topics");
        std::fs::create_dir_all(&dir)?;
        let path = dir.join(file_name);
        std::fs::write(&path, json)?;
        Ok(path)
    }
}

/// Small two-topic library used across session and handler tests
pub fn sample_library() -> ContentLibrary {
    let cia = Topic {
        id: "intro-infosec".into(),
        title: "Introduction to Information Security".into(),
        flashcards: vec![
            Card::new("intro-infosec-fc-1", "Confidentiality", "Only authorized parties can read data"),
            Card::new("intro-infosec-fc-2", "Integrity", "Data is not altered without authorization"),
            Card::new("intro-infosec-fc-3", "Availability", "Systems are usable when needed"),
        ],
    };
    let tm = Topic {
        id: "threat-modeling".into(),
        title: "Threat Modeling".into(),
        flashcards: vec![Card::new("threat-modeling-fc-1", "STRIDE", "Microsoft threat taxonomy")],
    };
    ContentLibrary::from_topics(vec![cia, tm]).expect("sample topics have unique ids")
}

/// Store whose reads and/or writes always fail, for exercising fallbacks
#[derive(Default)]
pub struct FailingStore {
    pub fail_load: bool,
    pub fail_save: bool,
    pub inner: MemoryStore,
}

impl FailingStore {
    pub fn unavailable() -> Self {
        Self {
            fail_load: true,
            fail_save: true,
            inner: MemoryStore::new(),
        }
    }

    pub fn failing_saves() -> Self {
        Self {
            fail_load: false,
            fail_save: true,
            inner: MemoryStore::new(),
        }
    }

    fn outage() -> StoreError {
        StoreError::Unavailable("connection refused".into())
    }
}

#[async_trait]
impl ProgressStore for FailingStore {
    async fn load(&self, learner: &LearnerId) -> Result<ProgressDocument, StoreError> {
        if self.fail_load {
            return Err(Self::outage());
        }
        self.inner.load(learner).await
    }

    async fn save(&self, learner: &LearnerId, update: ProgressUpdate) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(Self::outage());
        }
        self.inner.save(learner, update).await
    }

    async fn load_questions(&self, learner: &LearnerId) -> Result<QuestionStates, StoreError> {
        if self.fail_load {
            return Err(Self::outage());
        }
        self.inner.load_questions(learner).await
    }

    async fn save_question(
        &self,
        learner: &LearnerId,
        question_id: &str,
        state: QuestionState,
    ) -> Result<(), StoreError> {
        if self.fail_save {
            return Err(Self::outage());
        }
        self.inner.save_question(learner, question_id, state).await
    }
}
