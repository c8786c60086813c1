//! Read-only curriculum content: topics and their flashcard decks.
//!
//! Decks are JSON files in the content directory, one topic per file, loaded
//! once at startup. The scheduler only ever sees the cards.

pub mod deck;
pub mod discovery;

pub use deck::{TopicFile, slugify};
pub use discovery::scan_topic_directory;

use serde::Serialize;
use std::path::Path;

use crate::domain::Card;
use crate::error::ContentError;

#[derive(Debug, Clone, Serialize)]
pub struct Topic {
    pub id: String,
    pub title: String,
    pub flashcards: Vec<Card>,
}

/// All topics available to learners, in load order.
#[derive(Debug, Clone, Default)]
pub struct ContentLibrary {
    topics: Vec<Topic>,
}

impl ContentLibrary {
    pub fn from_topics(topics: Vec<Topic>) -> Result<Self, ContentError> {
        for (i, topic) in topics.iter().enumerate() {
            if topics[..i].iter().any(|t| t.id == topic.id) {
                return Err(ContentError::DuplicateTopic(topic.id.clone()));
            }
        }
        Ok(Self { topics })
    }

    /// Load every deck in `dir`. A missing directory yields an empty library.
    pub fn load(dir: &Path) -> Result<Self, ContentError> {
        let topics = scan_topic_directory(dir);
        let library = Self::from_topics(topics)?;
        tracing::info!(
            "Loaded {} topics ({} flashcards) from {}",
            library.topics.len(),
            library.card_count(),
            dir.display()
        );
        Ok(library)
    }

    pub fn topics(&self) -> &[Topic] {
        &self.topics
    }

    pub fn topic(&self, id: &str) -> Option<&Topic> {
        self.topics.iter().find(|t| t.id == id)
    }

    pub fn card_count(&self) -> usize {
        self.topics.iter().map(|t| t.flashcards.len()).sum()
    }
}
