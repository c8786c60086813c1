//! Topic deck files.

use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use super::Topic;
use crate::domain::{Card, Difficulty};
use crate::error::ContentError;

/// On-disk topic deck as authored
#[derive(Debug, Deserialize)]
pub struct TopicFile {
    pub id: Option<String>,
    pub title: String,
    #[serde(default)]
    pub flashcards: Vec<FlashcardEntry>,
}

#[derive(Debug, Deserialize)]
pub struct FlashcardEntry {
    pub id: Option<String>,
    pub front: String,
    pub back: String,
    pub difficulty: Option<String>,
}

/// Lowercase, non-alphanumeric runs collapsed to '-', no leading/trailing '-'
pub fn slugify(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.chars() {
        if c.is_ascii_alphanumeric() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_dash = true;
        }
    }
    slug
}

impl TopicFile {
    pub fn load(path: &Path) -> Result<Self, ContentError> {
        let contents = fs::read_to_string(path).map_err(|source| ContentError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|source| ContentError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Build the topic, assigning `{topic}-fc-{n}` ids to cards without one.
    ///
    /// A card whose front repeats an earlier card is dropped so the deck never
    /// asks the same question twice. Card ids are unique within the topic: a
    /// repeated explicit id is dropped, and a generated id skips any number
    /// already taken by an explicit one.
    pub fn into_topic(self) -> Topic {
        let id = self.id.unwrap_or_else(|| slugify(&self.title));
        let explicit: HashSet<String> = self.flashcards.iter().filter_map(|e| e.id.clone()).collect();
        let mut used: HashSet<String> = HashSet::with_capacity(self.flashcards.len());
        let mut flashcards: Vec<Card> = Vec::with_capacity(self.flashcards.len());
        let mut counter = 1;

        for entry in self.flashcards {
            if flashcards.iter().any(|c| c.front == entry.front) {
                tracing::debug!("Skipping duplicate flashcard '{}' in {}", entry.front, id);
                continue;
            }
            let card_id = match entry.id {
                Some(card_id) if used.contains(&card_id) => {
                    tracing::warn!("Skipping flashcard '{}' in {}: id '{}' already used", entry.front, id, card_id);
                    continue;
                }
                Some(card_id) => card_id,
                None => loop {
                    let candidate = format!("{}-fc-{}", id, counter);
                    if !explicit.contains(&candidate) && !used.contains(&candidate) {
                        break candidate;
                    }
                    counter += 1;
                },
            };
            counter += 1;
            used.insert(card_id.clone());

            let difficulty = entry
                .difficulty
                .as_deref()
                .and_then(Difficulty::from_str)
                .unwrap_or_default();
            flashcards.push(Card::new(card_id, entry.front, entry.back).with_difficulty(difficulty));
        }

        Topic {
            id,
            title: self.title,
            flashcards,
        }
    }
}
