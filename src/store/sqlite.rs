//! SQLite-backed progress store.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{Connection, params};
use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use super::schema::run_migrations;
use super::{ProgressStore, QuestionStates};
use crate::domain::{CardState, LearnerId, MIN_EASE_FACTOR, ProgressDocument, ProgressUpdate, QuestionState};
use crate::error::StoreError;

/// One row per (learner, card) and per (learner, question); every write is
/// an upsert of exactly the rows it names.
pub struct SqliteStore {
    conn: Mutex<Connection>,
}

impl SqliteStore {
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    StoreError::Unavailable(format!("cannot create {}: {}", parent.display(), e))
                })?;
            }
        }

        let conn = Connection::open(path)?;
        run_migrations(&conn)?;
        tracing::info!("Opened progress database at {}", path.display());
        Ok(Self::from_connection(conn))
    }

    pub fn open_in_memory() -> Result<Self, StoreError> {
        let conn = Connection::open_in_memory()?;
        run_migrations(&conn)?;
        Ok(Self::from_connection(conn))
    }

    fn from_connection(conn: Connection) -> Self {
        Self {
            conn: Mutex::new(conn),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, StoreError> {
        self.conn.lock().map_err(|_| {
            tracing::error!("Progress database mutex poisoned");
            StoreError::Unavailable("database lock poisoned".into())
        })
    }
}

/// Raw row as stored, decoded into a [`CardState`] after the query
struct CardProgressRow {
    card_id: String,
    ease_factor: f64,
    interval_days: i64,
    repetitions: i64,
    next_review_ms: i64,
}

impl CardProgressRow {
    fn into_state(self) -> Result<(String, CardState), StoreError> {
        let corrupt = |message: &str| StoreError::Corrupt {
            key: self.card_id.clone(),
            message: message.to_string(),
        };

        if !self.ease_factor.is_finite() || self.ease_factor < MIN_EASE_FACTOR {
            return Err(corrupt("ease factor out of range"));
        }
        let interval = u32::try_from(self.interval_days).map_err(|_| corrupt("interval out of range"))?;
        let repetition = u32::try_from(self.repetitions).map_err(|_| corrupt("repetitions out of range"))?;
        let next_review_at: DateTime<Utc> = DateTime::from_timestamp_millis(self.next_review_ms)
            .ok_or_else(|| corrupt("next review timestamp out of range"))?;

        Ok((
            self.card_id,
            CardState {
                ease_factor: self.ease_factor,
                interval,
                repetition,
                next_review_at,
            },
        ))
    }
}

#[async_trait]
impl ProgressStore for SqliteStore {
    async fn load(&self, learner: &LearnerId) -> Result<ProgressDocument, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            r#"
            SELECT card_id, ease_factor, interval_days, repetitions, next_review
            FROM card_progress
            WHERE learner_id = ?1
            "#,
        )?;

        let rows = stmt
            .query_map(params![learner.as_str()], |row| {
                Ok(CardProgressRow {
                    card_id: row.get(0)?,
                    ease_factor: row.get(1)?,
                    interval_days: row.get(2)?,
                    repetitions: row.get(3)?,
                    next_review_ms: row.get(4)?,
                })
            })?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        let mut doc = ProgressDocument::new();
        for row in rows {
            let (card_id, state) = row.into_state()?;
            doc.cards.insert(card_id, state);
        }
        Ok(doc)
    }

    async fn save(&self, learner: &LearnerId, update: ProgressUpdate) -> Result<(), StoreError> {
        let mut conn = self.lock()?;
        let now = Utc::now().to_rfc3339();
        let tx = conn.transaction()?;
        {
            let mut stmt = tx.prepare(
                r#"
                INSERT INTO card_progress (
                    learner_id, card_id, ease_factor, interval_days, repetitions, next_review, updated_at
                ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
                ON CONFLICT(learner_id, card_id) DO UPDATE SET
                    ease_factor = excluded.ease_factor,
                    interval_days = excluded.interval_days,
                    repetitions = excluded.repetitions,
                    next_review = excluded.next_review,
                    updated_at = excluded.updated_at
                "#,
            )?;
            for (card_id, state) in &update {
                stmt.execute(params![
                    learner.as_str(),
                    card_id,
                    state.ease_factor,
                    state.interval,
                    state.repetition,
                    state.next_review_at.timestamp_millis(),
                    now,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    async fn load_questions(&self, learner: &LearnerId) -> Result<QuestionStates, StoreError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(
            "SELECT question_id, checked, note FROM question_states WHERE learner_id = ?1",
        )?;

        let states = stmt
            .query_map(params![learner.as_str()], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    QuestionState {
                        checked: row.get(1)?,
                        note: row.get(2)?,
                    },
                ))
            })?
            .collect::<rusqlite::Result<QuestionStates>>()?;

        Ok(states)
    }

    async fn save_question(
        &self,
        learner: &LearnerId,
        question_id: &str,
        state: QuestionState,
    ) -> Result<(), StoreError> {
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO question_states (learner_id, question_id, checked, note, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            ON CONFLICT(learner_id, question_id) DO UPDATE SET
                checked = excluded.checked,
                note = excluded.note,
                updated_at = excluded.updated_at
            "#,
            params![
                learner.as_str(),
                question_id,
                state.checked,
                state.note,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }
}
