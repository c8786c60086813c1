//! Error types for the scheduler core, the progress stores and content loading.
//!
//! Nothing here is fatal to the application. Scheduling errors are caller
//! mistakes and are rejected outright; store errors degrade a session to
//! in-memory scheduling but never block studying.

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised by grading and session orchestration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScheduleError {
    /// Quality outside the supported grade set {0, 3, 4, 5}
    #[error("invalid review quality {0}: expected one of 0, 3, 4, 5")]
    InvalidQuality(i64),

    /// Card id is not part of the session's due list
    #[error("card '{0}' is not in the current review list")]
    MissingCard(String),

    /// Card is in the list but is not the one currently presented
    #[error("card '{got}' graded out of order, expected '{expected}'")]
    OutOfOrder { expected: String, got: String },

    /// Every card in the list has already been graded
    #[error("session is already finished")]
    Finished,

    /// Only weighted and practice sessions can start another pass
    #[error("scheduled sessions keep the order fixed at start")]
    FixedOrder,
}

/// Errors raised by a [`crate::store::ProgressStore`].
#[derive(Error, Debug)]
pub enum StoreError {
    /// Backend could not be reached or refused the operation
    #[error("progress store unavailable: {0}")]
    Unavailable(String),

    /// Stored data could not be decoded
    #[error("corrupt progress record for '{key}': {message}")]
    Corrupt { key: String, message: String },

    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

/// Errors raised while loading topic decks.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate topic id '{0}'")]
    DuplicateTopic(String),
}
