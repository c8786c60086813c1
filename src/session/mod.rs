//! In-memory registry of live review sessions.
//!
//! Sessions are keyed by a random id handed to the client when the session
//! starts. They auto-expire after a configurable duration of inactivity.

pub mod review;

pub use review::{ReviewOutcome, ReviewSession, SessionKind};

use crate::config;
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

/// Session handle; grading holds the lock across store calls
pub type SharedSession = Arc<tokio::sync::Mutex<ReviewSession>>;

/// Session entry with last access time for expiration
struct SessionEntry {
  session: SharedSession,
  last_access: DateTime<Utc>,
}

#[derive(Clone, Default)]
pub struct SessionRegistry {
  sessions: Arc<Mutex<HashMap<String, SessionEntry>>>,
}

impl SessionRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, SessionEntry>> {
    // The map holds no invariants a panicking holder could break
    self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
  }

  /// Register a session and return its new id
  pub fn insert(&self, session: ReviewSession) -> String {
    let mut sessions = self.lock();

    // Clean up expired sessions occasionally (~10% chance)
    if rand::random::<u8>() < config::SESSION_CLEANUP_THRESHOLD {
      cleanup_expired(&mut sessions, Utc::now());
    }

    let id = generate_session_id();
    sessions.insert(
      id.clone(),
      SessionEntry {
        session: Arc::new(tokio::sync::Mutex::new(session)),
        last_access: Utc::now(),
      },
    );
    id
  }

  /// Look up a session, refreshing its last access time
  pub fn get(&self, session_id: &str) -> Option<SharedSession> {
    let mut sessions = self.lock();
    let expiry = Utc::now() - Duration::hours(config::SESSION_EXPIRY_HOURS);

    match sessions.get_mut(session_id) {
      Some(entry) if entry.last_access > expiry => {
        entry.last_access = Utc::now();
        Some(entry.session.clone())
      }
      Some(_) => {
        sessions.remove(session_id);
        None
      }
      None => None,
    }
  }

  pub fn remove(&self, session_id: &str) -> bool {
    self.lock().remove(session_id).is_some()
  }

  pub fn len(&self) -> usize {
    self.lock().len()
  }

  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Drop every session idle since before `now - SESSION_EXPIRY_HOURS`
  pub fn cleanup(&self, now: DateTime<Utc>) {
    cleanup_expired(&mut self.lock(), now);
  }
}

/// Clean up expired sessions
fn cleanup_expired(sessions: &mut HashMap<String, SessionEntry>, now: DateTime<Utc>) {
  let expiry = now - Duration::hours(config::SESSION_EXPIRY_HOURS);
  sessions.retain(|_, entry| entry.last_access > expiry);
}

/// Generate a new session ID
pub fn generate_session_id() -> String {
  use rand::Rng;
  let mut rng = rand::rng();
  (0..32)
    .map(|_| {
      let idx = rng.random_range(0..36);
      if idx < 10 {
        (b'0' + idx) as char
      } else {
        (b'a' + idx - 10) as char
      }
    })
    .collect()
}
