use serde::{Deserialize, Serialize};
use std::fmt;

/// Stable learner key under which progress documents are stored.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LearnerId(String);

impl LearnerId {
  /// Returns None for blank ids
  pub fn new(id: impl Into<String>) -> Option<Self> {
    let id = id.into();
    let trimmed = id.trim();
    if trimmed.is_empty() {
      None
    } else {
      Some(Self(trimmed.to_string()))
    }
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl fmt::Display for LearnerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// How the learner is known to the identity provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
  /// No identity at all; nothing can be persisted
  Anonymous,
  /// Provider-issued guest id; persisted, may be upgraded later
  Guest,
  /// Linked account
  Account,
}

impl IdentityKind {
  pub fn from_str(s: &str) -> Option<Self> {
    match s {
      "anonymous" => Some(Self::Anonymous),
      "guest" => Some(Self::Guest),
      "account" => Some(Self::Account),
      _ => None,
    }
  }

  pub fn as_str(&self) -> &'static str {
    match self {
      Self::Anonymous => "anonymous",
      Self::Guest => "guest",
      Self::Account => "account",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
  learner_id: Option<LearnerId>,
  kind: IdentityKind,
}

impl Identity {
  pub fn anonymous() -> Self {
    Self {
      learner_id: None,
      kind: IdentityKind::Anonymous,
    }
  }

  pub fn guest(learner_id: LearnerId) -> Self {
    Self {
      learner_id: Some(learner_id),
      kind: IdentityKind::Guest,
    }
  }

  pub fn account(learner_id: LearnerId) -> Self {
    Self {
      learner_id: Some(learner_id),
      kind: IdentityKind::Account,
    }
  }

  pub fn learner_id(&self) -> Option<&LearnerId> {
    self.learner_id.as_ref()
  }

  pub fn kind(&self) -> IdentityKind {
    self.kind
  }

  /// True when progress can be stored under a learner id
  pub fn is_persistent(&self) -> bool {
    self.learner_id.is_some()
  }
}
