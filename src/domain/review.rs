use serde::{Deserialize, Serialize};

use crate::error::ScheduleError;

/// Learner-supplied recall grade on the SM-2 0-5 scale.
///
/// Only four buttons are offered, so 1 and 2 are never produced and are
/// rejected like any other out-of-range value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Quality {
  Again = 0,
  Hard = 3,
  Good = 4,
  Easy = 5,
}

impl Quality {
  pub const ALL: [Quality; 4] = [Self::Again, Self::Hard, Self::Good, Self::Easy];

  pub fn from_u8(value: u8) -> Result<Self, ScheduleError> {
    match value {
      0 => Ok(Self::Again),
      3 => Ok(Self::Hard),
      4 => Ok(Self::Good),
      5 => Ok(Self::Easy),
      other => Err(ScheduleError::InvalidQuality(other.into())),
    }
  }

  pub fn value(self) -> u8 {
    self as u8
  }

  /// Grades of 3 and above count as a successful recall
  pub fn is_correct(self) -> bool {
    self.value() >= 3
  }

  pub fn as_str(self) -> &'static str {
    match self {
      Self::Again => "again",
      Self::Hard => "hard",
      Self::Good => "good",
      Self::Easy => "easy",
    }
  }
}

impl TryFrom<u8> for Quality {
  type Error = ScheduleError;

  fn try_from(value: u8) -> Result<Self, Self::Error> {
    Self::from_u8(value)
  }
}

/// Request payloads carry any JSON integer; anything off the scale is an
/// invalid quality rather than a decode failure.
impl TryFrom<i64> for Quality {
  type Error = ScheduleError;

  fn try_from(value: i64) -> Result<Self, Self::Error> {
    u8::try_from(value)
      .map_err(|_| ScheduleError::InvalidQuality(value))
      .and_then(Self::from_u8)
  }
}

impl From<Quality> for u8 {
  fn from(q: Quality) -> Self {
    q.value()
  }
}
