pub mod card;
pub mod learner;
pub mod progress;
pub mod review;

pub use card::{Card, CardId, CardState, Difficulty, INITIAL_EASE_FACTOR, MIN_EASE_FACTOR};
pub use learner::{Identity, IdentityKind, LearnerId};
pub use progress::{ProgressDocument, ProgressUpdate, QuestionState};
pub use review::Quality;
