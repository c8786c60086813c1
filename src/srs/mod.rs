pub mod due;
pub mod sm2;
pub mod strategy;
pub mod weights;

pub use due::{due_count, practice_pass, select_due};
pub use sm2::grade;
pub use strategy::{PlanInput, SchedulingStrategy};
pub use weights::WeightTable;
