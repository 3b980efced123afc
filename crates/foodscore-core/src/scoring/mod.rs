pub mod engine;
pub mod outcome;

pub use engine::{score_product, HealthScorer, ScoringStrategy};
pub use outcome::{HealthGrade, HealthReason, HealthScoreResult, ReasonType, ScoreSource};
