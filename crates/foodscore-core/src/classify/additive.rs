use crate::model::HealthConcernLevel;

/// Artificial sweeteners (aspartame, cyclamate, saccharin).
pub const VERY_HIGH_CONCERN: &[&str] = &["E951", "E952", "E954"];

/// Azo dyes, sodium benzoate and MSG.
pub const HIGH_CONCERN: &[&str] = &[
    "E102", "E104", "E110", "E122", "E124", "E129", "E211", "E621",
];

/// Classify an additive by its canonical uppercase code.
///
/// Exact membership only: additives never classify as `Low`, and anything
/// not listed is `Moderate`.
pub fn classify_additive(code: &str) -> HealthConcernLevel {
    if VERY_HIGH_CONCERN.contains(&code) {
        HealthConcernLevel::VeryHigh
    } else if HIGH_CONCERN.contains(&code) {
        HealthConcernLevel::High
    } else {
        HealthConcernLevel::Moderate
    }
}
