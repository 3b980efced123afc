use crate::model::NutriScoreGrade;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a reason's effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReasonType {
    Positive,
    Negative,
    Warning,
}

/// One explanation of why the score moved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HealthReason {
    #[serde(rename = "type")]
    pub kind: ReasonType,
    /// "nutrition", "additives" or "processing".
    pub category: String,
    pub message: String,
    /// Signed score delta attributed to this reason.
    pub impact: i32,
}

/// Overall verdict, a fixed partition of the 0-100 score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HealthGrade {
    Excellent,
    Good,
    Moderate,
    Poor,
    Avoid,
}

impl HealthGrade {
    pub fn from_score(score: u8) -> HealthGrade {
        match score {
            80.. => HealthGrade::Excellent,
            65..=79 => HealthGrade::Good,
            50..=64 => HealthGrade::Moderate,
            35..=49 => HealthGrade::Poor,
            _ => HealthGrade::Avoid,
        }
    }
}

impl fmt::Display for HealthGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HealthGrade::Excellent => write!(f, "excellent"),
            HealthGrade::Good => write!(f, "good"),
            HealthGrade::Moderate => write!(f, "moderate"),
            HealthGrade::Poor => write!(f, "poor"),
            HealthGrade::Avoid => write!(f, "avoid"),
        }
    }
}

/// Where the final score came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScoreSource {
    /// Upstream score supplied with the product.
    External,
    /// Accumulated from the nutrition, additive and NOVA rules.
    Heuristic,
}

/// Result of scoring one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthScoreResult {
    /// Always within 0..=100.
    pub score: u8,
    pub grade: HealthGrade,
    pub source: ScoreSource,
    pub nutri_score: Option<NutriScoreGrade>,
    pub nova_group: Option<u8>,
    /// In rule order: nutrition, additives, processing.
    pub reasons: Vec<HealthReason>,
    pub recommendations: Vec<String>,
    pub warnings: Vec<String>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grade_partition_boundaries() {
        assert_eq!(HealthGrade::from_score(0), HealthGrade::Avoid);
        assert_eq!(HealthGrade::from_score(34), HealthGrade::Avoid);
        assert_eq!(HealthGrade::from_score(35), HealthGrade::Poor);
        assert_eq!(HealthGrade::from_score(49), HealthGrade::Poor);
        assert_eq!(HealthGrade::from_score(50), HealthGrade::Moderate);
        assert_eq!(HealthGrade::from_score(64), HealthGrade::Moderate);
        assert_eq!(HealthGrade::from_score(65), HealthGrade::Good);
        assert_eq!(HealthGrade::from_score(79), HealthGrade::Good);
        assert_eq!(HealthGrade::from_score(80), HealthGrade::Excellent);
        assert_eq!(HealthGrade::from_score(100), HealthGrade::Excellent);
    }

    #[test]
    fn test_reason_serializes_type_field() {
        let reason = HealthReason {
            kind: ReasonType::Warning,
            category: "additives".into(),
            message: "Contains Aspartame (E951)".into(),
            impact: -8,
        };
        let json = serde_json::to_value(&reason).unwrap();
        assert_eq!(json["type"], "warning");
        assert_eq!(json["impact"], -8);
    }
}
