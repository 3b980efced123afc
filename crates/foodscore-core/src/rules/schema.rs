use crate::model::HealthConcernLevel;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A set of per-nutrient concern thresholds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThresholdSetDef {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub version: String,
    pub nutrients: Vec<NutrientRuleDef>,
}

impl ThresholdSetDef {
    /// Find the rule for a nutrient key (exact match).
    pub fn rule(&self, nutrient: &str) -> Option<&NutrientRuleDef> {
        self.nutrients.iter().find(|r| r.nutrient == nutrient)
    }
}

/// Which end of the scale is the concerning one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// More is worse (sugar, salt, saturated fat).
    HigherIsWorse,
    /// Less is worse (fiber).
    LowerIsWorse,
}

impl Direction {
    /// Levels in the order their bounds are checked, and the level returned
    /// when the value is not below any bound.
    pub fn check_order(&self) -> (&'static [HealthConcernLevel], HealthConcernLevel) {
        match self {
            Direction::HigherIsWorse => (
                &[
                    HealthConcernLevel::Low,
                    HealthConcernLevel::Moderate,
                    HealthConcernLevel::High,
                ],
                HealthConcernLevel::VeryHigh,
            ),
            Direction::LowerIsWorse => (
                &[
                    HealthConcernLevel::VeryHigh,
                    HealthConcernLevel::High,
                    HealthConcernLevel::Moderate,
                ],
                HealthConcernLevel::Low,
            ),
        }
    }
}

/// Concern bands for a single nutrient.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NutrientRuleDef {
    pub nutrient: String,
    pub direction: Direction,
    /// Level -> exclusive upper bound (per 100 g).
    pub thresholds: BTreeMap<HealthConcernLevel, Decimal>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub note: Option<String>,
}
