use crate::model::HealthConcernLevel;
use crate::rules::builtin::default_thresholds;
use crate::rules::schema::{NutrientRuleDef, ThresholdSetDef};
use rust_decimal::Decimal;

pub const SUGAR: &str = "sugar";
pub const SALT: &str = "salt";
pub const SATURATED_FAT: &str = "saturatedFat";
pub const FIBER: &str = "fiber";

/// Nutrients the health score consults, in rule order.
pub const SCORED_NUTRIENTS: &[&str] = &[SUGAR, SALT, SATURATED_FAT, FIBER];

/// Classify a per-100 g nutrient value against the builtin thresholds.
///
/// Unknown nutrient names classify as `Moderate`.
pub fn classify_nutrient(nutrient: &str, value: Decimal) -> HealthConcernLevel {
    classify_with(default_thresholds(), nutrient, value)
}

/// Classify a per-100 g nutrient value against a given threshold set.
pub fn classify_with(set: &ThresholdSetDef, nutrient: &str, value: Decimal) -> HealthConcernLevel {
    match set.rule(nutrient) {
        Some(rule) => classify_rule(rule, value),
        None => {
            tracing::debug!(nutrient, "no threshold rule, defaulting to moderate");
            HealthConcernLevel::Moderate
        }
    }
}

/// First level in check order whose bound the value is strictly below.
fn classify_rule(rule: &NutrientRuleDef, value: Decimal) -> HealthConcernLevel {
    let (order, fallback) = rule.direction.check_order();
    order
        .iter()
        .find(|level| {
            rule.thresholds
                .get(*level)
                .is_some_and(|&bound| value < bound)
        })
        .copied()
        .unwrap_or(fallback)
}
