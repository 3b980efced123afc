use crate::error::FoodScoreError;
use crate::rules::schema::ThresholdSetDef;
use std::sync::LazyLock;

const DEFAULT_THRESHOLDS_JSON: &str = include_str!("../../../../rules/nutrient-thresholds.json");

/// Available predefined threshold sets.
pub const PRESETS: &[&str] = &["default"];

static DEFAULT_THRESHOLDS: LazyLock<ThresholdSetDef> = LazyLock::new(|| {
    serde_json::from_str(DEFAULT_THRESHOLDS_JSON)
        .expect("embedded nutrient-thresholds.json is valid")
});

/// The builtin threshold set used when no custom file is given.
pub fn default_thresholds() -> &'static ThresholdSetDef {
    &DEFAULT_THRESHOLDS
}

/// Load a predefined threshold set by name.
pub fn load_preset(name: &str) -> Result<ThresholdSetDef, FoodScoreError> {
    match name {
        "default" => Ok(DEFAULT_THRESHOLDS.clone()),
        _ => Err(FoodScoreError::ThresholdsInvalid(format!(
            "unknown preset '{}'. Available: {}",
            name,
            PRESETS.join(", ")
        ))),
    }
}
