pub mod builtin;
pub mod schema;

use crate::error::FoodScoreError;
use rust_decimal::Decimal;
use schema::ThresholdSetDef;
use std::collections::HashSet;
use std::path::Path;

/// Load a threshold set from a JSON file.
pub fn load_thresholds(path: &Path) -> Result<ThresholdSetDef, FoodScoreError> {
    let content = std::fs::read_to_string(path).map_err(|e| FoodScoreError::ThresholdsLoad {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;
    parse_thresholds(&content, path)
}

/// Parse a threshold set from a JSON string.
pub fn parse_thresholds(json: &str, source: &Path) -> Result<ThresholdSetDef, FoodScoreError> {
    let set: ThresholdSetDef =
        serde_json::from_str(json).map_err(|e| FoodScoreError::ThresholdsLoad {
            path: source.to_path_buf(),
            reason: e.to_string(),
        })?;
    validate_thresholds(&set)?;
    Ok(set)
}

/// Parse a threshold set from a JSON string (no file path context).
pub fn parse_thresholds_str(json: &str) -> Result<ThresholdSetDef, FoodScoreError> {
    let set: ThresholdSetDef = serde_json::from_str(json).map_err(FoodScoreError::Json)?;
    validate_thresholds(&set)?;
    Ok(set)
}

/// Validate that a threshold set is well-formed.
///
/// Each nutrient may only bound the levels its direction checks, and those
/// bounds must increase strictly in check order so that every band is reachable.
pub fn validate_thresholds(set: &ThresholdSetDef) -> Result<(), FoodScoreError> {
    if set.nutrients.is_empty() {
        return Err(FoodScoreError::ThresholdsInvalid(
            "nutrients must not be empty".into(),
        ));
    }

    let mut seen = HashSet::new();
    for rule in &set.nutrients {
        if rule.nutrient.trim().is_empty() {
            return Err(FoodScoreError::ThresholdsInvalid(
                "nutrient name must not be empty".into(),
            ));
        }

        if !seen.insert(rule.nutrient.as_str()) {
            return Err(FoodScoreError::ThresholdsInvalid(format!(
                "nutrient '{}' is defined more than once",
                rule.nutrient
            )));
        }

        if rule.thresholds.is_empty() {
            return Err(FoodScoreError::ThresholdsInvalid(format!(
                "nutrient '{}' has no thresholds",
                rule.nutrient
            )));
        }

        let (order, fallback) = rule.direction.check_order();
        if rule.thresholds.contains_key(&fallback) {
            return Err(FoodScoreError::ThresholdsInvalid(format!(
                "nutrient '{}' cannot bound '{}': it is the fallback level for this direction",
                rule.nutrient, fallback
            )));
        }

        let mut previous: Option<Decimal> = None;
        for level in order {
            let Some(&bound) = rule.thresholds.get(level) else {
                continue;
            };
            if bound.is_sign_negative() {
                return Err(FoodScoreError::ThresholdsInvalid(format!(
                    "nutrient '{}' has negative bound {} for '{}'",
                    rule.nutrient, bound, level
                )));
            }
            if let Some(prev) = previous {
                if bound <= prev {
                    return Err(FoodScoreError::ThresholdsInvalid(format!(
                        "nutrient '{}': bound {} for '{}' must be greater than {}",
                        rule.nutrient, bound, level, prev
                    )));
                }
            }
            previous = Some(bound);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_parse_valid_set() {
        let json = r#"{
            "name": "Test",
            "version": "1.0",
            "nutrients": [
                { "nutrient": "sugar", "direction": "higher_is_worse",
                  "thresholds": { "low": "5", "moderate": "10", "high": "20" } }
            ]
        }"#;
        let set = parse_thresholds_str(json).unwrap();
        assert_eq!(set.name, "Test");
        assert_eq!(set.nutrients.len(), 1);
        assert!(set.rule("sugar").is_some());
        assert!(set.rule("salt").is_none());
    }

    #[test]
    fn test_empty_nutrients_rejected() {
        let json = r#"{ "name": "Bad", "version": "1.0", "nutrients": [] }"#;
        assert!(parse_thresholds_str(json).is_err());
    }

    #[test]
    fn test_duplicate_nutrient_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "nutrients": [
                { "nutrient": "salt", "direction": "higher_is_worse", "thresholds": { "low": "0.3" } },
                { "nutrient": "salt", "direction": "higher_is_worse", "thresholds": { "low": "0.5" } }
            ]
        }"#;
        assert!(parse_thresholds_str(json).is_err());
    }

    #[test]
    fn test_fallback_level_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "nutrients": [
                { "nutrient": "fiber", "direction": "lower_is_worse", "thresholds": { "low": "10" } }
            ]
        }"#;
        assert!(parse_thresholds_str(json).is_err());
    }

    #[test]
    fn test_non_increasing_bounds_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "nutrients": [
                { "nutrient": "sugar", "direction": "higher_is_worse",
                  "thresholds": { "low": "10", "moderate": "5" } }
            ]
        }"#;
        assert!(parse_thresholds_str(json).is_err());
    }

    #[test]
    fn test_unknown_direction_rejected() {
        let json = r#"{
            "name": "Bad",
            "version": "1.0",
            "nutrients": [
                { "nutrient": "sugar", "direction": "sideways", "thresholds": { "low": "5" } }
            ]
        }"#;
        assert!(parse_thresholds_str(json).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "name": "Strict",
                "version": "2",
                "nutrients": [
                    {{ "nutrient": "salt", "direction": "higher_is_worse",
                       "thresholds": {{ "low": "0.1", "moderate": "0.6", "high": "1.2" }} }}
                ]
            }}"#
        )
        .unwrap();
        let set = load_thresholds(file.path()).unwrap();
        assert_eq!(set.name, "Strict");
    }

    #[test]
    fn test_load_missing_file_reports_path() {
        let err = load_thresholds(Path::new("/nonexistent/thresholds.json")).unwrap_err();
        assert!(matches!(err, FoodScoreError::ThresholdsLoad { .. }));
        assert!(err.to_string().contains("/nonexistent/thresholds.json"));
    }
}
