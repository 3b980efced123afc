use crate::error::FoodScoreError;
use rust_decimal::Decimal;
use serde_json::Value;
use std::str::FromStr;

/// Parse an OpenFoodFacts nutriment value into a decimal.
///
/// Handles:
/// - JSON numbers: `10.6`, `0`, `1e-5`
/// - numeric strings: `"10.6"`, `"10,6"` (decimal comma)
/// - placeholders `""`, `"-"`, `"n/a"`, `null` -> None
///
/// Other types or unparseable strings are errors.
pub fn parse_nutriment(value: &Value) -> Result<Option<Decimal>, FoodScoreError> {
    match value {
        Value::Null => Ok(None),
        Value::Number(n) => parse_decimal(&n.to_string()).map(Some),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() || s == "-" || s.eq_ignore_ascii_case("n/a") {
                return Ok(None);
            }
            parse_decimal(s).map(Some)
        }
        other => Err(FoodScoreError::ProductParse(format!(
            "expected a number, got {}",
            other
        ))),
    }
}

/// Parse a decimal, accepting a decimal comma and scientific notation.
fn parse_decimal(s: &str) -> Result<Decimal, FoodScoreError> {
    let normalized = s.trim().replace(',', ".");
    Decimal::from_str(&normalized)
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|e| FoodScoreError::ProductParse(format!("invalid number '{}': {}", s, e)))
}
