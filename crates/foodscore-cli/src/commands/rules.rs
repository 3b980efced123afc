use foodscore_core::classify::nutrient::SCORED_NUTRIENTS;
use foodscore_core::error::FoodScoreError;
use foodscore_core::rules::builtin;
use foodscore_core::rules::schema::{Direction, ThresholdSetDef};
use std::path::Path;

pub fn list() -> Result<(), FoodScoreError> {
    println!("Available predefined threshold sets:\n");
    for name in builtin::PRESETS {
        let set = builtin::load_preset(name)?;
        println!("  {:<8} {} (v{})", name, set.name, set.version);
        if let Some(ref desc) = set.description {
            println!("           {}", desc);
        }
        println!();
    }
    Ok(())
}

pub fn explain(preset: &str) -> Result<(), FoodScoreError> {
    let set = builtin::load_preset(preset)?;
    print_set(&set);
    Ok(())
}

fn print_set(set: &ThresholdSetDef) {
    println!("{} (version {})\n", set.name, set.version);

    if let Some(ref desc) = set.description {
        println!("{}\n", desc);
    }

    println!("Each nutrient (per 100 g) is placed in the first band whose bound");
    println!("it is strictly below. Values past the last bound fall in the");
    println!("remaining band.\n");

    let max_name_len = set
        .nutrients
        .iter()
        .map(|r| r.nutrient.len())
        .max()
        .unwrap_or(12);

    print!("  {:<width$}", "Nutrient", width = max_name_len + 2);
    println!("  {:<10}{:<10}{:<10}{:<10}Unit", "low", "moderate", "high", "very_high");
    println!("  {}", "-".repeat(max_name_len + 2 + 4 * 10 + 6));

    for rule in &set.nutrients {
        print!("  {:<width$}", rule.nutrient, width = max_name_len + 2);
        let (_, fallback) = rule.direction.check_order();
        for level in foodscore_core::HealthConcernLevel::ALL {
            let cell = match rule.thresholds.get(&level) {
                Some(bound) => format!("< {}", bound),
                None if level == fallback => "rest".to_string(),
                None => "-".to_string(),
            };
            print!("{:<10}", cell);
        }
        println!("{}", rule.unit.as_deref().unwrap_or("g"));
        if let Some(ref note) = rule.note {
            println!("  {:<width$}  ({})", "", note, width = max_name_len + 2);
        }
    }

    println!();
    let inverted: Vec<&str> = set
        .nutrients
        .iter()
        .filter(|r| r.direction == Direction::LowerIsWorse)
        .map(|r| r.nutrient.as_str())
        .collect();
    if !inverted.is_empty() {
        println!("Lower is worse for: {}\n", inverted.join(", "));
    }
}

pub fn schema() -> Result<(), FoodScoreError> {
    print!(
        r#"JSON Threshold Schema
=====================

A threshold file defines the per-100 g concern bands used when scoring
products. Pass it with `foodscore score --thresholds FILE`.

Top-level fields:
  name          (string, required)  Human-readable name of the threshold set
  description   (string, optional)  What this threshold set is for
  version       (string, required)  Version identifier (e.g., "1.0")
  nutrients     (array, required)   List of nutrient rules (see below)

Each rule in the "nutrients" array:
  nutrient      (string, required)  Nutrient key. The score uses:
                                    "sugar", "salt", "saturatedFat", "fiber".
                                    Nutrients without a rule classify as
                                    "moderate" and do not move the score.
  direction     (string, required)  "higher_is_worse" or "lower_is_worse".
  thresholds    (object, required)  Map of level -> exclusive upper bound.
                                    Levels: "low", "moderate", "high",
                                    "very_high". Values are strings
                                    representing decimal numbers.
                                    higher_is_worse: bound low, moderate,
                                    high (increasing); above is very_high.
                                    lower_is_worse: bound very_high, high,
                                    moderate (increasing); above is low.
  unit          (string, optional)  Unit for display. Default: "g"
  note          (string, optional)  Explanation.

Example:
{{
  "name": "Strict sugar",
  "description": "Lower sugar bands for a children's menu",
  "version": "1.0",
  "nutrients": [
    {{
      "nutrient": "sugar",
      "direction": "higher_is_worse",
      "thresholds": {{ "low": "2.5", "moderate": "5", "high": "10" }},
      "unit": "g"
    }},
    {{
      "nutrient": "fiber",
      "direction": "lower_is_worse",
      "thresholds": {{ "very_high": "3", "high": "6", "moderate": "10" }}
    }}
  ]
}}

Note: threshold values must be quoted strings, not bare numbers,
to preserve exact decimal precision (e.g., "0.3" not 0.3).
"#
    );
    Ok(())
}

pub fn validate(file: &Path) -> Result<(), FoodScoreError> {
    let set = foodscore_core::rules::load_thresholds(file)?;

    println!("Threshold set '{}' (v{}) is valid.", set.name, set.version);
    println!("  Nutrients: {}", set.nutrients.len());

    // Potential issues (warnings, not errors)
    let mut warnings = Vec::new();
    for name in SCORED_NUTRIENTS {
        if set.rule(name).is_none() {
            warnings.push(format!(
                "no rule for '{}': it will always classify as moderate",
                name
            ));
        }
    }
    for rule in &set.nutrients {
        if !SCORED_NUTRIENTS.contains(&rule.nutrient.as_str()) {
            warnings.push(format!(
                "nutrient '{}' is not used by the health score",
                rule.nutrient
            ));
        }
        let (order, _) = rule.direction.check_order();
        for level in order {
            if !rule.thresholds.contains_key(level) {
                warnings.push(format!(
                    "nutrient '{}' has no bound for level '{}'",
                    rule.nutrient, level
                ));
            }
        }
    }

    if !warnings.is_empty() {
        println!("\nWarnings:");
        for w in &warnings {
            println!("  - {}", w);
        }
    }

    Ok(())
}
