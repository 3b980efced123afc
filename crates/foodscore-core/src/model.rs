use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Nutrition facts per 100 g. Missing values are zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductNutritionFacts {
    /// Energy in kcal.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub energy_kcal: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub fat: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub saturated_fat: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub carbohydrates: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub sugars: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub fiber: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub proteins: Decimal,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub salt: Decimal,
    /// Sodium in grams.
    #[serde(default, with = "rust_decimal::serde::float")]
    pub sodium: Decimal,
}

/// An additive present in a product.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdditiveRecord {
    /// Canonical uppercase code, e.g. "E621".
    pub code: String,
    pub name: String,
}

/// Severity of a nutrient level or additive, ordered from least to most concerning.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HealthConcernLevel {
    Low,
    Moderate,
    High,
    VeryHigh,
}

impl HealthConcernLevel {
    pub const ALL: [HealthConcernLevel; 4] = [
        HealthConcernLevel::Low,
        HealthConcernLevel::Moderate,
        HealthConcernLevel::High,
        HealthConcernLevel::VeryHigh,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HealthConcernLevel::Low => "low",
            HealthConcernLevel::Moderate => "moderate",
            HealthConcernLevel::High => "high",
            HealthConcernLevel::VeryHigh => "very_high",
        }
    }
}

impl fmt::Display for HealthConcernLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Nutri-Score letter grade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum NutriScoreGrade {
    A,
    B,
    C,
    D,
    E,
}

impl NutriScoreGrade {
    /// Parse a single letter, case-insensitive.
    pub fn from_str_loose(s: &str) -> Option<NutriScoreGrade> {
        match s.trim().to_ascii_lowercase().as_str() {
            "a" => Some(NutriScoreGrade::A),
            "b" => Some(NutriScoreGrade::B),
            "c" => Some(NutriScoreGrade::C),
            "d" => Some(NutriScoreGrade::D),
            "e" => Some(NutriScoreGrade::E),
            _ => None,
        }
    }
}

impl fmt::Display for NutriScoreGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            NutriScoreGrade::A => "A",
            NutriScoreGrade::B => "B",
            NutriScoreGrade::C => "C",
            NutriScoreGrade::D => "D",
            NutriScoreGrade::E => "E",
        };
        f.write_str(letter)
    }
}

/// A product as handed to the scoring engine.
///
/// Produced by [`crate::parsing::parse_openfoodfacts`] or deserialized from the
/// camelCase records the surrounding application stores.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
    /// `None` when the source had no nutrition data at all.
    #[serde(default)]
    pub nutrition: Option<ProductNutritionFacts>,
    #[serde(default)]
    pub additives: Vec<AdditiveRecord>,
    /// Allergen names without language prefix, e.g. "milk".
    #[serde(default)]
    pub allergens: Vec<String>,
    #[serde(default)]
    pub nova_group: Option<u8>,
    #[serde(default)]
    pub nutri_score: Option<NutriScoreGrade>,
    /// Upstream 0-100 score. When present and non-zero it replaces the heuristic score.
    #[serde(default)]
    pub nutri_score_value: Option<i32>,
}

impl ProductRecord {
    /// Name for display, falling back to the barcode.
    pub fn display_name(&self) -> String {
        match (&self.name, &self.brand) {
            (Some(name), Some(brand)) => format!("{name} ({brand})"),
            (Some(name), None) => name.clone(),
            _ => self.code.clone().unwrap_or_else(|| "unknown product".into()),
        }
    }
}
