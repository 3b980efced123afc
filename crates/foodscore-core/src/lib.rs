pub mod classify;
pub mod error;
pub mod model;
pub mod nutriscore;
pub mod parsing;
pub mod reference;
pub mod rules;
pub mod scoring;

use error::FoodScoreError;
use model::ProductRecord;
use rules::schema::ThresholdSetDef;
use scoring::{HealthScoreResult, HealthScorer};
use std::path::Path;

pub use classify::{classify_additive, classify_nutrient};
pub use model::HealthConcernLevel;
pub use scoring::score_product;

/// Read a product document from disk.
///
/// Accepts OpenFoodFacts API output or a serialized [`ProductRecord`].
pub fn load_product(path: &Path) -> Result<ProductRecord, FoodScoreError> {
    let content = std::fs::read_to_string(path)?;
    let product = parsing::parse_product_document(&content)?;
    tracing::debug!(path = %path.display(), product = %product.display_name(), "loaded product");
    Ok(product)
}

/// Main API entry point: parse a product document and score it.
///
/// Uses the built-in thresholds unless a custom set is given.
pub fn score_document(
    json: &str,
    thresholds: Option<ThresholdSetDef>,
) -> Result<HealthScoreResult, FoodScoreError> {
    let product = parsing::parse_product_document(json)?;
    let scorer = match thresholds {
        Some(set) => HealthScorer::new().with_thresholds(set),
        None => HealthScorer::new(),
    };
    Ok(scorer.score(&product))
}
