use foodscore_core::error::FoodScoreError;
use foodscore_core::reference::allergen_report;
use foodscore_core::scoring::HealthScorer;
use std::path::PathBuf;

use crate::output;

pub fn run(
    input_file: PathBuf,
    thresholds: Option<PathBuf>,
    output_format: &str,
    verbose: bool,
) -> Result<(), FoodScoreError> {
    let scorer = match thresholds {
        Some(path) => {
            let set = foodscore_core::rules::load_thresholds(&path)?;
            tracing::debug!(name = %set.name, version = %set.version, "using custom thresholds");
            HealthScorer::new().with_thresholds(set)
        }
        None => HealthScorer::new(),
    };

    let product = foodscore_core::load_product(&input_file)?;
    let result = scorer.score(&product);

    match output_format {
        "json" => output::json::print(&result)?,
        _ => {
            let allergens = allergen_report(&product);
            output::table::print(&product, &result, &allergens, verbose)
        }
    }

    Ok(())
}
