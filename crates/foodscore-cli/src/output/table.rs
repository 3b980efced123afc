use foodscore_core::model::ProductRecord;
use foodscore_core::nutriscore::{NutriScoreCalculator, StandardNutriScore};
use foodscore_core::reference::report::AllergenReport;
use foodscore_core::scoring::{HealthScoreResult, ReasonType, ScoreSource};

pub fn print(
    product: &ProductRecord,
    result: &HealthScoreResult,
    allergens: &AllergenReport,
    verbose: bool,
) {
    println!("=== {} ===\n", product.display_name());

    let source = match result.source {
        ScoreSource::External => " (upstream score)",
        ScoreSource::Heuristic => "",
    };
    println!("  Score: {}/100 -> {}{}", result.score, result.grade, source);

    let nutri = result
        .nutri_score
        .map(|g| g.to_string())
        .unwrap_or_else(|| "-".into());
    let nova = result
        .nova_group
        .map(|g| g.to_string())
        .unwrap_or_else(|| "-".into());
    println!("  Nutri-Score: {}   NOVA: {}\n", nutri, nova);

    if !result.reasons.is_empty() {
        println!("  Reasons:");
        let max_msg = result
            .reasons
            .iter()
            .map(|r| r.message.len())
            .max()
            .unwrap_or(20);
        for reason in &result.reasons {
            let marker = match reason.kind {
                ReasonType::Positive => '+',
                ReasonType::Negative => '-',
                ReasonType::Warning => '!',
            };
            if verbose {
                println!(
                    "    {} {:<width$}  {:>4}  [{}]",
                    marker,
                    reason.message,
                    reason.impact,
                    reason.category,
                    width = max_msg
                );
            } else {
                println!(
                    "    {} {:<width$}  {:>4}",
                    marker,
                    reason.message,
                    reason.impact,
                    width = max_msg
                );
            }
        }
        println!();
    }

    if !result.warnings.is_empty() {
        println!("  Warnings:");
        for w in &result.warnings {
            println!("    ! {}", w);
        }
        println!();
    }

    if !allergens.is_empty() {
        println!("  Allergens:");
        for info in &allergens.matched {
            println!("    {} ({})", info.name, info.severity);
            if verbose && !info.hidden_sources.is_empty() {
                println!("      Hidden in: {}", info.hidden_sources.join(", "));
            }
        }
        if !allergens.unmatched.is_empty() {
            println!("    Unrecognized: {}", allergens.unmatched.join(", "));
        }
        println!();
    }

    if verbose {
        if let Some(ref facts) = product.nutrition {
            print_nutri_breakdown(facts, product.nutri_score.is_some());
        }
    }

    for rec in &result.recommendations {
        println!("  {}", rec);
    }
}

fn print_nutri_breakdown(facts: &foodscore_core::model::ProductNutritionFacts, upstream: bool) {
    let calc = StandardNutriScore::new();
    let b = calc.breakdown(facts);
    let label = if upstream {
        "Computed Nutri-Score (upstream grade shown above)"
    } else {
        "Computed Nutri-Score"
    };
    println!("  {} [{}]:", label, calc.algorithm_name());
    println!(
        "    Negative: energy {}, sugars {}, saturated fat {}, sodium {} = {}",
        b.energy,
        b.sugars,
        b.saturated_fat,
        b.sodium,
        b.negative()
    );
    let protein_note = if b.protein_counted { "" } else { " (not counted)" };
    println!(
        "    Positive: fiber {}, protein {}{}",
        b.fiber, b.protein, protein_note
    );
    println!(
        "    Total: {} -> {}\n",
        b.total,
        foodscore_core::nutriscore::grade_for_points(b.total)
    );
}
