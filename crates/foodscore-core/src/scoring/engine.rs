use crate::classify::additive::classify_additive;
use crate::classify::nutrient::{classify_with, FIBER, SALT, SATURATED_FAT, SUGAR};
use crate::model::{AdditiveRecord, HealthConcernLevel, ProductNutritionFacts, ProductRecord};
use crate::nutriscore::{NutriScoreCalculator, StandardNutriScore};
use crate::reference::database::{get_additive_info, get_nova_group_info};
use crate::rules::builtin::default_thresholds;
use crate::rules::schema::ThresholdSetDef;
use crate::scoring::outcome::{HealthGrade, HealthReason, HealthScoreResult, ReasonType, ScoreSource};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use std::borrow::Cow;

const BASE_SCORE: i32 = 100;
const PROTEIN_GOOD_SOURCE: Decimal = Decimal::from_parts(10, 0, 0, false, 0);

const NUTRITION: &str = "nutrition";
const ADDITIVES: &str = "additives";
const PROCESSING: &str = "processing";

pub const ULTRA_PROCESSED_WARNING: &str = "Ultra-processed food";

const RECOMMEND_ENJOY: &str = "Great choice! This product fits well in a balanced diet.";
const RECOMMEND_MODERATION: &str = "Good option, but best enjoyed in moderation.";
const RECOMMEND_LIMIT: &str =
    "Consider limiting consumption and looking for healthier alternatives.";

/// How the final score is produced, decided once per product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScoringStrategy {
    /// Use the upstream value; rule impacts are recorded but not applied.
    External(i32),
    /// Start at 100 and apply every rule impact.
    Heuristic,
}

impl ScoringStrategy {
    pub fn select(product: &ProductRecord) -> ScoringStrategy {
        match product.nutri_score_value {
            Some(value) if value != 0 => ScoringStrategy::External(value),
            _ => ScoringStrategy::Heuristic,
        }
    }

    fn source(&self) -> ScoreSource {
        match self {
            ScoringStrategy::External(_) => ScoreSource::External,
            ScoringStrategy::Heuristic => ScoreSource::Heuristic,
        }
    }
}

/// Running score plus the reasons and warnings collected so far.
struct ScoreSheet {
    strategy: ScoringStrategy,
    running: i32,
    reasons: Vec<HealthReason>,
    warnings: Vec<String>,
}

impl ScoreSheet {
    fn new(strategy: ScoringStrategy) -> Self {
        let running = match strategy {
            ScoringStrategy::External(value) => value,
            ScoringStrategy::Heuristic => BASE_SCORE,
        };
        Self {
            strategy,
            running,
            reasons: Vec::new(),
            warnings: Vec::new(),
        }
    }

    fn record(&mut self, kind: ReasonType, category: &str, message: String, impact: i32) {
        if self.strategy == ScoringStrategy::Heuristic {
            self.running += impact;
        }
        tracing::debug!(category, impact, running = self.running, "{}", message);
        self.reasons.push(HealthReason {
            kind,
            category: category.to_string(),
            message,
            impact,
        });
    }

    fn warn(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    fn final_score(&self) -> u8 {
        self.running.clamp(0, 100) as u8
    }
}

/// Scores products against a threshold set, filling in missing Nutri-Scores
/// with a calculator.
pub struct HealthScorer {
    thresholds: Cow<'static, ThresholdSetDef>,
    calculator: Box<dyn NutriScoreCalculator>,
}

impl Default for HealthScorer {
    fn default() -> Self {
        Self {
            thresholds: Cow::Borrowed(default_thresholds()),
            calculator: Box::new(StandardNutriScore::new()),
        }
    }
}

impl HealthScorer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom threshold set (see [`crate::rules::load_thresholds`]).
    pub fn with_thresholds(mut self, thresholds: ThresholdSetDef) -> Self {
        self.thresholds = Cow::Owned(thresholds);
        self
    }

    pub fn with_calculator(mut self, calculator: Box<dyn NutriScoreCalculator>) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn thresholds(&self) -> &ThresholdSetDef {
        &self.thresholds
    }

    pub fn score(&self, product: &ProductRecord) -> HealthScoreResult {
        self.score_at(product, Utc::now())
    }

    /// Score with a fixed timestamp.
    pub fn score_at(&self, product: &ProductRecord, now: DateTime<Utc>) -> HealthScoreResult {
        let strategy = ScoringStrategy::select(product);
        tracing::debug!(product = %product.display_name(), ?strategy, "scoring product");

        let mut sheet = ScoreSheet::new(strategy);

        if let Some(facts) = &product.nutrition {
            self.nutrition_pass(facts, &mut sheet);
        }
        additive_pass(&product.additives, &mut sheet);
        nova_pass(product.nova_group, &mut sheet);

        let score = sheet.final_score();
        let recommendation = if score >= 80 {
            RECOMMEND_ENJOY
        } else if score >= 65 {
            RECOMMEND_MODERATION
        } else {
            RECOMMEND_LIMIT
        };

        let nutri_score = product.nutri_score.or_else(|| {
            let facts = product.nutrition.as_ref()?;
            let grade = self.calculator.grade(facts);
            tracing::debug!(
                algorithm = self.calculator.algorithm_name(),
                %grade,
                "computed Nutri-Score"
            );
            Some(grade)
        });

        HealthScoreResult {
            score,
            grade: HealthGrade::from_score(score),
            source: strategy.source(),
            nutri_score,
            nova_group: product.nova_group,
            reasons: sheet.reasons,
            recommendations: vec![recommendation.to_string()],
            warnings: sheet.warnings,
            updated_at: now,
        }
    }

    /// Sugar, salt, saturated fat, fiber, protein, in that order.
    fn nutrition_pass(&self, facts: &ProductNutritionFacts, sheet: &mut ScoreSheet) {
        let set: &ThresholdSetDef = &self.thresholds;

        sugar_salt_rule(sheet, "sugar", classify_with(set, SUGAR, facts.sugars), facts.sugars);
        sugar_salt_rule(sheet, "salt", classify_with(set, SALT, facts.salt), facts.salt);

        let sat_fat = facts.saturated_fat;
        match classify_with(set, SATURATED_FAT, sat_fat) {
            HealthConcernLevel::High => sheet.record(
                ReasonType::Negative,
                NUTRITION,
                format!("High saturated fat content ({})", per_100g(sat_fat)),
                -8,
            ),
            HealthConcernLevel::VeryHigh => sheet.record(
                ReasonType::Negative,
                NUTRITION,
                format!("Very high saturated fat content ({})", per_100g(sat_fat)),
                -12,
            ),
            _ => {}
        }

        match classify_with(set, FIBER, facts.fiber) {
            HealthConcernLevel::Low => sheet.record(
                ReasonType::Positive,
                NUTRITION,
                format!("High in fiber ({})", per_100g(facts.fiber)),
                8,
            ),
            HealthConcernLevel::VeryHigh => sheet.record(
                ReasonType::Negative,
                NUTRITION,
                format!("Low in fiber ({})", per_100g(facts.fiber)),
                -5,
            ),
            _ => {}
        }

        if facts.proteins > PROTEIN_GOOD_SOURCE {
            sheet.record(
                ReasonType::Positive,
                NUTRITION,
                format!("Good source of protein ({})", per_100g(facts.proteins)),
                5,
            );
        }
    }
}

/// Score a product with the builtin thresholds and Nutri-Score calculator.
pub fn score_product(product: &ProductRecord) -> HealthScoreResult {
    HealthScorer::default().score(product)
}

fn sugar_salt_rule(sheet: &mut ScoreSheet, label: &str, level: HealthConcernLevel, value: Decimal) {
    match level {
        HealthConcernLevel::High => sheet.record(
            ReasonType::Negative,
            NUTRITION,
            format!("High {} content ({})", label, per_100g(value)),
            -10,
        ),
        HealthConcernLevel::VeryHigh => sheet.record(
            ReasonType::Negative,
            NUTRITION,
            format!("Very high {} content ({})", label, per_100g(value)),
            -15,
        ),
        HealthConcernLevel::Low => sheet.record(
            ReasonType::Positive,
            NUTRITION,
            format!("Low {} content ({})", label, per_100g(value)),
            5,
        ),
        HealthConcernLevel::Moderate => {}
    }
}

fn additive_pass(additives: &[AdditiveRecord], sheet: &mut ScoreSheet) {
    for additive in additives {
        let label = additive_label(additive);
        match classify_additive(&additive.code) {
            HealthConcernLevel::High => sheet.record(
                ReasonType::Warning,
                ADDITIVES,
                format!("Contains {label}, an additive of high concern"),
                -5,
            ),
            HealthConcernLevel::VeryHigh => {
                sheet.record(
                    ReasonType::Warning,
                    ADDITIVES,
                    format!("Contains {label}, an additive of very high concern"),
                    -8,
                );
                sheet.warn(format!("Contains {label}"));
            }
            _ => {}
        }
    }
}

fn nova_pass(nova_group: Option<u8>, sheet: &mut ScoreSheet) {
    let Some(group) = nova_group else {
        return;
    };
    let (kind, impact) = match group {
        1 => (ReasonType::Positive, 10),
        2 => (ReasonType::Positive, 5),
        3 => (ReasonType::Negative, -10),
        4 => (ReasonType::Negative, -20),
        _ => {
            tracing::debug!(group, "ignoring unknown NOVA group");
            return;
        }
    };

    let name = get_nova_group_info(group)
        .map(|info| info.name.as_str())
        .unwrap_or("Unknown processing level");
    sheet.record(kind, PROCESSING, format!("NOVA {group}: {name}"), impact);

    if group == 4 {
        sheet.warn(ULTRA_PROCESSED_WARNING);
    }
}

/// "Aspartame (E951)", falling back to the reference name or the bare code.
fn additive_label(additive: &AdditiveRecord) -> String {
    let name = if !additive.name.trim().is_empty() && additive.name != additive.code {
        Some(additive.name.as_str())
    } else {
        get_additive_info(&additive.code).map(|info| info.name.as_str())
    };
    match name {
        Some(name) => format!("{} ({})", name, additive.code),
        None => additive.code.clone(),
    }
}

fn per_100g(value: Decimal) -> String {
    format!("{}g per 100g", value.normalize())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NutriScoreGrade;
    use crate::rules::parse_thresholds_str;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn frozen() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
    }

    fn additive(code: &str, name: &str) -> AdditiveRecord {
        AdditiveRecord {
            code: code.into(),
            name: name.into(),
        }
    }

    /// Moderate on every classified nutrient, so the nutrition pass is silent.
    fn neutral_facts() -> ProductNutritionFacts {
        ProductNutritionFacts {
            sugars: dec!(7),
            salt: dec!(1),
            saturated_fat: dec!(6),
            fiber: dec!(7),
            proteins: dec!(5),
            ..ProductNutritionFacts::default()
        }
    }

    fn destroying_product() -> ProductRecord {
        ProductRecord {
            nutrition: Some(ProductNutritionFacts {
                sugars: dec!(45),
                salt: dec!(4),
                saturated_fat: dec!(20),
                fiber: dec!(0.5),
                ..ProductNutritionFacts::default()
            }),
            additives: vec![additive("E951", "Aspartame"), additive("E621", "")],
            nova_group: Some(4),
            ..ProductRecord::default()
        }
    }

    fn score(product: &ProductRecord) -> HealthScoreResult {
        HealthScorer::default().score_at(product, frozen())
    }

    fn impacts(result: &HealthScoreResult) -> Vec<i32> {
        result.reasons.iter().map(|r| r.impact).collect()
    }

    #[test]
    fn test_empty_product_scores_100() {
        let result = score(&ProductRecord::default());
        assert_eq!(result.score, 100);
        assert_eq!(result.grade, HealthGrade::Excellent);
        assert_eq!(result.source, ScoreSource::Heuristic);
        assert!(result.reasons.is_empty());
        assert_eq!(result.nutri_score, None);
        assert_eq!(result.recommendations, vec![RECOMMEND_ENJOY.to_string()]);
    }

    #[test]
    fn test_nutrition_rule_order_and_impacts() {
        let product = ProductRecord {
            nutrition: Some(ProductNutritionFacts {
                sugars: dec!(12),
                salt: dec!(0.1),
                saturated_fat: dec!(16),
                fiber: dec!(11),
                proteins: dec!(12),
                ..ProductNutritionFacts::default()
            }),
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert_eq!(impacts(&result), vec![-10, 5, -12, 8, 5]);
        assert_eq!(result.score, 96);
        assert_eq!(result.reasons[0].message, "High sugar content (12g per 100g)");
        assert_eq!(result.reasons[1].kind, ReasonType::Positive);
        assert_eq!(result.reasons[3].message, "High in fiber (11g per 100g)");
        assert!(result.reasons.iter().all(|r| r.category == NUTRITION));
    }

    #[test]
    fn test_neutral_nutrition_has_no_reasons() {
        let product = ProductRecord {
            nutrition: Some(neutral_facts()),
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert!(result.reasons.is_empty());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_protein_threshold_is_strict() {
        let mut facts = neutral_facts();
        facts.proteins = dec!(10);
        let product = ProductRecord {
            nutrition: Some(facts),
            ..ProductRecord::default()
        };
        assert!(score(&product).reasons.is_empty());
    }

    #[test]
    fn test_low_fiber_penalised() {
        let mut facts = neutral_facts();
        facts.fiber = dec!(2.9);
        let product = ProductRecord {
            nutrition: Some(facts),
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert_eq!(impacts(&result), vec![-5]);
        assert_eq!(result.reasons[0].kind, ReasonType::Negative);
        assert_eq!(result.score, 95);
    }

    #[test]
    fn test_additive_high_concern() {
        let product = ProductRecord {
            additives: vec![additive("E621", "Monosodium glutamate")],
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert_eq!(impacts(&result), vec![-5]);
        assert_eq!(result.reasons[0].kind, ReasonType::Warning);
        assert_eq!(result.reasons[0].category, ADDITIVES);
        assert!(result.warnings.is_empty());
        assert_eq!(result.score, 95);
    }

    #[test]
    fn test_additive_very_high_concern_adds_warning() {
        let product = ProductRecord {
            additives: vec![additive("E951", "Aspartame")],
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert_eq!(impacts(&result), vec![-8]);
        assert_eq!(result.warnings, vec!["Contains Aspartame (E951)".to_string()]);
        assert_eq!(result.score, 92);
    }

    #[test]
    fn test_moderate_additive_is_silent() {
        let product = ProductRecord {
            additives: vec![additive("E100", "Curcumin")],
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert!(result.reasons.is_empty());
        assert!(result.warnings.is_empty());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_additive_name_falls_back_to_table() {
        let product = ProductRecord {
            additives: vec![additive("E621", "")],
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert!(result.reasons[0].message.contains("Monosodium glutamate (E621)"));
    }

    #[test]
    fn test_nova_groups() {
        let cases = [(1, 10, 100), (2, 5, 100), (3, -10, 90), (4, -20, 80)];
        for (group, impact, expected) in cases {
            let product = ProductRecord {
                nova_group: Some(group),
                ..ProductRecord::default()
            };
            let result = score(&product);
            assert_eq!(impacts(&result), vec![impact], "group {group}");
            assert_eq!(result.reasons[0].category, PROCESSING);
            assert_eq!(result.score, expected, "group {group}");
            assert_eq!(result.nova_group, Some(group));
        }
    }

    #[test]
    fn test_nova_4_warns() {
        let product = ProductRecord {
            nova_group: Some(4),
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert_eq!(result.warnings, vec![ULTRA_PROCESSED_WARNING.to_string()]);
        let product = ProductRecord {
            nova_group: Some(3),
            ..ProductRecord::default()
        };
        assert!(score(&product).warnings.is_empty());
    }

    #[test]
    fn test_unknown_nova_group_ignored() {
        let product = ProductRecord {
            nova_group: Some(7),
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert!(result.reasons.is_empty());
        assert_eq!(result.score, 100);
    }

    #[test]
    fn test_nova_1_healthy_clamps_to_100() {
        let product = ProductRecord {
            nutrition: Some(ProductNutritionFacts {
                sugars: dec!(1),
                salt: dec!(0.01),
                fiber: dec!(12),
                proteins: dec!(20),
                ..ProductNutritionFacts::default()
            }),
            nova_group: Some(1),
            ..ProductRecord::default()
        };
        let result = score(&product);
        let unclamped: i32 = BASE_SCORE + impacts(&result).iter().sum::<i32>();
        assert!(unclamped >= 100);
        assert_eq!(result.score, 100);
        assert_eq!(result.grade, HealthGrade::Excellent);
    }

    #[test]
    fn test_clamps_at_zero() {
        let mut product = destroying_product();
        for code in ["E952", "E954", "E102", "E104", "E110", "E122", "E124", "E129", "E211"] {
            product.additives.push(additive(code, ""));
        }
        let result = score(&product);
        let unclamped: i32 = BASE_SCORE + impacts(&result).iter().sum::<i32>();
        assert!(unclamped < 0);
        assert_eq!(result.score, 0);
        assert_eq!(result.grade, HealthGrade::Avoid);
        assert_eq!(result.recommendations, vec![RECOMMEND_LIMIT.to_string()]);
    }

    #[test]
    fn test_heuristic_score_equals_sum_of_impacts() {
        let result = score(&destroying_product());
        // sugar -15, salt -15, sat fat -12, fiber -5, E951 -8, E621 -5, NOVA 4 -20
        assert_eq!(impacts(&result), vec![-15, -15, -12, -5, -8, -5, -20]);
        assert_eq!(result.score, 20);
        assert_eq!(result.grade, HealthGrade::Avoid);
    }

    #[test]
    fn test_external_score_overrides() {
        let mut product = destroying_product();
        product.nutri_score_value = Some(42);
        let result = score(&product);
        assert_eq!(result.score, 42);
        assert_eq!(result.source, ScoreSource::External);
        assert_eq!(result.grade, HealthGrade::Poor);
        // Rules still run for display.
        assert_eq!(impacts(&result), vec![-15, -15, -12, -5, -8, -5, -20]);
        assert!(result
            .reasons
            .iter()
            .any(|r| r.category == PROCESSING && r.impact == -20));
        assert!(result.warnings.contains(&ULTRA_PROCESSED_WARNING.to_string()));
    }

    #[test]
    fn test_external_score_keeps_nova_1_reason() {
        let product = ProductRecord {
            nova_group: Some(1),
            nutri_score_value: Some(55),
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert_eq!(result.score, 55);
        assert_eq!(impacts(&result), vec![10]);
    }

    #[test]
    fn test_external_zero_falls_back_to_heuristic() {
        let product = ProductRecord {
            nova_group: Some(3),
            nutri_score_value: Some(0),
            ..ProductRecord::default()
        };
        let result = score(&product);
        assert_eq!(result.source, ScoreSource::Heuristic);
        assert_eq!(result.score, 90);
    }

    #[test]
    fn test_external_score_clamped() {
        for (value, expected) in [(150, 100), (-20, 0), (100, 100)] {
            let product = ProductRecord {
                nutri_score_value: Some(value),
                ..ProductRecord::default()
            };
            assert_eq!(score(&product).score, expected);
        }
    }

    #[test]
    fn test_grade_boundaries_through_scorer() {
        let cases = [
            (34, HealthGrade::Avoid),
            (35, HealthGrade::Poor),
            (49, HealthGrade::Poor),
            (50, HealthGrade::Moderate),
            (64, HealthGrade::Moderate),
            (65, HealthGrade::Good),
            (79, HealthGrade::Good),
            (80, HealthGrade::Excellent),
        ];
        for (value, grade) in cases {
            let product = ProductRecord {
                nutri_score_value: Some(value),
                ..ProductRecord::default()
            };
            let result = score(&product);
            assert_eq!(result.grade, grade, "score {value}");
        }
    }

    #[test]
    fn test_recommendation_bands() {
        let cases = [
            (80, RECOMMEND_ENJOY),
            (79, RECOMMEND_MODERATION),
            (65, RECOMMEND_MODERATION),
            (64, RECOMMEND_LIMIT),
        ];
        for (value, expected) in cases {
            let product = ProductRecord {
                nutri_score_value: Some(value),
                ..ProductRecord::default()
            };
            assert_eq!(score(&product).recommendations, vec![expected.to_string()]);
        }
    }

    #[test]
    fn test_nutri_score_from_record_wins() {
        let product = ProductRecord {
            nutrition: Some(neutral_facts()),
            nutri_score: Some(NutriScoreGrade::A),
            ..ProductRecord::default()
        };
        assert_eq!(score(&product).nutri_score, Some(NutriScoreGrade::A));
    }

    #[test]
    fn test_nutri_score_computed_when_missing() {
        let product = ProductRecord {
            nutrition: Some(ProductNutritionFacts {
                energy_kcal: dec!(400),
                saturated_fat: dec!(12),
                salt: dec!(4.5),
                ..ProductNutritionFacts::default()
            }),
            ..ProductRecord::default()
        };
        assert_eq!(score(&product).nutri_score, Some(NutriScoreGrade::E));
    }

    struct FixedCalculator(i32);

    impl NutriScoreCalculator for FixedCalculator {
        fn points(&self, _facts: &ProductNutritionFacts) -> i32 {
            self.0
        }

        fn algorithm_name(&self) -> &str {
            "fixed"
        }
    }

    #[test]
    fn test_custom_calculator() {
        let scorer = HealthScorer::new().with_calculator(Box::new(FixedCalculator(-5)));
        let product = ProductRecord {
            nutrition: Some(neutral_facts()),
            ..ProductRecord::default()
        };
        assert_eq!(
            scorer.score_at(&product, frozen()).nutri_score,
            Some(NutriScoreGrade::A)
        );
    }

    #[test]
    fn test_custom_thresholds() {
        let strict = parse_thresholds_str(
            r#"{
                "name": "Strict sugar",
                "version": "1",
                "nutrients": [
                    { "nutrient": "sugar", "direction": "higher_is_worse",
                      "thresholds": { "low": "1", "moderate": "2", "high": "5" } }
                ]
            }"#,
        )
        .unwrap();
        let scorer = HealthScorer::new().with_thresholds(strict);
        let product = ProductRecord {
            nutrition: Some(neutral_facts()),
            ..ProductRecord::default()
        };
        let result = scorer.score_at(&product, frozen());
        // sugar 7 -> very high; nutrients missing from the set are moderate
        assert_eq!(impacts(&result), vec![-15]);
        assert_eq!(scorer.thresholds().name, "Strict sugar");
    }

    #[test]
    fn test_idempotent_with_frozen_clock() {
        let product = destroying_product();
        let first = score(&product);
        let second = score(&product);
        assert_eq!(first, second);
        assert_eq!(first.updated_at, frozen());
    }

    #[test]
    fn test_score_product_uses_current_time() {
        let before = Utc::now();
        let result = score_product(&ProductRecord::default());
        assert!(result.updated_at >= before);
    }
}
