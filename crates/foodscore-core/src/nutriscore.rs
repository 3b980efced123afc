use crate::model::{NutriScoreGrade, ProductNutritionFacts};
use rust_decimal::Decimal;
use serde::Serialize;

const KCAL_TO_KJ: Decimal = Decimal::from_parts(4184, 0, 0, false, 3);
/// Sodium (mg) per gram of salt.
const SALT_TO_SODIUM_MG: Decimal = Decimal::from_parts(400, 0, 0, false, 0);
const GRAMS_TO_MG: Decimal = Decimal::from_parts(1000, 0, 0, false, 0);

/// Negative points at or above this total stop protein from counting.
const PROTEIN_CUTOFF: i32 = 11;

const ENERGY_KJ_STEPS: [Decimal; 10] = [
    Decimal::from_parts(335, 0, 0, false, 0),
    Decimal::from_parts(670, 0, 0, false, 0),
    Decimal::from_parts(1005, 0, 0, false, 0),
    Decimal::from_parts(1340, 0, 0, false, 0),
    Decimal::from_parts(1675, 0, 0, false, 0),
    Decimal::from_parts(2010, 0, 0, false, 0),
    Decimal::from_parts(2345, 0, 0, false, 0),
    Decimal::from_parts(2680, 0, 0, false, 0),
    Decimal::from_parts(3015, 0, 0, false, 0),
    Decimal::from_parts(3350, 0, 0, false, 0),
];

const SUGARS_STEPS: [Decimal; 10] = [
    Decimal::from_parts(45, 0, 0, false, 1),
    Decimal::from_parts(9, 0, 0, false, 0),
    Decimal::from_parts(135, 0, 0, false, 1),
    Decimal::from_parts(18, 0, 0, false, 0),
    Decimal::from_parts(225, 0, 0, false, 1),
    Decimal::from_parts(27, 0, 0, false, 0),
    Decimal::from_parts(31, 0, 0, false, 0),
    Decimal::from_parts(36, 0, 0, false, 0),
    Decimal::from_parts(40, 0, 0, false, 0),
    Decimal::from_parts(45, 0, 0, false, 0),
];

const SATURATED_FAT_STEPS: [Decimal; 10] = [
    Decimal::from_parts(1, 0, 0, false, 0),
    Decimal::from_parts(2, 0, 0, false, 0),
    Decimal::from_parts(3, 0, 0, false, 0),
    Decimal::from_parts(4, 0, 0, false, 0),
    Decimal::from_parts(5, 0, 0, false, 0),
    Decimal::from_parts(6, 0, 0, false, 0),
    Decimal::from_parts(7, 0, 0, false, 0),
    Decimal::from_parts(8, 0, 0, false, 0),
    Decimal::from_parts(9, 0, 0, false, 0),
    Decimal::from_parts(10, 0, 0, false, 0),
];

const SODIUM_MG_STEPS: [Decimal; 10] = [
    Decimal::from_parts(90, 0, 0, false, 0),
    Decimal::from_parts(180, 0, 0, false, 0),
    Decimal::from_parts(270, 0, 0, false, 0),
    Decimal::from_parts(360, 0, 0, false, 0),
    Decimal::from_parts(450, 0, 0, false, 0),
    Decimal::from_parts(540, 0, 0, false, 0),
    Decimal::from_parts(630, 0, 0, false, 0),
    Decimal::from_parts(720, 0, 0, false, 0),
    Decimal::from_parts(810, 0, 0, false, 0),
    Decimal::from_parts(900, 0, 0, false, 0),
];

const FIBER_STEPS: [Decimal; 5] = [
    Decimal::from_parts(9, 0, 0, false, 1),
    Decimal::from_parts(19, 0, 0, false, 1),
    Decimal::from_parts(28, 0, 0, false, 1),
    Decimal::from_parts(37, 0, 0, false, 1),
    Decimal::from_parts(47, 0, 0, false, 1),
];

const PROTEIN_STEPS: [Decimal; 5] = [
    Decimal::from_parts(16, 0, 0, false, 1),
    Decimal::from_parts(32, 0, 0, false, 1),
    Decimal::from_parts(48, 0, 0, false, 1),
    Decimal::from_parts(64, 0, 0, false, 1),
    Decimal::from_parts(80, 0, 0, false, 1),
];

/// Produces a Nutri-Score from nutrition facts.
pub trait NutriScoreCalculator: Send + Sync {
    /// Final Nutri-Score points (lower is better).
    fn points(&self, facts: &ProductNutritionFacts) -> i32;

    fn grade(&self, facts: &ProductNutritionFacts) -> NutriScoreGrade {
        grade_for_points(self.points(facts))
    }

    /// Name of the algorithm (for diagnostics).
    fn algorithm_name(&self) -> &str;
}

/// Map final points to a letter using the general-food cut-offs.
pub fn grade_for_points(points: i32) -> NutriScoreGrade {
    match points {
        i32::MIN..=-1 => NutriScoreGrade::A,
        0..=2 => NutriScoreGrade::B,
        3..=10 => NutriScoreGrade::C,
        11..=18 => NutriScoreGrade::D,
        _ => NutriScoreGrade::E,
    }
}

/// Per-component points.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NutriScoreBreakdown {
    pub energy: i32,
    pub sugars: i32,
    pub saturated_fat: i32,
    pub sodium: i32,
    pub fiber: i32,
    pub protein: i32,
    /// Whether protein points were subtracted.
    pub protein_counted: bool,
    pub total: i32,
}

impl NutriScoreBreakdown {
    pub fn negative(&self) -> i32 {
        self.energy + self.sugars + self.saturated_fat + self.sodium
    }
}

/// Nutri-Score points for products whose source carries no grade.
///
/// Implements the 2017 general-food algorithm. Fruit, vegetable and nut
/// content is not part of [`ProductNutritionFacts`] and always scores 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardNutriScore;

impl StandardNutriScore {
    pub fn new() -> Self {
        Self
    }

    pub fn breakdown(&self, facts: &ProductNutritionFacts) -> NutriScoreBreakdown {
        let energy_kj = saturating_mul(facts.energy_kcal, KCAL_TO_KJ);
        let sodium_mg = if facts.sodium.is_zero() {
            saturating_mul(facts.salt, SALT_TO_SODIUM_MG)
        } else {
            saturating_mul(facts.sodium, GRAMS_TO_MG)
        };

        let energy = step_points(energy_kj, &ENERGY_KJ_STEPS);
        let sugars = step_points(facts.sugars, &SUGARS_STEPS);
        let saturated_fat = step_points(facts.saturated_fat, &SATURATED_FAT_STEPS);
        let sodium = step_points(sodium_mg, &SODIUM_MG_STEPS);
        let fiber = step_points(facts.fiber, &FIBER_STEPS);
        let protein = step_points(facts.proteins, &PROTEIN_STEPS);

        let negative = energy + sugars + saturated_fat + sodium;
        let protein_counted = negative < PROTEIN_CUTOFF;
        let total = if protein_counted {
            negative - fiber - protein
        } else {
            negative - fiber
        };

        NutriScoreBreakdown {
            energy,
            sugars,
            saturated_fat,
            sodium,
            fiber,
            protein,
            protein_counted,
            total,
        }
    }
}

impl NutriScoreCalculator for StandardNutriScore {
    fn points(&self, facts: &ProductNutritionFacts) -> i32 {
        self.breakdown(facts).total
    }

    fn algorithm_name(&self) -> &str {
        "nutri-score-2017"
    }
}

/// Unit conversion capped at `Decimal::MAX`; every step table tops out far below it.
fn saturating_mul(value: Decimal, factor: Decimal) -> Decimal {
    value.checked_mul(factor).unwrap_or(Decimal::MAX)
}

/// Number of steps strictly exceeded.
fn step_points(value: Decimal, steps: &[Decimal]) -> i32 {
    steps.iter().take_while(|&&step| value > step).count() as i32
}
