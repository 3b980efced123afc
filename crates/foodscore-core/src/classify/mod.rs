pub mod additive;
pub mod nutrient;

pub use additive::classify_additive;
pub use nutrient::{classify_nutrient, classify_with};
