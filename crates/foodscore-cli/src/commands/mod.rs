pub mod lookup;
pub mod rules;
pub mod score;
