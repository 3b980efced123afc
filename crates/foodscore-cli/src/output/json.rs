use foodscore_core::error::FoodScoreError;
use serde::Serialize;

pub fn print<T: Serialize>(value: &T) -> Result<(), FoodScoreError> {
    let json = serde_json::to_string_pretty(value)?;
    println!("{json}");
    Ok(())
}
