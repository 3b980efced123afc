use foodscore_core::classify_additive;
use foodscore_core::error::FoodScoreError;
use foodscore_core::parsing::normalize::normalize_additive_code;
use foodscore_core::reference::{find_matching_allergen, get_additive_info, lookup_nova};

pub fn additive(code: &str) -> Result<(), FoodScoreError> {
    let code = normalize_additive_code(code);
    if code.is_empty() {
        return Err(FoodScoreError::UnknownReference("an empty additive code".into()));
    }
    let concern = classify_additive(&code);

    match get_additive_info(&code) {
        Some(info) => {
            println!("{} {} ({})\n", code, info.name, info.class);
            println!("  {}\n", info.description);
        }
        None => println!("{} (not in the additive table)\n", code),
    }
    println!("  Concern level: {}", concern);
    Ok(())
}

pub fn allergen(term: &str) -> Result<(), FoodScoreError> {
    let info = find_matching_allergen(term)
        .ok_or_else(|| FoodScoreError::UnknownReference(format!("allergen '{}'", term)))?;

    println!("{} ({} reactions)\n", info.name, info.severity);
    println!("  {}\n", info.description);
    println!("  Also known as: {}", info.common_names.join(", "));
    if !info.hidden_sources.is_empty() {
        println!("  Hidden sources: {}", info.hidden_sources.join(", "));
    }
    Ok(())
}

pub fn nova(group: &str) -> Result<(), FoodScoreError> {
    let info = lookup_nova(group)
        .ok_or_else(|| FoodScoreError::UnknownReference(format!("NOVA group '{}'", group)))?;

    println!("NOVA {}: {}\n", info.group, info.name);
    println!("  {}\n", info.description);
    if !info.examples.is_empty() {
        println!("  Examples: {}", info.examples.join(", "));
    }
    Ok(())
}
