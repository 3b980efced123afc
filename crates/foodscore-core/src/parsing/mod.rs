pub mod normalize;
pub mod values;

use crate::error::FoodScoreError;
use crate::model::{AdditiveRecord, NutriScoreGrade, ProductNutritionFacts, ProductRecord};
use crate::reference::database::get_additive_info;
use normalize::{normalize_additive_code, strip_language_prefix};
use rust_decimal::Decimal;
use serde_json::{Map, Value};
use values::parse_nutriment;

const KCAL_TO_KJ: Decimal = Decimal::from_parts(4184, 0, 0, false, 3);

/// Keys that only appear in OpenFoodFacts documents, never in a `ProductRecord`.
const OPENFOODFACTS_KEYS: &[&str] = &[
    "product",
    "status",
    "status_verbose",
    "nutriments",
    "additives_tags",
    "allergens_tags",
    "nova_group",
    "nutriscore_grade",
    "product_name",
];

/// Parse a product document: either an OpenFoodFacts response or a
/// serialized [`ProductRecord`].
pub fn parse_product_document(json: &str) -> Result<ProductRecord, FoodScoreError> {
    let doc: Value = serde_json::from_str(json)?;
    if is_openfoodfacts_document(&doc) {
        parse_openfoodfacts_value(&doc)
    } else {
        let record: ProductRecord = serde_json::from_value(doc)?;
        Ok(normalize_record(record))
    }
}

/// Bring a deserialized record to the same canonical form the
/// OpenFoodFacts normalizer produces.
///
/// Additive codes are canonicalized and deduplicated, negative nutrients
/// become 0, allergen language prefixes are stripped and NOVA groups
/// outside 1-4 are dropped.
pub fn normalize_record(mut record: ProductRecord) -> ProductRecord {
    if let Some(facts) = record.nutrition.as_mut() {
        clamp_negative_nutrients(facts);
    }

    let mut additives: Vec<AdditiveRecord> = Vec::with_capacity(record.additives.len());
    for additive in record.additives {
        let code = normalize_additive_code(&additive.code);
        if code.is_empty() {
            tracing::warn!(code = %additive.code, "ignoring additive without a code");
            continue;
        }
        if additives.iter().any(|a| a.code == code) {
            continue;
        }
        let name = if additive.name.trim().is_empty() {
            get_additive_info(&code)
                .map(|info| info.name.clone())
                .unwrap_or_else(|| code.clone())
        } else {
            additive.name
        };
        additives.push(AdditiveRecord { code, name });
    }
    record.additives = additives;

    let mut allergens: Vec<String> = Vec::with_capacity(record.allergens.len());
    for allergen in &record.allergens {
        let name = strip_language_prefix(allergen).to_string();
        if !name.is_empty() && !allergens.contains(&name) {
            allergens.push(name);
        }
    }
    record.allergens = allergens;

    if let Some(group) = record.nova_group {
        if !(1..=4).contains(&group) {
            tracing::warn!(group, "ignoring invalid NOVA group");
            record.nova_group = None;
        }
    }

    record
}

fn clamp_negative_nutrients(facts: &mut ProductNutritionFacts) {
    let fields = [
        ("energyKcal", &mut facts.energy_kcal),
        ("fat", &mut facts.fat),
        ("saturatedFat", &mut facts.saturated_fat),
        ("carbohydrates", &mut facts.carbohydrates),
        ("sugars", &mut facts.sugars),
        ("fiber", &mut facts.fiber),
        ("proteins", &mut facts.proteins),
        ("salt", &mut facts.salt),
        ("sodium", &mut facts.sodium),
    ];
    for (key, value) in fields {
        if *value < Decimal::ZERO {
            tracing::warn!(key, value = %value, "negative nutrient, using 0");
            *value = Decimal::ZERO;
        }
    }
}

/// Whether a JSON document looks like OpenFoodFacts output.
pub fn is_openfoodfacts_document(doc: &Value) -> bool {
    doc.as_object()
        .is_some_and(|obj| OPENFOODFACTS_KEYS.iter().any(|k| obj.contains_key(*k)))
}

/// Parse an OpenFoodFacts product JSON string.
///
/// Accepts the API envelope (`{"status": 1, "product": {...}}`) or a bare
/// product object.
pub fn parse_openfoodfacts(json: &str) -> Result<ProductRecord, FoodScoreError> {
    let doc: Value = serde_json::from_str(json)?;
    parse_openfoodfacts_value(&doc)
}

/// Parse an already-decoded OpenFoodFacts document.
pub fn parse_openfoodfacts_value(doc: &Value) -> Result<ProductRecord, FoodScoreError> {
    let obj = doc
        .as_object()
        .ok_or_else(|| FoodScoreError::ProductParse("expected a JSON object".into()))?;

    let product = match obj.get("product") {
        Some(Value::Object(product)) => product,
        Some(_) => {
            return Err(FoodScoreError::ProductParse(
                "'product' must be an object".into(),
            ))
        }
        None if is_not_found(obj) => {
            let detail = obj
                .get("status_verbose")
                .and_then(Value::as_str)
                .unwrap_or("no product in response");
            let code = obj.get("code").and_then(text).unwrap_or_default();
            return Err(FoodScoreError::ProductNotFound(
                format!("{code} {detail}").trim().to_string(),
            ));
        }
        None => obj,
    };

    let code = product
        .get("code")
        .and_then(text)
        .or_else(|| obj.get("code").and_then(text));

    Ok(ProductRecord {
        code,
        name: product.get("product_name").and_then(text),
        brand: product.get("brands").and_then(text),
        nutrition: product
            .get("nutriments")
            .and_then(Value::as_object)
            .and_then(parse_nutriments),
        additives: parse_additives(product.get("additives_tags")),
        allergens: parse_allergens(product.get("allergens_tags")),
        nova_group: product.get("nova_group").and_then(parse_nova_group),
        nutri_score: product
            .get("nutriscore_grade")
            .and_then(Value::as_str)
            .and_then(NutriScoreGrade::from_str_loose),
        nutri_score_value: None,
    })
}

fn is_not_found(obj: &Map<String, Value>) -> bool {
    match obj.get("status") {
        Some(Value::Number(n)) => n.as_i64() == Some(0),
        Some(Value::String(s)) => s == "0" || s.eq_ignore_ascii_case("failure"),
        _ => false,
    }
}

/// Non-empty trimmed text from a string or number.
fn text(value: &Value) -> Option<String> {
    let s = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        _ => return None,
    };
    (!s.is_empty()).then_some(s)
}

/// Per-100 g nutriments. `None` if none of the known fields are present.
fn parse_nutriments(nutriments: &Map<String, Value>) -> Option<ProductNutritionFacts> {
    let mut found = false;
    let mut field = |key: &str| -> Decimal {
        let Some(raw) = nutriments.get(key) else {
            return Decimal::ZERO;
        };
        match parse_nutriment(raw) {
            Ok(Some(v)) if v < Decimal::ZERO => {
                tracing::warn!(key, value = %v, "negative nutriment, using 0");
                found = true;
                Decimal::ZERO
            }
            Ok(Some(v)) => {
                found = true;
                v
            }
            Ok(None) => Decimal::ZERO,
            Err(e) => {
                tracing::warn!(key, error = %e, "unreadable nutriment, using 0");
                Decimal::ZERO
            }
        }
    };

    let energy_kcal = match nutriments.get("energy-kcal_100g") {
        Some(_) => field("energy-kcal_100g"),
        None => (field("energy_100g") / KCAL_TO_KJ).round_dp(1),
    };

    let facts = ProductNutritionFacts {
        energy_kcal,
        fat: field("fat_100g"),
        saturated_fat: field("saturated-fat_100g"),
        carbohydrates: field("carbohydrates_100g"),
        sugars: field("sugars_100g"),
        fiber: field("fiber_100g"),
        proteins: field("proteins_100g"),
        salt: field("salt_100g"),
        sodium: field("sodium_100g"),
    };

    found.then_some(facts)
}

/// `["en:e150d", "en:e338"]` -> canonical, deduplicated additive records.
fn parse_additives(tags: Option<&Value>) -> Vec<AdditiveRecord> {
    let mut additives: Vec<AdditiveRecord> = Vec::new();
    for tag in tags.and_then(Value::as_array).into_iter().flatten() {
        let Some(tag) = tag.as_str() else {
            tracing::warn!(%tag, "ignoring non-string additive tag");
            continue;
        };
        let code = normalize_additive_code(tag);
        if code.is_empty() || additives.iter().any(|a| a.code == code) {
            continue;
        }
        let name = get_additive_info(&code)
            .map(|info| info.name.clone())
            .unwrap_or_else(|| code.clone());
        additives.push(AdditiveRecord { code, name });
    }
    additives
}

fn parse_allergens(tags: Option<&Value>) -> Vec<String> {
    let mut allergens: Vec<String> = Vec::new();
    for tag in tags.and_then(Value::as_array).into_iter().flatten() {
        let Some(tag) = tag.as_str() else {
            continue;
        };
        let name = strip_language_prefix(tag).to_string();
        if !name.is_empty() && !allergens.contains(&name) {
            allergens.push(name);
        }
    }
    allergens
}

fn parse_nova_group(value: &Value) -> Option<u8> {
    let group = match value {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    match group {
        Some(g @ 1..=4) => Some(g as u8),
        _ => {
            tracing::warn!(%value, "ignoring invalid NOVA group");
            None
        }
    }
}
