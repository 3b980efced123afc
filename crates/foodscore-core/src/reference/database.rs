use super::schema::{AdditiveInfo, AdditiveTable, AllergenInfo, AllergenTable, NovaGroupInfo, NovaTable};
use crate::parsing::normalize::{normalize_additive_code, normalize_lookup_key};
use std::sync::LazyLock;

const ALLERGENS_JSON: &str = include_str!("../../../../rules/allergens.json");
const ADDITIVES_JSON: &str = include_str!("../../../../rules/additives.json");
const NOVA_GROUPS_JSON: &str = include_str!("../../../../rules/nova-groups.json");

static ALLERGEN_TABLE: LazyLock<AllergenTable> = LazyLock::new(|| {
    serde_json::from_str(ALLERGENS_JSON).expect("embedded allergens.json is valid")
});

static ADDITIVE_TABLE: LazyLock<AdditiveTable> = LazyLock::new(|| {
    serde_json::from_str(ADDITIVES_JSON).expect("embedded additives.json is valid")
});

static NOVA_TABLE: LazyLock<NovaTable> = LazyLock::new(|| {
    serde_json::from_str(NOVA_GROUPS_JSON).expect("embedded nova-groups.json is valid")
});

/// Get the allergen table.
pub fn allergen_table() -> &'static AllergenTable {
    &ALLERGEN_TABLE
}

/// Get the additive table.
pub fn additive_table() -> &'static AdditiveTable {
    &ADDITIVE_TABLE
}

/// Get the NOVA group table.
pub fn nova_table() -> &'static NovaTable {
    &NOVA_TABLE
}

/// Look up an allergen by its canonical name (case and whitespace insensitive).
pub fn get_allergen_info(name: &str) -> Option<&'static AllergenInfo> {
    let key = normalize_lookup_key(name);
    ALLERGEN_TABLE.allergens.iter().find(|a| a.name == key)
}

/// Resolve a free-text term to an allergen.
///
/// Exact name match first, then the first allergen (in table order) with a
/// common name that contains the term or is contained in it.
pub fn find_matching_allergen(term: &str) -> Option<&'static AllergenInfo> {
    let key = normalize_lookup_key(term);
    if key.is_empty() {
        return None;
    }

    if let Some(info) = get_allergen_info(&key) {
        return Some(info);
    }

    ALLERGEN_TABLE.allergens.iter().find(|a| {
        a.common_names
            .iter()
            .any(|common| common.contains(key.as_str()) || key.contains(common.as_str()))
    })
}

/// Look up an additive by code. Accepts "E621", "e621" and tag forms like "en:e621".
pub fn get_additive_info(code: &str) -> Option<&'static AdditiveInfo> {
    ADDITIVE_TABLE.additives.get(&normalize_additive_code(code))
}

/// Look up a NOVA group by number.
pub fn get_nova_group_info(group: u8) -> Option<&'static NovaGroupInfo> {
    NOVA_TABLE.groups.iter().find(|g| g.group == group)
}

/// Look up a NOVA group from text such as "4", "nova 4" or "NOVA-4".
pub fn lookup_nova(key: &str) -> Option<&'static NovaGroupInfo> {
    let key = normalize_lookup_key(key);
    let digits = key
        .strip_prefix("nova")
        .unwrap_or(&key)
        .trim_start_matches([' ', '-', '_', ':']);
    digits.parse::<u8>().ok().and_then(get_nova_group_info)
}
