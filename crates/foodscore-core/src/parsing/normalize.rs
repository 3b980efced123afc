/// Normalize a free-text lookup key: trim, lowercase, collapse inner whitespace.
pub fn normalize_lookup_key(raw: &str) -> String {
    raw.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Strip an OpenFoodFacts language prefix: "en:milk" -> "milk".
///
/// Only alphabetic two- or three-letter prefixes are treated as languages.
pub fn strip_language_prefix(tag: &str) -> &str {
    let tag = tag.trim();
    match tag.split_once(':') {
        Some((lang, rest))
            if (2..=3).contains(&lang.len()) && lang.chars().all(|c| c.is_ascii_alphabetic()) =>
        {
            rest
        }
        _ => tag,
    }
}

/// Canonical additive code: "en:e150d" -> "E150D", "E 621" -> "E621".
pub fn normalize_additive_code(raw: &str) -> String {
    strip_language_prefix(raw)
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '-')
        .collect::<String>()
        .to_uppercase()
}

/// Allergen tag to lookup term: "en:sulphur-dioxide-and-sulphites" ->
/// "sulphur dioxide and sulphites".
pub fn normalize_allergen_tag(raw: &str) -> String {
    let mut s = String::with_capacity(raw.len());
    for c in strip_language_prefix(raw).chars() {
        match c {
            '-' | '_' => s.push(' '),
            _ => s.push(c),
        }
    }
    normalize_lookup_key(&s)
}
