use super::database::find_matching_allergen;
use super::schema::AllergenInfo;
use crate::model::ProductRecord;
use crate::parsing::normalize::normalize_allergen_tag;
use serde::Serialize;

/// Allergens declared on a product, resolved against the allergen table.
#[derive(Debug, Clone, Serialize)]
pub struct AllergenReport {
    /// Resolved allergens, deduplicated, in the order the product lists them.
    pub matched: Vec<&'static AllergenInfo>,
    /// Declared allergens with no table entry.
    pub unmatched: Vec<String>,
}

impl AllergenReport {
    pub fn is_empty(&self) -> bool {
        self.matched.is_empty() && self.unmatched.is_empty()
    }
}

/// Resolve every allergen declared on a product.
pub fn allergen_report(product: &ProductRecord) -> AllergenReport {
    let mut matched: Vec<&'static AllergenInfo> = Vec::new();
    let mut unmatched = Vec::new();

    for declared in &product.allergens {
        let term = normalize_allergen_tag(declared);
        match find_matching_allergen(&term) {
            Some(info) => {
                if !matched.iter().any(|m| m.name == info.name) {
                    matched.push(info);
                }
            }
            None => {
                tracing::debug!(allergen = %declared, "no allergen table entry");
                if !term.is_empty() && !unmatched.contains(&term) {
                    unmatched.push(term);
                }
            }
        }
    }

    AllergenReport { matched, unmatched }
}
