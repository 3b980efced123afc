use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// How severe reactions to an allergen typically are.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AllergenSeverity {
    Mild,
    Moderate,
    Severe,
}

impl fmt::Display for AllergenSeverity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllergenSeverity::Mild => write!(f, "mild"),
            AllergenSeverity::Moderate => write!(f, "moderate"),
            AllergenSeverity::Severe => write!(f, "severe"),
        }
    }
}

/// A regulated allergen.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AllergenInfo {
    /// Canonical lowercase key (e.g., "milk", "peanuts").
    pub name: String,
    pub description: String,
    pub severity: AllergenSeverity,
    /// Alternate names, lowercase. Used for fuzzy matching.
    pub common_names: Vec<String>,
    /// Foods where the allergen is often present without being obvious.
    #[serde(default)]
    pub hidden_sources: Vec<String>,
}

/// Allergen table in declaration order.
#[derive(Debug, Clone, Deserialize)]
pub struct AllergenTable {
    pub version: String,
    pub description: String,
    pub allergens: Vec<AllergenInfo>,
}

/// A food additive entry, keyed by E-number in [`AdditiveTable`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AdditiveInfo {
    pub name: String,
    /// Functional class (e.g., "colour", "preservative", "sweetener").
    pub class: String,
    pub description: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AdditiveTable {
    pub version: String,
    pub description: String,
    /// Uppercase E-number -> additive.
    pub additives: BTreeMap<String, AdditiveInfo>,
}

/// One NOVA processing group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NovaGroupInfo {
    pub group: u8,
    pub name: String,
    pub description: String,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NovaTable {
    pub version: String,
    pub description: String,
    pub groups: Vec<NovaGroupInfo>,
}
