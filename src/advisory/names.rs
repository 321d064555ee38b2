//! Crop name normalization
//!
//! The classifier was trained on singular labels ("groundnut", "millet")
//! while the tips and knowledge-base tables are keyed by the plural names
//! farmers use. This module maps one vocabulary onto the other.

use serde::Serialize;
use std::fmt;

/// Classifier label → knowledge-base key
static CROP_SYNONYMS: &[(&str, &str)] = &[
    ("groundnut", "ground nuts"),
    ("millet", "millets"),
    ("pulse", "pulses"),
];

/// Canonical lowercase crop identifier used by the lookup tables
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct CropKey(String);

impl CropKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Title-cased name for display ("ground nuts" → "Ground Nuts")
    pub fn display_name(&self) -> String {
        title_case(&self.0)
    }
}

impl fmt::Display for CropKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CropKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Map a raw classifier label to its knowledge-base key.
///
/// Total over all strings: unmapped labels are returned lower-cased but
/// otherwise unchanged (whitespace included).
pub fn normalize(label: &str) -> CropKey {
    let lowered = label.to_lowercase();
    let key = CROP_SYNONYMS
        .iter()
        .find(|(from, _)| *from == lowered)
        .map(|(_, to)| to.to_string())
        .unwrap_or(lowered);
    CropKey(key)
}

/// Capitalize the first letter of every whitespace-separated word
pub fn title_case(name: &str) -> String {
    name.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
