//! Dictionary word model for storage and API.

use serde::{Deserialize, Serialize};

/// One sense of a word.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meaning {
    /// Definition text
    pub definition: String,
    /// Example sentence demonstrating usage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_example: Option<String>,
}

/// Canonical dictionary entry stored in Firestore.
///
/// The document ID is the url-encoded lowercase surface form, which makes
/// surface-form uniqueness a document-identity property and case-insensitive
/// lookup a single point read.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Word {
    /// Surface form as originally submitted (e.g. "Bonjour")
    pub word: String,
    /// Lowercase lookup key (also the document ID before url-encoding)
    pub word_key: String,
    /// Ordered senses; at least one with a non-empty definition
    pub meanings: Vec<Meaning>,
    /// Optional grammar notes
    #[serde(skip_serializing_if = "Option::is_none")]
    pub grammar_notes: Option<String>,
    /// When the entry was added (ISO 8601)
    pub created_at: String,
}

impl Word {
    /// Lowercase lookup key for a surface form.
    pub fn surface_key(surface: &str) -> String {
        surface.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_surface_key_normalizes_case_and_whitespace() {
        assert_eq!(Word::surface_key("Bonjour"), "bonjour");
        assert_eq!(Word::surface_key("  Guten Tag "), "guten tag");
        assert_eq!(Word::surface_key("ÊTRE"), "être");
    }
}
