//! Retrieved policy passages
//!
//! A passage is one ranked hit from a policy search: the chunk text, the
//! metadata stored with it at indexing time, and its distance to the query
//! (lower is closer).

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key holding the heading of the section a chunk came from
pub const SECTION_TITLE_KEY: &str = "section_title";

/// One ranked passage returned by a policy retriever
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PolicyPassage {
    /// Passage text
    pub text: String,
    /// Indexing metadata (policy id, section title, page numbers, ...)
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Distance to the query, `1 - similarity`
    #[serde(default)]
    pub distance: f64,
}

impl PolicyPassage {
    /// Creates a passage without metadata
    pub fn new(text: impl Into<String>, distance: f64) -> Self {
        Self {
            text: text.into(),
            metadata: Map::new(),
            distance,
        }
    }

    /// Adds a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Returns the section title recorded at indexing time, if any
    pub fn section_title(&self) -> Option<&str> {
        self.metadata
            .get(SECTION_TITLE_KEY)
            .and_then(Value::as_str)
            .filter(|title| !title.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_section_title_lookup() {
        let passage = PolicyPassage::new("Ambulante Heilbehandlung 80 %", 0.12)
            .with_metadata(SECTION_TITLE_KEY, "2. Leistungen");
        assert_eq!(passage.section_title(), Some("2. Leistungen"));

        let bare = PolicyPassage::new("text", 0.5);
        assert_eq!(bare.section_title(), None);
    }

    #[test]
    fn test_deserialize_with_missing_fields() {
        let passage: PolicyPassage = serde_json::from_str(r#"{"text": "Selbstbehalt 50 EUR"}"#).unwrap();
        assert_eq!(passage.text, "Selbstbehalt 50 EUR");
        assert!(passage.metadata.is_empty());
        assert_eq!(passage.distance, 0.0);
    }
}
