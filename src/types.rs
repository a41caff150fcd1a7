//! Core types for the autocomplete index.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Numeric rank for an entry; higher sorts first.
pub type Score = f64;

/// An indexed entry as stored in and returned from the index.
///
/// This is the exact shape serialized into the per-bin `objects` hash and
/// into cache cells; `phrase` holds the normalized form of the submitted
/// text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Caller-supplied identifier, unique within a bin.
    pub id: String,
    /// Numeric rank.
    pub score: Score,
    /// Normalized phrase text.
    pub phrase: String,
    /// Opaque payload, round-tripped without interpretation.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
}

/// Input for storing an entry.
///
/// Both calling forms of [`AutocompleteIndex::store`] build one of these
/// before dispatch; `id` and `phrase` are required at store time, `score`
/// defaults to 1.
///
/// [`AutocompleteIndex::store`]: crate::AutocompleteIndex::store
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EntryInput {
    /// Identifier, unique within a bin.
    pub id: Option<String>,
    /// Text to index.
    pub phrase: Option<String>,
    /// Numeric rank; defaults to 1 when absent.
    pub score: Option<Score>,
    /// Optional opaque payload.
    pub data: Option<Value>,
}

impl EntryInput {
    /// Create an input with the two required fields set.
    pub fn new(id: impl Into<String>, phrase: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            phrase: Some(phrase.into()),
            score: None,
            data: None,
        }
    }

    /// Set the score.
    pub fn with_score(mut self, score: Score) -> Self {
        self.score = Some(score);
        self
    }

    /// Attach an opaque payload.
    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_serialization_omits_absent_data() {
        let entry = Entry {
            id: "7".to_string(),
            score: 1.0,
            phrase: "camera".to_string(),
            data: None,
        };
        let json = serde_json::to_string(&entry).unwrap();
        assert!(!json.contains("data"));

        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back, entry);
    }

    #[test]
    fn test_entry_data_roundtrip() {
        let entry = Entry {
            id: "7".to_string(),
            score: 2.0,
            phrase: "camera".to_string(),
            data: Some(json!({"test": "me"})),
        };
        let json = serde_json::to_string(&entry).unwrap();
        let back: Entry = serde_json::from_str(&json).unwrap();
        assert_eq!(back.data.unwrap()["test"], "me");
    }

    #[test]
    fn test_entry_input_builder() {
        let input = EntryInput::new("4", "caress").with_score(2.0);
        assert_eq!(input.id.as_deref(), Some("4"));
        assert_eq!(input.phrase.as_deref(), Some("caress"));
        assert_eq!(input.score, Some(2.0));
        assert!(input.data.is_none());
    }
}
