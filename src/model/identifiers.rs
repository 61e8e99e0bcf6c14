//! Core identifier newtypes with smart constructors.
//!
//! Content identifiers validate non-empty strings at construction time.
//! Raw constructors are never exported - use smart constructors only.

use serde::{Deserialize, Deserializer};
use std::fmt;

/// Identifier of the question shown at the top of the quiz screen.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QuestionId(String);

impl QuestionId {
    /// Smart constructor: validates non-empty question ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidQuestionId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidQuestionId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for QuestionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Identifier of a single answer option.
///
/// Stable for the lifetime of the screen: elimination and reordering of the
/// visible option list never change it, so anything recorded per option
/// (measured heights, selection) stays valid.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OptionId(String);

impl OptionId {
    /// Smart constructor: validates non-empty option ID
    pub fn new(raw: impl Into<String>) -> Result<Self, InvalidOptionId> {
        let raw = raw.into();
        if raw.is_empty() {
            return Err(InvalidOptionId::Empty);
        }
        Ok(Self(raw))
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for OptionId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}

/// Handle for a recycled list row instance (a "cell").
///
/// The list layer owns a small pool of row instances and rebinds them to
/// different content as the user scrolls. Distinct from [`RowKey`], which
/// names the content a row currently shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowInstanceId(u32);

impl RowInstanceId {
    /// Create a row instance handle.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Get the raw value.
    pub fn get(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RowInstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "row#{}", self.0)
    }
}

/// Content identity of a list row: the question or one option.
///
/// Row heights are recorded against this key, never against a visible index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RowKey {
    /// The single question row.
    Question,
    /// An answer option row.
    Option(OptionId),
}

impl RowKey {
    /// The option id if this key names an option row.
    pub fn option_id(&self) -> Option<&OptionId> {
        match self {
            RowKey::Question => None,
            RowKey::Option(id) => Some(id),
        }
    }
}

impl fmt::Display for RowKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RowKey::Question => f.write_str("question"),
            RowKey::Option(id) => write!(f, "option:{id}"),
        }
    }
}

impl From<OptionId> for RowKey {
    fn from(id: OptionId) -> Self {
        RowKey::Option(id)
    }
}

// ===== Error Types =====

/// Rejected question identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidQuestionId {
    /// Identifier was the empty string.
    #[error("Question ID cannot be empty")]
    Empty,
}

/// Rejected option identifier.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvalidOptionId {
    /// Identifier was the empty string.
    #[error("Option ID cannot be empty")]
    Empty,
}

// ===== Tests =====

#[cfg(test)]
mod tests {
    use super::*;

    // ===== QuestionId Tests =====

    #[test]
    fn question_id_accepts_simple_alphanumeric() {
        let id = QuestionId::new("q-101");
        assert!(id.is_ok(), "Simple identifier should be accepted");
    }

    #[test]
    fn question_id_rejects_empty_string() {
        let id = QuestionId::new("");
        assert!(
            matches!(id, Err(InvalidQuestionId::Empty)),
            "Empty string should return InvalidQuestionId::Empty"
        );
    }

    #[test]
    fn question_id_deserialize_rejects_empty() {
        let result: Result<QuestionId, _> = serde_json::from_str("\"\"");
        assert!(result.is_err());
    }

    // ===== OptionId Tests =====

    #[test]
    fn option_id_as_str_returns_original() {
        let id = OptionId::new("opt-a").unwrap();
        assert_eq!(id.as_str(), "opt-a");
        assert_eq!(id.to_string(), "opt-a");
    }

    #[test]
    fn option_id_rejects_empty_string() {
        assert!(matches!(OptionId::new(""), Err(InvalidOptionId::Empty)));
    }

    #[test]
    fn option_id_deserializes_from_json_string() {
        let id: OptionId = serde_json::from_str("\"b\"").unwrap();
        assert_eq!(id, OptionId::new("b").unwrap());
    }

    // ===== RowKey Tests =====

    #[test]
    fn row_key_option_id_only_for_options() {
        let opt = OptionId::new("c").unwrap();
        assert_eq!(RowKey::Question.option_id(), None);
        assert_eq!(RowKey::from(opt.clone()).option_id(), Some(&opt));
    }

    #[test]
    fn row_key_display_names_content() {
        assert_eq!(RowKey::Question.to_string(), "question");
        assert_eq!(
            RowKey::Option(OptionId::new("d").unwrap()).to_string(),
            "option:d"
        );
    }

    #[test]
    fn row_instance_display() {
        assert_eq!(RowInstanceId::new(3).to_string(), "row#3");
    }
}
