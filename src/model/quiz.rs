//! Quiz document: one question and its answer options.

use super::content::Content;
use super::error::{InputError, QuizError};
use super::identifiers::{OptionId, QuestionId};
use serde::Deserialize;
use std::collections::HashSet;
use std::path::Path;

/// The question shown in the first row.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Question {
    /// Question identifier.
    pub id: QuestionId,
    /// Rich question content.
    pub content: Content,
}

/// One answer option.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AnswerOption {
    /// Stable option identifier.
    pub id: OptionId,
    /// Rich option content.
    pub content: Content,
}

/// A validated quiz.
///
/// # Invariants
/// - at least one option
/// - option ids are unique
#[derive(Debug, Clone, PartialEq)]
pub struct Quiz {
    question: Question,
    options: Vec<AnswerOption>,
}

#[derive(Deserialize)]
struct RawQuiz {
    question: Question,
    options: Vec<AnswerOption>,
}

impl Quiz {
    /// Smart constructor enforcing the quiz invariants.
    pub fn new(question: Question, options: Vec<AnswerOption>) -> Result<Self, QuizError> {
        if options.is_empty() {
            return Err(QuizError::NoOptions);
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(&option.id) {
                return Err(QuizError::DuplicateOption(option.id.clone()));
            }
        }

        Ok(Self { question, options })
    }

    /// Decode a quiz from a JSON string.
    ///
    /// `origin` is only used for error reporting.
    pub fn from_json(json: &str, origin: &Path) -> Result<Self, LoadError> {
        let raw: RawQuiz = serde_json::from_str(json).map_err(|source| InputError::Json {
            path: origin.to_path_buf(),
            source,
        })?;
        Ok(Self::new(raw.question, raw.options)?)
    }

    /// Load and validate a quiz file.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(InputError::FileNotFound {
                path: path.to_path_buf(),
            }
            .into());
        }

        let json = std::fs::read_to_string(path).map_err(|source| InputError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::from_json(&json, path)
    }

    /// The question.
    pub fn question(&self) -> &Question {
        &self.question
    }

    /// Options in authored order.
    pub fn options(&self) -> &[AnswerOption] {
        &self.options
    }

    /// Look up an option by id.
    pub fn option(&self, id: &OptionId) -> Option<&AnswerOption> {
        self.options.iter().find(|o| &o.id == id)
    }

    /// Resolve a raw id string to an option id of this quiz.
    pub fn option_id(&self, raw: &str) -> Result<OptionId, QuizError> {
        self.options
            .iter()
            .map(|o| &o.id)
            .find(|id| id.as_str() == raw)
            .cloned()
            .ok_or_else(|| QuizError::UnknownOption(raw.to_string()))
    }
}

/// Failure to load a quiz: either the input or the quiz structure.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// File or JSON failure.
    #[error(transparent)]
    Input(#[from] InputError),
    /// Structural failure.
    #[error(transparent)]
    Quiz(#[from] QuizError),
}

impl From<LoadError> for super::error::AppError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Input(e) => e.into(),
            LoadError::Quiz(e) => e.into(),
        }
    }
}
