//! Error types for quizpane.
//!
//! This module defines the error taxonomy using `thiserror` for structured error
//! handling. Errors compose via `?` and `From` conversions.
//!
//! # Error Hierarchy
//!
//! - [`AppError`] - Top-level error returned by the binary
//!   - [`InputError`] - Quiz file reading and decoding failures
//!   - [`QuizError`] - Structurally invalid quiz (no options, duplicate ids)
//!   - [`ConfigError`] - Config file read/parse failures
//!   - [`LoggingError`] - Tracing subscriber setup failures
//!
//! # What is NOT an error
//!
//! Measurement anomalies on the quiz screen (a malformed height message, a
//! duplicate message after resolution, a message for a recycled row) are
//! absorbed locally and reported as
//! [`MeasurementRejection`](crate::view_state::probe::MeasurementRejection)
//! values. None of them is fatal to the screen.

use crate::config::ConfigError;
use crate::logging::LoggingError;
use crate::model::OptionId;
use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error encompassing all fatal failure modes.
#[derive(Debug, Error)]
pub enum AppError {
    /// Failed to read or decode the quiz input.
    #[error("Failed to read input: {0}")]
    Input(#[from] InputError),

    /// The quiz decoded but is not usable.
    #[error("Invalid quiz: {0}")]
    Quiz(#[from] QuizError),

    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Logging could not be initialized.
    #[error("Logging error: {0}")]
    Logging(#[from] LoggingError),

    /// Writing the report failed.
    #[error("Output error: {0}")]
    Output(#[from] std::io::Error),
}

/// Errors encountered when reading a quiz file.
#[derive(Debug, Error)]
pub enum InputError {
    /// The quiz file does not exist.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::path::PathBuf;
    /// use quizpane::model::error::InputError;
    ///
    /// let err = InputError::FileNotFound {
    ///     path: PathBuf::from("/tmp/missing.json")
    /// };
    /// assert!(err.to_string().contains("/tmp/missing.json"));
    /// ```
    #[error("File not found: {path}")]
    FileNotFound {
        /// The path that was not found.
        path: PathBuf,
    },

    /// Generic I/O failure while reading the file.
    #[error("I/O error reading {path}: {source}")]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The file is not a valid quiz document.
    #[error("Malformed quiz JSON in {path}: {source}")]
    Json {
        /// File being decoded.
        path: PathBuf,
        /// Decoder error with line and column.
        #[source]
        source: serde_json::Error,
    },
}

/// A decoded quiz that violates structural rules.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum QuizError {
    /// The quiz has no answer options.
    #[error("Quiz has no options")]
    NoOptions,

    /// Two options share the same identifier.
    #[error("Duplicate option id: {0}")]
    DuplicateOption(OptionId),

    /// A referenced option is not part of the quiz.
    #[error("Unknown option id: {0}")]
    UnknownOption(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiz_error_converts_into_app_error() {
        fn fails() -> Result<(), AppError> {
            Err::<(), _>(QuizError::NoOptions)?;
            Ok(())
        }

        let err = fails().unwrap_err();
        assert!(matches!(err, AppError::Quiz(QuizError::NoOptions)));
        assert_eq!(err.to_string(), "Invalid quiz: Quiz has no options");
    }

    #[test]
    fn duplicate_option_names_the_id() {
        let err = QuizError::DuplicateOption(OptionId::new("b").unwrap());
        assert_eq!(err.to_string(), "Duplicate option id: b");
    }

    #[test]
    fn json_error_keeps_source() {
        use std::error::Error as _;

        let source = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        let err = InputError::Json {
            path: PathBuf::from("quiz.json"),
            source,
        };
        assert!(err.source().is_some());
        assert!(err.to_string().starts_with("Malformed quiz JSON in quiz.json"));
    }
}
