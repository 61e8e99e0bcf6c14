//! Domain model types (pure).
//!
//! All types in this module are pure data with smart constructors. The model
//! is deliberately thin: just enough of a quiz to key row heights and drive
//! rendering.

pub mod content;
pub mod error;
pub mod identifiers;
pub mod quiz;

// Re-export for convenience
pub use content::{Content, ContentBlock};
pub use error::{AppError, InputError, QuizError};
pub use identifiers::{
    InvalidOptionId, InvalidQuestionId, OptionId, QuestionId, RowInstanceId, RowKey,
};
pub use quiz::{AnswerOption, LoadError, Question, Quiz};
