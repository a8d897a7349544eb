//! Snippet record and keyword validation.
//!
//! # Responsibility
//! - Define the canonical `(keyword, message)` pair.
//! - Reject keywords that cannot serve as a stable lookup key.
//!
//! # Invariants
//! - Keywords are stored verbatim: no trimming, no case folding.
//! - `message` is free text and may be empty.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// A named piece of text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snippet {
    /// Unique, case-sensitive lookup key.
    pub keyword: String,
    /// Stored text payload.
    pub message: String,
}

impl Snippet {
    pub fn new(keyword: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            message: message.into(),
        }
    }

    /// Validates this snippet before persistence.
    pub fn validate(&self) -> Result<(), SnippetValidationError> {
        validate_keyword(&self.keyword)
    }
}

/// Keyword rule violations detected before any store access.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SnippetValidationError {
    /// Keyword is empty or whitespace-only.
    EmptyKeyword,
    /// Keyword contains a control character at the given char index.
    ControlCharacter { position: usize },
}

impl Display for SnippetValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyKeyword => write!(f, "keyword cannot be empty"),
            Self::ControlCharacter { position } => {
                write!(f, "keyword contains a control character at position {position}")
            }
        }
    }
}

impl Error for SnippetValidationError {}

/// Checks that `keyword` is usable as a lookup key.
///
/// # Errors
/// - `EmptyKeyword` for `""` or whitespace-only input.
/// - `ControlCharacter` when the keyword contains e.g. a newline or tab,
///   which would break line-oriented catalog output.
pub fn validate_keyword(keyword: &str) -> Result<(), SnippetValidationError> {
    if keyword.trim().is_empty() {
        return Err(SnippetValidationError::EmptyKeyword);
    }

    if let Some(position) = keyword.chars().position(char::is_control) {
        return Err(SnippetValidationError::ControlCharacter { position });
    }

    Ok(())
}
