//! Structured errors
//!
//! Validation failures are never errors: predicates answer `false` and the
//! card validator collects messages. A `TextError` means the call itself was
//! malformed (unknown operation, wrong arity, bad argument, bad pattern).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const UNKNOWN_OPERATION: &str = "UNKNOWN_OPERATION";
    pub const ARG_COUNT: &str = "ARG_COUNT";
    pub const ARG_TYPE: &str = "ARG_TYPE";
    pub const INVALID_PATTERN: &str = "INVALID_PATTERN";
    pub const DECODE_ERROR: &str = "DECODE_ERROR";
    pub const WRONG_KIND: &str = "WRONG_KIND";
    pub const INTERNAL: &str = "INTERNAL";
}

/// Failure while compiling or running a dynamic pattern
#[derive(Debug, Clone, Error)]
pub enum PatternError {
    #[error("Invalid pattern '{pattern}': {details}")]
    Syntax { pattern: String, details: String },

    #[error("Pattern '{pattern}' failed while matching: {details}")]
    Runtime { pattern: String, details: String },
}

/// Structured error returned by operations and the chain
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextError {
    /// Machine-readable error code
    pub code: String,

    /// Human-readable error message
    pub message: String,

    /// Suggestion for fixing the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,

    /// Operation that raised the error
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,

    /// Propagation notes
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub notes: Vec<String>,
}

impl TextError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            suggestion: None,
            operation: None,
            notes: Vec::new(),
        }
    }

    /// Builder: add suggestion
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Builder: set operation context (first one wins)
    pub fn in_operation(mut self, name: impl Into<String>) -> Self {
        if self.operation.is_none() {
            self.operation = Some(name.into());
        }
        self
    }

    /// Record where the error passed through
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    // Constructors, one per code

    pub fn unknown_operation(name: &str) -> Self {
        Self::new(codes::UNKNOWN_OPERATION, format!("Unknown operation: {}", name))
            .with_suggestion("Use list_operations() to see available operations")
    }

    pub fn arg_count(op: &str, min: usize, max: usize, got: usize) -> Self {
        let expected = if min == max {
            format!("{}", min)
        } else {
            format!("{} to {}", min, max)
        };
        Self::new(
            codes::ARG_COUNT,
            format!("{}() expects {} extra arguments, got {}", op, expected, got),
        )
        .with_suggestion(format!("Use help('{}') for usage", op))
        .in_operation(op)
    }

    pub fn arg_type(op: &str, arg: &str, expected: &str, got: &str) -> Self {
        Self::new(
            codes::ARG_TYPE,
            format!("{}() argument '{}': expected {}, got {}", op, arg, expected, got),
        )
        .in_operation(op)
    }

    pub fn decode_error(details: impl Into<String>) -> Self {
        Self::new(codes::DECODE_ERROR, format!("Decode error: {}", details.into()))
    }

    pub fn wrong_kind(op: &str, expected: &str, actual: &str) -> Self {
        Self::new(
            codes::WRONG_KIND,
            format!("'{}' is a {}, not a {}", op, actual, expected),
        )
        .in_operation(op)
    }

    pub fn internal(details: impl Into<String>) -> Self {
        Self::new(codes::INTERNAL, format!("Internal error: {}", details.into()))
            .with_suggestion("Please report this as a textchain bug")
    }
}

impl std::fmt::Display for TextError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref suggestion) = self.suggestion {
            write!(f, " (suggestion: {})", suggestion)?;
        }
        Ok(())
    }
}

impl std::error::Error for TextError {}

impl From<PatternError> for TextError {
    fn from(err: PatternError) -> Self {
        let suggestion = match err {
            PatternError::Syntax { .. } => "Check the pattern syntax",
            PatternError::Runtime { .. } => "Simplify the pattern to reduce backtracking",
        };
        Self::new(codes::INVALID_PATTERN, err.to_string()).with_suggestion(suggestion)
    }
}
