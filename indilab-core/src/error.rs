//! Engine error taxonomy.
//!
//! Every failure is a deterministic function of the request, so nothing here
//! is retryable. The three variants map one-to-one onto the failure kinds a
//! caller can observe through the worker boundary.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced while validating or dispatching an indicator request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    #[error("Invalid parameter '{name}'{}: {reason}", for_indicator(.indicator))]
    InvalidParameter {
        /// Filled in at the dispatch boundary when the primitive that failed
        /// had no indicator context of its own.
        indicator: Option<String>,
        name: String,
        reason: String,
    },

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

fn for_indicator(indicator: &Option<String>) -> String {
    match indicator {
        Some(id) => format!(" for {id}"),
        None => String::new(),
    }
}

impl EngineError {
    /// An `InvalidParameter` error without indicator context.
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        EngineError::InvalidParameter {
            indicator: None,
            name: name.into(),
            reason: reason.into(),
        }
    }

    pub fn malformed(msg: impl Into<String>) -> Self {
        EngineError::MalformedInput(msg.into())
    }

    /// Attach the indicator identifier to an `InvalidParameter` error that
    /// does not carry one yet. Other variants pass through unchanged.
    pub fn with_indicator(self, id: &str) -> Self {
        match self {
            EngineError::InvalidParameter {
                indicator: None,
                name,
                reason,
            } => EngineError::InvalidParameter {
                indicator: Some(id.to_string()),
                name,
                reason,
            },
            other => other,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            EngineError::UnknownIndicator(_) => ErrorKind::UnknownIndicator,
            EngineError::InvalidParameter { .. } => ErrorKind::InvalidParameter,
            EngineError::MalformedInput(_) => ErrorKind::MalformedInput,
        }
    }
}

/// Stable, serializable discriminant of [`EngineError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    UnknownIndicator,
    InvalidParameter,
    MalformedInput,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorKind::UnknownIndicator => "UnknownIndicator",
            ErrorKind::InvalidParameter => "InvalidParameter",
            ErrorKind::MalformedInput => "MalformedInput",
        }
    }
}
