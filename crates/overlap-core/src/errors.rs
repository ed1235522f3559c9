//! Structured error types shared across the overlap crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`OverlapError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (bin counts, entity counts, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.context.insert(key.into(), value.to_string());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the overlap estimator.
///
/// Every variant is terminal for the operation that raised it. Nothing in the
/// library retries: sampling is deterministic for a given seed, so a retry
/// would reproduce the same failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum OverlapError {
    /// Invalid configuration value, raised before any sampling begins.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Accounting result outside its mathematically required range.
    #[error("invariant error: {0}")]
    Invariant(ErrorInfo),
    /// Insufficient points or a numerically unstable polynomial fit.
    #[error("fit error: {0}")]
    Fit(ErrorInfo),
    /// Serialization, export and filesystem errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl OverlapError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            OverlapError::Config(info)
            | OverlapError::Invariant(info)
            | OverlapError::Fit(info)
            | OverlapError::Serde(info) => info,
        }
    }

    /// Shorthand for a [`OverlapError::Config`] without context.
    pub fn config(code: &str, message: impl Into<String>) -> Self {
        OverlapError::Config(ErrorInfo::new(code, message))
    }

    /// Shorthand for a [`OverlapError::Fit`] without context.
    pub fn fit(code: &str, message: impl Into<String>) -> Self {
        OverlapError::Fit(ErrorInfo::new(code, message))
    }

    /// Wraps an I/O or codec failure as a [`OverlapError::Serde`].
    pub fn serde(code: &str, err: impl ToString) -> Self {
        OverlapError::Serde(ErrorInfo::new(code, err.to_string()))
    }
}
