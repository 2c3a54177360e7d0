//! Structured error types shared across the hemisphere explorer crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Code reported when a magnet variant name is not recognised.
pub const INVALID_DESIGN_KIND: &str = "invalid-design-kind";
/// Code reported when the field oracle fails for a query batch.
pub const FIELD_EVALUATION: &str = "field-evaluation";
/// Code reported when the oracle returns NaN or infinite components.
pub const FIELD_NON_FINITE: &str = "field-non-finite";
/// Code reported when the oracle returns the wrong number of field vectors.
pub const FIELD_SHAPE: &str = "field-shape";
/// Code reported when a query point coincides with a source singularity.
pub const FIELD_DEGENERATE_SOURCE: &str = "field-degenerate-source";

/// Structured payload attached to every [`HemiError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (configuration names, sizes, etc.).
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
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for the explorer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HemiError {
    /// Magnet design errors (unknown variant, incomplete design).
    #[error("design error: {0}")]
    Design(ErrorInfo),
    /// Field oracle failures and degenerate field values.
    #[error("field error: {0}")]
    Field(ErrorInfo),
    /// Global optimizer failures.
    #[error("optimizer error: {0}")]
    Optimizer(ErrorInfo),
    /// Invalid plans and parameters.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization, schema and artefact IO errors.
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

impl HemiError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HemiError::Design(info)
            | HemiError::Field(info)
            | HemiError::Optimizer(info)
            | HemiError::Config(info)
            | HemiError::Serde(info) => info,
        }
    }

    /// Returns the stable error code.
    pub fn code(&self) -> &str {
        &self.info().code
    }

    /// Whether a sweep may skip the offending configuration and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HemiError::Design(_) | HemiError::Field(_))
    }

    /// Attaches a context entry regardless of the error family.
    pub fn with_context(self, key: impl Into<String>, value: impl Into<String>) -> Self {
        match self {
            HemiError::Design(info) => HemiError::Design(info.with_context(key, value)),
            HemiError::Field(info) => HemiError::Field(info.with_context(key, value)),
            HemiError::Optimizer(info) => HemiError::Optimizer(info.with_context(key, value)),
            HemiError::Config(info) => HemiError::Config(info.with_context(key, value)),
            HemiError::Serde(info) => HemiError::Serde(info.with_context(key, value)),
        }
    }
}
