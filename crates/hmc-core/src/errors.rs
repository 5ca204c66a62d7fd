//! Structured error types shared across HMC crates.
//!
//! Numerical divergence and rejected step-size updates are *not* errors: the
//! integrator reports divergence through its success flag and the adapters
//! recover locally. The variants below cover API precondition violations and
//! configuration problems only.

use std::collections::BTreeMap;
use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`HmcError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (dimensions, offending values, etc.).
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

/// Canonical error type for the HMC engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum HmcError {
    /// Invalid arguments passed to the trajectory integrator.
    #[error("integrator error: {0}")]
    Integrator(ErrorInfo),
    /// Position, momentum or gradient vectors of mismatched length.
    #[error("dimension error: {0}")]
    Dimension(ErrorInfo),
    /// Invalid step sizes or adaptation hyperparameters.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and schema errors.
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

impl HmcError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            HmcError::Integrator(info)
            | HmcError::Dimension(info)
            | HmcError::Config(info)
            | HmcError::Serde(info) => info,
        }
    }

    /// Builds a [`HmcError::Dimension`] describing a length mismatch.
    pub fn dimension_mismatch(what: &str, expected: usize, found: usize) -> Self {
        HmcError::Dimension(
            ErrorInfo::new("dimension-mismatch", format!("{what} has the wrong length"))
                .with_context("expected", expected.to_string())
                .with_context("found", found.to_string()),
        )
    }
}
