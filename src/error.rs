//! Error taxonomy for AWS CLI delegation
//!
//! Typed errors for gateway invocations, profile resolution, and key-material
//! writes, plus classification of CLI diagnostics into structured variants so
//! callers branch on an error kind instead of matching substrings.

use std::path::PathBuf;
use thiserror::Error;

/// Errors surfaced by gateway invocations and lifecycle operations
#[derive(Debug, Error)]
pub enum IotError {
    /// Profile store unreadable or a required key is absent
    #[error("Failed to read profile configuration '{}': {reason}", path.display())]
    Configuration { path: PathBuf, reason: String },

    /// The aws process exited non-zero or could not be spawned
    #[error("aws {verb} failed: {diagnostic}")]
    Command { verb: String, diagnostic: String },

    /// A resource referenced by the operation does not exist
    #[error("Resource not found: {diagnostic}")]
    NotFound { diagnostic: String },

    /// Output could not be parsed as the expected JSON shape
    #[error("Unparseable output from aws {verb}: {reason}")]
    Protocol { verb: String, reason: String },

    /// Local file I/O failed while writing key material
    #[error("Failed to write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl IotError {
    /// Check if this is a "not found" error
    pub fn is_not_found(&self) -> bool {
        matches!(self, IotError::NotFound { .. })
    }

    /// Create a configuration error with path context
    pub fn configuration(path: impl Into<PathBuf>, reason: impl Into<String>) -> Self {
        Self::Configuration {
            path: path.into(),
            reason: reason.into(),
        }
    }

    /// Create a protocol error for an unexpected payload shape
    pub fn protocol(verb: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Protocol {
            verb: verb.into(),
            reason: reason.into(),
        }
    }
}

/// Diagnostic substrings the CLI emits when a resource is absent.
///
/// `describe-thing` reports "<name> not found", `describe-certificate`
/// reports "<id> does not exist", and `get-policy` surfaces the service's
/// ResourceNotFoundException verbatim.
const NOT_FOUND_PATTERNS: &[&str] = &["not found", "does not exist", "ResourceNotFoundException"];

/// Classify a failed invocation's diagnostic text into a structured error.
pub fn classify_diagnostic(verb: &str, diagnostic: String) -> IotError {
    if NOT_FOUND_PATTERNS.iter().any(|p| diagnostic.contains(p)) {
        IotError::NotFound { diagnostic }
    } else {
        IotError::Command {
            verb: verb.to_string(),
            diagnostic,
        }
    }
}
