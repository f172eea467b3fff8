pub mod engine;
pub mod format;
pub mod params;

use thiserror::Error;

/// Request-level failures.
///
/// Per-record formatting failures are deliberately absent: those are
/// recovered inside [`format::RecordFormatter`] and never surface. Malformed
/// input is raised before any registry access; registry failures propagate
/// unchanged (retry policy belongs to the caller).
#[derive(Debug, Error)]
pub enum QueryError {
    /// Detail lookup for an id the registry does not know. 404-equivalent.
    #[error("unknown task '{id}'")]
    TaskNotFound { id: String },

    /// A required data-grid parameter is missing or mistyped. 400-equivalent.
    #[error("malformed query parameter '{name}': {reason}")]
    MalformedParameter { name: String, reason: String },

    /// The registry itself failed. 500-equivalent, propagated unchanged.
    #[error("registry unavailable: {0}")]
    Registry(#[from] anyhow::Error),
}

impl QueryError {
    pub fn malformed(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::MalformedParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }
}
