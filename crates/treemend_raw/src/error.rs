//! Raw-tree decoding errors.

use thiserror::Error;

/// Errors raised while decoding a raw tree from its wire form.
#[derive(Debug, Error)]
pub enum RawError {
    /// The input was not valid JSON.
    #[error("Invalid raw tree JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// A member of the raw tree had a shape outside the bridge contract.
    #[error("Unexpected raw tree shape at '{key}': {detail}")]
    UnexpectedShape {
        /// The field key (or `<root>`) where decoding failed.
        key: String,
        /// What was found instead of a contract shape.
        detail: String,
    },
}

impl RawError {
    /// Creates a new shape error.
    pub fn unexpected_shape(key: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::UnexpectedShape {
            key: key.into(),
            detail: detail.into(),
        }
    }
}
