//! Canonicalization error types.
//!
//! Three distinct failure classes, so callers can tell bad
//! external-parser output from unrepairable span metadata from internal
//! bugs. None of them is retryable: the pipeline is deterministic, so
//! the same input fails identically every time.

use thiserror::Error;

/// Errors that can occur while canonicalizing a raw tree.
#[derive(Debug, Error)]
pub enum CanonError {
    /// The root raw node carries no location metadata.
    #[error("root raw node has no location")]
    MissingRootLocation,

    /// A raw node listed among children carries no location.
    #[error("raw node '{kind}' listed as a child but carries no location")]
    MissingLocation {
        /// Node-kind label of the offending raw node.
        kind: String,
    },

    /// A loc-less nested node lacks the `name` scalar that would let it
    /// be recorded as an attribute.
    #[error("attribute node '{kind}' has no usable name")]
    MalformedAttributeNode {
        /// Node-kind label of the offending raw node.
        kind: String,
    },

    /// A node ends before its claimed parent starts; no ancestor fix is
    /// possible.
    #[error("node '{node}' ends at {end}, before its parent '{parent}' starts at {start}")]
    NodeBeforeParent {
        node: String,
        end: u32,
        parent: String,
        start: u32,
    },

    /// A node's span is inverted, either as reported or after clipping.
    #[error("negative-width node '{name}': {start}..{end}")]
    NegativeSpan {
        name: String,
        start: u32,
        end: u32,
    },

    /// Re-parenting walked past the root: the node starts at or beyond
    /// every ancestor's end.
    #[error("node '{name}' starting at {start} lies outside the root span")]
    OutsideRoot { name: String, start: u32 },

    /// A reconstruction assertion failed. This signals a bug in the
    /// repair engine, not bad input.
    #[error("reconstruction invariant violated: {detail}")]
    Reconstruction { detail: String },
}

impl CanonError {
    /// Creates a reconstruction-invariant error.
    pub fn reconstruction(detail: impl Into<String>) -> Self {
        Self::Reconstruction {
            detail: detail.into(),
        }
    }

    /// True for the input-contract failure class (as opposed to
    /// internal invariant violations).
    pub fn is_input_error(&self) -> bool {
        !matches!(self, Self::Reconstruction { .. })
    }
}
