//! # treemend_core
//!
//! The canonicalization pipeline: a raw, externally produced syntax
//! tree goes in; a canonical, lossless tree with exact non-overlapping
//! byte spans and verbatim inter-node text comes out.
//!
//! Three stages, strictly forward:
//!
//! 1. [`convert`] — resolve line/column positions to absolute offsets
//!    and classify raw fields into children vs. attributes;
//! 2. [`repair`] — enforce parent containment and sibling ordering via
//!    span clipping and re-parenting;
//! 3. [`reconstruct`] — fill in every node's `text` and `tail` so the
//!    original document round-trips exactly.
//!
//! The core is single-threaded and synchronous: one document, one tree,
//! in-memory traversal and string slicing only. Concurrent callers may
//! process independent documents in parallel; nothing is shared.
//!
//! ## Example
//!
//! ```rust
//! use treemend_core::canonicalize;
//! use treemend_raw::RawNode;
//!
//! let document = "x=1;\n";
//! let raw = RawNode::from_json_str(r#"{
//!     "type": "Program",
//!     "loc": {"start": {"line": 1, "column": 0}, "end": {"line": 1, "column": 4}}
//! }"#).unwrap();
//!
//! let tree = canonicalize(document, &raw).unwrap();
//! assert_eq!(tree[tree.root()].text.as_deref(), Some("x=1;\n"));
//! ```

mod convert;
mod error;
mod reconstruct;
mod repair;
mod verify;

pub use convert::convert;
pub use error::CanonError;
pub use reconstruct::reconstruct;
pub use repair::repair;
pub use verify::verify;

use treemend_ast::Tree;
use treemend_raw::RawNode;

/// Runs the full pipeline on one document: convert, repair,
/// reconstruct.
///
/// The returned tree satisfies all canonical invariants; [`verify`]
/// re-checks them on demand.
pub fn canonicalize(document: &str, raw: &RawNode) -> Result<Tree, CanonError> {
    let mut tree = convert(document, raw)?;
    repair(&mut tree)?;
    reconstruct(&mut tree, document)?;
    Ok(tree)
}
