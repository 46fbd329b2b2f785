//! # treemend_raw
//!
//! The parser-bridge contract: the as-received, unrepaired tree shape
//! produced by an external parser, plus the line/column bookkeeping the
//! converter needs to turn reported positions into absolute offsets.
//!
//! The external parser is untrusted for span correctness. This crate
//! only pins down the wire shape; span repair happens downstream in
//! `treemend_core`.
//!
//! ## Wire form
//!
//! A raw node is a JSON object whose `type` member is the node kind,
//! whose `loc` member is `{start: {line, column}, end: {line, column}}`
//! (or null/absent for attribute-like nodes), and whose remaining
//! members are the node's fields: scalars, nested nodes, or lists of
//! nodes. Field order is preserved.

mod error;
mod line_index;
mod node;

pub use error::RawError;
pub use line_index::{LineIndex, document_end};
pub use node::{RawNode, RawValue, Scalar};
