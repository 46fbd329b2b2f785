//! # treemend_ast
//!
//! Canonical tree definitions for treemend.
//!
//! This crate provides the node model shared by the converter, the
//! hierarchy repair engine, and the text/tail reconstructor. Nodes live
//! in a single index-based arena ([`Tree`]) so that parent back-links are
//! plain indices rather than reference cycles, and so that the repair
//! engine can re-parent nodes in place.
//!
//! ## Example
//!
//! ```rust
//! use treemend_ast::{Node, Span, Tree};
//!
//! let mut tree = Tree::with_root(Node::new("Program", Span::new(0, 10)));
//! let root = tree.root();
//! let child = tree.push(Node::new("Identifier", Span::new(0, 3)), Some(root));
//! tree.node_mut(root).children.push(child);
//!
//! assert_eq!(tree.node(child).parent, Some(root));
//! ```

mod node;
mod serialize;
mod span;
mod tree;

pub use node::Node;
pub use span::{Location, Position, Span};
pub use tree::{NodeId, Tree};
