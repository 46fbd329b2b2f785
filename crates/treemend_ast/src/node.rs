//! Node definition.
//!
//! The canonical tree node built by the converter, mutated by the
//! hierarchy repair engine, and finalized by the reconstructor.

use indexmap::IndexMap;

use crate::{NodeId, Span};

/// A node in the canonical tree.
///
/// `children` holds the parser's declaration order until the repair
/// engine runs, and offset-sorted order afterwards. `text` and `tail`
/// stay `None` until reconstruction; the root's `tail` stays `None`
/// forever (there is no boundary after the whole document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Syntactic category reported by the parser.
    pub name: String,

    /// Byte span in the source document.
    pub span: Span,

    /// Owning node, `None` for the root. Used for traversal and repair
    /// decisions only; ownership lives in the parent's `children`.
    pub parent: Option<NodeId>,

    /// Owned child nodes, in order.
    pub children: Vec<NodeId>,

    /// Scalar properties that are not themselves spans. Declaration
    /// order is preserved.
    pub attrs: IndexMap<String, String>,

    /// Substring from `span.start` up to the first child's start (or to
    /// `span.end` if childless).
    pub text: Option<String>,

    /// Substring from `span.end` up to the next sibling's start (or the
    /// parent's end if last).
    pub tail: Option<String>,
}

impl Node {
    /// Creates a new unattached node with no attributes.
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
            parent: None,
            children: Vec::new(),
            attrs: IndexMap::new(),
            text: None,
            tail: None,
        }
    }

    /// Returns true if this node has children.
    #[inline]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_node() {
        let node = Node::new("Identifier", Span::new(3, 8));

        assert_eq!(node.name, "Identifier");
        assert_eq!(node.span, Span::new(3, 8));
        assert!(node.parent.is_none());
        assert!(!node.has_children());
        assert!(node.attrs.is_empty());
        assert!(node.text.is_none());
        assert!(node.tail.is_none());
    }

    #[test]
    fn test_attr_order_preserved() {
        let mut node = Node::new("Literal", Span::new(0, 1));
        node.attrs.insert("value".into(), "1".into());
        node.attrs.insert("type".into(), "int".into());
        node.attrs.insert("raw".into(), "1".into());

        let keys: Vec<&str> = node.attrs.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["value", "type", "raw"]);
    }
}
