//! Canonical-tree verification.
//!
//! Checks every invariant the pipeline promises: per-node span sanity,
//! parent containment, sibling ordering and disjointness, the root
//! covering the whole document, and the lossless round trip of text,
//! child spans, and tails. Used by tests and the CLI `verify` path.

use treemend_ast::{NodeId, Tree};

use crate::CanonError;

/// Verifies all canonical-tree invariants against the source document.
pub fn verify(tree: &Tree, document: &str) -> Result<(), CanonError> {
    let root = tree.root();
    let root_span = tree[root].span;
    if root_span.start != 0 || root_span.end as usize != document.len() {
        return Err(CanonError::reconstruction(format!(
            "root span {}..{} does not cover the document (len {})",
            root_span.start,
            root_span.end,
            document.len()
        )));
    }
    if tree[root].tail.is_some() {
        return Err(CanonError::reconstruction("root node has a tail"));
    }

    for id in tree.preorder() {
        let node = &tree[id];

        if node.span.start > node.span.end {
            return Err(CanonError::NegativeSpan {
                name: node.name.clone(),
                start: node.span.start,
                end: node.span.end,
            });
        }

        if let Some(parent) = node.parent {
            if !tree[parent].span.encloses(&node.span) {
                return Err(CanonError::reconstruction(format!(
                    "node '{}' ({}..{}) escapes its parent '{}' ({}..{})",
                    node.name,
                    node.span.start,
                    node.span.end,
                    tree[parent].name,
                    tree[parent].span.start,
                    tree[parent].span.end
                )));
            }
            if node.tail.is_none() {
                return Err(CanonError::reconstruction(format!(
                    "node '{}' has no tail",
                    node.name
                )));
            }
        }
        if node.text.is_none() {
            return Err(CanonError::reconstruction(format!(
                "node '{}' has no text",
                node.name
            )));
        }

        for pair in node.children.windows(2) {
            let (a, b) = (&tree[pair[0]], &tree[pair[1]]);
            if a.span.end > b.span.start {
                return Err(CanonError::reconstruction(format!(
                    "siblings '{}' ({}..{}) and '{}' ({}..{}) overlap or are unordered",
                    a.name, a.span.start, a.span.end, b.name, b.span.start, b.span.end
                )));
            }
        }

        let expected = document.get(node.span.start as usize..node.span.end as usize).ok_or_else(
            || {
                CanonError::reconstruction(format!(
                    "span of '{}' does not fall on character boundaries",
                    node.name
                ))
            },
        )?;
        let rebuilt = rebuild(tree, id)?;
        if rebuilt != expected {
            return Err(CanonError::reconstruction(format!(
                "round trip of '{}' lost text: {:?} != {:?}",
                node.name, rebuilt, expected
            )));
        }
    }

    Ok(())
}

/// Reassembles a node's span content from its text, its children's
/// reassembled spans, and their tails.
fn rebuild(tree: &Tree, id: NodeId) -> Result<String, CanonError> {
    let node = &tree[id];
    let mut out = String::new();
    out.push_str(node.text.as_deref().unwrap_or_default());
    for &child in &node.children {
        out.push_str(&rebuild(tree, child)?);
        out.push_str(tree[child].tail.as_deref().unwrap_or_default());
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use treemend_ast::{Node, Span};

    use crate::reconstruct;

    fn reconstructed_tree(document: &str) -> Tree {
        let mut tree = Tree::with_root(Node::new("Program", Span::new(0, document.len() as u32)));
        let root = tree.root();
        let a = tree.push(Node::new("A", Span::new(2, 4)), Some(root));
        tree[root].children.push(a);
        reconstruct(&mut tree, document).unwrap();
        tree
    }

    #[test]
    fn test_verify_accepts_reconstructed_tree() {
        let document = "abcdef";
        let tree = reconstructed_tree(document);
        verify(&tree, document).unwrap();
    }

    #[test]
    fn test_verify_rejects_root_not_covering_document() {
        let document = "abcdef";
        let tree = reconstructed_tree(document);
        verify(&tree, "abcdefgh").unwrap_err();
    }

    #[test]
    fn test_verify_rejects_tampered_text() {
        let document = "abcdef";
        let mut tree = reconstructed_tree(document);
        let root = tree.root();
        let a = tree[root].children[0];
        tree[a].text = Some("XX".into());

        let err = verify(&tree, document).unwrap_err();
        assert!(matches!(err, CanonError::Reconstruction { .. }));
    }

    #[test]
    fn test_verify_rejects_containment_violation() {
        let document = "abcdef";
        let mut tree = reconstructed_tree(document);
        let root = tree.root();
        let a = tree[root].children[0];
        tree[a].span.end = 99;

        verify(&tree, document).unwrap_err();
    }

    #[test]
    fn test_verify_rejects_unordered_siblings() {
        let document = "abcdef";
        let mut tree = Tree::with_root(Node::new("Program", Span::new(0, 6)));
        let root = tree.root();
        let a = tree.push(Node::new("A", Span::new(3, 5)), Some(root));
        let b = tree.push(Node::new("B", Span::new(1, 3)), Some(root));
        tree[root].children.extend([a, b]);
        for id in [root, a, b] {
            tree[id].text = Some(String::new());
        }
        for id in [a, b] {
            tree[id].tail = Some(String::new());
        }

        let err = verify(&tree, document).unwrap_err();
        assert!(matches!(err, CanonError::Reconstruction { .. }));
    }
}
