//! Hierarchy repair engine.
//!
//! Restores the invariant "every node's span lies within its parent's
//! span and is disjoint from and ordered with respect to its siblings"
//! using the smallest corrective moves: span clipping, plus re-parenting
//! when a node does not belong under its claimed parent at all.
//!
//! The traversal is an explicit work-stack of (parent, child-index)
//! pairs rather than recursion: a slot's content can change underneath
//! the traversal when a node is relocated, and the slot must then be
//! re-visited. A node is only ever moved further in depth-first order,
//! so the process terminates.

use tracing::debug;
use treemend_ast::{NodeId, Tree};

use crate::CanonError;

/// Repairs span containment and sibling ordering across the whole tree.
///
/// Running this on an already-repaired tree performs no mutation.
pub fn repair(tree: &mut Tree) -> Result<(), CanonError> {
    let mut stack = vec![(tree.root(), 0usize)];
    while let Some((parent, index)) = stack.pop() {
        let Some(&node) = tree.node(parent).children.get(index) else {
            continue;
        };
        if fix_overlap(tree, node, parent, index)? {
            // The slot now holds a different (or no) node; retry it.
            stack.push((parent, index));
        } else {
            stack.push((parent, index + 1));
            stack.push((node, 0));
        }
    }
    Ok(())
}

/// Repairs one node against its parent and adjacent siblings.
///
/// Only `node` is modified, except that the node is re-parented when it
/// starts at or beyond its parent's end. Returns true if the node was
/// relocated.
fn fix_overlap(
    tree: &mut Tree,
    node: NodeId,
    parent: NodeId,
    index: usize,
) -> Result<bool, CanonError> {
    let parent_span = tree[parent].span;

    if tree[node].span.end <= parent_span.start {
        return Err(CanonError::NodeBeforeParent {
            node: tree[node].name.clone(),
            end: tree[node].span.end,
            parent: tree[parent].name.clone(),
            start: parent_span.start,
        });
    }

    if tree[node].span.start < parent_span.start {
        debug!(
            "node '{}' starts before its parent '{}'; clipping {} -> {}",
            tree[node].name, tree[parent].name, tree[node].span.start, parent_span.start
        );
        tree[node].span.start = parent_span.start;
    }

    if reparent(tree, node, parent)? {
        return Ok(true);
    }

    if tree[node].span.end > parent_span.end {
        debug!(
            "node '{}' ends after its parent '{}'; clipping {} -> {}",
            tree[node].name, tree[parent].name, tree[node].span.end, parent_span.end
        );
        tree[node].span.end = parent_span.end;
    }

    if index >= 1 {
        let prev = tree[parent].children[index - 1];
        let prev_span = tree[prev].span;
        if prev_span.start >= tree[node].span.start {
            debug!(
                "node '{}' starts before its previous sibling '{}'; clipping {} -> {}",
                tree[node].name, tree[prev].name, tree[node].span.start, prev_span.end
            );
            tree[node].span.start = prev_span.end;
        }
    }

    if let Some(&next) = tree[parent].children.get(index + 1) {
        let next_start = tree[next].span.start;
        let span = tree[node].span;
        if next_start <= span.start {
            // The later sibling is the one out of place; it corrects
            // itself against this node on its own visit.
        } else if span.end > next_start {
            debug!(
                "node '{}' ends after its next sibling '{}' starts; clipping {} -> {}",
                tree[node].name, tree[next].name, span.end, next_start
            );
            tree[node].span.end = next_start;
        }
    }

    let span = tree[node].span;
    if span.start > span.end {
        return Err(CanonError::NegativeSpan {
            name: tree[node].name.clone(),
            start: span.start,
            end: span.end,
        });
    }
    Ok(false)
}

/// Walks the ancestor chain while the node starts at or beyond the
/// ancestor's end, and moves the node there if the walk leaves `parent`.
///
/// The node is inserted among its new siblings at the position that
/// preserves (start, end) order. This is the engine's only
/// ownership-changing operation.
fn reparent(tree: &mut Tree, node: NodeId, parent: NodeId) -> Result<bool, CanonError> {
    let start = tree[node].span.start;

    let mut target = parent;
    while start >= tree[target].span.end {
        match tree[target].parent {
            Some(ancestor) => target = ancestor,
            None => {
                return Err(CanonError::OutsideRoot {
                    name: tree[node].name.clone(),
                    start,
                });
            }
        }
    }
    if target == parent {
        return Ok(false);
    }

    debug!(
        "re-parenting '{}' from '{}' to '{}'",
        tree[node].name, tree[parent].name, tree[target].name
    );

    let old_children = &mut tree[parent].children;
    if let Some(pos) = old_children.iter().position(|&c| c == node) {
        old_children.remove(pos);
    }

    let key = (tree[node].span.start, tree[node].span.end);
    let siblings = &tree[target].children;
    let insert_at = siblings
        .iter()
        .position(|&c| {
            let s = tree[c].span;
            (s.start, s.end) > key
        })
        .unwrap_or(siblings.len());

    tree[target].children.insert(insert_at, node);
    tree[node].parent = Some(target);
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use treemend_ast::{Node, Span};

    fn tree_with_children(parent_span: Span, child_spans: &[Span]) -> Tree {
        let mut tree = Tree::with_root(Node::new("Parent", parent_span));
        let root = tree.root();
        for (i, &span) in child_spans.iter().enumerate() {
            let id = tree.push(Node::new(format!("Child{i}"), span), Some(root));
            tree[root].children.push(id);
        }
        tree
    }

    fn child_spans(tree: &Tree, parent: NodeId) -> Vec<Span> {
        tree[parent]
            .children
            .iter()
            .map(|&c| tree[c].span)
            .collect()
    }

    #[test]
    fn test_overlapping_siblings_first_clipped() {
        // The earlier sibling yields the contested range [15,20].
        let mut tree =
            tree_with_children(Span::new(0, 30), &[Span::new(10, 20), Span::new(15, 25)]);
        repair(&mut tree).unwrap();

        assert_eq!(
            child_spans(&tree, tree.root()),
            vec![Span::new(10, 15), Span::new(15, 25)]
        );
    }

    #[test]
    fn test_sibling_starting_at_or_before_previous_is_pushed_after_it() {
        // The later sibling is the one out of place here; its start is
        // clipped to the previous sibling's end.
        let mut tree =
            tree_with_children(Span::new(0, 30), &[Span::new(10, 20), Span::new(10, 25)]);
        repair(&mut tree).unwrap();

        assert_eq!(
            child_spans(&tree, tree.root()),
            vec![Span::new(10, 20), Span::new(20, 25)]
        );
    }

    #[test]
    fn test_child_start_clipped_to_parent() {
        let mut tree = tree_with_children(Span::new(5, 30), &[Span::new(2, 10)]);
        repair(&mut tree).unwrap();

        assert_eq!(child_spans(&tree, tree.root()), vec![Span::new(5, 10)]);
    }

    #[test]
    fn test_child_end_clipped_to_parent() {
        let mut tree = tree_with_children(Span::new(0, 20), &[Span::new(5, 25)]);
        repair(&mut tree).unwrap();

        assert_eq!(child_spans(&tree, tree.root()), vec![Span::new(5, 20)]);
    }

    #[test]
    fn test_child_escaping_parent_is_reparented_to_grandparent() {
        // Grandparent [0,30] with children [5,15] and [26,30]; the inner
        // parent claims a child at [20,25] that lies wholly after it.
        let mut tree = Tree::with_root(Node::new("Grandparent", Span::new(0, 30)));
        let root = tree.root();
        let parent = tree.push(Node::new("Parent", Span::new(5, 15)), Some(root));
        let late = tree.push(Node::new("Late", Span::new(26, 30)), Some(root));
        tree[root].children.extend([parent, late]);
        let escapee = tree.push(Node::new("Escapee", Span::new(20, 25)), Some(parent));
        tree[parent].children.push(escapee);

        repair(&mut tree).unwrap();

        assert!(tree[parent].children.is_empty());
        assert_eq!(tree[root].children, vec![parent, escapee, late]);
        assert_eq!(tree[escapee].parent, Some(root));
        assert_eq!(tree[escapee].span, Span::new(20, 25));
    }

    #[test]
    fn test_reparented_node_appended_when_latest() {
        let mut tree = Tree::with_root(Node::new("Grandparent", Span::new(0, 30)));
        let root = tree.root();
        let parent = tree.push(Node::new("Parent", Span::new(0, 10)), Some(root));
        tree[root].children.push(parent);
        let escapee = tree.push(Node::new("Escapee", Span::new(15, 20)), Some(parent));
        tree[parent].children.push(escapee);

        repair(&mut tree).unwrap();

        assert_eq!(tree[root].children, vec![parent, escapee]);
    }

    #[test]
    fn test_node_before_parent_is_fatal() {
        let mut tree = tree_with_children(Span::new(10, 30), &[Span::new(2, 8)]);
        let err = repair(&mut tree).unwrap_err();

        assert!(matches!(err, CanonError::NodeBeforeParent { .. }));
    }

    #[test]
    fn test_node_past_document_end_is_fatal() {
        let mut tree = tree_with_children(Span::new(0, 10), &[Span::new(10, 10)]);
        let err = repair(&mut tree).unwrap_err();

        assert!(matches!(err, CanonError::OutsideRoot { start: 10, .. }));
    }

    #[test]
    fn test_repair_is_idempotent() {
        let mut tree = Tree::with_root(Node::new("Root", Span::new(0, 40)));
        let root = tree.root();
        let a = tree.push(Node::new("A", Span::new(2, 18)), Some(root));
        let b = tree.push(Node::new("B", Span::new(12, 30)), Some(root));
        tree[root].children.extend([a, b]);
        let inner = tree.push(Node::new("Inner", Span::new(20, 25)), Some(a));
        tree[a].children.push(inner);

        repair(&mut tree).unwrap();
        let after_first = tree.clone();
        repair(&mut tree).unwrap();

        for (id, reference) in tree.preorder().zip(after_first.preorder()) {
            assert_eq!(tree[id], after_first[reference]);
        }
    }

    #[test]
    fn test_deep_nesting_repaired() {
        // Child pushed outside both parent and grandparent climbs two
        // levels in one relocation.
        let mut tree = Tree::with_root(Node::new("Root", Span::new(0, 100)));
        let root = tree.root();
        let outer = tree.push(Node::new("Outer", Span::new(0, 20)), Some(root));
        tree[root].children.push(outer);
        let mid = tree.push(Node::new("Mid", Span::new(0, 10)), Some(outer));
        tree[outer].children.push(mid);
        let stray = tree.push(Node::new("Stray", Span::new(40, 50)), Some(mid));
        tree[mid].children.push(stray);

        repair(&mut tree).unwrap();

        assert_eq!(tree[stray].parent, Some(root));
        assert_eq!(tree[root].children, vec![outer, stray]);
    }
}
