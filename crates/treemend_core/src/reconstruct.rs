//! Text/tail reconstruction.
//!
//! A single combined pre-order/post-order traversal fills in, for every
//! node, the exact substring of source text not claimed by any child:
//! the node's own leading text and its trailing tail before the next
//! boundary. A cursor walks the document left to right; every boundary
//! (a node's start on the pre visit, its end on the post visit) closes
//! the substring since the previous boundary and assigns it to the
//! previously visited node.
//!
//! Any assertion failing here means the repair engine left an invariant
//! violated; that is an internal-contract error, never recoverable.

use treemend_ast::{NodeId, Tree};

use crate::CanonError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Pre,
    Post,
}

/// Populates `text` and `tail` on every node from a structurally valid
/// tree. No structural change is made.
pub fn reconstruct(tree: &mut Tree, document: &str) -> Result<(), CanonError> {
    let root = tree.root();
    let mut index = 0usize;
    let mut prev: Option<NodeId> = None;
    let mut stack = vec![(root, Phase::Post), (root, Phase::Pre)];

    while let Some((id, phase)) = stack.pop() {
        let (boundary, into_text) = match phase {
            // First child closes its parent's text; a later sibling
            // closes the previous sibling's tail.
            Phase::Pre => (tree[id].span.start as usize, prev == tree[id].parent),
            // A childless node closes its own text; otherwise the last
            // child's tail.
            Phase::Post => (tree[id].span.end as usize, prev == Some(id)),
        };

        if boundary < index {
            return Err(CanonError::reconstruction(format!(
                "boundary of '{}' regressed from {index} to {boundary}",
                tree[id].name
            )));
        }
        let Some(slice) = document.get(index..boundary) else {
            return Err(CanonError::reconstruction(format!(
                "offsets {index}..{boundary} do not fall on character boundaries"
            )));
        };

        match prev {
            Some(prev_id) => {
                let prev_node = tree.node_mut(prev_id);
                if into_text {
                    prev_node.text = Some(slice.to_string());
                } else {
                    prev_node.tail = Some(slice.to_string());
                }
            }
            // Nothing precedes the root; any content before its start
            // would be silently lost.
            None => {
                if !slice.is_empty() {
                    return Err(CanonError::reconstruction(format!(
                        "{} bytes of text precede the root span",
                        slice.len()
                    )));
                }
            }
        }

        if phase == Phase::Pre {
            for &child in tree[id].children.iter().rev() {
                stack.push((child, Phase::Post));
                stack.push((child, Phase::Pre));
            }
        }

        index = boundary;
        prev = Some(id);
    }

    // The document has no content after the root completes.
    if tree[root].tail.is_some() {
        return Err(CanonError::reconstruction("root node acquired a tail"));
    }
    Ok(())
}
