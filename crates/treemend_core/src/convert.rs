//! Raw-to-canonical conversion.
//!
//! Resolves reported line/column positions to absolute byte offsets and
//! classifies raw fields into children vs. attributes. The produced
//! tree is isomorphic to the location-bearing raw nodes; sibling and
//! parent ordering is not yet guaranteed (that is the repair engine's
//! job), but every node individually satisfies `start <= end`.

use treemend_ast::{Location, Node, NodeId, Span, Tree};
use treemend_raw::{LineIndex, RawNode, RawValue, Scalar, document_end};

use crate::CanonError;

/// Converts a raw tree into a canonical node tree.
///
/// The root's reported end position is replaced with the recomputed
/// end-of-document position first, since external parsers are known to
/// undercount trailing whitespace there.
pub fn convert(document: &str, raw: &RawNode) -> Result<Tree, CanonError> {
    let index = LineIndex::new(document);

    let Some(loc) = raw.loc else {
        return Err(CanonError::MissingRootLocation);
    };
    let loc = Location::new(loc.start, document_end(document));
    let span = checked_span(&raw.kind, &loc, &index)?;

    let mut tree = Tree::with_root(Node::new(raw.kind.clone(), span));
    let root = tree.root();
    convert_fields(&mut tree, root, raw, &index)?;
    Ok(tree)
}

/// Classifies one raw node's fields into children and attributes of the
/// already-allocated `owner`.
fn convert_fields(
    tree: &mut Tree,
    owner: NodeId,
    raw: &RawNode,
    index: &LineIndex,
) -> Result<(), CanonError> {
    for (key, value) in &raw.fields {
        match value {
            RawValue::Nodes(items) => {
                for item in items {
                    convert_child(tree, owner, item, index)?;
                }
            }
            RawValue::Node(nested) if nested.loc.is_some() => {
                convert_child(tree, owner, nested, index)?;
            }
            RawValue::Node(nested) => {
                // Loc-less nested node: an inline attribute, recorded as
                // {its kind: its name}.
                let Some(name) = nested.name() else {
                    return Err(CanonError::MalformedAttributeNode {
                        kind: nested.kind.clone(),
                    });
                };
                tree.node_mut(owner)
                    .attrs
                    .insert(nested.kind.clone(), name.to_string());
            }
            RawValue::Scalar(scalar) => {
                if key == "value" && !matches!(scalar, Scalar::Str(_)) {
                    // Stringification loses the runtime type; record it.
                    let attrs = &mut tree.node_mut(owner).attrs;
                    attrs.insert("value".to_string(), scalar.to_string());
                    attrs.insert("type".to_string(), scalar.type_name().to_string());
                } else {
                    tree.node_mut(owner)
                        .attrs
                        .insert(key.clone(), scalar.to_string());
                }
            }
        }
    }
    Ok(())
}

fn convert_child(
    tree: &mut Tree,
    owner: NodeId,
    raw: &RawNode,
    index: &LineIndex,
) -> Result<(), CanonError> {
    let Some(loc) = raw.loc else {
        return Err(CanonError::MissingLocation {
            kind: raw.kind.clone(),
        });
    };
    let span = checked_span(&raw.kind, &loc, index)?;
    let id = tree.push(Node::new(raw.kind.clone(), span), Some(owner));
    tree.node_mut(owner).children.push(id);
    convert_fields(tree, id, raw, index)
}

fn checked_span(kind: &str, loc: &Location, index: &LineIndex) -> Result<Span, CanonError> {
    let span = index.span(loc);
    if span.start > span.end {
        return Err(CanonError::NegativeSpan {
            name: kind.to_string(),
            start: span.start,
            end: span.end,
        });
    }
    Ok(span)
}
