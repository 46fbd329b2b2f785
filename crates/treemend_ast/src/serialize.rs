//! Canonical-tree serialization.
//!
//! This is the hand-off seam to downstream tree adapters: node name
//! becomes `type`, `attrs` stay a nested map (a raw `value` field can
//! inject an `attrs["type"]` key, so flattening would collide with the
//! node kind), and `text`/`tail` carry the inter-node content.

use serde::Serialize;
use serde::ser::SerializeStruct;

use crate::{NodeId, Tree};

impl Serialize for Tree {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        SerNode {
            tree: self,
            id: self.root(),
        }
        .serialize(serializer)
    }
}

struct SerNode<'a> {
    tree: &'a Tree,
    id: NodeId,
}

struct SerChildren<'a> {
    tree: &'a Tree,
    ids: &'a [NodeId],
}

impl<'a> Serialize for SerNode<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let node = self.tree.node(self.id);

        let mut len = 2; // type, span
        if !node.attrs.is_empty() {
            len += 1;
        }
        if node.text.is_some() {
            len += 1;
        }
        if node.tail.is_some() {
            len += 1;
        }
        if !node.children.is_empty() {
            len += 1;
        }

        let mut state = serializer.serialize_struct("Node", len)?;

        state.serialize_field("type", &node.name)?;
        state.serialize_field("span", &[node.span.start, node.span.end])?;

        if !node.attrs.is_empty() {
            state.serialize_field("attrs", &node.attrs)?;
        }
        if let Some(text) = &node.text {
            state.serialize_field("text", text)?;
        }
        if let Some(tail) = &node.tail {
            state.serialize_field("tail", tail)?;
        }
        if !node.children.is_empty() {
            state.serialize_field(
                "children",
                &SerChildren {
                    tree: self.tree,
                    ids: &node.children,
                },
            )?;
        }

        state.end()
    }
}

impl<'a> Serialize for SerChildren<'a> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_seq(self.ids.iter().map(|&id| SerNode {
            tree: self.tree,
            id,
        }))
    }
}
