//! Index-based node arena.
//!
//! All parent/child relationships are [`NodeId`] indices into one flat
//! `Vec<Node>`. Re-parenting a node is an index update plus a
//! remove/insert in the owners' child-id vectors; no reference cycles.

use std::ops::{Index, IndexMut};

use crate::Node;

/// Identifier of a node within its [`Tree`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// Returns the arena index of this id.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Arena holding one canonical tree.
///
/// Nodes are created once by the converter, mutated in place by the
/// repair engine, then given their `text`/`tail` by the reconstructor.
#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Creates a tree holding only the given root node.
    pub fn with_root(root: Node) -> Self {
        Self {
            nodes: vec![root],
            root: NodeId(0),
        }
    }

    /// Allocates a node in the arena with the given parent back-link.
    ///
    /// The caller is responsible for inserting the returned id into the
    /// parent's `children`; ordering is the caller's concern.
    pub fn push(&mut self, mut node: Node, parent: Option<NodeId>) -> NodeId {
        node.parent = parent;
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(node);
        id
    }

    /// Returns the root node id.
    #[inline]
    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Returns a reference to the node with the given id.
    #[inline]
    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    /// Returns a mutable reference to the node with the given id.
    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    /// Returns the number of nodes in the arena.
    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a tree holds at least its root.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterates over node ids in depth-first, left-to-right order.
    pub fn preorder(&self) -> Preorder<'_> {
        Preorder {
            tree: self,
            stack: vec![self.root],
        }
    }
}

impl Index<NodeId> for Tree {
    type Output = Node;

    #[inline]
    fn index(&self, id: NodeId) -> &Node {
        self.node(id)
    }
}

impl IndexMut<NodeId> for Tree {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        self.node_mut(id)
    }
}

/// Depth-first pre-order traversal over a [`Tree`].
pub struct Preorder<'a> {
    tree: &'a Tree,
    stack: Vec<NodeId>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let id = self.stack.pop()?;
        self.stack
            .extend(self.tree.node(id).children.iter().rev().copied());
        Some(id)
    }
}
