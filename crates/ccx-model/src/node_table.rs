//! Identifier-indexed node storage.
//!
//! Node identifiers are arbitrary: they may start anywhere, contain gaps and
//! arrive in any order. The table keeps nodes in the order they were inserted
//! and resolves identifiers through a hash index, so storage position and
//! identifier never need to agree.

use std::collections::HashMap;

use crate::error::MeshError;
use crate::mesh::Node;

#[derive(Debug, Clone, Default)]
pub struct NodeTable {
    nodes: Vec<Node>,
    index: HashMap<i32, usize>,
}

impl NodeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        }
    }

    /// Append a node, rejecting an identifier that is already present.
    pub fn insert(&mut self, node: Node) -> Result<(), MeshError> {
        if self.index.contains_key(&node.id) {
            return Err(MeshError::DuplicateNode(node.id));
        }
        self.index.insert(node.id, self.nodes.len());
        self.nodes.push(node);
        Ok(())
    }

    pub fn get(&self, id: i32) -> Option<&Node> {
        self.index.get(&id).map(|&pos| &self.nodes[pos])
    }

    pub fn contains(&self, id: i32) -> bool {
        self.index.contains_key(&id)
    }

    /// Coordinates of node `id`.
    pub fn coordinates(&self, id: i32) -> Result<[f64; 3], MeshError> {
        self.get(id)
            .map(Node::coords)
            .ok_or(MeshError::NodeNotFound(id))
    }

    /// Nodes in insertion order.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    pub fn as_slice(&self) -> &[Node] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

impl PartialEq for NodeTable {
    fn eq(&self, other: &Self) -> bool {
        self.nodes == other.nodes
    }
}

impl<'a> IntoIterator for &'a NodeTable {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
