//! Mesh data structures shared by importers and exporters.
//!
//! A [`Mesh`] owns a [`NodeTable`] and an ordered list of elements. Both keep
//! their enumeration order; exporters walk them front to back.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::codes;
use crate::error::MeshError;
use crate::node_table::NodeTable;

/// A node in the finite element mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    /// Node ID (unique, not necessarily contiguous)
    pub id: i32,
    /// X coordinate
    pub x: f64,
    /// Y coordinate
    pub y: f64,
    /// Z coordinate
    pub z: f64,
}

impl Node {
    pub fn new(id: i32, x: f64, y: f64, z: f64) -> Self {
        Self { id, x, y, z }
    }

    pub fn coords(&self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }
}

/// An element in the finite element mesh
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Element {
    /// Element ID (unique)
    pub id: i32,
    /// Group / material tag
    pub group: i32,
    /// Element type code (see [`codes`])
    pub element_type: i32,
    /// Node connectivity (node IDs, in the store's internal slot order)
    pub nodes: Vec<i32>,
}

impl Element {
    pub fn new(id: i32, group: i32, element_type: i32, nodes: Vec<i32>) -> Self {
        Self {
            id,
            group,
            element_type,
            nodes,
        }
    }
}

/// Complete mesh store
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Mesh {
    nodes: NodeTable,
    elements: Vec<Element>,
    element_ids: HashSet<i32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a mesh from node and element lists, keeping their order.
    pub fn from_parts(nodes: Vec<Node>, elements: Vec<Element>) -> Result<Self, MeshError> {
        let mut mesh = Self {
            nodes: NodeTable::with_capacity(nodes.len()),
            elements: Vec::with_capacity(elements.len()),
            element_ids: HashSet::with_capacity(elements.len()),
        };
        for node in nodes {
            mesh.add_node(node)?;
        }
        for element in elements {
            mesh.add_element(element)?;
        }
        Ok(mesh)
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), MeshError> {
        self.nodes.insert(node)
    }

    /// Append an element. Connectivity is not checked here; see [`Mesh::validate`].
    pub fn add_element(&mut self, element: Element) -> Result<(), MeshError> {
        if !self.element_ids.insert(element.id) {
            return Err(MeshError::DuplicateElement(element.id));
        }
        self.elements.push(element);
        Ok(())
    }

    pub fn nodes(&self) -> &NodeTable {
        &self.nodes
    }

    pub fn elements(&self) -> &[Element] {
        &self.elements
    }

    pub fn get_node(&self, id: i32) -> Option<&Node> {
        self.nodes.get(id)
    }

    pub fn get_element(&self, id: i32) -> Option<&Element> {
        if !self.element_ids.contains(&id) {
            return None;
        }
        self.elements.iter().find(|e| e.id == id)
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn element_count(&self) -> usize {
        self.elements.len()
    }

    /// Check that every element references existing nodes.
    pub fn validate(&self) -> Result<(), MeshError> {
        for element in &self.elements {
            if let Some(&node) = element.nodes.iter().find(|&&n| !self.nodes.contains(n)) {
                return Err(MeshError::DanglingNode {
                    element: element.id,
                    node,
                });
            }
        }
        Ok(())
    }

    pub fn statistics(&self) -> MeshStatistics {
        let mut element_type_counts = BTreeMap::new();
        for element in &self.elements {
            *element_type_counts.entry(element.element_type).or_insert(0) += 1;
        }

        MeshStatistics {
            num_nodes: self.nodes.len(),
            num_elements: self.elements.len(),
            element_type_counts,
        }
    }

    pub fn into_parts(self) -> (Vec<Node>, Vec<Element>) {
        (self.nodes.as_slice().to_vec(), self.elements)
    }
}

/// Mesh statistics for reporting
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshStatistics {
    pub num_nodes: usize,
    pub num_elements: usize,
    /// Count of each element type code
    pub element_type_counts: BTreeMap<i32, usize>,
}

impl MeshStatistics {
    /// Format as a human-readable string
    pub fn format(&self) -> String {
        let mut lines = vec![
            format!("Nodes: {}", self.num_nodes),
            format!("Elements: {}", self.num_elements),
        ];

        if !self.element_type_counts.is_empty() {
            lines.push("Element types:".to_string());
            for (code, count) in &self.element_type_counts {
                match codes::name(*code) {
                    Some(name) => lines.push(format!("  {name} ({code}): {count}")),
                    None => lines.push(format!("  type {code}: {count}")),
                }
            }
        }

        lines.join("\n")
    }
}
