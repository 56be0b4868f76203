//! Error types for ccx-model

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MeshError {
    #[error("node {0} not found in node table")]
    NodeNotFound(i32),

    #[error("duplicate node identifier {0}")]
    DuplicateNode(i32),

    #[error("duplicate element identifier {0}")]
    DuplicateElement(i32),

    #[error("element {element} references non-existent node {node}")]
    DanglingNode { element: i32, node: i32 },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
}
