//! Mesh store for the CalculiX pre/post-processor exporters.
//!
//! This crate provides:
//! - **Mesh store**: nodes and elements kept in enumeration order
//! - **Node table**: identifier-indexed coordinate lookup, independent of storage position
//! - **Element codes**: the pre-processor's element type codes (HE8, TE4, HE20, TE10, ...)
//! - **INP loader**: `*NODE` / `*ELEMENT` cards of a CalculiX/Abaqus deck
//! - **JSON store**: mesh persistence for handing meshes between tools

pub mod codes;
mod error;
pub mod inp;
mod mesh;
mod node_table;
mod store;

pub use error::MeshError;
pub use mesh::{Element, Mesh, MeshStatistics, Node};
pub use node_table::NodeTable;
pub use store::{load_mesh, save_mesh};
