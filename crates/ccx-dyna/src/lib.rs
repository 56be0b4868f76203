//! LS-DYNA keyword deck export and import for CalculiX meshes.
//!
//! This crate provides:
//! - **Topology classifier**: element type code → node count, record layout, slot permutation
//! - **Fixed-width formatter**: `%8d` / `%16.3f` columns with a configurable overflow policy
//! - **Mesh encoder**: `*NODE` and `*ELEMENT_SOLID` sections, per-element skip diagnostics
//! - **Mesh decoder**: the exact inverse for decks made of supported topologies
//! - **File sink/source**: `<stem>.dyn` creation, cleanup of failed exports, file import
//!
//! ## Usage
//!
//! ```rust,no_run
//! use ccx_dyna::{EncodeOptions, DecodeOptions, export_to_stem, import_file};
//!
//! let mesh = ccx_model::inp::read_mesh_file("job.inp")?;
//! let (path, report) = export_to_stem(&mesh, "job", &EncodeOptions::default())?;
//! println!("{} nodes, {} elements, {} skipped", report.nodes_written,
//!          report.elements_written, report.elements_skipped);
//! let back = import_file(&path, &DecodeOptions::default())?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod decoder;
pub mod encoder;
mod error;
pub mod fields;
mod file;
pub mod format;
mod options;
pub mod topology;

pub use decoder::{MeshDecoder, decode};
pub use encoder::{ElementDiagnostic, ExportReport, MeshEncoder, encode};
pub use error::{
    ExportError, FieldError, ImportError, RecordError, RecordRef, SkipReason, UnsupportedTopology,
};
pub use fields::{Field, FieldKind, RecordFormatter};
pub use file::{export_to_path, export_to_stem, import_file, output_path};
pub use options::{CodecConfig, DecodeOptions, EncodeOptions, OverflowPolicy};
pub use topology::{RecordLayout, Topology, TopologyDescriptor, classify};
