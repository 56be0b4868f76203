//! Error types for ccx-dyna

use std::fmt;
use std::io;
use std::path::PathBuf;

use ccx_model::MeshError;
use thiserror::Error;

/// The record a formatting failure belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordRef {
    Node(i32),
    Element(i32),
}

impl fmt::Display for RecordRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordRef::Node(id) => write!(f, "node {id}"),
            RecordRef::Element(id) => write!(f, "element {id}"),
        }
    }
}

/// Failure to render a single fixed-width field.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FieldError {
    #[error("'{text}' does not fit a {width}-column field")]
    Overflow { text: String, width: usize },

    #[error("non-finite value {0} cannot be written as a fixed-point field")]
    NonFinite(f64),
}

/// Fatal export failures. Per-element problems are [`SkipReason`]s instead.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("output file {} could not be opened: {source}", .path.display())]
    SinkOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("{record}: '{text}' does not fit a {width}-column field")]
    FieldOverflow {
        record: RecordRef,
        text: String,
        width: usize,
    },

    #[error("{record}: non-finite value {value} cannot be written")]
    NonFiniteValue { record: RecordRef, value: f64 },

    #[error("node table lookup failed: {0}")]
    NodeTable(#[from] MeshError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ExportError {
    pub(crate) fn from_field(record: RecordRef, err: FieldError) -> Self {
        match err {
            FieldError::Overflow { text, width } => ExportError::FieldOverflow {
                record,
                text,
                width,
            },
            FieldError::NonFinite(value) => ExportError::NonFiniteValue { record, value },
        }
    }
}

/// Why an element was left out of the deck.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error("element type {code} is not a known type")]
    UnsupportedTopology { code: i32 },

    #[error("references node {node}, which is not in the node table")]
    NodeNotFound { node: i32 },

    #[error("has {found} nodes but its type expects {expected}")]
    ArityMismatch { expected: usize, found: usize },
}

/// A type code outside the classifier's table.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("element type {code} is not a known type")]
pub struct UnsupportedTopology {
    pub code: i32,
}

impl From<UnsupportedTopology> for SkipReason {
    fn from(err: UnsupportedTopology) -> Self {
        SkipReason::UnsupportedTopology { code: err.code }
    }
}

/// Structural problems found while splitting or grouping deck lines.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("expected {expected} columns, found {found}")]
    Width { expected: usize, found: usize },

    #[error("record contains non-ASCII characters")]
    NonAscii,

    #[error("columns {start}-{end} are blank")]
    BlankField { start: usize, end: usize },

    #[error("columns {start}-{end} do not hold a valid {kind}: '{text}'")]
    InvalidField {
        start: usize,
        end: usize,
        kind: &'static str,
        text: String,
    },

    #[error("{columns}-column line matches no element record layout")]
    UnknownLayout { columns: usize },

    #[error("multi-line element record has no {marker} line")]
    MissingTypeMarker { marker: &'static str },

    #[error("type marker is not followed by an element record")]
    DanglingTypeMarker,

    #[error("element record ends after {found} of {expected} lines")]
    Truncated { expected: usize, found: usize },

    #[error("data line outside of a {node} or {element} section")]
    OutsideSection {
        node: &'static str,
        element: &'static str,
    },

    #[error("section {0} appears more than once")]
    RepeatedSection(&'static str),

    #[error("section {0} appears after {1}")]
    SectionOrder(&'static str, &'static str),
}

/// Decode failures. Decoding stops at the first one and returns no mesh.
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("input file {} could not be opened: {source}", .path.display())]
    SourceOpenFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("line {line}: malformed record: {reason}")]
    MalformedRecord { line: usize, reason: RecordError },

    #[error("line {line}: element type {code} is not a known type")]
    UnsupportedTopology { line: usize, code: i32 },

    #[error("line {line}: {source}")]
    Mesh {
        line: usize,
        #[source]
        source: MeshError,
    },

    #[error("decoded mesh is inconsistent: {0}")]
    Inconsistent(#[source] MeshError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

impl ImportError {
    pub(crate) fn malformed(line: usize, reason: RecordError) -> Self {
        ImportError::MalformedRecord { line, reason }
    }
}
