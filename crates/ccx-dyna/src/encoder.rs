//! Mesh encoder: streams a mesh store into an LS-DYNA keyword deck.
//!
//! ```rust
//! use ccx_dyna::MeshEncoder;
//! use ccx_model::{Element, Mesh, Node, codes};
//!
//! let mut mesh = Mesh::new();
//! for (id, x) in [(1, 0.0), (2, 1.0), (3, 0.0), (4, 0.0)] {
//!     mesh.add_node(Node::new(id, x, 0.0, 0.0))?;
//! }
//! mesh.add_element(Element::new(1, 1, codes::TE4, vec![1, 2, 3, 4]))?;
//!
//! let mut deck = Vec::new();
//! let report = MeshEncoder::default().encode(&mesh, &mut deck)?;
//! assert_eq!(report.elements_written, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

use std::fmt::Write as _;
use std::io::Write;

use ccx_model::{Element, Mesh};

use crate::error::{ExportError, FieldError, RecordRef, SkipReason};
use crate::fields::{Field, RecordFormatter};
use crate::format::{ELEMENT_SECTION, INT_WIDTH, NODE_SECTION, TYPE_MARKER};
use crate::options::EncodeOptions;
use crate::topology::{self, RecordLayout, TopologyDescriptor};

/// An element left out of the deck and why.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementDiagnostic {
    pub element: i32,
    pub reason: SkipReason,
}

/// Outcome of one export.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportReport {
    pub nodes_written: usize,
    pub elements_written: usize,
    pub elements_skipped: usize,
    /// Fields that grew past their width under `OverflowPolicy::Widen`.
    pub fields_widened: usize,
    pub diagnostics: Vec<ElementDiagnostic>,
}

impl ExportReport {
    /// True when every element of the mesh made it into the deck.
    pub fn is_complete(&self) -> bool {
        self.elements_skipped == 0
    }

    fn skip(&mut self, element: i32, reason: SkipReason) {
        tracing::warn!(element, %reason, "element skipped");
        self.elements_skipped += 1;
        self.diagnostics.push(ElementDiagnostic { element, reason });
    }
}

#[derive(Debug, Clone, Default)]
pub struct MeshEncoder {
    options: EncodeOptions,
    formatter: RecordFormatter,
}

impl MeshEncoder {
    pub fn new(options: EncodeOptions) -> Self {
        let formatter = RecordFormatter::new(options.overflow);
        Self { options, formatter }
    }

    pub fn options(&self) -> &EncodeOptions {
        &self.options
    }

    /// Write `mesh` to `sink`.
    ///
    /// Elements with an unknown type code, a wrong node count or a dangling
    /// node reference are skipped and reported; the rest of the mesh is still
    /// written. Sink failures and field overflows under
    /// `OverflowPolicy::Fail` abort the export.
    pub fn encode<W: Write>(&self, mesh: &Mesh, sink: &mut W) -> Result<ExportReport, ExportError> {
        let mut report = ExportReport::default();
        self.write_nodes(mesh, sink, &mut report)?;
        self.write_elements(mesh, sink, &mut report)?;
        sink.flush()?;

        tracing::info!(
            nodes = report.nodes_written,
            elements = report.elements_written,
            skipped = report.elements_skipped,
            "deck written"
        );
        Ok(report)
    }

    fn write_nodes<W: Write>(
        &self,
        mesh: &Mesh,
        sink: &mut W,
        report: &mut ExportReport,
    ) -> Result<(), ExportError> {
        let table = mesh.nodes();
        if table.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = table.len(), "writing {NODE_SECTION} section");
        writeln!(sink, "{NODE_SECTION}")?;

        let mut line = String::new();
        for node in table {
            let [x, y, z] = table.coordinates(node.id)?;
            line.clear();
            report.fields_widened += self
                .formatter
                .format_into(
                    &mut line,
                    &[
                        Field::Int(node.id),
                        Field::Float(x),
                        Field::Float(y),
                        Field::Float(z),
                    ],
                )
                .map_err(|err| ExportError::from_field(RecordRef::Node(node.id), err))?;
            line.push('\n');
            sink.write_all(line.as_bytes())?;
            report.nodes_written += 1;
        }
        Ok(())
    }

    fn write_elements<W: Write>(
        &self,
        mesh: &Mesh,
        sink: &mut W,
        report: &mut ExportReport,
    ) -> Result<(), ExportError> {
        let elements = mesh.elements();
        if elements.is_empty() {
            return Ok(());
        }
        tracing::debug!(count = elements.len(), "writing {ELEMENT_SECTION} section");
        writeln!(sink, "{ELEMENT_SECTION}")?;

        let mut record = String::new();
        for element in elements {
            let descriptor = match check_element(mesh, element) {
                Ok(descriptor) => descriptor,
                Err(reason) => {
                    report.skip(element.id, reason);
                    continue;
                }
            };
            record.clear();
            report.fields_widened += self
                .render_element(&mut record, element, descriptor)
                .map_err(|err| ExportError::from_field(RecordRef::Element(element.id), err))?;
            sink.write_all(record.as_bytes())?;
            report.elements_written += 1;
        }
        Ok(())
    }

    /// Render all lines of one element record, newline-terminated.
    fn render_element(
        &self,
        out: &mut String,
        element: &Element,
        descriptor: &TopologyDescriptor,
    ) -> Result<usize, FieldError> {
        let written = descriptor.to_output_order(&element.nodes);
        let mut widened = 0;

        match descriptor.layout {
            RecordLayout::Inline => {
                let mut fields = Vec::with_capacity(2 + written.len());
                fields.push(Field::Int(element.id));
                fields.push(Field::Int(element.group));
                fields.extend(written.iter().map(|&n| Field::Int(n)));
                widened += self.formatter.format_into(out, &fields)?;
                out.push('\n');
            }
            RecordLayout::Header { .. } => {
                if self.options.type_markers {
                    // the code always fits: it came from the topology table
                    let _ = writeln!(
                        out,
                        "{TYPE_MARKER}{:>width$}",
                        descriptor.code,
                        width = INT_WIDTH
                    );
                }
                widened += self
                    .formatter
                    .format_into(out, &[Field::Int(element.id), Field::Int(element.group)])?;
                out.push('\n');
                for chunk in descriptor.node_lines(&written) {
                    let fields: Vec<Field> = chunk.iter().map(|&n| Field::Int(n)).collect();
                    widened += self.formatter.format_into(out, &fields)?;
                    out.push('\n');
                }
            }
        }
        Ok(widened)
    }
}

/// Classify an element and check its connectivity against the node table.
fn check_element(
    mesh: &Mesh,
    element: &Element,
) -> Result<&'static TopologyDescriptor, SkipReason> {
    let descriptor = topology::classify(element.element_type)?;
    if element.nodes.len() != descriptor.arity {
        return Err(SkipReason::ArityMismatch {
            expected: descriptor.arity,
            found: element.nodes.len(),
        });
    }
    if let Some(&node) = element.nodes.iter().find(|&&n| !mesh.nodes().contains(n)) {
        return Err(SkipReason::NodeNotFound { node });
    }
    Ok(descriptor)
}

/// Encode with default options.
pub fn encode<W: Write>(mesh: &Mesh, sink: &mut W) -> Result<ExportReport, ExportError> {
    MeshEncoder::default().encode(mesh, sink)
}
