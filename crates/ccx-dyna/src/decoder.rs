//! Mesh decoder: rebuilds a mesh store from an LS-DYNA keyword deck.
//!
//! The decoder understands the same record family the encoder writes:
//! - `*NODE` lines of `%8d%16.3f%16.3f%16.3f`
//! - `*ELEMENT_SOLID` single-line records, recognised by their field count
//!   (10 fields: 8-node hexahedron, 6 fields: 4-node tetrahedron)
//! - `*ELEMENT_SOLID` multi-line records (`id, group` line plus node lines),
//!   whose topology comes from the preceding `$TYPE` marker or, for unmarked
//!   decks, from [`DecodeOptions::unmarked_header_topology`]
//!
//! Other `*` keywords are skipped together with their data, `$` comments are
//! ignored. The first structural error aborts the decode; no partially built
//! mesh is returned.

use std::io::{BufRead, Read};

use ccx_model::{Element, Mesh, Node};

use crate::error::{ImportError, RecordError};
use crate::fields::{self, Field, NODE_LAYOUT};
use crate::format::{
    COMMENT_PREFIX, ELEMENT_SECTION, INT_WIDTH, NODE_SECTION, NODES_PER_LINE, TYPE_MARKER,
};
use crate::options::DecodeOptions;
use crate::topology::{self, RecordLayout, TopologyDescriptor};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    None,
    Nodes,
    Elements,
    Other,
}

/// One non-blank line of the deck with its 1-based line number.
struct DeckLine<'a> {
    number: usize,
    text: &'a str,
}

#[derive(Debug, Clone, Default)]
pub struct MeshDecoder {
    options: DecodeOptions,
}

impl MeshDecoder {
    pub fn new(options: DecodeOptions) -> Self {
        Self { options }
    }

    pub fn decode<R: BufRead>(&self, mut source: R) -> Result<Mesh, ImportError> {
        let mut raw = String::new();
        source.read_to_string(&mut raw)?;
        self.decode_str(&raw)
    }

    pub fn decode_str(&self, raw: &str) -> Result<Mesh, ImportError> {
        let lines: Vec<DeckLine<'_>> = raw
            .lines()
            .enumerate()
            .map(|(idx, text)| DeckLine {
                number: idx + 1,
                text: text.strip_suffix('\r').unwrap_or(text),
            })
            .filter(|line| !line.text.trim().is_empty())
            .collect();

        let mut mesh = Mesh::new();
        let mut section = Section::None;
        let mut seen_nodes = false;
        let mut seen_elements = false;
        let mut marker: Option<(usize, i32)> = None;
        let mut i = 0usize;

        while i < lines.len() {
            let line = &lines[i];
            let trimmed = line.text.trim();

            if let Some(keyword) = trimmed.strip_prefix('*') {
                if let Some((marker_line, _)) = marker {
                    return Err(ImportError::malformed(
                        marker_line,
                        RecordError::DanglingTypeMarker,
                    ));
                }
                let name = keyword.split_whitespace().next().unwrap_or_default();
                section = match name.to_ascii_uppercase().as_str() {
                    k if k == &NODE_SECTION[1..] => {
                        if seen_elements {
                            return Err(ImportError::malformed(
                                line.number,
                                RecordError::SectionOrder(NODE_SECTION, ELEMENT_SECTION),
                            ));
                        }
                        if seen_nodes {
                            return Err(ImportError::malformed(
                                line.number,
                                RecordError::RepeatedSection(NODE_SECTION),
                            ));
                        }
                        seen_nodes = true;
                        Section::Nodes
                    }
                    k if k == &ELEMENT_SECTION[1..] => {
                        if seen_elements {
                            return Err(ImportError::malformed(
                                line.number,
                                RecordError::RepeatedSection(ELEMENT_SECTION),
                            ));
                        }
                        seen_elements = true;
                        Section::Elements
                    }
                    other => {
                        tracing::debug!(line = line.number, keyword = other, "skipping keyword");
                        Section::Other
                    }
                };
                i += 1;
                continue;
            }

            if trimmed.starts_with(COMMENT_PREFIX) {
                if section == Section::Elements
                    && let Some(code) = type_marker_code(line.text)
                {
                    if let Some((marker_line, _)) = marker {
                        return Err(ImportError::malformed(
                            marker_line,
                            RecordError::DanglingTypeMarker,
                        ));
                    }
                    marker = Some((line.number, code));
                }
                i += 1;
                continue;
            }

            match section {
                Section::None => {
                    return Err(ImportError::malformed(
                        line.number,
                        RecordError::OutsideSection {
                            node: NODE_SECTION,
                            element: ELEMENT_SECTION,
                        },
                    ));
                }
                Section::Other => i += 1,
                Section::Nodes => {
                    let node = parse_node(line)?;
                    mesh.add_node(node).map_err(|source| ImportError::Mesh {
                        line: line.number,
                        source,
                    })?;
                    i += 1;
                }
                Section::Elements => {
                    let descriptor = self.resolve_topology(line, marker.take())?;
                    let (element, consumed) = parse_element(&lines[i..], descriptor)?;
                    mesh.add_element(element).map_err(|source| ImportError::Mesh {
                        line: line.number,
                        source,
                    })?;
                    i += consumed;
                }
            }
        }

        if let Some((marker_line, _)) = marker {
            return Err(ImportError::malformed(
                marker_line,
                RecordError::DanglingTypeMarker,
            ));
        }

        mesh.validate().map_err(ImportError::Inconsistent)?;
        tracing::info!(
            nodes = mesh.node_count(),
            elements = mesh.element_count(),
            "deck decoded"
        );
        Ok(mesh)
    }

    /// Pick the record contract for the element record starting at `line`.
    fn resolve_topology(
        &self,
        line: &DeckLine<'_>,
        marker: Option<(usize, i32)>,
    ) -> Result<&'static TopologyDescriptor, ImportError> {
        if let Some((marker_line, code)) = marker {
            return topology::classify(code).map_err(|err| ImportError::UnsupportedTopology {
                line: marker_line,
                code: err.code,
            });
        }

        let columns = line.text.len();
        if columns == 2 * INT_WIDTH {
            return self
                .options
                .unmarked_header_topology
                .map(|t| t.descriptor())
                .ok_or_else(|| {
                    ImportError::malformed(
                        line.number,
                        RecordError::MissingTypeMarker {
                            marker: TYPE_MARKER,
                        },
                    )
                });
        }
        if columns % INT_WIDTH == 0
            && let Some(descriptor) = topology::inline_by_field_count(columns / INT_WIDTH)
        {
            return Ok(descriptor);
        }
        Err(ImportError::malformed(
            line.number,
            RecordError::UnknownLayout { columns },
        ))
    }
}

/// Code carried by a `$TYPE` marker line. Any other comment, including one
/// that merely starts with `$TYPE`, yields `None`.
fn type_marker_code(text: &str) -> Option<i32> {
    let code_field = text.strip_prefix(TYPE_MARKER)?;
    if code_field.len() != INT_WIDTH {
        return None;
    }
    fields::split_ints(code_field, 1).ok()?.first().copied()
}

fn parse_node(line: &DeckLine<'_>) -> Result<Node, ImportError> {
    let fields = fields::split_fields(line.text, &NODE_LAYOUT)
        .map_err(|reason| ImportError::malformed(line.number, reason))?;
    match fields.as_slice() {
        [Field::Int(id), Field::Float(x), Field::Float(y), Field::Float(z)] => {
            Ok(Node::new(*id, *x, *y, *z))
        }
        _ => Err(ImportError::malformed(
            line.number,
            RecordError::UnknownLayout {
                columns: line.text.len(),
            },
        )),
    }
}

/// Parse one element record from the front of `lines`.
///
/// Returns the element and the number of lines consumed.
fn parse_element(
    lines: &[DeckLine<'_>],
    descriptor: &TopologyDescriptor,
) -> Result<(Element, usize), ImportError> {
    let first = &lines[0];
    let malformed = |number: usize| move |reason| ImportError::malformed(number, reason);

    match descriptor.layout {
        RecordLayout::Inline => {
            let values = fields::split_ints(first.text, 2 + descriptor.arity)
                .map_err(malformed(first.number))?;
            let element = Element::new(
                values[0],
                values[1],
                descriptor.code,
                descriptor.from_output_order(&values[2..]),
            );
            Ok((element, 1))
        }
        RecordLayout::Header { node_lines } => {
            let header = fields::split_ints(first.text, 2).map_err(malformed(first.number))?;
            let mut written = Vec::with_capacity(descriptor.arity);
            for k in 0..node_lines {
                let line = lines
                    .get(1 + k)
                    .filter(|l| {
                        let t = l.text.trim_start();
                        !t.starts_with('*') && !t.starts_with(COMMENT_PREFIX)
                    })
                    .ok_or_else(|| {
                        ImportError::malformed(
                            first.number,
                            RecordError::Truncated {
                                expected: descriptor.line_count(),
                                found: 1 + k,
                            },
                        )
                    })?;
                written.extend(
                    fields::split_ints(line.text, NODES_PER_LINE).map_err(malformed(line.number))?,
                );
            }
            let element = Element::new(
                header[0],
                header[1],
                descriptor.code,
                descriptor.from_output_order(&written),
            );
            Ok((element, 1 + node_lines))
        }
    }
}

/// Decode with default options.
pub fn decode<R: BufRead>(source: R) -> Result<Mesh, ImportError> {
    MeshDecoder::default().decode(source)
}
