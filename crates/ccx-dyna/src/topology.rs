//! Element topology classifier.
//!
//! Maps an element type code to the record contract of `*ELEMENT_SOLID`: how
//! many node slots the element has, how the record is split across lines and
//! in which order the store's slots are written.
//!
//! Permutations are explicit tables. `permutation[k]` is the internal slot
//! written at output position `k`.

use ccx_model::codes;
use serde::{Deserialize, Serialize};

use crate::error::UnsupportedTopology;
use crate::format::NODES_PER_LINE;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Topology {
    /// 8-node hexahedron
    Hex8,
    /// 4-node tetrahedron
    Tet4,
    /// 20-node hexahedron
    Hex20,
    /// 10-node tetrahedron
    Tet10,
}

/// How one element record is laid out in the deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordLayout {
    /// `id, group, n1 .. nk` on a single line.
    Inline,
    /// An `id, group` line followed by `node_lines` lines of
    /// [`NODES_PER_LINE`] node identifiers.
    Header { node_lines: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopologyDescriptor {
    pub topology: Topology,
    /// Element type code in the mesh store.
    pub code: i32,
    pub arity: usize,
    pub layout: RecordLayout,
    pub permutation: &'static [usize],
}

const IDENTITY_8: [usize; 8] = [0, 1, 2, 3, 4, 5, 6, 7];
const IDENTITY_4: [usize; 4] = [0, 1, 2, 3];

/// Mid-side nodes of the top face and the vertical edges trade places.
pub const HEX20_PERMUTATION: [usize; 20] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, //
    10, 11, 16, 17, 18, 19, 12, 13, 14, 15,
];

/// The three mid-side nodes of the upper edges rotate.
pub const TET10_PERMUTATION: [usize; 10] = [0, 1, 2, 3, 4, 5, 6, 8, 9, 7];

static DESCRIPTORS: [TopologyDescriptor; 4] = [
    TopologyDescriptor {
        topology: Topology::Hex8,
        code: codes::HE8,
        arity: 8,
        layout: RecordLayout::Inline,
        permutation: &IDENTITY_8,
    },
    TopologyDescriptor {
        topology: Topology::Tet4,
        code: codes::TE4,
        arity: 4,
        layout: RecordLayout::Inline,
        permutation: &IDENTITY_4,
    },
    TopologyDescriptor {
        topology: Topology::Hex20,
        code: codes::HE20,
        arity: 20,
        layout: RecordLayout::Header { node_lines: 2 },
        permutation: &HEX20_PERMUTATION,
    },
    TopologyDescriptor {
        topology: Topology::Tet10,
        code: codes::TE10,
        arity: 10,
        layout: RecordLayout::Header { node_lines: 1 },
        permutation: &TET10_PERMUTATION,
    },
];

/// Descriptor for an element type code.
pub fn classify(code: i32) -> Result<&'static TopologyDescriptor, UnsupportedTopology> {
    DESCRIPTORS
        .iter()
        .find(|d| d.code == code)
        .ok_or(UnsupportedTopology { code })
}

/// Inline topology whose single-line record holds `field_count` fields.
pub fn inline_by_field_count(field_count: usize) -> Option<&'static TopologyDescriptor> {
    DESCRIPTORS
        .iter()
        .find(|d| d.layout == RecordLayout::Inline && d.arity + 2 == field_count)
}

impl Topology {
    pub const ALL: [Topology; 4] = [
        Topology::Hex8,
        Topology::Tet4,
        Topology::Hex20,
        Topology::Tet10,
    ];

    pub fn descriptor(self) -> &'static TopologyDescriptor {
        match self {
            Topology::Hex8 => &DESCRIPTORS[0],
            Topology::Tet4 => &DESCRIPTORS[1],
            Topology::Hex20 => &DESCRIPTORS[2],
            Topology::Tet10 => &DESCRIPTORS[3],
        }
    }

    pub fn code(self) -> i32 {
        self.descriptor().code
    }
}

impl TopologyDescriptor {
    /// Lines one record occupies, header included.
    pub fn line_count(&self) -> usize {
        match self.layout {
            RecordLayout::Inline => 1,
            RecordLayout::Header { node_lines } => 1 + node_lines,
        }
    }

    /// Reorder store slots into deck order. `nodes.len()` must equal `arity`.
    pub fn to_output_order(&self, nodes: &[i32]) -> Vec<i32> {
        debug_assert_eq!(nodes.len(), self.arity);
        self.permutation.iter().map(|&slot| nodes[slot]).collect()
    }

    /// Inverse of [`to_output_order`](Self::to_output_order).
    pub fn from_output_order(&self, written: &[i32]) -> Vec<i32> {
        debug_assert_eq!(written.len(), self.arity);
        let mut nodes = vec![0; self.arity];
        for (&slot, &node) in self.permutation.iter().zip(written) {
            nodes[slot] = node;
        }
        nodes
    }

    /// Deck-ordered node identifiers split into continuation lines.
    pub fn node_lines<'a>(&self, written: &'a [i32]) -> std::slice::Chunks<'a, i32> {
        written.chunks(NODES_PER_LINE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_supported_codes() {
        assert_eq!(classify(1).map(|d| d.topology), Ok(Topology::Hex8));
        assert_eq!(classify(3).map(|d| d.topology), Ok(Topology::Tet4));
        assert_eq!(classify(4).map(|d| d.topology), Ok(Topology::Hex20));
        assert_eq!(classify(6).map(|d| d.topology), Ok(Topology::Tet10));
    }

    #[test]
    fn rejects_codes_outside_the_table() {
        for code in [0, 2, 5, 7, 11, -1, 100] {
            assert_eq!(classify(code), Err(UnsupportedTopology { code }));
        }
    }

    #[test]
    fn permutations_are_bijections_of_matching_arity() {
        for topology in Topology::ALL {
            let d = topology.descriptor();
            assert_eq!(d.topology, topology);
            assert_eq!(d.permutation.len(), d.arity, "{topology:?}");
            let mut seen = vec![false; d.arity];
            for &slot in d.permutation {
                assert!(!seen[slot], "{topology:?} repeats slot {slot}");
                seen[slot] = true;
            }
            if let RecordLayout::Header { node_lines } = d.layout {
                assert_eq!(node_lines * NODES_PER_LINE, d.arity);
            }
        }
    }

    #[test]
    fn hex20_second_line_order() {
        let d = Topology::Hex20.descriptor();
        let slots: Vec<i32> = (0..20).collect();
        let written = d.to_output_order(&slots);
        let lines: Vec<&[i32]> = d.node_lines(&written).collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9]);
        assert_eq!(lines[1], &[10, 11, 16, 17, 18, 19, 12, 13, 14, 15]);
        assert_eq!(d.from_output_order(&written), slots);
    }

    #[test]
    fn tet10_line_order() {
        let d = Topology::Tet10.descriptor();
        let slots: Vec<i32> = (0..10).collect();
        let written = d.to_output_order(&slots);
        assert_eq!(written, vec![0, 1, 2, 3, 4, 5, 6, 8, 9, 7]);
        assert_eq!(d.from_output_order(&written), slots);
        assert_eq!(d.line_count(), 2);
    }

    #[test]
    fn inline_layouts_are_found_by_field_count() {
        assert_eq!(inline_by_field_count(10).map(|d| d.topology), Some(Topology::Hex8));
        assert_eq!(inline_by_field_count(6).map(|d| d.topology), Some(Topology::Tet4));
        assert_eq!(inline_by_field_count(12), None);
        // header records are never inline
        assert_eq!(inline_by_field_count(22), None);
    }
}
