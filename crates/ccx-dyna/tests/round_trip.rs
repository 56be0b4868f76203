use ccx_dyna::{
    DecodeOptions, EncodeOptions, MeshDecoder, MeshEncoder, SkipReason, Topology, format,
};
use ccx_model::{Element, Mesh, Node, codes};
use proptest::prelude::*;

fn encode(mesh: &Mesh, options: EncodeOptions) -> String {
    let mut out = Vec::new();
    MeshEncoder::new(options)
        .encode(mesh, &mut out)
        .expect("export should succeed");
    String::from_utf8(out).expect("deck is ASCII")
}

fn decode(deck: &str) -> Mesh {
    MeshDecoder::default()
        .decode_str(deck)
        .expect("deck should decode")
}

/// Sparse, unordered identifiers and coordinates with at most three decimals.
fn mixed_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    for k in 0..24 {
        let id = 1000 - 37 * k;
        mesh.add_node(Node::new(id, k as f64 * 0.125, -(k as f64) * 2.5, 1.0e6 + k as f64))
            .unwrap();
    }
    let ids: Vec<i32> = mesh.nodes().iter().map(|n| n.id).collect();
    mesh.add_element(Element::new(5, 1, codes::HE20, ids[..20].to_vec()))
        .unwrap();
    mesh.add_element(Element::new(9, 2, codes::HE8, ids[4..12].to_vec()))
        .unwrap();
    mesh.add_element(Element::new(2, 2, codes::TE10, ids[10..20].to_vec()))
        .unwrap();
    mesh.add_element(Element::new(40, 3, codes::TE4, ids[20..24].to_vec()))
        .unwrap();
    mesh.add_element(Element::new(41, 3, codes::TE10, ids[14..24].to_vec()))
        .unwrap();
    mesh
}

#[test]
fn mixed_topologies_survive_a_round_trip() {
    let mesh = mixed_mesh();
    let deck = encode(&mesh, EncodeOptions::default());
    assert_eq!(decode(&deck), mesh);
}

#[test]
fn every_line_has_exact_column_widths() {
    let deck = encode(&mixed_mesh(), EncodeOptions::default());
    let mut section = "";
    for line in deck.lines() {
        if line.starts_with('*') {
            section = line;
            continue;
        }
        if line.starts_with(format::TYPE_MARKER) {
            assert_eq!(line.len(), format::TYPE_MARKER.len() + format::INT_WIDTH);
            continue;
        }
        match section {
            "*NODE" => {
                assert_eq!(line.len(), format::INT_WIDTH + 3 * format::FLOAT_WIDTH, "{line}");
                for k in 0..3 {
                    let start = format::INT_WIDTH + k * format::FLOAT_WIDTH;
                    let field = &line[start..start + format::FLOAT_WIDTH];
                    let (_, decimals) = field.trim().split_once('.').expect("fixed-point");
                    assert_eq!(decimals.len(), format::FLOAT_PRECISION, "{field}");
                }
            }
            "*ELEMENT_SOLID" => assert_eq!(line.len() % format::INT_WIDTH, 0, "{line}"),
            other => panic!("unexpected section {other}"),
        }
    }
}

#[test]
fn legacy_deck_decodes_with_a_default_header_topology() {
    let mut mesh = Mesh::new();
    for id in 1..=20 {
        mesh.add_node(Node::new(id, 0.0, id as f64, 0.0)).unwrap();
    }
    mesh.add_element(Element::new(1, 1, codes::HE20, (1..=20).collect()))
        .unwrap();
    mesh.add_element(Element::new(2, 1, codes::HE8, (1..=8).collect()))
        .unwrap();

    let deck = encode(&mesh, EncodeOptions::legacy());
    assert!(!deck.contains('$'));

    let decoded = MeshDecoder::new(DecodeOptions {
        unmarked_header_topology: Some(Topology::Hex20),
    })
    .decode_str(&deck)
    .expect("legacy deck should decode");
    assert_eq!(decoded, mesh);
}

#[test]
fn skipped_elements_are_absent_after_round_trip() {
    let mut mesh = mixed_mesh();
    let ids: Vec<i32> = mesh.nodes().iter().map(|n| n.id).collect();
    mesh.add_element(Element::new(77, 1, codes::PE15, ids[..15].to_vec()))
        .unwrap();

    let mut out = Vec::new();
    let report = MeshEncoder::default()
        .encode(&mesh, &mut out)
        .expect("export should succeed");
    assert_eq!(report.elements_skipped, 1);
    assert_eq!(report.elements_written, 5);
    assert_eq!(
        report.diagnostics[0].reason,
        SkipReason::UnsupportedTopology { code: codes::PE15 }
    );

    let decoded = decode(std::str::from_utf8(&out).expect("deck is ASCII"));
    assert!(decoded.get_element(77).is_none());
    assert_eq!(decoded, mixed_mesh());
}

fn arb_topology() -> impl Strategy<Value = Topology> {
    prop_oneof![
        Just(Topology::Hex8),
        Just(Topology::Tet4),
        Just(Topology::Hex20),
        Just(Topology::Tet10),
    ]
}

/// Coordinates on a 1/1000 grid so that three decimals represent them exactly.
fn arb_coord() -> impl Strategy<Value = f64> {
    (-9_999_999_999i64..9_999_999_999i64).prop_map(|milli| milli as f64 / 1000.0)
}

prop_compose! {
    fn arb_mesh()(
        node_ids in prop::collection::hash_set(-9_999_999i32..99_999_999, 20..40),
        coords in prop::collection::vec((arb_coord(), arb_coord(), arb_coord()), 40),
        shapes in prop::collection::vec(
            (arb_topology(), 1i32..99_999_999, -999i32..9_999, any::<prop::sample::Index>()),
            0..12,
        ),
    ) -> Mesh {
        let ids: Vec<i32> = node_ids.into_iter().collect();
        let mut mesh = Mesh::new();
        for (id, (x, y, z)) in ids.iter().zip(coords) {
            mesh.add_node(Node::new(*id, x, y, z)).unwrap();
        }
        for (topology, element_id, group, offset) in shapes {
            let d = topology.descriptor();
            let start = offset.index(ids.len());
            let nodes = (0..d.arity).map(|k| ids[(start + k) % ids.len()]).collect();
            // duplicate element identifiers are dropped
            let _ = mesh.add_element(Element::new(element_id, group, d.code, nodes));
        }
        mesh
    }
}

proptest! {
    #[test]
    fn decode_inverts_encode(mesh in arb_mesh()) {
        let deck = encode(&mesh, EncodeOptions::default());
        let decoded = MeshDecoder::default().decode_str(&deck);
        prop_assert!(decoded.is_ok(), "{:?}", decoded.err());
        prop_assert_eq!(decoded.unwrap(), mesh);
    }

    #[test]
    fn section_headers_follow_content(mesh in arb_mesh()) {
        let deck = encode(&mesh, EncodeOptions::default());
        prop_assert_eq!(deck.contains("*NODE\n"), mesh.node_count() > 0);
        prop_assert_eq!(deck.contains("*ELEMENT_SOLID\n"), mesh.element_count() > 0);
    }
}
