use std::fs;

use ccx_dyna::{
    DecodeOptions, EncodeOptions, ExportError, OverflowPolicy, RecordRef, export_to_stem,
    import_file, output_path,
};
use ccx_model::{Element, Mesh, Node, codes};

fn tet_mesh() -> Mesh {
    let mut mesh = Mesh::new();
    mesh.add_node(Node::new(1, 0.0, 0.0, 0.0)).unwrap();
    mesh.add_node(Node::new(2, 1.0, 0.0, 0.0)).unwrap();
    mesh.add_node(Node::new(3, 0.0, 1.0, 0.0)).unwrap();
    mesh.add_node(Node::new(4, 0.0, 0.0, 1.0)).unwrap();
    mesh.add_element(Element::new(1, 1, codes::TE4, vec![1, 2, 3, 4]))
        .unwrap();
    mesh
}

#[test]
fn exported_deck_reads_back() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let stem = dir.path().join("job");

    let (path, report) =
        export_to_stem(&tet_mesh(), &stem, &EncodeOptions::default()).expect("export");
    assert_eq!(path, dir.path().join("job.dyn"));
    assert!(report.is_complete());

    let text = fs::read_to_string(&path).expect("read deck");
    assert_eq!(
        text,
        "*NODE\n\
         \x20      1           0.000           0.000           0.000\n\
         \x20      2           1.000           0.000           0.000\n\
         \x20      3           0.000           1.000           0.000\n\
         \x20      4           0.000           0.000           1.000\n\
         *ELEMENT_SOLID\n\
         \x20      1       1       1       2       3       4\n"
    );

    let back = import_file(&path, &DecodeOptions::default()).expect("import");
    assert_eq!(back, tet_mesh());
}

#[test]
fn existing_deck_is_truncated() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let stem = dir.path().join("job");
    fs::write(output_path(&stem), "stale content that is much longer than nothing\n")
        .expect("seed file");

    export_to_stem(&Mesh::new(), &stem, &EncodeOptions::default()).expect("export");
    assert_eq!(fs::read_to_string(output_path(&stem)).expect("read"), "");
}

#[test]
fn failed_export_leaves_no_partial_deck() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let stem = dir.path().join("job");
    let mut mesh = tet_mesh();
    mesh.add_node(Node::new(5, 1.0e20, 0.0, 0.0)).unwrap();

    let err = export_to_stem(&mesh, &stem, &EncodeOptions::default())
        .expect_err("coordinate does not fit its column");
    match err {
        ExportError::FieldOverflow { record, width, .. } => {
            assert_eq!(record, RecordRef::Node(5));
            assert_eq!(width, 16);
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(!output_path(&stem).exists());
}

#[test]
fn widened_export_is_kept_and_reported() {
    let dir = tempfile::tempdir().expect("create temp directory");
    let stem = dir.path().join("job");
    let mut mesh = tet_mesh();
    mesh.add_node(Node::new(123_456_789, 0.0, 0.0, 0.0)).unwrap();

    let options = EncodeOptions {
        overflow: OverflowPolicy::Widen,
        ..EncodeOptions::default()
    };
    let (path, report) = export_to_stem(&mesh, &stem, &options).expect("export");
    assert_eq!(report.fields_widened, 1);
    assert!(
        fs::read_to_string(path)
            .expect("read deck")
            .contains("123456789           0.000")
    );
}
