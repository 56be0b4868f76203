//! Mesh loader for CalculiX/Abaqus `.inp` decks.
//!
//! Only the mesh definition is read: `*NODE` and `*ELEMENT` cards. Every other
//! card (materials, steps, sets, ...) is skipped together with its data lines.
//! Element groups are numbered from 1 in order of first appearance of the
//! card's `ELSET` (or its `TYPE` when no `ELSET` is given).

use std::fs;
use std::path::Path;

use crate::codes;
use crate::error::MeshError;
use crate::mesh::{Element, Mesh, Node};

pub fn read_mesh_file(path: impl AsRef<Path>) -> Result<Mesh, MeshError> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path).map_err(|e| MeshError::Parse {
        line: 0,
        message: format!("failed to read {}: {e}", path.display()),
    })?;
    read_mesh_str(&raw)
}

#[derive(Debug, Clone, Copy)]
enum Block {
    Skip,
    Nodes,
    Elements {
        element_type: i32,
        group: i32,
        node_count: Option<usize>,
    },
}

/// Element record being accumulated across continuation lines.
struct PendingRecord {
    line: usize,
    fields: Vec<i32>,
}

pub fn read_mesh_str(raw: &str) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new();
    let mut groups = Vec::<String>::new();
    let mut block = Block::Skip;
    let mut pending: Option<PendingRecord> = None;

    for (idx, raw_line) in raw.lines().enumerate() {
        let line = idx + 1;
        let trimmed = raw_line.trim();
        if trimmed.is_empty() || is_comment(trimmed) {
            continue;
        }

        if let Some(card) = trimmed.strip_prefix('*') {
            if let Some(open) = pending.take() {
                return Err(MeshError::Parse {
                    line: open.line,
                    message: "element record is missing continuation lines".to_string(),
                });
            }
            block = open_block(card, line, &mut groups)?;
            continue;
        }

        match block {
            Block::Skip => {}
            Block::Nodes => mesh.add_node(parse_node(trimmed, line)?)?,
            Block::Elements {
                element_type,
                group,
                node_count,
            } => {
                let record = pending.get_or_insert_with(|| PendingRecord {
                    line,
                    fields: Vec::new(),
                });
                for field in trimmed.split(',').map(str::trim).filter(|f| !f.is_empty()) {
                    record.fields.push(parse_int(field, line)?);
                }

                let complete = match node_count {
                    Some(count) => record.fields.len() > count,
                    None => !trimmed.ends_with(','),
                };
                if !complete {
                    continue;
                }

                let Some(record) = pending.take() else {
                    continue;
                };
                if let Some(count) = node_count
                    && record.fields.len() != count + 1
                {
                    return Err(MeshError::Parse {
                        line: record.line,
                        message: format!(
                            "element has {} nodes but its type expects {count}",
                            record.fields.len() - 1
                        ),
                    });
                }
                let Some((&id, nodes)) = record.fields.split_first() else {
                    continue;
                };
                mesh.add_element(Element::new(id, group, element_type, nodes.to_vec()))?;
            }
        }
    }

    if let Some(open) = pending {
        return Err(MeshError::Parse {
            line: open.line,
            message: "element record is missing continuation lines".to_string(),
        });
    }

    tracing::debug!(
        nodes = mesh.node_count(),
        elements = mesh.element_count(),
        "inp mesh loaded"
    );
    Ok(mesh)
}

fn is_comment(line: &str) -> bool {
    line.starts_with("**")
}

fn open_block(card: &str, line: usize, groups: &mut Vec<String>) -> Result<Block, MeshError> {
    let mut fields = card.split(',').map(str::trim);
    let keyword = fields.next().unwrap_or_default().to_ascii_uppercase();
    let mut element_type = None;
    let mut elset = None;
    for field in fields {
        if let Some((key, value)) = field.split_once('=') {
            match key.trim().to_ascii_uppercase().as_str() {
                "TYPE" => element_type = Some(value.trim().to_ascii_uppercase()),
                "ELSET" => elset = Some(value.trim().to_ascii_uppercase()),
                _ => {}
            }
        }
    }

    match keyword.as_str() {
        "NODE" => Ok(Block::Nodes),
        "ELEMENT" => {
            let type_name = element_type.ok_or(MeshError::Parse {
                line,
                message: "missing TYPE parameter in *ELEMENT card".to_string(),
            })?;
            let code = codes::from_calculix_type(&type_name).ok_or_else(|| MeshError::Parse {
                line,
                message: format!("unsupported element type {type_name}"),
            })?;
            let group_name = elset.unwrap_or(type_name);
            let group = match groups.iter().position(|g| *g == group_name) {
                Some(pos) => pos + 1,
                None => {
                    groups.push(group_name);
                    groups.len()
                }
            };
            Ok(Block::Elements {
                element_type: code,
                group: group as i32,
                node_count: codes::nominal_node_count(code),
            })
        }
        _ => Ok(Block::Skip),
    }
}

fn parse_node(data: &str, line: usize) -> Result<Node, MeshError> {
    let fields: Vec<&str> = data.split(',').map(str::trim).collect();
    let id = parse_int(fields[0], line)?;
    let mut coords = [0.0f64; 3];
    for (slot, raw) in coords.iter_mut().zip(fields.iter().skip(1)) {
        if raw.is_empty() {
            continue;
        }
        *slot = raw.parse::<f64>().map_err(|_| MeshError::Parse {
            line,
            message: format!("invalid coordinate '{raw}'"),
        })?;
    }
    Ok(Node::new(id, coords[0], coords[1], coords[2]))
}

fn parse_int(raw: &str, line: usize) -> Result<i32, MeshError> {
    raw.parse::<i32>().map_err(|_| MeshError::Parse {
        line,
        message: format!("invalid integer '{raw}'"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_nodes_and_elements_skipping_other_cards() {
        let src = r#"
** comment
*HEADING
My model
*NODE, NSET=NALL
1,0,0,0
2,1,0,0
3,0,1,0
4,0,0,1
*MATERIAL, NAME=STEEL
*ELASTIC
210000., .3
*ELEMENT, TYPE=C3D4, ELSET=EALL
1,1,2,3,4
*STEP
*STATIC
"#;

        let mesh = read_mesh_str(src).expect("deck should load");
        assert_eq!(mesh.node_count(), 4);
        assert_eq!(mesh.element_count(), 1);
        let element = &mesh.elements()[0];
        assert_eq!(element.element_type, codes::TE4);
        assert_eq!(element.group, 1);
        assert_eq!(element.nodes, vec![1, 2, 3, 4]);
        assert_eq!(mesh.nodes().coordinates(2), Ok([1.0, 0.0, 0.0]));
    }

    #[test]
    fn joins_continuation_lines_of_twenty_node_bricks() {
        let mut src = String::from("*NODE\n");
        for id in 1..=20 {
            src.push_str(&format!("{id},{id}.5,0,0\n"));
        }
        src.push_str("*ELEMENT, TYPE=C3D20R, ELSET=BRICKS\n");
        src.push_str("7,1,2,3,4,5,6,7,8,9,10,11,12,13,14,15,\n16,17,18,19,20\n");

        let mesh = read_mesh_str(&src).expect("deck should load");
        let element = &mesh.elements()[0];
        assert_eq!(element.id, 7);
        assert_eq!(element.element_type, codes::HE20);
        assert_eq!(element.nodes, (1..=20).collect::<Vec<_>>());
    }

    #[test]
    fn numbers_groups_by_first_appearance() {
        let src = r#"
*NODE
1,0,0,0
2,1,0,0
3,0,1,0
4,0,0,1
*ELEMENT, TYPE=C3D4, ELSET=B
1,1,2,3,4
*ELEMENT, TYPE=C3D4, ELSET=A
2,1,2,3,4
*ELEMENT, TYPE=C3D4, ELSET=B
3,1,2,3,4
"#;
        let mesh = read_mesh_str(src).expect("deck should load");
        let groups: Vec<i32> = mesh.elements().iter().map(|e| e.group).collect();
        assert_eq!(groups, vec![1, 2, 1]);
    }

    #[test]
    fn fails_on_unknown_element_type() {
        let src = "*NODE\n1,0,0,0\n*ELEMENT, TYPE=SPRINGA\n1,1,1\n";
        let err = read_mesh_str(src).expect_err("unknown type should fail");
        assert!(matches!(err, MeshError::Parse { line: 3, .. }), "{err:?}");
    }

    #[test]
    fn fails_on_truncated_element_record() {
        let src = "*NODE\n1,0,0,0\n*ELEMENT, TYPE=C3D20\n1,1,2,3,4,5,6,7,8,9,10,\n*STEP\n";
        let err = read_mesh_str(src).expect_err("truncated record should fail");
        assert_eq!(
            err,
            MeshError::Parse {
                line: 4,
                message: "element record is missing continuation lines".to_string()
            }
        );
    }

    #[test]
    fn fails_on_bad_coordinate() {
        let src = "*NODE\n1,0,abc,0\n";
        let err = read_mesh_str(src).expect_err("bad coordinate should fail");
        assert!(err.to_string().contains("invalid coordinate 'abc'"));
    }
}
