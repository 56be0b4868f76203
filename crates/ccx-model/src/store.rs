use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::mesh::{Element, Mesh, Node};

const SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Serialize, Deserialize)]
struct StoredMesh {
    schema_version: u32,
    nodes: Vec<Node>,
    elements: Vec<Element>,
}

pub fn save_mesh(path: impl AsRef<Path>, mesh: &Mesh) -> io::Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)?;
    }

    let stored = StoredMesh {
        schema_version: SCHEMA_VERSION,
        nodes: mesh.nodes().as_slice().to_vec(),
        elements: mesh.elements().to_vec(),
    };
    let bytes = serde_json::to_vec_pretty(&stored)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    fs::write(path, bytes)?;
    tracing::debug!(path = %path.display(), "mesh store saved");
    Ok(())
}

pub fn load_mesh(path: impl AsRef<Path>) -> io::Result<Mesh> {
    let bytes = fs::read(path)?;
    let stored: StoredMesh = serde_json::from_slice(&bytes)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    if stored.schema_version != SCHEMA_VERSION {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unsupported mesh schema version {}", stored.schema_version),
        ));
    }
    Mesh::from_parts(stored.nodes, stored.elements)
        .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
}
