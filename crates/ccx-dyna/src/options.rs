//! Codec configuration.
//!
//! Options can be built in code or loaded from a JSON file; missing keys fall
//! back to their defaults.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::topology::Topology;

/// What to do with a value wider than its field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverflowPolicy {
    /// Abort the export with `FieldOverflow`.
    #[default]
    Fail,
    /// Let the field grow to fit and log a warning.
    Widen,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncodeOptions {
    pub overflow: OverflowPolicy,
    /// Emit a `$TYPE` comment before every multi-line element record.
    pub type_markers: bool,
}

impl Default for EncodeOptions {
    fn default() -> Self {
        Self {
            overflow: OverflowPolicy::Fail,
            type_markers: true,
        }
    }
}

impl EncodeOptions {
    /// Byte-for-byte the output of the historical exporter: no type markers.
    pub fn legacy() -> Self {
        Self {
            type_markers: false,
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// Topology assumed for a multi-line record with no preceding type
    /// marker. `None` makes such records malformed.
    pub unmarked_header_topology: Option<Topology>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    pub encode: EncodeOptions,
    pub decode: DecodeOptions,
}

impl CodecConfig {
    pub fn load(path: impl AsRef<Path>) -> io::Result<Self> {
        let bytes = fs::read(path)?;
        serde_json::from_slice(&bytes).map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))
    }

    pub fn save(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let bytes = serde_json::to_vec_pretty(self)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        fs::write(path, bytes)
    }
}
