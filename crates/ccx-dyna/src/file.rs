//! File sink and source for LS-DYNA decks.
//!
//! The sink is owned by one export call: it is created, written through a
//! buffer and closed on every exit path. A deck whose export failed after the
//! file was created is removed, so an existing `.dyn` file is always a
//! complete one.

use std::ffi::OsString;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use ccx_model::Mesh;

use crate::decoder::MeshDecoder;
use crate::encoder::{ExportReport, MeshEncoder};
use crate::error::{ExportError, ImportError};
use crate::format::FILE_SUFFIX;
use crate::options::{DecodeOptions, EncodeOptions};

/// `<stem>.dyn`. The suffix is appended, never substituted for an existing
/// extension.
pub fn output_path(stem: impl AsRef<Path>) -> PathBuf {
    let mut name = OsString::from(stem.as_ref().as_os_str());
    name.push(".");
    name.push(FILE_SUFFIX);
    PathBuf::from(name)
}

/// Export `mesh` to `<stem>.dyn` and return the path written.
pub fn export_to_stem(
    mesh: &Mesh,
    stem: impl AsRef<Path>,
    options: &EncodeOptions,
) -> Result<(PathBuf, ExportReport), ExportError> {
    let path = output_path(stem);
    let report = export_to_path(mesh, &path, options)?;
    Ok((path, report))
}

pub fn export_to_path(
    mesh: &Mesh,
    path: impl AsRef<Path>,
    options: &EncodeOptions,
) -> Result<ExportReport, ExportError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| ExportError::SinkOpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "output file opened");

    let result = write_deck(mesh, file, options);
    if let Err(err) = &result {
        tracing::warn!(path = %path.display(), error = %err, "export failed, removing partial deck");
        if let Err(remove_err) = fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %remove_err, "partial deck could not be removed");
        }
    }
    result
}

/// Encode into `file`; the file handle is dropped (closed) before returning.
fn write_deck(mesh: &Mesh, file: File, options: &EncodeOptions) -> Result<ExportReport, ExportError> {
    let mut writer = BufWriter::new(file);
    let report = MeshEncoder::new(options.clone()).encode(mesh, &mut writer)?;
    let file = writer.into_inner().map_err(|err| err.into_error())?;
    file.sync_all()?;
    Ok(report)
}

pub fn import_file(path: impl AsRef<Path>, options: &DecodeOptions) -> Result<Mesh, ImportError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ImportError::SourceOpenFailed {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "input file opened");
    MeshDecoder::new(options.clone()).decode(BufReader::new(file))
}
