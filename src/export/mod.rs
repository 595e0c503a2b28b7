// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Per-category output files.
//!
//! Documents are written to a temporary file next to the destination and
//! renamed into place only once fully flushed, so a reader polling the output
//! directory sees either the previous document or the complete new one.

pub mod escape;
pub mod json;
pub mod text;

use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tempfile::NamedTempFile;
use thiserror::Error;

use crate::pbs::Record;

/// Output file could not be created or written
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl ExportError {
    pub fn path(&self) -> &Path {
        match self {
            ExportError::Io { path, .. } => path,
        }
    }
}

/// Output document format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// One JSON document per category
    #[default]
    Json,
    /// Plain `key=value` dump per category
    Text,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Text => "txt",
        }
    }
}

/// Path of the document for `category` inside `destination`
pub fn output_path(destination: &Path, category: &str, format: OutputFormat) -> PathBuf {
    destination.join(format!("{}.{}", category, format.extension()))
}

/// Write `records` for `category` into `destination` in the given format
pub fn export(
    records: &[Record],
    category: &str,
    destination: &Path,
    format: OutputFormat,
) -> Result<PathBuf, ExportError> {
    match format {
        OutputFormat::Json => json::serialize(records, category, destination),
        OutputFormat::Text => text::dump(records, category, destination),
    }
}

/// Run `write` against a buffered temporary file, then rename it to `path`.
///
/// On any failure the temporary file is removed and `path` is left untouched.
pub(crate) fn write_atomically<F>(path: &Path, write: F) -> Result<(), ExportError>
where
    F: FnOnce(&mut BufWriter<NamedTempFile>) -> io::Result<()>,
{
    let io_err = |source: io::Error| ExportError::Io {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();

    let tmp = tempfile::Builder::new()
        .prefix(&format!(".{}.", file_name))
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(io_err)?;

    let mut out = BufWriter::new(tmp);
    write(&mut out).map_err(io_err)?;
    out.flush().map_err(io_err)?;
    let tmp = out.into_inner().map_err(|e| io_err(e.into_error()))?;

    // Match the mode a plain create would give, temp files start out private
    #[cfg(unix)]
    {
        use std::fs::Permissions;
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(Permissions::from_mode(0o644))
            .map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}
