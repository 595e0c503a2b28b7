// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Plain-text dump, one `key=value` line per attribute. Meant for eyeballing
//! raw PBS inventory; values are written unescaped.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::{output_path, write_atomically, ExportError, OutputFormat};
use crate::pbs::Record;

const RECORD_MARKER: &str = "--------   ";
const TRAILER: &str = "\n\n\n-------------------\n\n\n";

/// Dump `records` into `{destination}/{category}.txt`
pub fn dump(records: &[Record], category: &str, destination: &Path) -> Result<PathBuf, ExportError> {
    let path = output_path(destination, category, OutputFormat::Text);
    write_atomically(&path, |out| write_dump(out, records, category))?;
    Ok(path)
}

pub fn write_dump<W: Write + ?Sized>(out: &mut W, records: &[Record], category: &str) -> io::Result<()> {
    writeln!(out, "{} - count: {}", category, records.len())?;
    for record in records {
        writeln!(out, "{}{}", RECORD_MARKER, record.name)?;
        for attr in &record.attributes {
            match &attr.resource {
                Some(resource) => writeln!(out, "{}.{}={}", attr.name, resource, attr.value)?,
                None => writeln!(out, "{}={}", attr.name, attr.value)?,
            }
        }
    }
    out.write_all(TRAILER.as_bytes())
}
