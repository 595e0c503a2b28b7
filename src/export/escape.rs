// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! String escaping for quoted JSON fields, written straight into the output.

use std::io::{self, Write};

/// Write `value` escaped for use between double quotes.
///
/// `"`, `\`, newline, carriage return and tab use their short escapes; any
/// other byte below 0x20 becomes `\u00XX`. Everything else, including
/// multi-byte UTF-8 sequences, is copied through unchanged. Unescaped runs are
/// written as slices, so no intermediate buffer is built.
pub fn write_escaped<W: Write + ?Sized>(out: &mut W, value: &str) -> io::Result<()> {
    let bytes = value.as_bytes();
    let mut start = 0;

    for (i, &byte) in bytes.iter().enumerate() {
        if byte != b'"' && byte != b'\\' && byte >= 0x20 {
            continue;
        }

        if start < i {
            out.write_all(&bytes[start..i])?;
        }
        match byte {
            b'"' => out.write_all(b"\\\"")?,
            b'\\' => out.write_all(b"\\\\")?,
            b'\n' => out.write_all(b"\\n")?,
            b'\r' => out.write_all(b"\\r")?,
            b'\t' => out.write_all(b"\\t")?,
            control => write!(out, "\\u{:04x}", control)?,
        }
        start = i + 1;
    }

    if start < bytes.len() {
        out.write_all(&bytes[start..])?;
    }
    Ok(())
}
