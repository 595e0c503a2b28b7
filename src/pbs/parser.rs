// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! Parser for the "full status" text printed by `qstat -f`, `pbsnodes -a`,
//! `pbs_rstat -f` and `qmgr -c list ...`.
//!
//! All of them share one layout: an unindented header line naming the record,
//! followed by `key = value` lines. Those are indented everywhere except in
//! `pbs_rstat -f`, which prints them flush-left. Long values are wrapped onto
//! continuation lines that start with a tab.

use thiserror::Error;

use super::types::{Attribute, Category, Record};

/// Separator between an attribute key and its value
const ASSIGN: &str = " = ";

/// Status output that does not follow the expected layout
#[derive(Debug, Error, PartialEq, Eq)]
#[error("line {line_no}: expected {expected:?} header, got {line:?}")]
pub struct ParseError {
    pub line_no: usize,
    pub expected: &'static str,
    pub line: String,
}

/// Parse full status output into records, preserving input order
pub fn parse_status_output(output: &str, category: Category) -> Result<Vec<Record>, ParseError> {
    let mut records: Vec<Record> = Vec::new();
    // Continuations only extend an attribute until the next blank line
    let mut continuation_open = false;

    for (idx, line) in output.lines().enumerate() {
        if line.trim().is_empty() {
            continuation_open = false;
            continue;
        }

        if let Some(rest) = line.strip_prefix('\t') {
            match records.last_mut().and_then(|r| r.attributes.last_mut()) {
                Some(attr) if continuation_open => attr.value.push_str(rest),
                _ => tracing::debug!(line_no = idx + 1, "ignoring stray continuation line"),
            }
            continue;
        }

        let indented = line.starts_with(' ');
        // pbs_rstat -f prints attributes flush-left, only `Resv ID:` starts a record
        let flush_left = !indented
            && category.flush_left_attributes()
            && !records.is_empty()
            && parse_header(line, category).is_none();

        if indented || flush_left {
            let Some(record) = records.last_mut() else {
                tracing::debug!(line_no = idx + 1, "ignoring attribute before first header");
                continue;
            };
            match parse_attribute_line(line.trim_start()) {
                Some(attr) => {
                    record.attributes.push(attr);
                    continuation_open = true;
                }
                None => {
                    tracing::debug!(line_no = idx + 1, line, "ignoring malformed attribute line");
                    continuation_open = false;
                }
            }
            continue;
        }

        let name = parse_header(line, category).ok_or_else(|| ParseError {
            line_no: idx + 1,
            expected: category.header_prefix().unwrap_or(""),
            line: line.to_string(),
        })?;
        records.push(Record::new(name));
        continuation_open = false;
    }

    Ok(records)
}

/// Extract the record name from a header line
fn parse_header(line: &str, category: Category) -> Option<String> {
    let name = match category.header_prefix() {
        Some(prefix) => line.strip_prefix(prefix)?,
        None => line,
    };
    let name = name.trim();
    if name.is_empty() {
        return None;
    }
    Some(name.to_string())
}

/// Parse `key = value`; a bare `key =` carries an empty value
fn parse_attribute_line(line: &str) -> Option<Attribute> {
    if let Some((key, value)) = line.split_once(ASSIGN) {
        let key = key.trim_end();
        if key.is_empty() {
            return None;
        }
        return Some(Attribute::from_key(key, value));
    }

    let key = line.trim_end().strip_suffix(" =")?.trim_end();
    if key.is_empty() {
        return None;
    }
    Some(Attribute::from_key(key, ""))
}
