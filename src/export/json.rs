// SPDX-FileCopyrightText: 2026 GSI Helmholtzzentrum f. Schwerionenforschung GmbH, Darmstadt, Germany
// SPDX-License-Identifier: LGPL-3.0-or-later

//! JSON document writer.
//!
//! Layout of `{destination}/{category}.json`:
//!
//! ```text
//! {
//!   "type": "<category>",
//!   "count": <number of items>,
//!   "items": [
//!     {
//!       "name": "<record name>",
//!       "attributes": {
//!         "<name>[.<resource>]": "<value>",
//!         ...
//!       }
//!     },
//!     ...
//!   ]
//! }
//! ```
//!
//! Records and attributes keep their input order. The document is streamed
//! field by field rather than built in memory, so attribute values of any size
//! only pass through the output buffer.

use std::io::{self, Write};
use std::path::{Path, PathBuf};

use super::escape::write_escaped;
use super::{output_path, write_atomically, ExportError, OutputFormat};
use crate::pbs::{Attribute, Record};

/// Serialize `records` into `{destination}/{category}.json`, replacing any
/// previous document. Returns the path written.
pub fn serialize(
    records: &[Record],
    category: &str,
    destination: &Path,
) -> Result<PathBuf, ExportError> {
    let path = output_path(destination, category, OutputFormat::Json);
    write_atomically(&path, |out| write_document(out, records, category))?;
    Ok(path)
}

/// Write the complete document for `records` to `out`
pub fn write_document<W: Write + ?Sized>(
    out: &mut W,
    records: &[Record],
    category: &str,
) -> io::Result<()> {
    out.write_all(b"{\n  \"type\": \"")?;
    write_escaped(out, category)?;
    writeln!(out, "\",\n  \"count\": {},", records.len())?;
    out.write_all(b"  \"items\": [\n")?;

    let mut items = records.iter().peekable();
    while let Some(record) = items.next() {
        write_record(out, record)?;
        if items.peek().is_some() {
            out.write_all(b",")?;
        }
        out.write_all(b"\n")?;
    }

    out.write_all(b"  ]\n}\n")
}

fn write_record<W: Write + ?Sized>(out: &mut W, record: &Record) -> io::Result<()> {
    out.write_all(b"    {\n      \"name\": \"")?;
    write_escaped(out, &record.name)?;
    out.write_all(b"\",\n      \"attributes\": {\n")?;

    let mut attributes = record.attributes.iter().peekable();
    while let Some(attribute) = attributes.next() {
        write_attribute(out, attribute)?;
        if attributes.peek().is_some() {
            out.write_all(b",")?;
        }
        out.write_all(b"\n")?;
    }

    out.write_all(b"      }\n    }")
}

fn write_attribute<W: Write + ?Sized>(out: &mut W, attribute: &Attribute) -> io::Result<()> {
    out.write_all(b"        \"")?;
    write_escaped(out, &attribute.name)?;
    if let Some(resource) = &attribute.resource {
        out.write_all(b".")?;
        write_escaped(out, resource)?;
    }
    out.write_all(b"\": \"")?;
    write_escaped(out, &attribute.value)?;
    out.write_all(b"\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    use serde_json::{json, Value};
    use tempfile::TempDir;

    fn render(records: &[Record], category: &str) -> String {
        let mut out = Vec::new();
        write_document(&mut out, records, category).unwrap();
        String::from_utf8(out).unwrap()
    }

    fn parse(records: &[Record], category: &str) -> Value {
        serde_json::from_str(&render(records, category)).unwrap()
    }

    fn sample_nodes() -> Vec<Record> {
        vec![
            Record::new("nodeA").with_attribute(Attribute::new("state", "free")),
            Record::new("nodeB"),
        ]
    }

    #[test]
    fn test_empty_category() {
        let doc = parse(&[], "reservations");
        assert_eq!(doc, json!({"type": "reservations", "count": 0, "items": []}));
    }

    #[test]
    fn test_two_nodes_scenario() {
        let doc = parse(&sample_nodes(), "nodes");
        assert_eq!(
            doc,
            json!({
                "type": "nodes",
                "count": 2,
                "items": [
                    {"name": "nodeA", "attributes": {"state": "free"}},
                    {"name": "nodeB", "attributes": {}}
                ]
            })
        );
    }

    #[test]
    fn test_exact_layout() {
        let expected = "{\n  \"type\": \"nodes\",\n  \"count\": 2,\n  \"items\": [\n    {\n      \"name\": \"nodeA\",\n      \"attributes\": {\n        \"state\": \"free\"\n      }\n    },\n    {\n      \"name\": \"nodeB\",\n      \"attributes\": {\n      }\n    }\n  ]\n}\n";
        assert_eq!(render(&sample_nodes(), "nodes"), expected);
    }

    #[test]
    fn test_count_matches_items() {
        for n in [0usize, 1, 25] {
            let records: Vec<Record> = (0..n)
                .map(|i| Record::new(format!("{}.pbs-m1", i)).with_attribute(Attribute::new("job_state", "Q")))
                .collect();
            let doc = parse(&records, "jobs");
            assert_eq!(doc["count"], json!(n));
            assert_eq!(doc["items"].as_array().unwrap().len(), n);
        }
    }

    #[test]
    fn test_resource_keyed_attribute() {
        let records = vec![Record::new("node01")
            .with_attribute(Attribute::with_resource("resources_available", "mem", "16gb"))
            .with_attribute(Attribute::new("state", "free"))];
        let doc = parse(&records, "nodes");
        let attrs = doc["items"][0]["attributes"].as_object().unwrap();
        assert_eq!(attrs["resources_available.mem"], json!("16gb"));
        assert_eq!(attrs["state"], json!("free"));
        assert_eq!(attrs.len(), 2);
    }

    #[test]
    fn test_order_preserved() {
        let records = vec![
            Record::new("zeta")
                .with_attribute(Attribute::new("z", "1"))
                .with_attribute(Attribute::new("a", "2"))
                .with_attribute(Attribute::new("m", "3")),
            Record::new("alpha"),
            Record::new("mid"),
        ];
        let text = render(&records, "queues");

        let pos = |needle: &str| text.find(needle).unwrap();
        assert!(pos("\"zeta\"") < pos("\"alpha\""));
        assert!(pos("\"alpha\"") < pos("\"mid\""));
        assert!(pos("\"z\":") < pos("\"a\":"));
        assert!(pos("\"a\":") < pos("\"m\":"));

        let doc: Value = serde_json::from_str(&text).unwrap();
        let names: Vec<&str> = doc["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, ["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_special_characters_round_trip() {
        let name = "job \"quoted\"\\name";
        let value = "line1\nline2\r\n\tindented \x07bell";
        let records = vec![Record::new(name)
            .with_attribute(Attribute::with_resource("Variable\"List", "PBS\tO", value))];

        let text = render(&records, "jobs");
        assert!(text.contains("\\\"quoted\\\"\\\\name"));
        assert!(text.contains("line1\\nline2\\r\\n\\tindented \\u0007bell"));

        let doc: Value = serde_json::from_str(&text).unwrap();
        assert_eq!(doc["items"][0]["name"], json!(name));
        assert_eq!(doc["items"][0]["attributes"]["Variable\"List.PBS\tO"], json!(value));
    }

    #[test]
    fn test_duplicate_record_names_kept_separate() {
        let records = vec![
            Record::new("dup").with_attribute(Attribute::new("a", "1")),
            Record::new("dup").with_attribute(Attribute::new("b", "2")),
        ];
        let doc = parse(&records, "queues");
        assert_eq!(doc["count"], json!(2));
        assert_eq!(doc["items"][0]["attributes"], json!({"a": "1"}));
        assert_eq!(doc["items"][1]["attributes"], json!({"b": "2"}));
    }

    #[test]
    fn test_serialize_writes_category_file() {
        let dir = TempDir::new().unwrap();
        let path = serialize(&sample_nodes(), "nodes", dir.path()).unwrap();

        assert_eq!(path, dir.path().join("nodes.json"));
        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc["type"], json!("nodes"));
        assert_eq!(doc["count"], json!(2));
    }

    #[test]
    fn test_serialize_truncates_previous_document() {
        let dir = TempDir::new().unwrap();
        serialize(&sample_nodes(), "nodes", dir.path()).unwrap();
        let path = serialize(&[], "nodes", dir.path()).unwrap();

        let doc: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(doc, json!({"type": "nodes", "count": 0, "items": []}));
    }

    #[test]
    fn test_serialize_missing_destination() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("does-not-exist");

        let err = serialize(&sample_nodes(), "nodes", &missing).unwrap_err();

        assert_eq!(err.path(), missing.join("nodes.json").as_path());
        assert!(!missing.join("nodes.json").exists());
    }
}
