use super::MetadataMap;
use crate::error::Result;
use serde_json::Value;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use xml::reader::{EventReader, XmlEvent};

/// Object keys listed in the `Keys` entry
const LISTED_KEYS: usize = 20;

pub fn csv_summary(path: &Path) -> Result<MetadataMap> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)?;

    let headers = reader.headers()?.clone();
    let mut rows = 0usize;
    for record in reader.records() {
        record?;
        rows += 1;
    }

    let mut entries = MetadataMap::new();
    entries.insert("Columns", headers.len().to_string());
    entries.insert_non_empty(
        "Column_Names",
        headers.iter().collect::<Vec<_>>().join(", "),
    );
    entries.insert("Rows", rows.to_string());
    Ok(entries)
}

pub fn json_summary(path: &Path) -> Result<MetadataMap> {
    let value: Value = serde_json::from_reader(BufReader::new(File::open(path)?))?;

    let mut entries = MetadataMap::new();
    entries.insert("Type", json_type(&value));
    match &value {
        Value::Object(map) => {
            let keys: Vec<&str> = map.keys().take(LISTED_KEYS).map(String::as_str).collect();
            entries.insert_non_empty("Keys", keys.join(", "));
            entries.insert("Key_Count", map.len().to_string());
        }
        Value::Array(items) => entries.insert("Items", items.len().to_string()),
        scalar => entries.insert("Value", scalar.to_string()),
    }
    Ok(entries)
}

pub fn xml_summary(path: &Path) -> Result<MetadataMap> {
    let reader = EventReader::new(BufReader::new(File::open(path)?));
    let mut entries = MetadataMap::new();
    let mut depth = 0usize;
    let mut children = 0usize;

    for event in reader {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => {
                depth += 1;
                if depth == 1 {
                    entries.insert("Root_Tag", name.local_name);
                    if let Some(ns) = name.namespace {
                        entries.insert_non_empty("Namespace", ns);
                    }
                    let attrs: Vec<String> = attributes
                        .iter()
                        .map(|a| format!("{}={}", a.name.local_name, a.value))
                        .collect();
                    entries.insert_non_empty("Attributes", attrs.join(", "));
                } else if depth == 2 {
                    children += 1;
                }
            }
            XmlEvent::EndElement { .. } => depth = depth.saturating_sub(1),
            _ => {}
        }
    }

    if entries.contains_key("Root_Tag") {
        entries.insert("Child_Elements", children.to_string());
    }
    Ok(entries)
}

fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Object(_) => "object",
        Value::Array(_) => "array",
        Value::String(_) => "string",
        Value::Number(_) => "number",
        Value::Bool(_) => "boolean",
        Value::Null => "null",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MetagrepError;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_csv_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("people.csv");
        fs::write(&path, "name,email,city\nAda,ada@example.com,London\nAlan,alan@example.com\n").unwrap();

        let entries = csv_summary(&path).unwrap();
        assert_eq!(entries.get("Columns"), Some("3"));
        assert_eq!(entries.get("Column_Names"), Some("name, email, city"));
        assert_eq!(entries.get("Rows"), Some("2"));
    }

    #[test]
    fn test_json_object_and_array() {
        let dir = tempdir().unwrap();
        let object = dir.path().join("package.json");
        fs::write(&object, r#"{"name": "demo", "version": "1.0.0"}"#).unwrap();
        let entries = json_summary(&object).unwrap();
        assert_eq!(entries.get("Type"), Some("object"));
        assert_eq!(entries.get("Keys"), Some("name, version"));
        assert_eq!(entries.get("Key_Count"), Some("2"));

        let array = dir.path().join("list.json");
        fs::write(&array, "[1, 2, 3]").unwrap();
        let entries = json_summary(&array).unwrap();
        assert_eq!(entries.get("Type"), Some("array"));
        assert_eq!(entries.get("Items"), Some("3"));
    }

    #[test]
    fn test_invalid_json_is_an_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(json_summary(&path), Err(MetagrepError::Json(_))));
    }

    #[test]
    fn test_xml_summary() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("feed.xml");
        fs::write(
            &path,
            r#"<?xml version="1.0"?>
<rss xmlns="http://example.com/ns" version="2.0">
  <channel><title>News</title></channel>
  <channel><title>Sports</title></channel>
</rss>"#,
        )
        .unwrap();

        let entries = xml_summary(&path).unwrap();
        assert_eq!(entries.get("Root_Tag"), Some("rss"));
        assert_eq!(entries.get("Namespace"), Some("http://example.com/ns"));
        assert_eq!(entries.get("Attributes"), Some("version=2.0"));
        assert_eq!(entries.get("Child_Elements"), Some("2"));
    }
}
