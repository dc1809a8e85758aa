use super::MetadataMap;
use crate::error::Result;
use lopdf::{Document, Object};
use std::path::Path;

/// Document-information dictionary plus page count
pub fn document_info(path: &Path) -> Result<MetadataMap> {
    let doc = Document::load(path)?;
    let mut entries = MetadataMap::new();

    if let Ok(info) = doc.trailer.get(b"Info") {
        let info = match info {
            Object::Reference(id) => doc.get_object(*id)?,
            other => other,
        };
        if let Ok(dict) = info.as_dict() {
            for (key, value) in dict.iter() {
                let value = match value {
                    Object::Reference(id) => doc.get_object(*id)?,
                    other => other,
                };
                if let Some(text) = render(value) {
                    entries.insert_non_empty(String::from_utf8_lossy(key), text);
                }
            }
        }
    }

    entries.insert("Pages", doc.get_pages().len().to_string());
    Ok(entries)
}

fn render(value: &Object) -> Option<String> {
    match value {
        Object::String(bytes, _) => Some(decode_pdf_string(bytes)),
        Object::Name(name) => Some(String::from_utf8_lossy(name).into_owned()),
        Object::Integer(n) => Some(n.to_string()),
        Object::Real(n) => Some(n.to_string()),
        Object::Boolean(b) => Some(b.to_string()),
        _ => None,
    }
}

/// UTF-16BE when BOM-prefixed, otherwise PDFDocEncoding read as Latin-1
fn decode_pdf_string(bytes: &[u8]) -> String {
    if let Some(body) = bytes.strip_prefix(&[0xFE, 0xFF]) {
        let units: Vec<u16> = body
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .collect();
        return String::from_utf16_lossy(&units);
    }
    bytes.iter().map(|&b| b as char).collect()
}
