use super::MetadataMap;
use crate::error::Result;
use crate::text::decode_lenient;
use lazy_static::lazy_static;
use regex::Regex;
use std::collections::BTreeSet;
use std::fs::{self, File};
use std::io::BufReader;
use std::path::Path;
use xml::reader::{EventReader, XmlEvent};

lazy_static! {
    static ref TITLE_KEY: Regex = Regex::new(r"^([A-Za-z][A-Za-z0-9 _-]*):\s*(.*)$").unwrap();
}

pub fn fountain(path: &Path) -> Result<MetadataMap> {
    Ok(title_page(&decode_lenient(&fs::read(path)?)))
}

/// Leading `Key: Value` block of a Fountain-style script. Indented lines
/// continue the previous value; the first blank line ends the block.
pub fn title_page(text: &str) -> MetadataMap {
    let mut entries = MetadataMap::new();
    let mut current: Option<(String, String)> = None;

    for line in text.trim_start_matches('\u{feff}').lines() {
        if line.trim().is_empty() {
            break;
        }

        let indented = line.starts_with("   ") || line.starts_with('\t');
        if indented {
            match current.as_mut() {
                Some((_, value)) => {
                    if !value.is_empty() {
                        value.push_str(" / ");
                    }
                    value.push_str(line.trim());
                    continue;
                }
                None => break,
            }
        }

        let Some(caps) = TITLE_KEY.captures(line) else {
            break;
        };
        if let Some((key, value)) = current.take() {
            entries.insert_non_empty(key, value);
        }
        current = Some((caps[1].trim().to_string(), caps[2].trim().to_string()));
    }

    if let Some((key, value)) = current {
        entries.insert_non_empty(key, value);
    }
    entries
}

/// Final Draft `.fdx`: document attributes, title page text, scene and character summary
pub fn final_draft(path: &Path) -> Result<MetadataMap> {
    let reader = EventReader::new(BufReader::new(File::open(path)?));
    let mut entries = MetadataMap::new();

    let mut in_title_page = false;
    let mut paragraph_type: Option<String> = None;
    let mut paragraph_text = String::new();
    let mut title_lines = Vec::new();
    let mut scenes = 0usize;
    let mut characters = BTreeSet::new();

    for event in reader {
        match event? {
            XmlEvent::StartElement {
                name, attributes, ..
            } => match name.local_name.as_str() {
                "FinalDraft" => {
                    for attr in attributes {
                        entries.insert_non_empty(attr.name.local_name, attr.value);
                    }
                }
                "TitlePage" => in_title_page = true,
                "Paragraph" => {
                    paragraph_type = attributes
                        .into_iter()
                        .find(|a| a.name.local_name == "Type")
                        .map(|a| a.value);
                    paragraph_text.clear();
                }
                _ => {}
            },
            XmlEvent::Characters(text) | XmlEvent::CData(text) => paragraph_text.push_str(&text),
            XmlEvent::EndElement { name } => match name.local_name.as_str() {
                "TitlePage" => in_title_page = false,
                "Paragraph" => {
                    let text = paragraph_text.trim();
                    if in_title_page {
                        if !text.is_empty() {
                            title_lines.push(text.to_string());
                        }
                    } else {
                        match paragraph_type.as_deref() {
                            Some("Scene Heading") => scenes += 1,
                            Some("Character") if !text.is_empty() => {
                                characters.insert(character_name(text));
                            }
                            _ => {}
                        }
                    }
                    paragraph_type = None;
                    paragraph_text.clear();
                }
                _ => {}
            },
            _ => {}
        }
    }

    entries.insert_non_empty("Title_Page", title_lines.join(" / "));
    entries.insert("Scenes", scenes.to_string());
    entries.insert_non_empty(
        "Characters",
        characters.into_iter().collect::<Vec<_>>().join(", "),
    );
    Ok(entries)
}

/// Drops extensions such as `(V.O.)` or `(CONT'D)`
fn character_name(cue: &str) -> String {
    match cue.find('(') {
        Some(idx) => cue[..idx].trim().to_string(),
        None => cue.to_string(),
    }
}
