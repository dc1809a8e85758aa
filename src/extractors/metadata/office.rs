use super::{open_zip, read_member, xml_leaves, MetadataMap};
use crate::error::Result;
use lazy_static::lazy_static;
use regex::Regex;
use std::path::Path;
use xml::reader::{EventReader, XmlEvent};

lazy_static! {
    static ref SLIDE_MEMBER: Regex = Regex::new(r"^ppt/slides/slide\d+\.xml$").unwrap();
}

/// OOXML `docProps/core.xml` element -> entry key
const CORE_PROPERTIES: &[(&str, &str)] = &[
    ("title", "Title"),
    ("subject", "Subject"),
    ("creator", "Author"),
    ("keywords", "Keywords"),
    ("description", "Comments"),
    ("category", "Category"),
    ("lastModifiedBy", "Last_Modified_By"),
    ("revision", "Revision"),
    ("created", "Created"),
    ("modified", "Modified"),
];

const APP_PROPERTIES: &[(&str, &str)] = &[
    ("Application", "Application"),
    ("Company", "Company"),
    ("Manager", "Manager"),
    ("Pages", "Pages"),
    ("Words", "Words"),
];

/// OpenDocument `office:meta` children
const ODF_PROPERTIES: &[(&str, &str)] = &[
    ("title", "Title"),
    ("subject", "Subject"),
    ("description", "Description"),
    ("initial-creator", "Author"),
    ("creator", "Last_Modified_By"),
    ("keyword", "Keywords"),
    ("creation-date", "Created"),
    ("date", "Modified"),
    ("generator", "Generator"),
    ("editing-cycles", "Revision"),
];

pub fn docx(path: &Path) -> Result<MetadataMap> {
    let mut archive = open_zip(path)?;
    let mut entries = MetadataMap::new();
    if let Some(core) = read_member(&mut archive, "docProps/core.xml")? {
        entries.extend(mapped_leaves(&core, CORE_PROPERTIES)?);
    }
    if let Some(app) = read_member(&mut archive, "docProps/app.xml")? {
        entries.extend(mapped_leaves(&app, APP_PROPERTIES)?);
    }
    Ok(entries)
}

pub fn xlsx(path: &Path) -> Result<MetadataMap> {
    let mut archive = open_zip(path)?;
    let mut entries = MetadataMap::new();
    if let Some(core) = read_member(&mut archive, "docProps/core.xml")? {
        entries.extend(mapped_leaves(&core, CORE_PROPERTIES)?);
    }

    if let Some(workbook) = read_member(&mut archive, "xl/workbook.xml")? {
        let names = sheet_names(&workbook)?;
        entries.insert("Sheets", names.len().to_string());
        entries.insert_non_empty("Sheet_Names", names.join(", "));
    }
    Ok(entries)
}

pub fn pptx(path: &Path) -> Result<MetadataMap> {
    let mut archive = open_zip(path)?;
    let mut entries = MetadataMap::new();
    if let Some(core) = read_member(&mut archive, "docProps/core.xml")? {
        entries.extend(mapped_leaves(&core, CORE_PROPERTIES)?);
    }

    let slides = archive
        .file_names()
        .filter(|name| SLIDE_MEMBER.is_match(name))
        .count();
    entries.insert("Slides", slides.to_string());
    Ok(entries)
}

pub fn open_document(path: &Path) -> Result<MetadataMap> {
    let mut archive = open_zip(path)?;
    let Some(meta) = read_member(&mut archive, "meta.xml")? else {
        return Ok(MetadataMap::new());
    };

    let mut entries = mapped_leaves(&meta, ODF_PROPERTIES)?;

    // meta:document-statistic carries counts as attributes
    for event in EventReader::from_str(&meta) {
        if let XmlEvent::StartElement {
            name, attributes, ..
        } = event?
        {
            if name.local_name == "document-statistic" {
                for attr in attributes {
                    entries.insert(stat_key(&attr.name.local_name), attr.value);
                }
            }
        }
    }
    Ok(entries)
}

fn mapped_leaves(xml: &str, table: &[(&str, &str)]) -> Result<MetadataMap> {
    let mut entries = MetadataMap::new();
    for leaf in xml_leaves(xml)? {
        if let Some((_, key)) = table.iter().find(|(local, _)| *local == leaf.local_name) {
            entries.insert_non_empty(*key, &leaf.text);
        }
    }
    Ok(entries)
}

fn sheet_names(workbook: &str) -> Result<Vec<String>> {
    let mut names = Vec::new();
    for event in EventReader::from_str(workbook) {
        if let XmlEvent::StartElement {
            name, attributes, ..
        } = event?
        {
            if name.local_name == "sheet" {
                if let Some(attr) = attributes.iter().find(|a| a.name.local_name == "name") {
                    names.push(attr.value.clone());
                }
            }
        }
    }
    Ok(names)
}

/// `page-count` -> `Page_Count`
fn stat_key(attribute: &str) -> String {
    attribute
        .split('-')
        .map(|part| {
            let mut chars = part.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join("_")
}
