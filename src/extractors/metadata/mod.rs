//! Document, archive, database and media properties as searchable entries.
//!
//! Each sub-extractor handles a family of extensions and declares the
//! [`Capability`] it needs. A missing capability yields an empty map for that
//! file instead of an error.
mod container;
mod office;
mod rtf;
mod screenplay;
mod structured;

#[cfg(feature = "media")]
mod media;
#[cfg(feature = "pdf")]
mod pdf;
#[cfg(feature = "sqlite")]
mod sqlite;

use super::{match_entries, ContentExtractor, ExtractContext, MetadataMap};
use crate::capability::Capability;
use crate::error::Result;
use crate::file_types::{extension_of, ExtractorKind};
use crate::results::SearchMatch;
use crate::text::truncate_value;
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xml::reader::{EventReader, XmlEvent};
use zip::ZipArchive;

/// Cap applied to every value before it becomes a searchable entry
pub const MAX_VALUE_CHARS: usize = 200;

type ExtractFn = fn(&Path) -> Result<MetadataMap>;

struct SubExtractor {
    extensions: &'static [&'static str],
    capability: Capability,
    extract: ExtractFn,
}

static SUB_EXTRACTORS: &[SubExtractor] = &[
    SubExtractor {
        extensions: &["pdf"],
        capability: Capability::Pdf,
        extract: pdf_entries,
    },
    SubExtractor {
        extensions: &["docx"],
        capability: Capability::ZipContainer,
        extract: office::docx,
    },
    SubExtractor {
        extensions: &["xlsx"],
        capability: Capability::ZipContainer,
        extract: office::xlsx,
    },
    SubExtractor {
        extensions: &["pptx"],
        capability: Capability::ZipContainer,
        extract: office::pptx,
    },
    SubExtractor {
        extensions: &["odt", "ods", "odp"],
        capability: Capability::ZipContainer,
        extract: office::open_document,
    },
    SubExtractor {
        extensions: &["fdx"],
        capability: Capability::Xml,
        extract: screenplay::final_draft,
    },
    SubExtractor {
        extensions: &["fountain"],
        capability: Capability::Builtin,
        extract: screenplay::fountain,
    },
    SubExtractor {
        extensions: &["highland"],
        capability: Capability::ZipContainer,
        extract: container::highland,
    },
    SubExtractor {
        extensions: &["zip"],
        capability: Capability::ZipContainer,
        extract: container::zip_listing,
    },
    SubExtractor {
        extensions: &["epub"],
        capability: Capability::ZipContainer,
        extract: container::epub,
    },
    SubExtractor {
        extensions: &["csv"],
        capability: Capability::Csv,
        extract: structured::csv_summary,
    },
    SubExtractor {
        extensions: &["json"],
        capability: Capability::Builtin,
        extract: structured::json_summary,
    },
    SubExtractor {
        extensions: &["xml"],
        capability: Capability::Xml,
        extract: structured::xml_summary,
    },
    SubExtractor {
        extensions: &["db", "sqlite", "sqlite3"],
        capability: Capability::Sqlite,
        extract: sqlite_entries,
    },
    SubExtractor {
        extensions: &[
            "mp3", "flac", "m4a", "mp4", "ogg", "wav", "aac", "avi", "mkv",
        ],
        capability: Capability::MediaTags,
        extract: media_entries,
    },
    SubExtractor {
        extensions: &["rtf"],
        capability: Capability::Builtin,
        extract: rtf::info_group,
    },
];

/// Every extension some sub-extractor understands
pub fn supported_extensions() -> impl Iterator<Item = &'static str> {
    SUB_EXTRACTORS
        .iter()
        .flat_map(|s| s.extensions.iter().copied())
}

pub struct FileMetadataExtractor {
    by_extension: std::collections::HashMap<&'static str, &'static SubExtractor>,
}

impl FileMetadataExtractor {
    pub fn new() -> Self {
        let by_extension = SUB_EXTRACTORS
            .iter()
            .flat_map(|s| s.extensions.iter().map(move |ext| (*ext, s)))
            .collect();
        Self { by_extension }
    }

    /// Raw entries for `path`, values already truncated
    pub fn read_entries(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<MetadataMap> {
        let ext = extension_of(path);
        let Some(sub) = self.by_extension.get(ext.as_str()) else {
            return Ok(MetadataMap::new());
        };

        if !ctx.capabilities.has(sub.capability) {
            debug!(
                "{} capability unavailable, no metadata for {}",
                sub.capability,
                path.display()
            );
            return Ok(MetadataMap::new());
        }

        let raw = (sub.extract)(path)?;
        let mut entries = MetadataMap::new();
        for (key, value) in raw.iter() {
            entries.insert(key, truncate_value(value, MAX_VALUE_CHARS));
        }
        Ok(entries)
    }
}

impl Default for FileMetadataExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl ContentExtractor for FileMetadataExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::FileMetadata
    }

    fn extract(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<Vec<SearchMatch>> {
        if !ctx.within_size_limit(path)? {
            return Ok(Vec::new());
        }

        let entries = self.read_entries(path, ctx)?;
        Ok(match_entries(&path.to_string_lossy(), &entries, ctx.matcher))
    }
}

#[cfg(feature = "pdf")]
fn pdf_entries(path: &Path) -> Result<MetadataMap> {
    pdf::document_info(path)
}

#[cfg(not(feature = "pdf"))]
fn pdf_entries(_path: &Path) -> Result<MetadataMap> {
    Ok(MetadataMap::new())
}

#[cfg(feature = "sqlite")]
fn sqlite_entries(path: &Path) -> Result<MetadataMap> {
    sqlite::schema_summary(path)
}

#[cfg(not(feature = "sqlite"))]
fn sqlite_entries(_path: &Path) -> Result<MetadataMap> {
    Ok(MetadataMap::new())
}

#[cfg(feature = "media")]
fn media_entries(path: &Path) -> Result<MetadataMap> {
    media::tag_summary(path)
}

#[cfg(not(feature = "media"))]
fn media_entries(_path: &Path) -> Result<MetadataMap> {
    Ok(MetadataMap::new())
}

pub(crate) fn open_zip(path: &Path) -> Result<ZipArchive<File>> {
    Ok(ZipArchive::new(File::open(path)?)?)
}

/// Text of a named member, `None` when the archive lacks it
pub(crate) fn read_member(archive: &mut ZipArchive<File>, name: &str) -> Result<Option<String>> {
    let mut member = match archive.by_name(name) {
        Ok(member) => member,
        Err(zip::result::ZipError::FileNotFound) => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let mut bytes = Vec::new();
    member.read_to_end(&mut bytes)?;
    Ok(Some(crate::text::decode_lenient(&bytes)))
}

/// An element that directly carries character data
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct XmlLeaf {
    pub prefix: Option<String>,
    pub local_name: String,
    pub text: String,
}

/// Collects `(element, text)` pairs in document order, skipping whitespace-only runs
pub(crate) fn xml_leaves(xml: &str) -> Result<Vec<XmlLeaf>> {
    let mut stack: Vec<(Option<String>, String)> = Vec::new();
    let mut leaves = Vec::new();

    for event in EventReader::from_str(xml) {
        match event? {
            XmlEvent::StartElement { name, .. } => stack.push((name.prefix, name.local_name)),
            XmlEvent::EndElement { .. } => {
                stack.pop();
            }
            XmlEvent::Characters(text) | XmlEvent::CData(text) => {
                if let Some((prefix, local_name)) = stack.last() {
                    let text = text.trim();
                    if !text.is_empty() {
                        leaves.push(XmlLeaf {
                            prefix: prefix.clone(),
                            local_name: local_name.clone(),
                            text: text.to_string(),
                        });
                    }
                }
            }
            _ => {}
        }
    }

    Ok(leaves)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::config::SearchConfiguration;
    use crate::matcher::{PatternMatcher, PatternOptions};
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_supported_extensions_cover_every_family() {
        let all: Vec<_> = supported_extensions().collect();
        for ext in ["pdf", "docx", "odp", "fdx", "fountain", "epub", "json", "sqlite3", "mkv", "rtf"] {
            assert!(all.contains(&ext), "missing {ext}");
        }
        assert!(!all.contains(&"txt"));
    }

    #[test]
    fn test_xml_leaves() {
        let xml = r#"<cp:coreProperties xmlns:cp="urn:cp" xmlns:dc="urn:dc">
            <dc:title>Budget</dc:title>
            <dc:creator><![CDATA[Ann]]></dc:creator>
            <empty/>
        </cp:coreProperties>"#;
        let leaves = xml_leaves(xml).unwrap();
        assert_eq!(leaves.len(), 2);
        assert_eq!(leaves[0].prefix.as_deref(), Some("dc"));
        assert_eq!(leaves[0].local_name, "title");
        assert_eq!(leaves[1].text, "Ann");
    }

    #[test]
    fn test_values_are_truncated() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("long.json");
        let keys: Vec<String> = (0..200).map(|i| format!("\"key_number_{i}\": {i}")).collect();
        fs::write(&path, format!("{{{}}}", keys.join(","))).unwrap();

        let config = SearchConfiguration::default();
        let matcher = PatternMatcher::compile("key", PatternOptions::default()).unwrap();
        let caps = Capabilities::detect();
        let ctx = ExtractContext {
            matcher: &matcher,
            config: &config,
            capabilities: &caps,
        };
        let entries = FileMetadataExtractor::new().read_entries(&path, &ctx).unwrap();
        let keys = entries.get("Keys").unwrap();
        assert!(keys.ends_with("..."));
        assert_eq!(keys.chars().count(), MAX_VALUE_CHARS + 3);
    }

    #[test]
    fn test_missing_capability_yields_empty_map() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("table.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let config = SearchConfiguration::default();
        let matcher = PatternMatcher::compile("a", PatternOptions::default()).unwrap();
        let caps = Capabilities::detect().without(Capability::Csv);
        let ctx = ExtractContext {
            matcher: &matcher,
            config: &config,
            capabilities: &caps,
        };
        let extractor = FileMetadataExtractor::new();
        assert!(extractor.read_entries(&path, &ctx).unwrap().is_empty());
        assert!(extractor.extract(&path, &ctx).unwrap().is_empty());
    }
}
