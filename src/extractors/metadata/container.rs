use super::screenplay::title_page;
use super::{open_zip, read_member, xml_leaves, MetadataMap};
use crate::error::Result;
use crate::text::{decode_lenient, looks_binary};
use std::io::Read;
use std::path::Path;
use xml::reader::{EventReader, XmlEvent};

/// Member names listed before the listing is cut off
const LISTED_FILES: usize = 20;
/// Bytes of the first text member read for `Preview`
const PREVIEW_BYTES: u64 = 1024;

const TEXT_MEMBER_EXTENSIONS: &[&str] = &[".txt", ".md", ".markdown", ".fountain", ".csv", ".json", ".xml", ".html"];

pub fn zip_listing(path: &Path) -> Result<MetadataMap> {
    let mut archive = open_zip(path)?;
    let mut entries = MetadataMap::new();

    let mut files = Vec::new();
    let mut total_size = 0u64;
    let mut preview_member = None;
    for i in 0..archive.len() {
        let member = archive.by_index(i)?;
        if member.is_dir() {
            continue;
        }
        total_size += member.size();
        let name = member.name().to_string();
        if preview_member.is_none() && is_text_member(&name) {
            preview_member = Some(i);
        }
        files.push(name);
    }

    entries.insert("Archive_Entries", archive.len().to_string());
    entries.insert_non_empty("Archive_Files", listing(&files));
    entries.insert("Uncompressed_Size", total_size.to_string());
    entries.insert_non_empty("Comment", decode_lenient(archive.comment()));

    if let Some(index) = preview_member {
        let mut bytes = Vec::new();
        archive
            .by_index(index)?
            .take(PREVIEW_BYTES)
            .read_to_end(&mut bytes)?;
        if !looks_binary(&bytes) {
            entries.insert_non_empty("Preview", decode_lenient(&bytes));
        }
    }

    Ok(entries)
}

/// Dublin-Core metadata from the package document named by `META-INF/container.xml`
pub fn epub(path: &Path) -> Result<MetadataMap> {
    let mut archive = open_zip(path)?;
    let Some(container) = read_member(&mut archive, "META-INF/container.xml")? else {
        return Ok(MetadataMap::new());
    };
    let Some(opf_path) = rootfile_path(&container)? else {
        return Ok(MetadataMap::new());
    };
    let Some(opf) = read_member(&mut archive, &opf_path)? else {
        return Ok(MetadataMap::new());
    };

    let mut entries = MetadataMap::new();
    for leaf in xml_leaves(&opf)? {
        if leaf.prefix.as_deref() != Some("dc") {
            continue;
        }
        let key = capitalize(&leaf.local_name);
        // repeated elements (several creators) accumulate
        let value = match entries.get(&key) {
            Some(existing) => format!("{existing}; {}", leaf.text),
            None => leaf.text,
        };
        entries.insert(key, value);
    }
    Ok(entries)
}

/// Zip-wrapped screenplay project: title page of the embedded text plus the member list
pub fn highland(path: &Path) -> Result<MetadataMap> {
    let mut archive = open_zip(path)?;
    let names: Vec<String> = archive.file_names().map(str::to_string).collect();

    let mut entries = MetadataMap::new();
    let script = names
        .iter()
        .find(|n| n.ends_with(".fountain") || n.ends_with(".markdown") || n.ends_with(".md"))
        .cloned();
    if let Some(script) = script {
        if let Some(text) = read_member(&mut archive, &script)? {
            entries.extend(title_page(&text));
        }
    }
    entries.insert_non_empty("Archive_Files", listing(&names));
    Ok(entries)
}

fn rootfile_path(container: &str) -> Result<Option<String>> {
    for event in EventReader::from_str(container) {
        if let XmlEvent::StartElement {
            name, attributes, ..
        } = event?
        {
            if name.local_name == "rootfile" {
                return Ok(attributes
                    .into_iter()
                    .find(|a| a.name.local_name == "full-path")
                    .map(|a| a.value));
            }
        }
    }
    Ok(None)
}

fn is_text_member(name: &str) -> bool {
    let lower = name.to_ascii_lowercase();
    TEXT_MEMBER_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

fn listing(names: &[String]) -> String {
    let mut list = names
        .iter()
        .take(LISTED_FILES)
        .cloned()
        .collect::<Vec<_>>()
        .join(", ");
    if names.len() > LISTED_FILES {
        list.push_str(&format!(" (+{} more)", names.len() - LISTED_FILES));
    }
    list
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, members: &[(&str, &str)], comment: &str) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in members {
            zip.start_file(*name, SimpleFileOptions::default()).unwrap();
            zip.write_all(data.as_bytes()).unwrap();
        }
        zip.set_comment(comment);
        zip.finish().unwrap();
    }

    #[test]
    fn test_zip_listing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bundle.zip");
        write_zip(
            &path,
            &[("logo.bin", "\u{0}\u{1}"), ("docs/readme.txt", "release notes for v2")],
            "nightly build",
        );

        let entries = zip_listing(&path).unwrap();
        assert_eq!(entries.get("Archive_Entries"), Some("2"));
        assert_eq!(entries.get("Archive_Files"), Some("logo.bin, docs/readme.txt"));
        assert_eq!(entries.get("Uncompressed_Size"), Some("22"));
        assert_eq!(entries.get("Comment"), Some("nightly build"));
        assert_eq!(entries.get("Preview"), Some("release notes for v2"));
    }

    #[test]
    fn test_epub_dublin_core() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("novel.epub");
        write_zip(
            &path,
            &[
                ("mimetype", "application/epub+zip"),
                (
                    "META-INF/container.xml",
                    r#"<container xmlns="urn:oasis:names:tc:opendocument:xmlns:container"><rootfiles><rootfile full-path="OEBPS/content.opf" media-type="application/oebps-package+xml"/></rootfiles></container>"#,
                ),
                (
                    "OEBPS/content.opf",
                    r#"<package xmlns="http://www.idpf.org/2007/opf"><metadata xmlns:dc="http://purl.org/dc/elements/1.1/">
  <dc:title>The Long Voyage</dc:title>
  <dc:creator>A. Writer</dc:creator>
  <dc:creator>B. Editor</dc:creator>
  <dc:language>en</dc:language>
</metadata></package>"#,
                ),
            ],
            "",
        );

        let entries = epub(&path).unwrap();
        assert_eq!(entries.get("Title"), Some("The Long Voyage"));
        assert_eq!(entries.get("Creator"), Some("A. Writer; B. Editor"));
        assert_eq!(entries.get("Language"), Some("en"));
    }

    #[test]
    fn test_highland_title_page() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("draft.highland");
        write_zip(
            &path,
            &[(
                "draft.textbundle/text.markdown",
                "Title: Night Shift\nAuthor: Dana Park\n\nINT. DINER - NIGHT\n",
            )],
            "",
        );

        let entries = highland(&path).unwrap();
        assert_eq!(entries.get("Title"), Some("Night Shift"));
        assert_eq!(entries.get("Author"), Some("Dana Park"));
        assert!(entries.get("Archive_Files").unwrap().contains("text.markdown"));
    }

    #[test]
    fn test_listing_is_capped() {
        let names: Vec<String> = (0..25).map(|i| format!("f{i}")).collect();
        let list = listing(&names);
        assert!(list.ends_with("(+5 more)"));
        assert!(list.starts_with("f0, f1"));
    }
}
