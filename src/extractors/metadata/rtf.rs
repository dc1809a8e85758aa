use super::MetadataMap;
use crate::error::Result;
use crate::text::decode_lenient;
use lazy_static::lazy_static;
use regex::Regex;
use std::fs;
use std::path::Path;

lazy_static! {
    static ref INFO_FIELD: Regex =
        Regex::new(r"\{\\(title|subject|author|operator|keywords|doccomm|company)\s+([^}]*)\}")
            .unwrap();
}

/// Fields of the `{\info ...}` group
pub fn info_group(path: &Path) -> Result<MetadataMap> {
    let text = decode_lenient(&fs::read(path)?);
    let mut entries = MetadataMap::new();

    for caps in INFO_FIELD.captures_iter(&text) {
        let key = match &caps[1] {
            "title" => "Title",
            "subject" => "Subject",
            "author" => "Author",
            "operator" => "Operator",
            "keywords" => "Keywords",
            "doccomm" => "Comment",
            "company" => "Company",
            _ => continue,
        };
        if !entries.contains_key(key) {
            entries.insert_non_empty(key, &caps[2]);
        }
    }
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_info_group_fields() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("letter.rtf");
        fs::write(
            &path,
            r"{\rtf1\ansi{\info{\title Offer Letter}{\author Pat Quinn}{\doccomm draft two}}\pard Hello\par}",
        )
        .unwrap();

        let entries = info_group(&path).unwrap();
        assert_eq!(entries.get("Title"), Some("Offer Letter"));
        assert_eq!(entries.get("Author"), Some("Pat Quinn"));
        assert_eq!(entries.get("Comment"), Some("draft two"));
        assert!(!entries.contains_key("Subject"));
    }
}
