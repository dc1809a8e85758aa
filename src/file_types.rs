use crate::config::SearchConfiguration;
use crate::extractors::metadata;
use std::collections::HashSet;
use std::fmt;
use std::path::Path;

pub const ARCHIVE_EXTENSIONS: &[&str] = &[
    "zip", "epub", "jar", "war", "cbz", "docx", "xlsx", "pptx", "odt", "ods", "odp", "highland",
];

pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "tiff", "tif", "gif", "bmp", "webp"];

/// The five content-extraction strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    PlainText,
    ImageMetadata,
    FileMetadata,
    ArchiveText,
    BinaryHex,
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExtractorKind::PlainText => write!(f, "plain-text"),
            ExtractorKind::ImageMetadata => write!(f, "image-metadata"),
            ExtractorKind::FileMetadata => write!(f, "file-metadata"),
            ExtractorKind::ArchiveText => write!(f, "archive-text"),
            ExtractorKind::BinaryHex => write!(f, "binary-hex"),
        }
    }
}

/// How a candidate file is handled
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchDecision {
    Extract(ExtractorKind),
    Skip(String),
}

/// Maps (enabled mode, extension) to exactly one extractor per file
pub struct FileTypeClassifier {
    archive: HashSet<String>,
    image: HashSet<String>,
    metadata: HashSet<String>,
}

impl FileTypeClassifier {
    pub fn new() -> Self {
        Self {
            archive: to_set(ARCHIVE_EXTENSIONS.iter().copied()),
            image: to_set(IMAGE_EXTENSIONS.iter().copied()),
            metadata: to_set(metadata::supported_extensions()),
        }
    }

    pub fn decide(&self, path: &Path, config: &SearchConfiguration) -> SearchDecision {
        let ext = extension_of(path);

        // Priority order: the first enabled mode whose set holds the extension wins
        let routes = [
            (config.archive_text, ExtractorKind::ArchiveText, &self.archive),
            (config.image_metadata, ExtractorKind::ImageMetadata, &self.image),
            (config.file_metadata, ExtractorKind::FileMetadata, &self.metadata),
        ];
        for (enabled, kind, extensions) in routes {
            if enabled && extensions.contains(&ext) {
                return SearchDecision::Extract(kind);
            }
        }

        if config.metadata_only() {
            return SearchDecision::Skip(format!("No metadata extractor for .{ext}"));
        }

        if config.binary_hex {
            SearchDecision::Extract(ExtractorKind::BinaryHex)
        } else {
            SearchDecision::Extract(ExtractorKind::PlainText)
        }
    }

    pub fn is_archive(&self, ext: &str) -> bool {
        self.archive.contains(ext)
    }

    pub fn is_image(&self, ext: &str) -> bool {
        self.image.contains(ext)
    }

    pub fn is_metadata_document(&self, ext: &str) -> bool {
        self.metadata.contains(ext)
    }
}

impl Default for FileTypeClassifier {
    fn default() -> Self {
        Self::new()
    }
}

/// Lowercased extension without the dot, empty when absent
pub fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_ascii_lowercase())
        .unwrap_or_default()
}

fn to_set<'a>(items: impl IntoIterator<Item = &'a str>) -> HashSet<String> {
    items.into_iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decide(path: &str, configure: impl FnOnce(&mut SearchConfiguration)) -> SearchDecision {
        let mut config = SearchConfiguration::default();
        configure(&mut config);
        FileTypeClassifier::new().decide(Path::new(path), &config)
    }

    #[test]
    fn test_plain_text_by_default() {
        assert_eq!(
            decide("notes.txt", |_| {}),
            SearchDecision::Extract(ExtractorKind::PlainText)
        );
        assert_eq!(
            decide("photo.JPG", |_| {}),
            SearchDecision::Extract(ExtractorKind::PlainText)
        );
    }

    #[test]
    fn test_archive_mode_wins_over_metadata() {
        let decision = decide("book.epub", |c| {
            c.archive_text = true;
            c.file_metadata = true;
        });
        assert_eq!(decision, SearchDecision::Extract(ExtractorKind::ArchiveText));
    }

    #[test]
    fn test_image_and_file_metadata_routes() {
        assert_eq!(
            decide("shot.PNG", |c| c.image_metadata = true),
            SearchDecision::Extract(ExtractorKind::ImageMetadata)
        );
        assert_eq!(
            decide("report.pdf", |c| c.file_metadata = true),
            SearchDecision::Extract(ExtractorKind::FileMetadata)
        );
    }

    #[test]
    fn test_metadata_modes_are_exclusive() {
        match decide("notes.txt", |c| c.file_metadata = true) {
            SearchDecision::Skip(reason) => assert!(reason.contains(".txt")),
            other => panic!("Expected Skip, got {other:?}"),
        }
        assert!(matches!(
            decide("report.pdf", |c| c.image_metadata = true),
            SearchDecision::Skip(_)
        ));
        // binary mode does not override metadata exclusivity
        assert!(matches!(
            decide("firmware.img", |c| {
                c.image_metadata = true;
                c.binary_hex = true;
            }),
            SearchDecision::Skip(_)
        ));
    }

    #[test]
    fn test_binary_mode_fallback() {
        assert_eq!(
            decide("firmware.img", |c| c.binary_hex = true),
            SearchDecision::Extract(ExtractorKind::BinaryHex)
        );
        assert_eq!(
            decide("bundle.zip", |c| {
                c.archive_text = true;
                c.binary_hex = true;
            }),
            SearchDecision::Extract(ExtractorKind::ArchiveText)
        );
    }

    #[test]
    fn test_extension_sets() {
        let classifier = FileTypeClassifier::new();
        assert!(classifier.is_archive("zip"));
        assert!(classifier.is_image("webp"));
        assert!(classifier.is_metadata_document("pdf"));
        assert!(classifier.is_metadata_document("sqlite"));
        assert!(!classifier.is_metadata_document("txt"));
        assert_eq!(extension_of(Path::new("a/B.TIFF")), "tiff");
        assert_eq!(extension_of(Path::new("Makefile")), "");
    }
}
