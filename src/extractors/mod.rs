//! Content extractors and the per-file dispatcher
pub mod archive_text;
pub mod binary_hex;
pub mod image_meta;
pub mod metadata;
pub mod plain_text;

use crate::capability::Capabilities;
use crate::config::SearchConfiguration;
use crate::error::{MetagrepError, Result};
use crate::file_types::{ExtractorKind, FileTypeClassifier, SearchDecision};
use crate::matcher::PatternMatcher;
use crate::results::{MatchKind, SearchMatch};
use crate::text::{char_offset, context_window, split_lines};
use log::debug;
use std::collections::HashMap;
use std::path::Path;

pub use archive_text::ArchiveTextExtractor;
pub use binary_hex::BinaryHexExtractor;
pub use image_meta::ImageMetadataExtractor;
pub use metadata::FileMetadataExtractor;
pub use plain_text::PlainTextExtractor;

/// Everything an extractor needs besides the path
pub struct ExtractContext<'a> {
    pub matcher: &'a PatternMatcher,
    pub config: &'a SearchConfiguration,
    pub capabilities: &'a Capabilities,
}

impl ExtractContext<'_> {
    /// `false` when the file exceeds the configured per-file ceiling
    pub fn within_size_limit(&self, path: &Path) -> Result<bool> {
        let size = path.metadata()?.len();
        if size > self.config.max_file_size {
            let skipped = MetagrepError::FileTooLarge {
                path: path.to_path_buf(),
                size,
            };
            debug!("Skipping ({} byte limit): {skipped}", self.config.max_file_size);
            return Ok(false);
        }
        Ok(true)
    }
}

/// One content-extraction strategy
pub trait ContentExtractor: Send + Sync {
    fn kind(&self) -> ExtractorKind;
    fn extract(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<Vec<SearchMatch>>;
}

/// Result of handing one file to the dispatcher
#[derive(Debug)]
pub enum DispatchOutcome {
    Extracted(Vec<SearchMatch>),
    Skipped(String),
    Failed(MetagrepError),
}

/// Chooses exactly one extractor per file and contains its failures
pub struct Dispatcher {
    classifier: FileTypeClassifier,
    extractors: HashMap<ExtractorKind, Box<dyn ContentExtractor>>,
}

impl Dispatcher {
    pub fn new() -> Self {
        let mut dispatcher = Self {
            classifier: FileTypeClassifier::new(),
            extractors: HashMap::new(),
        };

        dispatcher.register(Box::new(PlainTextExtractor));
        dispatcher.register(Box::new(ImageMetadataExtractor));
        dispatcher.register(Box::new(FileMetadataExtractor::new()));
        dispatcher.register(Box::new(ArchiveTextExtractor));
        dispatcher.register(Box::new(BinaryHexExtractor));

        dispatcher
    }

    /// Replaces the extractor registered for the same kind
    pub fn register(&mut self, extractor: Box<dyn ContentExtractor>) {
        self.extractors.insert(extractor.kind(), extractor);
    }

    pub fn dispatch(&self, path: &Path, ctx: &ExtractContext<'_>) -> DispatchOutcome {
        let kind = match self.classifier.decide(path, ctx.config) {
            SearchDecision::Extract(kind) => kind,
            SearchDecision::Skip(reason) => {
                debug!("Skipping {}: {reason}", path.display());
                return DispatchOutcome::Skipped(reason);
            }
        };

        let Some(extractor) = self.extractors.get(&kind) else {
            return DispatchOutcome::Skipped(format!("No {kind} extractor registered"));
        };

        debug!("Extracting {} with {kind}", path.display());
        match extractor.extract(path, ctx) {
            Ok(matches) => DispatchOutcome::Extracted(matches),
            Err(e) => {
                debug!("{kind} extraction failed for {}: {e}", path.display());
                DispatchOutcome::Failed(e)
            }
        }
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Ordered `Key: Value` entries standing in for lines in metadata modes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataMap {
    entries: Vec<(String, String)>,
}

impl MetadataMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Overwrites in place when `key` already exists, keeping its position
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Skips empty values
    pub fn insert_non_empty(&mut self, key: impl Into<String>, value: impl AsRef<str>) {
        let value = value.as_ref().trim();
        if !value.is_empty() {
            self.insert(key, value);
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn extend(&mut self, other: MetadataMap) {
        for (k, v) in other.entries {
            self.insert(k, v);
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Runs the matcher over each line of `text`, attaching context windows
pub fn match_lines(
    file_path: &str,
    text: &str,
    matcher: &PatternMatcher,
    context_lines: usize,
) -> Vec<SearchMatch> {
    let lines = split_lines(text);
    let mut matches = Vec::new();

    for (i, line) in lines.iter().enumerate() {
        for (start, end) in matcher.find_spans(line) {
            let (before, after) = context_window(i, lines.len(), context_lines);
            matches.push(SearchMatch {
                file_path: file_path.to_string(),
                line_number: i + 1,
                line_content: line.to_string(),
                match_start: char_offset(line, start),
                match_end: char_offset(line, end),
                context_before: lines[before].iter().map(|l| l.to_string()).collect(),
                context_after: lines[after].iter().map(|l| l.to_string()).collect(),
                kind: MatchKind::TextLine,
            });
        }
    }

    matches
}

/// Searches each `Key: Value` entry as a context-free synthetic line
pub fn match_entries(
    file_path: &str,
    entries: &MetadataMap,
    matcher: &PatternMatcher,
) -> Vec<SearchMatch> {
    let mut matches = Vec::new();

    for (i, (key, value)) in entries.iter().enumerate() {
        let line = format!("{key}: {value}");
        for (start, end) in matcher.find_spans(&line) {
            matches.push(SearchMatch {
                file_path: file_path.to_string(),
                line_number: i + 1,
                line_content: line.clone(),
                match_start: char_offset(&line, start),
                match_end: char_offset(&line, end),
                context_before: Vec::new(),
                context_after: Vec::new(),
                kind: MatchKind::MetadataEntry,
            });
        }
    }

    matches
}
