use serde::Serialize;
use std::fmt;
use std::time::Duration;

/// What the `line_number` and offsets of a [`SearchMatch`] refer to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    /// 1-based text line; offsets are char positions in `line_content`
    TextLine,
    /// 1-based position of a synthetic `Key: Value` entry; char offsets
    MetadataEntry,
    /// Absolute byte offset of the match; offsets delimit the matched bytes'
    /// hex text inside the dump line
    ByteOffset,
}

/// One match, in the single record shape shared by every content mode
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchMatch {
    pub file_path: String,
    pub line_number: usize,
    pub line_content: String,
    pub match_start: usize,
    pub match_end: usize,
    pub context_before: Vec<String>,
    pub context_after: Vec<String>,
    pub kind: MatchKind,
}

impl SearchMatch {
    /// The matched slice of `line_content`
    pub fn matched_text(&self) -> String {
        self.line_content
            .chars()
            .skip(self.match_start)
            .take(self.match_end.saturating_sub(self.match_start))
            .collect()
    }

    /// Splits `line_content` into (before, matched, after) for highlighting
    pub fn split_line(&self) -> (String, String, String) {
        let chars: Vec<char> = self.line_content.chars().collect();
        let start = self.match_start.min(chars.len());
        let end = self.match_end.clamp(start, chars.len());
        (
            chars[..start].iter().collect(),
            chars[start..end].iter().collect(),
            chars[end..].iter().collect(),
        )
    }
}

impl fmt::Display for SearchMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            MatchKind::ByteOffset => write!(
                f,
                "{}@0x{:X}: {}",
                self.file_path, self.line_number, self.line_content
            ),
            _ => write!(
                f,
                "{}:{}: {}",
                self.file_path, self.line_number, self.line_content
            ),
        }
    }
}

/// Counters collected while a search runs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchStats {
    pub files_scanned: usize,
    pub files_skipped: usize,
    pub dirs_skipped: usize,
    pub bytes_scanned: u64,
    pub extractor_failures: usize,
    #[serde(skip)]
    pub duration: Duration,
}

/// Matches plus the diagnostics the plain `search` call leaves out
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchReport {
    pub matches: Vec<SearchMatch>,
    pub stats: SearchStats,
    pub cancelled: bool,
    pub limit_reached: bool,
    /// Configuration-level failure (bad pattern, unreachable root)
    pub problem: Option<String>,
}
