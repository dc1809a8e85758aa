use super::{ContentExtractor, ExtractContext};
use crate::error::Result;
use crate::file_types::ExtractorKind;
use crate::results::{MatchKind, SearchMatch};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;

/// Bytes shown on each side of a match in the dump line
pub const HEX_WINDOW: usize = 16;

/// Raw-byte matching reported as offsets plus a hex dump of the surroundings
pub struct BinaryHexExtractor;

impl ContentExtractor for BinaryHexExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::BinaryHex
    }

    fn extract(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<Vec<SearchMatch>> {
        if !ctx.within_size_limit(path)? {
            return Ok(Vec::new());
        }

        let bytes = fs::read(path)?;
        let file_path = path.to_string_lossy();

        Ok(ctx
            .matcher
            .find_byte_spans(&bytes)
            .into_iter()
            .map(|(start, end)| dump_match(&file_path, &bytes, start, end))
            .collect())
    }
}

/// Builds the `OFFSET: hh hh ..` record for the match at `start..end`
pub fn dump_match(file_path: &str, bytes: &[u8], start: usize, end: usize) -> SearchMatch {
    let window_start = start.saturating_sub(HEX_WINDOW);
    let window_end = (end + HEX_WINDOW).min(bytes.len());

    let mut line = format!("{window_start:08X}:");
    let mut match_start = 0;
    let mut match_end = 0;

    for (offset, byte) in bytes[window_start..window_end].iter().enumerate() {
        let absolute = window_start + offset;
        line.push(' ');
        if absolute == start {
            match_start = line.len();
        }
        let _ = write!(line, "{byte:02X}");
        if absolute + 1 == end {
            match_end = line.len();
        }
    }

    // Zero-width matches point at the gap before the next byte
    if end <= start {
        if start >= window_end {
            match_start = line.len();
        }
        match_end = match_start;
    }

    SearchMatch {
        file_path: file_path.to_string(),
        line_number: start,
        line_content: line,
        match_start,
        match_end,
        context_before: Vec::new(),
        context_after: Vec::new(),
        kind: MatchKind::ByteOffset,
    }
}
