use super::{match_lines, ContentExtractor, ExtractContext};
use crate::error::Result;
use crate::file_types::ExtractorKind;
use crate::results::SearchMatch;
use crate::text::decode_lenient;
use std::fs;
use std::path::Path;

/// Line-by-line matching over the leniently decoded file
pub struct PlainTextExtractor;

impl ContentExtractor for PlainTextExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::PlainText
    }

    fn extract(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<Vec<SearchMatch>> {
        if !ctx.within_size_limit(path)? {
            return Ok(Vec::new());
        }

        let bytes = fs::read(path)?;
        let text = decode_lenient(&bytes);
        Ok(match_lines(
            &path.to_string_lossy(),
            &text,
            ctx.matcher,
            ctx.config.context_lines(),
        ))
    }
}
