//! Pattern compilation: user string + mode flags into an executable matcher
use crate::error::Result;
use regex::RegexBuilder;
use regex::bytes::RegexBuilder as BytesRegexBuilder;

/// Flags that shape how a raw pattern string is interpreted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PatternOptions {
    pub regex: bool,
    pub whole_word: bool,
    pub case_sensitive: bool,
}

/// A compiled pattern. Text extractors use the `str` form; the binary-hex
/// extractor runs the byte form over raw file contents so reported offsets are
/// exact byte positions.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    text: regex::Regex,
    bytes: regex::bytes::Regex,
}

impl PatternMatcher {
    pub fn compile(pattern: &str, options: PatternOptions) -> Result<Self> {
        let source = build_source(pattern, options);
        let text = RegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .build()?;
        let bytes = BytesRegexBuilder::new(&source)
            .case_insensitive(!options.case_sensitive)
            .build()?;
        Ok(Self { text, bytes })
    }

    /// Left-to-right, non-overlapping `(start, end)` byte spans in `text`
    pub fn find_spans(&self, text: &str) -> Vec<(usize, usize)> {
        self.text.find_iter(text).map(|m| (m.start(), m.end())).collect()
    }

    pub fn find_byte_spans(&self, haystack: &[u8]) -> Vec<(usize, usize)> {
        self.bytes
            .find_iter(haystack)
            .map(|m| (m.start(), m.end()))
            .collect()
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.text.is_match(text)
    }

    pub fn as_str(&self) -> &str {
        self.text.as_str()
    }
}

fn build_source(pattern: &str, options: PatternOptions) -> String {
    if options.regex {
        pattern.to_string()
    } else if options.whole_word {
        format!(r"\b{}\b", regex::escape(pattern))
    } else {
        regex::escape(pattern)
    }
}
