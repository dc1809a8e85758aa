use crate::error::Result;
use regex::Regex;
use std::borrow::Cow;
use std::path::Path;

/// Regex fragments skipped by default: VCS metadata, generated/dependency
/// directories and common non-text binaries.
pub const DEFAULT_EXCLUSIONS: &[&str] = &[
    r"\.git",
    r"\.svn",
    r"__pycache__",
    r"node_modules",
    r"\.pyc$",
    r"\.exe$",
    r"\.dll$",
    r"\.so$",
    r"\.bin$",
];

/// Decides whether a path is skipped before any I/O touches it.
///
/// Patterns are unanchored: a fragment that matches anywhere in the
/// `/`-normalised path excludes it. Patterns only accumulate.
#[derive(Debug, Clone)]
pub struct ExclusionFilter {
    patterns: Vec<Regex>,
}

impl ExclusionFilter {
    pub fn new() -> Self {
        let patterns = DEFAULT_EXCLUSIONS
            .iter()
            .filter_map(|p| Regex::new(p).ok())
            .collect();
        Self { patterns }
    }

    pub fn empty() -> Self {
        Self {
            patterns: Vec::new(),
        }
    }

    pub fn add(&mut self, pattern: &str) -> Result<()> {
        self.patterns.push(Regex::new(pattern)?);
        Ok(())
    }

    pub fn is_excluded(&self, path: &Path) -> bool {
        let normalized = normalize(path);
        self.patterns.iter().any(|p| p.is_match(&normalized))
    }

    pub fn patterns(&self) -> impl Iterator<Item = &str> {
        self.patterns.iter().map(|p| p.as_str())
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}

impl Default for ExclusionFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Path text with every `\` turned into `/`
pub fn normalize(path: &Path) -> Cow<'_, str> {
    let text = path.to_string_lossy();
    if text.contains('\\') {
        Cow::Owned(text.replace('\\', "/"))
    } else {
        text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions() {
        let filter = ExclusionFilter::new();
        assert!(filter.is_excluded(Path::new("project/.git/config")));
        assert!(filter.is_excluded(Path::new(".git")));
        assert!(filter.is_excluded(Path::new("web/node_modules/left-pad/index.js")));
        assert!(filter.is_excluded(Path::new("pkg/__pycache__/mod.cpython-311.pyc")));
        assert!(filter.is_excluded(Path::new("build/tool.exe")));
        assert!(filter.is_excluded(Path::new("lib/libfoo.so")));

        assert!(!filter.is_excluded(Path::new("src/main.rs")));
        assert!(!filter.is_excluded(Path::new("docs/binary_format.md")));
        assert!(!filter.is_excluded(Path::new("lib/libfoo.so.txt")));
    }

    #[test]
    fn test_backslashes_are_normalized() {
        let filter = ExclusionFilter::new();
        assert!(filter.is_excluded(Path::new(r"C:\work\repo\.git\HEAD")));
        assert_eq!(normalize(Path::new(r"a\b\c")), "a/b/c");
    }

    #[test]
    fn test_custom_patterns_accumulate() {
        let mut filter = ExclusionFilter::new();
        let before = filter.len();
        filter.add(r"/target/").unwrap();
        filter.add(r"\.log$").unwrap();
        assert_eq!(filter.len(), before + 2);
        assert!(filter.is_excluded(Path::new("crate/target/debug/build")));
        assert!(filter.is_excluded(Path::new("var/app.log")));
        assert!(filter.is_excluded(Path::new("repo/.git/index")));
    }

    #[test]
    fn test_invalid_custom_pattern_is_rejected() {
        let mut filter = ExclusionFilter::empty();
        assert!(filter.add("[unterminated").is_err());
        assert!(filter.is_empty());
    }
}
