use crate::error::{MetagrepError, Result};
use crate::exclusion::ExclusionFilter;
use crate::matcher::PatternOptions;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const MAX_CONTEXT_LINES: usize = 10;
pub const DEFAULT_CONTEXT_LINES: usize = 2;
pub const DEFAULT_MAX_FILE_SIZE: u64 = 50 * 1024 * 1024;
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

/// Live search settings, mutated by the caller between searches
#[derive(Debug, Clone)]
pub struct SearchConfiguration {
    pub case_sensitive: bool,
    pub use_regex: bool,
    pub whole_word: bool,
    pub image_metadata: bool,
    pub file_metadata: bool,
    pub archive_text: bool,
    pub binary_hex: bool,
    context_lines: usize,
    extensions: Vec<String>,
    /// 0 means unlimited
    pub max_results: usize,
    pub max_file_size: u64,
    pub probe_timeout: Duration,
    pub exclusions: ExclusionFilter,
}

impl Default for SearchConfiguration {
    fn default() -> Self {
        Self {
            case_sensitive: false,
            use_regex: false,
            whole_word: false,
            image_metadata: false,
            file_metadata: false,
            archive_text: false,
            binary_hex: false,
            context_lines: DEFAULT_CONTEXT_LINES,
            extensions: Vec::new(),
            max_results: 0,
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            exclusions: ExclusionFilter::new(),
        }
    }
}

impl SearchConfiguration {
    pub fn pattern_options(&self) -> PatternOptions {
        PatternOptions {
            regex: self.use_regex,
            whole_word: self.whole_word,
            case_sensitive: self.case_sensitive,
        }
    }

    pub fn context_lines(&self) -> usize {
        self.context_lines
    }

    pub fn set_context_lines(&mut self, lines: usize) {
        self.context_lines = lines.min(MAX_CONTEXT_LINES);
    }

    pub fn extensions(&self) -> &[String] {
        &self.extensions
    }

    /// Accepts `txt`, `.txt` or `*.txt`; stored as lowercase `.txt`
    pub fn set_extensions<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.extensions = extensions
            .into_iter()
            .map(|e| e.as_ref().trim().trim_start_matches('*').to_ascii_lowercase())
            .filter(|e| !e.is_empty() && e != ".")
            .map(|e| {
                if e.starts_with('.') {
                    e
                } else {
                    format!(".{e}")
                }
            })
            .collect();
    }

    /// Suffix comparison against the file name; an empty list admits everything
    pub fn extension_allowed(&self, path: &Path) -> bool {
        if self.extensions.is_empty() {
            return true;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().to_ascii_lowercase())
            .unwrap_or_default();
        self.extensions.iter().any(|ext| name.ends_with(ext.as_str()))
    }

    pub fn limit_reached(&self, found: usize) -> bool {
        self.max_results > 0 && found >= self.max_results
    }

    /// Either metadata mode suppresses plain-text scanning of every other file
    pub fn metadata_only(&self) -> bool {
        self.image_metadata || self.file_metadata
    }

    pub fn apply(&mut self, prefs: &Preferences) -> Result<()> {
        self.max_results = prefs.search.max_results;
        self.max_file_size = prefs
            .search
            .max_search_file_size_mb
            .saturating_mul(1024 * 1024);
        self.set_context_lines(prefs.search.context_lines);
        self.probe_timeout = Duration::from_secs(prefs.search.probe_timeout_secs);
        for pattern in &prefs.ignore.extra_exclusions {
            self.exclusions.add(pattern)?;
        }
        Ok(())
    }
}

/// Preferences persisted by the caller and applied at startup
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Preferences {
    #[serde(default)]
    pub search: SearchPreferences,

    #[serde(default)]
    pub ignore: IgnorePreferences,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchPreferences {
    pub max_results: usize,
    pub max_search_file_size_mb: u64,
    pub context_lines: usize,
    pub probe_timeout_secs: u64,
}

impl Default for SearchPreferences {
    fn default() -> Self {
        Self {
            max_results: 0,
            max_search_file_size_mb: DEFAULT_MAX_FILE_SIZE / (1024 * 1024),
            context_lines: DEFAULT_CONTEXT_LINES,
            probe_timeout_secs: DEFAULT_PROBE_TIMEOUT.as_secs(),
        }
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct IgnorePreferences {
    pub extra_exclusions: Vec<String>,
}

impl Preferences {
    pub fn load() -> Result<Self> {
        match Self::find_config_path() {
            Some(path) => Self::load_from(&path),
            None => Ok(Self::default()),
        }
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            MetagrepError::Config(format!(
                "Failed to read config file {}: {e}",
                path.display()
            ))
        })?;
        Ok(toml::from_str(&content)?)
    }

    fn find_config_path() -> Option<PathBuf> {
        if let Some(xdg_config) = dirs::config_dir() {
            let xdg_path = xdg_config.join("metagrep/config.toml");
            if xdg_path.exists() {
                return Some(xdg_path);
            }
        }

        if let Some(home) = dirs::home_dir() {
            let home_path = home.join(".metagrep.toml");
            if home_path.exists() {
                return Some(home_path);
            }
        }

        let current_path = Path::new(".metagrep.toml");
        if current_path.exists() {
            return Some(current_path.to_path_buf());
        }

        None
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| MetagrepError::Config(format!("Failed to serialize config: {e}")))?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }
}
