//! Search engine facade: owns the configuration and runs one search per call
use crate::capability::Capabilities;
use crate::config::{Preferences, SearchConfiguration};
use crate::error::Result;
use crate::extractors::{Dispatcher, ExtractContext};
use crate::matcher::PatternMatcher;
use crate::reachability::ReachabilityCache;
use crate::results::{SearchMatch, SearchReport};
use crate::walker::{StopHandle, TreeWalker};
use log::{debug, info, warn};
use std::path::Path;
use std::time::{Duration, Instant};

/// Entry point for callers. Configure through the setters between searches,
/// then call [`SearchEngine::search`] or [`SearchEngine::search_report`].
pub struct SearchEngine {
    config: SearchConfiguration,
    dispatcher: Dispatcher,
    capabilities: Capabilities,
    reachability: ReachabilityCache,
    stop: StopHandle,
}

impl SearchEngine {
    pub fn new() -> Self {
        Self {
            config: SearchConfiguration::default(),
            dispatcher: Dispatcher::new(),
            capabilities: Capabilities::detect(),
            reachability: ReachabilityCache::new(),
            stop: StopHandle::new(),
        }
    }

    /// Engine seeded from persisted preferences
    pub fn with_preferences(prefs: &Preferences) -> Result<Self> {
        let mut engine = Self::new();
        engine.config.apply(prefs)?;
        Ok(engine)
    }

    pub fn with_capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities = capabilities;
        self
    }

    pub fn with_reachability_cache(mut self, cache: ReachabilityCache) -> Self {
        self.reachability = cache;
        self
    }

    pub fn config(&self) -> &SearchConfiguration {
        &self.config
    }

    pub fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    /// Handle another thread can use to cancel the running search
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn set_case_sensitive(&mut self, enabled: bool) {
        self.config.case_sensitive = enabled;
    }

    pub fn set_regex(&mut self, enabled: bool) {
        self.config.use_regex = enabled;
    }

    pub fn set_whole_word(&mut self, enabled: bool) {
        self.config.whole_word = enabled;
    }

    pub fn set_image_metadata(&mut self, enabled: bool) {
        self.config.image_metadata = enabled;
    }

    pub fn set_file_metadata(&mut self, enabled: bool) {
        self.config.file_metadata = enabled;
    }

    pub fn set_archive_search(&mut self, enabled: bool) {
        self.config.archive_text = enabled;
    }

    pub fn set_binary_hex(&mut self, enabled: bool) {
        self.config.binary_hex = enabled;
    }

    pub fn set_context_lines(&mut self, lines: usize) {
        self.config.set_context_lines(lines);
    }

    pub fn set_file_extensions<I, S>(&mut self, extensions: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.config.set_extensions(extensions);
    }

    /// Appends a regex fragment to the exclusion list
    pub fn add_exclude_pattern(&mut self, pattern: &str) -> Result<()> {
        self.config.exclusions.add(pattern)
    }

    /// 0 means unlimited
    pub fn set_max_results(&mut self, max: usize) {
        self.config.max_results = max;
    }

    pub fn set_max_file_size(&mut self, bytes: u64) {
        self.config.max_file_size = bytes;
    }

    pub fn set_probe_timeout(&mut self, timeout: Duration) {
        self.config.probe_timeout = timeout;
    }

    pub fn clear_probe_cache(&mut self) {
        self.reachability.clear();
    }

    /// Matches under `root`. Failures degrade to fewer (or no) matches.
    pub fn search(&mut self, root: impl AsRef<Path>, pattern: &str) -> Vec<SearchMatch> {
        self.search_report(root, pattern).matches
    }

    /// Same search, with statistics and the reason an empty result was returned early
    pub fn search_report(&mut self, root: impl AsRef<Path>, pattern: &str) -> SearchReport {
        let root = root.as_ref();
        let started = Instant::now();
        self.stop.reset();

        if pattern.is_empty() {
            debug!("Empty pattern, nothing to search for");
            return SearchReport::default();
        }

        let matcher = match PatternMatcher::compile(pattern, self.config.pattern_options()) {
            Ok(matcher) => matcher,
            Err(e) => {
                warn!("{e}");
                return SearchReport {
                    problem: Some(e.to_string()),
                    ..SearchReport::default()
                };
            }
        };

        info!("Searching {} for {:?}", root.display(), matcher.as_str());
        let ctx = ExtractContext {
            matcher: &matcher,
            config: &self.config,
            capabilities: &self.capabilities,
        };
        let walker = TreeWalker::new(&self.dispatcher, ctx, &self.stop);
        let mut report = walker.walk(root, &mut self.reachability);
        report.stats.duration = started.elapsed();

        info!(
            "Found {} matches in {} files ({} skipped, {} failed) in {:.2?}",
            report.matches.len(),
            report.stats.files_scanned,
            report.stats.files_skipped,
            report.stats.extractor_failures,
            report.stats.duration
        );
        report
    }
}

impl Default for SearchEngine {
    fn default() -> Self {
        Self::new()
    }
}
