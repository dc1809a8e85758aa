//! Candidate enumeration: exclusion pruning, extension filtering, dispatch
use crate::error::MetagrepError;
use crate::extractors::{DispatchOutcome, Dispatcher, ExtractContext};
use crate::reachability::{is_network_path, ReachabilityCache};
use crate::results::SearchReport;
use log::{debug, warn};
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use walkdir::WalkDir;

/// Cooperative cancellation flag, checked between files
#[derive(Debug, Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }

    pub(crate) fn reset(&self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct TreeWalker<'a> {
    dispatcher: &'a Dispatcher,
    ctx: ExtractContext<'a>,
    stop: &'a StopHandle,
}

impl<'a> TreeWalker<'a> {
    pub fn new(dispatcher: &'a Dispatcher, ctx: ExtractContext<'a>, stop: &'a StopHandle) -> Self {
        Self {
            dispatcher,
            ctx,
            stop,
        }
    }

    pub fn walk(&self, root: &Path, reachability: &mut ReachabilityCache) -> SearchReport {
        let mut report = SearchReport::default();
        let config = self.ctx.config;

        if is_network_path(root) && !reachability.is_reachable(root, config.probe_timeout) {
            let problem = MetagrepError::Unreachable(root.to_path_buf());
            warn!("{problem}");
            report.problem = Some(problem.to_string());
            return report;
        }

        if root.is_file() {
            if self.stop.is_stopped() {
                report.cancelled = true;
            } else {
                self.visit_file(root, &mut report);
            }
            report.limit_reached = config.limit_reached(report.matches.len());
            return report;
        }

        let exclusions = &config.exclusions;
        let entries = WalkDir::new(root)
            .follow_links(false)
            .sort_by_file_name()
            .into_iter()
            // prune excluded directories before descending into them
            .filter_entry(|e| !(e.file_type().is_dir() && exclusions.is_excluded(e.path())));

        for entry in entries {
            if self.stop.is_stopped() {
                debug!("Stop requested, ending walk of {}", root.display());
                report.cancelled = true;
                break;
            }
            if config.limit_reached(report.matches.len()) {
                report.limit_reached = true;
                break;
            }

            let entry = match entry {
                Ok(entry) => entry,
                Err(e) => {
                    debug!("Skipping unreadable entry: {}", MetagrepError::from(e));
                    report.stats.dirs_skipped += 1;
                    continue;
                }
            };

            if entry.file_type().is_file() {
                self.visit_file(entry.path(), &mut report);
            }
        }

        if config.limit_reached(report.matches.len()) {
            report.limit_reached = true;
        }
        report
    }

    fn visit_file(&self, path: &Path, report: &mut SearchReport) {
        let config = self.ctx.config;
        if config.exclusions.is_excluded(path) || !config.extension_allowed(path) {
            report.stats.files_skipped += 1;
            return;
        }

        match self.dispatcher.dispatch(path, &self.ctx) {
            DispatchOutcome::Extracted(matches) => {
                report.stats.files_scanned += 1;
                report.stats.bytes_scanned += fs::metadata(path).map(|m| m.len()).unwrap_or(0);
                report.matches.extend(matches);
            }
            DispatchOutcome::Skipped(_) => report.stats.files_skipped += 1,
            DispatchOutcome::Failed(_) => {
                report.stats.files_scanned += 1;
                report.stats.extractor_failures += 1;
            }
        }
    }
}
