//! Bounded-time reachability checks for network-style roots
use crate::exclusion::normalize;
use crossbeam_channel::{RecvTimeoutError, bounded};
use log::{debug, warn};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

type Prober = Arc<dyn Fn(&Path) -> bool + Send + Sync>;

/// UNC (`\\server\share`) or `//server/share` style roots
pub fn is_network_path(path: &Path) -> bool {
    let normalized = normalize(path);
    normalized.starts_with("//") && normalized.len() > 2
}

/// Path-to-reachability map. Grows until [`ReachabilityCache::clear`] is called.
pub struct ReachabilityCache {
    entries: HashMap<String, bool>,
    prober: Prober,
}

impl ReachabilityCache {
    pub fn new() -> Self {
        Self::with_prober(|path: &Path| path.exists())
    }

    pub fn with_prober<F>(prober: F) -> Self
    where
        F: Fn(&Path) -> bool + Send + Sync + 'static,
    {
        Self {
            entries: HashMap::new(),
            prober: Arc::new(prober),
        }
    }

    /// Cached answer for `path`, probing at most `timeout` on a miss
    pub fn is_reachable(&mut self, path: &Path, timeout: Duration) -> bool {
        let key = normalize(path).into_owned();
        if let Some(&reachable) = self.entries.get(&key) {
            debug!("Reachability cache hit for {key}: {reachable}");
            return reachable;
        }

        let reachable = probe(self.prober.clone(), path, timeout);
        self.entries.insert(key, reachable);
        reachable
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Default for ReachabilityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ReachabilityCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReachabilityCache")
            .field("entries", &self.entries)
            .finish()
    }
}

fn probe(prober: Prober, path: &Path, timeout: Duration) -> bool {
    let (tx, rx) = bounded(1);
    let target = path.to_path_buf();
    // A hung share keeps this thread blocked; the caller stops waiting at `timeout`
    thread::spawn(move || {
        let _ = tx.send(prober(&target));
    });

    match rx.recv_timeout(timeout) {
        Ok(reachable) => reachable,
        Err(RecvTimeoutError::Timeout) => {
            warn!(
                "Reachability probe for {} timed out after {:?}",
                path.display(),
                timeout
            );
            false
        }
        Err(RecvTimeoutError::Disconnected) => false,
    }
}
