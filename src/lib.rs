//! Recursive grep over file contents and file metadata.
//!
//! [`SearchEngine`] walks a directory tree (or a single file), picks one
//! content extractor per file and returns every match in a single record
//! shape, [`SearchMatch`]:
//!
//! - plain text, line by line with context
//! - image format, EXIF and GPS metadata
//! - document, archive, database and media properties
//! - text inside zip-structured archives
//! - raw bytes, reported as offsets with a hex dump
//!
//! ```no_run
//! use metagrep::SearchEngine;
//!
//! let mut engine = SearchEngine::new();
//! engine.set_context_lines(1);
//! for m in engine.search("./docs", "TODO") {
//!     println!("{m}");
//! }
//! ```
pub mod capability;
pub mod cli;
pub mod config;
pub mod engine;
pub mod error;
pub mod exclusion;
pub mod extractors;
pub mod file_types;
pub mod matcher;
pub mod output;
pub mod reachability;
pub mod results;
pub mod text;
pub mod walker;

pub use capability::{Capabilities, Capability};
pub use config::{Preferences, SearchConfiguration};
pub use engine::SearchEngine;
pub use error::{MetagrepError, Result};
pub use exclusion::ExclusionFilter;
pub use file_types::{ExtractorKind, SearchDecision};
pub use matcher::{PatternMatcher, PatternOptions};
pub use reachability::ReachabilityCache;
pub use results::{MatchKind, SearchMatch, SearchReport, SearchStats};
pub use walker::StopHandle;
