use clap::{Parser, ValueEnum};
use std::fmt;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
pub struct Cli {
    /// Text or regular expression to search for
    pub pattern: String,

    /// Directory or file to search
    #[clap(default_value = ".")]
    pub path: PathBuf,

    #[clap(long, value_parser, default_value_t = false)]
    pub case_sensitive: bool,

    /// Treat PATTERN as a regular expression
    #[clap(short = 'e', long, value_parser, default_value_t = false)]
    pub regex: bool,

    /// Match whole words only (literal patterns)
    #[clap(short = 'w', long, value_parser, default_value_t = false)]
    pub word: bool,

    /// Search image format, EXIF and GPS metadata instead of file contents
    #[clap(long, value_parser, default_value_t = false)]
    pub image_metadata: bool,

    /// Search document, archive, database and media properties instead of file contents
    #[clap(long, value_parser, default_value_t = false)]
    pub file_metadata: bool,

    /// Search text inside zip-structured archives
    #[clap(long, value_parser, default_value_t = false)]
    pub archives: bool,

    /// Match raw bytes and report hex dumps
    #[clap(long, value_parser, default_value_t = false)]
    pub binary: bool,

    /// Lines of context around each match (max 10)
    #[clap(short = 'C', long = "context", value_parser)]
    pub context_lines: Option<usize>,

    /// Only search files with these extensions
    #[clap(long, value_parser, use_value_delimiter = true)]
    pub extensions: Option<Vec<String>>,

    /// Extra exclusion regex, matched anywhere in the path
    #[clap(long, value_parser)]
    pub exclude: Vec<String>,

    /// Stop after roughly this many matches (0 = unlimited)
    #[clap(long, value_parser)]
    pub max_results: Option<usize>,

    /// Skip files larger than this many MiB
    #[clap(long, value_parser)]
    pub max_size: Option<u64>,

    /// Seconds to wait for a network root to respond
    #[clap(long, value_parser)]
    pub probe_timeout: Option<u64>,

    #[clap(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Print a summary of scanned and skipped files
    #[clap(long, value_parser, default_value_t = false)]
    pub stats: bool,

    #[clap(long, value_parser, default_value_t = false)]
    pub verbose: bool,

    #[clap(long, value_parser)]
    pub log: Option<PathBuf>,
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}
