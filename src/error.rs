use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MetagrepError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("Walkdir error: {0}")]
    Walkdir(#[from] walkdir::Error),

    #[error("Archive error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML error: {0}")]
    Xml(#[from] xml::reader::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[cfg(feature = "pdf")]
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),

    #[cfg(feature = "image-metadata")]
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[cfg(feature = "image-metadata")]
    #[error("EXIF error: {0}")]
    Exif(#[from] exif::Error),

    #[cfg(feature = "image-metadata")]
    #[error("PNG error: {0}")]
    Png(#[from] png::DecodingError),

    #[cfg(feature = "sqlite")]
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[cfg(feature = "media")]
    #[error("Media tag error: {0}")]
    Media(#[from] lofty::error::LoftyError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("File too large: {path} ({size} bytes)")]
    FileTooLarge { path: PathBuf, size: u64 },

    #[error("Network path unreachable: {0}")]
    Unreachable(PathBuf),

    #[error("Extractor capability unavailable: {0}")]
    CapabilityUnavailable(&'static str),

    #[error("An unexpected error occurred: {0}")]
    Other(String),
}

pub type Result<T> = std::result::Result<T, MetagrepError>;
