//! Optional decoding capabilities, resolved once when an engine is built
use std::collections::HashSet;
use std::fmt;

/// A decoding capability an extractor may require
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Capability {
    /// Raster image decoding, EXIF and PNG text chunks
    ImageDecoding,
    /// PDF object model
    Pdf,
    /// Audio/video tag reading
    MediaTags,
    /// SQLite schema introspection
    Sqlite,
    /// Zip container reading
    ZipContainer,
    /// XML event parsing
    Xml,
    /// CSV record parsing
    Csv,
    /// Needs nothing beyond the core crate
    Builtin,
}

impl Capability {
    pub const ALL: [Capability; 8] = [
        Capability::ImageDecoding,
        Capability::Pdf,
        Capability::MediaTags,
        Capability::Sqlite,
        Capability::ZipContainer,
        Capability::Xml,
        Capability::Csv,
        Capability::Builtin,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Capability::ImageDecoding => "image-decoding",
            Capability::Pdf => "pdf",
            Capability::MediaTags => "media-tags",
            Capability::Sqlite => "sqlite",
            Capability::ZipContainer => "zip",
            Capability::Xml => "xml",
            Capability::Csv => "csv",
            Capability::Builtin => "builtin",
        }
    }

    fn compiled_in(self) -> bool {
        match self {
            Capability::ImageDecoding => cfg!(feature = "image-metadata"),
            Capability::Pdf => cfg!(feature = "pdf"),
            Capability::MediaTags => cfg!(feature = "media"),
            Capability::Sqlite => cfg!(feature = "sqlite"),
            Capability::ZipContainer | Capability::Xml | Capability::Csv | Capability::Builtin => {
                true
            }
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The set of capabilities extractors may rely on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Capabilities {
    available: HashSet<Capability>,
}

impl Capabilities {
    /// Everything compiled into this build
    pub fn detect() -> Self {
        let available: HashSet<_> = Capability::ALL
            .into_iter()
            .filter(|c| c.compiled_in())
            .collect();
        log::debug!(
            "Extractor capabilities: {:?}",
            available.iter().map(|c| c.name()).collect::<Vec<_>>()
        );
        Self { available }
    }

    pub fn none() -> Self {
        Self {
            available: HashSet::from([Capability::Builtin]),
        }
    }

    /// Same set with `capability` withdrawn
    pub fn without(mut self, capability: Capability) -> Self {
        self.available.remove(&capability);
        self
    }

    pub fn has(&self, capability: Capability) -> bool {
        self.available.contains(&capability)
    }
}

impl Default for Capabilities {
    fn default() -> Self {
        Self::detect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_capabilities_always_present() {
        let caps = Capabilities::detect();
        assert!(caps.has(Capability::ZipContainer));
        assert!(caps.has(Capability::Xml));
        assert!(caps.has(Capability::Csv));
        assert!(caps.has(Capability::Builtin));
    }

    #[test]
    fn test_feature_gated_capabilities() {
        let caps = Capabilities::detect();
        assert_eq!(caps.has(Capability::Pdf), cfg!(feature = "pdf"));
        assert_eq!(caps.has(Capability::Sqlite), cfg!(feature = "sqlite"));
        assert_eq!(
            caps.has(Capability::ImageDecoding),
            cfg!(feature = "image-metadata")
        );
    }

    #[test]
    fn test_without() {
        let caps = Capabilities::detect().without(Capability::ZipContainer);
        assert!(!caps.has(Capability::ZipContainer));
        assert!(caps.has(Capability::Xml));
        assert!(!Capabilities::none().has(Capability::Csv));
    }
}
