use super::{match_lines, ContentExtractor, ExtractContext};
use crate::capability::Capability;
use crate::error::{MetagrepError, Result};
use crate::file_types::ExtractorKind;
use crate::results::SearchMatch;
use crate::text::{decode_lenient, looks_binary};
use log::debug;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use zip::ZipArchive;

/// Text search inside each member of a zip-structured container
pub struct ArchiveTextExtractor;

impl ContentExtractor for ArchiveTextExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::ArchiveText
    }

    fn extract(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<Vec<SearchMatch>> {
        if !ctx.capabilities.has(Capability::ZipContainer) {
            return Err(MetagrepError::CapabilityUnavailable(
                Capability::ZipContainer.name(),
            ));
        }

        if !ctx.within_size_limit(path)? {
            return Ok(Vec::new());
        }

        let mut archive = ZipArchive::new(File::open(path)?)?;
        let mut matches = Vec::new();

        for i in 0..archive.len() {
            let mut member = match archive.by_index(i) {
                Ok(member) => member,
                Err(e) => {
                    debug!("Unreadable member #{i} in {}: {e}", path.display());
                    continue;
                }
            };
            if member.is_dir() {
                continue;
            }

            let name = member.name().to_string();
            if member.size() > ctx.config.max_file_size {
                debug!(
                    "Skipping large member {name} ({} bytes) in {}",
                    member.size(),
                    path.display()
                );
                continue;
            }

            let mut bytes = Vec::with_capacity(member.size() as usize);
            if let Err(e) = member.read_to_end(&mut bytes) {
                debug!("Failed to read member {name} in {}: {e}", path.display());
                continue;
            }
            if looks_binary(&bytes) {
                continue;
            }

            let composite = member_path(path, &name);
            matches.extend(match_lines(
                &composite,
                &decode_lenient(&bytes),
                ctx.matcher,
                ctx.config.context_lines(),
            ));
        }

        Ok(matches)
    }
}

/// `archive` joined with the member's internal path; a rooted member name stays under the archive
pub fn member_path(archive: &Path, member: &str) -> String {
    let internal = member.trim_start_matches(['/', '\\']);
    format!("{}/{}", archive.display(), internal)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::capability::Capabilities;
    use crate::config::SearchConfiguration;
    use crate::matcher::{PatternMatcher, PatternOptions};
    use std::io::Write;
    use tempfile::tempdir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn write_zip(path: &Path, members: &[(&str, &[u8])]) {
        let mut zip = ZipWriter::new(File::create(path).unwrap());
        for (name, data) in members {
            if name.ends_with('/') {
                zip.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                zip.start_file(*name, SimpleFileOptions::default()).unwrap();
                zip.write_all(data).unwrap();
            }
        }
        zip.finish().unwrap();
    }

    fn extract(path: &Path, pattern: &str, caps: &Capabilities) -> Result<Vec<SearchMatch>> {
        extract_with(path, pattern, caps, &SearchConfiguration::default())
    }

    fn extract_with(
        path: &Path,
        pattern: &str,
        caps: &Capabilities,
        config: &SearchConfiguration,
    ) -> Result<Vec<SearchMatch>> {
        let matcher = PatternMatcher::compile(pattern, PatternOptions::default()).unwrap();
        let ctx = ExtractContext {
            matcher: &matcher,
            config,
            capabilities: caps,
        };
        ArchiveTextExtractor.extract(path, &ctx)
    }

    #[test]
    fn test_member_matches_use_composite_paths() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("archive.zip");
        write_zip(
            &archive,
            &[
                ("docs/", b""),
                ("docs/readme.txt", b"intro\nthe needle is here\noutro\n"),
                ("logo.png", b"\x89PNG\r\n\x1a\n\x00\x00needle"),
            ],
        );

        let found = extract(&archive, "needle", &Capabilities::detect()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            Path::new(&found[0].file_path),
            archive.join("docs/readme.txt")
        );
        assert_eq!(found[0].line_number, 2);
        assert_eq!(found[0].context_before, vec!["intro"]);
        assert_eq!(found[0].context_after, vec!["outro"]);
    }

    #[test]
    fn test_corrupt_archive_is_an_error() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("broken.zip");
        std::fs::write(&archive, b"this is not a zip file").unwrap();
        assert!(extract(&archive, "zip", &Capabilities::detect()).is_err());
    }

    #[test]
    fn test_missing_capability() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("a.zip");
        write_zip(&archive, &[("a.txt", b"needle")]);
        let caps = Capabilities::detect().without(Capability::ZipContainer);
        assert!(matches!(
            extract(&archive, "needle", &caps),
            Err(MetagrepError::CapabilityUnavailable(_))
        ));
    }

    #[test]
    fn test_rooted_member_names_stay_under_the_archive() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("archive.zip");
        write_zip(&archive, &[("/etc/notes.txt", b"a needle in etc\n")]);

        let found = extract(&archive, "needle", &Capabilities::detect()).unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(
            found[0].file_path,
            format!("{}/etc/notes.txt", archive.display())
        );
        assert!(found[0]
            .file_path
            .starts_with(archive.to_string_lossy().as_ref()));
    }

    #[test]
    fn test_member_path_strips_leading_separators() {
        let archive = Path::new("/data/bundle.zip");
        assert_eq!(member_path(archive, "a/b.txt"), "/data/bundle.zip/a/b.txt");
        assert_eq!(member_path(archive, "/etc/x"), "/data/bundle.zip/etc/x");
        assert_eq!(member_path(archive, "\\win\\y"), "/data/bundle.zip/win\\y");
    }

    #[test]
    fn test_oversized_archive_is_skipped() {
        let dir = tempdir().unwrap();
        let archive = dir.path().join("big.zip");
        write_zip(&archive, &[("a.txt", b"needle")]);
        let size = std::fs::metadata(&archive).unwrap().len();

        let mut config = SearchConfiguration::default();
        config.max_file_size = size - 1;
        let found = extract_with(&archive, "needle", &Capabilities::detect(), &config).unwrap();
        assert!(found.is_empty());

        config.max_file_size = size;
        let found = extract_with(&archive, "needle", &Capabilities::detect(), &config).unwrap();
        assert_eq!(found.len(), 1);
    }
}
