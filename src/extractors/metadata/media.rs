use super::MetadataMap;
use crate::error::Result;
use lofty::file::{AudioFile, TaggedFileExt};
use lofty::tag::Accessor;
use std::path::Path;

/// Tag fields and stream properties of audio/video files
pub fn tag_summary(path: &Path) -> Result<MetadataMap> {
    let tagged = match lofty::read_from_path(path) {
        Ok(tagged) => tagged,
        Err(e) if matches!(e.kind(), lofty::error::ErrorKind::UnknownFormat) => {
            return Ok(MetadataMap::new());
        }
        Err(e) => return Err(e.into()),
    };

    let mut entries = MetadataMap::new();
    if let Some(tag) = tagged.primary_tag().or_else(|| tagged.first_tag()) {
        if let Some(title) = tag.title() {
            entries.insert_non_empty("Title", title);
        }
        if let Some(artist) = tag.artist() {
            entries.insert_non_empty("Artist", artist);
        }
        if let Some(album) = tag.album() {
            entries.insert_non_empty("Album", album);
        }
        if let Some(genre) = tag.genre() {
            entries.insert_non_empty("Genre", genre);
        }
        if let Some(year) = tag.year() {
            entries.insert("Year", year.to_string());
        }
        if let Some(track) = tag.track() {
            entries.insert("Track", track.to_string());
        }
        if let Some(comment) = tag.comment() {
            entries.insert_non_empty("Comment", comment);
        }
    }

    let properties = tagged.properties();
    let duration = properties.duration();
    if !duration.is_zero() {
        entries.insert("Duration", format!("{:.2}s", duration.as_secs_f64()));
    }
    if let Some(bitrate) = properties.audio_bitrate() {
        entries.insert("Bitrate", format!("{bitrate} kbps"));
    }
    if let Some(rate) = properties.sample_rate() {
        entries.insert("Sample_Rate", format!("{rate} Hz"));
    }
    if let Some(channels) = properties.channels() {
        entries.insert("Channels", channels.to_string());
    }
    Ok(entries)
}
