//! Image format, geometry, EXIF/GPS tags and PNG text chunks as searchable entries
use super::{match_entries, ContentExtractor, ExtractContext, MetadataMap};
use crate::capability::Capability;
use crate::error::{MetagrepError, Result};
use crate::file_types::ExtractorKind;
use crate::results::SearchMatch;
use std::path::Path;

/// Cap for rendered EXIF values
pub const EXIF_VALUE_LIMIT: usize = 100;
/// Cap for container text chunks
pub const TEXT_CHUNK_LIMIT: usize = 200;

pub struct ImageMetadataExtractor;

impl ContentExtractor for ImageMetadataExtractor {
    fn kind(&self) -> ExtractorKind {
        ExtractorKind::ImageMetadata
    }

    fn extract(&self, path: &Path, ctx: &ExtractContext<'_>) -> Result<Vec<SearchMatch>> {
        if !ctx.capabilities.has(Capability::ImageDecoding) {
            return Err(MetagrepError::CapabilityUnavailable(
                Capability::ImageDecoding.name(),
            ));
        }
        if !ctx.within_size_limit(path)? {
            return Ok(Vec::new());
        }

        let entries = read_image_metadata(path)?;
        Ok(match_entries(&path.to_string_lossy(), &entries, ctx.matcher))
    }
}

#[cfg(feature = "image-metadata")]
pub fn read_image_metadata(path: &Path) -> Result<MetadataMap> {
    use image::{ImageDecoder, ImageFormat, ImageReader};

    let reader = ImageReader::open(path)?.with_guessed_format()?;
    let format = reader.format();
    let decoder = reader.into_decoder()?;
    let (width, height) = decoder.dimensions();

    let mut entries = MetadataMap::new();
    if let Some(format) = format {
        entries.insert("Format", format_name(format));
    }
    entries.insert("Mode", color_mode(decoder.color_type()));
    entries.insert("Size", format!("{width}x{height}"));
    drop(decoder);

    entries.extend(exif_entries(path)?);

    if format == Some(ImageFormat::Png) {
        entries.extend(png_text_entries(path)?);
    }

    Ok(entries)
}

#[cfg(not(feature = "image-metadata"))]
pub fn read_image_metadata(_path: &Path) -> Result<MetadataMap> {
    Err(MetagrepError::CapabilityUnavailable(
        Capability::ImageDecoding.name(),
    ))
}

#[cfg(feature = "image-metadata")]
fn format_name(format: image::ImageFormat) -> String {
    use image::ImageFormat;

    match format {
        ImageFormat::Png => "PNG".to_string(),
        ImageFormat::Jpeg => "JPEG".to_string(),
        ImageFormat::Gif => "GIF".to_string(),
        ImageFormat::Bmp => "BMP".to_string(),
        ImageFormat::Tiff => "TIFF".to_string(),
        ImageFormat::WebP => "WEBP".to_string(),
        other => format!("{other:?}").to_uppercase(),
    }
}

/// Conventional short names for pixel layouts
#[cfg(feature = "image-metadata")]
fn color_mode(color: image::ColorType) -> String {
    use image::ColorType;

    match color {
        ColorType::L8 => "L".to_string(),
        ColorType::La8 => "LA".to_string(),
        ColorType::Rgb8 => "RGB".to_string(),
        ColorType::Rgba8 => "RGBA".to_string(),
        ColorType::L16 => "I;16".to_string(),
        ColorType::La16 => "LA;16".to_string(),
        ColorType::Rgb16 => "RGB;16".to_string(),
        ColorType::Rgba16 => "RGBA;16".to_string(),
        ColorType::Rgb32F => "RGB;F".to_string(),
        ColorType::Rgba32F => "RGBA;F".to_string(),
        other => format!("{other:?}"),
    }
}

/// Primary-IFD tags by name; GPS sub-tags collapse into a single `GPS_Info`
#[cfg(feature = "image-metadata")]
fn exif_entries(path: &Path) -> Result<MetadataMap> {
    use crate::text::{decode_lenient, truncate_value};
    use exif::{Context, In, Value};
    use std::fs::File;
    use std::io::BufReader;

    let mut entries = MetadataMap::new();
    let mut reader = BufReader::new(File::open(path)?);
    let exif = match exif::Reader::new().read_from_container(&mut reader) {
        Ok(exif) => exif,
        Err(exif::Error::NotFound(_)) => return Ok(entries),
        Err(e) => {
            log::debug!("No usable EXIF in {}: {e}", path.display());
            return Ok(entries);
        }
    };

    let mut gps = Vec::new();
    for field in exif.fields().filter(|f| f.ifd_num == In::PRIMARY) {
        let rendered = match &field.value {
            Value::Ascii(parts) => parts
                .iter()
                .map(|p| decode_lenient(p))
                .collect::<Vec<_>>()
                .join(" "),
            Value::Undefined(bytes, _) => decode_lenient(bytes),
            _ => field.display_value().with_unit(&exif).to_string(),
        };
        let rendered = truncate_value(&rendered, EXIF_VALUE_LIMIT);

        if field.tag.context() == Context::Gps {
            gps.push(format!("{}: {}", field.tag, rendered));
        } else {
            entries.insert(field.tag.to_string(), rendered);
        }
    }

    if !gps.is_empty() {
        entries.insert("GPS_Info", format!("{{{}}}", gps.join(", ")));
    }
    Ok(entries)
}

#[cfg(feature = "image-metadata")]
fn png_text_entries(path: &Path) -> Result<MetadataMap> {
    use crate::text::truncate_value;
    use std::fs::File;
    use std::io::BufReader;

    let decoder = png::Decoder::new(BufReader::new(File::open(path)?));
    let reader = decoder.read_info()?;
    let info = reader.info();

    let mut entries = MetadataMap::new();
    for chunk in &info.uncompressed_latin1_text {
        entries.insert(
            format!("PNG_{}", chunk.keyword),
            truncate_value(&chunk.text, TEXT_CHUNK_LIMIT),
        );
    }
    for chunk in &info.compressed_latin1_text {
        if let Ok(text) = chunk.get_text() {
            entries.insert(
                format!("PNG_{}", chunk.keyword),
                truncate_value(&text, TEXT_CHUNK_LIMIT),
            );
        }
    }
    for chunk in &info.utf8_text {
        if let Ok(text) = chunk.get_text() {
            entries.insert(
                format!("PNG_{}", chunk.keyword),
                truncate_value(&text, TEXT_CHUNK_LIMIT),
            );
        }
    }
    Ok(entries)
}
