use crate::error::{Result, TrackerError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use futures::future::try_join_all;
use image::{DynamicImage, ImageFormat};
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::{Path, PathBuf};

const DATA_IMAGE_PREFIX: &str = "data:image/";
const BASE64_MARKER: &str = ";base64,";

// ---------------------------------------------------------------------------
// ImagePayload
// ---------------------------------------------------------------------------

/// An embedded image, stored as a `data:` URL so the format tag travels with
/// the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ImagePayload(String);

impl ImagePayload {
    pub fn new(data_url: impl Into<String>) -> Self {
        Self(data_url.into())
    }

    pub fn from_bytes(bytes: &[u8], mime: &str) -> Self {
        Self(format!("data:{mime}{BASE64_MARKER}{}", STANDARD.encode(bytes)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Subtype of the `data:image/<tag>` header, lowercased. Defaults to
    /// `png` when the header carries no image tag.
    pub fn format_tag(&self) -> String {
        let tag = self
            .0
            .strip_prefix(DATA_IMAGE_PREFIX)
            .and_then(|rest| rest.split([';', ',']).next())
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();
        if tag.is_empty() {
            "png".to_string()
        } else {
            tag
        }
    }

    /// File extension matching the payload's tag.
    pub fn extension(&self) -> String {
        extension_for(&self.format_tag())
    }

    /// Raw image bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        let Some(pos) = self.0.find(BASE64_MARKER) else {
            return Err(TrackerError::ImageDecode(
                "payload is not a base64 data URL".to_string(),
            ));
        };
        let encoded = &self.0[pos + BASE64_MARKER.len()..];
        STANDARD
            .decode(encoded.trim())
            .map_err(|e| TrackerError::ImageDecode(e.to_string()))
    }
}

/// File extension for a format tag (`jpeg` → `jpg`, `svg+xml` → `svg`).
pub fn extension_for(tag: &str) -> String {
    match tag {
        "jpeg" | "pjpeg" => "jpg".to_string(),
        "svg+xml" => "svg".to_string(),
        "x-icon" | "vnd.microsoft.icon" => "ico".to_string(),
        other => other.to_string(),
    }
}

// ---------------------------------------------------------------------------
// Attachment resolution
// ---------------------------------------------------------------------------

/// Read one image file into an encoded payload.
pub async fn resolve_attachment(path: PathBuf) -> Result<ImagePayload> {
    let mime = mime_guess::from_path(&path).first_or_octet_stream();
    if mime.type_() != mime_guess::mime::IMAGE {
        return Err(TrackerError::UnsupportedImage {
            path: path.display().to_string(),
            reason: format!("'{}' is not an image type", mime.essence_str()),
        });
    }
    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        tracing::warn!(path = %path.display(), "attachment read failed: {e}");
        e
    })?;
    tracing::debug!(path = %path.display(), bytes = bytes.len(), "attachment resolved");
    Ok(ImagePayload::from_bytes(&bytes, mime.essence_str()))
}

/// Resolve every attachment concurrently. The result keeps input order; the
/// first failure aborts the whole batch.
pub async fn resolve_attachments(paths: &[PathBuf]) -> Result<Vec<ImagePayload>> {
    try_join_all(paths.iter().cloned().map(resolve_attachment)).await
}

// ---------------------------------------------------------------------------
// Export
// ---------------------------------------------------------------------------

fn encodable_format(ext: &str) -> Option<ImageFormat> {
    match ext.to_ascii_lowercase().as_str() {
        "png" => Some(ImageFormat::Png),
        "jpg" | "jpeg" => Some(ImageFormat::Jpeg),
        "webp" => Some(ImageFormat::WebP),
        _ => None,
    }
}

fn format_extension(format: ImageFormat) -> &'static str {
    format.extensions_str().first().copied().unwrap_or("png")
}

fn transcode(bytes: &[u8], source: Option<ImageFormat>, target: ImageFormat) -> Result<Vec<u8>> {
    let img = match source {
        Some(format) => image::load_from_memory_with_format(bytes, format)?,
        None => image::load_from_memory(bytes)?,
    };
    // JPEG has no alpha channel; the WebP encoder wants 8-bit channels.
    let img = match target {
        ImageFormat::Jpeg => DynamicImage::ImageRgb8(img.to_rgb8()),
        ImageFormat::WebP => DynamicImage::ImageRgba8(img.to_rgba8()),
        _ => img,
    };
    let mut out = Vec::new();
    img.write_to(&mut Cursor::new(&mut out), target)?;
    Ok(out)
}

/// Write `payload` to `dest` and return the path written.
///
/// The output format follows the payload's tag: png, jpeg and webp are
/// written as themselves, avif is copied through unchanged, and any other
/// tag is converted to `default_format` (png when that is not encodable).
/// The destination extension only names the file; a destination without one
/// gets the extension of the output format.
pub fn export(payload: &ImagePayload, dest: &Path, default_format: &str) -> Result<PathBuf> {
    let result = export_inner(payload, dest, default_format);
    if let Err(e) = &result {
        tracing::error!(dest = %dest.display(), "image export failed: {e}");
    }
    result
}

fn export_inner(payload: &ImagePayload, dest: &Path, default_format: &str) -> Result<PathBuf> {
    let bytes = payload.decode()?;
    let tag = payload.format_tag();
    let source = ImageFormat::from_extension(&tag);

    // No avif encoder is built in, so avif payloads keep their bytes.
    let target = match tag.as_str() {
        "avif" => None,
        other => Some(
            encodable_format(other)
                .or_else(|| encodable_format(default_format))
                .unwrap_or(ImageFormat::Png),
        ),
    };

    let dest = match (dest.extension(), target) {
        (Some(_), _) => dest.to_path_buf(),
        (None, Some(format)) => dest.with_extension(format_extension(format)),
        (None, None) => dest.with_extension(payload.extension()),
    };

    let out = match target {
        Some(format) if source != Some(format) => transcode(&bytes, source, format)?,
        _ => bytes,
    };

    // Encoding finished before anything touches the disk.
    crate::io::atomic_write(&dest, &out)?;
    tracing::info!(dest = %dest.display(), tag = %tag, "image exported");
    Ok(dest)
}

/// Write the decoded payload to `<dir>/<stem>.<ext>` so a file browser can
/// show it.
pub fn materialize(payload: &ImagePayload, dir: &Path, stem: &str) -> Result<PathBuf> {
    let bytes = payload.decode()?;
    let path = dir.join(format!("{stem}.{}", payload.extension()));
    crate::io::atomic_write(&path, &bytes)?;
    Ok(path)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};
    use tempfile::TempDir;

    fn png_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(2, 2, Rgba([200, 10, 10, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Png)
            .unwrap();
        out
    }

    #[test]
    fn format_tag_reads_header() {
        let p = ImagePayload::new("data:image/webp;base64,AAAA");
        assert_eq!(p.format_tag(), "webp");
        let p = ImagePayload::new("data:image/JPEG;base64,AAAA");
        assert_eq!(p.format_tag(), "jpeg");
        assert_eq!(p.extension(), "jpg");
    }

    #[test]
    fn format_tag_defaults_to_png() {
        let p = ImagePayload::new("data:application/octet-stream;base64,AAAA");
        assert_eq!(p.format_tag(), "png");
    }

    #[test]
    fn decode_recovers_bytes() {
        let p = ImagePayload::from_bytes(b"hello", "image/png");
        assert!(p.as_str().starts_with("data:image/png;base64,"));
        assert_eq!(p.decode().unwrap(), b"hello");
    }

    #[test]
    fn decode_rejects_garbage() {
        let p = ImagePayload::new("not a data url");
        assert!(matches!(p.decode(), Err(TrackerError::ImageDecode(_))));
        let p = ImagePayload::new("data:image/png;base64,@@@@");
        assert!(matches!(p.decode(), Err(TrackerError::ImageDecode(_))));
    }

    #[test]
    fn payload_serializes_as_plain_string() {
        let p = ImagePayload::new("data:image/png;base64,AAAA");
        assert_eq!(
            serde_json::to_string(&p).unwrap(),
            "\"data:image/png;base64,AAAA\""
        );
    }

    #[tokio::test]
    async fn resolve_attachments_keeps_input_order() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        let b = dir.path().join("b.jpg");
        std::fs::write(&a, b"first").unwrap();
        std::fs::write(&b, b"second").unwrap();

        let payloads = resolve_attachments(&[a, b]).await.unwrap();
        assert_eq!(payloads.len(), 2);
        assert_eq!(payloads[0].format_tag(), "png");
        assert_eq!(payloads[0].decode().unwrap(), b"first");
        assert_eq!(payloads[1].format_tag(), "jpeg");
        assert_eq!(payloads[1].decode().unwrap(), b"second");
    }

    #[tokio::test]
    async fn resolve_attachments_fails_on_missing_file() {
        let dir = TempDir::new().unwrap();
        let a = dir.path().join("a.png");
        std::fs::write(&a, b"first").unwrap();
        let missing = dir.path().join("missing.png");

        let result = resolve_attachments(&[a, missing]).await;
        assert!(matches!(result, Err(TrackerError::Io(_))));
    }

    #[tokio::test]
    async fn resolve_attachment_rejects_non_images() {
        let dir = TempDir::new().unwrap();
        let notes = dir.path().join("notes.txt");
        std::fs::write(&notes, b"hi").unwrap();
        let result = resolve_attachment(notes).await;
        assert!(matches!(result, Err(TrackerError::UnsupportedImage { .. })));
    }

    #[test]
    fn export_same_format_copies_bytes() {
        let dir = TempDir::new().unwrap();
        let bytes = png_bytes();
        let p = ImagePayload::from_bytes(&bytes, "image/png");
        let written = export(&p, &dir.path().join("out.png"), "png").unwrap();
        assert_eq!(std::fs::read(written).unwrap(), bytes);
    }

    #[test]
    fn export_adds_missing_extension() {
        let dir = TempDir::new().unwrap();
        let p = ImagePayload::from_bytes(&png_bytes(), "image/png");
        let written = export(&p, &dir.path().join("out"), "png").unwrap();
        assert_eq!(written, dir.path().join("out.png"));
        assert!(written.exists());
    }

    fn gif_bytes() -> Vec<u8> {
        let img = RgbaImage::from_pixel(2, 2, Rgba([10, 200, 10, 255]));
        let mut out = Vec::new();
        DynamicImage::ImageRgba8(img)
            .write_to(&mut Cursor::new(&mut out), ImageFormat::Gif)
            .unwrap();
        out
    }

    #[test]
    fn export_keeps_tag_format_whatever_the_destination_name() {
        let dir = TempDir::new().unwrap();
        let bytes = png_bytes();
        let p = ImagePayload::from_bytes(&bytes, "image/png");
        let written = export(&p, &dir.path().join("out.jpg"), "png").unwrap();
        assert_eq!(written, dir.path().join("out.jpg"));
        let data = std::fs::read(written).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Png);
        assert_eq!(data, bytes);
    }

    #[test]
    fn export_converts_other_tags_to_png() {
        let dir = TempDir::new().unwrap();
        let p = ImagePayload::from_bytes(&gif_bytes(), "image/gif");
        let written = export(&p, &dir.path().join("out"), "png").unwrap();
        assert_eq!(written, dir.path().join("out.png"));
        let data = std::fs::read(written).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::Png);
    }

    #[test]
    fn export_uses_default_format_for_other_tags() {
        let dir = TempDir::new().unwrap();
        let p = ImagePayload::from_bytes(&png_bytes(), "image/x-unknown");
        let written = export(&p, &dir.path().join("out"), "webp").unwrap();
        assert_eq!(written, dir.path().join("out.webp"));
        let data = std::fs::read(written).unwrap();
        assert_eq!(image::guess_format(&data).unwrap(), ImageFormat::WebP);
    }

    #[test]
    fn export_unencodable_default_falls_back_to_png() {
        let dir = TempDir::new().unwrap();
        let p = ImagePayload::from_bytes(&gif_bytes(), "image/gif");
        let written = export(&p, &dir.path().join("out"), "tiff").unwrap();
        assert_eq!(written, dir.path().join("out.png"));
    }

    #[test]
    fn export_copies_avif_through() {
        let dir = TempDir::new().unwrap();
        let p = ImagePayload::from_bytes(b"avif-bytes", "image/avif");
        let written = export(&p, &dir.path().join("out"), "png").unwrap();
        assert_eq!(written, dir.path().join("out.avif"));
        assert_eq!(std::fs::read(written).unwrap(), b"avif-bytes");
    }

    #[test]
    fn export_failure_leaves_no_file() {
        let dir = TempDir::new().unwrap();
        // Tagged gif but the bytes are not an image, so conversion fails.
        let p = ImagePayload::from_bytes(b"definitely not a gif", "image/gif");
        let dest = dir.path().join("out.png");
        assert!(export(&p, &dest, "png").is_err());
        assert!(!dest.exists());
    }

    #[test]
    fn materialize_writes_decoded_file() {
        let dir = TempDir::new().unwrap();
        let p = ImagePayload::from_bytes(b"jpeg-bytes", "image/jpeg");
        let path = materialize(&p, dir.path(), "project-0").unwrap();
        assert_eq!(path, dir.path().join("project-0.jpg"));
        assert_eq!(std::fs::read(path).unwrap(), b"jpeg-bytes");
    }
}
