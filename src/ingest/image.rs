//! Image ingestion: inline `data:` payloads are decoded and stored, URLs pass through.

use base64::Engine;
use chrono::Utc;

use super::PipelineError;
use crate::db::BlobStore;

/// Prefix that marks an inline image payload.
const INLINE_PREFIX: &str = "data:image";

/// Blob path prefix for recipe images.
pub const RECIPE_IMAGE_DIR: &str = "recipes";

/// A decoded inline image.
#[derive(Debug, PartialEq)]
pub struct InlineImage {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Resolve the image field of a recipe to a URL.
///
/// Empty input yields an empty URL. Inline payloads cause exactly one blob write.
pub async fn ingest(
    blobs: &dyn BlobStore,
    image: Option<&str>,
    name_hint: &str,
) -> Result<String, PipelineError> {
    let image = match image {
        Some(image) if !image.is_empty() => image,
        _ => return Ok(String::new()),
    };

    if !image.starts_with(INLINE_PREFIX) {
        return Ok(image.to_string());
    }

    let (content_type, payload) = split_data_url(image)?;
    let inline = decode(content_type, payload)?;

    let path = format!(
        "{}/{}",
        RECIPE_IMAGE_DIR,
        storage_key(name_hint, Utc::now().timestamp_millis())
    );

    let stored = blobs
        .put(&path, inline.bytes, &inline.content_type)
        .await
        .map_err(|e| PipelineError::UploadFailure(e.message()))?;
    let url = blobs
        .resolve_url(&stored)
        .await
        .map_err(|e| PipelineError::UploadFailure(e.message()))?;

    tracing::debug!("Stored inline image at {} ({})", path, inline.content_type);
    Ok(url)
}

/// Split `data:<mime>;base64,<payload>` into its MIME type and payload.
pub fn split_data_url(data: &str) -> Result<(&str, &str), PipelineError> {
    let invalid = || {
        PipelineError::InvalidImageData(
            "expected data:<mime>;base64,<payload>".to_string(),
        )
    };

    let rest = data.strip_prefix("data:").ok_or_else(invalid)?;
    let (mime, payload) = rest.split_once(";base64,").ok_or_else(invalid)?;

    let mime_ok = !mime.is_empty()
        && mime
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '/' | '+' | '-' | '.'));
    if !mime_ok || payload.is_empty() {
        return Err(invalid());
    }

    Ok((mime, payload))
}

/// Decode a base64 payload. Decode errors count as upload failures.
pub fn decode(content_type: &str, payload: &str) -> Result<InlineImage, PipelineError> {
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(payload.trim())
        .map_err(|e| PipelineError::UploadFailure(format!("image payload: {}", e)))?;

    Ok(InlineImage {
        content_type: content_type.to_string(),
        bytes,
    })
}

/// `<name>-<millis>`, with the name reduced to URL-safe characters.
pub fn storage_key(name_hint: &str, epoch_millis: i64) -> String {
    let safe: String = name_hint
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    let safe = if safe.is_empty() { "image" } else { &safe };
    format!("{}-{}", safe, epoch_millis)
}
