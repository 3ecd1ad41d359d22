//! Image loading and inline encoding.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use super::error::TranscriptionError;

/// MIME type advertised in the data URL. Every image is labelled JPEG;
/// the hosted vision models sniff the actual format.
pub const IMAGE_MIME_TYPE: &str = "image/jpeg";

/// Reads the whole file and returns it as standard (padded) base64.
///
/// # Errors
/// - If the file cannot be read (missing, permission denied, ...)
pub fn encode_image(path: &Path) -> Result<String, TranscriptionError> {
    let bytes = std::fs::read(path).map_err(|source| TranscriptionError::ImageRead {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::debug!("Read {} bytes from {}", bytes.len(), path.display());

    Ok(STANDARD.encode(bytes))
}

/// Wraps base64 image data in a `data:` URL.
pub fn image_data_url(b64_image: &str) -> String {
    format!("data:{IMAGE_MIME_TYPE};base64,{b64_image}")
}
