use crate::models::ImageReference;
use base64::Engine as _;

/// Sniff an image MIME type from its magic bytes, defaulting to PNG.
pub fn detect_image_mime(bytes: &[u8]) -> &'static str {
    match bytes {
        [0xFF, 0xD8, 0xFF, ..] => "image/jpeg",
        [0x89, 0x50, 0x4E, 0x47, ..] => "image/png",
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => "image/webp",
        _ => "image/png",
    }
}

/// Decode a provider's base64 payload and wrap it as an inline image reference.
///
/// Decoding validates the payload and lets the MIME type follow the actual bytes.
pub fn inline_image_from_base64(payload: &str) -> Result<ImageReference, base64::DecodeError> {
    let engine = base64::engine::general_purpose::STANDARD;
    let bytes = engine.decode(payload.trim())?;
    Ok(ImageReference::inline(
        detect_image_mime(&bytes),
        &engine.encode(&bytes),
    ))
}
