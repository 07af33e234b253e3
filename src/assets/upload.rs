use std::path::Path;

use crate::UploadError;

pub const MAX_UPLOAD_MB: u64 = 10;
pub const MAX_UPLOAD_BYTES: u64 = MAX_UPLOAD_MB * 1024 * 1024;
pub const ALLOWED_MIME_TYPES: [&str; 3] = ["image/png", "image/jpeg", "image/webp"];

/// Check a candidate file before decoding. Type is checked before size.
pub fn validate_upload(mime: &str, size_bytes: u64) -> Result<(), UploadError> {
    let mime = mime.trim().to_ascii_lowercase();
    if !ALLOWED_MIME_TYPES.contains(&mime.as_str()) {
        return Err(UploadError::UnsupportedType { mime });
    }
    if size_bytes > MAX_UPLOAD_BYTES {
        return Err(UploadError::TooLarge {
            size_bytes,
            max_mb: MAX_UPLOAD_MB,
        });
    }
    Ok(())
}

/// MIME type implied by a file extension, if it is one we know.
pub fn mime_for_path(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        _ => None,
    }
}

/// MIME type detected from the leading bytes.
pub fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    let format = image::guess_format(bytes).ok()?;
    Some(format.to_mime_type())
}
