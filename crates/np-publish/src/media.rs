//! Image upload helpers.

/// MIME type for an image file extension.
///
/// Returns `None` for anything outside the upload allow-list; such files
/// are skipped with a warning, not an error.
pub(crate) fn mime_for_extension(extension: &str) -> Option<&'static str> {
    match extension.to_ascii_lowercase().as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "svg" => Some("image/svg+xml"),
        _ => None,
    }
}
