//! Media upload operations.

use tracing::info;

use super::WpClient;
use crate::error::WordPressError;
use crate::types::Media;

impl WpClient {
    /// Upload a file to the media library.
    ///
    /// The body is the raw file content; WordPress takes the target filename
    /// from the `Content-Disposition` header and the type from
    /// `Content-Type`.
    pub fn upload_media(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Media, WordPressError> {
        let url = format!("{}/media", self.api_url());

        info!("Uploading media '{filename}' ({} bytes)", data.len());

        let disposition = format!("attachment; filename=\"{filename}\"");
        self.post_binary(&url, content_type, &disposition, data)
    }
}
