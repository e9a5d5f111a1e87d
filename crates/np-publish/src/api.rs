//! Remote content API seam.

use np_wordpress::{Media, Post, PostPayload, TaxonomyKind, Term, WordPressError, WpClient};

/// The remote operations a publish needs.
///
/// Implemented by [`WpClient`] for real publishes and by the mock in tests.
pub trait ContentApi {
    /// Create a new post.
    fn create_post(&self, payload: &PostPayload) -> Result<Post, WordPressError>;

    /// Update an existing post.
    fn update_post(&self, id: u64, payload: &PostPayload) -> Result<Post, WordPressError>;

    /// Upload a file to the media library.
    fn upload_media(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Media, WordPressError>;

    /// Resolve a taxonomy name to a term, creating it when absent.
    fn resolve_term(&self, kind: TaxonomyKind, name: &str) -> Result<Term, WordPressError>;
}

impl ContentApi for WpClient {
    fn create_post(&self, payload: &PostPayload) -> Result<Post, WordPressError> {
        Self::create_post(self, payload)
    }

    fn update_post(&self, id: u64, payload: &PostPayload) -> Result<Post, WordPressError> {
        Self::update_post(self, id, payload)
    }

    fn upload_media(
        &self,
        filename: &str,
        content_type: &str,
        data: &[u8],
    ) -> Result<Media, WordPressError> {
        Self::upload_media(self, filename, content_type, data)
    }

    fn resolve_term(&self, kind: TaxonomyKind, name: &str) -> Result<Term, WordPressError> {
        Self::resolve_term(self, kind, name)
    }
}
