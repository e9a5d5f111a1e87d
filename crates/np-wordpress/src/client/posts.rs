//! Post operations.

use tracing::info;

use super::WpClient;
use crate::error::WordPressError;
use crate::types::{Post, PostPayload, User};

impl WpClient {
    /// Fetch the authenticated user. Used as a connection test.
    pub fn current_user(&self) -> Result<User, WordPressError> {
        let url = format!("{}/users/me", self.api_url());
        self.get_json(&url)
    }

    /// Create a new post.
    pub fn create_post(&self, payload: &PostPayload) -> Result<Post, WordPressError> {
        let url = format!("{}/posts", self.api_url());
        info!("Creating post '{}'", payload.title);
        self.post_json(&url, payload)
    }

    /// Update an existing post by id.
    pub fn update_post(&self, id: u64, payload: &PostPayload) -> Result<Post, WordPressError> {
        let url = format!("{}/posts/{id}", self.api_url());
        info!("Updating post {id} ('{}')", payload.title);
        self.put_json(&url, payload)
    }
}
