//! WordPress REST API client.
//!
//! Sync HTTP client for the `wp/v2` namespace with application-password
//! (HTTP Basic) authentication.

mod media;
mod posts;
mod terms;

use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::Serialize;
use serde::de::DeserializeOwned;
use ureq::Agent;

use crate::error::WordPressError;

pub use terms::TaxonomyKind;

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// WordPress REST API client.
pub struct WpClient {
    agent: Agent,
    base_url: String,
    auth_header: String,
}

impl WpClient {
    /// Create a client for a site.
    ///
    /// # Arguments
    /// * `base_url` - site base URL (e.g. `https://blog.example.com`)
    /// * `username` - WordPress user name
    /// * `app_password` - application password for that user
    #[must_use]
    pub fn new(base_url: &str, username: &str, app_password: &str) -> Self {
        let agent: Agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        let credentials = STANDARD.encode(format!("{username}:{app_password}"));
        Self {
            agent,
            base_url: base_url.trim_end_matches('/').to_owned(),
            auth_header: format!("Basic {credentials}"),
        }
    }

    /// Get the REST namespace base URL.
    fn api_url(&self) -> String {
        format!("{}/wp-json/wp/v2", self.base_url)
    }

    pub(crate) fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, WordPressError> {
        let response = self
            .agent
            .get(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .call()?;
        Self::decode(response)
    }

    pub(crate) fn post_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T, WordPressError> {
        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send_json(body)?;
        Self::decode(response)
    }

    pub(crate) fn put_json<T: DeserializeOwned>(
        &self,
        url: &str,
        body: &impl Serialize,
    ) -> Result<T, WordPressError> {
        let response = self
            .agent
            .put(url)
            .header("Authorization", &self.auth_header)
            .header("Accept", "application/json")
            .send_json(body)?;
        Self::decode(response)
    }

    pub(crate) fn post_binary<T: DeserializeOwned>(
        &self,
        url: &str,
        content_type: &str,
        content_disposition: &str,
        data: &[u8],
    ) -> Result<T, WordPressError> {
        let response = self
            .agent
            .post(url)
            .header("Authorization", &self.auth_header)
            .header("Content-Type", content_type)
            .header("Content-Disposition", content_disposition)
            .header("Accept", "application/json")
            .send(data)?;
        Self::decode(response)
    }

    /// Decode a response, turning `status >= 400` into a typed error with
    /// the decoded error message.
    fn decode<T: DeserializeOwned>(
        response: ureq::http::Response<ureq::Body>,
    ) -> Result<T, WordPressError> {
        let status = response.status().as_u16();
        let mut body = response.into_body();

        if status >= 400 {
            let error_body = body
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(WordPressError::from_response(status, &error_body));
        }

        Ok(body.read_json()?)
    }
}
