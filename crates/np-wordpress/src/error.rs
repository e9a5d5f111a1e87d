//! Error types for the WordPress client.

use crate::types::ErrorBody;

/// Error from WordPress API operations.
#[derive(Debug, thiserror::Error)]
pub enum WordPressError {
    /// HTTP request failed (network error, timeout, etc).
    #[error("HTTP request failed: {0}")]
    HttpRequest(#[from] ureq::Error),

    /// HTTP response error (server returned error status).
    #[error("HTTP error {status}: {message}")]
    HttpResponse {
        /// HTTP status code.
        status: u16,
        /// Decoded error message, or the raw body when undecodable.
        message: String,
    },
}

impl WordPressError {
    /// Build a response error, extracting `code`/`message` from the
    /// WordPress error body when the body is JSON.
    pub(crate) fn from_response(status: u16, body: &str) -> Self {
        let message = serde_json::from_str::<ErrorBody>(body)
            .map_or_else(|_| body.to_owned(), |e| format!("{} [{}]", e.message, e.code));
        Self::HttpResponse { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_response_decodes_error_body() {
        let body = r#"{"code":"rest_post_invalid_id","message":"Invalid post ID."}"#;
        let err = WordPressError::from_response(404, body);
        assert_eq!(
            err.to_string(),
            "HTTP error 404: Invalid post ID. [rest_post_invalid_id]"
        );
    }

    #[test]
    fn test_from_response_falls_back_to_raw_body() {
        let err = WordPressError::from_response(502, "Bad Gateway");
        assert_eq!(err.to_string(), "HTTP error 502: Bad Gateway");
    }
}
