//! WordPress REST wire types.
//!
//! Responses are decoded into the few fields the publish workflow consumes;
//! the API returns much more, which serde ignores.

use serde::{Deserialize, Serialize};

/// A post, as returned by create/update.
#[derive(Debug, Clone, Deserialize)]
pub struct Post {
    /// Post id.
    pub id: u64,
    /// Public permalink.
    pub link: String,
    /// Status as reported by the server (may be normalized).
    pub status: String,
}

/// An uploaded media item.
#[derive(Debug, Clone, Deserialize)]
pub struct Media {
    /// Media id.
    pub id: u64,
    /// Public URL of the uploaded file.
    pub source_url: String,
}

/// A taxonomy term (category or tag).
#[derive(Debug, Clone, Deserialize)]
pub struct Term {
    /// Term id.
    pub id: u64,
    /// Term name.
    pub name: String,
}

/// The authenticated user, for connection tests.
#[derive(Debug, Clone, Deserialize)]
pub struct User {
    /// User id.
    pub id: u64,
    /// Display name.
    pub name: String,
}

/// WordPress error body (`{"code": ..., "message": ...}`).
#[derive(Debug, Clone, Deserialize)]
pub(crate) struct ErrorBody {
    pub code: String,
    pub message: String,
}

/// Request body for post create/update.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PostPayload {
    /// Post title.
    pub title: String,
    /// Rendered post content.
    pub content: String,
    /// Post status name.
    pub status: String,
    /// URL slug.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Post excerpt.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    /// Publication date (ISO-8601).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    /// Category term ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub categories: Vec<u64>,
    /// Tag term ids.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<u64>,
}
