//! WordPress REST API client.
//!
//! Sync HTTP client for the `wp/v2` REST namespace, authenticated with an
//! application password (HTTP Basic). Covers the operations a publish needs:
//! posts create/update, media upload, taxonomy term lookup and creation, and
//! a connection test against the current user.

mod client;
mod error;
mod types;

pub use client::{TaxonomyKind, WpClient};
pub use error::WordPressError;
pub use types::{Media, Post, PostPayload, Term, User};
