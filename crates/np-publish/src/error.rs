//! Publish error types.

use crate::vault::VaultError;
use np_wordpress::WordPressError;

/// Fatal error aborting a publish.
///
/// Per-image and per-taxonomy-name failures are not represented here; they
/// are collected as [`crate::Diagnostic`]s on the report instead.
#[derive(Debug, thiserror::Error)]
pub enum PublishError {
    /// Missing or invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// Document outside the publishable scope.
    #[error("{0}")]
    Scope(String),

    /// Document or file access failed.
    #[error(transparent)]
    Vault(#[from] VaultError),

    /// Remote API call failed.
    #[error(transparent)]
    Api(#[from] WordPressError),
}
