//! CLI error types.

use np_config::ConfigError;
use np_publish::PublishError;
use np_wordpress::WordPressError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    WordPress(#[from] WordPressError),

    #[error("{0}")]
    Publish(#[from] PublishError),

    #[error("{0}")]
    Validation(String),
}
