//! Configuration management for notepress.
//!
//! Parses `np.toml` configuration files with serde and provides
//! auto-discovery of config files in parent directories.
//!
//! CLI settings can be applied during load via [`CliSettings`].
//!
//! ## Environment Variable Expansion
//!
//! String configuration values support environment variable expansion:
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base_url`
//! - `site.username`
//! - `site.app_password`

mod expand;

use std::path::{Path, PathBuf};

use serde::Deserialize;

use expand::expand_env;

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "np.toml";

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override the publishable source directory.
    pub source_dir: Option<String>,
    /// Override the upload-images flag.
    pub upload_images: Option<bool>,
}

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Target site connection (required for any remote operation).
    pub site: Option<SiteConfig>,
    /// Publishing behavior.
    pub publish: PublishConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Target site connection settings.
#[derive(Debug, Deserialize)]
pub struct SiteConfig {
    /// Site base URL (e.g. `https://blog.example.com`).
    pub base_url: String,
    /// WordPress user name.
    pub username: String,
    /// Application password for that user.
    pub app_password: String,
}

impl SiteConfig {
    /// Validate that all required fields are properly set.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if any field is empty or has an
    /// invalid format.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.base_url, "site.base_url")?;
        require_http_url(&self.base_url, "site.base_url")?;
        require_non_empty(&self.username, "site.username")?;
        require_non_empty(&self.app_password, "site.app_password")?;
        Ok(())
    }
}

/// Publishing behavior.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PublishConfig {
    /// Folder (relative to the config file) documents must live in to be
    /// publishable. `None` allows the whole vault.
    pub source_dir: Option<String>,
    /// Status used when a document does not set one.
    pub default_status: String,
    /// Whether local images are uploaded.
    pub upload_images: bool,
}

impl Default for PublishConfig {
    fn default() -> Self {
        Self {
            source_dir: None,
            default_status: "draft".to_owned(),
            upload_images: true,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.app_password`").
        field: String,
        /// Error message (e.g., "${`WP_APP_PASSWORD`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

/// Require a URL field to use http:// or https:// scheme.
fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise,
    /// searches for `np.toml` in the current directory and parents.
    ///
    /// CLI settings are applied after loading, so CLI arguments take
    /// precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicit `config_path` doesn't exist, parsing
    /// fails, or environment expansion fails.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, ConfigError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default()
        };

        if let Some(cli) = cli_settings {
            config.apply_cli_settings(cli);
        }
        Ok(config)
    }

    /// Load and parse one file, expanding environment references in the
    /// site section.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;
        config.config_path = Some(path.to_path_buf());

        if let Some(site) = &mut config.site {
            site.base_url = expand_env(&site.base_url, "site.base_url")?;
            site.username = expand_env(&site.username, "site.username")?;
            site.app_password = expand_env(&site.app_password, "site.app_password")?;
        }
        Ok(config)
    }

    /// Search for `np.toml` in the current directory and its parents.
    fn discover_config() -> Option<PathBuf> {
        let mut dir = std::env::current_dir().ok()?;
        loop {
            let candidate = dir.join(CONFIG_FILENAME);
            if candidate.is_file() {
                return Some(candidate);
            }
            if !dir.pop() {
                return None;
            }
        }
    }

    fn apply_cli_settings(&mut self, cli: &CliSettings) {
        if let Some(source_dir) = &cli.source_dir {
            self.publish.source_dir = Some(source_dir.clone());
        }
        if let Some(upload_images) = cli.upload_images {
            self.publish.upload_images = upload_images;
        }
    }

    /// Directory the config file lives in, used as the vault root.
    #[must_use]
    pub fn base_dir(&self) -> PathBuf {
        self.config_path
            .as_deref()
            .and_then(Path::parent)
            .map_or_else(|| PathBuf::from("."), Path::to_path_buf)
    }
}
