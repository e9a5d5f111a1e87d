//! CLI command implementations.

mod publish;

pub(crate) use publish::PublishArgs;
pub(crate) use test::TestArgs;

use np_config::{Config, SiteConfig};
use np_wordpress::WpClient;

use crate::error::CliError;
use crate::output::Output;

/// Require a validated `[site]` section, printing a config hint when it is
/// missing.
pub(crate) fn require_site_config<'a>(
    config: &'a Config,
    output: &Output,
) -> Result<&'a SiteConfig, CliError> {
    let site = config.site.as_ref().ok_or_else(|| {
        output.error("Error: site configuration required in np.toml");
        output.info("\nAdd the following to your np.toml:");
        output.info("\n[site]");
        output.info(r#"base_url = "https://blog.example.com""#);
        output.info(r#"username = "admin""#);
        output.info(r#"app_password = "${WP_APP_PASSWORD}""#);
        CliError::Validation("site configuration required".to_owned())
    })?;
    site.validate()?;
    Ok(site)
}

/// Build a client from the validated site section.
pub(crate) fn create_client(site: &SiteConfig) -> WpClient {
    WpClient::new(&site.base_url, &site.username, &site.app_password)
}
