//! `np publish` command implementation.

use std::path::PathBuf;

use clap::Args;

use np_config::{CliSettings, Config};
use np_markdown::PostStatus;
use np_publish::{FsVault, PublishOptions, PublishReport, PublishSettings, Publisher};

use crate::error::CliError;
use crate::output::Output;

use super::{create_client, require_site_config};

/// Arguments for the publish command.
#[derive(Args)]
pub(crate) struct PublishArgs {
    /// Path to the markdown document, relative to the config directory.
    document: PathBuf,

    /// Post status override (draft, publish, private, future).
    #[arg(short, long)]
    status: Option<String>,

    /// Skip uploading local images.
    #[arg(long)]
    no_images: bool,

    /// Path to configuration file (default: auto-discover np.toml).
    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl PublishArgs {
    /// Execute the publish command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the publish
    /// fails.
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            upload_images: self.no_images.then_some(false),
            ..CliSettings::default()
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        let site = require_site_config(&config, &output)?;
        let client = create_client(site);

        let settings = PublishSettings {
            publish_dir: config.publish.source_dir.clone().map(PathBuf::from),
            default_status: parse_status(&config.publish.default_status)?,
            upload_images: config.publish.upload_images,
        };
        let options = PublishOptions {
            status: self.status.as_deref().map(parse_status).transpose()?,
        };

        let vault = FsVault::new(config.base_dir());
        let publisher = Publisher::new(&vault, &client, settings);

        output.info(&format!("Publishing {}...", self.document.display()));
        let report = publisher.publish(&self.document, &options)?;
        print_report(&output, &report);

        Ok(())
    }
}

fn parse_status(name: &str) -> Result<PostStatus, CliError> {
    PostStatus::from_name(name).ok_or_else(|| {
        CliError::Validation(format!(
            "unknown status '{name}' (expected draft, publish, private or future)"
        ))
    })
}

fn print_report(output: &Output, report: &PublishReport) {
    if report.created {
        output.success("\nPost created successfully!");
    } else {
        output.success("\nPost updated successfully!");
    }
    output.info(&format!("ID: {}", report.post_id));
    output.info(&format!("Status: {}", report.status));
    output.info(&format!("URL: {}", report.url));

    if report.images_uploaded > 0 {
        output.info(&format!("Images uploaded: {}", report.images_uploaded));
    }

    if !report.diagnostics.is_empty() {
        output.warning(&format!(
            "\nWarning: {} item(s) were skipped:",
            report.diagnostics.len()
        ));
        for diagnostic in &report.diagnostics {
            output.info(&format!(
                "  - {}: {}",
                diagnostic.subject, diagnostic.message
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_status_known_names() {
        assert_eq!(parse_status("draft").unwrap(), PostStatus::Draft);
        assert_eq!(parse_status("Publish").unwrap(), PostStatus::Publish);
    }

    #[test]
    fn test_parse_status_unknown_name() {
        let err = parse_status("pending").unwrap_err();
        assert!(err.to_string().contains("pending"));
    }
}
