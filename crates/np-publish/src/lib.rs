//! Publish orchestration.
//!
//! This crate sequences the end-to-end publish of a markdown document:
//! scope validation, image discovery and upload, rendering, taxonomy
//! resolution, the create-or-update submission, and the frontmatter
//! write-back of server-assigned identifiers.
//!
//! Collaborators are trait seams: [`Vault`] abstracts document and file
//! access, [`ContentApi`] abstracts the remote content API. The filesystem
//! vault and the real WordPress client implement them; in-memory test
//! doubles live behind the `mock` feature.
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use np_publish::{FsVault, Publisher, PublishOptions, PublishSettings};
//! use np_wordpress::WpClient;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let vault = FsVault::new(".");
//! let client = WpClient::new("https://blog.example.com", "admin", "app-password");
//! let publisher = Publisher::new(&vault, &client, PublishSettings::default());
//!
//! let report = publisher.publish(Path::new("posts/hello.md"), &PublishOptions::default())?;
//! println!("published as {}", report.url);
//! # Ok(())
//! # }
//! ```

mod api;
mod error;
mod media;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
mod publisher;
mod vault;

pub use api::ContentApi;
pub use error::PublishError;
pub use publisher::{
    Diagnostic, DiagnosticKind, PublishOptions, PublishReport, PublishSettings, Publisher,
};
pub use vault::{FsVault, Vault, VaultError};
