//! The publish workflow.
//!
//! A publish runs a single linear pass: scope validation, image upload (when
//! enabled), rendering, taxonomy resolution, the create-or-update
//! submission, and the frontmatter write-back. Any fatal failure aborts with
//! one [`PublishError`]; per-image and per-taxonomy-name failures are
//! collected as [`Diagnostic`]s and skipped.
//!
//! Whether a publish creates or updates is decided solely by the
//! `remote_id` frontmatter field: the first successful publish writes it
//! back, every later publish of the same document updates that post.
//! Concurrent publishes of one document are not guarded against; already
//! uploaded images are not rolled back on failure.

use std::path::Path;

use tracing::{debug, warn};

use np_markdown::{Frontmatter, ImageMap, PostStatus, discover_images, render_document};
use np_wordpress::{Post, PostPayload, TaxonomyKind};

use crate::api::ContentApi;
use crate::error::PublishError;
use crate::media::mime_for_extension;
use crate::vault::Vault;

/// Settings a publish runs under, read-only for its duration.
#[derive(Debug, Clone)]
pub struct PublishSettings {
    /// Restrict publishing to documents under this vault-relative folder.
    pub publish_dir: Option<std::path::PathBuf>,
    /// Status used when neither the call nor the frontmatter sets one.
    pub default_status: PostStatus,
    /// Whether local images are uploaded before rendering.
    pub upload_images: bool,
}

impl Default for PublishSettings {
    fn default() -> Self {
        Self {
            publish_dir: None,
            default_status: PostStatus::Draft,
            upload_images: true,
        }
    }
}

/// Per-call options.
#[derive(Debug, Clone, Default)]
pub struct PublishOptions {
    /// Status override; wins over frontmatter and the default setting.
    pub status: Option<PostStatus>,
}

/// What a skipped item was.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagnosticKind {
    /// An image that could not be uploaded.
    Image,
    /// A taxonomy name that could not be resolved.
    Taxonomy,
}

/// A non-fatal, skipped item of an otherwise successful publish.
#[derive(Debug, Clone)]
pub struct Diagnostic {
    /// Item category.
    pub kind: DiagnosticKind,
    /// The image path or taxonomy name.
    pub subject: String,
    /// Why it was skipped.
    pub message: String,
}

/// Outcome of a successful publish.
#[derive(Debug)]
pub struct PublishReport {
    /// Server-assigned post id.
    pub post_id: u64,
    /// Public post URL.
    pub url: String,
    /// Status as reported by the server.
    pub status: String,
    /// True when this publish created the post, false when it updated one.
    pub created: bool,
    /// Number of images uploaded.
    pub images_uploaded: usize,
    /// Items skipped along the way.
    pub diagnostics: Vec<Diagnostic>,
}

/// Publishes documents from a vault to a remote content API.
pub struct Publisher<'a, V, A> {
    vault: &'a V,
    api: &'a A,
    settings: PublishSettings,
}

impl<'a, V: Vault, A: ContentApi> Publisher<'a, V, A> {
    /// Create a publisher.
    pub fn new(vault: &'a V, api: &'a A, settings: PublishSettings) -> Self {
        Self {
            vault,
            api,
            settings,
        }
    }

    /// Publish `document`, creating or updating its remote post.
    ///
    /// # Errors
    ///
    /// Returns [`PublishError`] when the document is out of scope, cannot be
    /// read or written, or the create/update call fails. Individual image
    /// and taxonomy failures do not error; they appear on the report as
    /// diagnostics.
    pub fn publish(
        &self,
        document: &Path,
        options: &PublishOptions,
    ) -> Result<PublishReport, PublishError> {
        self.check_scope(document)?;

        let text = self.vault.read_text(document)?;
        let frontmatter = Frontmatter::parse(&text);
        let (_, body) = np_markdown::frontmatter::split_frontmatter(&text);

        let mut diagnostics = Vec::new();
        let images = if self.settings.upload_images {
            self.upload_images(document, body, &mut diagnostics)
        } else {
            ImageMap::new()
        };
        let images_uploaded = images.len();

        let content = render_document(body, &images);

        let categories =
            self.resolve_terms(TaxonomyKind::Category, &frontmatter.categories, &mut diagnostics);
        let tags = self.resolve_terms(TaxonomyKind::Tag, &frontmatter.tags, &mut diagnostics);

        // Status precedence: per-call override, then frontmatter, then the
        // configured default.
        let status = options
            .status
            .or(frontmatter.status)
            .unwrap_or(self.settings.default_status);

        let title = frontmatter
            .title
            .clone()
            .unwrap_or_else(|| file_stem(document));

        let payload = PostPayload {
            title,
            content,
            status: status.as_str().to_owned(),
            slug: frontmatter.slug.clone(),
            excerpt: frontmatter.excerpt.clone(),
            date: frontmatter.date.clone(),
            categories,
            tags,
        };

        let (post, created) = match frontmatter.remote_id {
            Some(id) => (self.api.update_post(id, &payload)?, false),
            None => (self.api.create_post(&payload)?, true),
        };

        self.write_back(document, &text, &post)?;

        Ok(PublishReport {
            post_id: post.id,
            url: post.link,
            status: post.status,
            created,
            images_uploaded,
            diagnostics,
        })
    }

    /// Authoritative gatekeeping: extension and publishable-folder checks.
    fn check_scope(&self, document: &Path) -> Result<(), PublishError> {
        if document.extension().is_none_or(|ext| ext != "md") {
            return Err(PublishError::Scope(format!(
                "{} is not a markdown document",
                document.display()
            )));
        }
        if let Some(dir) = &self.settings.publish_dir {
            if !document.starts_with(dir) {
                return Err(PublishError::Scope(format!(
                    "{} is outside the publishable folder {}",
                    document.display(),
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    /// Upload every distinct local image referenced by `body`.
    ///
    /// External URLs are skipped outright; each local reference is uploaded
    /// at most once (the map is keyed by path). A failing image is recorded
    /// and skipped, never fatal.
    fn upload_images(
        &self,
        document: &Path,
        body: &str,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> ImageMap {
        let mut images = ImageMap::new();
        for reference in discover_images(body) {
            if reference.is_external() {
                debug!("Skipping external image {}", reference.path);
                continue;
            }
            if images.get(&reference.path).is_some() {
                continue;
            }
            match self.upload_image(document, &reference.path) {
                Ok(url) => images.insert(reference.path.clone(), url),
                Err(message) => {
                    warn!("Skipping image '{}': {message}", reference.path);
                    diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::Image,
                        subject: reference.path.clone(),
                        message,
                    });
                }
            }
        }
        images
    }

    fn upload_image(&self, document: &Path, path: &str) -> Result<String, String> {
        let Some(file) = self.vault.resolve_link(path, document) else {
            return Err("local file not found".to_owned());
        };
        let extension = file
            .extension()
            .and_then(std::ffi::OsStr::to_str)
            .unwrap_or_default();
        let Some(content_type) = mime_for_extension(extension) else {
            return Err(format!("unsupported image type '.{extension}'"));
        };
        let data = self.vault.read_binary(&file).map_err(|e| e.to_string())?;
        let filename = file
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_owned());
        let media = self
            .api
            .upload_media(&filename, content_type, &data)
            .map_err(|e| e.to_string())?;
        Ok(media.source_url)
    }

    /// Resolve taxonomy names to ids, dropping names that fail.
    fn resolve_terms(
        &self,
        kind: TaxonomyKind,
        names: &[String],
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<u64> {
        let mut ids = Vec::new();
        for name in names {
            match self.api.resolve_term(kind, name) {
                Ok(term) => ids.push(term.id),
                Err(err) => {
                    warn!("Dropping {} '{name}': {err}", kind.label());
                    diagnostics.push(Diagnostic {
                        kind: DiagnosticKind::Taxonomy,
                        subject: name.clone(),
                        message: err.to_string(),
                    });
                }
            }
        }
        ids
    }

    /// Persist the server-assigned id, URL and status into the document.
    fn write_back(&self, document: &Path, original: &str, post: &Post) -> Result<(), PublishError> {
        let patch = Frontmatter {
            status: PostStatus::from_name(&post.status),
            remote_id: Some(post.id),
            remote_url: Some(post.link.clone()),
            ..Frontmatter::default()
        };
        let updated = Frontmatter::update(original, &patch);
        self.vault.write_text(document, &updated)?;
        Ok(())
    }
}

fn file_stem(document: &Path) -> String {
    document
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "Untitled".to_owned())
}
