//! Image reference discovery and upload-map lookup.
//!
//! Two embed syntaxes are recognized: the wikilink form `![[path|alt]]` and
//! the classic form `![alt](path)`. References are mapped to uploaded URLs
//! by path, not by occurrence, so repeated embeds of one file resolve to the
//! same upload.

use std::collections::HashMap;
use std::sync::LazyLock;

use regex::Regex;

pub(crate) static WIKILINK_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[\[([^\]|]+)(?:\|([^\]]*))?\]\]").unwrap());

pub(crate) static MARKDOWN_IMAGE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[([^\]]*)\]\(([^)]+)\)").unwrap());

/// Which embed syntax an [`ImageRef`] was written in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageSyntax {
    /// `![[path]]` or `![[path|alt]]`.
    Wikilink,
    /// `![alt](path)`.
    Markdown,
}

/// A single image reference found in document text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRef {
    /// The exact matched text.
    pub raw: String,
    /// Referenced path or URL, as written.
    pub path: String,
    /// Explicit alt text, if the syntax carried one.
    pub alt: Option<String>,
    /// Syntax variant of the match.
    pub syntax: ImageSyntax,
}

impl ImageRef {
    pub(crate) fn from_wikilink_captures(caps: &regex::Captures<'_>) -> Self {
        Self {
            raw: caps[0].to_owned(),
            path: caps[1].trim().to_owned(),
            alt: caps.get(2).map(|m| m.as_str().to_owned()),
            syntax: ImageSyntax::Wikilink,
        }
    }

    pub(crate) fn from_markdown_captures(caps: &regex::Captures<'_>) -> Self {
        Self {
            raw: caps[0].to_owned(),
            path: caps[2].trim().to_owned(),
            alt: Some(caps[1].to_owned()),
            syntax: ImageSyntax::Markdown,
        }
    }

    /// Parse a line whose entire (trimmed) content is one image reference.
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        let trimmed = line.trim();
        discover_images(trimmed)
            .into_iter()
            .next()
            .filter(|image| image.raw == trimmed)
    }

    /// True for references that point at a remote URL rather than a vault
    /// file.
    #[must_use]
    pub fn is_external(&self) -> bool {
        self.path.starts_with("http://") || self.path.starts_with("https://")
    }

    /// Alt text for rendering: the explicit alt, or the file stem of the
    /// path when the wikilink form omitted one.
    #[must_use]
    pub fn alt_text(&self) -> String {
        if let Some(alt) = &self.alt {
            return alt.clone();
        }
        std::path::Path::new(&self.path)
            .file_stem()
            .map(|stem| stem.to_string_lossy().into_owned())
            .unwrap_or_default()
    }
}

/// Find every image reference in `text`, in document order.
#[must_use]
pub fn discover_images(text: &str) -> Vec<ImageRef> {
    let mut found: Vec<(usize, ImageRef)> = Vec::new();

    for caps in WIKILINK_IMAGE.captures_iter(text) {
        let start = caps.get(0).map_or(0, |m| m.start());
        found.push((start, ImageRef::from_wikilink_captures(&caps)));
    }
    for caps in MARKDOWN_IMAGE.captures_iter(text) {
        let start = caps.get(0).map_or(0, |m| m.start());
        found.push((start, ImageRef::from_markdown_captures(&caps)));
    }

    found.sort_by_key(|(start, _)| *start);
    found.into_iter().map(|(_, image)| image).collect()
}

/// Uploaded-image lookup: local path to remote URL.
///
/// Built per publish; a path absent from the map resolves to itself so
/// rendering degrades to the literal local path instead of failing.
#[derive(Debug, Clone, Default)]
pub struct ImageMap {
    urls: HashMap<String, String>,
}

impl ImageMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the remote URL for a local path.
    pub fn insert(&mut self, path: impl Into<String>, url: impl Into<String>) {
        self.urls.insert(path.into(), url.into());
    }

    /// Look up the remote URL for a path.
    #[must_use]
    pub fn get(&self, path: &str) -> Option<&str> {
        self.urls.get(path).map(String::as_str)
    }

    /// Resolve a path to its remote URL, falling back to the path itself.
    #[must_use]
    pub fn resolve<'a>(&'a self, path: &'a str) -> &'a str {
        self.get(path).unwrap_or(path)
    }

    /// Number of recorded uploads.
    #[must_use]
    pub fn len(&self) -> usize {
        self.urls.len()
    }

    /// True when no uploads are recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }
}
