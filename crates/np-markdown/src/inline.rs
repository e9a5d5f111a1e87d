//! Inline formatting.
//!
//! A fixed, ordered sequence of pattern substitutions over a block's text.
//! The order is part of the contract: embedded images are resolved before
//! the generic link pattern could re-match their bracket syntax, triple
//! emphasis markers before double and single ones. Every substitution is
//! global and a no-op when nothing matches.
//!
//! Code span content is passed through without HTML escaping; the span
//! boundaries are the only markup added.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::escape::escape_html;
use crate::images::{ImageMap, ImageRef};

static WIKILINK_LABELED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[\[[^\]|]+\|([^\]]+)\]\]").unwrap());

static WIKILINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[\[([^\]]+)\]\]").unwrap());

static BOLD_ITALIC_STARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*\*([^*]+)\*\*\*").unwrap());

static BOLD_ITALIC_UNDERSCORES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"___([^_]+)___").unwrap());

static BOLD_STARS: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*\*([^*]+)\*\*").unwrap());

static BOLD_UNDERSCORES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"__([^_]+)__").unwrap());

static ITALIC_STAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\*([^*]+)\*").unwrap());

// The regex crate has no lookaround; the non-alphabetic neighbors required
// by the underscore form are captured and re-inserted instead.
static ITALIC_UNDERSCORE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(^|[^A-Za-z])_([^_]+)_([^A-Za-z]|$)").unwrap());

static STRIKETHROUGH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"~~([^~]+)~~").unwrap());

static CODE_SPAN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"`([^`]+)`").unwrap());

static HIGHLIGHT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"==([^=]+)==").unwrap());

static LINK: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\(([^)]+)\)").unwrap());

/// Ordered inline substitution pipeline.
pub struct InlineFormatter<'a> {
    images: &'a ImageMap,
}

impl<'a> InlineFormatter<'a> {
    /// Create a formatter resolving image paths through `images`.
    #[must_use]
    pub fn new(images: &'a ImageMap) -> Self {
        Self { images }
    }

    /// Apply every substitution, in order, to `text`.
    #[must_use]
    pub fn format(&self, text: &str) -> String {
        let mut out = self.replace_images(text);
        out = WIKILINK_LABELED.replace_all(&out, "${1}").into_owned();
        out = WIKILINK.replace_all(&out, "${1}").into_owned();
        out = BOLD_ITALIC_STARS
            .replace_all(&out, "<strong><em>${1}</em></strong>")
            .into_owned();
        out = BOLD_ITALIC_UNDERSCORES
            .replace_all(&out, "<strong><em>${1}</em></strong>")
            .into_owned();
        out = BOLD_STARS
            .replace_all(&out, "<strong>${1}</strong>")
            .into_owned();
        out = BOLD_UNDERSCORES
            .replace_all(&out, "<strong>${1}</strong>")
            .into_owned();
        out = ITALIC_STAR.replace_all(&out, "<em>${1}</em>").into_owned();
        out = ITALIC_UNDERSCORE
            .replace_all(&out, "${1}<em>${2}</em>${3}")
            .into_owned();
        out = STRIKETHROUGH.replace_all(&out, "<del>${1}</del>").into_owned();
        out = CODE_SPAN.replace_all(&out, "<code>${1}</code>").into_owned();
        out = HIGHLIGHT.replace_all(&out, "<mark>${1}</mark>").into_owned();
        out = LINK
            .replace_all(&out, r#"<a href="${2}">${1}</a>"#)
            .into_owned();
        out
    }

    /// Render an image reference as an `<img>` tag, resolving the path
    /// through the upload map (falling back to the literal local path).
    #[must_use]
    pub fn image_tag(&self, image: &ImageRef) -> String {
        let src = self.images.resolve(&image.path);
        format!(
            r#"<img src="{}" alt="{}"/>"#,
            escape_html(src),
            escape_html(&image.alt_text())
        )
    }

    /// Substitute both embed syntaxes before any bracket pattern can see
    /// them.
    fn replace_images(&self, text: &str) -> String {
        let pass = crate::images::WIKILINK_IMAGE.replace_all(text, |caps: &Captures<'_>| {
            self.image_tag(&ImageRef::from_wikilink_captures(caps))
        });
        crate::images::MARKDOWN_IMAGE
            .replace_all(&pass, |caps: &Captures<'_>| {
                self.image_tag(&ImageRef::from_markdown_captures(caps))
            })
            .into_owned()
    }
}
