//! Obsidian-flavored markdown to WordPress Gutenberg block markup.
//!
//! The conversion runs in two passes:
//!
//! 1. [`segment`] partitions the document body into typed [`Block`]s using a
//!    single left-to-right line scan with fixed classification precedence.
//! 2. [`BlockRenderer`] maps each block to one Gutenberg block template,
//!    running the [`InlineFormatter`] over textual content and resolving
//!    image paths through an [`ImageMap`].
//!
//! The leading metadata block of a document is handled separately by the
//! [`frontmatter`] codec, which parses, merges and rewrites the recognized
//! post properties without ever failing on malformed input.
//!
//! # Example
//!
//! ```
//! use np_markdown::{ImageMap, render_document};
//!
//! let body = "# Hello\n\nSome **bold** text.";
//! let html = render_document(body, &ImageMap::new());
//! assert!(html.contains("<strong>bold</strong>"));
//! ```

mod escape;
pub mod frontmatter;
mod images;
mod inline;
mod render;
mod segment;

pub use escape::escape_html;
pub use frontmatter::{Frontmatter, PostStatus};
pub use images::{ImageMap, ImageRef, ImageSyntax, discover_images};
pub use inline::InlineFormatter;
pub use render::{BlockRenderer, render_document};
pub use segment::{Block, Callout, Fold, segment};
