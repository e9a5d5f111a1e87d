//! Block rendering to Gutenberg block markup.
//!
//! One deterministic template per block type. Textual content runs through
//! the [`InlineFormatter`]; code content is escaped and left literal; image
//! paths resolve through the [`ImageMap`] with the local path as fallback.

use std::fmt::Write;
use std::sync::LazyLock;

use regex::Regex;

use crate::escape::escape_html;
use crate::images::ImageMap;
use crate::inline::InlineFormatter;
use crate::segment::{Block, Callout, Fold, segment, strip_quote_prefix};

static LIST_ITEM_TEXT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s+(.*)$").unwrap());

static ORDERED_MARKER: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*\d+\.\s+").unwrap());

/// Renders segmented blocks as Gutenberg block markup.
pub struct BlockRenderer<'a> {
    inline: InlineFormatter<'a>,
    images: &'a ImageMap,
}

impl<'a> BlockRenderer<'a> {
    /// Create a renderer resolving image paths through `images`.
    #[must_use]
    pub fn new(images: &'a ImageMap) -> Self {
        Self {
            inline: InlineFormatter::new(images),
            images,
        }
    }

    /// Render a sequence of blocks, separated by blank lines.
    #[must_use]
    pub fn render(&self, blocks: &[Block]) -> String {
        blocks
            .iter()
            .map(|block| self.render_block(block))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Render a single block.
    #[must_use]
    pub fn render_block(&self, block: &Block) -> String {
        match block {
            Block::Heading { level, text } => self.heading(*level, text),
            Block::Code { language, body } => code(language.as_deref(), body),
            Block::Callout(callout) => self.callout(callout),
            Block::Quote { lines } => self.quote(lines),
            Block::List { lines } => self.list(lines),
            Block::Rule => separator(),
            Block::Image(image) => self.image(&image.path, &image.alt_text()),
            Block::Paragraph { text } => self.paragraph(text),
        }
    }

    fn heading(&self, level: u8, text: &str) -> String {
        let inner = self.inline.format(text);
        format!(
            "<!-- wp:heading {{\"level\":{level}}} -->\n\
             <h{level} class=\"wp-block-heading\">{inner}</h{level}>\n\
             <!-- /wp:heading -->"
        )
    }

    fn paragraph(&self, text: &str) -> String {
        let inner = self.inline.format(text);
        format!("<!-- wp:paragraph -->\n<p>{inner}</p>\n<!-- /wp:paragraph -->")
    }

    fn quote(&self, lines: &[String]) -> String {
        let inner = self.inline.format(&join_quote_lines(lines));
        format!(
            "<!-- wp:quote -->\n\
             <blockquote class=\"wp-block-quote\"><p>{inner}</p></blockquote>\n\
             <!-- /wp:quote -->"
        )
    }

    fn callout(&self, callout: &Callout) -> String {
        let kind = callout.kind.to_ascii_lowercase();
        let mut classes = format!("callout callout-{kind}");
        if callout.fold.is_foldable() {
            classes.push_str(" is-foldable");
            if callout.fold == Fold::Collapsed {
                classes.push_str(" is-collapsed");
            }
        }
        let title = callout
            .title
            .clone()
            .unwrap_or_else(|| capitalize(&callout.kind));
        let title = self.inline.format(&title);

        let mut quote = format!("<p><strong>{title}</strong></p>");
        let body = join_quote_lines(&callout.lines);
        if !body.is_empty() {
            let inner = self.inline.format(&body);
            write!(quote, "<p>{inner}</p>").unwrap_or_default();
        }
        format!(
            "<!-- wp:quote {{\"className\":\"{classes}\"}} -->\n\
             <blockquote class=\"wp-block-quote {classes}\">{quote}</blockquote>\n\
             <!-- /wp:quote -->"
        )
    }

    fn list(&self, lines: &[String]) -> String {
        let ordered = lines.first().is_some_and(|l| ORDERED_MARKER.is_match(l));

        // A marker line starts a new item; any other line appends to the
        // open item with a single space separator.
        let mut items: Vec<String> = Vec::new();
        for line in lines {
            if let Some(caps) = LIST_ITEM_TEXT.captures(line) {
                items.push(caps[1].trim_end().to_owned());
            } else if let Some(open) = items.last_mut() {
                open.push(' ');
                open.push_str(line.trim());
            } else {
                items.push(line.trim().to_owned());
            }
        }

        let rendered: String = items
            .iter()
            .map(|item| format!("<li>{}</li>", self.inline.format(item)))
            .collect();
        if ordered {
            format!(
                "<!-- wp:list {{\"ordered\":true}} -->\n<ol>{rendered}</ol>\n<!-- /wp:list -->"
            )
        } else {
            format!("<!-- wp:list -->\n<ul>{rendered}</ul>\n<!-- /wp:list -->")
        }
    }

    fn image(&self, path: &str, alt: &str) -> String {
        let src = self.images.resolve(path);
        format!(
            "<!-- wp:image -->\n\
             <figure class=\"wp-block-image\"><img src=\"{}\" alt=\"{}\"/></figure>\n\
             <!-- /wp:image -->",
            escape_html(src),
            escape_html(alt)
        )
    }
}

fn code(language: Option<&str>, body: &str) -> String {
    let class = language.map_or_else(String::new, |lang| format!(" class=\"language-{lang}\""));
    format!(
        "<!-- wp:code -->\n<pre class=\"wp-block-code\"><code{class}>{}</code></pre>\n<!-- /wp:code -->",
        escape_html(body)
    )
}

fn separator() -> String {
    "<!-- wp:separator -->\n\
     <hr class=\"wp-block-separator has-alpha-channel-opacity\"/>\n\
     <!-- /wp:separator -->"
        .to_owned()
}

/// De-prefix quoted lines and join the non-blank ones into one paragraph.
fn join_quote_lines(lines: &[String]) -> String {
    lines
        .iter()
        .map(|line| strip_quote_prefix(line).trim())
        .filter(|line| !line.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Convert a document body straight to Gutenberg block markup.
#[must_use]
pub fn render_document(body: &str, images: &ImageMap) -> String {
    BlockRenderer::new(images).render(&segment(body))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn render(body: &str) -> String {
        render_document(body, &ImageMap::new())
    }

    #[test]
    fn test_heading_and_paragraph_blocks() {
        let html = render("# Title\n\nHello **world**.");
        assert!(html.contains("<!-- wp:heading {\"level\":1} -->"));
        assert!(html.contains("<h1 class=\"wp-block-heading\">Title</h1>"));
        assert!(html.contains("<p>Hello <strong>world</strong>.</p>"));
    }

    #[test]
    fn test_heading_level_in_template() {
        let html = render("### Sub");
        assert!(html.contains("{\"level\":3}"));
        assert!(html.contains("<h3 class=\"wp-block-heading\">Sub</h3>"));
    }

    #[test]
    fn test_code_block_escaped_not_formatted() {
        let html = render("```rust\nlet x = a < b && c > \"d\";\n**not bold**\n```");
        assert!(html.contains("<code class=\"language-rust\">"));
        assert!(html.contains("a &lt; b &amp;&amp; c &gt; &quot;d&quot;"));
        assert!(html.contains("**not bold**"));
        assert!(!html.contains("<strong>"));
    }

    #[test]
    fn test_code_block_without_language() {
        let html = render("```\nplain\n```");
        assert!(html.contains("<code>plain</code>"));
    }

    #[test]
    fn test_quote_joined_as_one_paragraph() {
        let html = render("> first\n> second");
        assert!(html.contains("<blockquote class=\"wp-block-quote\"><p>first second</p></blockquote>"));
    }

    #[test]
    fn test_callout_foldable_collapsed() {
        let html = render("> [!warning]- Careful\nWatch out");
        assert!(html.contains("{\"className\":\"callout callout-warning is-foldable is-collapsed\"}"));
        assert!(html.contains("<p><strong>Careful</strong></p>"));
        assert!(html.contains("<p>Watch out</p>"));
    }

    #[test]
    fn test_callout_title_defaults_to_capitalized_kind() {
        let html = render("> [!note]\n> body");
        assert!(html.contains("<p><strong>Note</strong></p>"));
        assert!(html.contains("callout callout-note"));
        assert!(!html.contains("is-foldable"));
    }

    #[test]
    fn test_callout_expanded_fold_marker() {
        let html = render("> [!tip]+ Open\n> body");
        assert!(html.contains("is-foldable"));
        assert!(!html.contains("is-collapsed"));
    }

    #[test]
    fn test_unordered_list() {
        let html = render("- one\n- two");
        assert!(html.contains("<!-- wp:list -->"));
        assert!(html.contains("<ul><li>one</li><li>two</li></ul>"));
    }

    #[test]
    fn test_ordered_list() {
        let html = render("1. one\n2. two");
        assert!(html.contains("{\"ordered\":true}"));
        assert!(html.contains("<ol><li>one</li><li>two</li></ol>"));
    }

    #[test]
    fn test_list_continuation_joined_with_space() {
        let html = render("- item text\n  continued here");
        assert!(html.contains("<li>item text continued here</li>"));
    }

    #[test]
    fn test_list_items_inline_formatted() {
        let html = render("- **bold** item");
        assert!(html.contains("<li><strong>bold</strong> item</li>"));
    }

    #[test]
    fn test_separator() {
        let html = render("---");
        assert!(html.contains("<!-- wp:separator -->"));
        assert!(html.contains("<hr class=\"wp-block-separator has-alpha-channel-opacity\"/>"));
    }

    #[test]
    fn test_image_block_unresolved_falls_back_to_path() {
        let html = render("![[photo.png]]");
        assert!(html.contains("<!-- wp:image -->"));
        assert!(html.contains("<img src=\"photo.png\" alt=\"photo\"/>"));
    }

    #[test]
    fn test_image_block_resolved_through_map() {
        let mut images = ImageMap::new();
        images.insert("photo.png", "https://example.com/2024/photo.png");
        let html = render_document("![[photo.png]]", &images);
        assert!(html.contains("src=\"https://example.com/2024/photo.png\""));
    }

    #[test]
    fn test_blocks_joined_by_blank_line() {
        let html = render("# A\n\ntext");
        assert!(html.contains("<!-- /wp:heading -->\n\n<!-- wp:paragraph -->"));
    }

    #[test]
    fn test_empty_body_renders_empty() {
        assert_eq!(render(""), "");
    }
}
