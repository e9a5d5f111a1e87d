//! Block segmentation.
//!
//! Partitions a document body into typed blocks with a single left-to-right
//! line scan. The accumulator variant doubles as the scanner state: an open
//! code fence or callout changes how the next line is read, everything else
//! is decided per line by the classification order in [`Segmenter::push_line`].
//!
//! Classification order (first match wins):
//!
//! 1. code fence delimiter (toggles fence state, fence content is verbatim)
//! 2. callout header `> [!kind]`
//! 3. callout continuation: any non-blank line joins the body, a blank line
//!    closes the callout
//! 4. heading
//! 5. horizontal rule
//! 6. list item
//! 7. blockquote line
//! 8. standalone image line
//! 9. blank line (flushes the open block)
//! 10. paragraph continuation
//!
//! A line readable as both a list item and a quote is resolved by this
//! order, not by content heuristics. Mixed ordered/unordered markers stay in
//! one list run.

use std::sync::LazyLock;

use regex::Regex;

use crate::images::ImageRef;

static HEADING: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(#{1,6})\s+(.*)$").unwrap());

static CALLOUT_HEADER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^>\s*\[!([A-Za-z][A-Za-z0-9-]*)\]([+-]?)\s*(.*)$").unwrap());

static LIST_ITEM: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\s*(?:[-*+]|\d+\.)\s+").unwrap());

/// Fold state of a callout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Fold {
    /// Not foldable.
    #[default]
    None,
    /// Foldable, rendered expanded (`[!kind]+`).
    Expanded,
    /// Foldable, rendered collapsed (`[!kind]-`).
    Collapsed,
}

impl Fold {
    /// Whether the callout can be folded at all.
    #[must_use]
    pub fn is_foldable(self) -> bool {
        self != Self::None
    }
}

/// An annotated blockquote with a kind tag and optional fold marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Callout {
    /// Kind tag, as written (e.g. `warning`).
    pub kind: String,
    /// Fold marker following the kind tag.
    pub fold: Fold,
    /// Title text after the tag, if any.
    pub title: Option<String>,
    /// Body lines, verbatim (quote prefixes intact).
    pub lines: Vec<String>,
}

/// A classified, contiguous run of body lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// `#`..`######` heading.
    Heading {
        /// Heading level, 1 through 6.
        level: u8,
        /// Heading text without the marker.
        text: String,
    },
    /// Fenced code block.
    Code {
        /// Language tag from the opening fence, if any.
        language: Option<String>,
        /// Content lines joined verbatim.
        body: String,
    },
    /// Obsidian-style callout.
    Callout(Callout),
    /// Plain blockquote.
    Quote {
        /// Quoted lines, verbatim (prefixes intact).
        lines: Vec<String>,
    },
    /// List run (bulleted, numbered, or mixed).
    List {
        /// Item and continuation lines, verbatim.
        lines: Vec<String>,
    },
    /// Horizontal rule.
    Rule,
    /// A line that is exactly one image reference.
    Image(ImageRef),
    /// Anything else.
    Paragraph {
        /// Lines joined with newlines.
        text: String,
    },
}

/// Accumulator for the block under construction. The variant is the scanner
/// state: `Code` and `Callout` change line handling entirely.
enum Accum {
    Empty,
    Code {
        language: Option<String>,
        lines: Vec<String>,
    },
    Callout(Callout),
    Quote(Vec<String>),
    List(Vec<String>),
    Paragraph(Vec<String>),
}

/// Line-by-line block scanner.
struct Segmenter {
    accum: Accum,
    blocks: Vec<Block>,
}

impl Segmenter {
    fn new() -> Self {
        Self {
            accum: Accum::Empty,
            blocks: Vec::new(),
        }
    }

    fn push_line(&mut self, line: &str) {
        // 1. Fence delimiters toggle code state; fence content is verbatim.
        if line.starts_with("```") {
            if matches!(self.accum, Accum::Code { .. }) {
                self.flush();
            } else {
                self.flush();
                let language = line[3..].split_whitespace().next().map(str::to_owned);
                self.accum = Accum::Code {
                    language,
                    lines: Vec::new(),
                };
            }
            return;
        }
        if let Accum::Code { lines, .. } = &mut self.accum {
            lines.push(line.to_owned());
            return;
        }

        // 2. A callout header always opens a new callout, even inside one.
        if let Some(caps) = CALLOUT_HEADER.captures(line) {
            self.flush();
            let title = caps[3].trim();
            self.accum = Accum::Callout(Callout {
                kind: caps[1].to_owned(),
                fold: match &caps[2] {
                    "+" => Fold::Expanded,
                    "-" => Fold::Collapsed,
                    _ => Fold::None,
                },
                title: (!title.is_empty()).then(|| title.to_owned()),
                lines: Vec::new(),
            });
            return;
        }

        // 3. Callout body: lazy continuation until a blank line.
        if let Accum::Callout(callout) = &mut self.accum {
            if line.trim().is_empty() {
                self.flush();
                return;
            }
            callout.lines.push(line.to_owned());
            return;
        }

        // 4. Headings are single-line blocks.
        if let Some(caps) = HEADING.captures(line) {
            self.flush();
            self.blocks.push(Block::Heading {
                level: u8::try_from(caps[1].len()).unwrap_or(6),
                text: caps[2].trim_end().to_owned(),
            });
            return;
        }

        // 5. Horizontal rule, before list items so `---` never starts a list.
        if is_rule(line) {
            self.flush();
            self.blocks.push(Block::Rule);
            return;
        }

        // 6. List item: flush any non-list block, then accumulate.
        if LIST_ITEM.is_match(line) {
            if !matches!(self.accum, Accum::List(_)) {
                self.flush();
                self.accum = Accum::List(Vec::new());
            }
            if let Accum::List(lines) = &mut self.accum {
                lines.push(line.to_owned());
            }
            return;
        }

        // 7. Quote line (callout headers were taken above).
        if line.starts_with('>') {
            if !matches!(self.accum, Accum::Quote(_)) {
                self.flush();
                self.accum = Accum::Quote(Vec::new());
            }
            if let Accum::Quote(lines) = &mut self.accum {
                lines.push(line.to_owned());
            }
            return;
        }

        // 8. A line that is exactly one image reference.
        if let Some(image) = ImageRef::from_line(line) {
            self.flush();
            self.blocks.push(Block::Image(image));
            return;
        }

        // 9. Blank line ends the open block.
        if line.trim().is_empty() {
            self.flush();
            return;
        }

        // 10. Otherwise the line continues the open block.
        match &mut self.accum {
            Accum::Paragraph(lines) | Accum::Quote(lines) | Accum::List(lines) => {
                lines.push(line.to_owned());
            }
            Accum::Empty => {
                self.accum = Accum::Paragraph(vec![line.to_owned()]);
            }
            // Unreachable: handled by rules 1 and 3.
            Accum::Code { .. } | Accum::Callout(_) => {}
        }
    }

    /// Close the open block, discarding whitespace-only accumulations.
    fn flush(&mut self) {
        match std::mem::replace(&mut self.accum, Accum::Empty) {
            Accum::Empty => {}
            Accum::Code { language, lines } => {
                self.blocks.push(Block::Code {
                    language,
                    body: lines.join("\n"),
                });
            }
            Accum::Callout(callout) => {
                self.blocks.push(Block::Callout(callout));
            }
            Accum::Quote(lines) => {
                if lines.iter().any(|l| !strip_quote_prefix(l).trim().is_empty()) {
                    self.blocks.push(Block::Quote { lines });
                }
            }
            Accum::List(lines) => {
                if !lines.is_empty() {
                    self.blocks.push(Block::List { lines });
                }
            }
            Accum::Paragraph(lines) => {
                let text = lines.join("\n");
                if !text.trim().is_empty() {
                    self.blocks.push(Block::Paragraph { text });
                }
            }
        }
    }

    fn finish(mut self) -> Vec<Block> {
        self.flush();
        self.blocks
    }
}

/// Segment a document body (frontmatter already removed) into blocks.
#[must_use]
pub fn segment(body: &str) -> Vec<Block> {
    let mut segmenter = Segmenter::new();
    for line in body.lines() {
        segmenter.push_line(line);
    }
    segmenter.finish()
}

/// Strip one leading quote marker (`>` plus at most one space).
#[must_use]
pub(crate) fn strip_quote_prefix(line: &str) -> &str {
    match line.strip_prefix('>') {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => line,
    }
}

/// Three or more of the same rule character, alone on the line.
fn is_rule(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.len() >= 3
        && ['-', '*', '_']
            .iter()
            .any(|&marker| trimmed.chars().all(|c| c == marker))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_heading_and_paragraph() {
        let blocks = segment("# Title\n\nHello **world**.");
        assert_eq!(blocks.len(), 2);
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 1,
                text: "Title".to_owned()
            }
        );
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                text: "Hello **world**.".to_owned()
            }
        );
    }

    #[test]
    fn test_heading_levels() {
        let blocks = segment("###### Deep\n####### too many");
        assert_eq!(
            blocks[0],
            Block::Heading {
                level: 6,
                text: "Deep".to_owned()
            }
        );
        // Seven hashes is not a heading.
        assert!(matches!(blocks[1], Block::Paragraph { .. }));
    }

    #[test]
    fn test_paragraph_lines_joined() {
        let blocks = segment("first line\nsecond line\n\nnext");
        assert_eq!(
            blocks[0],
            Block::Paragraph {
                text: "first line\nsecond line".to_owned()
            }
        );
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn test_code_fence_swallows_everything() {
        let blocks = segment("```rust\nfn main() {}\n\n# not a heading\n```\nafter");
        assert_eq!(
            blocks[0],
            Block::Code {
                language: Some("rust".to_owned()),
                body: "fn main() {}\n\n# not a heading".to_owned()
            }
        );
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                text: "after".to_owned()
            }
        );
    }

    #[test]
    fn test_code_fence_without_language() {
        let blocks = segment("```\nplain\n```");
        assert_eq!(
            blocks[0],
            Block::Code {
                language: None,
                body: "plain".to_owned()
            }
        );
    }

    #[test]
    fn test_callout_with_fold_and_title() {
        let blocks = segment("> [!warning]- Careful\nWatch out");
        assert_eq!(blocks.len(), 1);
        let Block::Callout(callout) = &blocks[0] else {
            panic!("expected callout, got {:?}", blocks[0]);
        };
        assert_eq!(callout.kind, "warning");
        assert_eq!(callout.fold, Fold::Collapsed);
        assert_eq!(callout.title, Some("Careful".to_owned()));
        assert_eq!(callout.lines, vec!["Watch out".to_owned()]);
    }

    #[test]
    fn test_callout_quoted_body_lines() {
        let blocks = segment("> [!note]\n> first\n> second");
        let Block::Callout(callout) = &blocks[0] else {
            panic!("expected callout");
        };
        assert_eq!(callout.kind, "note");
        assert_eq!(callout.fold, Fold::None);
        assert_eq!(callout.title, None);
        assert_eq!(callout.lines, vec!["> first".to_owned(), "> second".to_owned()]);
    }

    #[test]
    fn test_callout_closed_by_blank_line() {
        let blocks = segment("> [!tip] Title\n> body\n\nplain paragraph");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Callout(_)));
        assert_eq!(
            blocks[1],
            Block::Paragraph {
                text: "plain paragraph".to_owned()
            }
        );
    }

    #[test]
    fn test_second_callout_header_starts_new_callout() {
        let blocks = segment("> [!note] One\n> [!tip] Two");
        assert_eq!(blocks.len(), 2);
        let Block::Callout(first) = &blocks[0] else {
            panic!("expected callout");
        };
        let Block::Callout(second) = &blocks[1] else {
            panic!("expected callout");
        };
        assert_eq!(first.kind, "note");
        assert_eq!(second.kind, "tip");
    }

    #[test]
    fn test_quote_block() {
        let blocks = segment("> quoted line\n> another");
        assert_eq!(
            blocks[0],
            Block::Quote {
                lines: vec!["> quoted line".to_owned(), "> another".to_owned()]
            }
        );
    }

    #[test]
    fn test_quote_interrupts_paragraph() {
        let blocks = segment("text\n> quote");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
        assert!(matches!(blocks[1], Block::Quote { .. }));
    }

    #[test]
    fn test_list_run_with_mixed_markers() {
        let blocks = segment("- one\n* two\n1. three");
        assert_eq!(
            blocks[0],
            Block::List {
                lines: vec!["- one".to_owned(), "* two".to_owned(), "1. three".to_owned()]
            }
        );
        assert_eq!(blocks.len(), 1);
    }

    #[test]
    fn test_list_interrupts_paragraph() {
        let blocks = segment("intro\n- item");
        assert_eq!(blocks.len(), 2);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
        assert!(matches!(blocks[1], Block::List { .. }));
    }

    #[test]
    fn test_list_continuation_line_stays_in_list() {
        let blocks = segment("- item\n  continued");
        assert_eq!(
            blocks[0],
            Block::List {
                lines: vec!["- item".to_owned(), "  continued".to_owned()]
            }
        );
    }

    #[test]
    fn test_rule_variants() {
        let blocks = segment("---\n***\n___");
        assert_eq!(blocks, vec![Block::Rule, Block::Rule, Block::Rule]);
    }

    #[test]
    fn test_rule_beats_list_marker() {
        // `---` could be read as a list of dashes; rule order decides.
        let blocks = segment("- item\n---");
        assert!(matches!(blocks[0], Block::List { .. }));
        assert_eq!(blocks[1], Block::Rule);
    }

    #[test]
    fn test_standalone_image_line() {
        let blocks = segment("![[photo.png]]");
        let Block::Image(image) = &blocks[0] else {
            panic!("expected image");
        };
        assert_eq!(image.path, "photo.png");
    }

    #[test]
    fn test_inline_image_stays_in_paragraph() {
        let blocks = segment("text with ![[photo.png]] inline");
        assert_eq!(blocks.len(), 1);
        assert!(matches!(blocks[0], Block::Paragraph { .. }));
    }

    #[test]
    fn test_blank_lines_discarded() {
        assert!(segment("\n\n   \n").is_empty());
    }

    #[test]
    fn test_unterminated_fence_flushed_at_end() {
        let blocks = segment("```\ndangling");
        assert_eq!(
            blocks[0],
            Block::Code {
                language: None,
                body: "dangling".to_owned()
            }
        );
    }

    /// Every non-blank input line lands in exactly one block.
    #[test]
    fn test_segmentation_coverage() {
        let body = "# Title\n\npara one\npara two\n\n> [!note] T\nbody line\n\n\
                    > quote\n- a\n1. b\n---\n```sh\nls\n```\n![[x.png]]\ntail";
        let blocks = segment(body);
        let mut reconstructed: Vec<String> = Vec::new();
        for block in &blocks {
            match block {
                Block::Heading { level, text } => {
                    reconstructed.push(format!("{} {text}", "#".repeat(usize::from(*level))));
                }
                Block::Code { language, body } => {
                    let tag = language.clone().unwrap_or_default();
                    reconstructed.push(format!("```{tag}"));
                    reconstructed.extend(body.lines().map(str::to_owned));
                    reconstructed.push("```".to_owned());
                }
                Block::Callout(callout) => {
                    let title = callout.title.clone().unwrap_or_default();
                    reconstructed.push(format!("> [!{}] {title}", callout.kind));
                    reconstructed.extend(callout.lines.iter().cloned());
                }
                Block::Quote { lines } | Block::List { lines } => {
                    reconstructed.extend(lines.iter().cloned());
                }
                Block::Rule => reconstructed.push("---".to_owned()),
                Block::Image(image) => reconstructed.push(image.raw.clone()),
                Block::Paragraph { text } => {
                    reconstructed.extend(text.lines().map(str::to_owned));
                }
            }
        }
        let expected: Vec<String> = body
            .lines()
            .filter(|l| !l.trim().is_empty())
            .map(str::to_owned)
            .collect();
        assert_eq!(reconstructed, expected);
    }
}
