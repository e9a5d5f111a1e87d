//! Frontmatter codec for post metadata.
//!
//! Documents may start with a metadata block delimited by `---` lines. The
//! codec parses the recognized post properties out of it, merges partial
//! updates over them, and rewrites the whole block in a fixed key order.
//!
//! Parsing is schema-directed: each recognized key is coerced to its declared
//! type individually, and a value that cannot be coerced drops that single
//! field instead of failing the document. Absent or malformed frontmatter
//! yields an empty [`Frontmatter`], never an error. Keys the codec does not
//! model are dropped on rewrite.

use serde_yaml::{Mapping, Value};

/// Post visibility status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PostStatus {
    /// Unpublished draft.
    #[default]
    Draft,
    /// Publicly visible.
    Publish,
    /// Visible to logged-in users only.
    Private,
    /// Scheduled for a future date.
    Future,
}

impl PostStatus {
    /// Canonical lowercase name, as used on the wire and in frontmatter.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Publish => "publish",
            Self::Private => "private",
            Self::Future => "future",
        }
    }

    /// Parse a status name (case-insensitive). Unknown names yield `None`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        [Self::Draft, Self::Publish, Self::Private, Self::Future]
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(name))
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recognized post properties of a document.
///
/// `remote_id` and `remote_url` are assigned by the server on first publish
/// and written back into the document; their presence is what turns a later
/// publish into an update instead of a second create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Frontmatter {
    /// Post title.
    pub title: Option<String>,
    /// URL slug.
    pub slug: Option<String>,
    /// Post status.
    pub status: Option<PostStatus>,
    /// Post excerpt.
    pub excerpt: Option<String>,
    /// Publication date as an opaque ISO-8601 string (not validated).
    pub date: Option<String>,
    /// Category names, in order. Duplicates allowed.
    pub categories: Vec<String>,
    /// Tag names, in order.
    pub tags: Vec<String>,
    /// Server-assigned post id.
    pub remote_id: Option<u64>,
    /// Server-assigned post URL.
    pub remote_url: Option<String>,
}

impl Frontmatter {
    /// Parse the frontmatter block of `document`.
    ///
    /// Returns an empty set when no well-formed delimited block starts at
    /// the very first line.
    #[must_use]
    pub fn parse(document: &str) -> Self {
        match split_frontmatter(document).0 {
            Some(raw) => Self::from_yaml(raw),
            None => Self::default(),
        }
    }

    /// Serialize as a delimited frontmatter block (`---` ... `---`).
    ///
    /// Only defined fields are emitted, in fixed key order; empty lists and
    /// unset scalars are omitted.
    #[must_use]
    pub fn serialize(&self) -> String {
        let mut map = Mapping::new();
        if let Some(title) = &self.title {
            map.insert(Value::from("title"), Value::from(title.as_str()));
        }
        if let Some(slug) = &self.slug {
            map.insert(Value::from("slug"), Value::from(slug.as_str()));
        }
        if let Some(status) = self.status {
            map.insert(Value::from("status"), Value::from(status.as_str()));
        }
        if let Some(excerpt) = &self.excerpt {
            map.insert(Value::from("excerpt"), Value::from(excerpt.as_str()));
        }
        if let Some(date) = &self.date {
            map.insert(Value::from("date"), Value::from(date.as_str()));
        }
        if !self.categories.is_empty() {
            map.insert(Value::from("categories"), string_sequence(&self.categories));
        }
        if !self.tags.is_empty() {
            map.insert(Value::from("tags"), string_sequence(&self.tags));
        }
        if let Some(id) = self.remote_id {
            map.insert(Value::from("remote_id"), Value::from(id));
        }
        if let Some(url) = &self.remote_url {
            map.insert(Value::from("remote_url"), Value::from(url.as_str()));
        }

        if map.is_empty() {
            return "---\n---\n".to_owned();
        }
        let yaml = serde_yaml::to_string(&Value::Mapping(map)).unwrap_or_default();
        format!("---\n{yaml}---\n")
    }

    /// Merge `patch` over `document`'s frontmatter and rewrite the block.
    ///
    /// Defined fields of the patch win on collision; the whole block is
    /// replaced by the freshly serialized merge. When the document has no
    /// frontmatter, a new block is prepended with a blank separator line.
    /// Applying the same patch twice yields byte-identical output.
    #[must_use]
    pub fn update(document: &str, patch: &Self) -> String {
        let (raw, body) = split_frontmatter(document);
        let mut merged = raw.map_or_else(Self::default, Self::from_yaml);
        merged.apply(patch);
        let block = merged.serialize();
        if raw.is_some() {
            format!("{block}{body}")
        } else if body.is_empty() {
            block
        } else {
            format!("{block}\n{body}")
        }
    }

    /// Overwrite fields with the defined fields of `patch`.
    pub fn apply(&mut self, patch: &Self) {
        if patch.title.is_some() {
            self.title.clone_from(&patch.title);
        }
        if patch.slug.is_some() {
            self.slug.clone_from(&patch.slug);
        }
        if patch.status.is_some() {
            self.status = patch.status;
        }
        if patch.excerpt.is_some() {
            self.excerpt.clone_from(&patch.excerpt);
        }
        if patch.date.is_some() {
            self.date.clone_from(&patch.date);
        }
        if !patch.categories.is_empty() {
            self.categories.clone_from(&patch.categories);
        }
        if !patch.tags.is_empty() {
            self.tags.clone_from(&patch.tags);
        }
        if patch.remote_id.is_some() {
            self.remote_id = patch.remote_id;
        }
        if patch.remote_url.is_some() {
            self.remote_url.clone_from(&patch.remote_url);
        }
    }

    fn from_yaml(raw: &str) -> Self {
        let Ok(Value::Mapping(map)) = serde_yaml::from_str::<Value>(raw) else {
            return Self::default();
        };
        Self {
            title: string_field(&map, "title"),
            slug: string_field(&map, "slug"),
            status: string_field(&map, "status").and_then(|s| PostStatus::from_name(&s)),
            excerpt: string_field(&map, "excerpt"),
            date: string_field(&map, "date"),
            categories: list_field(&map, "categories"),
            tags: list_field(&map, "tags"),
            remote_id: id_field(&map, "remote_id"),
            remote_url: string_field(&map, "remote_url"),
        }
    }
}

/// Split a document into its raw frontmatter region and the body.
///
/// The opening delimiter must be the entire first line; without a matching
/// closing `---` line the whole text is body.
#[must_use]
pub fn split_frontmatter(document: &str) -> (Option<&str>, &str) {
    let mut lines = document.split_inclusive('\n');
    let Some(first) = lines.next() else {
        return (None, document);
    };
    if first.trim_end_matches(['\r', '\n']) != "---" || first.len() == document.len() {
        return (None, document);
    }

    let inner_start = first.len();
    let mut offset = inner_start;
    for line in lines {
        if line.trim_end_matches(['\r', '\n']) == "---" {
            let inner = &document[inner_start..offset];
            let body = &document[offset + line.len()..];
            return (Some(inner), body);
        }
        offset += line.len();
    }
    (None, document)
}

fn string_sequence(values: &[String]) -> Value {
    Value::Sequence(values.iter().map(|v| Value::from(v.as_str())).collect())
}

/// Coerce a scalar value to a string. Numbers are stringified; anything
/// else drops the field.
fn coerce_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_field(map: &Mapping, key: &str) -> Option<String> {
    map.get(key).and_then(coerce_string)
}

/// Scalar-or-list field: a single scalar normalizes to a one-element list,
/// non-coercible sequence items are skipped.
fn list_field(map: &Mapping, key: &str) -> Vec<String> {
    match map.get(key) {
        Some(Value::Sequence(items)) => items.iter().filter_map(coerce_string).collect(),
        Some(value) => coerce_string(value).map_or_else(Vec::new, |s| vec![s]),
        None => Vec::new(),
    }
}

fn id_field(map: &Mapping, key: &str) -> Option<u64> {
    match map.get(key)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_parse_all_fields() {
        let doc = "---\n\
                   title: My Post\n\
                   slug: my-post\n\
                   status: publish\n\
                   excerpt: A summary\n\
                   date: 2024-12-25T10:00:00\n\
                   categories:\n  - Rust\n  - Tools\n\
                   tags:\n  - cli\n\
                   remote_id: 42\n\
                   remote_url: https://blog.example.com/?p=42\n\
                   ---\nBody";
        let fm = Frontmatter::parse(doc);
        assert_eq!(fm.title, Some("My Post".to_owned()));
        assert_eq!(fm.slug, Some("my-post".to_owned()));
        assert_eq!(fm.status, Some(PostStatus::Publish));
        assert_eq!(fm.excerpt, Some("A summary".to_owned()));
        assert_eq!(fm.date, Some("2024-12-25T10:00:00".to_owned()));
        assert_eq!(fm.categories, vec!["Rust".to_owned(), "Tools".to_owned()]);
        assert_eq!(fm.tags, vec!["cli".to_owned()]);
        assert_eq!(fm.remote_id, Some(42));
        assert_eq!(fm.remote_url, Some("https://blog.example.com/?p=42".to_owned()));
    }

    #[test]
    fn test_parse_no_frontmatter() {
        assert_eq!(Frontmatter::parse("# Just a body"), Frontmatter::default());
    }

    #[test]
    fn test_parse_unterminated_block() {
        let doc = "---\ntitle: Dangling\nno closing delimiter";
        assert_eq!(Frontmatter::parse(doc), Frontmatter::default());
    }

    #[test]
    fn test_parse_delimiter_not_first_line() {
        let doc = "\n---\ntitle: Late\n---\n";
        assert_eq!(Frontmatter::parse(doc), Frontmatter::default());
    }

    #[test]
    fn test_parse_malformed_yaml_yields_empty() {
        let doc = "---\ntitle: [unclosed\n---\nbody";
        assert_eq!(Frontmatter::parse(doc), Frontmatter::default());
    }

    #[test]
    fn test_parse_scalar_categories_normalize_to_list() {
        let doc = "---\ncategories: Rust\n---\n";
        assert_eq!(Frontmatter::parse(doc).categories, vec!["Rust".to_owned()]);
    }

    #[test]
    fn test_parse_non_numeric_remote_id_dropped() {
        let doc = "---\ntitle: Post\nremote_id: not-a-number\n---\n";
        let fm = Frontmatter::parse(doc);
        assert_eq!(fm.remote_id, None);
        assert_eq!(fm.title, Some("Post".to_owned()));
    }

    #[test]
    fn test_parse_numeric_string_remote_id_coerced() {
        let doc = "---\nremote_id: \"42\"\n---\n";
        assert_eq!(Frontmatter::parse(doc).remote_id, Some(42));
    }

    #[test]
    fn test_parse_unknown_status_dropped() {
        let doc = "---\nstatus: pending\n---\n";
        assert_eq!(Frontmatter::parse(doc).status, None);
    }

    #[test]
    fn test_parse_numeric_title_coerced_to_string() {
        let doc = "---\ntitle: 2024\n---\n";
        assert_eq!(Frontmatter::parse(doc).title, Some("2024".to_owned()));
    }

    #[test]
    fn test_status_from_name_case_insensitive() {
        assert_eq!(PostStatus::from_name("Draft"), Some(PostStatus::Draft));
        assert_eq!(PostStatus::from_name("FUTURE"), Some(PostStatus::Future));
        assert_eq!(PostStatus::from_name("pending"), None);
    }

    #[test]
    fn test_split_body_preserved() {
        let doc = "---\ntitle: T\n---\n\n# Heading\n";
        let (raw, body) = split_frontmatter(doc);
        assert_eq!(raw, Some("title: T\n"));
        assert_eq!(body, "\n# Heading\n");
    }

    #[test]
    fn test_split_bare_delimiter_only() {
        assert_eq!(split_frontmatter("---"), (None, "---"));
        assert_eq!(split_frontmatter("---\n"), (None, "---\n"));
    }

    #[test]
    fn test_serialize_key_order() {
        let fm = Frontmatter {
            title: Some("T".to_owned()),
            status: Some(PostStatus::Draft),
            categories: vec!["A".to_owned()],
            remote_id: Some(7),
            ..Frontmatter::default()
        };
        assert_eq!(
            fm.serialize(),
            "---\ntitle: T\nstatus: draft\ncategories:\n- A\nremote_id: 7\n---\n"
        );
    }

    #[test]
    fn test_serialize_empty_set() {
        assert_eq!(Frontmatter::default().serialize(), "---\n---\n");
    }

    #[test]
    fn test_roundtrip_recognized_fields() {
        let fm = Frontmatter {
            title: Some("Round: trip".to_owned()),
            slug: Some("round-trip".to_owned()),
            status: Some(PostStatus::Future),
            excerpt: None,
            date: Some("2024-12-25T10:00:00".to_owned()),
            categories: vec!["Rust".to_owned(), "Rust".to_owned()],
            tags: vec!["a".to_owned()],
            remote_id: Some(99),
            remote_url: Some("https://example.com/?p=99".to_owned()),
        };
        assert_eq!(Frontmatter::parse(&fm.serialize()), fm);
    }

    #[test]
    fn test_roundtrip_numeric_looking_title() {
        let fm = Frontmatter {
            title: Some("123".to_owned()),
            ..Frontmatter::default()
        };
        assert_eq!(Frontmatter::parse(&fm.serialize()), fm);
    }

    #[test]
    fn test_update_merges_partial_over_existing() {
        let doc = "---\ntitle: Old\nstatus: draft\n---\nBody\n";
        let patch = Frontmatter {
            remote_id: Some(10),
            remote_url: Some("https://example.com/?p=10".to_owned()),
            ..Frontmatter::default()
        };
        let updated = Frontmatter::update(doc, &patch);
        let fm = Frontmatter::parse(&updated);
        assert_eq!(fm.title, Some("Old".to_owned()));
        assert_eq!(fm.status, Some(PostStatus::Draft));
        assert_eq!(fm.remote_id, Some(10));
        assert!(updated.ends_with("Body\n"));
    }

    #[test]
    fn test_update_patch_wins_on_collision() {
        let doc = "---\nstatus: draft\n---\n";
        let patch = Frontmatter {
            status: Some(PostStatus::Publish),
            ..Frontmatter::default()
        };
        let fm = Frontmatter::parse(&Frontmatter::update(doc, &patch));
        assert_eq!(fm.status, Some(PostStatus::Publish));
    }

    #[test]
    fn test_update_is_idempotent() {
        let doc = "---\ntitle: T\nextra: dropped\n---\n\nBody text\n";
        let patch = Frontmatter {
            remote_id: Some(5),
            ..Frontmatter::default()
        };
        let once = Frontmatter::update(doc, &patch);
        let twice = Frontmatter::update(&once, &patch);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_update_creates_block_when_absent() {
        let doc = "# Heading\n\nBody\n";
        let patch = Frontmatter {
            remote_id: Some(3),
            ..Frontmatter::default()
        };
        assert_eq!(
            Frontmatter::update(doc, &patch),
            "---\nremote_id: 3\n---\n\n# Heading\n\nBody\n"
        );
    }

    #[test]
    fn test_update_drops_unrecognized_keys() {
        let doc = "---\ntitle: T\ncustom_field: kept nowhere\n---\nBody";
        let updated = Frontmatter::update(doc, &Frontmatter::default());
        assert!(!updated.contains("custom_field"));
        assert!(updated.contains("title: T"));
    }
}
