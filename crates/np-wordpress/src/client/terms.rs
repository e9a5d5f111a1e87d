//! Taxonomy term operations (categories and tags).

use percent_encoding::{NON_ALPHANUMERIC, utf8_percent_encode};
use serde::Serialize;
use tracing::info;

use super::WpClient;
use crate::error::WordPressError;
use crate::types::Term;

/// Which taxonomy a term belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TaxonomyKind {
    /// Post category.
    Category,
    /// Post tag.
    Tag,
}

impl TaxonomyKind {
    /// REST endpoint segment for this taxonomy.
    #[must_use]
    pub fn endpoint(self) -> &'static str {
        match self {
            Self::Category => "categories",
            Self::Tag => "tags",
        }
    }

    /// Singular label for messages.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "category",
            Self::Tag => "tag",
        }
    }
}

#[derive(Serialize)]
struct TermPayload<'a> {
    name: &'a str,
}

impl WpClient {
    /// Find an existing term by name (case-insensitive exact match).
    ///
    /// The server-side search is a substring match, so the exact comparison
    /// happens here over the returned candidates.
    pub fn find_term(
        &self,
        kind: TaxonomyKind,
        name: &str,
    ) -> Result<Option<Term>, WordPressError> {
        let query = utf8_percent_encode(name, NON_ALPHANUMERIC);
        let url = format!(
            "{}/{}?search={query}&per_page=100",
            self.api_url(),
            kind.endpoint()
        );
        let candidates: Vec<Term> = self.get_json(&url)?;
        Ok(candidates
            .into_iter()
            .find(|term| term.name.eq_ignore_ascii_case(name)))
    }

    /// Create a new term.
    pub fn create_term(&self, kind: TaxonomyKind, name: &str) -> Result<Term, WordPressError> {
        let url = format!("{}/{}", self.api_url(), kind.endpoint());
        info!("Creating {} '{name}'", kind.label());
        self.post_json(&url, &TermPayload { name })
    }

    /// Resolve a name to a term id: use the existing term when one matches,
    /// create it otherwise.
    pub fn resolve_term(&self, kind: TaxonomyKind, name: &str) -> Result<Term, WordPressError> {
        if let Some(term) = self.find_term(kind, name)? {
            return Ok(term);
        }
        self.create_term(kind, name)
    }
}
