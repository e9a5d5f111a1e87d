//! In-memory test doubles.
//!
//! [`MockVault`] and [`MockApi`] implement the [`Vault`] and [`ContentApi`]
//! seams without filesystem or network access. Both use builder methods to
//! set up test data and record the operations performed on them.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use np_wordpress::{Media, Post, PostPayload, TaxonomyKind, Term, WordPressError};

use crate::api::ContentApi;
use crate::vault::{Vault, VaultError};

/// In-memory vault for testing.
///
/// # Example
///
/// ```ignore
/// use std::path::Path;
/// use np_publish::Vault;
/// use np_publish::mock::MockVault;
///
/// let vault = MockVault::new().with_text("posts/a.md", "# Hi");
/// assert_eq!(vault.read_text(Path::new("posts/a.md")).unwrap(), "# Hi");
/// ```
#[derive(Debug, Default)]
pub struct MockVault {
    texts: RwLock<HashMap<PathBuf, String>>,
    binaries: RwLock<HashMap<PathBuf, Vec<u8>>>,
}

impl MockVault {
    /// Create an empty mock vault.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a text document.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_text(self, path: impl Into<PathBuf>, content: impl Into<String>) -> Self {
        self.texts.write().unwrap().insert(path.into(), content.into());
        self
    }

    /// Add a binary file.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_binary(self, path: impl Into<PathBuf>, data: Vec<u8>) -> Self {
        self.binaries.write().unwrap().insert(path.into(), data);
        self
    }

    /// Current content of a text document, including writes.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn text(&self, path: &Path) -> Option<String> {
        self.texts.read().unwrap().get(path).cloned()
    }

    fn contains(&self, path: &Path) -> bool {
        self.texts.read().unwrap().contains_key(path)
            || self.binaries.read().unwrap().contains_key(path)
    }
}

impl Vault for MockVault {
    fn read_text(&self, path: &Path) -> Result<String, VaultError> {
        self.text(path)
            .ok_or_else(|| VaultError::NotFound(path.to_path_buf()))
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>, VaultError> {
        self.binaries
            .read()
            .unwrap()
            .get(path)
            .cloned()
            .ok_or_else(|| VaultError::NotFound(path.to_path_buf()))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<(), VaultError> {
        self.texts
            .write()
            .unwrap()
            .insert(path.to_path_buf(), content.to_owned());
        Ok(())
    }

    fn resolve_link(&self, link: &str, from: &Path) -> Option<PathBuf> {
        let direct = PathBuf::from(link);
        if self.contains(&direct) {
            return Some(direct);
        }
        let document_dir = from.parent()?;
        let relative = document_dir.join(link);
        if self.contains(&relative) {
            return Some(relative);
        }
        let sibling = document_dir.join(Path::new(link).file_name()?);
        self.contains(&sibling).then_some(sibling)
    }
}

/// A post submission observed by [`MockApi`].
#[derive(Debug, Clone)]
pub enum RecordedCall {
    /// `create_post` with the given payload.
    Create(PostPayload),
    /// `update_post` against the given id.
    Update(u64, PostPayload),
}

/// Call-recording content API double.
#[derive(Debug, Default)]
pub struct MockApi {
    calls: RwLock<Vec<RecordedCall>>,
    uploads: RwLock<Vec<String>>,
    terms: RwLock<Vec<(TaxonomyKind, String, u64)>>,
    created_terms: RwLock<Vec<(TaxonomyKind, String)>>,
    media_failures: RwLock<HashSet<String>>,
    term_failures: RwLock<HashSet<String>>,
    reported_status: RwLock<Option<String>>,
    next_post_id: RwLock<u64>,
}

impl MockApi {
    /// Create an empty mock API.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed an existing taxonomy term.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_term(self, kind: TaxonomyKind, name: &str, id: u64) -> Self {
        self.terms.write().unwrap().push((kind, name.to_owned(), id));
        self
    }

    /// Make resolution of `name` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_term_failure(self, name: &str) -> Self {
        self.term_failures.write().unwrap().insert(name.to_owned());
        self
    }

    /// Make uploading `filename` fail.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_media_failure(self, filename: &str) -> Self {
        self.media_failures.write().unwrap().insert(filename.to_owned());
        self
    }

    /// Report this status on created/updated posts instead of echoing the
    /// requested one.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_reported_status(self, status: &str) -> Self {
        *self.reported_status.write().unwrap() = Some(status.to_owned());
        self
    }

    /// All post submissions, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.read().unwrap().clone()
    }

    /// Uploaded filenames, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn uploads(&self) -> Vec<String> {
        self.uploads.read().unwrap().clone()
    }

    /// Terms created (as opposed to matched), in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn created_terms(&self) -> Vec<(TaxonomyKind, String)> {
        self.created_terms.read().unwrap().clone()
    }

    fn post_for(&self, id: u64, payload: &PostPayload) -> Post {
        let status = self
            .reported_status
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| payload.status.clone());
        Post {
            id,
            link: format!("https://blog.example.com/?p={id}"),
            status,
        }
    }

    fn failure(what: &str) -> WordPressError {
        WordPressError::HttpResponse {
            status: 500,
            message: format!("{what} rejected by mock"),
        }
    }
}

impl ContentApi for MockApi {
    fn create_post(&self, payload: &PostPayload) -> Result<Post, WordPressError> {
        let mut next = self.next_post_id.write().unwrap();
        *next += 1;
        let id = *next;
        self.calls
            .write()
            .unwrap()
            .push(RecordedCall::Create(payload.clone()));
        Ok(self.post_for(id, payload))
    }

    fn update_post(&self, id: u64, payload: &PostPayload) -> Result<Post, WordPressError> {
        self.calls
            .write()
            .unwrap()
            .push(RecordedCall::Update(id, payload.clone()));
        Ok(self.post_for(id, payload))
    }

    fn upload_media(
        &self,
        filename: &str,
        _content_type: &str,
        _data: &[u8],
    ) -> Result<Media, WordPressError> {
        if self.media_failures.read().unwrap().contains(filename) {
            return Err(Self::failure(filename));
        }
        let mut uploads = self.uploads.write().unwrap();
        uploads.push(filename.to_owned());
        Ok(Media {
            id: uploads.len() as u64,
            source_url: format!("https://blog.example.com/media/{filename}"),
        })
    }

    fn resolve_term(&self, kind: TaxonomyKind, name: &str) -> Result<Term, WordPressError> {
        if self.term_failures.read().unwrap().contains(name) {
            return Err(Self::failure(name));
        }
        let existing = self
            .terms
            .read()
            .unwrap()
            .iter()
            .find(|(k, n, _)| *k == kind && n.eq_ignore_ascii_case(name))
            .map(|(_, n, id)| (n.clone(), *id));
        let (name, id) = match existing {
            Some(found) => found,
            None => {
                let mut terms = self.terms.write().unwrap();
                let id = 100 + terms.len() as u64;
                terms.push((kind, name.to_owned(), id));
                self.created_terms
                    .write()
                    .unwrap()
                    .push((kind, name.to_owned()));
                (name.to_owned(), id)
            }
        };
        Ok(Term { id, name })
    }
}
