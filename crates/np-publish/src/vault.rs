//! Document and file access.
//!
//! The [`Vault`] trait is the seam between the publish workflow and the
//! host's note store. Paths handed to a vault are vault-relative; absolute
//! paths are used as-is.

use std::path::{Path, PathBuf};

/// Error from vault operations.
#[derive(Debug, thiserror::Error)]
pub enum VaultError {
    /// File does not exist.
    #[error("not found: {}", .0.display())]
    NotFound(PathBuf),

    /// Underlying I/O failure.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        /// Path the operation touched.
        path: PathBuf,
        /// Source error.
        #[source]
        source: std::io::Error,
    },
}

impl VaultError {
    fn from_io(err: std::io::Error, path: PathBuf) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::NotFound(path)
        } else {
            Self::Io { path, source: err }
        }
    }
}

/// Access to documents and binary files.
pub trait Vault {
    /// Read a document as text.
    fn read_text(&self, path: &Path) -> Result<String, VaultError>;

    /// Read a file's raw content.
    fn read_binary(&self, path: &Path) -> Result<Vec<u8>, VaultError>;

    /// Overwrite a document with new text.
    fn write_text(&self, path: &Path, content: &str) -> Result<(), VaultError>;

    /// Resolve a link as written in a document to an actual file.
    ///
    /// Resolution order: the link as a vault path, then relative to the
    /// document's directory, then the link's bare filename next to the
    /// document. `None` when nothing exists.
    fn resolve_link(&self, link: &str, from: &Path) -> Option<PathBuf>;
}

/// Filesystem-backed vault rooted at a directory.
#[derive(Debug)]
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    /// Create a vault rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The vault root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn absolute(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

impl Vault for FsVault {
    fn read_text(&self, path: &Path) -> Result<String, VaultError> {
        let full = self.absolute(path);
        std::fs::read_to_string(&full).map_err(|e| VaultError::from_io(e, full))
    }

    fn read_binary(&self, path: &Path) -> Result<Vec<u8>, VaultError> {
        let full = self.absolute(path);
        std::fs::read(&full).map_err(|e| VaultError::from_io(e, full))
    }

    fn write_text(&self, path: &Path, content: &str) -> Result<(), VaultError> {
        let full = self.absolute(path);
        std::fs::write(&full, content).map_err(|e| VaultError::from_io(e, full))
    }

    fn resolve_link(&self, link: &str, from: &Path) -> Option<PathBuf> {
        let direct = self.absolute(Path::new(link));
        if direct.is_file() {
            return Some(direct);
        }

        let document_dir = self.absolute(from).parent().map(Path::to_path_buf)?;
        let relative = document_dir.join(link);
        if relative.is_file() {
            return Some(relative);
        }

        let name = Path::new(link).file_name()?;
        let sibling = document_dir.join(name);
        sibling.is_file().then_some(sibling)
    }
}
