//! File validation: existence, UTF-8 readability, writability, non-emptiness.

use std::fs::{self, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::error::CanonError;

/// An absolute, canonical path to a readable, writable, non-empty file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedPath(PathBuf);

impl ValidatedPath {
    /// The validated path.
    #[must_use]
    pub fn as_path(&self) -> &Path {
        &self.0
    }
}

impl AsRef<Path> for ValidatedPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

/// Resolves `path` against the current directory without touching the file
/// system beyond reading the working directory.
fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

/// Validates a Turtle file before any parsing happens.
///
/// The write check opens the file for writing without truncating or writing
/// to it, so permission problems surface here rather than after the sort.
///
/// # Errors
///
/// - [`CanonError::NotFound`] if the path does not exist.
/// - [`CanonError::Read`] / [`CanonError::Utf8`] if it cannot be read as UTF-8.
/// - [`CanonError::Write`] if it cannot be opened for writing.
/// - [`CanonError::EmptyFile`] (a warning) if it is empty.
pub fn validate(path: impl AsRef<Path>) -> Result<ValidatedPath, CanonError> {
    let absolute = absolute(path.as_ref());

    let resolved = match fs::canonicalize(&absolute) {
        Ok(resolved) => resolved,
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(CanonError::NotFound { path: absolute });
        }
        Err(source) => {
            return Err(CanonError::Read {
                path: absolute,
                source,
            })
        }
    };
    debug!(path = %resolved.display(), "validating");

    let bytes = fs::read(&resolved).map_err(|source| CanonError::Read {
        path: resolved.clone(),
        source,
    })?;
    let content = String::from_utf8(bytes).map_err(|source| CanonError::Utf8 {
        path: resolved.clone(),
        source,
    })?;

    OpenOptions::new()
        .write(true)
        .open(&resolved)
        .map_err(|source| CanonError::Write {
            path: resolved.clone(),
            source,
        })?;

    if content.is_empty() {
        return Err(CanonError::EmptyFile { path: resolved });
    }

    Ok(ValidatedPath(resolved))
}
