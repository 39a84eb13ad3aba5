//! Candidate-location probing for configuration targets.
//!
//! A target publishes its candidate paths in priority order. The resolver
//! picks the first one present on the filesystem without creating, opening or
//! otherwise touching any of them.

use std::fs;
use std::io;

use camino::{Utf8Path, Utf8PathBuf};

/// Ordered list of candidate configuration paths.
///
/// # Examples
///
/// ```rust
/// use camino::Utf8PathBuf;
/// use scc_credentials::LocationResolver;
///
/// let candidates = vec![Utf8PathBuf::from("/nonexistent/SCCcredentials")];
/// let resolver = LocationResolver::new(&candidates);
/// assert!(resolver.resolve().is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct LocationResolver<'a> {
    candidates: &'a [Utf8PathBuf],
}

impl<'a> LocationResolver<'a> {
    /// Creates a resolver over `candidates`, highest priority first.
    #[must_use]
    pub const fn new(candidates: &'a [Utf8PathBuf]) -> Self {
        Self { candidates }
    }

    /// Returns the candidates in priority order.
    #[must_use]
    pub const fn candidates(&self) -> &'a [Utf8PathBuf] {
        self.candidates
    }

    /// Returns the first candidate present on the filesystem.
    ///
    /// Candidates that are missing, or that are directories, are skipped.
    /// A candidate whose metadata cannot be read for any other reason (for
    /// example a permission failure) counts as present so the caller reports
    /// the failure instead of silently falling back to a lower-priority file.
    #[must_use]
    pub fn resolve(&self) -> Option<&'a Utf8Path> {
        self.candidates
            .iter()
            .map(Utf8PathBuf::as_path)
            .find(|path| is_present(path))
    }
}

fn is_present(path: &Utf8Path) -> bool {
    match fs::metadata(path) {
        Ok(metadata) => !metadata.is_dir(),
        Err(err) => !matches!(
            err.kind(),
            io::ErrorKind::NotFound | io::ErrorKind::NotADirectory
        ),
    }
}
