//! Primary error enums for configuration loading flows.

use std::io;

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors that can occur while reading a configuration target.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// None of the candidate locations exists and the target requires one.
    #[error("No configuration file found, tried: {}", join_paths(.locations))]
    NotFound {
        /// Candidate locations probed, in priority order.
        locations: Vec<Utf8PathBuf>,
    },

    /// A candidate exists but could not be opened or read.
    #[error("Can't read configuration file '{path}': {source}")]
    Read {
        /// Path of the file that failed to read.
        path: Utf8PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },

    /// The parsed values do not satisfy the target's requirements.
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

/// Validation failures reported by a target after parsing.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum ValidationError {
    /// Neither a username nor a password was provided.
    #[error("Can't find username and password")]
    MissingUsernameAndPassword,
    /// The password was provided without a username.
    #[error("Can't find username")]
    MissingUsername,
    /// The username was provided without a password.
    #[error("Can't find password")]
    MissingPassword,
    /// A recognised key carried a value the target cannot interpret.
    #[error("Invalid value '{value}' for '{key}': expected {expected}")]
    InvalidValue {
        /// Key whose value was rejected.
        key: String,
        /// Raw value as it appeared in the file.
        value: String,
        /// Short description of what the key accepts.
        expected: &'static str,
    },
}

impl ConfigError {
    /// Builds a [`ConfigError::Read`] for `path`.
    pub(crate) fn read(path: &Utf8Path, source: io::Error) -> Self {
        Self::Read {
            path: path.to_path_buf(),
            source,
        }
    }

    /// Emits the error on the log sink and hands it back for returning.
    #[must_use]
    pub(crate) fn logged(self) -> Self {
        tracing::error!("{self}");
        self
    }
}

impl ValidationError {
    /// Emits the error on the log sink and hands it back for returning.
    #[must_use]
    pub(crate) fn logged(self) -> Self {
        tracing::error!("{self}");
        self
    }
}

fn join_paths(paths: &[Utf8PathBuf]) -> String {
    paths
        .iter()
        .map(|path| format!("'{path}'"))
        .collect::<Vec<_>>()
        .join(", ")
}
