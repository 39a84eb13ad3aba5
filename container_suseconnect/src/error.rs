//! Error types for the `container-suseconnect` binary.
//!
//! Configuration and registration failures are logged where they are
//! detected; the binary only turns them into an exit status.

use std::io;
use std::process::ExitCode;

use scc_credentials::ConfigError;
use thiserror::Error;

use crate::products::ProductError;

/// Errors raised while running a command.
#[derive(Debug, Error)]
pub enum AppError {
    /// Credentials could not be loaded.
    #[error("failed to load credentials: {0}")]
    Credentials(#[source] ConfigError),
    /// Connection settings could not be loaded.
    #[error("failed to load connection settings: {0}")]
    Settings(#[source] ConfigError),
    /// The registration server request failed.
    #[error(transparent)]
    Product(#[from] ProductError),
    /// The log sink could not be installed.
    #[error("failed to initialise logging: {0}")]
    Logging(#[from] tracing_subscriber::util::TryInitError),
    /// Writing command output failed.
    #[error("failed to write output: {0}")]
    Output(#[from] io::Error),
}

impl AppError {
    /// Process exit status reported for this error.
    #[must_use]
    pub const fn code(&self) -> u8 {
        match self {
            Self::Credentials(_) => 1,
            Self::Settings(_) => 2,
            Self::Product(_) => 3,
            Self::Logging(_) | Self::Output(_) => 4,
        }
    }

    /// Whether the failure was already logged where it was detected.
    #[must_use]
    pub const fn is_logged(&self) -> bool {
        !matches!(self, Self::Logging(_) | Self::Output(_))
    }

    /// Exit status for `main`.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }
}

/// Result alias for command execution.
pub type Result<T> = std::result::Result<T, AppError>;
