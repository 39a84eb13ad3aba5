//! Error types produced by the configuration reader and its targets.

mod types;

pub use types::{ConfigError, ValidationError};

/// Result alias used throughout the configuration reader.
pub type ConfigResult<T> = Result<T, ConfigError>;
