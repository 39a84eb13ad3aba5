//! Core crate for resolving SUSE Customer Center configuration files.
//!
//! Configuration files handled here are plain `key<sep>value` lines. A
//! [`ParseableTarget`] describes where such a file may live, which separator
//! it uses, how each pair is stored and what makes the parsed result valid.
//! [`read_configuration`] drives any target through the same fallback search
//! and parsing loop, so [`Credentials`] and [`ConnectSettings`] share one
//! reader.
//!
//! ```rust,no_run
//! # fn main() -> scc_credentials::ConfigResult<()> {
//! let credentials = scc_credentials::load_credentials()?;
//! assert!(!credentials.username().is_empty());
//! # Ok(())
//! # }
//! ```

mod credentials;
mod error;
pub mod key_value;
pub mod locations;
mod reader;
mod settings;

pub use credentials::{CREDENTIALS_LOCATIONS, Credentials, load_credentials};
pub use error::{ConfigError, ConfigResult, ValidationError};
pub use key_value::{KeyValueStore, ParsedLine};
pub use locations::LocationResolver;
pub use reader::{ParseableTarget, read_configuration};
pub use settings::{ConnectSettings, DEFAULT_SCC_URL, SETTINGS_LOCATIONS, load_settings};
