//! SUSE Customer Center credentials as a configuration target.
//!
//! Credential files are `key=value` lines holding `username`, `password` and
//! an optional `system_token`. They may be mounted by the host, by a plain
//! secrets mount or by a namespaced secrets mount; the first one present
//! wins.

use std::fmt;

use camino::Utf8PathBuf;

use crate::key_value::warn_unknown_key;
use crate::{ConfigResult, ParseableTarget, ValidationError, read_configuration};

/// Credential file locations, highest priority first.
pub const CREDENTIALS_LOCATIONS: [&str; 3] = [
    "/etc/zypp/credentials.d/SCCcredentials",
    "/run/secrets/SCCcredentials",
    "/run/secrets/credentials.d/SCCcredentials",
];

/// Identity used to authenticate against the registration server.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Credentials {
    username: String,
    password: String,
    system_token: String,
}

impl Credentials {
    /// Registration username.
    #[must_use]
    pub fn username(&self) -> &str {
        &self.username
    }

    /// Registration password.
    #[must_use]
    pub fn password(&self) -> &str {
        &self.password
    }

    /// System token, when the file provides a non-empty one.
    #[must_use]
    pub fn system_token(&self) -> Option<&str> {
        Some(self.system_token.as_str()).filter(|token| !token.is_empty())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("system_token", &self.system_token().map(|_| "<redacted>"))
            .finish()
    }
}

impl ParseableTarget for Credentials {
    fn locations(&self) -> Vec<Utf8PathBuf> {
        CREDENTIALS_LOCATIONS
            .iter()
            .map(|path| Utf8PathBuf::from(*path))
            .collect()
    }

    fn separator(&self) -> u8 {
        b'='
    }

    fn set_value(&mut self, key: &str, value: &str) {
        match key {
            "username" => value.clone_into(&mut self.username),
            "password" => value.clone_into(&mut self.password),
            "system_token" => value.clone_into(&mut self.system_token),
            other => warn_unknown_key(other),
        }
    }

    fn on_no_location_found(&self) -> bool {
        false
    }

    fn validate(&self) -> ConfigResult<()> {
        let missing = match (self.username.is_empty(), self.password.is_empty()) {
            (true, true) => ValidationError::MissingUsernameAndPassword,
            (true, false) => ValidationError::MissingUsername,
            (false, true) => ValidationError::MissingPassword,
            (false, false) => return Ok(()),
        };
        Err(missing.logged().into())
    }
}

/// Loads credentials from the first credential file present on the host.
///
/// # Errors
///
/// Returns [`ConfigError::NotFound`](crate::ConfigError::NotFound) when no
/// credential file exists, [`ConfigError::Read`](crate::ConfigError::Read)
/// when the selected file cannot be read and
/// [`ConfigError::Validation`](crate::ConfigError::Validation) when the
/// username or password is missing. Each failure has already been logged.
pub fn load_credentials() -> ConfigResult<Credentials> {
    let mut credentials = Credentials::default();
    read_configuration(&mut credentials)?;
    Ok(credentials)
}
