//! Registration-server connection settings as a configuration target.
//!
//! The settings file is optional. It uses `key: value` lines, so only the
//! first colon separates the key and URLs survive intact in the value.

use camino::Utf8PathBuf;

use crate::key_value::warn_unknown_key;
use crate::{ConfigResult, ParseableTarget, ValidationError, read_configuration};

/// Registration server used when no settings file overrides it.
pub const DEFAULT_SCC_URL: &str = "https://scc.suse.com";

/// Settings file locations, highest priority first.
pub const SETTINGS_LOCATIONS: [&str; 1] = ["/etc/SUSEConnect"];

/// Where and how to reach the registration server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectSettings {
    url: String,
    insecure: bool,
    rejected: Option<ValidationError>,
}

impl Default for ConnectSettings {
    fn default() -> Self {
        Self {
            url: DEFAULT_SCC_URL.to_owned(),
            insecure: false,
            rejected: None,
        }
    }
}

impl ConnectSettings {
    /// Base URL of the registration server.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Whether TLS certificate verification is disabled.
    #[must_use]
    pub const fn insecure(&self) -> bool {
        self.insecure
    }
}

impl ParseableTarget for ConnectSettings {
    fn locations(&self) -> Vec<Utf8PathBuf> {
        SETTINGS_LOCATIONS
            .iter()
            .map(|path| Utf8PathBuf::from(*path))
            .collect()
    }

    fn separator(&self) -> u8 {
        b':'
    }

    fn set_value(&mut self, key: &str, value: &str) {
        match key {
            "url" => value.clone_into(&mut self.url),
            "insecure" => match parse_bool(value) {
                Some(flag) => self.insecure = flag,
                None => {
                    self.rejected = Some(ValidationError::InvalidValue {
                        key: key.to_owned(),
                        value: value.to_owned(),
                        expected: "true or false",
                    });
                }
            },
            other => warn_unknown_key(other),
        }
    }

    fn on_no_location_found(&self) -> bool {
        true
    }

    fn validate(&self) -> ConfigResult<()> {
        if let Some(rejected) = &self.rejected {
            return Err(rejected.clone().logged().into());
        }
        if self.url.is_empty() {
            return Err(ValidationError::InvalidValue {
                key: "url".to_owned(),
                value: String::new(),
                expected: "a registration server URL",
            }
            .logged()
            .into());
        }
        Ok(())
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    if value.eq_ignore_ascii_case("true") {
        Some(true)
    } else if value.eq_ignore_ascii_case("false") {
        Some(false)
    } else {
        None
    }
}

/// Loads connection settings, falling back to defaults when no file exists.
///
/// # Errors
///
/// Returns [`ConfigError::Read`](crate::ConfigError::Read) when the settings
/// file exists but cannot be read and
/// [`ConfigError::Validation`](crate::ConfigError::Validation) when it holds
/// an unusable value.
pub fn load_settings() -> ConfigResult<ConnectSettings> {
    let mut settings = ConnectSettings::default();
    read_configuration(&mut settings)?;
    Ok(settings)
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::{ConnectSettings, DEFAULT_SCC_URL};
    use crate::{ConfigError, KeyValueStore, ParseableTarget, ValidationError};

    fn settings_from(lines: &str) -> ConnectSettings {
        let mut settings = ConnectSettings::default();
        let store = KeyValueStore::for_target(&settings);
        for line in lines.lines() {
            store.apply_line(line, &mut settings);
        }
        settings
    }

    #[rstest]
    fn defaults_point_at_public_scc() {
        let settings = ConnectSettings::default();
        assert_eq!(settings.url(), DEFAULT_SCC_URL);
        assert!(!settings.insecure());
        assert!(settings.on_no_location_found());
        assert_eq!(settings.separator(), b':');
        assert!(settings.validate().is_ok());
    }

    #[rstest]
    fn parses_suseconnect_style_file() {
        let settings = settings_from("---\nurl: https://rmt.example.com:8443\ninsecure: TRUE\n");
        assert_eq!(settings.url(), "https://rmt.example.com:8443");
        assert!(settings.insecure());
        assert!(settings.validate().is_ok());
    }

    #[rstest]
    #[case("yes")]
    #[case("1")]
    #[case("")]
    fn rejects_non_boolean_insecure(#[case] value: &str) {
        let settings = settings_from(&format!("insecure: {value}"));
        let (result, logs) = test_helpers::logs::capture(|| settings.validate());
        let err = result.expect_err("invalid flag must fail validation");
        assert!(
            matches!(
                &err,
                ConfigError::Validation(ValidationError::InvalidValue { key, .. }) if key == "insecure"
            ),
            "got {err:?}"
        );
        assert!(logs.contains("Invalid value"), "logs were: {logs}");
    }

    #[rstest]
    fn rejects_empty_url() {
        let settings = settings_from("url:");
        assert!(settings.validate().is_err());
    }

    #[rstest]
    fn unknown_keys_only_warn() {
        let mut settings = ConnectSettings::default();
        let ((), logs) = test_helpers::logs::capture(|| settings.set_value("language", "en"));
        assert!(logs.contains("Unknown key 'language'"), "logs were: {logs}");
        assert_eq!(settings, ConnectSettings::default());
    }
}
