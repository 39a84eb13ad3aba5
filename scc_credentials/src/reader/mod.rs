//! Generic driver reading any [`ParseableTarget`] from its first available
//! location.

use std::fs::File;
use std::io::BufReader;

use camino::{Utf8Path, Utf8PathBuf};

use crate::{ConfigError, ConfigResult, KeyValueStore, LocationResolver};

/// Capability set a configuration target exposes to [`read_configuration`].
///
/// Implementors decide where their file may live, how it is split, what each
/// key means and whether the parsed result is acceptable. The reader owns the
/// search and the parsing loop.
pub trait ParseableTarget {
    /// Candidate file paths, highest priority first.
    fn locations(&self) -> Vec<Utf8PathBuf>;

    /// ASCII byte separating keys from values.
    fn separator(&self) -> u8;

    /// Stores one parsed pair.
    ///
    /// Unrecognised keys should be reported with
    /// [`warn_unknown_key`](crate::key_value::warn_unknown_key) and otherwise
    /// ignored.
    fn set_value(&mut self, key: &str, value: &str);

    /// Decides whether a missing file is acceptable.
    ///
    /// Returning `false` turns the absence into [`ConfigError::NotFound`];
    /// returning `true` leaves the target in its default state.
    fn on_no_location_found(&self) -> bool;

    /// Checks the parsed values once the whole file has been consumed.
    ///
    /// Implementations log the failure before returning it.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] describing why the target is unusable.
    fn validate(&self) -> ConfigResult<()>;
}

/// Reads `target` from the first of its locations present on disk.
///
/// The first present candidate is opened and streamed line by line through a
/// [`KeyValueStore`] built from the target's separator; afterwards the
/// target's [`ParseableTarget::validate`] decides the outcome. A candidate
/// that exists but cannot be read is fatal and never triggers a fallback to a
/// lower-priority location.
///
/// # Errors
///
/// - [`ConfigError::NotFound`] when no candidate exists and the target
///   requires one.
/// - [`ConfigError::Read`] when the selected file cannot be opened or read.
/// - Whatever [`ParseableTarget::validate`] returns, unchanged.
///
/// Reader errors are logged here; validation errors are logged by the target.
///
/// Only keys present in the file are written, so reading into a target that
/// already holds values overlays the new file on top of them. Start from a
/// default target for a fresh read.
pub fn read_configuration<T: ParseableTarget + ?Sized>(target: &mut T) -> ConfigResult<()> {
    let locations = target.locations();
    let resolved = LocationResolver::new(&locations)
        .resolve()
        .map(Utf8Path::to_path_buf);
    let Some(path) = resolved else {
        if target.on_no_location_found() {
            tracing::debug!(
                candidates = locations.len(),
                "no configuration file found, keeping defaults"
            );
            return Ok(());
        }
        return Err(ConfigError::NotFound { locations }.logged());
    };

    tracing::debug!(path = %path, "reading configuration file");
    let file = File::open(&path).map_err(|err| ConfigError::read(&path, err).logged())?;
    let store = KeyValueStore::for_target(target);
    let applied = store
        .load(BufReader::new(file), target)
        .map_err(|err| ConfigError::read(&path, err).logged())?;
    tracing::debug!(path = %path, pairs = applied, "parsed configuration file");

    target.validate()
}
