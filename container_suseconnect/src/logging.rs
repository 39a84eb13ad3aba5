//! Process-wide log sink.
//!
//! Events go to stderr and, when it can be opened, are appended to a log
//! file as plain text. The sink is installed once at startup; libraries only
//! emit through `tracing`.

use std::fs::{File, OpenOptions};
use std::io;
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use tracing::Subscriber;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Log file used when [`LOG_ENV`] is unset or empty.
pub const DEFAULT_LOG_PATH: &str = "/var/log/suseconnect.log";

/// Environment variable overriding the log file path.
pub const LOG_ENV: &str = "SUSECONNECT_LOG_FILE";

/// Returns the log file path from [`LOG_ENV`], or [`DEFAULT_LOG_PATH`].
#[must_use]
pub fn log_path() -> Utf8PathBuf {
    std::env::var(LOG_ENV)
        .ok()
        .filter(|value| !value.is_empty())
        .map_or_else(|| Utf8PathBuf::from(DEFAULT_LOG_PATH), Utf8PathBuf::from)
}

/// Opens `path` for appending, creating it with mode `0640` when missing.
///
/// # Errors
///
/// Returns the I/O error when the file cannot be opened or created.
pub fn open_log_file(path: &Utf8Path) -> io::Result<File> {
    let mut options = OpenOptions::new();
    options.append(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o640);
    }
    options.open(path)
}

/// Builds the stderr + file subscriber without installing it.
///
/// When the log file cannot be opened the subscriber writes to stderr only
/// and the open failure is returned alongside it for reporting.
pub fn subscriber(
    path: &Utf8Path,
    filter: EnvFilter,
) -> (impl Subscriber + Send + Sync + 'static, Option<io::Error>) {
    let (file, failure) = match open_log_file(path) {
        Ok(file) => (Some(file), None),
        Err(err) => (None, Some(err)),
    };
    let file_layer = file.map(|file| {
        fmt::layer()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
    });
    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .with(file_layer);
    (subscriber, failure)
}

/// Verbosity from `RUST_LOG`, defaulting to `info`.
#[must_use]
pub fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs the global log sink writing to stderr and `path`.
///
/// # Errors
///
/// Returns an error when a global subscriber is already installed.
pub fn init_logging(path: &Utf8Path) -> Result<(), tracing_subscriber::util::TryInitError> {
    let (subscriber, failure) = subscriber(path, default_filter());
    subscriber.try_init()?;
    if let Some(err) = failure {
        tracing::warn!("Failed to set up log file '{path}': {err}");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::fs;

    use anyhow::{Result, anyhow, ensure};
    use camino::{Utf8Path, Utf8PathBuf};
    use rstest::rstest;
    use tempfile::TempDir;
    use test_helpers::env;
    use tracing_subscriber::EnvFilter;

    use super::{DEFAULT_LOG_PATH, LOG_ENV, log_path, subscriber};

    fn temp_root() -> Result<(TempDir, Utf8PathBuf)> {
        let temp = tempfile::tempdir()?;
        let root = Utf8Path::from_path(temp.path())
            .map(Utf8Path::to_path_buf)
            .ok_or_else(|| anyhow!("temporary directory path is not valid UTF-8"))?;
        Ok((temp, root))
    }

    #[rstest]
    fn log_path_defaults_when_unset() {
        let _lock = env::lock();
        let _guard = env::remove_var(LOG_ENV);
        assert_eq!(log_path().as_str(), DEFAULT_LOG_PATH);
    }

    #[rstest]
    fn log_path_ignores_empty_override() {
        let _lock = env::lock();
        let _guard = env::set_var(LOG_ENV, "");
        assert_eq!(log_path().as_str(), DEFAULT_LOG_PATH);
    }

    #[rstest]
    fn log_path_uses_environment_override() {
        let _lock = env::lock();
        let _guard = env::set_var(LOG_ENV, "/tmp/file.log");
        assert_eq!(log_path().as_str(), "/tmp/file.log");
    }

    #[rstest]
    fn events_are_appended_to_the_log_file() -> Result<()> {
        let (_temp, root) = temp_root()?;
        let path = root.join("suse.log");
        fs::write(&path, "existing line\n")?;

        let (sink, failure) = subscriber(&path, EnvFilter::new("info"));
        ensure!(failure.is_none(), "log file should open: {failure:?}");
        tracing::subscriber::with_default(sink, || {
            tracing::info!("This is a log entry in a file and Stderr");
        });

        let contents = fs::read_to_string(&path)?;
        ensure!(contents.starts_with("existing line\n"), "file was truncated");
        ensure!(
            contents.contains("This is a log entry in a file and Stderr"),
            "missing log line in: {contents}"
        );
        ensure!(!contents.contains('\u{1b}'), "file output must not carry ANSI codes");
        Ok(())
    }

    #[cfg(unix)]
    #[rstest]
    fn new_log_file_is_group_readable_only() -> Result<()> {
        use std::os::unix::fs::PermissionsExt;

        let (_temp, root) = temp_root()?;
        let path = root.join("fresh.log");
        let _file = super::open_log_file(&path)?;
        let mode = fs::metadata(&path)?.permissions().mode() & 0o777;
        ensure!(mode & !0o640 == 0, "unexpected mode {mode:o}");
        Ok(())
    }

    #[rstest]
    fn unwritable_log_file_falls_back_to_stderr() -> Result<()> {
        let (_temp, root) = temp_root()?;
        let path = root.join("path/that/does/not/exist/suse.log");

        let (sink, failure) = subscriber(&path, EnvFilter::new("info"));
        ensure!(failure.is_some(), "opening should fail");
        tracing::subscriber::with_default(sink, || {
            tracing::info!("This is not a log entry in a file");
        });

        ensure!(!path.exists(), "log file must not be created");
        Ok(())
    }
}
