//! End-to-end credential reads against files on disk.
//!
//! The well-known locations live under `/etc` and `/run`, so these tests wrap
//! [`Credentials`] in a target that relocates the search while delegating
//! every other decision to the real implementation.

use std::io::Write as _;

use anyhow::{Context, Result, anyhow, ensure};
use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs_utf8::Dir as Utf8Dir};
use rstest::{fixture, rstest};
use scc_credentials::{ConfigError, ConfigResult, Credentials, ParseableTarget, read_configuration};
use tempfile::TempDir;

/// Credentials searched for in caller-supplied locations.
struct Relocated<'a> {
    credentials: &'a mut Credentials,
    locations: Vec<Utf8PathBuf>,
}

impl ParseableTarget for Relocated<'_> {
    fn locations(&self) -> Vec<Utf8PathBuf> {
        self.locations.clone()
    }

    fn separator(&self) -> u8 {
        self.credentials.separator()
    }

    fn set_value(&mut self, key: &str, value: &str) {
        self.credentials.set_value(key, value);
    }

    fn on_no_location_found(&self) -> bool {
        self.credentials.on_no_location_found()
    }

    fn validate(&self) -> ConfigResult<()> {
        self.credentials.validate()
    }
}

fn read_from(locations: Vec<Utf8PathBuf>) -> ConfigResult<Credentials> {
    let mut credentials = Credentials::default();
    read_configuration(&mut Relocated {
        credentials: &mut credentials,
        locations,
    })?;
    Ok(credentials)
}

fn fixture_path() -> Utf8PathBuf {
    Utf8PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/credentials.txt")
}

struct Scratch {
    _temp: TempDir,
    root: Utf8PathBuf,
    dir: Utf8Dir,
}

impl Scratch {
    fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let mut file = self.dir.create(name).with_context(|| format!("create {name}"))?;
        file.write_all(contents.as_bytes())
            .with_context(|| format!("write {name}"))?;
        Ok(self.root.join(name))
    }
}

#[fixture]
fn scratch() -> Result<Scratch> {
    let temp = tempfile::tempdir().context("create temporary directory")?;
    let root = Utf8Path::from_path(temp.path())
        .map(Utf8Path::to_path_buf)
        .ok_or_else(|| anyhow!("temporary directory path is not valid UTF-8"))?;
    let dir = Utf8Dir::open_ambient_dir(&root, ambient_authority())
        .context("open temporary directory with cap-std")?;
    Ok(Scratch {
        _temp: temp,
        root,
        dir,
    })
}

#[rstest]
fn reads_fixture_credentials() -> Result<()> {
    let credentials = read_from(vec![fixture_path()]).context("fixture should load")?;

    ensure!(credentials.username() == "SCC_a6994b1d3ae14b35agc7cef46b4fff9a");
    ensure!(credentials.password() == "10yb1x6bd159g741ad420fd5aa5083e4");
    ensure!(credentials.system_token() == Some("36531d07-a283-441b-a02a-1cd9a88b0d5d"));
    ensure!(
        !credentials.on_no_location_found(),
        "credentials must treat absence as fatal"
    );
    Ok(())
}

#[rstest]
fn reading_twice_yields_identical_values() -> Result<()> {
    let first = read_from(vec![fixture_path()])?;
    let second = read_from(vec![fixture_path()])?;
    ensure!(first == second, "fresh reads diverged");

    let mut reused = Credentials::default();
    for _ in 0..2 {
        read_configuration(&mut Relocated {
            credentials: &mut reused,
            locations: vec![fixture_path()],
        })?;
    }
    ensure!(reused == first, "re-reading into the same value accumulated state");
    Ok(())
}

#[rstest]
fn rereading_overlays_keys_from_the_new_file(scratch: Result<Scratch>) -> Result<()> {
    let dir = scratch?;
    let rotated = dir.write("rotated", "username=renamed\npassword=rotated\n")?;

    let mut credentials = read_from(vec![fixture_path()])?;
    read_configuration(&mut Relocated {
        credentials: &mut credentials,
        locations: vec![rotated],
    })?;

    ensure!(credentials.username() == "renamed");
    ensure!(credentials.password() == "rotated");
    ensure!(
        credentials.system_token() == Some("36531d07-a283-441b-a02a-1cd9a88b0d5d"),
        "keys absent from the new file keep their previous value"
    );
    Ok(())
}

#[rstest]
fn missing_credentials_are_not_found(scratch: Result<Scratch>) -> Result<()> {
    let dir = scratch?;
    let candidates = vec![
        dir.root.join("etc/SCCcredentials"),
        dir.root.join("run/SCCcredentials"),
    ];

    let (result, logs) = test_helpers::logs::capture(|| read_from(candidates.clone()));

    match result {
        Err(ConfigError::NotFound { locations }) => {
            ensure!(locations == candidates, "unexpected locations {locations:?}");
        }
        other => return Err(anyhow!("expected NotFound, got {other:?}")),
    }
    ensure!(
        logs.contains("No configuration file found"),
        "expected the failure to be logged, got: {logs}"
    );
    Ok(())
}

#[rstest]
fn secrets_mount_is_used_when_host_file_is_absent(scratch: Result<Scratch>) -> Result<()> {
    let dir = scratch?;
    let secrets = dir.write("secrets", "username = mounted\npassword = s3cret\n")?;

    let credentials = read_from(vec![dir.root.join("host"), secrets])?;

    ensure!(credentials.username() == "mounted");
    ensure!(credentials.password() == "s3cret");
    ensure!(credentials.system_token().is_none());
    Ok(())
}

#[rstest]
#[case::empty("", "Can't find username and password")]
#[case::only_password("password=1234\n", "Can't find username")]
#[case::only_username("username=suse\n", "Can't find password")]
#[case::only_unknown("colour=blue\n", "Can't find username and password")]
fn incomplete_files_fail_validation(
    scratch: Result<Scratch>,
    #[case] contents: &str,
    #[case] expected: &str,
) -> Result<()> {
    let dir = scratch?;
    let path = dir.write("SCCcredentials", contents)?;

    let (result, logs) = test_helpers::logs::capture(|| read_from(vec![path]));

    let err = match result {
        Ok(credentials) => return Err(anyhow!("expected failure, got {credentials:?}")),
        Err(err) => err,
    };
    ensure!(matches!(err, ConfigError::Validation(_)), "unexpected {err:?}");
    ensure!(err.to_string() == expected, "unexpected message: {err}");
    ensure!(
        logs.matches(expected).count() == 1,
        "expected a single log entry, got: {logs}"
    );
    Ok(())
}
