//! Command-line interface and command dispatch.

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand};
use scc_credentials::{Credentials, load_credentials, load_settings};

use crate::error::{AppError, Result};
use crate::logging::LOG_ENV;
use crate::products::{InstalledProduct, Product, request_product};

/// Resolve SCC credentials and list the repositories they unlock.
#[derive(Debug, Parser)]
#[command(name = "container-suseconnect", version, about)]
pub struct Cli {
    /// Log file path; defaults to `$SUSECONNECT_LOG_FILE` or
    /// `/var/log/suseconnect.log`.
    #[arg(long, global = true, env = LOG_ENV, value_name = "PATH")]
    pub log_file: Option<Utf8PathBuf>,

    /// Command to run.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Load the credential file and report whose identity it holds.
    CheckCredentials,
    /// Print the repositories granted for a product.
    ListRepositories(ProductArgs),
    /// Print the full product document as JSON.
    ShowProduct(ProductArgs),
}

/// Identifies the product to request.
#[derive(Debug, Clone, Args)]
pub struct ProductArgs {
    /// Product identifier, such as `SLES`.
    #[arg(long)]
    pub identifier: String,
    /// Product version, such as `15.5`.
    #[arg(long)]
    pub version: String,
    /// Target architecture, such as `x86_64`.
    #[arg(long)]
    pub arch: String,
}

impl From<ProductArgs> for InstalledProduct {
    fn from(args: ProductArgs) -> Self {
        Self {
            identifier: args.identifier,
            version: args.version,
            arch: args.arch,
        }
    }
}

/// Runs `command`, writing its output to `out`.
///
/// # Errors
///
/// Returns an [`AppError`] when loading configuration, talking to the
/// registration server or writing output fails.
pub fn execute<W: Write>(command: Command, out: &mut W) -> Result<()> {
    match command {
        Command::CheckCredentials => {
            let credentials = load_credentials().map_err(AppError::Credentials)?;
            write_identity(&credentials, out)
        }
        Command::ListRepositories(args) => {
            let product = fetch_product(args.into())?;
            write_repositories(&product, out)
        }
        Command::ShowProduct(args) => {
            let product = fetch_product(args.into())?;
            serde_json::to_writer_pretty(&mut *out, &product).map_err(std::io::Error::from)?;
            writeln!(out)?;
            Ok(())
        }
    }
}

fn fetch_product(installed: InstalledProduct) -> Result<Product> {
    let settings = load_settings().map_err(AppError::Settings)?;
    let credentials = load_credentials().map_err(AppError::Credentials)?;
    Ok(request_product(&settings, &credentials, &installed)?)
}

/// Writes the username and whether a system token is present.
///
/// # Errors
///
/// Returns [`AppError::Output`] when writing fails.
pub fn write_identity<W: Write>(credentials: &Credentials, out: &mut W) -> Result<()> {
    writeln!(out, "username: {}", credentials.username())?;
    let token = if credentials.system_token().is_some() {
        "present"
    } else {
        "absent"
    };
    writeln!(out, "system token: {token}")?;
    Ok(())
}

/// Writes one `name<TAB>url<TAB>enabled` line per repository.
///
/// # Errors
///
/// Returns [`AppError::Output`] when writing fails.
pub fn write_repositories<W: Write>(product: &Product, out: &mut W) -> Result<()> {
    for repository in &product.repositories {
        writeln!(
            out,
            "{}\t{}\t{}",
            repository.name, repository.url, repository.enabled
        )?;
    }
    Ok(())
}
