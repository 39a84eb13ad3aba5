//! Product and repository metadata served by the registration server.

use std::io::Read;

use reqwest::{StatusCode, Url};
use scc_credentials::{ConnectSettings, Credentials};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Path of the product endpoint on the registration server.
pub const PRODUCTS_PATH: &str = "/connect/systems/products";

/// A repository as described by the registration server.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Repository {
    /// Repository alias.
    pub name: String,
    /// Human-readable description.
    pub description: String,
    /// Repository URL, possibly carrying an access token.
    pub url: String,
    /// Whether zypper should refresh the repository automatically.
    pub autorefresh: bool,
    /// Whether the repository is enabled.
    pub enabled: bool,
}

/// A product and the repositories it grants access to.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Product {
    /// Product classification, such as `base` or `module`.
    pub product_type: String,
    /// Product identifier, such as `SLES`.
    pub identifier: String,
    /// Product version, such as `15.5`.
    pub version: String,
    /// Target architecture.
    pub arch: String,
    /// Repositories granted for this product.
    pub repositories: Vec<Repository>,
}

/// Product whose repositories are requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InstalledProduct {
    /// Product identifier, such as `SLES`.
    pub identifier: String,
    /// Product version, such as `15.5`.
    pub version: String,
    /// Target architecture.
    pub arch: String,
}

/// Failures while requesting or decoding product information.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProductError {
    /// The configured server URL is unusable.
    #[error("Invalid registration server URL '{url}': {reason}")]
    InvalidUrl {
        /// URL as configured.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },
    /// The request could not be built or sent.
    #[error("Could not connect with registration server: {0}")]
    Connect(#[source] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("Registration server returned {status} for product request")]
    Status {
        /// Status code received.
        status: StatusCode,
    },
    /// The response body could not be read.
    #[error("Can't read product information: {0}")]
    Read(#[source] std::io::Error),
    /// The response body is not a valid product document.
    #[error("Can't read product information: {0}")]
    Decode(#[source] serde_json::Error),
}

impl ProductError {
    #[must_use]
    fn logged(self) -> Self {
        tracing::error!("{self}");
        self
    }
}

/// Decodes a product document from `reader`.
///
/// Missing fields take their default values; unknown fields are ignored.
///
/// # Errors
///
/// Returns [`ProductError::Read`] or [`ProductError::Decode`], already
/// logged.
pub fn parse_product<R: Read>(mut reader: R) -> Result<Product, ProductError> {
    let mut data = Vec::new();
    reader
        .read_to_end(&mut data)
        .map_err(|err| ProductError::Read(err).logged())?;
    serde_json::from_slice(&data).map_err(|err| ProductError::Decode(err).logged())
}

/// Builds the product endpoint URL for `installed` below `base`.
///
/// # Errors
///
/// Returns [`ProductError::InvalidUrl`], already logged, when `base` is not
/// an absolute URL.
pub fn product_url(base: &str, installed: &InstalledProduct) -> Result<Url, ProductError> {
    let mut url = Url::parse(base).map_err(|err| {
        ProductError::InvalidUrl {
            url: base.to_owned(),
            reason: err.to_string(),
        }
        .logged()
    })?;
    url.set_path(PRODUCTS_PATH);
    url.query_pairs_mut()
        .clear()
        .append_pair("identifier", &installed.identifier)
        .append_pair("version", &installed.version)
        .append_pair("arch", &installed.arch);
    Ok(url)
}

/// Requests `installed` from the registration server in `settings`.
///
/// Sends one authenticated GET request; certificate verification is skipped
/// only when the settings mark the server as insecure. No retries.
///
/// # Errors
///
/// Returns a [`ProductError`], already logged, when the URL is invalid, the
/// request fails, the server rejects it or the body cannot be decoded.
pub fn request_product(
    settings: &ConnectSettings,
    credentials: &Credentials,
    installed: &InstalledProduct,
) -> Result<Product, ProductError> {
    let url = product_url(settings.url(), installed)?;
    let client = reqwest::blocking::Client::builder()
        .danger_accept_invalid_certs(settings.insecure())
        .build()
        .map_err(|err| ProductError::Connect(err).logged())?;

    tracing::info!(
        url = %url,
        identifier = %installed.identifier,
        "requesting product from registration server"
    );
    let response = client
        .get(url)
        .basic_auth(credentials.username(), Some(credentials.password()))
        .send()
        .map_err(|err| ProductError::Connect(err.without_url()).logged())?;

    let status = response.status();
    if !status.is_success() {
        return Err(ProductError::Status { status }.logged());
    }
    parse_product(response)
}
