//! Shared HTTP client construction.

use std::time::Duration;

use reqwest::Client;
use verpin_util::errors::VerpinError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Build a shared reqwest client for registry requests.
pub fn build_client() -> Result<Client, VerpinError> {
    Client::builder()
        .timeout(REQUEST_TIMEOUT)
        .user_agent(concat!("verpin/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| VerpinError::Network {
            message: format!("Failed to create HTTP client: {e}"),
        })
}
