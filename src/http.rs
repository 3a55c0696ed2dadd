//! Thin JSON-over-HTTP helper shared by the geocoder and the archive client.

use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::config::Config;
use crate::error::{Result, ThermochronError};

/// Build the shared HTTP client with the configured timeout
pub fn build_client(config: &Config) -> Result<Client> {
    Client::builder()
        .timeout(config.http_timeout)
        .user_agent(concat!("thermochron/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|source| ThermochronError::Http {
            url: "<client builder>".to_string(),
            source,
        })
}

/// GET `base_url` with query parameters and decode the JSON body
///
/// Non-2xx statuses become `Http` errors.
pub async fn get_json<T: DeserializeOwned>(
    client: &Client,
    base_url: &str,
    query: &[(&str, String)],
) -> Result<T> {
    let http_err = |source| ThermochronError::Http {
        url: base_url.to_string(),
        source,
    };

    let response = client
        .get(base_url)
        .query(query)
        .send()
        .await
        .map_err(http_err)?
        .error_for_status()
        .map_err(http_err)?;

    response.json::<T>().await.map_err(http_err)
}
