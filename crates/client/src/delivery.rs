//! Outbound delivery of merged windows.
//!
//! One client per pipeline instance; one POST per flush. A non-2xx status
//! or transport failure is reported as a [`DeliveryError`] and the window
//! is dropped by the caller - there is no retry here.

use pointcast_protocol::PointSeries;
use reqwest::header::CONTENT_TYPE;
use url::Url;

use crate::config::{EndpointConfig, TransportConfig};
use crate::error::{ConfigError, DeliveryError};

/// Serializes merged series and performs the outbound request.
#[derive(Debug, Clone)]
pub struct DeliveryClient {
    url: Url,
    http: reqwest::Client,
}

impl DeliveryClient {
    /// Build a delivery client for the given endpoint.
    ///
    /// Transport configuration (timeout, proxy) is fixed here; a malformed
    /// proxy URL fails synchronously.
    pub fn new(
        endpoint: &EndpointConfig,
        transport: &TransportConfig,
    ) -> Result<Self, ConfigError> {
        let url = endpoint.series_url()?;

        let mut builder = reqwest::Client::builder()
            .connect_timeout(transport.timeout)
            .timeout(transport.timeout);

        if let Some(proxy_url) = &transport.proxy {
            let proxy =
                reqwest::Proxy::all(proxy_url).map_err(|source| ConfigError::InvalidProxy {
                    url: proxy_url.clone(),
                    source,
                })?;
            builder = builder.proxy(proxy);
        }

        let http = builder.build().map_err(ConfigError::ClientBuild)?;
        Ok(Self { url, http })
    }

    /// The resolved ingestion URL.
    pub fn url(&self) -> &Url {
        &self.url
    }

    /// Serialize `series` and POST it as one request.
    ///
    /// Success is any 2xx status. Other statuses carry the response body
    /// text for logging; transport failures carry the underlying error.
    pub async fn deliver(&self, series: &[PointSeries]) -> Result<(), DeliveryError> {
        let body = serde_json::to_vec(series)?;

        let response = self
            .http
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        Err(DeliveryError::Server {
            status: status.as_u16(),
            body,
        })
    }
}

#[cfg(test)]
#[path = "delivery_test.rs"]
mod delivery_test;
