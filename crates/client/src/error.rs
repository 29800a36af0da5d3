//! Client error types.

use pointcast_protocol::InvalidMetricName;
use thiserror::Error;

/// Errors surfaced synchronously from configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Endpoint host/scheme does not form a valid URL
    #[error("invalid endpoint {endpoint:?}: {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    /// Proxy URL could not be parsed
    #[error("invalid proxy url {url:?}: {source}")]
    InvalidProxy {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP client construction failed
    #[error("failed to build http client: {0}")]
    ClientBuild(#[source] reqwest::Error),
}

/// Errors surfaced synchronously to callers of `report`.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Metric name failed validation; the point never entered the pipeline
    #[error(transparent)]
    InvalidName(#[from] InvalidMetricName),

    /// The consumer task has shut down; no further submissions are accepted
    #[error("metrics pipeline is shut down")]
    PipelineClosed,
}

/// A failed flush. Logged by the consumer loop; the window's points are
/// dropped, never retried.
#[derive(Debug, Error)]
pub enum DeliveryError {
    /// Payload could not be encoded
    #[error("failed to serialize payload: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Transport-level failure (DNS, connect, timeout)
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Endpoint answered outside the 2xx range
    #[error("server returned {status}: {body}")]
    Server { status: u16, body: String },
}
