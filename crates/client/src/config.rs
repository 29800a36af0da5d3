//! Pipeline configuration.
//!
//! All configuration is owned by the pipeline instance it is handed to;
//! there is no process-wide transport state, so multiple pipelines in one
//! process cannot interfere. Mutation ends when the pipeline is built.

use std::time::Duration;

use url::Url;

use crate::error::ConfigError;

/// Default ingestion host.
pub const DEFAULT_HOST: &str = "localhost:8086";

/// Default connect/request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Default idle window before a flush.
pub const DEFAULT_FLUSH_INTERVAL: Duration = Duration::from_secs(1);

/// Default pending-batch count that forces a flush.
pub const DEFAULT_MAX_PENDING: usize = 100;

/// Where to send series: host, database, and credentials.
///
/// # Example
///
/// ```
/// use pointcast_client::EndpointConfig;
///
/// let endpoint = EndpointConfig::new("metrics.example.com:8086", "app", "scout", "secret");
/// let url = endpoint.series_url().unwrap();
/// assert_eq!(
///     url.as_str(),
///     "http://metrics.example.com:8086/db/app/series?u=scout&p=secret"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// URL scheme, `http` or `https`
    pub scheme: String,

    /// Ingestion host, `host[:port]`
    pub host: String,

    /// Target database
    pub database: String,

    /// Username sent as the `u` query parameter
    pub username: String,

    /// Password sent as the `p` query parameter
    pub password: String,
}

impl EndpointConfig {
    /// Create an endpoint config with the default `http` scheme.
    pub fn new(
        host: impl Into<String>,
        database: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            scheme: "http".to_string(),
            host: host.into(),
            database: database.into(),
            username: username.into(),
            password: password.into(),
        }
    }

    /// Set the URL scheme.
    #[must_use]
    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    /// Build the series ingestion URL:
    /// `<scheme>://<host>/db/<database>/series?u=<username>&p=<password>`.
    ///
    /// Database name and credentials are percent-encoded.
    pub fn series_url(&self) -> Result<Url, ConfigError> {
        let base = format!("{}://{}/", self.scheme, self.host);
        let mut url = Url::parse(&base).map_err(|source| ConfigError::InvalidEndpoint {
            endpoint: base.clone(),
            source,
        })?;

        url.set_path(&format!("/db/{}/series", self.database));
        url.query_pairs_mut()
            .append_pair("u", &self.username)
            .append_pair("p", &self.password);
        Ok(url)
    }
}

impl Default for EndpointConfig {
    fn default() -> Self {
        Self::new(DEFAULT_HOST, "", "", "")
    }
}

/// Transport knobs consumed when the HTTP client is built.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    /// Connect and request timeout
    pub timeout: Duration,

    /// Optional proxy URL; `None` means direct
    pub proxy: Option<String>,
}

impl TransportConfig {
    /// Set the connect/request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Route requests through a proxy.
    #[must_use]
    pub fn with_proxy(mut self, proxy: impl Into<String>) -> Self {
        self.proxy = Some(proxy.into());
        self
    }
}

impl Default for TransportConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            proxy: None,
        }
    }
}

/// Accumulation and flush-trigger tuning.
///
/// The defaults are the production thresholds; tests tighten them to keep
/// wall-clock time down.
#[derive(Debug, Clone)]
pub struct ReporterConfig {
    /// Idle window before pending batches are flushed. The window restarts
    /// on every loop iteration, so the cadence is "idle for this long",
    /// not a fixed wall-clock period.
    pub flush_interval: Duration,

    /// Pending-batch count that forces an immediate flush
    pub max_pending: usize,
}

impl ReporterConfig {
    /// Set the idle flush window.
    #[must_use]
    pub fn with_flush_interval(mut self, interval: Duration) -> Self {
        self.flush_interval = interval;
        self
    }

    /// Set the size threshold.
    #[must_use]
    pub fn with_max_pending(mut self, max_pending: usize) -> Self {
        self.max_pending = max_pending;
        self
    }
}

impl Default for ReporterConfig {
    fn default() -> Self {
        Self {
            flush_interval: DEFAULT_FLUSH_INTERVAL,
            max_pending: DEFAULT_MAX_PENDING,
        }
    }
}
