//! Pointcast client - buffered, batching metrics delivery.
//!
//! Application code reports named, timestamped, dimensioned measurements;
//! a background task accumulates them, coalesces pending submissions by
//! metric name, and ships each window as a single POST to an
//! InfluxDB-style `/db/<database>/series` endpoint.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────┐  capacity-1   ┌──────────────┐  merged   ┌──────────────┐
//! │ producers │──────────────▶│   Reporter   │──────────▶│   Delivery   │
//! │ (report)  │   channel     │ (async task) │  window   │ (HTTP POST)  │
//! └───────────┘               └──────────────┘           └──────────────┘
//!       │                            │
//!       │ blocks until the          │ flushes on: size threshold,
//!       │ consumer is ready         │ idle timeout, shutdown
//! ```
//!
//! The intake channel holds a single in-flight submission, so producers
//! cannot outrun the consumer: while a flush's request is on the wire, at
//! most one further submission is queued and later callers wait. Exactly
//! one request is in flight at any time per pipeline instance.
//!
//! # Delivery Semantics
//!
//! Reporting is best-effort, not durable. Errors found at submission time
//! (bad metric name, closed pipeline, bad configuration) are returned to
//! the caller; errors found while flushing (serialization, transport,
//! non-2xx status) are logged and the window's points are dropped. There
//! is no retry and no re-queue. [`ReporterHandle::shutdown`] flushes
//! whatever is pending and resolves only after that final delivery
//! attempt has finished.
//!
//! # Usage
//!
//! ```rust,no_run
//! use pointcast_client::{
//!     spawn, DeliveryClient, Dimensions, EndpointConfig, ReporterConfig, TransportConfig,
//! };
//! use std::time::SystemTime;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let endpoint = EndpointConfig::new("localhost:8086", "app", "scout", "secret");
//!     let delivery = DeliveryClient::new(&endpoint, &TransportConfig::default())?;
//!     let reporter = spawn(delivery, ReporterConfig::default());
//!
//!     let mut dimensions = Dimensions::new();
//!     dimensions.insert("host".into(), "a".into());
//!     reporter
//!         .report("cpu.load", 0.73, Some(SystemTime::now()), "", dimensions)
//!         .await?;
//!
//!     // Drains buffered points before returning.
//!     reporter.shutdown().await?;
//!     Ok(())
//! }
//! ```

mod error;

pub mod config;
pub mod delivery;
pub mod reporter;
pub mod runtime_stats;

#[cfg(test)]
mod test_support;

// Re-export main types at crate root for convenience
pub use config::{EndpointConfig, ReporterConfig, TransportConfig};
pub use delivery::DeliveryClient;
pub use error::{ConfigError, DeliveryError, ReportError};
pub use reporter::{spawn, Reporter, ReporterHandle};
pub use runtime_stats::{RuntimeStatsConfig, RuntimeStatsHandle};

// Re-export the wire data model
pub use pointcast_protocol::{
    merge, validate_metric_name, Dimensions, InvalidMetricName, Point, PointSeries, WriteBatch,
    COLUMNS,
};
