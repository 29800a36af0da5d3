//! Pointcast wire protocol
//!
//! This crate defines the data model shared between producers and the
//! delivery pipeline, and the two pure operations performed on it:
//!
//! - [`point`] - measurements ([`Point`]), named series ([`PointSeries`]),
//!   and producer submissions ([`WriteBatch`]), with their JSON wire
//!   encoding
//! - [`validate`] - metric name validation applied before a submission
//!   enters the pipeline
//! - [`merge`] - coalescing of buffered submissions into one outbound
//!   payload, grouped by metric name
//!
//! # Wire Format
//!
//! A flush serializes a `Vec<PointSeries>` as a JSON array. Each series is
//! an object with a fixed column descriptor and one tuple per point,
//! ordered consistently with the columns:
//!
//! ```json
//! [
//!   {
//!     "name": "cpu.load",
//!     "columns": ["value", "time", "dimensions"],
//!     "points": [[0.73, 1700000000, {"host": "a"}]]
//!   }
//! ]
//! ```

mod error;

pub mod merge;
pub mod point;
pub mod validate;

// Re-export main types at crate root for convenience
pub use error::InvalidMetricName;
pub use merge::merge;
pub use point::{Dimensions, Point, PointSeries, WriteBatch, COLUMNS};
pub use validate::{validate_metric_name, MAX_METRIC_NAME_LEN};
