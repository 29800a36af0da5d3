//! Protocol error types.

use thiserror::Error;

/// A metric name rejected before entering the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidMetricName {
    /// Name is empty
    #[error("metric name must not be empty")]
    Empty,

    /// Name exceeds the maximum length
    #[error("metric name too long: {0} bytes exceeds maximum 255")]
    TooLong(usize),

    /// Name contains characters outside the allowed set
    #[error("invalid metric name {0:?}: only ASCII letters, digits, '.' and '_' are allowed")]
    InvalidCharacters(String),
}
