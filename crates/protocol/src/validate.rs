//! Metric name validation.
//!
//! Applied synchronously by the report entry point; a failing name never
//! reaches the ingestion channel.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::InvalidMetricName;

/// Maximum metric name length in bytes.
pub const MAX_METRIC_NAME_LEN: usize = 255;

/// Allowed metric name characters.
static METRIC_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._]*$").unwrap());

/// Check that `name` is a well-formed metric name.
///
/// Names must be non-empty, at most [`MAX_METRIC_NAME_LEN`] bytes, and
/// contain only ASCII letters, digits, `.` and `_`.
pub fn validate_metric_name(name: &str) -> Result<(), InvalidMetricName> {
    if name.is_empty() {
        return Err(InvalidMetricName::Empty);
    }
    if name.len() > MAX_METRIC_NAME_LEN {
        return Err(InvalidMetricName::TooLong(name.len()));
    }
    if !METRIC_NAME.is_match(name) {
        return Err(InvalidMetricName::InvalidCharacters(name.to_string()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_names() {
        for name in [
            "cpu",
            "cpu.load",
            "cpu.load.1m",
            "some_metric",
            "A.B_c.9",
            "0",
        ] {
            assert!(validate_metric_name(name).is_ok(), "rejected {name:?}");
        }
    }

    #[test]
    fn test_name_at_length_limit() {
        let name = "a".repeat(MAX_METRIC_NAME_LEN);
        assert!(validate_metric_name(&name).is_ok());
    }

    #[test]
    fn test_name_over_length_limit() {
        let name = "a".repeat(MAX_METRIC_NAME_LEN + 1);
        assert_eq!(
            validate_metric_name(&name),
            Err(InvalidMetricName::TooLong(MAX_METRIC_NAME_LEN + 1))
        );
    }

    #[test]
    fn test_empty_name() {
        assert_eq!(validate_metric_name(""), Err(InvalidMetricName::Empty));
    }

    #[test]
    fn test_invalid_characters() {
        for name in ["cpu load", "cpu-load", "cpu/load", "cpu:load", "負荷"] {
            assert_eq!(
                validate_metric_name(name),
                Err(InvalidMetricName::InvalidCharacters(name.to_string())),
                "accepted {name:?}"
            );
        }
    }

    #[test]
    fn test_error_display() {
        let err = InvalidMetricName::TooLong(300);
        assert_eq!(
            err.to_string(),
            "metric name too long: 300 bytes exceeds maximum 255"
        );

        let err = InvalidMetricName::InvalidCharacters("cpu load".into());
        assert!(err.to_string().contains("cpu load"));
    }
}
