//! Measurement types and their wire encoding.
//!
//! A producer submission is a [`WriteBatch`] holding one or more
//! [`PointSeries`]; each series names a metric and carries its
//! [`Point`]s. The public report entry point always builds a single-series,
//! single-point batch, but the pipeline handles arbitrary shapes.

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeStruct, SerializeTuple, Serializer};

/// Free-form string tags attached to a point.
///
/// Kept ordered so the serialized form is deterministic.
pub type Dimensions = BTreeMap<String, String>;

/// Column descriptor attached to every series on the wire.
///
/// Fixed by the ingestion contract; point tuples are ordered to match.
pub const COLUMNS: [&str; 3] = ["value", "time", "dimensions"];

/// One measurement.
///
/// Immutable once constructed. `context` is carried for in-process
/// consumers and logging; the wire tuple holds only the three declared
/// columns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Point {
    /// Measured value
    pub value: f64,

    /// Free-form context tag (may be empty)
    pub context: String,

    /// Epoch seconds; `None` means unset and serializes as `0`
    pub timestamp: Option<i64>,

    /// Dimension tags (may be empty)
    pub dimensions: Dimensions,
}

impl Point {
    /// Create a point carrying only a value.
    pub fn new(value: f64) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    /// Set the context tag.
    #[must_use]
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the timestamp, in epoch seconds.
    #[must_use]
    pub fn with_timestamp(mut self, epoch_secs: i64) -> Self {
        self.timestamp = Some(epoch_secs);
        self
    }

    /// Add one dimension tag.
    #[must_use]
    pub fn with_dimension(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.dimensions.insert(key.into(), value.into());
        self
    }

    /// Replace the dimension tags.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: Dimensions) -> Self {
        self.dimensions = dimensions;
        self
    }
}

// Wire encoding: the `[value, time, dimensions]` tuple matching COLUMNS.
impl Serialize for Point {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut tuple = serializer.serialize_tuple(COLUMNS.len())?;
        tuple.serialize_element(&self.value)?;
        tuple.serialize_element(&self.timestamp.unwrap_or(0))?;
        tuple.serialize_element(&self.dimensions)?;
        tuple.end()
    }
}

/// A metric name with its points.
///
/// Serializes as `{name, columns, points}`; the column descriptor is the
/// fixed [`COLUMNS`] constant, never derived from the data.
#[derive(Debug, Clone, PartialEq)]
pub struct PointSeries {
    /// Metric name (validated before entering the pipeline)
    pub name: String,

    /// Points in producer submission order
    pub points: Vec<Point>,
}

impl PointSeries {
    /// Create a series.
    pub fn new(name: impl Into<String>, points: Vec<Point>) -> Self {
        Self {
            name: name.into(),
            points,
        }
    }
}

impl Serialize for PointSeries {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut series = serializer.serialize_struct("PointSeries", 3)?;
        series.serialize_field("name", &self.name)?;
        series.serialize_field("columns", &COLUMNS)?;
        series.serialize_field("points", &self.points)?;
        series.end()
    }
}

/// One producer submission: a sequence of series.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteBatch {
    /// Series in submission order
    pub series: Vec<PointSeries>,
}

impl WriteBatch {
    /// Create a batch from a list of series.
    pub fn new(series: Vec<PointSeries>) -> Self {
        Self { series }
    }

    /// Create the common single-series, single-point batch.
    pub fn single(name: impl Into<String>, point: Point) -> Self {
        Self {
            series: vec![PointSeries::new(name, vec![point])],
        }
    }

    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }
}
