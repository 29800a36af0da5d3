//! Merging of buffered submissions into one outbound payload.

use std::collections::HashMap;

use crate::point::{Point, PointSeries, WriteBatch};

/// Coalesce buffered batches into one series per distinct metric name.
///
/// Batches are visited in arrival order and each series' points are
/// appended to its name's entry, so point order within a metric name
/// follows submission order. Order across distinct names is unspecified.
///
/// Returns `None` when there is nothing to send; callers must check this
/// before attempting delivery.
pub fn merge(batches: Vec<WriteBatch>) -> Option<Vec<PointSeries>> {
    if batches.is_empty() {
        return None;
    }

    let mut by_name: HashMap<String, Vec<Point>> = HashMap::new();
    for batch in batches {
        for series in batch.series {
            by_name.entry(series.name).or_default().extend(series.points);
        }
    }

    if by_name.is_empty() {
        return None;
    }

    Some(
        by_name
            .into_iter()
            .map(|(name, points)| PointSeries { name, points })
            .collect(),
    )
}

#[cfg(test)]
#[path = "merge_test.rs"]
mod merge_test;
