//! Weight series - chronological weight points for charting
//!
//! Derived on demand from weight records. Entries that are not numbers
//! stay in the series as non-plottable points instead of being dropped,
//! so the chart can show a gap where the user logged something odd.

use crate::storage::{parse_weight, Payload, Record, RecordId, RecordStore, RecordType};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One point of the weight chart
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeightPoint {
    pub record_id: RecordId,
    pub date: NaiveDate,
    #[serde(skip)]
    pub timestamp: NaiveDateTime,
    /// Kilograms, None when the entry did not parse
    pub weight: Option<f64>,
}

impl WeightPoint {
    pub fn is_plottable(&self) -> bool {
        self.weight.is_some()
    }
}

/// Weight points in ascending time order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct WeightSeries {
    points: Vec<WeightPoint>,
}

impl WeightSeries {
    pub fn from_store(store: &RecordStore) -> Self {
        weight_series(store)
    }

    pub fn points(&self) -> &[WeightPoint] {
        &self.points
    }

    /// Points with a numeric weight
    pub fn plottable(&self) -> impl Iterator<Item = &WeightPoint> {
        self.points.iter().filter(|p| p.is_plottable())
    }

    /// Most recent plottable point
    pub fn latest(&self) -> Option<&WeightPoint> {
        self.points.iter().rev().find(|p| p.is_plottable())
    }

    /// Lightest and heaviest plottable weight
    pub fn range(&self) -> Option<(f64, f64)> {
        self.plottable()
            .filter_map(|p| p.weight)
            .fold(None, |acc, w| match acc {
                None => Some((w, w)),
                Some((lo, hi)) => Some((lo.min(w), hi.max(w))),
            })
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn point(record: &Record) -> Option<WeightPoint> {
    let Payload::Weight { weight } = &record.payload else {
        return None;
    };

    let parsed = parse_weight(weight);
    if parsed.is_none() {
        tracing::warn!(id = %record.id, raw = %weight, "Weight entry is not a number");
    }

    Some(WeightPoint {
        record_id: record.id,
        date: record.date,
        timestamp: record.timestamp,
        weight: parsed,
    })
}

/// Build the weight series from every weight record in the store.
///
/// Sorted by event time ascending; records with the same time keep their
/// insertion order.
pub fn weight_series(store: &RecordStore) -> WeightSeries {
    let mut points: Vec<WeightPoint> = store
        .by_type(RecordType::Weight)
        .into_iter()
        .filter_map(point)
        .collect();

    // Store order is newest first; flip to insertion order before the stable sort
    points.reverse();
    points.sort_by_key(|p| p.timestamp);

    WeightSeries { points }
}
