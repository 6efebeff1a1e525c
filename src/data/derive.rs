//! Derivation stage: per-record metrics.

use super::record::{DerivedMetrics, Movie, MovieRecord};

/// Attach [`DerivedMetrics`] to a coerced record.
pub fn derive(record: MovieRecord) -> Movie {
    let (year, month) = DerivedMetrics::from_date(record.release_date);
    let metrics = DerivedMetrics {
        year,
        month,
        roi_percent: roi_percent(record.revenue, record.budget),
        profit: record.revenue - record.budget,
        dated: record.release_date.is_some(),
    };
    Movie { record, metrics }
}

/// Return on investment in percent.
///
/// Zero budget yields `0`, never infinity or NaN. Negative results are kept.
pub fn roi_percent(revenue: f64, budget: f64) -> f64 {
    if budget > 0.0 {
        let roi = (revenue - budget) / budget * 100.0;
        if roi.is_finite() {
            roi
        } else {
            0.0
        }
    } else {
        0.0
    }
}
