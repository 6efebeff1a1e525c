//! Record types produced by the pipeline stages.

use std::sync::Arc;

use chrono::{Datelike, NaiveDate};

use super::categorize::SuccessCategory;

/// Year used when a record has no release date.
pub const UNKNOWN_YEAR: i32 = 0;

/// Month used when a record has no release date.
pub const UNKNOWN_MONTH: u32 = 0;

/// One row of the source table after coercion.
#[derive(Debug, Clone, PartialEq)]
pub struct MovieRecord {
    pub name: String,
    /// Parsed genre tags, trimmed, in order of first appearance.
    pub genres: Vec<String>,
    pub original_language: Option<String>,
    /// Country as it appears in the source (alpha-2, alpha-3 or free text).
    pub country: Option<String>,
    pub release_date: Option<NaiveDate>,
    /// Always finite and `>= 0`.
    pub revenue: f64,
    /// Always finite and `>= 0`.
    pub budget: f64,
    /// `None` means "not rated", which is different from a rating of zero.
    pub score: Option<f64>,
}

impl MovieRecord {
    /// A record with every optional field empty and zero amounts.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            genres: Vec::new(),
            original_language: None,
            country: None,
            release_date: None,
            revenue: 0.0,
            budget: 0.0,
            score: None,
        }
    }
}

/// Metrics computed from a single record.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DerivedMetrics {
    /// Release year, or [`UNKNOWN_YEAR`] when `dated` is false.
    pub year: i32,
    /// Release month in `1..=12`, or [`UNKNOWN_MONTH`].
    pub month: u32,
    /// `(revenue - budget) / budget * 100`, `0` when budget is zero. Never NaN or infinite.
    pub roi_percent: f64,
    pub profit: f64,
    /// Whether the record had a release date. Year 0 is a real year in the
    /// proleptic calendar, so the sentinel alone cannot tell.
    pub dated: bool,
}

impl DerivedMetrics {
    pub fn from_date(date: Option<NaiveDate>) -> (i32, u32) {
        date.map_or((UNKNOWN_YEAR, UNKNOWN_MONTH), |d| (d.year(), d.month()))
    }

    pub fn has_date(&self) -> bool {
        self.dated
    }

    /// Decade the movie was released in (e.g. 1994 -> 1990).
    pub fn decade(&self) -> Option<i32> {
        self.has_date().then(|| self.year.div_euclid(10) * 10)
    }
}

/// A coerced record together with its derived metrics.
///
/// Immutable once built. The pipeline shares movies behind an [`Arc`] so the
/// full dataset and every filtered view point at the same records.
#[derive(Debug, Clone, PartialEq)]
pub struct Movie {
    pub record: MovieRecord,
    pub metrics: DerivedMetrics,
}

/// A movie with the success tier it earned within one working set.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedMovie {
    pub movie: Arc<Movie>,
    pub category: SuccessCategory,
}

impl EnrichedMovie {
    pub fn record(&self) -> &MovieRecord {
        &self.movie.record
    }

    pub fn metrics(&self) -> &DerivedMetrics {
        &self.movie.metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_date_sentinel() {
        assert_eq!(DerivedMetrics::from_date(None), (UNKNOWN_YEAR, UNKNOWN_MONTH));
        let d = NaiveDate::from_ymd_opt(2023, 3, 2);
        assert_eq!(DerivedMetrics::from_date(d), (2023, 3));
    }

    #[test]
    fn test_decade() {
        let m = DerivedMetrics {
            year: 1994,
            month: 6,
            roi_percent: 0.0,
            profit: 0.0,
            dated: true,
        };
        assert_eq!(m.decade(), Some(1990));
        let unknown =
            DerivedMetrics { year: UNKNOWN_YEAR, month: UNKNOWN_MONTH, dated: false, ..m };
        assert_eq!(unknown.decade(), None);
    }
}
