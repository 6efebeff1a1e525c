//! Filter predicate over enriched movies.
//!
//! Criteria are conjunctive across fields and disjunctive within the genre
//! set. A criterion left at its default never excludes a record just because
//! the underlying value is null; a narrowed numeric range does, since null
//! cannot satisfy an inequality.

use std::collections::BTreeSet;
use std::ops::RangeInclusive;
use std::sync::Arc;

use super::record::Movie;

/// The full rating range. A score filter equal to it is treated as unset.
pub const FULL_SCORE_RANGE: RangeInclusive<f64> = 0.0..=10.0;

/// What a query asks for. Built fresh per query; never mutates records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterCriteria {
    /// Inclusive release-year bounds. `None` keeps undated records.
    pub year_range: Option<RangeInclusive<i32>>,
    /// Inclusive score bounds. `None` or [`FULL_SCORE_RANGE`] keeps unrated records.
    pub score_range: Option<RangeInclusive<f64>>,
    /// Inclusive revenue bounds.
    pub revenue_range: Option<RangeInclusive<f64>>,
    /// Match if any of the record's genres is in this set. Empty means no constraint.
    pub genres: BTreeSet<String>,
    /// Case-insensitive substring of the name. Empty means no constraint.
    pub name_substring: Option<String>,
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_year_range(mut self, min: i32, max: i32) -> Self {
        self.year_range = Some(min..=max);
        self
    }

    pub fn with_score_range(mut self, min: f64, max: f64) -> Self {
        self.score_range = Some(min..=max);
        self
    }

    pub fn with_revenue_range(mut self, min: f64, max: f64) -> Self {
        self.revenue_range = Some(min..=max);
        self
    }

    pub fn with_genres<I, S>(mut self, genres: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.genres = genres.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_name(mut self, needle: impl Into<String>) -> Self {
        self.name_substring = Some(needle.into());
        self
    }

    /// True when no criterion constrains anything.
    pub fn is_unconstrained(&self) -> bool {
        self.year_range.is_none()
            && !self.score_narrowed()
            && self.revenue_range.is_none()
            && self.genres.is_empty()
            && self.name_substring.as_deref().map_or(true, str::is_empty)
    }

    fn score_narrowed(&self) -> bool {
        self.score_range.as_ref().is_some_and(|r| *r != FULL_SCORE_RANGE)
    }

    /// Evaluate the predicate for one movie.
    pub fn matches(&self, movie: &Movie) -> bool {
        let record = &movie.record;

        if let Some(ref years) = self.year_range {
            if !movie.metrics.has_date() || !years.contains(&movie.metrics.year) {
                return false;
            }
        }

        if self.score_narrowed() {
            match (record.score, self.score_range.as_ref()) {
                (Some(score), Some(range)) if range.contains(&score) => {}
                _ => return false,
            }
        }

        if let Some(ref revenue) = self.revenue_range {
            if !revenue.contains(&record.revenue) {
                return false;
            }
        }

        if !self.genres.is_empty() && !record.genres.iter().any(|g| self.genres.contains(g)) {
            return false;
        }

        if let Some(needle) = self.name_substring.as_deref().filter(|n| !n.is_empty()) {
            if !record.name.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }

        true
    }

    /// Build the filtered view. The base set is left untouched.
    pub fn apply(&self, movies: &[Arc<Movie>]) -> Vec<Arc<Movie>> {
        movies.iter().filter(|m| self.matches(m)).cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::derive::derive;
    use crate::data::record::MovieRecord;
    use chrono::NaiveDate;

    fn movie(name: &str, year: Option<i32>, score: Option<f64>, genres: &[&str]) -> Movie {
        derive(MovieRecord {
            release_date: year.and_then(|y| NaiveDate::from_ymd_opt(y, 6, 1)),
            score,
            genres: genres.iter().map(|g| g.to_string()).collect(),
            revenue: 1000.0,
            ..MovieRecord::named(name)
        })
    }

    #[test]
    fn test_default_criteria_match_everything() {
        let criteria = FilterCriteria::new();
        assert!(criteria.is_unconstrained());
        assert!(criteria.matches(&movie("Unrated", None, None, &[])));
    }

    #[test]
    fn test_full_score_range_keeps_null_scores() {
        let criteria = FilterCriteria::new().with_score_range(0.0, 10.0);
        assert!(criteria.is_unconstrained());
        assert!(criteria.matches(&movie("Unrated", Some(2020), None, &[])));
    }

    #[test]
    fn test_narrowed_score_range_drops_null_scores() {
        let criteria = FilterCriteria::new().with_score_range(5.0, 10.0);
        assert!(!criteria.matches(&movie("Unrated", Some(2020), None, &[])));
        assert!(criteria.matches(&movie("Good", Some(2020), Some(7.0), &[])));
        assert!(criteria.matches(&movie("Edge", Some(2020), Some(5.0), &[])));
        assert!(!criteria.matches(&movie("Bad", Some(2020), Some(4.9), &[])));
    }

    #[test]
    fn test_year_range_is_inclusive_and_drops_undated() {
        let criteria = FilterCriteria::new().with_year_range(2000, 2010);
        assert!(criteria.matches(&movie("a", Some(2000), None, &[])));
        assert!(criteria.matches(&movie("b", Some(2010), None, &[])));
        assert!(!criteria.matches(&movie("c", Some(2011), None, &[])));
        assert!(!criteria.matches(&movie("d", None, None, &[])));

        let year_zero = FilterCriteria::new().with_year_range(0, 0);
        assert!(year_zero.matches(&movie("e", Some(0), None, &[])));
        assert!(!year_zero.matches(&movie("f", None, None, &[])));
    }

    #[test]
    fn test_genre_any_of() {
        let criteria = FilterCriteria::new().with_genres(["Drama", "Horror"]);
        assert!(criteria.matches(&movie("a", None, None, &["Action", "Drama"])));
        assert!(!criteria.matches(&movie("b", None, None, &["Action", "Comedy"])));
        assert!(!criteria.matches(&movie("c", None, None, &[])));
    }

    #[test]
    fn test_name_substring_case_insensitive() {
        let criteria = FilterCriteria::new().with_name("CREED");
        assert!(criteria.matches(&movie("Creed III", None, None, &[])));
        assert!(!criteria.matches(&movie("Avatar", None, None, &[])));
        assert!(FilterCriteria::new().with_name("").matches(&movie("Avatar", None, None, &[])));
    }

    #[test]
    fn test_revenue_range() {
        let criteria = FilterCriteria::new().with_revenue_range(0.0, 999.0);
        assert!(!criteria.matches(&movie("a", None, None, &[])));
        let criteria = FilterCriteria::new().with_revenue_range(1000.0, 1000.0);
        assert!(criteria.matches(&movie("a", None, None, &[])));
    }

    #[test]
    fn test_criteria_are_conjunctive() {
        let criteria = FilterCriteria::new().with_year_range(2000, 2010).with_genres(["Drama"]);
        assert!(criteria.matches(&movie("a", Some(2005), None, &["Drama"])));
        assert!(!criteria.matches(&movie("b", Some(2015), None, &["Drama"])));
        assert!(!criteria.matches(&movie("c", Some(2005), None, &["Comedy"])));
    }

    #[test]
    fn test_apply_builds_new_view() {
        let base: Vec<Arc<Movie>> = vec![
            Arc::new(movie("Heat", Some(1995), Some(8.3), &["Crime"])),
            Arc::new(movie("Up", Some(2009), Some(8.2), &["Animation"])),
        ];
        let criteria = FilterCriteria::new().with_genres(["Crime"]);
        let view = criteria.apply(&base);
        assert_eq!(view.len(), 1);
        assert_eq!(base.len(), 2);
        assert!(Arc::ptr_eq(&view[0], &base[0]));
        assert_eq!(criteria.apply(&base), view);
    }
}
