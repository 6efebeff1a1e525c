//! Sorting for the searchable movie table.

use std::cmp::Ordering;

use serde::{Deserialize, Serialize};

use super::record::EnrichedMovie;

/// Column to sort the movie table by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortColumn {
    /// Sort by title alphabetically.
    Name,
    /// Sort by release year.
    Year,
    /// Sort by revenue.
    #[default]
    Revenue,
    /// Sort by score; unrated movies sort lowest.
    Score,
    /// Sort by return on investment.
    Roi,
    /// Sort by absolute profit.
    Profit,
    /// Sort by success tier.
    Category,
}

impl SortColumn {
    /// Cycle to the next sort column.
    pub fn next(self) -> Self {
        match self {
            SortColumn::Name => SortColumn::Year,
            SortColumn::Year => SortColumn::Revenue,
            SortColumn::Revenue => SortColumn::Score,
            SortColumn::Score => SortColumn::Roi,
            SortColumn::Roi => SortColumn::Profit,
            SortColumn::Profit => SortColumn::Category,
            SortColumn::Category => SortColumn::Name,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortColumn::Name => "name",
            SortColumn::Year => "year",
            SortColumn::Revenue => "revenue",
            SortColumn::Score => "score",
            SortColumn::Roi => "roi",
            SortColumn::Profit => "profit",
            SortColumn::Category => "category",
        }
    }
}

fn compare_scores(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Sort movies in place by `column`.
///
/// Ties are broken by name (always ascending) so the order is stable
/// across refreshes.
pub fn sort_movies_by(movies: &mut [EnrichedMovie], column: SortColumn, ascending: bool) {
    movies.sort_by(|a, b| {
        let (ra, rb) = (a.record(), b.record());
        let (ma, mb) = (a.metrics(), b.metrics());
        let primary = match column {
            SortColumn::Name => ra.name.cmp(&rb.name),
            SortColumn::Year => ma.year.cmp(&mb.year),
            SortColumn::Revenue => ra.revenue.total_cmp(&rb.revenue),
            SortColumn::Score => compare_scores(ra.score, rb.score),
            SortColumn::Roi => ma.roi_percent.total_cmp(&mb.roi_percent),
            SortColumn::Profit => ma.profit.total_cmp(&mb.profit),
            SortColumn::Category => a.category.cmp(&b.category),
        };

        let primary = if ascending { primary } else { primary.reverse() };

        primary.then_with(|| ra.name.cmp(&rb.name))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::categorize::SuccessCategory;
    use crate::data::derive::derive;
    use crate::data::record::MovieRecord;
    use std::sync::Arc;

    fn enriched(name: &str, revenue: f64, score: Option<f64>) -> EnrichedMovie {
        EnrichedMovie {
            movie: Arc::new(derive(MovieRecord { revenue, score, ..MovieRecord::named(name) })),
            category: SuccessCategory::Low,
        }
    }

    fn names(movies: &[EnrichedMovie]) -> Vec<&str> {
        movies.iter().map(|m| m.record().name.as_str()).collect()
    }

    #[test]
    fn test_sort_column_cycles() {
        let mut column = SortColumn::Name;
        for _ in 0..7 {
            column = column.next();
        }
        assert_eq!(column, SortColumn::Name);
    }

    #[test]
    fn test_sort_by_revenue_descending() {
        let mut movies =
            vec![enriched("b", 10.0, None), enriched("a", 30.0, None), enriched("c", 20.0, None)];
        sort_movies_by(&mut movies, SortColumn::Revenue, false);
        assert_eq!(names(&movies), vec!["a", "c", "b"]);
    }

    #[test]
    fn test_unrated_sorts_lowest() {
        let mut movies = vec![
            enriched("rated", 0.0, Some(2.0)),
            enriched("unrated", 0.0, None),
            enriched("zero", 0.0, Some(0.0)),
        ];
        sort_movies_by(&mut movies, SortColumn::Score, true);
        assert_eq!(names(&movies), vec!["unrated", "zero", "rated"]);
    }

    #[test]
    fn test_ties_break_by_name() {
        let mut movies = vec![enriched("b", 5.0, None), enriched("a", 5.0, None)];
        sort_movies_by(&mut movies, SortColumn::Revenue, false);
        assert_eq!(names(&movies), vec!["a", "b"]);
    }
}
