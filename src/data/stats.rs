//! Aggregations over a working set.
//!
//! These feed the dashboard widgets (genre picker, top lists, histograms,
//! the country map). They return plain data; rendering is up to the caller.

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::Arc;

use serde::Serialize;

use super::categorize::{SuccessCategory, TierScheme};
use super::country::CountryCodes;
use super::filter::FULL_SCORE_RANGE;
use super::record::{EnrichedMovie, Movie};

/// A label with an occurrence count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Count {
    pub label: String,
    pub count: usize,
}

/// Total revenue for one country.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryRevenue {
    pub iso3: String,
    pub total_revenue: f64,
    pub movies: usize,
}

/// One histogram bin, `[start, end)` except the last which is closed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

/// Count and mean of the non-null scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreSummary {
    pub rated: usize,
    pub unrated: usize,
    pub mean: Option<f64>,
}

/// Sorted distinct genres across the set.
pub fn all_genres(movies: &[Arc<Movie>]) -> Vec<String> {
    movies
        .iter()
        .flat_map(|m| m.record.genres.iter().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

fn top_counts<'a>(labels: impl Iterator<Item = &'a str>, n: usize) -> Vec<Count> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }

    let mut counts: Vec<Count> = counts
        .into_iter()
        .map(|(label, count)| Count { label: label.to_string(), count })
        .collect();
    counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.label.cmp(&b.label)));
    counts.truncate(n);
    counts
}

/// The `n` most frequent genres. A movie counts once per genre it carries.
pub fn genre_counts(movies: &[Arc<Movie>], n: usize) -> Vec<Count> {
    top_counts(movies.iter().flat_map(|m| m.record.genres.iter().map(String::as_str)), n)
}

/// The `n` most frequent original languages. Movies without one are skipped.
pub fn language_counts(movies: &[Arc<Movie>], n: usize) -> Vec<Count> {
    top_counts(movies.iter().filter_map(|m| m.record.original_language.as_deref()), n)
}

/// The `n` highest-grossing movies, highest first, ties by name.
pub fn top_by_revenue(movies: &[Arc<Movie>], n: usize) -> Vec<Arc<Movie>> {
    let mut sorted: Vec<Arc<Movie>> = movies.to_vec();
    sorted.sort_by(|a, b| {
        b.record
            .revenue
            .total_cmp(&a.record.revenue)
            .then_with(|| a.record.name.cmp(&b.record.name))
    });
    sorted.truncate(n);
    sorted
}

/// Total revenue per normalized alpha-3 country code.
///
/// Movies whose country does not normalize are dropped, not relabelled.
/// Sorted by total revenue, highest first.
pub fn revenue_by_country(movies: &[Arc<Movie>], codes: CountryCodes) -> Vec<CountryRevenue> {
    let mut totals: BTreeMap<String, (f64, usize)> = BTreeMap::new();
    for movie in movies {
        if let Some(iso3) = codes.normalize(movie.record.country.as_deref()) {
            let entry = totals.entry(iso3).or_insert((0.0, 0));
            entry.0 += movie.record.revenue;
            entry.1 += 1;
        }
    }

    let mut result: Vec<CountryRevenue> = totals
        .into_iter()
        .map(|(iso3, (total_revenue, movies))| CountryRevenue { iso3, total_revenue, movies })
        .collect();
    result.sort_by(|a, b| b.total_revenue.total_cmp(&a.total_revenue));
    result
}

/// Equal-width histogram of non-null scores over the full rating range.
pub fn score_histogram(movies: &[Arc<Movie>], bins: usize) -> Vec<Bin> {
    if bins == 0 {
        return Vec::new();
    }

    let (lo, hi) = (*FULL_SCORE_RANGE.start(), *FULL_SCORE_RANGE.end());
    let width = (hi - lo) / bins as f64;
    let mut result: Vec<Bin> = (0..bins)
        .map(|i| Bin {
            start: lo + width * i as f64,
            end: lo + width * (i + 1) as f64,
            count: 0,
        })
        .collect();

    for score in movies.iter().filter_map(|m| m.record.score) {
        let idx = (((score - lo) / width) as usize).min(bins - 1);
        result[idx].count += 1;
    }
    result
}

/// Rated/unrated counts and the mean over rated movies only.
pub fn score_summary(movies: &[Arc<Movie>]) -> ScoreSummary {
    let scores: Vec<f64> = movies.iter().filter_map(|m| m.record.score).collect();
    let mean = (!scores.is_empty()).then(|| scores.iter().sum::<f64>() / scores.len() as f64);
    ScoreSummary {
        rated: scores.len(),
        unrated: movies.len() - scores.len(),
        mean,
    }
}

/// Number of movies per tier, best tier first. Tiers with no movies are listed with zero.
pub fn category_counts(
    enriched: &[EnrichedMovie],
    scheme: TierScheme,
) -> Vec<(SuccessCategory, usize)> {
    scheme
        .tiers()
        .into_iter()
        .map(|tier| (tier, enriched.iter().filter(|e| e.category == tier).count()))
        .collect()
}
