//! Export of enriched rows and dataset summaries.
//!
//! CSV export keeps `name`, `year`, `revenue`, `score`, `roi_percent` and
//! `success_category` lossless for non-null values, so a table written here
//! reads back into the same [`ExportRow`]s.

use std::io::{Read, Write};

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::data::stats::{self, ScoreSummary};
use crate::data::{EnrichedMovie, SuccessCategory, TierScheme};
use crate::error::PipelineError;

/// Row shape of the CSV export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRow {
    pub name: String,
    pub year: i32,
    pub month: u32,
    pub revenue: f64,
    pub budget: f64,
    pub score: Option<f64>,
    pub roi_percent: f64,
    pub profit: f64,
    pub success_category: SuccessCategory,
    /// Genres joined with `", "`.
    pub genre: String,
    pub country: Option<String>,
}

impl From<&EnrichedMovie> for ExportRow {
    fn from(movie: &EnrichedMovie) -> Self {
        let (record, metrics) = (movie.record(), movie.metrics());
        Self {
            name: record.name.clone(),
            year: metrics.year,
            month: metrics.month,
            revenue: record.revenue,
            budget: record.budget,
            score: record.score,
            roi_percent: metrics.roi_percent,
            profit: metrics.profit,
            success_category: movie.category,
            genre: record.genres.join(", "),
            country: record.country.clone(),
        }
    }
}

/// Write enriched movies as CSV with a header row.
pub fn write_csv<W: Write>(writer: W, movies: &[EnrichedMovie]) -> Result<(), PipelineError> {
    let mut writer = csv::Writer::from_writer(writer);
    for movie in movies {
        writer.serialize(ExportRow::from(movie))?;
    }
    writer.flush()?;
    Ok(())
}

/// Read back a CSV written by [`write_csv`].
pub fn read_csv<R: Read>(reader: R) -> Result<Vec<ExportRow>, PipelineError> {
    let mut reader = csv::Reader::from_reader(reader);
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        rows.push(row?);
    }
    Ok(rows)
}

/// JSON summary of a view: tier counts, score summary and the rows themselves.
pub fn summary_json(movies: &[EnrichedMovie], total: usize, tiers: TierScheme) -> Value {
    let categories: serde_json::Map<String, Value> = stats::category_counts(movies, tiers)
        .into_iter()
        .map(|(tier, count)| (tier.label().to_string(), json!(count)))
        .collect();

    let base: Vec<_> = movies.iter().map(|m| m.movie.clone()).collect();
    let ScoreSummary { rated, unrated, mean } = stats::score_summary(&base);
    let total_revenue: f64 = movies.iter().map(|m| m.record().revenue).sum();

    json!({
        "summary": {
            "total_movies": total,
            "matching_movies": movies.len(),
            "total_revenue": total_revenue,
            "rated": rated,
            "unrated": unrated,
            "mean_score": mean,
            "categories": categories,
        },
        "movies": movies.iter().map(ExportRow::from).collect::<Vec<_>>(),
    })
}
