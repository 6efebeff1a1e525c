//! The metrics pipeline: raw table in, enriched dataset out.
//!
//! ```text
//! RawTable ──▶ drop rows missing required fields
//!                    │
//!                    ▼
//!           coerce ──▶ derive ──▶ categorize ──▶ Dataset
//!                                                  │
//!                           FilterCriteria ──▶ view(criteria, scope)
//! ```

use std::sync::Arc;

use tracing::{debug, warn};

use super::categorize::{categorize, CategoryScope, TierScheme};
use super::coerce::{coerce, CoerceOptions, Substitutions};
use super::columns::{ColumnMapping, Field, ResolvedColumns};
use super::derive::derive;
use super::filter::FilterCriteria;
use super::record::{EnrichedMovie, Movie};
use crate::source::RawTable;

/// Everything the pipeline needs to know about the input and the tiers.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PipelineOptions {
    pub columns: ColumnMapping,
    /// Fields that must be non-blank for a row to be kept.
    pub required: Vec<Field>,
    pub coerce: CoerceOptions,
    pub tiers: TierScheme,
}

/// Number of rows whose present value could not be parsed, per field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubstitutionCounts {
    pub revenue: usize,
    pub budget: usize,
    pub score: usize,
    pub release_date: usize,
}

impl SubstitutionCounts {
    fn add(&mut self, substituted: Substitutions) {
        self.revenue += usize::from(substituted.revenue);
        self.budget += usize::from(substituted.budget);
        self.score += usize::from(substituted.score);
        self.release_date += usize::from(substituted.release_date);
    }

    fn by_field(&self) -> [(Field, usize); 4] {
        [
            (Field::Revenue, self.revenue),
            (Field::Budget, self.budget),
            (Field::Score, self.score),
            (Field::ReleaseDate, self.release_date),
        ]
    }

    pub fn is_empty(&self) -> bool {
        self.by_field().iter().all(|(_, n)| *n == 0)
    }
}

/// Output of one pipeline run.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// Coerced and derived movies, in source order.
    pub movies: Vec<Arc<Movie>>,
    /// The same movies categorized against the full dataset.
    pub enriched: Vec<EnrichedMovie>,
    /// Which source columns fed which fields.
    pub columns: ResolvedColumns,
    pub tiers: TierScheme,
    /// Rows removed for a blank required field.
    pub dropped_rows: usize,
    pub substitutions: SubstitutionCounts,
}

impl Dataset {
    pub fn len(&self) -> usize {
        self.movies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movies.is_empty()
    }

    /// Filter the dataset and attach tiers according to `scope`.
    ///
    /// With [`CategoryScope::FullDataset`] the tiers computed over the whole
    /// dataset are kept; with [`CategoryScope::FilteredView`] they are
    /// recomputed over the surviving rows. Source order is preserved.
    pub fn view(&self, criteria: &FilterCriteria, scope: CategoryScope) -> Vec<EnrichedMovie> {
        match scope {
            CategoryScope::FullDataset => self
                .enriched
                .iter()
                .filter(|e| criteria.matches(&e.movie))
                .cloned()
                .collect(),
            CategoryScope::FilteredView => categorize(&criteria.apply(&self.movies), self.tiers),
        }
    }
}

/// Pure transform from a [`RawTable`] to a [`Dataset`].
#[derive(Debug, Clone, Default)]
pub struct MetricsPipeline {
    options: PipelineOptions,
}

impl MetricsPipeline {
    pub fn new(options: PipelineOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Drop incomplete rows, then run coercion, derivation and
    /// categorization over the rest.
    ///
    /// A required field whose column is absent from the table is ignored
    /// rather than dropping every row.
    pub fn run(&self, table: &RawTable) -> Dataset {
        let columns = self.options.columns.resolve(&table.headers);

        let required: Vec<Field> = self
            .options
            .required
            .iter()
            .copied()
            .filter(|field| {
                let present = columns.get(*field).is_some();
                if !present {
                    warn!(field = field.label(), "required column not found, not enforced");
                }
                present
            })
            .collect();

        let mut substitutions = SubstitutionCounts::default();
        let movies: Vec<Arc<Movie>> = table
            .rows
            .iter()
            .filter(|row| required.iter().all(|f| columns.cell(row, *f).is_some()))
            .map(|row| {
                let (record, substituted) = coerce(row, &columns, &self.options.coerce);
                substitutions.add(substituted);
                Arc::new(derive(record))
            })
            .collect();

        let dropped_rows = table.len() - movies.len();
        if dropped_rows > 0 {
            debug!(dropped_rows, required = ?required, "dropped incomplete rows");
        }

        for (field, count) in substitutions.by_field() {
            if count > 0 {
                let percent = count as f64 / movies.len() as f64 * 100.0;
                warn!(
                    field = field.label(),
                    rows = count,
                    percent = %format!("{:.1}%", percent),
                    "unparseable values substituted"
                );
            }
        }
        debug!(rows = movies.len(), "coerced rows");

        let enriched = categorize(&movies, self.options.tiers);

        Dataset {
            movies,
            enriched,
            columns,
            tiers: self.options.tiers,
            dropped_rows,
            substitutions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::categorize::SuccessCategory;

    const CSV: &str = "\
names,date_x,score,genre,orig_lang,budget_x,revenue,country
Alpha,03/02/2023,7.3,\"Drama, Action\",English,50,100,US
Beta,not a date,abc,Comedy,English,0,0,AU
Gamma,12/15/2022,8.1,\"Action,\u{a0}Adventure\",French,0,200,FR
Delta,01/01/1999,,Horror,,10,300,ZZ
Epsilon,06/30/2010,5.0,Drama,Spanish,100,400,ES
";

    fn dataset() -> Dataset {
        let table = RawTable::parse_csv(CSV).unwrap();
        MetricsPipeline::default().run(&table)
    }

    #[test]
    fn test_run_end_to_end() {
        let data = dataset();
        assert_eq!(data.len(), 5);

        let roi: Vec<f64> = data.movies.iter().map(|m| m.metrics.roi_percent).collect();
        assert_eq!(roi, vec![100.0, 0.0, 0.0, 2900.0, 300.0]);

        let beta = &data.movies[1];
        assert_eq!(beta.record.score, None);
        assert_eq!(beta.metrics.year, 0);
        assert_eq!(beta.metrics.month, 0);

        assert_eq!(data.movies[2].record.genres, vec!["Action", "Adventure"]);
        assert_eq!(data.movies[3].record.original_language, None);
        assert_eq!(data.enriched[4].category, SuccessCategory::Blockbuster);
        assert_eq!(data.enriched[1].category, SuccessCategory::Low);
    }

    #[test]
    fn test_substitutions_are_counted() {
        let data = dataset();
        assert_eq!(
            data.substitutions,
            SubstitutionCounts { revenue: 0, budget: 0, score: 1, release_date: 1 }
        );
        assert!(!data.substitutions.is_empty());
        assert_eq!(data.dropped_rows, 0);
    }

    #[test]
    fn test_wrong_score_scale_shows_up_as_substitutions() {
        let table = RawTable::parse_csv("names,score\nCreed III,73\nAvatar,78\n").unwrap();

        let data = MetricsPipeline::default().run(&table);
        assert!(data.movies.iter().all(|m| m.record.score.is_none()));
        assert_eq!(data.substitutions.score, 2);

        let options = PipelineOptions {
            coerce: CoerceOptions { score_scale: 100.0, ..CoerceOptions::default() },
            ..PipelineOptions::default()
        };
        let data = MetricsPipeline::new(options).run(&table);
        assert_eq!(data.movies[1].record.score, Some(7.8));
        assert!(data.substitutions.is_empty());
    }

    #[test]
    fn test_required_fields_drop_incomplete_rows() {
        let csv = "names,genre,crew,revenue\n\
                   Heat,Crime,Al Pacino,187\n\
                   NoGenre,,Someone,50\n\
                   NoCrew,Drama,,60\n\
                   Up,Animation,Ed Asner,735\n";
        let table = RawTable::parse_csv(csv).unwrap();

        let options = PipelineOptions {
            required: vec![Field::Genre, Field::Crew],
            ..PipelineOptions::default()
        };
        let data = MetricsPipeline::new(options).run(&table);
        let names: Vec<&str> = data.movies.iter().map(|m| m.record.name.as_str()).collect();
        assert_eq!(names, vec!["Heat", "Up"]);
        assert_eq!(data.dropped_rows, 2);
        assert_eq!(data.enriched.len(), 2);

        // Off by default: a blank genre still yields an empty list
        let data = MetricsPipeline::default().run(&table);
        assert_eq!(data.len(), 4);
        assert!(data.movies[1].record.genres.is_empty());
    }

    #[test]
    fn test_required_field_without_column_is_not_enforced() {
        let table = RawTable::parse_csv("names,genre\nHeat,Crime\nCube,\n").unwrap();
        let options = PipelineOptions { required: vec![Field::Crew], ..PipelineOptions::default() };
        let data = MetricsPipeline::new(options).run(&table);
        assert_eq!(data.len(), 2);
        assert_eq!(data.dropped_rows, 0);
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        let table = RawTable::parse_csv("title\nSolaris\n").unwrap();
        let data = MetricsPipeline::default().run(&table);
        let movie = &data.movies[0];
        assert_eq!(movie.record.name, "Solaris");
        assert_eq!(movie.record.revenue, 0.0);
        assert_eq!(movie.record.score, None);
        assert!(movie.record.genres.is_empty());
        assert_eq!(data.enriched[0].category, SuccessCategory::Low);
    }

    #[test]
    fn test_view_scopes_differ() {
        let data = dataset();
        let criteria = FilterCriteria::new().with_revenue_range(0.0, 200.0);

        let full = data.view(&criteria, CategoryScope::FullDataset);
        let local = data.view(&criteria, CategoryScope::FilteredView);
        assert_eq!(full.len(), 3);
        assert_eq!(local.len(), 3);

        // Gamma (200) is mid-table overall but the top earner of the subset
        assert_eq!(full[2].record().name, "Gamma");
        assert_eq!(full[2].category, SuccessCategory::Medium);
        assert_eq!(local[2].category, SuccessCategory::Blockbuster);
    }

    #[test]
    fn test_view_does_not_touch_dataset() {
        let data = dataset();
        let before: Vec<SuccessCategory> = data.enriched.iter().map(|e| e.category).collect();
        let _ = data.view(&FilterCriteria::new().with_name("a"), CategoryScope::FilteredView);
        let after: Vec<SuccessCategory> = data.enriched.iter().map(|e| e.category).collect();
        assert_eq!(before, after);
        assert_eq!(data.len(), 5);
    }
}
