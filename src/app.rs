//! Application state: the cached dataset and the current query.

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::config::Settings;
use crate::data::{
    sort_movies_by, Dataset, EnrichedMovie, FilterCriteria, MetricsPipeline, SortColumn,
};
use crate::export;
use crate::source::DataSource;

/// Main application state.
///
/// Owns the data source and the last successfully enriched dataset. Every
/// query filters that cached dataset; the source is only consulted again on
/// [`App::reload_data`].
pub struct App {
    source: Box<dyn DataSource>,
    pipeline: MetricsPipeline,
    pub settings: Settings,
    pub data: Option<Dataset>,
    pub load_error: Option<String>,

    // Query
    pub criteria: FilterCriteria,
    pub sort_column: SortColumn,
    pub sort_ascending: bool,
}

impl App {
    /// Create a new App with the given data source and settings.
    pub fn new(source: Box<dyn DataSource>, settings: Settings) -> Self {
        let pipeline = MetricsPipeline::new(settings.pipeline_options());
        Self {
            source,
            pipeline,
            settings,
            data: None,
            load_error: None,
            criteria: FilterCriteria::default(),
            sort_column: SortColumn::default(),
            sort_ascending: false,
        }
    }

    /// Returns a description of the current data source.
    pub fn source_description(&self) -> &str {
        self.source.description()
    }

    /// Poll the data source and rerun the pipeline if it returned a new table.
    ///
    /// Returns Ok(true) if new data was loaded, Ok(false) otherwise. On a
    /// source error the previous dataset is kept and `load_error` is set.
    pub fn reload_data(&mut self) -> Result<bool> {
        if let Some(table) = self.source.poll() {
            let dataset = self.pipeline.run(&table);
            info!(
                source = self.source.description(),
                movies = dataset.len(),
                "dataset ready"
            );
            self.data = Some(dataset);
            self.load_error = None;
            return Ok(true);
        }

        if let Some(err) = self.source.error() {
            warn!(source = self.source.description(), error = err, "load failed");
            self.load_error = Some(err.to_string());
        }
        Ok(false)
    }

    /// Replace the query criteria.
    pub fn set_criteria(&mut self, criteria: FilterCriteria) {
        self.criteria = criteria;
    }

    /// Set the name search text. An empty string clears it.
    pub fn set_search(&mut self, text: &str) {
        self.criteria.name_substring = (!text.is_empty()).then(|| text.to_string());
    }

    /// Cycle to the next sort column.
    pub fn cycle_sort(&mut self) {
        self.sort_column = self.sort_column.next();
    }

    /// Toggle sort direction between ascending and descending.
    pub fn toggle_sort_direction(&mut self) {
        self.sort_ascending = !self.sort_ascending;
    }

    /// The filtered, categorized and sorted rows for the current query.
    ///
    /// Empty until a dataset has been loaded.
    pub fn view(&self) -> Vec<EnrichedMovie> {
        let Some(ref data) = self.data else {
            return Vec::new();
        };

        let mut rows = data.view(&self.criteria, self.settings.category_scope);
        sort_movies_by(&mut rows, self.sort_column, self.sort_ascending);
        rows
    }

    /// Export the current view as a JSON summary.
    pub fn export_state(&self, path: &Path) -> Result<()> {
        let Some(ref data) = self.data else {
            anyhow::bail!("No data to export");
        };

        let value = export::summary_json(&self.view(), data.len(), data.tiers);
        let json = serde_json::to_string_pretty(&value)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    }

    /// Export the current view as CSV.
    pub fn export_csv(&self, path: &Path) -> Result<()> {
        if self.data.is_none() {
            anyhow::bail!("No data to export");
        }

        let file = std::fs::File::create(path)
            .with_context(|| format!("failed to create {}", path.display()))?;
        export::write_csv(file, &self.view())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CategoryScope, SuccessCategory};
    use crate::source::{MemorySource, RawTable};

    fn table() -> RawTable {
        RawTable::parse_csv(
            "names,date_x,score,genre,revenue,budget_x\n\
             Heat,12/15/1995,8.3,\"Crime, Drama\",187436818,60000000\n\
             Up,05/29/2009,8.2,\"Animation, Adventure\",735099082,175000000\n\
             Cube,09/09/1997,,Horror,501818,365000\n\
             Jaws,06/20/1975,8.1,\"Thriller, Adventure\",476512065,9000000\n\
             Clerks,10/19/1994,7.7,Comedy,3151130,27575\n",
        )
        .unwrap()
    }

    fn app(settings: Settings) -> App {
        let mut app = App::new(Box::new(MemorySource::new(table(), "test")), settings);
        assert!(app.reload_data().unwrap());
        app
    }

    fn names(rows: &[EnrichedMovie]) -> Vec<&str> {
        rows.iter().map(|r| r.record().name.as_str()).collect()
    }

    #[test]
    fn test_view_defaults_to_revenue_descending() {
        let app = app(Settings::default());
        assert_eq!(names(&app.view()), vec!["Up", "Jaws", "Heat", "Clerks", "Cube"]);
        assert_eq!(app.source_description(), "memory: test");
    }

    #[test]
    fn test_reload_without_changes() {
        let mut app = app(Settings::default());
        assert!(!app.reload_data().unwrap());
        assert!(app.data.is_some());
        assert!(app.load_error.is_none());
    }

    #[test]
    fn test_search_and_genre_filter() {
        let mut app = app(Settings::default());
        app.set_search("u");
        assert_eq!(names(&app.view()), vec!["Up", "Cube"]);

        app.set_search("");
        app.criteria.genres = ["Adventure".to_string()].into_iter().collect();
        assert_eq!(names(&app.view()), vec!["Up", "Jaws"]);
    }

    #[test]
    fn test_sort_controls() {
        let mut app = app(Settings::default());
        app.sort_column = SortColumn::Name;
        app.toggle_sort_direction();
        assert!(app.sort_ascending);
        assert_eq!(names(&app.view()), vec!["Clerks", "Cube", "Heat", "Jaws", "Up"]);

        app.cycle_sort();
        assert_eq!(app.sort_column, SortColumn::Year);
        assert_eq!(names(&app.view())[0], "Jaws");
    }

    #[test]
    fn test_category_scope_setting() {
        let criteria = FilterCriteria::new().with_year_range(1990, 1999);

        let mut full = app(Settings::default());
        full.set_criteria(criteria.clone());
        let heat_full = full.view().into_iter().find(|r| r.record().name == "Heat").unwrap();

        let settings = Settings {
            category_scope: CategoryScope::FilteredView,
            ..Settings::default()
        };
        let mut local = app(settings);
        local.set_criteria(criteria);
        let heat_local = local.view().into_iter().find(|r| r.record().name == "Heat").unwrap();

        assert_eq!(heat_full.category, SuccessCategory::Medium);
        assert_eq!(heat_local.category, SuccessCategory::Blockbuster);
    }

    #[test]
    fn test_export_without_data_fails() {
        let source = MemorySource::new(RawTable::default(), "empty");
        let app = App::new(Box::new(source), Settings::default());
        let dir = tempfile::tempdir().unwrap();
        assert!(app.export_state(&dir.path().join("out.json")).is_err());
    }

    #[test]
    fn test_export_state_and_csv() {
        let app = app(Settings::default());
        let dir = tempfile::tempdir().unwrap();

        let json_path = dir.path().join("state.json");
        app.export_state(&json_path).unwrap();
        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(value["summary"]["total_movies"], 5);
        assert_eq!(value["movies"][0]["name"], "Up");

        let csv_path = dir.path().join("view.csv");
        app.export_csv(&csv_path).unwrap();
        let rows = export::read_csv(std::fs::File::open(&csv_path).unwrap()).unwrap();
        assert_eq!(rows.len(), 5);
        assert_eq!(rows[0].name, "Up");
    }
}
