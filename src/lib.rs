//! # marquee
//!
//! Data preparation and derived metrics for movie revenue datasets.
//!
//! This crate turns a raw movie table (typically the IMDb revenue CSV) into
//! typed records annotated with ROI, profit, release year/month and a
//! revenue-quantile success tier, and evaluates dashboard filter queries over
//! the result. Charts and tables are left to whoever consumes the output.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Application                         │
//! │  ┌─────────┐    ┌───────────────────────────┐    ┌─────────┐ │
//! │  │  app    │───▶│           data            │───▶│ export  │ │
//! │  │ (query) │    │ coerce ▶ derive ▶ categorize   │ CSV/JSON│ │
//! │  └────┬────┘    └───────────────────────────┘    └─────────┘ │
//! │       │                                                      │
//! │       ▼                                                      │
//! │  ┌─────────┐                                                 │
//! │  │ source  │◀── FileSource | ReaderSource | MemorySource      │
//! │  │ (input) │                                                 │
//! │  └─────────┘                                                 │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! - **[`source`]**: the [`DataSource`] trait and the [`RawTable`] it yields
//! - **[`data`]**: the [`MetricsPipeline`] stages, [`FilterCriteria`], aggregations
//! - **[`app`]**: cached dataset plus the current query (criteria, sort, tier scope)
//! - **[`config`]**: [`Settings`] layered from file and environment
//! - **[`export`]**: lossless CSV export and JSON summaries
//!
//! ## Usage
//!
//! ### Running the pipeline directly
//!
//! ```
//! use marquee::{CategoryScope, FilterCriteria, MetricsPipeline, RawTable};
//!
//! let table = RawTable::parse_csv(
//!     "names,genre,revenue,budget_x,score\n\
//!      Heat,\"Crime, Drama\",187436818,60000000,8.3\n\
//!      Cube,Horror,501818,365000,\n",
//! )
//! .unwrap();
//!
//! let dataset = MetricsPipeline::default().run(&table);
//! assert_eq!(dataset.movies[1].record.score, None);
//!
//! let criteria = FilterCriteria::new().with_genres(["Drama", "Horror"]);
//! let view = dataset.view(&criteria, CategoryScope::FullDataset);
//! assert_eq!(view.len(), 2);
//! ```
//!
//! ### As an application with a file source
//!
//! ```no_run
//! use marquee::{App, FileSource, Settings};
//!
//! let mut app = App::new(Box::new(FileSource::new("imdb_movies.csv")), Settings::default());
//! app.reload_data().unwrap();
//! app.set_search("creed");
//! for row in app.view() {
//!     println!("{} {}", row.record().name, row.category);
//! }
//! ```

pub mod app;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod source;

pub use app::App;
pub use config::Settings;
pub use data::{
    CategoryScope, CountryCodes, Dataset, DerivedMetrics, EnrichedMovie, FilterCriteria,
    MetricsPipeline, Movie, MovieRecord, SortColumn, SuccessCategory, TierScheme,
};
pub use error::PipelineError;
pub use source::{DataSource, FileSource, MemorySource, RawTable, ReaderSource};
