//! Data models and the metrics pipeline.
//!
//! This module turns a raw movie table into typed, metric-annotated records
//! and answers filter queries over them.
//!
//! ## Submodules
//!
//! - [`columns`]: configurable mapping from source headers to record fields
//! - [`coerce`]: total parsers for amounts, scores, dates and genre lists
//! - [`derive`]: per-record metrics (year, month, ROI, profit)
//! - [`categorize`]: revenue-quantile success tiers over a working set
//! - [`filter`]: the [`FilterCriteria`] predicate
//! - [`country`]: ISO 3166-1 alpha-2 to alpha-3 normalization
//! - [`stats`]: aggregations that feed dashboard widgets
//! - [`sort`]: table ordering
//! - [`lookup`]: injected label translation
//! - [`pipeline`]: [`MetricsPipeline`] tying the stages together
//!
//! ## Data Flow
//!
//! ```text
//! RawTable (strings)
//!        │
//!        ▼
//! coerce() ──▶ MovieRecord
//!        │
//!        ▼
//! derive() ──▶ Movie (record + DerivedMetrics)
//!        │
//!        ▼
//! categorize() ──▶ EnrichedMovie (+ SuccessCategory, relative to the working set)
//!        │
//!        ▼
//! FilterCriteria::matches() ──▶ filtered view
//! ```

pub mod categorize;
pub mod coerce;
pub mod columns;
pub mod country;
pub mod derive;
pub mod filter;
pub mod lookup;
pub mod pipeline;
pub mod record;
pub mod sort;
pub mod stats;

pub use categorize::{categorize, CategoryScope, RevenueThresholds, SuccessCategory, TierScheme};
pub use coerce::{coerce, CoerceOptions};
pub use columns::{ColumnMapping, Field, ResolvedColumns};
pub use country::{to_iso3, CountryCodes};
pub use derive::{derive, roi_percent};
pub use filter::{FilterCriteria, FULL_SCORE_RANGE};
pub use lookup::{Lookup, MapLookup, NoTranslation};
pub use pipeline::{Dataset, MetricsPipeline, PipelineOptions, SubstitutionCounts};
pub use record::{DerivedMetrics, EnrichedMovie, Movie, MovieRecord, UNKNOWN_MONTH, UNKNOWN_YEAR};
pub use sort::{sort_movies_by, SortColumn};
