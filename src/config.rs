//! Settings for the pipeline and the CLI.
//!
//! Settings are layered: built-in defaults, then an optional TOML/JSON/YAML
//! file, then `MARQUEE__*` environment variables (e.g. `MARQUEE__TIERS=five`).

use std::path::Path;

use anyhow::{bail, Context, Result};
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::data::coerce::{CoerceOptions, DEFAULT_DATE_FORMATS};
use crate::data::{
    CategoryScope, ColumnMapping, CountryCodes, Field, MapLookup, PipelineOptions, TierScheme,
};

/// One display-label override, e.g. a translated genre name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Label {
    pub key: String,
    pub value: String,
}

/// Top-level settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Accepted header names per record field.
    pub columns: ColumnMapping,
    /// Rows with a blank cell in any of these fields are dropped before
    /// coercion. Empty keeps every row.
    pub required_fields: Vec<Field>,
    /// chrono formats tried, in order, when parsing release dates.
    pub date_formats: Vec<String>,
    /// Top of the source rating scale (10 for 0-10 data, 100 for 0-100 data).
    pub score_scale: f64,
    pub tiers: TierScheme,
    /// Working set used to categorize filtered views.
    pub category_scope: CategoryScope,
    /// Declared shape of the country column.
    pub country_codes: CountryCodes,
    /// Length of "top N" lists.
    pub top_n: usize,
    pub histogram_bins: usize,
    /// Display-label overrides handed to presentation code.
    pub labels: Vec<Label>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            columns: ColumnMapping::default(),
            required_fields: Vec::new(),
            date_formats: DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect(),
            score_scale: 10.0,
            tiers: TierScheme::default(),
            category_scope: CategoryScope::default(),
            country_codes: CountryCodes::default(),
            top_n: 10,
            histogram_bins: 20,
            labels: Vec::new(),
        }
    }
}

impl Settings {
    /// Load settings from an optional file plus the environment.
    ///
    /// A path that is given but cannot be read is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = path {
            builder = builder.add_source(File::from(path));
        }

        let config = builder
            .add_source(Environment::with_prefix("MARQUEE").separator("__").try_parsing(true))
            .build()
            .with_context(|| match path {
                Some(p) => format!("failed to load settings from {}", p.display()),
                None => "failed to load settings from environment".to_string(),
            })?;

        let settings: Settings = config.try_deserialize().context("invalid settings")?;
        settings.validate()?;
        Ok(settings)
    }

    /// Reject values the pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        if !self.score_scale.is_finite() || self.score_scale <= 0.0 {
            bail!("score_scale must be a positive number, got {}", self.score_scale);
        }
        Ok(())
    }

    /// Options for [`MetricsPipeline`](crate::data::MetricsPipeline).
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            columns: self.columns.clone(),
            required: self.required_fields.clone(),
            coerce: CoerceOptions {
                date_formats: self.date_formats.clone(),
                score_scale: self.score_scale,
            },
            tiers: self.tiers,
        }
    }

    /// Label overrides as a lookup table.
    pub fn lookup(&self) -> MapLookup {
        self.labels.iter().map(|l| (l.key.clone(), l.value.clone())).collect()
    }
}
