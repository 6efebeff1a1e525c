//! Categorization stage: revenue-quantile success tiers.
//!
//! Tiers are relative. The cut points are quantiles of the revenue column of
//! whatever working set is passed in, so the same movie can land in a
//! different tier when categorized against a filtered subset instead of the
//! full dataset. Callers pick the working set explicitly with [`CategoryScope`].

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::record::{EnrichedMovie, Movie};

/// Success tier, ordered from worst to best.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum SuccessCategory {
    Low,
    Medium,
    High,
    Blockbuster,
    SuperBlockbuster,
}

impl SuccessCategory {
    pub fn label(&self) -> &'static str {
        match self {
            SuccessCategory::Low => "Low",
            SuccessCategory::Medium => "Medium",
            SuccessCategory::High => "High",
            SuccessCategory::Blockbuster => "Blockbuster",
            SuccessCategory::SuperBlockbuster => "SuperBlockbuster",
        }
    }
}

impl fmt::Display for SuccessCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Which set of cut points to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TierScheme {
    /// Cuts at the 0.4 / 0.6 / 0.8 quantiles.
    #[default]
    Four,
    /// Cuts at the 0.3 / 0.5 / 0.7 / 0.9 quantiles.
    Five,
}

const FOUR_TIER_CUTS: &[(f64, SuccessCategory)] = &[
    (0.8, SuccessCategory::Blockbuster),
    (0.6, SuccessCategory::High),
    (0.4, SuccessCategory::Medium),
];

const FIVE_TIER_CUTS: &[(f64, SuccessCategory)] = &[
    (0.9, SuccessCategory::SuperBlockbuster),
    (0.7, SuccessCategory::Blockbuster),
    (0.5, SuccessCategory::High),
    (0.3, SuccessCategory::Medium),
];

impl TierScheme {
    /// Quantile cut points, highest first.
    pub fn cut_points(&self) -> &'static [(f64, SuccessCategory)] {
        match self {
            TierScheme::Four => FOUR_TIER_CUTS,
            TierScheme::Five => FIVE_TIER_CUTS,
        }
    }

    /// Every tier this scheme can assign, best first.
    pub fn tiers(&self) -> Vec<SuccessCategory> {
        let mut tiers: Vec<SuccessCategory> =
            self.cut_points().iter().map(|(_, tier)| *tier).collect();
        tiers.push(SuccessCategory::Low);
        tiers
    }
}

/// Which working set a filtered view is categorized against.
///
/// Applications must use one scope consistently; mixing them makes the
/// displayed tier of a movie depend on how the user navigated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoryScope {
    /// Tiers come from the whole dataset; filtering only hides rows.
    #[default]
    FullDataset,
    /// Tiers are recomputed over the rows that survive the filter.
    FilteredView,
}

/// Revenue thresholds computed over one working set.
#[derive(Debug, Clone, PartialEq)]
pub struct RevenueThresholds {
    /// `(minimum revenue, tier)`, highest threshold first.
    pub cuts: Vec<(f64, SuccessCategory)>,
}

impl RevenueThresholds {
    /// Compute thresholds from a revenue column.
    ///
    /// Returns `None` for degenerate sets (fewer than two values, or all
    /// values identical); every record then falls into the lowest tier.
    pub fn compute(revenues: &[f64], scheme: TierScheme) -> Option<Self> {
        if revenues.len() < 2 {
            return None;
        }

        let mut sorted = revenues.to_vec();
        sorted.sort_by(f64::total_cmp);
        if sorted.first() == sorted.last() {
            return None;
        }

        let cuts = scheme
            .cut_points()
            .iter()
            .map(|(q, tier)| (quantile(&sorted, *q), *tier))
            .collect();
        Some(Self { cuts })
    }

    /// Tier for a revenue value: the highest threshold met or exceeded.
    pub fn classify(&self, revenue: f64) -> SuccessCategory {
        self.cuts
            .iter()
            .find(|(threshold, _)| revenue >= *threshold)
            .map_or(SuccessCategory::Low, |(_, tier)| *tier)
    }
}

/// Linearly interpolated quantile of an ascending, non-empty slice.
///
/// Matches the default interpolation of common dataframe libraries:
/// position `(n - 1) * q` between the two neighbouring order statistics.
pub fn quantile(sorted: &[f64], q: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = (sorted.len() - 1) as f64 * q.clamp(0.0, 1.0);
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

/// Assign a success tier to every movie in the working set.
///
/// Output order matches input order.
pub fn categorize(movies: &[Arc<Movie>], scheme: TierScheme) -> Vec<EnrichedMovie> {
    let revenues: Vec<f64> = movies.iter().map(|m| m.record.revenue).collect();
    let thresholds = RevenueThresholds::compute(&revenues, scheme);

    if let Some(ref t) = thresholds {
        debug!(records = movies.len(), cuts = ?t.cuts, "computed revenue thresholds");
    } else {
        debug!(records = movies.len(), "degenerate working set, all records in lowest tier");
    }

    movies
        .iter()
        .map(|movie| EnrichedMovie {
            movie: Arc::clone(movie),
            category: thresholds
                .as_ref()
                .map_or(SuccessCategory::Low, |t| t.classify(movie.record.revenue)),
        })
        .collect()
}
