#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone and scoring types.
//!
//! A [`Zone`] is a cluster of communes anchored on one center commune. After
//! scoring it becomes a [`ScoredZone`] carrying three component scores, a
//! weighted composite and its rank. Field names serialize in `snake_case`
//! so JSON output uses the same column names as the tabular reports.

use serde::{Deserialize, Serialize};

/// Relative importance of the three score components.
///
/// Weights are applied literally. They are expected to sum to 1.0 so that
/// composite scores stay on a 0-100 scale, but nothing renormalizes them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    /// Weight of the housing suitability score.
    pub housing: f64,
    /// Weight of the income level score.
    pub income: f64,
    /// Weight of the market size score.
    pub market: f64,
}

impl ScoringWeights {
    #[must_use]
    pub const fn new(housing: f64, income: f64, market: f64) -> Self {
        Self {
            housing,
            income,
            market,
        }
    }

    /// Sum of the three weights.
    #[must_use]
    pub fn total(&self) -> f64 {
        self.housing + self.income + self.market
    }

    /// Whether the weights sum to 1.0 within `1e-6`.
    #[must_use]
    pub fn is_normalized(&self) -> bool {
        (self.total() - 1.0).abs() < 1e-6
    }
}

/// A commune attached to a zone center during formation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZoneAssignment {
    /// Position of the commune in the analyzed commune table.
    pub commune: usize,
    /// Zone identifier (index of the center among the selected centers).
    pub zone_id: usize,
    /// Great-circle distance to the zone center in kilometers.
    pub distance_to_center_km: f64,
}

/// A cluster of communes sharing the same center.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Zone {
    /// Index of the zone center among the selected centers.
    pub zone_id: usize,
    /// Number of member communes.
    pub commune_count: usize,
    /// Readable summary of the member names.
    pub name: String,
    /// Name of the center commune.
    pub center_name: String,
    /// Commune codes of every member, in commune table order.
    pub members: Vec<String>,
    /// Summed population.
    pub population: f64,
    /// Summed households.
    pub households: f64,
    /// Summed individual houses.
    pub individual_houses: f64,
    /// Mean member latitude.
    pub latitude: f64,
    /// Mean member longitude.
    pub longitude: f64,
    /// Mean share of individual houses.
    pub pct_houses: f64,
    /// Mean share of primary residences.
    pub pct_primary_residences: f64,
    /// Median of the member median incomes.
    pub median_income: f64,
    /// Median of the member median standards of living.
    pub median_living_standard: f64,
    /// Mean poverty rate.
    pub poverty_rate: f64,
    /// Department of the first member. A zone can straddle departments;
    /// only the first one is kept.
    pub department_code: String,
    /// Region derived from [`Self::department_code`].
    pub region: String,
}

/// A zone with its scores attached.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredZone {
    /// The scored zone.
    #[serde(flatten)]
    pub zone: Zone,
    /// Housing suitability score (0-100).
    pub score_housing: f64,
    /// Income level score (0-100).
    pub score_income: f64,
    /// Market size score (0-100).
    pub score_market_size: f64,
    /// Weighted sum of the three component scores.
    pub score_total: f64,
    /// 1-based position by descending composite score.
    pub rank: usize,
    /// Estimated convertible households.
    pub potential_clients: f64,
}

/// Geographic selection applied to scored zones.
///
/// Empty lists select everything. When both regions and departments are
/// given, a zone must match both.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ZoneFilter {
    /// Region names to keep.
    pub regions: Vec<String>,
    /// Department codes to keep.
    pub departments: Vec<String>,
    /// Case-insensitive substring matched against the zone and center names.
    pub city: Option<String>,
}

impl ZoneFilter {
    /// Whether the filter selects every zone.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
            && self.departments.is_empty()
            && self.city.as_deref().is_none_or(str::is_empty)
    }
}

/// Per-region averages over scored zones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionalStats {
    /// Region name.
    pub region: String,
    /// Mean composite score.
    pub mean_score_total: f64,
    /// Mean housing score.
    pub mean_score_housing: f64,
    /// Mean income score.
    pub mean_score_income: f64,
    /// Mean market size score.
    pub mean_score_market_size: f64,
    /// Summed households.
    pub households: f64,
    /// Summed potential clients.
    pub potential_clients: f64,
    /// Number of zones in the region.
    pub zone_count: usize,
}
