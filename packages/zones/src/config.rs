//! Analysis parameters.
//!
//! Defaults are embedded from `config/default.toml` at compile time. User
//! configuration files only need the keys they change: they are merged
//! over the embedded defaults before deserialization.

use std::path::Path;

use franchise_zones_zones_models::ScoringWeights;
use serde::{Deserialize, Serialize};

use crate::ZoneError;

const DEFAULT_CONFIG_TOML: &str = include_str!("../config/default.toml");

/// Minimum requirements for a commune to take part in zone formation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EligibilityCriteria {
    /// Minimum share of individual houses.
    pub min_pct_houses: f64,
    /// Minimum share of primary residences.
    pub min_pct_primary_residences: f64,
    /// Minimum number of households.
    pub min_households: f64,
}

/// How zone centers are chosen among eligible communes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CenterCriteria {
    /// Population at or above which an eligible commune becomes a center.
    pub min_population: f64,
    /// Number of most populous communes used when none reach
    /// `min_population`.
    pub fallback_count: usize,
}

/// Requirements a zone must meet after aggregation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ZoneCriteria {
    /// Minimum mean share of individual houses.
    pub min_pct_houses: f64,
    /// Minimum mean share of primary residences.
    pub min_pct_primary_residences: f64,
    /// Minimum number of member communes.
    pub min_communes: usize,
}

/// Scoring constants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScoringConfig {
    /// Household count mapped to a market size score of 0.
    pub market_floor_households: f64,
    /// Share of households expected to become clients.
    pub conversion_rate: f64,
    /// Multiple of the national median income scored 0.
    pub income_lower_factor: f64,
    /// Multiple of the national median income scored 100.
    pub income_upper_factor: f64,
    /// Weights used when the caller supplies none.
    pub default_weights: ScoringWeights,
}

/// Complete set of zone formation and scoring parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalysisConfig {
    /// Zone radius in kilometers when the caller supplies none.
    pub default_radius_km: f64,
    pub eligibility: EligibilityCriteria,
    pub centers: CenterCriteria,
    pub zone_filter: ZoneCriteria,
    pub scoring: ScoringConfig,
}

impl Default for AnalysisConfig {
    /// Returns the embedded default configuration.
    ///
    /// # Panics
    ///
    /// Panics if the embedded `config/default.toml` fails to parse. It is a
    /// compile-time constant, so a failure is a development error caught by
    /// the tests below.
    fn default() -> Self {
        toml::de::from_str(DEFAULT_CONFIG_TOML)
            .unwrap_or_else(|e| panic!("Failed to parse embedded default config: {e}"))
    }
}

impl AnalysisConfig {
    /// Parses a (possibly partial) TOML document over the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::Config`] if the document is not valid TOML or
    /// contains unknown or mistyped keys, and [`ZoneError::InvalidConfig`]
    /// if the merged values fail [`Self::validate`].
    pub fn from_toml_str(overrides: &str) -> Result<Self, ZoneError> {
        let mut merged: toml::Table = toml::de::from_str(DEFAULT_CONFIG_TOML)?;
        let overrides: toml::Table = toml::de::from_str(overrides)?;
        merge_tables(&mut merged, overrides);

        let config: Self = toml::Value::Table(merged).try_into()?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::Io`] if the file cannot be read, otherwise the
    /// errors of [`Self::from_toml_str`].
    pub fn load(path: &Path) -> Result<Self, ZoneError> {
        let contents = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        log::info!("Loaded analysis config from {}", path.display());
        Ok(config)
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    ///
    /// Returns [`ZoneError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> Result<(), ZoneError> {
        if !(self.default_radius_km.is_finite() && self.default_radius_km > 0.0) {
            return Err(invalid(format!(
                "default_radius_km must be positive, got {}",
                self.default_radius_km
            )));
        }

        let thresholds = [
            ("eligibility.min_pct_houses", self.eligibility.min_pct_houses),
            (
                "eligibility.min_pct_primary_residences",
                self.eligibility.min_pct_primary_residences,
            ),
            ("eligibility.min_households", self.eligibility.min_households),
            ("centers.min_population", self.centers.min_population),
            ("zone_filter.min_pct_houses", self.zone_filter.min_pct_houses),
            (
                "zone_filter.min_pct_primary_residences",
                self.zone_filter.min_pct_primary_residences,
            ),
            (
                "scoring.market_floor_households",
                self.scoring.market_floor_households,
            ),
            ("scoring.conversion_rate", self.scoring.conversion_rate),
            ("scoring.default_weights.housing", self.scoring.default_weights.housing),
            ("scoring.default_weights.income", self.scoring.default_weights.income),
            ("scoring.default_weights.market", self.scoring.default_weights.market),
        ];
        if let Some((name, value)) = thresholds
            .iter()
            .find(|(_, value)| !(value.is_finite() && *value >= 0.0))
        {
            return Err(invalid(format!("{name} must be non-negative, got {value}")));
        }

        if self.centers.fallback_count == 0 {
            return Err(invalid("centers.fallback_count must be at least 1".to_string()));
        }

        if !(self.scoring.income_lower_factor < self.scoring.income_upper_factor) {
            return Err(invalid(format!(
                "scoring.income_lower_factor ({}) must be below income_upper_factor ({})",
                self.scoring.income_lower_factor, self.scoring.income_upper_factor
            )));
        }

        Ok(())
    }
}

const fn invalid(message: String) -> ZoneError {
    ZoneError::InvalidConfig { message }
}

/// Recursively overlays `overrides` onto `base`. Nested tables are merged
/// key by key; any other value replaces the base value.
fn merge_tables(base: &mut toml::Table, overrides: toml::Table) {
    for (key, value) in overrides {
        match value {
            toml::Value::Table(incoming) => match base.get_mut(&key) {
                Some(toml::Value::Table(existing)) => merge_tables(existing, incoming),
                _ => {
                    base.insert(key, toml::Value::Table(incoming));
                }
            },
            other => {
                base.insert(key, other);
            }
        }
    }
}
