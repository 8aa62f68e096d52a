#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Zone formation and scoring engine.
//!
//! [`ZoneAnalyzer`] groups eligible communes around nearby population
//! centers, aggregates each group into a [`Zone`], and scores zones on
//! housing suitability, income level and market size. Both steps are pure
//! functions of the commune table and their parameters: the analyzer holds
//! no per-run state, and "no zone found" is an empty result, not an error.
//!
//! ```ignore
//! let analyzer = ZoneAnalyzer::new(communes, AnalysisConfig::default());
//! let zones = analyzer.create_zones(15.0);
//! let scored = analyzer.calculate_scores(&zones, &ScoringWeights::new(0.4, 0.3, 0.3));
//! ```

pub mod aggregate;
pub mod analytics;
pub mod config;
pub mod formation;
pub mod normalize;
pub mod progress;
pub mod scoring;
pub mod stats;

pub use config::AnalysisConfig;
pub use formation::{CenterSelection, NationalBaseline, ZoneAnalyzer};
pub use franchise_zones_spatial::SearchStrategy;
pub use franchise_zones_zones_models::{
    RegionalStats, ScoredZone, ScoringWeights, Zone, ZoneAssignment, ZoneFilter,
};

use thiserror::Error;

/// Errors raised while loading analysis configuration.
#[derive(Debug, Error)]
pub enum ZoneError {
    /// The configuration is not valid TOML or does not match the schema.
    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),

    /// The configuration parsed but holds an unusable value.
    #[error("Invalid config: {message}")]
    InvalidConfig {
        /// Description of what went wrong.
        message: String,
    },

    /// Reading a configuration file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
