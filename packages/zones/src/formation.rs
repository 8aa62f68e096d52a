//! City-centered zone formation.
//!
//! A formation run is a single pass over the commune table:
//!
//! 1. keep communes meeting the eligibility criteria,
//! 2. pick zone centers among them (population threshold, or the most
//!    populous communes when nobody reaches it),
//! 3. attach every eligible commune to its nearest center within the
//!    radius,
//! 4. aggregate each center's members into a [`Zone`] and drop zones that
//!    miss the zone criteria.
//!
//! Each commune ends up in at most one zone. Runs never mutate the commune
//! table, so one analyzer can serve any number of runs with different radii.

use std::sync::Arc;

use franchise_zones_commune_models::Commune;
use franchise_zones_spatial::{RadianPoint, SearchStrategy, km_to_angle, nearest_centers};
use franchise_zones_zones_models::{Zone, ZoneAssignment};

use crate::aggregate::{aggregate_zones, apply_zone_criteria};
use crate::config::AnalysisConfig;
use crate::progress::{ProgressCallback, null_progress};
use crate::stats;

/// Communes between two progress updates during assignment.
const PROGRESS_INTERVAL: usize = 500;

/// Reference values computed once from the full, unfiltered commune table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NationalBaseline {
    /// Median of all commune median incomes.
    pub median_income: f64,
    /// Median share of individual houses across all communes.
    pub median_pct_houses: f64,
}

impl NationalBaseline {
    #[must_use]
    pub fn from_communes(communes: &[Commune]) -> Self {
        let incomes: Vec<f64> = communes.iter().map(|c| c.median_income).collect();
        let houses: Vec<f64> = communes.iter().map(|c| c.pct_houses).collect();
        Self {
            median_income: stats::median(&incomes),
            median_pct_houses: stats::median(&houses),
        }
    }
}

/// Zone centers chosen for one formation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterSelection {
    /// Commune indices of the centers. A zone's id is its center's position
    /// in this list.
    pub communes: Vec<usize>,
    /// Whether the most-populous fallback was used.
    pub used_fallback: bool,
}

/// Forms and scores franchise zones over a fixed commune table.
pub struct ZoneAnalyzer {
    communes: Arc<[Commune]>,
    config: AnalysisConfig,
    baseline: NationalBaseline,
    progress: Arc<dyn ProgressCallback>,
}

impl ZoneAnalyzer {
    /// Creates an analyzer and computes the national baseline.
    #[must_use]
    pub fn new(communes: impl Into<Arc<[Commune]>>, config: AnalysisConfig) -> Self {
        let communes = communes.into();
        let baseline = NationalBaseline::from_communes(&communes);
        log::debug!(
            "Analyzer ready: {} communes, national median income {:.0}",
            communes.len(),
            baseline.median_income
        );

        Self {
            communes,
            config,
            baseline,
            progress: null_progress(),
        }
    }

    /// Reports assignment progress to `progress`.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = progress;
        self
    }

    #[must_use]
    pub fn communes(&self) -> &[Commune] {
        &self.communes
    }

    #[must_use]
    pub const fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    #[must_use]
    pub const fn baseline(&self) -> &NationalBaseline {
        &self.baseline
    }

    /// Indices of communes meeting the eligibility criteria, in table order.
    ///
    /// Communes with a missing value in any criterion are not eligible.
    #[must_use]
    pub fn eligible_communes(&self) -> Vec<usize> {
        let criteria = &self.config.eligibility;
        self.communes
            .iter()
            .enumerate()
            .filter(|(_, c)| {
                c.pct_houses >= criteria.min_pct_houses
                    && c.pct_primary_residences >= criteria.min_pct_primary_residences
                    && c.households >= criteria.min_households
            })
            .map(|(i, _)| i)
            .collect()
    }

    /// Picks zone centers among `eligible`.
    ///
    /// Communes at or above the population threshold become centers in
    /// table order. If none qualify, the most populous eligible communes are
    /// used instead, in descending population order (ties keep table order).
    #[must_use]
    pub fn select_centers(&self, eligible: &[usize]) -> CenterSelection {
        let min_population = self.config.centers.min_population;
        let communes: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|i| self.communes[*i].population >= min_population)
            .collect();

        if !communes.is_empty() {
            return CenterSelection {
                communes,
                used_fallback: false,
            };
        }

        let mut by_population: Vec<usize> = eligible
            .iter()
            .copied()
            .filter(|i| !self.communes[*i].population.is_nan())
            .collect();
        by_population.sort_by(|a, b| {
            self.communes[*b]
                .population
                .total_cmp(&self.communes[*a].population)
        });
        by_population.truncate(self.config.centers.fallback_count);

        CenterSelection {
            communes: by_population,
            used_fallback: true,
        }
    }

    /// Attaches each eligible commune to its nearest center within
    /// `max_radius_km`. Communes with no center in range are left out.
    #[must_use]
    pub fn assign_communes(
        &self,
        eligible: &[usize],
        centers: &[usize],
        max_radius_km: f64,
        strategy: SearchStrategy,
    ) -> Vec<ZoneAssignment> {
        let center_points: Vec<RadianPoint> = centers.iter().map(|i| self.location(*i)).collect();
        let query_points: Vec<RadianPoint> = eligible.iter().map(|i| self.location(*i)).collect();

        let matches = nearest_centers(
            &center_points,
            &query_points,
            km_to_angle(max_radius_km),
            strategy,
        );

        let total = eligible.len();
        self.progress.set_total(total as u64);
        self.progress.set_message("Assigning communes to zones".to_string());

        let mut assignments = Vec::new();
        for (position, (commune, hit)) in eligible.iter().zip(matches).enumerate() {
            if position % PROGRESS_INTERVAL == 0 {
                self.progress.set_position(position as u64);
            }
            if let Some(hit) = hit {
                assignments.push(ZoneAssignment {
                    commune: *commune,
                    zone_id: hit.center,
                    distance_to_center_km: hit.distance_km(),
                });
            }
        }

        self.progress.finish_and_clear();
        assignments
    }

    /// Runs a full formation pass using the spatial index.
    ///
    /// An empty result is a normal outcome (no eligible communes, no center
    /// in range, or no zone meeting the zone criteria).
    #[must_use]
    pub fn create_zones(&self, max_radius_km: f64) -> Vec<Zone> {
        self.create_zones_with(max_radius_km, SearchStrategy::Indexed)
    }

    /// Runs a full formation pass with an explicit search strategy.
    #[must_use]
    pub fn create_zones_with(&self, max_radius_km: f64, strategy: SearchStrategy) -> Vec<Zone> {
        let eligible = self.eligible_communes();
        log::info!(
            "{} of {} communes meet the eligibility criteria",
            eligible.len(),
            self.communes.len()
        );
        if eligible.is_empty() {
            return Vec::new();
        }

        let centers = self.select_centers(&eligible);
        if centers.used_fallback {
            log::info!(
                "No commune reaches {} inhabitants, using the {} most populous as centers",
                self.config.centers.min_population,
                centers.communes.len()
            );
        } else {
            log::info!("Selected {} zone centers", centers.communes.len());
        }

        let assignments =
            self.assign_communes(&eligible, &centers.communes, max_radius_km, strategy);
        if assignments.is_empty() {
            log::warn!(
                "No commune was assigned to a zone within {max_radius_km} km. Try a larger radius."
            );
            return Vec::new();
        }
        log::debug!(
            "Assigned {} communes within {max_radius_km} km",
            assignments.len()
        );

        let zones = aggregate_zones(&self.communes, &centers.communes, &assignments);
        let formed = zones.len();
        let zones = apply_zone_criteria(zones, &self.config.zone_filter);
        log::info!("{} of {formed} zones meet the zone criteria", zones.len());

        zones
    }

    fn location(&self, commune: usize) -> RadianPoint {
        let c = &self.communes[commune];
        RadianPoint::from_degrees(c.latitude, c.longitude)
    }
}
