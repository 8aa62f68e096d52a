//! Multi-criterion zone scoring.
//!
//! Each zone receives three component scores on a 0-100 scale:
//!
//! * **housing**: share of individual houses (60%) and of primary
//!   residences (40%), each normalized over the zones being scored;
//! * **income**: median income against a band around the national median
//!   (70%) and poverty rate, inverted, over the zones being scored (30%);
//! * **market size**: `ln(1 + households)` between a household floor and
//!   the largest zone.
//!
//! Housing, poverty and market references come from the current zone set,
//! so scores are relative: scoring a different selection of zones changes
//! every score. The composite is the literal weighted sum of the components.

use std::cmp::Ordering;

use franchise_zones_zones_models::{ScoredZone, ScoringWeights, Zone};

use crate::config::ScoringConfig;
use crate::formation::{NationalBaseline, ZoneAnalyzer};
use crate::normalize::normalize_all;
use crate::stats;

const HOUSES_SHARE: f64 = 0.6;
const PRIMARY_RESIDENCES_SHARE: f64 = 0.4;
const INCOME_SHARE: f64 = 0.7;
const POVERTY_SHARE: f64 = 0.3;

/// Per-zone component scores, in zone order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComponentScores {
    pub housing: Vec<f64>,
    pub income: Vec<f64>,
    pub market_size: Vec<f64>,
}

/// Housing suitability scores.
#[must_use]
pub fn housing_scores(zones: &[Zone]) -> Vec<f64> {
    let houses: Vec<f64> = zones.iter().map(|z| z.pct_houses).collect();
    let primary: Vec<f64> = zones.iter().map(|z| z.pct_primary_residences).collect();

    let houses = normalize_all(&houses, stats::min(&houses), stats::max(&houses));
    let primary = normalize_all(&primary, stats::min(&primary), stats::max(&primary));

    weighted_pair(&houses, HOUSES_SHARE, &primary, PRIMARY_RESIDENCES_SHARE)
}

/// Income level scores.
#[must_use]
pub fn income_scores(
    zones: &[Zone],
    baseline: &NationalBaseline,
    config: &ScoringConfig,
) -> Vec<f64> {
    let incomes: Vec<f64> = zones.iter().map(|z| z.median_income).collect();
    let incomes = normalize_all(
        &incomes,
        baseline.median_income * config.income_lower_factor,
        baseline.median_income * config.income_upper_factor,
    );

    // negated so that the lowest poverty rate scores highest
    let poverty: Vec<f64> = zones.iter().map(|z| -z.poverty_rate).collect();
    let low_poverty = normalize_all(&poverty, stats::min(&poverty), stats::max(&poverty));

    weighted_pair(&incomes, INCOME_SHARE, &low_poverty, POVERTY_SHARE)
}

/// Market size scores on a logarithmic household scale.
#[must_use]
pub fn market_size_scores(zones: &[Zone], config: &ScoringConfig) -> Vec<f64> {
    let households: Vec<f64> = zones.iter().map(|z| z.households.ln_1p()).collect();
    normalize_all(
        &households,
        config.market_floor_households.ln_1p(),
        stats::max(&households),
    )
}

fn weighted_pair(a: &[f64], a_share: f64, b: &[f64], b_share: f64) -> Vec<f64> {
    a.iter()
        .zip(b)
        .map(|(a, b)| a.mul_add(a_share, b * b_share))
        .collect()
}

/// Computes the three component scores for every zone.
#[must_use]
pub fn component_scores(
    zones: &[Zone],
    baseline: &NationalBaseline,
    config: &ScoringConfig,
) -> ComponentScores {
    ComponentScores {
        housing: housing_scores(zones),
        income: income_scores(zones, baseline, config),
        market_size: market_size_scores(zones, config),
    }
}

/// Scores, ranks and estimates potential clients for `zones`.
///
/// Weights are applied as given, without renormalization. Zones are ordered
/// by descending composite score; equal scores keep their input order and a
/// missing composite sorts last. Ranks run from 1 without gaps.
#[must_use]
pub fn score_zones(
    zones: &[Zone],
    weights: &ScoringWeights,
    baseline: &NationalBaseline,
    config: &ScoringConfig,
) -> Vec<ScoredZone> {
    if zones.is_empty() {
        return Vec::new();
    }

    let components = component_scores(zones, baseline, config);

    let scored: Vec<ScoredZone> = zones
        .iter()
        .enumerate()
        .map(|(i, zone)| {
            let housing = components.housing[i];
            let income = components.income[i];
            let market_size = components.market_size[i];

            ScoredZone {
                zone: zone.clone(),
                score_housing: housing,
                score_income: income,
                score_market_size: market_size,
                score_total: market_size.mul_add(
                    weights.market,
                    housing.mul_add(weights.housing, income * weights.income),
                ),
                rank: 0,
                potential_clients: zone.households * config.conversion_rate,
            }
        })
        .collect();

    rank_by_score(scored)
}

/// Sorts by descending composite score (stable, missing scores last) and
/// assigns ranks 1..=n.
#[must_use]
pub fn rank_by_score(mut zones: Vec<ScoredZone>) -> Vec<ScoredZone> {
    zones.sort_by(|a, b| compare_desc(a.score_total, b.score_total));
    for (i, zone) in zones.iter_mut().enumerate() {
        zone.rank = i + 1;
    }
    zones
}

fn compare_desc(a: f64, b: f64) -> Ordering {
    match (a.is_nan(), b.is_nan()) {
        (false, false) => b.partial_cmp(&a).unwrap_or(Ordering::Equal),
        (false, true) => Ordering::Less,
        (true, false) => Ordering::Greater,
        (true, true) => Ordering::Equal,
    }
}

impl ZoneAnalyzer {
    /// Scores `zones` against this analyzer's national baseline.
    ///
    /// An empty zone list yields an empty result.
    #[must_use]
    pub fn calculate_scores(&self, zones: &[Zone], weights: &ScoringWeights) -> Vec<ScoredZone> {
        if zones.is_empty() {
            log::warn!("No zone to score with the current criteria");
            return Vec::new();
        }
        if !weights.is_normalized() {
            log::debug!(
                "Scoring weights sum to {:.3}; composite scores are not on a 0-100 scale",
                weights.total()
            );
        }
        score_zones(zones, weights, self.baseline(), &self.config().scoring)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    fn zone(
        zone_id: usize,
        pct_houses: f64,
        pct_primary: f64,
        income: f64,
        poverty: f64,
        households: f64,
    ) -> Zone {
        Zone {
            zone_id,
            commune_count: 2,
            name: format!("Zone {zone_id}"),
            center_name: format!("Center {zone_id}"),
            members: vec![format!("{zone_id}a"), format!("{zone_id}b")],
            population: households * 2.2,
            households,
            individual_houses: households * pct_houses / 100.0,
            latitude: 46.0,
            longitude: -1.0,
            pct_houses,
            pct_primary_residences: pct_primary,
            median_income: income,
            median_living_standard: income,
            poverty_rate: poverty,
            department_code: "17".to_string(),
            region: "Nouvelle-Aquitaine".to_string(),
        }
    }

    fn baseline() -> NationalBaseline {
        NationalBaseline {
            median_income: 20_000.0,
            median_pct_houses: 60.0,
        }
    }

    fn config() -> ScoringConfig {
        AnalysisConfig::default().scoring
    }

    const fn default_weights() -> ScoringWeights {
        ScoringWeights::new(0.4, 0.3, 0.3)
    }

    fn sample_zones() -> Vec<Zone> {
        vec![
            zone(0, 60.0, 80.0, 22_000.0, 12.0, 2_000.0),
            zone(1, 90.0, 95.0, 30_000.0, 6.0, 20_000.0),
            zone(2, 75.0, 70.0, 16_000.0, 18.0, 1_000.0),
        ]
    }

    #[test]
    fn housing_uses_zone_range() {
        let scores = housing_scores(&sample_zones());
        assert!((scores[1] - 100.0).abs() < 1e-9);
        // houses at the minimum, primary residences at 10/25 of the range
        assert!((scores[0] - 0.4 * 40.0).abs() < 1e-9);
        assert!((scores[2] - 0.6 * 50.0).abs() < 1e-9);
    }

    #[test]
    fn income_uses_national_band_and_inverted_poverty() {
        let scores = income_scores(&sample_zones(), &baseline(), &config());
        // band is 16_000..30_000
        let expected_0 = 0.7 * (6_000.0 / 14_000.0 * 100.0) + 0.3 * 50.0;
        assert!((scores[0] - expected_0).abs() < 1e-9);
        assert!((scores[1] - 100.0).abs() < 1e-9);
        assert!(scores[2].abs() < 1e-9);
    }

    #[test]
    fn market_size_is_logarithmic() {
        let scores = market_size_scores(&sample_zones(), &config());
        assert!(scores[2].abs() < 1e-9, "floor households score 0");
        assert!((scores[1] - 100.0).abs() < 1e-9);
        let expected = (2_001.0_f64.ln() - 1_001.0_f64.ln())
            / (20_001.0_f64.ln() - 1_001.0_f64.ln())
            * 100.0;
        assert!((scores[0] - expected).abs() < 1e-9);
        assert!(scores[0] > 1_000.0 / 19_000.0 * 100.0, "log scale lifts smaller zones");
    }

    #[test]
    fn single_zone_gets_midpoints() {
        let zones = vec![zone(0, 70.0, 80.0, 20_000.0, 10.0, 5_000.0)];
        let scores = component_scores(&zones, &baseline(), &config());
        assert!((scores.housing[0] - 50.0).abs() < 1e-9);
        let expected_income = 0.7 * (4_000.0 / 14_000.0 * 100.0) + 0.3 * 50.0;
        assert!((scores.income[0] - expected_income).abs() < 1e-9);
        assert!((scores.market_size[0] - 100.0).abs() < 1e-9);
    }

    #[test]
    fn composite_is_literal_weighted_sum() {
        let weights = ScoringWeights::new(0.5, 0.2, 0.1);
        let scored = score_zones(&sample_zones(), &weights, &baseline(), &config());
        for z in &scored {
            let expected = z.score_housing * 0.5 + z.score_income * 0.2 + z.score_market_size * 0.1;
            assert!((z.score_total - expected).abs() < 1e-9);
        }
    }

    #[test]
    fn weights_summing_below_one_cap_the_composite() {
        let weights = ScoringWeights::new(0.4, 0.2, 0.2);
        let scored = score_zones(&sample_zones(), &weights, &baseline(), &config());
        let best = &scored[0];
        assert_eq!(best.zone.zone_id, 1);
        assert!((best.score_total - 80.0).abs() < 1e-9);
        assert!(scored.iter().all(|z| z.score_total <= 80.0 + 1e-9));
    }

    #[test]
    fn ranks_are_dense_and_descending() {
        let weights = ScoringWeights::new(0.4, 0.3, 0.3);
        let scored = score_zones(&sample_zones(), &weights, &baseline(), &config());
        let ranks: Vec<usize> = scored.iter().map(|z| z.rank).collect();
        assert_eq!(ranks, vec![1, 2, 3]);
        for pair in scored.windows(2) {
            assert!(pair[0].score_total >= pair[1].score_total);
        }
    }

    #[test]
    fn equal_scores_keep_input_order() {
        let zones = vec![
            zone(7, 70.0, 80.0, 20_000.0, 10.0, 5_000.0),
            zone(3, 70.0, 80.0, 20_000.0, 10.0, 5_000.0),
            zone(5, 70.0, 80.0, 20_000.0, 10.0, 5_000.0),
        ];
        let scored = score_zones(&zones, &default_weights(), &baseline(), &config());
        let ids: Vec<usize> = scored.iter().map(|z| z.zone.zone_id).collect();
        assert_eq!(ids, vec![7, 3, 5]);
    }

    #[test]
    fn missing_composite_sorts_last() {
        let zones = vec![
            zone(0, 70.0, 80.0, f64::NAN, 10.0, 5_000.0),
            zone(1, 80.0, 90.0, 25_000.0, 8.0, 6_000.0),
        ];
        let scored = score_zones(&zones, &default_weights(), &baseline(), &config());
        assert_eq!(scored[0].zone.zone_id, 1);
        assert!(scored[1].score_total.is_nan());
        assert_eq!(scored[1].rank, 2);
    }

    #[test]
    fn potential_clients_use_conversion_rate() {
        let scored = score_zones(&sample_zones(), &default_weights(), &baseline(), &config());
        for z in &scored {
            assert!((z.potential_clients - z.zone.households * 0.02).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_zone_list_scores_nothing() {
        assert!(score_zones(&[], &default_weights(), &baseline(), &config()).is_empty());
    }
}
