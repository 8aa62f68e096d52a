//! Queries over scored zones: top-N, lookup, geographic filtering and
//! per-region summaries.

use std::collections::BTreeMap;

use franchise_zones_commune_models::departments::{
    DEPARTMENT_CODES, REGIONS, normalize_department_code,
};
use franchise_zones_zones_models::{RegionalStats, ScoredZone, ZoneFilter};

use crate::scoring::rank_by_score;
use crate::stats;

/// The first `n` zones of a ranked list.
#[must_use]
pub fn top_zones(scored: &[ScoredZone], n: usize) -> &[ScoredZone] {
    &scored[..n.min(scored.len())]
}

/// Looks up a zone by id.
#[must_use]
pub fn zone_details(scored: &[ScoredZone], zone_id: usize) -> Option<&ScoredZone> {
    scored.iter().find(|z| z.zone.zone_id == zone_id)
}

/// Whether `zone` passes `filter`.
#[must_use]
pub fn matches_filter(zone: &ScoredZone, filter: &ZoneFilter) -> bool {
    let zone = &zone.zone;

    if !filter.regions.is_empty() && !filter.regions.iter().any(|r| *r == zone.region) {
        return false;
    }
    if !filter.departments.is_empty()
        && !filter
            .departments
            .iter()
            .any(|d| normalize_department_code(d) == zone.department_code)
    {
        return false;
    }

    match filter.city.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(city) => {
            let needle = city.to_lowercase();
            zone.name.to_lowercase().contains(&needle)
                || zone.center_name.to_lowercase().contains(&needle)
        }
    }
}

/// Filter values that can never match a zone: regions and department codes
/// outside the known mapping.
#[must_use]
pub fn unknown_filter_values(filter: &ZoneFilter) -> Vec<String> {
    let regions = filter
        .regions
        .iter()
        .filter(|r| !REGIONS.contains(&r.as_str()))
        .cloned();
    let departments = filter
        .departments
        .iter()
        .filter(|d| !DEPARTMENT_CODES.contains(&normalize_department_code(d).as_str()))
        .cloned();

    regions.chain(departments).collect()
}

/// Keeps zones passing `filter` and re-ranks them from 1.
///
/// Component scores are not recomputed: they stay relative to the zone set
/// they were scored against.
#[must_use]
pub fn filter_zones(scored: &[ScoredZone], filter: &ZoneFilter) -> Vec<ScoredZone> {
    let kept: Vec<ScoredZone> = scored
        .iter()
        .filter(|z| matches_filter(z, filter))
        .cloned()
        .collect();

    if kept.len() < scored.len() {
        log::debug!("{} of {} zones match the filter", kept.len(), scored.len());
    }

    rank_by_score(kept)
}

/// Per-region means and totals, best mean composite score first.
#[must_use]
pub fn regional_stats(scored: &[ScoredZone]) -> Vec<RegionalStats> {
    let mut by_region: BTreeMap<&str, Vec<&ScoredZone>> = BTreeMap::new();
    for zone in scored {
        by_region.entry(zone.zone.region.as_str()).or_default().push(zone);
    }

    let mut regions: Vec<RegionalStats> = by_region
        .into_iter()
        .map(|(region, zones)| {
            let column = |field: fn(&ScoredZone) -> f64| -> Vec<f64> {
                zones.iter().map(|z| field(z)).collect()
            };
            RegionalStats {
                region: region.to_string(),
                mean_score_total: stats::mean(&column(|z| z.score_total)),
                mean_score_housing: stats::mean(&column(|z| z.score_housing)),
                mean_score_income: stats::mean(&column(|z| z.score_income)),
                mean_score_market_size: stats::mean(&column(|z| z.score_market_size)),
                households: stats::sum(&column(|z| z.zone.households)),
                potential_clients: stats::sum(&column(|z| z.potential_clients)),
                zone_count: zones.len(),
            }
        })
        .collect();

    regions.sort_by(|a, b| b.mean_score_total.total_cmp(&a.mean_score_total));
    regions
}
