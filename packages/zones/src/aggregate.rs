//! Zone-level aggregation of assigned communes.

use std::collections::BTreeMap;

use franchise_zones_commune_models::{Commune, departments};
use franchise_zones_zones_models::{Zone, ZoneAssignment};

use crate::config::ZoneCriteria;
use crate::stats;

/// Number of member names spelled out in a zone name.
const NAMED_MEMBERS: usize = 3;

/// Builds a readable zone name from its member names.
///
/// Names are sorted; up to three are listed, and larger zones end with
/// `" + N autres"`.
#[must_use]
pub fn format_zone_name(names: &[&str]) -> String {
    let mut sorted = names.to_vec();
    sorted.sort_unstable();

    if sorted.len() <= NAMED_MEMBERS {
        sorted.join(", ")
    } else {
        format!(
            "{} + {} autres",
            sorted[..NAMED_MEMBERS].join(", "),
            sorted.len() - NAMED_MEMBERS
        )
    }
}

/// Groups assignments by zone and computes zone statistics.
///
/// `centers` maps a zone id to the commune index of its center. Zones are
/// returned in ascending zone id order and members keep commune table
/// order.
#[must_use]
pub fn aggregate_zones(
    communes: &[Commune],
    centers: &[usize],
    assignments: &[ZoneAssignment],
) -> Vec<Zone> {
    let mut groups: BTreeMap<usize, Vec<&Commune>> = BTreeMap::new();
    for assignment in assignments {
        groups
            .entry(assignment.zone_id)
            .or_default()
            .push(&communes[assignment.commune]);
    }

    groups
        .into_iter()
        .map(|(zone_id, members)| {
            let center_name = centers
                .get(zone_id)
                .map(|i| communes[*i].name.clone())
                .unwrap_or_default();
            build_zone(zone_id, center_name, &members)
        })
        .collect()
}

fn build_zone(zone_id: usize, center_name: String, members: &[&Commune]) -> Zone {
    let column = |field: fn(&Commune) -> f64| -> Vec<f64> {
        members.iter().map(|c| field(c)).collect()
    };

    let names: Vec<&str> = members.iter().map(|c| c.name.as_str()).collect();
    let department_code = members
        .iter()
        .map(|c| c.department_code.as_str())
        .find(|code| !code.is_empty())
        .unwrap_or_default()
        .to_string();

    Zone {
        zone_id,
        commune_count: members.len(),
        name: format_zone_name(&names),
        center_name,
        members: members.iter().map(|c| c.code.clone()).collect(),
        population: stats::sum(&column(|c| c.population)),
        households: stats::sum(&column(|c| c.households)),
        individual_houses: stats::sum(&column(|c| c.individual_houses)),
        latitude: stats::mean(&column(|c| c.latitude)),
        longitude: stats::mean(&column(|c| c.longitude)),
        pct_houses: stats::mean(&column(|c| c.pct_houses)),
        pct_primary_residences: stats::mean(&column(|c| c.pct_primary_residences)),
        median_income: stats::median(&column(|c| c.median_income)),
        median_living_standard: stats::median(&column(|c| c.median_living_standard)),
        poverty_rate: stats::mean(&column(|c| c.poverty_rate)),
        region: departments::region_name(&department_code).to_string(),
        department_code,
    }
}

/// Keeps zones meeting the zone criteria. A missing mean fails the check.
#[must_use]
pub fn apply_zone_criteria(zones: Vec<Zone>, criteria: &ZoneCriteria) -> Vec<Zone> {
    zones
        .into_iter()
        .filter(|z| {
            z.pct_houses >= criteria.min_pct_houses
                && z.pct_primary_residences >= criteria.min_pct_primary_residences
                && z.commune_count >= criteria.min_communes
        })
        .collect()
}
