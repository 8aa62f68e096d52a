#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Commune (municipality) records.
//!
//! A [`Commune`] is the smallest geographic unit the zone analysis works
//! with. Records are produced by an external loader and treated as
//! read-only by every consumer. Numeric fields are `f64` so that missing
//! statistics can be carried as `NaN` instead of failing the load.

pub mod departments;

use serde::{Deserialize, Serialize};

/// A single French commune with its housing, income and location statistics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Commune {
    /// INSEE commune code (e.g. "17300").
    pub code: String,
    /// Commune name.
    pub name: String,
    /// Department code (e.g. "17", "2A").
    pub department_code: String,
    /// Total population.
    pub population: f64,
    /// Number of households.
    pub households: f64,
    /// Number of individual houses.
    pub individual_houses: f64,
    /// Share of dwellings that are individual houses (0-100).
    pub pct_houses: f64,
    /// Share of dwellings that are primary residences (0-100).
    pub pct_primary_residences: f64,
    /// Median disposable income in euros.
    pub median_income: f64,
    /// Median standard of living ("niveau de vie") in euros.
    pub median_living_standard: f64,
    /// Poverty rate (0-100).
    pub poverty_rate: f64,
    /// Latitude in degrees.
    pub latitude: f64,
    /// Longitude in degrees.
    pub longitude: f64,
}

impl Commune {
    /// Region name derived from the department code.
    #[must_use]
    pub fn region(&self) -> &'static str {
        departments::region_name(&self.department_code)
    }

    /// Whether both coordinates are usable for distance computations.
    #[must_use]
    pub const fn has_location(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Trims a raw commune name and converts it to title case.
///
/// Word boundaries follow the usual French separators (space, hyphen and
/// apostrophe), so `"saint-jean-d'angely"` becomes `"Saint-Jean-D'Angely"`.
#[must_use]
pub fn clean_commune_name(raw: &str) -> String {
    let mut cleaned = String::with_capacity(raw.len());
    let mut at_word_start = true;

    for ch in raw.trim().chars() {
        if ch.is_alphabetic() {
            if at_word_start {
                cleaned.extend(ch.to_uppercase());
            } else {
                cleaned.extend(ch.to_lowercase());
            }
            at_word_start = false;
        } else {
            cleaned.push(ch);
            at_word_start = true;
        }
    }

    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Commune {
        Commune {
            code: "17200".to_string(),
            name: "Lagord".to_string(),
            department_code: "17".to_string(),
            population: 7_000.0,
            households: 3_100.0,
            individual_houses: 2_400.0,
            pct_houses: 77.0,
            pct_primary_residences: 92.0,
            median_income: 26_500.0,
            median_living_standard: 24_000.0,
            poverty_rate: 8.0,
            latitude: 46.19,
            longitude: -1.15,
        }
    }

    #[test]
    fn region_follows_department() {
        assert_eq!(sample().region(), "Nouvelle-Aquitaine");
    }

    #[test]
    fn nan_coordinates_have_no_location() {
        let mut commune = sample();
        assert!(commune.has_location());
        commune.latitude = f64::NAN;
        assert!(!commune.has_location());
    }

    #[test]
    fn clean_name_trims_and_title_cases() {
        assert_eq!(clean_commune_name("  LA ROCHELLE "), "La Rochelle");
        assert_eq!(clean_commune_name("saint-xandre"), "Saint-Xandre");
        assert_eq!(clean_commune_name("l'houmeau"), "L'Houmeau");
        assert_eq!(clean_commune_name(""), "");
    }
}
