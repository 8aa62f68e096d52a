//! Commune table loading from CSV.
//!
//! The file carries one header row using the INSEE-derived column names.
//! Empty numeric cells become `NaN` so that a commune with a missing
//! statistic is still loaded and simply fails the criteria that need it.

use std::io::Read;
use std::path::Path;

use franchise_zones_commune_models::departments::normalize_department_code;
use franchise_zones_commune_models::{Commune, clean_commune_name};
use serde::Deserialize;

/// One CSV row as written by the data preparation step.
#[derive(Debug, Deserialize)]
struct CommuneRow {
    code_commune: String,
    nom_commune: String,
    #[serde(default)]
    code_departement: Option<String>,
    population_totale: Option<f64>,
    nb_menages: Option<f64>,
    nb_maisons_individuelles: Option<f64>,
    pct_maisons: Option<f64>,
    pct_residences_principales: Option<f64>,
    revenu_median: Option<f64>,
    niveau_vie_median: Option<f64>,
    taux_pauvrete: Option<f64>,
    latitude: Option<f64>,
    longitude: Option<f64>,
}

impl From<CommuneRow> for Commune {
    fn from(row: CommuneRow) -> Self {
        let code = row.code_commune.trim().to_string();
        let department_code = match row.code_departement.as_deref().map(str::trim) {
            Some(dep) if !dep.is_empty() => normalize_department_code(dep),
            _ => code.chars().take(2).collect(),
        };
        let value = |v: Option<f64>| v.unwrap_or(f64::NAN);

        Self {
            name: clean_commune_name(&row.nom_commune),
            department_code,
            population: value(row.population_totale),
            households: value(row.nb_menages),
            individual_houses: value(row.nb_maisons_individuelles),
            pct_houses: value(row.pct_maisons),
            pct_primary_residences: value(row.pct_residences_principales),
            median_income: value(row.revenu_median),
            median_living_standard: value(row.niveau_vie_median),
            poverty_rate: value(row.taux_pauvrete),
            latitude: value(row.latitude),
            longitude: value(row.longitude),
            code,
        }
    }
}

/// Reads communes from CSV data.
///
/// # Errors
///
/// * If a row cannot be parsed (missing column, non-numeric value)
pub fn read_communes<R: Read>(reader: R) -> Result<Vec<Commune>, csv::Error> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    rdr.deserialize::<CommuneRow>()
        .map(|row| row.map(Commune::from))
        .collect()
}

/// Reads communes from a CSV file.
///
/// # Errors
///
/// * If the file cannot be opened
/// * If a row cannot be parsed
pub fn load_communes(path: &Path) -> Result<Vec<Commune>, csv::Error> {
    let file = std::fs::File::open(path)?;
    let communes = read_communes(std::io::BufReader::new(file))?;

    let located = communes.iter().filter(|c| c.has_location()).count();
    log::info!(
        "Loaded {} communes from {} ({} with coordinates)",
        communes.len(),
        path.display(),
        located
    );

    Ok(communes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "code_commune,nom_commune,code_departement,population_totale,nb_menages,\
nb_maisons_individuelles,pct_maisons,pct_residences_principales,revenu_median,\
niveau_vie_median,taux_pauvrete,latitude,longitude\n";

    #[test]
    fn reads_complete_rows() {
        let data = format!(
            "{HEADER}17300,LA ROCHELLE,17,77205,42000,9000,21.4,82.1,20500,19800,18.2,\
             46.1591,-1.1520\n"
        );
        let communes = read_communes(data.as_bytes()).unwrap();

        assert_eq!(communes.len(), 1);
        let c = &communes[0];
        assert_eq!(c.code, "17300");
        assert_eq!(c.name, "La Rochelle");
        assert_eq!(c.department_code, "17");
        assert!((c.population - 77_205.0).abs() < 1e-9);
        assert!((c.pct_houses - 21.4).abs() < 1e-9);
        assert!((c.longitude + 1.152).abs() < 1e-9);
        assert_eq!(c.region(), "Nouvelle-Aquitaine");
    }

    #[test]
    fn empty_cells_become_nan() {
        let data = format!("{HEADER}01001,L'Abergement-Clémenciat,01,800,320,,,,,,,,\n");
        let communes = read_communes(data.as_bytes()).unwrap();

        let c = &communes[0];
        assert!((c.households - 320.0).abs() < 1e-9);
        assert!(c.pct_houses.is_nan());
        assert!(c.median_income.is_nan());
        assert!(c.latitude.is_nan());
        assert!(!c.has_location());
    }

    #[test]
    fn department_falls_back_to_commune_code() {
        let data = format!(
            "{HEADER}86194,Poitiers,,88000,50000,8000,16.0,88.0,19000,18500,22.0,46.58,0.34\n"
        );
        let communes = read_communes(data.as_bytes()).unwrap();
        assert_eq!(communes[0].department_code, "86");
    }

    #[test]
    fn single_digit_departments_are_padded() {
        let data = format!(
            "{HEADER}1053,Bourg-en-Bresse,1,41000,20000,5000,25.0,89.0,20000,19000,15.0,46.2,5.22\n"
        );
        let communes = read_communes(data.as_bytes()).unwrap();
        assert_eq!(communes[0].department_code, "01");
        assert_eq!(communes[0].region(), "Auvergne-Rhône-Alpes");
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        let data = format!(
            "{HEADER}17300,La Rochelle,17,lots,42000,9000,21.4,82.1,20500,19800,18.2,46.1,-1.1\n"
        );
        assert!(read_communes(data.as_bytes()).is_err());
    }

    #[test]
    fn header_only_reads_nothing() {
        assert!(read_communes(HEADER.as_bytes()).unwrap().is_empty());
    }
}
