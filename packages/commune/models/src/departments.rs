//! French department and region utilities.
//!
//! Maps metropolitan department codes to the name of the administrative
//! region they belong to. Corsica ("2A"/"2B") and overseas departments are
//! not part of the mapping and resolve to [`UNKNOWN_REGION`].

/// Region name returned for department codes outside the mapping.
pub const UNKNOWN_REGION: &str = "Autre";

/// Metropolitan department codes covered by [`region_name`].
pub const DEPARTMENT_CODES: &[&str] = &[
    "01", "02", "03", "04", "05", "06", "07", "08", "09", "10", "11", "12", "13", "14", "15", "16",
    "17", "18", "19", "21", "22", "23", "24", "25", "26", "27", "28", "29", "30", "31", "32", "33",
    "34", "35", "36", "37", "38", "39", "40", "41", "42", "43", "44", "45", "46", "47", "48", "49",
    "50", "51", "52", "53", "54", "55", "56", "57", "58", "59", "60", "61", "62", "63", "64", "65",
    "66", "67", "68", "69", "70", "71", "72", "73", "74", "75", "76", "77", "78", "79", "80", "81",
    "82", "83", "84", "85", "86", "87", "88", "89", "90", "91", "92", "93", "94", "95",
];

/// Names of the mainland regions reachable through [`region_name`].
pub const REGIONS: &[&str] = &[
    "Auvergne-Rhône-Alpes",
    "Bourgogne-Franche-Comté",
    "Bretagne",
    "Centre-Val de Loire",
    "Grand Est",
    "Hauts-de-France",
    "Île-de-France",
    "Normandie",
    "Nouvelle-Aquitaine",
    "Occitanie",
    "Pays de la Loire",
    "Provence-Alpes-Côte d'Azur",
];

/// Left-pads a department code with zeros to two characters ("1" -> "01").
///
/// Codes that are already two characters or longer are returned trimmed
/// but otherwise unchanged.
#[must_use]
pub fn normalize_department_code(code: &str) -> String {
    let code = code.trim();
    format!("{code:0>2}")
}

/// Maps a department code to its region name.
///
/// Returns [`UNKNOWN_REGION`] for unrecognized codes.
#[must_use]
pub fn region_name(department_code: &str) -> &'static str {
    match normalize_department_code(department_code).as_str() {
        "01" | "03" | "07" | "15" | "26" | "38" | "42" | "43" | "63" | "69" | "73" | "74" => {
            "Auvergne-Rhône-Alpes"
        }
        "21" | "25" | "39" | "58" | "70" | "71" | "89" | "90" => "Bourgogne-Franche-Comté",
        "22" | "29" | "35" | "56" => "Bretagne",
        "18" | "28" | "36" | "37" | "41" | "45" => "Centre-Val de Loire",
        "08" | "10" | "51" | "52" | "54" | "55" | "57" | "67" | "68" | "88" => "Grand Est",
        "02" | "59" | "60" | "62" | "80" => "Hauts-de-France",
        "75" | "77" | "78" | "91" | "92" | "93" | "94" | "95" => "Île-de-France",
        "14" | "27" | "50" | "61" | "76" => "Normandie",
        "16" | "17" | "19" | "23" | "24" | "33" | "40" | "47" | "64" | "79" | "86" | "87" => {
            "Nouvelle-Aquitaine"
        }
        "09" | "11" | "12" | "30" | "31" | "32" | "34" | "46" | "48" | "65" | "66" | "81"
        | "82" => "Occitanie",
        "44" | "49" | "53" | "72" | "85" => "Pays de la Loire",
        "04" | "05" | "06" | "13" | "83" | "84" => "Provence-Alpes-Côte d'Azur",
        _ => UNKNOWN_REGION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn department_count() {
        assert_eq!(DEPARTMENT_CODES.len(), 94);
    }

    #[test]
    fn every_department_has_a_known_region() {
        for code in DEPARTMENT_CODES {
            let region = region_name(code);
            assert!(REGIONS.contains(&region), "no region for department {code}");
        }
    }

    #[test]
    fn every_region_is_reachable() {
        for region in REGIONS {
            assert!(
                DEPARTMENT_CODES.iter().any(|code| region_name(code) == *region),
                "region {region} has no department"
            );
        }
    }

    #[test]
    fn single_digit_codes_are_padded() {
        assert_eq!(normalize_department_code("1"), "01");
        assert_eq!(normalize_department_code(" 17 "), "17");
        assert_eq!(normalize_department_code("971"), "971");
        assert_eq!(region_name("1"), "Auvergne-Rhône-Alpes");
    }

    #[test]
    fn unknown_departments() {
        assert_eq!(region_name("2A"), UNKNOWN_REGION);
        assert_eq!(region_name("971"), UNKNOWN_REGION);
        assert_eq!(region_name(""), UNKNOWN_REGION);
    }
}
