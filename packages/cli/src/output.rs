//! Table and JSON rendering of analysis results.

use franchise_zones_zones::{RegionalStats, ScoredZone};
use serde::Serialize;

/// Formats a number with French-style space thousand separators.
///
/// `NaN` renders as `N/A`.
#[must_use]
pub fn format_number(value: f64, decimals: usize) -> String {
    if value.is_nan() {
        return "N/A".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "∞" } else { "-∞" }.to_string();
    }

    let formatted = format!("{:.*}", decimals, value.abs());
    let (integer, fraction) = formatted
        .split_once('.')
        .map_or((formatted.as_str(), None), |(i, f)| (i, Some(f)));

    let mut grouped = String::with_capacity(formatted.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(' ');
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push('.');
        grouped.push_str(fraction);
    }

    let is_zero = formatted.chars().all(|c| c == '0' || c == '.');
    if value.is_sign_negative() && !is_zero {
        format!("-{grouped}")
    } else {
        grouped
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}

pub fn print_zone_table(zones: &[ScoredZone]) {
    println!(
        "{:>4}  {:>5}  {:<40}  {:<24}  {:>7}  {:>7}  {:>7}  {:>7}  {:>10}  {:>8}",
        "Rank", "Zone", "Communes", "Region", "Total", "Housing", "Income", "Market", "Households",
        "Clients"
    );
    for z in zones {
        println!(
            "{:>4}  {:>5}  {:<40}  {:<24}  {:>7}  {:>7}  {:>7}  {:>7}  {:>10}  {:>8}",
            z.rank,
            z.zone.zone_id,
            truncate(&z.zone.name, 40),
            truncate(&z.zone.region, 24),
            format_number(z.score_total, 1),
            format_number(z.score_housing, 1),
            format_number(z.score_income, 1),
            format_number(z.score_market_size, 1),
            format_number(z.zone.households, 0),
            format_number(z.potential_clients, 0),
        );
    }
}

pub fn print_zone_details(zone: &ScoredZone, income_percentile: f64) {
    let z = &zone.zone;
    println!("Zone {} (rank {})", z.zone_id, zone.rank);
    println!("  Center:              {}", z.center_name);
    println!("  Region:              {} ({})", z.region, z.department_code);
    println!("  Communes:            {}", z.commune_count);
    println!("  Population:          {}", format_number(z.population, 0));
    println!("  Households:          {}", format_number(z.households, 0));
    println!("  Individual houses:   {}", format_number(z.individual_houses, 0));
    println!("  Houses:              {} %", format_number(z.pct_houses, 1));
    println!("  Primary residences:  {} %", format_number(z.pct_primary_residences, 1));
    println!(
        "  Median income:       {} EUR (percentile {})",
        format_number(z.median_income, 0),
        format_number(income_percentile, 0)
    );
    println!("  Living standard:     {} EUR", format_number(z.median_living_standard, 0));
    println!("  Poverty rate:        {} %", format_number(z.poverty_rate, 1));
    println!(
        "  Scores:              total {} | housing {} | income {} | market {}",
        format_number(zone.score_total, 1),
        format_number(zone.score_housing, 1),
        format_number(zone.score_income, 1),
        format_number(zone.score_market_size, 1)
    );
    println!("  Potential clients:   {}", format_number(zone.potential_clients, 0));
    println!("  Members:             {}", z.members.join(", "));
}

pub fn print_regional_table(stats: &[RegionalStats]) {
    println!(
        "{:<28}  {:>5}  {:>7}  {:>7}  {:>7}  {:>7}  {:>10}  {:>9}",
        "Region", "Zones", "Total", "Housing", "Income", "Market", "Households", "Clients"
    );
    for s in stats {
        println!(
            "{:<28}  {:>5}  {:>7}  {:>7}  {:>7}  {:>7}  {:>10}  {:>9}",
            truncate(&s.region, 28),
            s.zone_count,
            format_number(s.mean_score_total, 1),
            format_number(s.mean_score_housing, 1),
            format_number(s.mean_score_income, 1),
            format_number(s.mean_score_market_size, 1),
            format_number(s.households, 0),
            format_number(s.potential_clients, 0),
        );
    }
}

/// Writes `value` to stdout as pretty-printed JSON.
///
/// # Errors
///
/// * If serialization fails
pub fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), serde_json::Error> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn groups_thousands_with_spaces() {
        assert_eq!(format_number(1_234_567.0, 0), "1 234 567");
        assert_eq!(format_number(999.0, 0), "999");
        assert_eq!(format_number(1_000.0, 0), "1 000");
        assert_eq!(format_number(12_345.678, 2), "12 345.68");
    }

    #[test]
    fn formats_negative_and_small_values() {
        assert_eq!(format_number(-1_500.0, 0), "-1 500");
        assert_eq!(format_number(0.0, 1), "0.0");
        assert_eq!(format_number(-0.01, 1), "0.0");
        assert_eq!(format_number(42.26, 1), "42.3");
    }

    #[test]
    fn nan_is_not_available() {
        assert_eq!(format_number(f64::NAN, 2), "N/A");
    }

    #[test]
    fn truncates_long_names() {
        assert_eq!(truncate("Niort", 10), "Niort");
        assert_eq!(truncate("Saint-Jean-d'Angély", 6), "Saint…");
    }
}
