#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line front end for franchise zone analysis.
//!
//! Loads a commune table from CSV, forms zones around population centers
//! and prints ranked zones, a single zone's details, or regional averages.
//!
//! Log output goes through `indicatif-log-bridge` (via
//! [`franchise_zones_cli_utils::init_logger`]) so it never interleaves with
//! the assignment progress bar. Set `RUST_LOG=info` to see pipeline steps.

mod loader;
mod output;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use franchise_zones_cli_utils::{IndicatifProgress, MultiProgress};
use franchise_zones_zones::analytics::{
    filter_zones, regional_stats, top_zones, unknown_filter_values, zone_details,
};
use franchise_zones_zones::stats::percentile_rank;
use franchise_zones_zones::{AnalysisConfig, ScoredZone, ScoringWeights, ZoneAnalyzer, ZoneFilter};
use serde::Serialize;

#[derive(Parser)]
#[command(name = "franchise_zones", about = "Franchise zone formation and scoring")]
struct Cli {
    /// TOML file overriding the built-in analysis parameters
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Form, score and rank zones
    Analyze {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        weights: WeightArgs,
        /// Keep zones in these regions (repeatable)
        #[arg(long = "region")]
        regions: Vec<String>,
        /// Keep zones in these departments (repeatable)
        #[arg(long = "department")]
        departments: Vec<String>,
        /// Keep zones whose name or center name contains this text
        #[arg(long)]
        city: Option<String>,
        /// Number of zones to show
        #[arg(long, default_value_t = 20)]
        top: usize,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Show the details of one zone
    Zone {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        weights: WeightArgs,
        /// Zone identifier as printed by `analyze`
        #[arg(long)]
        id: usize,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
    /// Average scores per region
    Regions {
        #[command(flatten)]
        data: DataArgs,
        #[command(flatten)]
        weights: WeightArgs,
        #[arg(long, value_enum, default_value_t = Format::Table)]
        format: Format,
    },
}

#[derive(Args)]
struct DataArgs {
    /// Commune table (CSV with a header row)
    #[arg(long)]
    communes: PathBuf,
    /// Maximum distance from a zone center, in kilometers
    #[arg(long)]
    radius: Option<f64>,
}

#[derive(Args)]
struct WeightArgs {
    /// Weight of the housing score
    #[arg(long)]
    housing: Option<f64>,
    /// Weight of the income score
    #[arg(long)]
    income: Option<f64>,
    /// Weight of the market size score
    #[arg(long)]
    market: Option<f64>,
}

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    Table,
    Json,
}

#[derive(Serialize)]
struct ZoneReport<'a> {
    #[serde(flatten)]
    zone: &'a ScoredZone,
    income_percentile: f64,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = franchise_zones_cli_utils::init_logger();
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => AnalysisConfig::load(path)?,
        None => AnalysisConfig::default(),
    };

    match cli.command {
        Commands::Analyze {
            data,
            weights,
            regions,
            departments,
            city,
            top,
            format,
        } => {
            let (_, scored) = run_analysis(&multi, config, &data, &weights)?;
            let filter = ZoneFilter {
                regions,
                departments,
                city,
            };
            for value in unknown_filter_values(&filter) {
                log::warn!("Unknown region or department '{value}' matches no zone");
            }
            let scored = if filter.is_empty() {
                scored
            } else {
                let kept = filter_zones(&scored, &filter);
                log::info!("{} of {} zones match the filter", kept.len(), scored.len());
                kept
            };

            let shown = top_zones(&scored, top);
            match format {
                Format::Table if shown.is_empty() => println!("No zone found."),
                Format::Table => output::print_zone_table(shown),
                Format::Json => output::print_json(shown)?,
            }
        }
        Commands::Zone {
            data,
            weights,
            id,
            format,
        } => {
            let (analyzer, scored) = run_analysis(&multi, config, &data, &weights)?;
            let zone = zone_details(&scored, id).ok_or_else(|| format!("No zone with id {id}"))?;

            let incomes: Vec<f64> = analyzer.communes().iter().map(|c| c.median_income).collect();
            let income_percentile = percentile_rank(zone.zone.median_income, &incomes);

            match format {
                Format::Table => output::print_zone_details(zone, income_percentile),
                Format::Json => output::print_json(&ZoneReport {
                    zone,
                    income_percentile,
                })?,
            }
        }
        Commands::Regions {
            data,
            weights,
            format,
        } => {
            let (_, scored) = run_analysis(&multi, config, &data, &weights)?;
            let stats = regional_stats(&scored);
            match format {
                Format::Table if stats.is_empty() => println!("No zone found."),
                Format::Table => output::print_regional_table(&stats),
                Format::Json => output::print_json(&stats)?,
            }
        }
    }

    Ok(())
}

/// Loads communes, forms zones and scores them.
fn run_analysis(
    multi: &MultiProgress,
    config: AnalysisConfig,
    data: &DataArgs,
    weights: &WeightArgs,
) -> Result<(ZoneAnalyzer, Vec<ScoredZone>), Box<dyn std::error::Error>> {
    let spinner = IndicatifProgress::loading_spinner(multi, "Loading communes");
    let communes = loader::load_communes(&data.communes);
    spinner.finish_and_clear();
    let communes = communes?;

    let radius = data.radius.unwrap_or(config.default_radius_km);
    if radius.is_nan() || radius <= 0.0 {
        return Err(format!("Radius must be a positive number of kilometers, got {radius}").into());
    }
    let weights = resolve_weights(weights, &config.scoring.default_weights);

    let progress = IndicatifProgress::communes_bar(multi, "Assigning communes");
    let analyzer = ZoneAnalyzer::new(communes, config).with_progress(progress);
    let baseline = analyzer.baseline();
    log::info!(
        "National medians: income {} EUR, houses {} %",
        output::format_number(baseline.median_income, 0),
        output::format_number(baseline.median_pct_houses, 1)
    );

    let zones = analyzer.create_zones(radius);
    let scored = analyzer.calculate_scores(&zones, &weights);
    log::info!("Scored {} zones within {radius} km", scored.len());

    Ok((analyzer, scored))
}

/// Fills unset weights from `defaults`. Weights are used as given, even
/// when they do not sum to 1.
fn resolve_weights(args: &WeightArgs, defaults: &ScoringWeights) -> ScoringWeights {
    let weights = ScoringWeights::new(
        args.housing.unwrap_or(defaults.housing),
        args.income.unwrap_or(defaults.income),
        args.market.unwrap_or(defaults.market),
    );
    if !weights.is_normalized() {
        log::warn!(
            "Scoring weights sum to {:.3}, not 1; composite scores will not span 0-100",
            weights.total()
        );
    }
    weights
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_weights_use_defaults() {
        let args = WeightArgs {
            housing: Some(0.5),
            income: None,
            market: None,
        };
        let weights = resolve_weights(&args, &ScoringWeights::new(0.4, 0.3, 0.3));
        assert!((weights.housing - 0.5).abs() < 1e-12);
        assert!((weights.income - 0.3).abs() < 1e-12);
        assert!((weights.market - 0.3).abs() < 1e-12);
    }

    #[test]
    fn parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "franchise_zones",
            "--config",
            "zones.toml",
            "analyze",
            "--communes",
            "communes.csv",
            "--radius",
            "20",
            "--region",
            "Bretagne",
            "--region",
            "Normandie",
            "--department",
            "17",
            "--top",
            "5",
            "--format",
            "json",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("zones.toml")));
        match cli.command {
            Commands::Analyze {
                data,
                regions,
                departments,
                top,
                format,
                ..
            } => {
                assert_eq!(data.communes, PathBuf::from("communes.csv"));
                assert_eq!(data.radius, Some(20.0));
                assert_eq!(regions, vec!["Bretagne", "Normandie"]);
                assert_eq!(departments, vec!["17"]);
                assert_eq!(top, 5);
                assert!(matches!(format, Format::Json));
            }
            _ => panic!("expected analyze"),
        }
    }

    #[test]
    fn zone_requires_an_id() {
        assert!(Cli::try_parse_from(["franchise_zones", "zone", "--communes", "c.csv"]).is_err());
    }
}
