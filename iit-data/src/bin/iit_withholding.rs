use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use iit_core::{AnnualConfiguration, WithholdingEngine, WithholdingRules};
use iit_data::calendar::DEFAULT_YEAR_OPTIONS;
use iit_data::{BracketTableLoader, config_loader, current_year, report, year_options};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Cumulative monthly withholding calculator for salary income.
///
/// Computes the twelve monthly withholdings for one year, either from a TOML
/// configuration file or from a flat salary given on the command line.
#[derive(Debug, Parser)]
#[command(name = "iit-withholding", version, about, long_about = None)]
struct Cli {
    /// Annual configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Rate table (CSV). The statutory comprehensive-income table is used
    /// when omitted.
    #[arg(short, long)]
    brackets: Option<PathBuf>,

    /// Monthly basic deduction, overriding the configuration file.
    #[arg(long)]
    threshold: Option<Decimal>,

    /// Output format.
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Hide every amount in table output.
    #[arg(long, default_value_t = false)]
    mask: bool,

    /// Year to compute when no configuration file is given.
    #[arg(long)]
    year: Option<i32>,

    /// Monthly gross salary when no configuration file is given.
    #[arg(long, required_unless_present = "config")]
    salary: Option<Decimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Csv,
}

// ─── tracing ─────────────────────────────────────────────────────────────────

/// Initialise the tracing subscriber.
///
/// * Honours `RUST_LOG` when set.
/// * Falls back to `info`.
/// * Logs go to stderr so report output can be piped.
fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::from("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .without_time()
        .with_target(false)
        .init();
}

// ─── inputs ──────────────────────────────────────────────────────────────────

fn load_inputs(cli: &Cli) -> Result<(AnnualConfiguration, Option<Decimal>)> {
    match &cli.config {
        Some(path) => {
            let loaded = config_loader::load_from_file(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))?;
            Ok((loaded.configuration, loaded.monthly_threshold))
        }
        None => {
            let salary = cli
                .salary
                .context("--salary is required without --config")?;
            let current = current_year();
            let year = cli.year.unwrap_or(current);
            if !year_options(current, DEFAULT_YEAR_OPTIONS).contains(&year) {
                warn!(year, current, "year is outside the recent years offered");
            }
            let configuration =
                AnnualConfiguration::uniform(year, salary, Default::default(), Default::default());
            configuration.validate().context("Invalid --salary")?;
            Ok((configuration, None))
        }
    }
}

fn build_rules(
    brackets: Option<&PathBuf>,
    threshold: Option<Decimal>,
) -> Result<WithholdingRules> {
    let preset = WithholdingRules::comprehensive_income();

    match brackets {
        Some(path) => {
            let threshold = threshold.unwrap_or(preset.monthly_threshold());
            BracketTableLoader::load_from_file(path, threshold)
                .with_context(|| format!("Failed to load rate table: {}", path.display()))
        }
        None => match threshold {
            Some(threshold) => preset
                .with_monthly_threshold(threshold)
                .context("Invalid monthly threshold"),
            None => Ok(preset),
        },
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    init_tracing();

    let cli = Cli::parse();

    let (configuration, file_threshold) = load_inputs(&cli)?;
    let engine = WithholdingEngine::new(build_rules(
        cli.brackets.as_ref(),
        cli.threshold.or(file_threshold),
    )?);
    debug!(
        threshold = %engine.rules().monthly_threshold(),
        brackets = engine.rules().brackets().len(),
        "rules ready"
    );

    let summary = engine.compute_annual_summary(&configuration);
    info!(
        year = summary.year,
        total_tax = %summary.total_tax,
        total_withheld = %summary.total_withheld,
        "computed annual withholding"
    );

    match cli.format {
        OutputFormat::Table => print!("{}", report::render_table(&summary, cli.mask)),
        OutputFormat::Csv => {
            report::write_csv(&summary, io::stdout().lock()).context("Failed to write CSV")?;
        }
    }

    Ok(())
}
