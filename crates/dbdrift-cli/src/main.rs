mod exit_code;
mod options;
mod render;

use clap::{ArgAction, Parser};
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use dbdrift_catalog::{Connector, ConnectorRegistry};
use dbdrift_core::config::DEFAULT_CONFIG_FILE;
use dbdrift_core::{Config, DriftReport};
use dbdrift_engine::compute_drift;

use exit_code::{CliError, ExitCode};
use options::RunOptions;
use render::OutputFormat;

/// db-drift - Visualize the differences between two database states
#[derive(Parser, Debug)]
#[command(name = "db-drift")]
#[command(author, version, about, long_about = None)]
#[command(disable_version_flag = true)]
pub struct Cli {
    /// DBMS of both databases (default: sqlite)
    #[arg(long)]
    pub dbms: Option<String>,

    /// Connection string of the reference database
    #[arg(long, env = "DB_DRIFT_SOURCE")]
    pub source: String,

    /// Connection string of the database compared against the source
    #[arg(long, env = "DB_DRIFT_TARGET")]
    pub target: String,

    /// Report file (default: drift_report.html)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Report format (default: from the output extension)
    #[arg(long, value_enum)]
    pub format: Option<OutputFormat>,

    /// Path to config file (default: db-drift.toml)
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(long)]
    pub verbose: bool,

    /// Print version
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

#[tokio::main]
async fn main() {
    // A missing .env is not an error
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = tokio::select! {
        result = run(&cli) => result,
        _ = tokio::signal::ctrl_c() => Err(CliError::Interrupted),
    };

    let code = match result {
        Ok(()) => ExitCode::Success,
        Err(err) => {
            eprintln!("{} {:#}", "Error:".red().bold(), err);
            err.exit_code()
        }
    };

    std::process::exit(code.code());
}

/// Log to stderr; `RUST_LOG` wins over `--verbose`
fn init_tracing(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();
}

async fn run(cli: &Cli) -> Result<(), CliError> {
    let config = load_config(cli.config.as_deref())?;
    let registry = ConnectorRegistry::builtin();
    let options = RunOptions::resolve(cli, config, &registry)?;

    if cli.verbose {
        eprintln!("{} {}", "Using DBMS:".cyan(), options.dbms);
    }

    let source = registry.create(&options.dbms, &options.source)?;
    let target = registry.create(&options.dbms, &options.target)?;

    tracing::info!(dbms = %options.dbms, "fetching source and target schemas");
    let report = compare(source.as_ref(), target.as_ref(), &options).await?;

    render::write_report(&report, &options.output, options.format)?;

    print_drift_summary(&report);
    println!("{} {}", "Report saved to:".green(), options.output.display());

    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config, CliError> {
    match path {
        Some(path) => Ok(Config::from_file(path)?),
        None if Path::new(DEFAULT_CONFIG_FILE).exists() => Ok(Config::from_file(Path::new(DEFAULT_CONFIG_FILE))?),
        None => {
            tracing::debug!("No config file found, using defaults");
            Ok(Config::default())
        }
    }
}

/// Fetch both snapshots concurrently and diff them
///
/// The first failing fetch aborts the other one.
async fn compare(
    source: &dyn Connector,
    target: &dyn Connector,
    options: &RunOptions,
) -> Result<DriftReport, CliError> {
    let (source_snapshot, target_snapshot) =
        tokio::try_join!(source.fetch_schema_structure(), target.fetch_schema_structure())?;

    tracing::info!(
        source_objects = source_snapshot.object_count(),
        target_objects = target_snapshot.object_count(),
        "computing drift"
    );

    let source_snapshot = source_snapshot.filtered(&options.filter);
    let target_snapshot = target_snapshot.filtered(&options.filter);

    Ok(compute_drift(&source_snapshot, &target_snapshot).stamped_now())
}

/// Print drift summary
fn print_drift_summary(report: &DriftReport) {
    println!("\n{}", "=".repeat(60).bright_blue());
    println!("{}", "Schema Drift Report".bold().bright_blue());
    println!("{}", "=".repeat(60).bright_blue());
    println!();

    for (category, drift) in &report.categories {
        let summary = &drift.summary;
        let line = format!(
            "  {:<20} +{} -{} ~{} ={}",
            category.title(),
            summary.added_count,
            summary.removed_count,
            summary.modified_count,
            summary.unchanged_count
        );
        if drift.has_drift() {
            println!("{}", line.yellow());
        } else {
            println!("{}", line);
        }
    }

    println!();
    println!("{}", "Summary:".bold());
    println!("  Added:     {}", report.summary.added_count.to_string().green());
    println!("  Removed:   {}", report.summary.removed_count.to_string().red());
    println!("  Modified:  {}", report.summary.modified_count.to_string().yellow());
    println!("  Unchanged: {}", report.summary.unchanged_count);
    println!();

    if report.has_drift() {
        println!(
            "{}",
            format!("⚠ Drift detected in {} objects", report.summary.drift_count())
                .yellow()
                .bold()
        );
    } else {
        println!("{}", "✓ No drift detected!".green().bold());
    }

    println!("{}", "=".repeat(60).bright_blue());
}
