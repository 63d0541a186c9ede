mod config;
mod logging;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use stockseed_core::ReferenceCatalog;
use stockseed_generate::{DatasetSummary, GenerationEngine, GenerationError};
use thiserror::Error;

use config::{Overrides, resolve_options};
use logging::{LogFormat, init_logging};

#[derive(Debug, Error)]
pub enum CliError {
    #[error("failed to read config {path}: {source}")]
    ConfigRead {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    ConfigDecode(#[from] toml::de::Error),
    #[error("generation error: {0}")]
    Generation(#[from] GenerationError),
    #[error("logging error: {0}")]
    Logging(String),
    #[error("dataset checks failed with {0} violation(s)")]
    ChecksFailed(usize),
}

#[derive(Parser, Debug)]
#[command(name = "stockseed", version, about = "Supplier/inventory sample data generator")]
struct Cli {
    /// Log line format on stderr.
    #[arg(long, value_enum, default_value_t = LogFormat::Pretty, global = true)]
    log_format: LogFormat,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write the SQL artifact (default).
    Generate(GenerateArgs),
    /// Generate in memory and report consistency check results.
    Check(GenerateArgs),
}

#[derive(Args, Debug, Default)]
struct GenerateArgs {
    /// TOML file with generation options.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
    /// Seed for the pseudo-random source.
    #[arg(long)]
    seed: Option<u64>,
    /// Output path for the SQL artifact.
    #[arg(long, value_name = "PATH")]
    out: Option<PathBuf>,
    /// Optional output path for the JSON generation report.
    #[arg(long, value_name = "PATH")]
    report: Option<PathBuf>,
    /// Fail on eligibility gaps and check violations.
    #[arg(long, default_value_t = false)]
    strict: bool,
}

impl GenerateArgs {
    fn overrides(&self) -> Overrides {
        Overrides {
            seed: self.seed,
            out: self.out.clone(),
            report: self.report.clone(),
            strict: self.strict,
        }
    }
}

fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    init_logging(cli.log_format)?;

    match cli.command {
        None => run_generate(GenerateArgs::default()),
        Some(Command::Generate(args)) => run_generate(args),
        Some(Command::Check(args)) => run_check(args),
    }
}

fn run_generate(args: GenerateArgs) -> Result<(), CliError> {
    let options = resolve_options(args.config.as_deref(), args.overrides())?;
    let engine = GenerationEngine::new(options);
    let result = engine.run(ReferenceCatalog::standard())?;

    if let Some(path) = &result.out_path {
        println!("{} written", path.display());
    }
    print_summary(&result.report.summary);
    if !result.report.violations.is_empty() {
        tracing::warn!(
            violations = result.report.violations.len(),
            "artifact written with check violations"
        );
    }
    Ok(())
}

fn run_check(args: GenerateArgs) -> Result<(), CliError> {
    let options = resolve_options(args.config.as_deref(), args.overrides())?;
    let engine = GenerationEngine::new(options);
    let result = engine.generate(ReferenceCatalog::standard())?;

    print_summary(&result.report.summary);
    for violation in &result.report.violations {
        println!(
            "violation {} at {}: {}",
            violation.code,
            violation.path.as_deref().unwrap_or("-"),
            violation.message
        );
    }
    if result.report.violations.is_empty() {
        println!("all checks passed");
        Ok(())
    } else {
        Err(CliError::ChecksFailed(result.report.violations.len()))
    }
}

fn print_summary(summary: &DatasetSummary) {
    println!("   Suppliers     : {}", summary.suppliers);
    println!("   Materials     : {}", summary.materials);
    println!("   Units         : {}", summary.units);
    println!("   Contracts     : {}", summary.contracts);
    println!("   Orders        : {}", summary.orders);
    println!(
        "   Movements     : {} ({} receipts + {} consumptions)",
        summary.movements, summary.receipts, summary.consumptions
    );
    println!(
        "   Unit inventory: {} records (calculated from movements)",
        summary.balances
    );
}
