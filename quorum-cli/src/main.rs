//! Quorum CLI — indicator snapshot and ensemble signal for a price series.
//!
//! Commands:
//! - `analyze` — indicators, per-profile predictions and the combined signal as JSON
//! - `indicators` — latest classified indicator values as a table
//! - `config` — print the default engine config as TOML

mod input;
mod logging;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

use quorum_core::classifier::Classifier;
use quorum_core::config::EngineConfig;
use quorum_core::indicators::latest_results;
use quorum_core::Analyzer;

#[derive(Parser)]
#[command(
    name = "quorum",
    about = "Quorum CLI — technical indicators and ensemble trading signals"
)]
struct Cli {
    /// Emit logs as JSON lines.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Log debug detail (overridden by RUST_LOG).
    #[arg(long, short, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run indicators and predictor profiles, then combine into one signal.
    Analyze {
        /// Series file: CSV with `date,price,volume` columns, or JSON.
        input: PathBuf,

        /// Ticker symbol. Defaults to the input file stem.
        #[arg(long)]
        ticker: Option<String>,

        /// Path to a TOML engine config.
        #[arg(long)]
        config: Option<PathBuf>,

        /// Override the master seed.
        #[arg(long)]
        seed: Option<u64>,

        /// Only run these profiles (repeatable), e.g. --profile fast_reacting.
        #[arg(long = "profile")]
        profiles: Vec<String>,

        /// Evaluate profiles one after another instead of in parallel.
        #[arg(long, default_value_t = false)]
        sequential: bool,

        /// Pretty-print the JSON output.
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Print the latest classified value of every configured indicator.
    Indicators {
        /// Series file: CSV with `date,price,volume` columns, or JSON.
        input: PathBuf,

        /// Path to a TOML engine config.
        #[arg(long)]
        config: Option<PathBuf>,
    },
    /// Print the default engine config as TOML.
    Config,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.json_logs, cli.verbose);

    match cli.command {
        Commands::Analyze {
            input,
            ticker,
            config,
            seed,
            profiles,
            sequential,
            pretty,
        } => run_analyze(AnalyzeArgs {
            input,
            ticker,
            config,
            seed,
            profiles,
            sequential,
            pretty,
        }),
        Commands::Indicators { input, config } => run_indicators(&input, config.as_deref()),
        Commands::Config => run_config(),
    }
}

struct AnalyzeArgs {
    input: PathBuf,
    ticker: Option<String>,
    config: Option<PathBuf>,
    seed: Option<u64>,
    profiles: Vec<String>,
    sequential: bool,
    pretty: bool,
}

fn load_config(path: Option<&Path>) -> Result<EngineConfig> {
    match path {
        Some(path) => EngineConfig::from_file(path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => Ok(EngineConfig::default()),
    }
}

fn run_analyze(args: AnalyzeArgs) -> Result<()> {
    let mut config = load_config(args.config.as_deref())?;
    if let Some(seed) = args.seed {
        config.master_seed = seed;
    }
    if args.sequential {
        config.parallel = false;
    }
    if !args.profiles.is_empty() {
        let known: Vec<&str> = config.profiles.iter().map(|p| p.name.as_str()).collect();
        if let Some(unknown) = args.profiles.iter().find(|p| !known.contains(&p.as_str())) {
            bail!("unknown profile '{unknown}'. Valid: {}", known.join(", "));
        }
        config.retain_profiles(&args.profiles);
    }

    let ticker = match args.ticker {
        Some(t) => t,
        None => ticker_from_path(&args.input)?,
    };
    let series = input::load_series(&args.input)?;
    tracing::info!(ticker = %ticker, bars = series.len(), "loaded series");

    let analyzer = Analyzer::new(config)?;
    let analysis = analyzer
        .analyze(&ticker, &series)
        .with_context(|| format!("Analysis failed for {ticker}"))?;

    let json = if args.pretty {
        serde_json::to_string_pretty(&analysis)?
    } else {
        serde_json::to_string(&analysis)?
    };
    println!("{json}");
    Ok(())
}

fn run_indicators(input: &Path, config_path: Option<&Path>) -> Result<()> {
    let config = load_config(config_path)?;
    let series = input::load_series(input)?;
    let classifier = Classifier::new(config.classifier);
    let results = latest_results(&series, &config.indicators, &classifier);

    if results.is_empty() {
        println!("No indicator is defined yet ({} bars).", series.len());
        return Ok(());
    }

    if let (Some(date), Some(price)) = (series.last_date(), series.last_price()) {
        println!("As of {date}, price {price:.2}");
        println!();
    }
    println!("{:<24} {:>14} {:>8}", "Indicator", "Value", "Action");
    println!("{}", "-".repeat(48));
    for r in &results {
        println!("{:<24} {:>14.4} {:>8}", r.name, r.value, r.action);
    }
    Ok(())
}

fn run_config() -> Result<()> {
    print!("{}", EngineConfig::default().to_toml()?);
    Ok(())
}

fn ticker_from_path(path: &Path) -> Result<String> {
    match path.file_stem().and_then(|s| s.to_str()) {
        Some(stem) if !stem.is_empty() => Ok(stem.to_uppercase()),
        _ => bail!("cannot derive a ticker from {}; pass --ticker", path.display()),
    }
}
