//! volbatch CLI
//!
//! Processes tickers into volatility skew reports from pre-fetched surface
//! files: one off (`single`), unattended (`batch`), plus a dividend yield
//! refresh (`fetch-divs`).

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use volbatch::prelude::*;

#[derive(Parser)]
#[command(name = "volbatch")]
#[command(about = "Volatility skew report generation from option-chain surfaces")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct RunOptions {
    /// Starting date for option trades (YYYY-MM-DD, default today)
    #[arg(long)]
    start_date: Option<NaiveDate>,

    /// Use per-ticker dividend yields instead of put-call parity
    #[arg(long)]
    divs: bool,

    /// Write one <TICKER>.json report per success
    #[arg(long)]
    save: bool,

    /// Directory holding <TICKER>_surface.json input files
    #[arg(long, default_value = "./data")]
    data_dir: PathBuf,

    /// Directory reports are written to
    #[arg(long, default_value = "./reports")]
    out_dir: PathBuf,

    /// Per-job timeout in seconds
    #[arg(long, default_value = "120")]
    timeout_secs: u64,

    /// Constant risk-free rate for discount inputs
    #[arg(long, default_value = "0.05")]
    rate: f64,

    /// Number of monthly tenors in the skew report
    #[arg(long, default_value = "12")]
    tenors: u32,

    /// Pause between batch jobs in seconds (rate limiting)
    #[arg(long)]
    pause_secs: Option<u64>,

    /// Ticker universe file (tickerMap.json); built-in set when omitted
    #[arg(long)]
    universe: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Process one ticker
    Single {
        /// Ticker symbol
        ticker: String,
        #[command(flatten)]
        options: RunOptions,
    },
    /// Process every ticker in the universe
    Batch {
        #[command(flatten)]
        options: RunOptions,
    },
    /// Refresh dividend yields for the universe and save it
    FetchDivs {
        /// Universe file to update
        #[arg(long, default_value = "tickerMap.json")]
        universe: PathBuf,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Command::Single { ticker, options } => run_tickers(Some(ticker), options),
        Command::Batch { options } => run_tickers(None, options),
        Command::FetchDivs { universe } => fetch_divs(universe),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn load_universe(path: &Option<PathBuf>) -> VolBatchResult<TickerUniverse> {
    match path {
        Some(path) => TickerUniverse::load(path),
        None => Ok(TickerUniverse::default_universe()),
    }
}

fn run_tickers(single: Option<String>, options: RunOptions) -> VolBatchResult<()> {
    let start_date = options
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());

    let universe = load_universe(&options.universe)?;
    let specs: Vec<TickerSpec> = match &single {
        Some(ticker) => {
            let div_yield = universe.get(ticker).map(|e| e.div_yield);
            vec![if options.divs {
                TickerSpec::with_dividend_yield(ticker, start_date, div_yield.unwrap_or(0.0))
            } else {
                TickerSpec::new(ticker, start_date)
            }]
        }
        None => universe.to_specs(start_date, options.divs),
    };

    let chains = Arc::new(JsonChainSource::new(&options.data_dir));
    let discounts = Arc::new(FlatDiscountSource::new(options.rate));

    let reshape = ReshapeConfig::with_bucket_count(options.tenors);
    let config = BatchConfig {
        per_job_timeout: Duration::from_secs(options.timeout_secs),
        pause_between_jobs: options.pause_secs.map(Duration::from_secs),
    };

    let store = if options.save {
        Some(ReportStore::new(&options.out_dir)?)
    } else {
        None
    };

    let outcome = process_batch(&specs, chains, discounts, reshape, config, store.as_ref())?;

    println!(
        "Processed {} tickers: {} succeeded, {} failed",
        outcome.len(),
        outcome.success_count(),
        outcome.failure_count()
    );
    for failure in outcome.failures() {
        println!("  {}", failure);
    }
    if options.save {
        println!("Reports written to {}", options.out_dir.display());
    }

    Ok(())
}

fn fetch_divs(path: PathBuf) -> VolBatchResult<()> {
    let mut universe = if path.exists() {
        TickerUniverse::load(&path)?
    } else {
        TickerUniverse::default_universe()
    };

    println!("Refreshing dividend yields for {} tickers...", universe.len());
    let client = DivYieldClient::new();
    client.update_universe(&mut universe)?;
    universe.save(&path)?;

    println!("Universe saved to {}", path.display());
    Ok(())
}
