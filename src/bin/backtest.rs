use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use index_backtest::config::{BacktestRequest, RebalanceSchedule};
use index_backtest::domain::Symbol;
use index_backtest::feed::{
    price_change_series, volatility_series, HistoricalSeries, SeriesBuilder, TokenHistory,
    DEFAULT_TWAP_WINDOW, DEFAULT_VOLATILITY_WINDOW,
};
use index_backtest::simulation::{run_request, weight_schedule};

#[derive(Parser)]
#[command(author, version, about = "Weighted-pool index fund back-tester")]
struct Cli {
    /// Pretty-print JSON output
    #[arg(long)]
    pretty: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Align raw token histories into a price series snapshot
    Series {
        /// JSON array of token histories
        histories: PathBuf,
        /// Moving-average window in hourly points
        #[arg(long, default_value_t = DEFAULT_TWAP_WINDOW)]
        twap_window: usize,
    },
    /// Run a back-test request against a series snapshot
    Run {
        /// Series snapshot
        series: PathBuf,
        /// Back-test request
        request: PathBuf,
    },
    /// Print the target-weight history of an index
    Weights {
        /// Series snapshot
        series: PathBuf,
        /// Basket size
        #[arg(long, default_value_t = 10)]
        size: usize,
        /// Seconds between rebalances
        #[arg(long, default_value_t = 604_800)]
        reweigh_delay: u64,
        /// Every n-th rebalance is a reindex
        #[arg(long, default_value_t = 4)]
        reindex_every: u64,
        /// Token universe; every series token when empty
        #[arg(long, value_delimiter = ',')]
        tokens: Vec<String>,
    },
    /// Print the rolling price volatility of each token
    Volatility {
        /// Series snapshot
        series: PathBuf,
        /// Look-back in hourly steps
        #[arg(long, default_value_t = DEFAULT_VOLATILITY_WINDOW)]
        window: usize,
        /// Tokens to report; every series token when empty
        #[arg(long, value_delimiter = ',')]
        tokens: Vec<String>,
    },
    /// Print each token's percent price change since the first step
    Changes {
        /// Series snapshot
        series: PathBuf,
        /// Tokens to report; every series token when empty
        #[arg(long, value_delimiter = ',')]
        tokens: Vec<String>,
    },
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let raw = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&raw).with_context(|| format!("parsing {}", path.display()))
}

fn load_series(path: &Path) -> Result<HistoricalSeries> {
    let series: HistoricalSeries = read_json(path)?;
    series
        .validate()
        .with_context(|| format!("validating {}", path.display()))?;
    Ok(series)
}

fn select(series: &HistoricalSeries, tokens: Vec<String>) -> Vec<Symbol> {
    if tokens.is_empty() {
        series.symbols()
    } else {
        tokens.into_iter().map(Symbol::from).collect()
    }
}

fn print_json<T: Serialize>(value: &T, pretty: bool) -> Result<()> {
    let out = if pretty {
        serde_json::to_string_pretty(value)?
    } else {
        serde_json::to_string(value)?
    };
    println!("{out}");
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("index_backtest=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.cmd {
        Command::Series {
            histories,
            twap_window,
        } => {
            let histories: Vec<TokenHistory> = read_json(&histories)?;
            let series = SeriesBuilder::new()
                .twap_window(twap_window)
                .tokens(histories)
                .build()
                .context("building price series")?;
            print_json(&series, cli.pretty)
        }
        Command::Run { series, request } => {
            let series = load_series(&series)?;
            let request: BacktestRequest = read_json(&request)?;
            let reports = run_request(&series, &request).context("running back-test")?;
            info!(reports = reports.len(), "back-test complete");
            print_json(&reports, cli.pretty)
        }
        Command::Weights {
            series,
            size,
            reweigh_delay,
            reindex_every,
            tokens,
        } => {
            let series = load_series(&series)?;
            let universe = select(&series, tokens);
            let cadence = RebalanceSchedule {
                reweigh_delay,
                reindex_every,
                ..RebalanceSchedule::default()
            };
            let schedule = weight_schedule(&series, &universe, size, &cadence)
                .context("computing weight schedule")?;
            print_json(&schedule, cli.pretty)
        }
        Command::Volatility {
            series,
            window,
            tokens,
        } => {
            let series = load_series(&series)?;
            let tokens = select(&series, tokens);
            let volatility =
                volatility_series(&series, &tokens, window).context("computing volatility")?;
            print_json(&volatility, cli.pretty)
        }
        Command::Changes { series, tokens } => {
            let series = load_series(&series)?;
            let tokens = select(&series, tokens);
            let changes =
                price_change_series(&series, &tokens).context("computing price changes")?;
            print_json(&changes, cli.pretty)
        }
    }
}
