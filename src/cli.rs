//! CLI definition and dispatch.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use crate::adapters::csv_adapter::CsvAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::domain::backtest::{self as backtest_engine, BacktestResult, SplitResult};
use crate::domain::batch::{run_universe, PairOutcome};
use crate::domain::config_validation::{
    load_run_config, validate_backtest_config, validate_strategy_config, RunConfig,
};
use crate::domain::error::BacktestError;
use crate::domain::simulator::ExecutionModel;
use crate::ports::data_port::DataPort;
use crate::ports::report_port::ReportPort;

#[derive(Parser, Debug)]
#[command(name = "fxbacktest", about = "Technical-analysis backtester for currency pairs")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Backtest one pair
    Backtest {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(short, long)]
        pair: String,
        /// Write the labeled trade list to this CSV file
        #[arg(long)]
        trades: Option<PathBuf>,
        /// Write the full simulated series to this CSV file
        #[arg(long)]
        series: Option<PathBuf>,
    },
    /// Backtest every configured pair
    Batch {
        #[arg(short, long)]
        config: PathBuf,
        #[arg(long)]
        trades: Option<PathBuf>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// List pairs that have price data
    ListPairs {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Backtest {
            config,
            pair,
            trades,
            series,
        } => run_backtest(&config, &pair, trades.as_deref(), series.as_deref()),
        Command::Batch { config, trades } => run_batch(&config, trades.as_deref()),
        Command::Validate { config } => run_validate(&config),
        Command::ListPairs { config } => run_list_pairs(&config),
    }
}

fn fail(err: &BacktestError) -> ExitCode {
    eprintln!("error: {err}");
    err.into()
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| fail(&e))
}

/// Load, validate and resolve a config file.
pub fn load_run(path: &Path) -> Result<RunConfig, ExitCode> {
    eprintln!("Loading config from {}", path.display());
    let adapter = load_config(path)?;
    load_run_config(&adapter).map_err(|e| fail(&e))
}

fn run_backtest(
    config_path: &Path,
    pair: &str,
    trades_path: Option<&Path>,
    series_path: Option<&Path>,
) -> ExitCode {
    let run_config = match load_run(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = CsvAdapter::new(run_config.data_dir.clone());
    run_backtest_pipeline(
        &data_port,
        &CsvReportAdapter,
        &run_config,
        &pair.to_uppercase(),
        trades_path,
        series_path,
    )
}

pub fn run_backtest_pipeline(
    data_port: &dyn DataPort,
    report_port: &dyn ReportPort,
    run_config: &RunConfig,
    pair: &str,
    trades_path: Option<&Path>,
    series_path: Option<&Path>,
) -> ExitCode {
    let bars = match data_port.fetch_prices(pair, run_config.start_date, run_config.end_date) {
        Ok(b) => b,
        Err(e) => return fail(&e),
    };
    eprintln!(
        "Running {} on {}: {} bars",
        run_config.strategy,
        pair,
        bars.len()
    );

    let bt_config = run_config.backtest_for(pair);
    let result = match backtest_engine::run_backtest(pair, &bars, &bt_config) {
        Ok(r) => r,
        Err(e) => return fail(&e),
    };

    print_result(&result, &run_config.execution);

    if let Some(path) = trades_path {
        if let Err(e) = report_port.write_trades(&[&result], &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("\nTrades written to: {}", path.display());
    }
    if let Some(path) = series_path {
        if let Err(e) = report_port.write_series(&result, &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("Series written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn run_batch(config_path: &Path, trades_path: Option<&Path>) -> ExitCode {
    let run_config = match load_run(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let data_port = CsvAdapter::new(run_config.data_dir.clone());
    run_batch_pipeline(&data_port, &CsvReportAdapter, &run_config, trades_path)
}

/// Runs every configured pair. Succeeds when at least one pair completes;
/// failed pairs are reported as warnings.
pub fn run_batch_pipeline(
    data_port: &(dyn DataPort + Sync),
    report_port: &dyn ReportPort,
    run_config: &RunConfig,
    trades_path: Option<&Path>,
) -> ExitCode {
    eprintln!(
        "Running {} on {} pairs",
        run_config.strategy,
        run_config.universe.count()
    );

    let outcomes = run_universe(
        data_port,
        &run_config.universe.pairs,
        run_config.start_date,
        run_config.end_date,
        |pair| run_config.backtest_for(pair),
    );

    print_batch_summary(&outcomes);

    let completed: Vec<&BacktestResult> = outcomes
        .iter()
        .filter_map(|o| o.result.as_ref().ok())
        .collect();

    if completed.is_empty() {
        eprintln!("error: no pair completed");
        return match outcomes.first().map(|o| &o.result) {
            Some(Err(e)) => e.into(),
            _ => ExitCode::from(5),
        };
    }

    if let Some(path) = trades_path {
        if let Err(e) = report_port.write_trades(&completed, &path.to_string_lossy()) {
            return fail(&e);
        }
        eprintln!("\nTrades written to: {}", path.display());
    }

    ExitCode::SUCCESS
}

fn print_result(result: &BacktestResult, execution: &ExecutionModel) {
    let model = match execution {
        ExecutionModel::Percentage => "percentage".to_string(),
        ExecutionModel::Account {
            lot_size,
            conversion_rate,
        } => format!("account (lot {}, conversion {})", lot_size, conversion_rate),
    };
    eprintln!("  Execution: {}", model);
    eprintln!("  Warmup:    {} bars", result.frame.warmup_end());
    print_split(&result.train);
    print_split(&result.test);
}

fn print_split(split: &SplitResult) {
    let m = &split.metrics;
    eprintln!("\n=== {} ({} bars) ===", split.label, split.bar_count);
    eprintln!("Total Return:     {:.2}%", m.total_return_pct);
    eprintln!("Market Return:    {:.2}%", m.market_return_pct);
    eprintln!("Final Balance:    {:.2}", m.final_balance);
    eprintln!("Sharpe Ratio:     {:.2}", m.sharpe_ratio);
    eprintln!("Max Drawdown:     {:.2}%", m.max_drawdown_pct);
    eprintln!("Win Rate:         {:.1}%", m.win_rate_pct);
    eprintln!(
        "Trades:           {} ({} won, {} lost)",
        m.number_of_trades, m.trades_won, m.trades_lost
    );
    eprintln!("Profit Factor:    {:.2}", m.profit_factor);
    eprintln!("Total Pips:       {:.1}", m.total_pips);
}

fn print_batch_summary(outcomes: &[PairOutcome]) {
    eprintln!("\n=== Per-Pair Summary (test split) ===");
    for outcome in outcomes {
        match &outcome.result {
            Ok(result) => {
                let m = &result.test.metrics;
                eprintln!(
                    "  {}:  {:+.2}% return, {:.2} sharpe, {:.2}% max dd, {} trades",
                    outcome.pair,
                    m.total_return_pct,
                    m.sharpe_ratio,
                    m.max_drawdown_pct,
                    m.number_of_trades,
                );
            }
            Err(e) => eprintln!("warning: skipping {} ({})", outcome.pair, e),
        }
    }
}

fn run_validate(config_path: &Path) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    if let Err(e) = validate_backtest_config(&adapter) {
        return fail(&e);
    }
    if let Err(e) = validate_strategy_config(&adapter) {
        return fail(&e);
    }
    let run_config = match load_run_config(&adapter) {
        Ok(c) => c,
        Err(e) => return fail(&e),
    };

    eprintln!("\nStrategy:       {}", run_config.strategy);
    eprintln!("Train ratio:    {}", run_config.train_ratio);
    eprintln!("Capital:        {}", run_config.initial_capital);
    eprintln!("Data dir:       {}", run_config.data_dir.display());
    eprintln!("Pairs:          {}", run_config.universe.pairs.join(", "));
    if run_config.chain_test_balance {
        eprintln!("Test split starts from the train split's final balance");
    }

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn run_list_pairs(config_path: &Path) -> ExitCode {
    let run_config = match load_run(config_path) {
        Ok(c) => c,
        Err(code) => return code,
    };
    let adapter = CsvAdapter::new(run_config.data_dir.clone());

    let pairs = match adapter.list_pairs() {
        Ok(p) => p,
        Err(e) => return fail(&e),
    };

    if pairs.is_empty() {
        eprintln!("No pairs found in {}", run_config.data_dir.display());
    } else {
        for pair in &pairs {
            println!("{}", pair);
        }
        eprintln!("{} pairs found", pairs.len());
    }
    ExitCode::SUCCESS
}
