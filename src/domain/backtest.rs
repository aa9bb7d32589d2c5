//! Backtest pipeline: indicators → signals → simulation → split → metrics.
//!
//! BacktestConfig defines every caller-supplied parameter of one run and is
//! validated once, before any computation.

use crate::domain::error::BacktestError;
use crate::domain::indicator::{compute_frame, IndicatorFrame};
use crate::domain::metrics::Metrics;
use crate::domain::ohlcv::{dates_strictly_increasing, PriceBar};
use crate::domain::signal::generate_signals;
use crate::domain::simulator::{simulate, ExecutionModel, SimulatedBar};
use crate::domain::split::{split, split_index, SplitLabel};
use crate::domain::strategy::StrategyParams;
use crate::domain::trade::{reconstruct_trades, Trade};

pub const DEFAULT_TRAIN_RATIO: f64 = 0.7;
pub const DEFAULT_INITIAL_CAPITAL: f64 = 10_000.0;
pub const DEFAULT_LOT_SIZE: f64 = 10_000.0;
pub const DEFAULT_PIP_SIZE: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestConfig {
    pub strategy: StrategyParams,
    pub train_ratio: f64,
    pub initial_capital: f64,
    pub execution: ExecutionModel,
    pub pip_size: f64,
    /// Start the test split from the train split's final balance instead of
    /// from `initial_capital`.
    pub chain_test_balance: bool,
}

impl BacktestConfig {
    pub fn new(strategy: StrategyParams) -> Self {
        Self {
            strategy,
            train_ratio: DEFAULT_TRAIN_RATIO,
            initial_capital: DEFAULT_INITIAL_CAPITAL,
            execution: ExecutionModel::Percentage,
            pip_size: DEFAULT_PIP_SIZE,
            chain_test_balance: false,
        }
    }

    /// Run-level checks. Strategy parameters are checked against the series
    /// length when the indicator frame is built.
    pub fn validate(&self) -> Result<(), BacktestError> {
        if !self.train_ratio.is_finite() || !(0.0..=1.0).contains(&self.train_ratio) {
            return Err(BacktestError::invalid_parameter(
                "train_ratio",
                "must be between 0 and 1",
            ));
        }
        if !self.initial_capital.is_finite() || self.initial_capital <= 0.0 {
            return Err(BacktestError::invalid_parameter(
                "initial_capital",
                "must be positive",
            ));
        }
        if !self.pip_size.is_finite() || self.pip_size <= 0.0 {
            return Err(BacktestError::invalid_parameter("pip_size", "must be positive"));
        }
        if let ExecutionModel::Account {
            lot_size,
            conversion_rate,
        } = self.execution
        {
            if !lot_size.is_finite() || lot_size <= 0.0 {
                return Err(BacktestError::invalid_parameter("lot_size", "must be positive"));
            }
            if !conversion_rate.is_finite() || conversion_rate <= 0.0 {
                return Err(BacktestError::invalid_parameter(
                    "conversion_rate",
                    "must be positive",
                ));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SplitResult {
    pub label: SplitLabel,
    /// Index of the split's first bar in the full simulated series.
    pub start_index: usize,
    pub bar_count: usize,
    pub starting_balance: f64,
    pub metrics: Metrics,
    pub trades: Vec<Trade>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BacktestResult {
    pub pair: String,
    pub frame: IndicatorFrame,
    pub bars: Vec<SimulatedBar>,
    pub train: SplitResult,
    pub test: SplitResult,
}

impl BacktestResult {
    /// Train bars followed by test bars.
    pub fn split_bars(&self, label: SplitLabel) -> &[SimulatedBar] {
        let s = match label {
            SplitLabel::Train => &self.train,
            SplitLabel::Test => &self.test,
        };
        &self.bars[s.start_index..s.start_index + s.bar_count]
    }

    /// Every reconstructed trade tagged with the split it belongs to.
    pub fn labeled_trades(&self) -> Vec<(SplitLabel, &Trade)> {
        self.train
            .trades
            .iter()
            .map(|t| (SplitLabel::Train, t))
            .chain(self.test.trades.iter().map(|t| (SplitLabel::Test, t)))
            .collect()
    }
}

pub fn run_backtest(
    pair: &str,
    bars: &[PriceBar],
    config: &BacktestConfig,
) -> Result<BacktestResult, BacktestError> {
    if bars.is_empty() {
        return Err(BacktestError::DataUnavailable {
            pair: pair.to_string(),
            reason: "price series is empty".to_string(),
        });
    }
    if !dates_strictly_increasing(bars) {
        return Err(BacktestError::DataUnavailable {
            pair: pair.to_string(),
            reason: "bar dates are not strictly increasing".to_string(),
        });
    }
    config.validate()?;

    let frame = compute_frame(bars, &config.strategy)?;
    let signals = generate_signals(&frame, &config.strategy);
    let simulated = simulate(&frame, &signals, &config.execution, config.initial_capital);

    let halves = split(&simulated, config.train_ratio);
    let boundary = split_index(simulated.len(), config.train_ratio);

    let train = evaluate_split(
        SplitLabel::Train,
        halves.train,
        0,
        config.initial_capital,
        config,
    );

    let test_start = if config.chain_test_balance && !halves.train.is_empty() {
        train.metrics.final_balance
    } else {
        config.initial_capital
    };
    let test = evaluate_split(SplitLabel::Test, halves.test, boundary, test_start, config);

    Ok(BacktestResult {
        pair: pair.to_string(),
        frame,
        bars: simulated,
        train,
        test,
    })
}

fn evaluate_split(
    label: SplitLabel,
    bars: &[SimulatedBar],
    start_index: usize,
    starting_balance: f64,
    config: &BacktestConfig,
) -> SplitResult {
    let trades = reconstruct_trades(
        bars,
        &config.execution,
        config.initial_capital,
        config.pip_size,
    );
    let metrics = Metrics::compute(bars, &trades, starting_balance, &config.execution);
    SplitResult {
        label,
        start_index,
        bar_count: bars.len(),
        starting_balance,
        metrics,
        trades,
    }
}
