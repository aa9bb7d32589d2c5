//! Configuration validation and resolution.
//!
//! Reads every recognized key through [`ConfigPort`], reporting malformed
//! values as `ConfigInvalid` instead of silently falling back to defaults,
//! and resolves the file into a [`RunConfig`].

use crate::domain::backtest::{
    BacktestConfig, DEFAULT_INITIAL_CAPITAL, DEFAULT_LOT_SIZE, DEFAULT_TRAIN_RATIO,
};
use crate::domain::error::BacktestError;
use crate::domain::simulator::ExecutionModel;
use crate::domain::strategy::{
    BollingerParams, MacdParams, RsiParams, StrategyKind, StrategyParams,
};
use crate::domain::universe::{parse_pairs, pip_size_for, Universe};
use crate::ports::config_port::ConfigPort;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_DATA_DIR: &str = "data";

/// Everything a run needs, resolved from one config file.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub strategy: StrategyParams,
    pub train_ratio: f64,
    pub initial_capital: f64,
    pub execution: ExecutionModel,
    /// Overrides the per-pair pip size when set.
    pub pip_size: Option<f64>,
    pub chain_test_balance: bool,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub data_dir: PathBuf,
    pub universe: Universe,
}

impl RunConfig {
    pub fn backtest_for(&self, pair: &str) -> BacktestConfig {
        BacktestConfig {
            strategy: self.strategy,
            train_ratio: self.train_ratio,
            initial_capital: self.initial_capital,
            execution: self.execution,
            pip_size: self.pip_size.unwrap_or_else(|| pip_size_for(pair)),
            chain_test_balance: self.chain_test_balance,
        }
    }
}

pub fn load_run_config(config: &dyn ConfigPort) -> Result<RunConfig, BacktestError> {
    validate_backtest_config(config)?;
    let strategy = resolve_strategy(config)?;

    let (start_date, end_date) = resolve_dates(config)?;
    let universe = match non_empty(config, "data", "pairs") {
        Some(list) => Universe {
            pairs: parse_pairs(&list).map_err(|e| invalid("data", "pairs", e.to_string()))?,
        },
        None => Universe::default(),
    };

    Ok(RunConfig {
        strategy,
        train_ratio: resolve_train_ratio(config)?,
        initial_capital: parsed(config, "backtest", "initial_capital")?
            .unwrap_or(DEFAULT_INITIAL_CAPITAL),
        execution: resolve_execution(config)?,
        pip_size: parsed(config, "backtest", "pip_size")?,
        chain_test_balance: resolve_bool(config, "backtest", "chain_test_balance")?
            .unwrap_or(false),
        start_date,
        end_date,
        data_dir: non_empty(config, "data", "dir")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_DATA_DIR)),
        universe,
    })
}

pub fn validate_backtest_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    validate_strategy_name(config)?;
    resolve_train_ratio(config)?;
    validate_positive(config, "backtest", "initial_capital")?;
    resolve_execution(config)?;
    validate_positive(config, "backtest", "pip_size")?;
    resolve_bool(config, "backtest", "chain_test_balance")?;
    resolve_dates(config)?;
    if let Some(list) = non_empty(config, "data", "pairs") {
        parse_pairs(&list).map_err(|e| invalid("data", "pairs", e.to_string()))?;
    }
    Ok(())
}

/// Parameters of the configured strategy, checked for everything except
/// fit against a series length.
pub fn validate_strategy_config(config: &dyn ConfigPort) -> Result<(), BacktestError> {
    resolve_strategy(config)?.validate(usize::MAX)
}

fn resolve_strategy(config: &dyn ConfigPort) -> Result<StrategyParams, BacktestError> {
    let kind = validate_strategy_name(config)?;
    let params = match kind {
        StrategyKind::Rsi => {
            let d = RsiParams::default();
            StrategyParams::Rsi(RsiParams {
                period: parsed(config, "rsi", "period")?.unwrap_or(d.period),
                oversold: parsed(config, "rsi", "oversold")?.unwrap_or(d.oversold),
                overbought: parsed(config, "rsi", "overbought")?.unwrap_or(d.overbought),
            })
        }
        StrategyKind::Macd => {
            let d = MacdParams::default();
            StrategyParams::Macd(MacdParams {
                fast: parsed(config, "macd", "fast")?.unwrap_or(d.fast),
                slow: parsed(config, "macd", "slow")?.unwrap_or(d.slow),
                signal: parsed(config, "macd", "signal")?.unwrap_or(d.signal),
            })
        }
        StrategyKind::Bollinger => {
            let d = BollingerParams::default();
            StrategyParams::Bollinger(BollingerParams {
                period: parsed(config, "bollinger", "period")?.unwrap_or(d.period),
                num_std: parsed(config, "bollinger", "std")?.unwrap_or(d.num_std),
            })
        }
    };
    Ok(params)
}

fn validate_strategy_name(config: &dyn ConfigPort) -> Result<StrategyKind, BacktestError> {
    match non_empty(config, "backtest", "strategy") {
        Some(name) => name.parse(),
        None => Err(BacktestError::ConfigMissing {
            section: "backtest".to_string(),
            key: "strategy".to_string(),
        }),
    }
}

/// Fractions in `[0, 1]`; values in `(1, 100]` are read as percentages.
fn resolve_train_ratio(config: &dyn ConfigPort) -> Result<f64, BacktestError> {
    let Some(raw) = parsed::<f64>(config, "backtest", "train_ratio")? else {
        return Ok(DEFAULT_TRAIN_RATIO);
    };
    let ratio = if raw > 1.0 && raw <= 100.0 {
        raw / 100.0
    } else {
        raw
    };
    if !ratio.is_finite() || !(0.0..=1.0).contains(&ratio) {
        return Err(invalid(
            "backtest",
            "train_ratio",
            "train_ratio must be between 0 and 1 (or a percentage up to 100)",
        ));
    }
    Ok(ratio)
}

fn resolve_execution(config: &dyn ConfigPort) -> Result<ExecutionModel, BacktestError> {
    let mode = non_empty(config, "backtest", "execution").map(|s| s.to_lowercase());
    match mode.as_deref() {
        None | Some("percentage") | Some("percent") => Ok(ExecutionModel::Percentage),
        Some("account") => {
            validate_positive(config, "backtest", "lot_size")?;
            validate_positive(config, "backtest", "conversion_rate")?;
            Ok(ExecutionModel::Account {
                lot_size: parsed(config, "backtest", "lot_size")?.unwrap_or(DEFAULT_LOT_SIZE),
                conversion_rate: parsed(config, "backtest", "conversion_rate")?.unwrap_or(1.0),
            })
        }
        Some(other) => Err(invalid(
            "backtest",
            "execution",
            format!("unknown execution model '{}', expected percentage or account", other),
        )),
    }
}

fn resolve_dates(
    config: &dyn ConfigPort,
) -> Result<(Option<NaiveDate>, Option<NaiveDate>), BacktestError> {
    let start = parse_date(config, "start_date")?;
    let end = parse_date(config, "end_date")?;
    if let (Some(s), Some(e)) = (start, end) {
        if s > e {
            return Err(invalid(
                "backtest",
                "start_date",
                "start_date must not be after end_date",
            ));
        }
    }
    Ok((start, end))
}

fn parse_date(config: &dyn ConfigPort, field: &str) -> Result<Option<NaiveDate>, BacktestError> {
    match non_empty(config, "backtest", field) {
        None => Ok(None),
        Some(s) => NaiveDate::parse_from_str(&s, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| {
                invalid(
                    "backtest",
                    field,
                    format!("invalid {} format, expected YYYY-MM-DD", field),
                )
            }),
    }
}

fn resolve_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<bool>, BacktestError> {
    match non_empty(config, section, key) {
        None => Ok(None),
        Some(s) => match s.to_lowercase().as_str() {
            "true" | "yes" | "1" | "on" => Ok(Some(true)),
            "false" | "no" | "0" | "off" => Ok(Some(false)),
            _ => Err(invalid(section, key, format!("expected a boolean, got '{}'", s))),
        },
    }
}

fn validate_positive(config: &dyn ConfigPort, section: &str, key: &str) -> Result<(), BacktestError> {
    if let Some(value) = parsed::<f64>(config, section, key)? {
        if !value.is_finite() || value <= 0.0 {
            return Err(invalid(section, key, format!("{} must be positive", key)));
        }
    }
    Ok(())
}

fn non_empty(config: &dyn ConfigPort, section: &str, key: &str) -> Option<String> {
    config
        .get_string(section, key)
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// `Ok(None)` when the key is absent; `ConfigInvalid` when it does not parse.
fn parsed<T: FromStr>(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
) -> Result<Option<T>, BacktestError> {
    match non_empty(config, section, key) {
        None => Ok(None),
        Some(s) => s
            .parse::<T>()
            .map(Some)
            .map_err(|_| invalid(section, key, format!("cannot parse '{}'", s))),
    }
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> BacktestError {
    BacktestError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}
