//! Strategy identifiers and their typed parameter sets.

use crate::domain::error::BacktestError;
use crate::domain::indicator::IndicatorType;
use std::fmt;
use std::str::FromStr;

pub const DEFAULT_RSI_PERIOD: usize = 14;
pub const DEFAULT_RSI_OVERSOLD: f64 = 30.0;
pub const DEFAULT_RSI_OVERBOUGHT: f64 = 70.0;
pub const DEFAULT_MACD_FAST: usize = 12;
pub const DEFAULT_MACD_SLOW: usize = 26;
pub const DEFAULT_MACD_SIGNAL: usize = 9;
pub const DEFAULT_BOLL_PERIOD: usize = 20;
pub const DEFAULT_BOLL_STD: f64 = 2.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StrategyKind {
    Rsi,
    Macd,
    Bollinger,
}

impl FromStr for StrategyKind {
    type Err = BacktestError;

    /// Accepts the bare name or the "<name> Strategy" label, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let name = normalized
            .strip_suffix("strategy")
            .map(str::trim_end)
            .unwrap_or(normalized.as_str());
        match name {
            "rsi" => Ok(StrategyKind::Rsi),
            "macd" => Ok(StrategyKind::Macd),
            "bollinger" | "bb" => Ok(StrategyKind::Bollinger),
            _ => Err(BacktestError::UnknownStrategy {
                name: s.trim().to_string(),
            }),
        }
    }
}

impl fmt::Display for StrategyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyKind::Rsi => write!(f, "RSI"),
            StrategyKind::Macd => write!(f, "MACD"),
            StrategyKind::Bollinger => write!(f, "Bollinger"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RsiParams {
    pub period: usize,
    pub oversold: f64,
    pub overbought: f64,
}

impl Default for RsiParams {
    fn default() -> Self {
        Self {
            period: DEFAULT_RSI_PERIOD,
            oversold: DEFAULT_RSI_OVERSOLD,
            overbought: DEFAULT_RSI_OVERBOUGHT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MacdParams {
    pub fast: usize,
    pub slow: usize,
    pub signal: usize,
}

impl Default for MacdParams {
    fn default() -> Self {
        Self {
            fast: DEFAULT_MACD_FAST,
            slow: DEFAULT_MACD_SLOW,
            signal: DEFAULT_MACD_SIGNAL,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerParams {
    pub period: usize,
    pub num_std: f64,
}

impl Default for BollingerParams {
    fn default() -> Self {
        Self {
            period: DEFAULT_BOLL_PERIOD,
            num_std: DEFAULT_BOLL_STD,
        }
    }
}

/// The selected strategy together with the only parameters it reads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StrategyParams {
    Rsi(RsiParams),
    Macd(MacdParams),
    Bollinger(BollingerParams),
}

impl StrategyParams {
    /// Default parameters for a strategy kind.
    pub fn defaults(kind: StrategyKind) -> Self {
        match kind {
            StrategyKind::Rsi => StrategyParams::Rsi(RsiParams::default()),
            StrategyKind::Macd => StrategyParams::Macd(MacdParams::default()),
            StrategyKind::Bollinger => StrategyParams::Bollinger(BollingerParams::default()),
        }
    }

    pub fn kind(&self) -> StrategyKind {
        match self {
            StrategyParams::Rsi(_) => StrategyKind::Rsi,
            StrategyParams::Macd(_) => StrategyKind::Macd,
            StrategyParams::Bollinger(_) => StrategyKind::Bollinger,
        }
    }

    /// Identity of the indicator columns this strategy consumes.
    pub fn indicator_type(&self) -> IndicatorType {
        match self {
            StrategyParams::Rsi(p) => IndicatorType::Rsi(p.period),
            StrategyParams::Macd(p) => IndicatorType::Macd {
                fast: p.fast,
                slow: p.slow,
                signal: p.signal,
            },
            StrategyParams::Bollinger(p) => IndicatorType::Bollinger {
                period: p.period,
                stddev_mult_x100: (p.num_std * 100.0).round() as u32,
            },
        }
    }

    /// Check every parameter against a series of `series_len` bars.
    pub fn validate(&self, series_len: usize) -> Result<(), BacktestError> {
        match self {
            StrategyParams::Rsi(p) => {
                validate_window("rsi_period", p.period, series_len)?;
                if !p.oversold.is_finite() || !(0.0..=100.0).contains(&p.oversold) {
                    return Err(BacktestError::invalid_parameter(
                        "rsi_oversold",
                        "must be between 0 and 100",
                    ));
                }
                if !p.overbought.is_finite() || !(0.0..=100.0).contains(&p.overbought) {
                    return Err(BacktestError::invalid_parameter(
                        "rsi_overbought",
                        "must be between 0 and 100",
                    ));
                }
                if p.oversold >= p.overbought {
                    return Err(BacktestError::invalid_parameter(
                        "rsi_oversold",
                        format!(
                            "oversold ({}) must be below overbought ({})",
                            p.oversold, p.overbought
                        ),
                    ));
                }
                Ok(())
            }
            StrategyParams::Macd(p) => {
                validate_span("macd_fast", p.fast)?;
                validate_span("macd_slow", p.slow)?;
                validate_span("macd_signal", p.signal)?;
                if p.fast >= p.slow {
                    return Err(BacktestError::invalid_parameter(
                        "macd_fast",
                        format!("fast span ({}) must be below slow span ({})", p.fast, p.slow),
                    ));
                }
                Ok(())
            }
            StrategyParams::Bollinger(p) => {
                validate_window("boll_period", p.period, series_len)?;
                if !p.num_std.is_finite() || p.num_std < 0.0 {
                    return Err(BacktestError::invalid_parameter(
                        "boll_std",
                        "must be a non-negative number",
                    ));
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for StrategyParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StrategyParams::Rsi(p) => write!(
                f,
                "RSI(period={}, oversold={}, overbought={})",
                p.period, p.oversold, p.overbought
            ),
            StrategyParams::Macd(p) => write!(
                f,
                "MACD(fast={}, slow={}, signal={})",
                p.fast, p.slow, p.signal
            ),
            StrategyParams::Bollinger(p) => {
                write!(f, "Bollinger(period={}, std={})", p.period, p.num_std)
            }
        }
    }
}

/// Rolling windows need at least one bar and must fit inside the series.
fn validate_window(name: &str, period: usize, series_len: usize) -> Result<(), BacktestError> {
    if period == 0 {
        return Err(BacktestError::invalid_parameter(name, "must be positive"));
    }
    if period >= series_len {
        return Err(BacktestError::invalid_parameter(
            name,
            format!("period {} must be below series length {}", period, series_len),
        ));
    }
    Ok(())
}

fn validate_span(name: &str, span: usize) -> Result<(), BacktestError> {
    if span == 0 {
        return Err(BacktestError::invalid_parameter(name, "must be positive"));
    }
    Ok(())
}
