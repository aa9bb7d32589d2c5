//! Technical indicator implementations.
//!
//! Indicators operate on the adjusted-close column and return one value per
//! bar, with `NaN` marking bars that are still inside the warmup window:
//! - `IndicatorType`: indicator identity + parameters
//! - `IndicatorFrame`: the price table extended with the indicator columns
//!   the selected strategy needs

pub mod bollinger;
pub mod ema;
pub mod macd;
pub mod rolling;
pub mod rsi;

pub use bollinger::{calculate_bollinger, BollingerColumns};
pub use ema::calculate_ema;
pub use macd::{calculate_macd, MacdColumns};
pub use rsi::calculate_rsi;

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::{price_column, PriceBar};
use crate::domain::strategy::StrategyParams;
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Rsi(usize),
    Macd {
        fast: usize,
        slow: usize,
        signal: usize,
    },
    Bollinger {
        period: usize,
        stddev_mult_x100: u32,
    },
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
            IndicatorType::Macd { fast, slow, signal } => {
                write!(f, "MACD({},{},{})", fast, slow, signal)
            }
            IndicatorType::Bollinger {
                period,
                stddev_mult_x100,
            } => {
                let mult = *stddev_mult_x100 as f64 / 100.0;
                write!(f, "BOLLINGER({},{})", period, mult)
            }
        }
    }
}

/// Price bars plus derived indicator columns. Columns for indicator families
/// the strategy does not use are `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorFrame {
    pub indicator_type: IndicatorType,
    pub bars: Vec<PriceBar>,
    pub prices: Vec<f64>,
    pub rsi: Option<Vec<f64>>,
    pub macd: Option<MacdColumns>,
    pub bollinger: Option<BollingerColumns>,
}

impl IndicatorFrame {
    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// The headline column of whichever family was computed: RSI, the MACD
    /// line, or the Bollinger middle band.
    pub fn primary_column(&self) -> Option<&[f64]> {
        self.rsi
            .as_deref()
            .or_else(|| self.macd.as_ref().map(|m| m.line.as_slice()))
            .or_else(|| self.bollinger.as_ref().map(|b| b.middle.as_slice()))
    }

    /// Index of the first bar where every computed column is defined.
    pub fn warmup_end(&self) -> usize {
        (0..self.len())
            .find(|&i| {
                let rsi_ok = self.rsi.as_ref().is_none_or(|c| !c[i].is_nan());
                let macd_ok = self
                    .macd
                    .as_ref()
                    .is_none_or(|c| !c.line[i].is_nan() && !c.signal[i].is_nan());
                let boll_ok = self
                    .bollinger
                    .as_ref()
                    .is_none_or(|c| !c.upper[i].is_nan() && !c.lower[i].is_nan());
                rsi_ok && macd_ok && boll_ok
            })
            .unwrap_or(self.len())
    }
}

/// Validate the strategy parameters and compute the indicator family it needs.
pub fn compute_frame(
    bars: &[PriceBar],
    params: &StrategyParams,
) -> Result<IndicatorFrame, BacktestError> {
    params.validate(bars.len())?;

    let prices = price_column(bars);
    let mut frame = IndicatorFrame {
        indicator_type: params.indicator_type(),
        bars: bars.to_vec(),
        prices,
        rsi: None,
        macd: None,
        bollinger: None,
    };

    match params {
        StrategyParams::Rsi(p) => {
            frame.rsi = Some(calculate_rsi(&frame.prices, p.period));
        }
        StrategyParams::Macd(p) => {
            frame.macd = Some(calculate_macd(&frame.prices, p.fast, p.slow, p.signal));
        }
        StrategyParams::Bollinger(p) => {
            frame.bollinger = Some(calculate_bollinger(&frame.prices, p.period, p.num_std));
        }
    }

    Ok(frame)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::{BollingerParams, MacdParams, RsiParams};
    use chrono::NaiveDate;

    fn make_bars(prices: &[f64]) -> Vec<PriceBar> {
        prices
            .iter()
            .enumerate()
            .map(|(i, &p)| {
                PriceBar::new(
                    NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::Duration::days(i as i64),
                    p,
                    p,
                    p,
                    p,
                    None,
                    None,
                )
            })
            .collect()
    }

    #[test]
    fn indicator_type_display_rsi() {
        assert_eq!(IndicatorType::Rsi(14).to_string(), "RSI(14)");
    }

    #[test]
    fn indicator_type_display_macd() {
        let macd = IndicatorType::Macd {
            fast: 12,
            slow: 26,
            signal: 9,
        };
        assert_eq!(macd.to_string(), "MACD(12,26,9)");
    }

    #[test]
    fn indicator_type_display_bollinger() {
        let boll = IndicatorType::Bollinger {
            period: 20,
            stddev_mult_x100: 200,
        };
        assert_eq!(boll.to_string(), "BOLLINGER(20,2)");
    }

    #[test]
    fn frame_only_computes_requested_family() {
        let bars = make_bars(&[1.0, 1.1, 1.2, 1.1, 1.0, 1.05]);
        let frame = compute_frame(&bars, &StrategyParams::Rsi(RsiParams {
            period: 3,
            ..RsiParams::default()
        }))
        .unwrap();
        assert!(frame.rsi.is_some());
        assert!(frame.macd.is_none());
        assert!(frame.bollinger.is_none());
        assert_eq!(frame.len(), 6);
        assert_eq!(frame.indicator_type, IndicatorType::Rsi(3));
    }

    #[test]
    fn frame_rejects_period_longer_than_series() {
        let bars = make_bars(&[1.0, 1.1, 1.2]);
        let err = compute_frame(&bars, &StrategyParams::Bollinger(BollingerParams::default()))
            .unwrap_err();
        assert!(matches!(err, BacktestError::InvalidParameter { .. }));
    }

    #[test]
    fn warmup_end_for_each_family() {
        let bars = make_bars(&[1.0, 1.1, 1.2, 1.1, 1.0, 1.05, 1.1]);

        let rsi = compute_frame(&bars, &StrategyParams::Rsi(RsiParams {
            period: 3,
            ..RsiParams::default()
        }))
        .unwrap();
        assert_eq!(rsi.warmup_end(), 3);

        let boll = compute_frame(&bars, &StrategyParams::Bollinger(BollingerParams {
            period: 4,
            num_std: 2.0,
        }))
        .unwrap();
        assert_eq!(boll.warmup_end(), 3);

        let macd = compute_frame(&bars, &StrategyParams::Macd(MacdParams {
            fast: 2,
            slow: 4,
            signal: 2,
        }))
        .unwrap();
        assert_eq!(macd.warmup_end(), 0);
    }

    #[test]
    fn frame_does_not_modify_input() {
        let bars = make_bars(&[1.0, 1.1, 1.2, 1.3]);
        let before = bars.clone();
        let frame = compute_frame(&bars, &StrategyParams::Macd(MacdParams {
            fast: 2,
            slow: 3,
            signal: 2,
        }))
        .unwrap();
        assert_eq!(bars, before);
        assert_eq!(frame.bars, before);
    }
}
