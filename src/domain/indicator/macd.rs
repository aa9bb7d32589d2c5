//! MACD (Moving Average Convergence Divergence) indicator.
//!
//! MACD Line = EMA(fast) - EMA(slow)
//! Signal Line = EMA(signal) of MACD Line
//! Histogram = MACD Line - Signal Line
//!
//! Every EMA is seeded with its first input, so the columns are defined from
//! the first bar. Early values are numerically unstable rather than missing.

use crate::domain::indicator::ema::calculate_ema;

#[derive(Debug, Clone, PartialEq)]
pub struct MacdColumns {
    pub line: Vec<f64>,
    pub signal: Vec<f64>,
    pub histogram: Vec<f64>,
}

pub fn calculate_macd(prices: &[f64], fast: usize, slow: usize, signal_span: usize) -> MacdColumns {
    let ema_fast = calculate_ema(prices, fast);
    let ema_slow = calculate_ema(prices, slow);

    let line: Vec<f64> = ema_fast
        .iter()
        .zip(&ema_slow)
        .map(|(f, s)| f - s)
        .collect();
    let signal = calculate_ema(&line, signal_span);
    let histogram = line.iter().zip(&signal).map(|(l, s)| l - s).collect();

    MacdColumns {
        line,
        signal,
        histogram,
    }
}
