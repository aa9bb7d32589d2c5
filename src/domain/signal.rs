//! Per-bar position signals derived from same-bar indicator values.
//!
//! Comparisons against warmup `NaN` values are false, so warmup bars are FLAT.

use crate::domain::indicator::{BollingerColumns, IndicatorFrame};
use crate::domain::strategy::StrategyParams;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Signal {
    Long,
    Short,
    #[default]
    Flat,
}

impl Signal {
    /// +1 / -1 / 0
    pub fn direction(self) -> i8 {
        match self {
            Signal::Long => 1,
            Signal::Short => -1,
            Signal::Flat => 0,
        }
    }

    pub fn as_f64(self) -> f64 {
        self.direction() as f64
    }

    pub fn is_active(self) -> bool {
        self != Signal::Flat
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Long => write!(f, "LONG"),
            Signal::Short => write!(f, "SHORT"),
            Signal::Flat => write!(f, "FLAT"),
        }
    }
}

/// Map the frame to one signal per bar using the rule of the selected strategy.
///
/// A frame built for a different strategy than `params` yields all-FLAT.
pub fn generate_signals(frame: &IndicatorFrame, params: &StrategyParams) -> Vec<Signal> {
    match params {
        StrategyParams::Rsi(p) => match &frame.rsi {
            Some(rsi) => rsi_signals(rsi, p.oversold, p.overbought),
            None => vec![Signal::Flat; frame.len()],
        },
        StrategyParams::Macd(_) => match &frame.macd {
            Some(cols) => macd_signals(&cols.line, &cols.signal),
            None => vec![Signal::Flat; frame.len()],
        },
        StrategyParams::Bollinger(_) => match &frame.bollinger {
            Some(cols) => bollinger_signals(&frame.prices, cols),
            None => vec![Signal::Flat; frame.len()],
        },
    }
}

/// LONG below `oversold`, SHORT above `overbought`.
pub fn rsi_signals(rsi: &[f64], oversold: f64, overbought: f64) -> Vec<Signal> {
    rsi.iter()
        .map(|&v| {
            if v < oversold {
                Signal::Long
            } else if v > overbought {
                Signal::Short
            } else {
                Signal::Flat
            }
        })
        .collect()
}

/// Point events on the bar where the MACD line crosses its signal line.
pub fn macd_signals(line: &[f64], signal: &[f64]) -> Vec<Signal> {
    let mut out = vec![Signal::Flat; line.len()];
    for i in 1..line.len() {
        let (prev_line, prev_sig) = (line[i - 1], signal[i - 1]);
        let (cur_line, cur_sig) = (line[i], signal[i]);

        if cur_line > cur_sig && prev_line <= prev_sig {
            out[i] = Signal::Long;
        } else if cur_line < cur_sig && prev_line >= prev_sig {
            out[i] = Signal::Short;
        }
    }
    out
}

/// LONG at or below the lower band, SHORT at or above the upper band.
/// A window with zero deviation has no band to break and stays FLAT.
pub fn bollinger_signals(prices: &[f64], bands: &BollingerColumns) -> Vec<Signal> {
    prices
        .iter()
        .zip(bands.lower.iter().zip(&bands.upper))
        .zip(&bands.std)
        .map(|((&p, (&lo, &up)), &sd)| {
            if sd == 0.0 {
                Signal::Flat
            } else if p <= lo {
                Signal::Long
            } else if p >= up {
                Signal::Short
            } else {
                Signal::Flat
            }
        })
        .collect()
}
