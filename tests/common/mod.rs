#![allow(dead_code)]

use chrono::NaiveDate;
use fxbacktest::domain::error::BacktestError;
pub use fxbacktest::domain::ohlcv::PriceBar;
use fxbacktest::ports::data_port::DataPort;
use std::collections::HashMap;

pub struct MockDataPort {
    pub data: HashMap<String, Vec<PriceBar>>,
    pub errors: HashMap<String, String>,
}

impl MockDataPort {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
        }
    }

    pub fn with_bars(mut self, pair: &str, bars: Vec<PriceBar>) -> Self {
        self.data.insert(pair.to_string(), bars);
        self
    }

    pub fn with_error(mut self, pair: &str, reason: &str) -> Self {
        self.errors.insert(pair.to_string(), reason.to_string());
        self
    }
}

impl DataPort for MockDataPort {
    fn fetch_prices(
        &self,
        pair: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, BacktestError> {
        if let Some(reason) = self.errors.get(pair) {
            return Err(BacktestError::DataUnavailable {
                pair: pair.to_string(),
                reason: reason.clone(),
            });
        }
        let bars: Vec<PriceBar> = self
            .data
            .get(pair)
            .map(|bars| {
                bars.iter()
                    .filter(|b| start.is_none_or(|s| b.date >= s) && end.is_none_or(|e| b.date <= e))
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();
        if bars.is_empty() {
            return Err(BacktestError::DataUnavailable {
                pair: pair.to_string(),
                reason: "no data".to_string(),
            });
        }
        Ok(bars)
    }

    fn list_pairs(&self) -> Result<Vec<String>, BacktestError> {
        let mut pairs: Vec<String> = self.data.keys().cloned().collect();
        pairs.sort();
        Ok(pairs)
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// One bar per calendar day from 2024-01-01, all OHLC fields set to the price.
pub fn bars_from_prices(prices: &[f64]) -> Vec<PriceBar> {
    let start = date(2024, 1, 1);
    prices
        .iter()
        .enumerate()
        .map(|(i, &p)| {
            PriceBar::new(
                start + chrono::Duration::days(i as i64),
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

/// Smooth oscillating series around `base` that crosses RSI and band thresholds.
pub fn wave_prices(count: usize, base: f64, amplitude: f64) -> Vec<f64> {
    (0..count)
        .map(|i| {
            let t = i as f64;
            base + amplitude * ((t * 0.35).sin() + 0.5 * (t * 0.11).cos())
        })
        .collect()
}

pub fn wave_bars(count: usize, base: f64) -> Vec<PriceBar> {
    bars_from_prices(&wave_prices(count, base, base * 0.01))
}
