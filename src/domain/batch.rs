//! Multi-pair runs with per-pair error isolation.
//!
//! Pairs are independent, so they run in parallel on the rayon pool. Output
//! order always matches input order, and one pair's failure never aborts the
//! others.

use crate::domain::backtest::{run_backtest, BacktestConfig, BacktestResult};
use crate::domain::error::BacktestError;
use crate::domain::ohlcv::PriceBar;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use rayon::prelude::*;

#[derive(Debug)]
pub struct PairOutcome {
    pub pair: String,
    pub result: Result<BacktestResult, BacktestError>,
}

impl PairOutcome {
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Backtests already-loaded series. `config_for` supplies each pair's
/// configuration, which lets pip size vary by pair.
pub fn run_batch<F>(inputs: &[(String, Vec<PriceBar>)], config_for: F) -> Vec<PairOutcome>
where
    F: Fn(&str) -> BacktestConfig + Sync,
{
    inputs
        .par_iter()
        .map(|(pair, bars)| PairOutcome {
            pair: pair.clone(),
            result: run_backtest(pair, bars, &config_for(pair)),
        })
        .collect()
}

/// Loads each pair through `data_port` and backtests it. Load failures are
/// recorded against the pair like any other failure.
pub fn run_universe<F>(
    data_port: &(dyn DataPort + Sync),
    pairs: &[String],
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
    config_for: F,
) -> Vec<PairOutcome>
where
    F: Fn(&str) -> BacktestConfig + Sync,
{
    pairs
        .par_iter()
        .map(|pair| {
            let result = data_port
                .fetch_prices(pair, start, end)
                .and_then(|bars| run_backtest(pair, &bars, &config_for(pair)));
            PairOutcome {
                pair: pair.clone(),
                result,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::strategy::{RsiParams, StrategyParams};

    fn series(n: usize, phase: f64) -> Vec<PriceBar> {
        (0..n)
            .map(|i| {
                let p = 1.2 + 0.01 * ((i as f64) * 0.5 + phase).sin();
                PriceBar::new(
                    NaiveDate::from_ymd_opt(2023, 1, 1).unwrap() + chrono::Duration::days(i as i64),
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

    fn config(_pair: &str) -> BacktestConfig {
        BacktestConfig::new(StrategyParams::Rsi(RsiParams {
            period: 3,
            ..RsiParams::default()
        }))
    }

    #[test]
    fn failing_pair_does_not_abort_others() {
        let inputs = vec![
            ("EURUSD=X".to_string(), series(40, 0.0)),
            ("GBPUSD=X".to_string(), Vec::new()),
            ("AUDUSD=X".to_string(), series(40, 1.0)),
        ];
        let outcomes = run_batch(&inputs, config);

        assert_eq!(outcomes.len(), 3);
        assert_eq!(outcomes[0].pair, "EURUSD=X");
        assert!(outcomes[0].is_ok());
        assert!(matches!(
            outcomes[1].result,
            Err(BacktestError::DataUnavailable { .. })
        ));
        assert_eq!(outcomes[2].pair, "AUDUSD=X");
        assert!(outcomes[2].is_ok());
    }

    #[test]
    fn batch_matches_individual_runs() {
        let inputs = vec![
            ("EURUSD=X".to_string(), series(50, 0.3)),
            ("USDCAD=X".to_string(), series(50, 2.0)),
        ];
        let outcomes = run_batch(&inputs, config);
        for (outcome, (pair, bars)) in outcomes.iter().zip(&inputs) {
            let single = run_backtest(pair, bars, &config(pair)).unwrap();
            let batched = outcome.result.as_ref().unwrap();
            assert_eq!(batched.train.metrics, single.train.metrics);
            assert_eq!(batched.test.metrics, single.test.metrics);
            assert_eq!(batched.test.trades, single.test.trades);
        }
    }
}
