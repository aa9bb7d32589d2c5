//! Property tests over random price paths.

mod common;

use approx::assert_relative_eq;
use common::*;
use fxbacktest::domain::backtest::{run_backtest, BacktestConfig};
use fxbacktest::domain::indicator::{calculate_bollinger, calculate_macd, calculate_rsi};
use fxbacktest::domain::metrics::{compute_max_drawdown, compute_win_rate};
use fxbacktest::domain::signal::Signal;
use fxbacktest::domain::strategy::{BollingerParams, MacdParams, RsiParams, StrategyParams};
use proptest::prelude::*;

fn price_path() -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec(1.0f64..1.5, 30..120)
}

fn any_strategy() -> impl Strategy<Value = StrategyParams> {
    prop_oneof![
        (2usize..15).prop_map(|period| StrategyParams::Rsi(RsiParams {
            period,
            ..RsiParams::default()
        })),
        (2usize..6, 7usize..15, 2usize..6).prop_map(|(fast, slow, signal)| {
            StrategyParams::Macd(MacdParams { fast, slow, signal })
        }),
        (2usize..15, 0.0f64..3.0).prop_map(|(period, num_std)| {
            StrategyParams::Bollinger(BollingerParams { period, num_std })
        }),
    ]
}

mod indicators {
    use super::*;

    proptest! {
        #[test]
        fn rsi_is_bounded(prices in price_path(), period in 1usize..20) {
            for v in calculate_rsi(&prices, period).into_iter().filter(|v| !v.is_nan()) {
                prop_assert!((0.0..=100.0).contains(&v), "rsi {} out of range", v);
            }
        }

        #[test]
        fn macd_histogram_is_line_minus_signal(
            prices in price_path(),
            fast in 2usize..8,
            slow in 9usize..20,
            signal in 2usize..8,
        ) {
            let cols = calculate_macd(&prices, fast, slow, signal);
            for i in 0..prices.len() {
                assert_relative_eq!(cols.histogram[i], cols.line[i] - cols.signal[i]);
            }
        }

        #[test]
        fn bollinger_bands_are_ordered(
            prices in price_path(),
            period in 2usize..20,
            num_std in 0.0f64..4.0,
        ) {
            let bands = calculate_bollinger(&prices, period, num_std);
            for i in 0..prices.len() {
                if bands.std[i].is_nan() {
                    continue;
                }
                prop_assert!(bands.lower[i] <= bands.middle[i]);
                prop_assert!(bands.middle[i] <= bands.upper[i]);
            }
        }
    }
}

mod pipeline {
    use super::*;

    proptest! {
        #[test]
        fn last_price_never_moves_earlier_returns(
            prices in price_path(),
            params in any_strategy(),
            bump in 0.01f64..0.2,
        ) {
            let mut config = BacktestConfig::new(params);
            config.train_ratio = 1.0;

            let mut perturbed = prices.clone();
            if let Some(last) = perturbed.last_mut() {
                *last += bump;
            }

            let base = run_backtest("EURUSD=X", &bars_from_prices(&prices), &config).unwrap();
            let moved = run_backtest("EURUSD=X", &bars_from_prices(&perturbed), &config).unwrap();

            let n = prices.len();
            for i in 0..n - 1 {
                prop_assert_eq!(base.bars[i].signal, moved.bars[i].signal);
                prop_assert_eq!(base.bars[i].strategy_return, moved.bars[i].strategy_return);
            }
            prop_assert_eq!(base.bars[n - 1].position, moved.bars[n - 1].position);
        }

        #[test]
        fn interior_price_only_reaches_its_own_bar_through_period_return(
            prices in price_path(),
            params in any_strategy(),
            t in 1usize..29,
            bump in -0.2f64..0.2,
        ) {
            let mut config = BacktestConfig::new(params);
            config.train_ratio = 1.0;

            let mut perturbed = prices.clone();
            perturbed[t] *= 1.0 + bump;

            let base = run_backtest("EURUSD=X", &bars_from_prices(&prices), &config).unwrap();
            let moved = run_backtest("EURUSD=X", &bars_from_prices(&perturbed), &config).unwrap();

            for i in 0..t {
                prop_assert_eq!(base.bars[i].signal, moved.bars[i].signal);
                prop_assert_eq!(base.bars[i].strategy_return, moved.bars[i].strategy_return);
            }
            prop_assert_eq!(base.bars[t].position, moved.bars[t].position);

            let bar = &moved.bars[t];
            let expected = if bar.position == Signal::Flat {
                0.0
            } else {
                bar.position.as_f64() * bar.period_return
            };
            prop_assert_eq!(bar.strategy_return, expected);
        }

        #[test]
        fn percentage_cumulative_return_is_non_negative(
            prices in price_path(),
            params in any_strategy(),
        ) {
            let result = run_backtest("EURUSD=X", &bars_from_prices(&prices), &BacktestConfig::new(params)).unwrap();
            for bar in &result.bars {
                prop_assert!(bar.cumulative_return >= 0.0);
            }
        }

        #[test]
        fn split_metrics_stay_in_range(prices in price_path(), params in any_strategy()) {
            let result = run_backtest("EURUSD=X", &bars_from_prices(&prices), &BacktestConfig::new(params)).unwrap();
            for split in [&result.train, &result.test] {
                let m = &split.metrics;
                prop_assert!(m.max_drawdown_pct <= 0.0);
                prop_assert!((0.0..=100.0).contains(&m.win_rate_pct));
                prop_assert!(!m.sharpe_ratio.is_nan());
                prop_assert!(m.trades_won + m.trades_lost <= m.number_of_trades);
            }
        }

        #[test]
        fn one_trade_per_consecutive_active_pair(prices in price_path(), params in any_strategy()) {
            let mut config = BacktestConfig::new(params);
            config.train_ratio = 1.0;
            let result = run_backtest("EURUSD=X", &bars_from_prices(&prices), &config).unwrap();

            let active = result.bars.iter().filter(|b| b.signal != Signal::Flat).count();
            prop_assert_eq!(result.train.trades.len(), active.saturating_sub(1));
        }

        #[test]
        fn pipeline_is_deterministic(prices in price_path(), params in any_strategy()) {
            let bars = bars_from_prices(&prices);
            let config = BacktestConfig::new(params);
            let a = run_backtest("EURUSD=X", &bars, &config).unwrap();
            let b = run_backtest("EURUSD=X", &bars, &config).unwrap();

            prop_assert_eq!(&a.train.metrics, &b.train.metrics);
            prop_assert_eq!(&a.test.trades, &b.test.trades);
            for (x, y) in a.bars.iter().zip(&b.bars) {
                prop_assert_eq!(x.balance.to_bits(), y.balance.to_bits());
                prop_assert_eq!(x.signal, y.signal);
            }
        }
    }
}

mod metrics {
    use super::*;

    proptest! {
        #[test]
        fn drawdown_never_positive(balances in prop::collection::vec(0.0f64..20_000.0, 0..60)) {
            prop_assert!(compute_max_drawdown(10_000.0, &balances) <= 0.0);
        }

        #[test]
        fn rising_balance_has_no_drawdown(steps in prop::collection::vec(0.0f64..50.0, 1..60)) {
            let balances: Vec<f64> = steps
                .iter()
                .scan(10_000.0, |acc, s| {
                    *acc += s;
                    Some(*acc)
                })
                .collect();
            prop_assert_eq!(compute_max_drawdown(10_000.0, &balances), 0.0);
        }

        #[test]
        fn win_rate_is_a_percentage(returns in prop::collection::vec(-0.05f64..0.05, 0..80)) {
            let rate = compute_win_rate(&returns);
            prop_assert!((0.0..=100.0).contains(&rate));
        }
    }
}
