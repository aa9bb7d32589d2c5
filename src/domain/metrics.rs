//! Performance metrics over one split of a simulated series.
//!
//! Arithmetic edge cases resolve to defined values (never NaN):
//! zero start balance, zero deviation, zero running peak, and an empty slice.
//! The one deliberate non-finite value is the `+inf` profit factor of a
//! split with winning trades and no losing ones.

use super::simulator::{ExecutionModel, SimulatedBar};
use super::trade::Trade;

const TRADING_DAYS_PER_YEAR: f64 = 252.0;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Metrics {
    pub total_return_pct: f64,
    pub final_balance: f64,
    pub sharpe_ratio: f64,
    pub max_drawdown_pct: f64,
    pub win_rate_pct: f64,
    pub number_of_trades: usize,
    pub trades_won: usize,
    pub trades_lost: usize,
    pub profit_factor: f64,
    pub total_pips: f64,
    pub total_pnl: f64,
    /// Buy-and-hold return over the same bars.
    pub market_return_pct: f64,
}

impl Metrics {
    /// Metrics for `bars` with balances rebuilt from `starting_balance`:
    /// compounded returns in the percentage model, summed lot P&L in the
    /// account model. An empty slice gives the all-zero record.
    pub fn compute(
        bars: &[SimulatedBar],
        trades: &[Trade],
        starting_balance: f64,
        model: &ExecutionModel,
    ) -> Self {
        if bars.is_empty() {
            return Metrics::default();
        }

        let (returns, balances) = match model {
            ExecutionModel::Percentage => {
                let returns: Vec<f64> = bars.iter().map(|b| b.strategy_return).collect();
                let balances = balance_path(&returns, starting_balance);
                (returns, balances)
            }
            ExecutionModel::Account { .. } => account_path(bars, starting_balance),
        };
        // The series' first bar has no return; it compounds as zero but is
        // not a Sharpe observation.
        let observed: Vec<f64> = bars
            .iter()
            .zip(&returns)
            .filter(|(b, _)| !b.period_return.is_nan())
            .map(|(_, &r)| r)
            .collect();
        let final_balance = balances.last().copied().unwrap_or(starting_balance);

        let total_return_pct = if starting_balance > 0.0 {
            (final_balance / starting_balance - 1.0) * 100.0
        } else {
            0.0
        };

        let mut trades_won = 0usize;
        let mut trades_lost = 0usize;
        let mut gross_profit = 0.0_f64;
        let mut gross_loss = 0.0_f64;
        let mut total_pips = 0.0_f64;

        for trade in trades {
            if trade.pnl > 0.0 {
                trades_won += 1;
                gross_profit += trade.pnl;
            } else if trade.pnl < 0.0 {
                trades_lost += 1;
                gross_loss += trade.pnl.abs();
            }
            total_pips += trade.pips;
        }

        let profit_factor = if gross_loss > 0.0 {
            gross_profit / gross_loss
        } else if gross_profit > 0.0 {
            f64::INFINITY
        } else {
            0.0
        };

        Metrics {
            total_return_pct,
            final_balance,
            sharpe_ratio: compute_sharpe(&observed),
            max_drawdown_pct: compute_max_drawdown(starting_balance, &balances) * 100.0,
            win_rate_pct: compute_win_rate(&returns),
            number_of_trades: trades.len(),
            trades_won,
            trades_lost,
            profit_factor,
            total_pips,
            total_pnl: gross_profit - gross_loss,
            market_return_pct: compute_market_return(bars),
        }
    }
}

/// Compound `returns` from `start`, flooring the balance at zero.
pub fn balance_path(returns: &[f64], start: f64) -> Vec<f64> {
    let mut balance = start;
    returns
        .iter()
        .map(|r| {
            balance = (balance * (1.0 + r)).max(0.0);
            balance
        })
        .collect()
}

/// Per-bar returns and balances of a fresh account opened at `start`:
/// `balance[t] = max(balance[t-1] + lot_pnl[t], 0)`, with no further P&L
/// once the balance reaches zero.
pub fn account_path(bars: &[SimulatedBar], start: f64) -> (Vec<f64>, Vec<f64>) {
    let mut balance = start;
    bars.iter()
        .map(|b| {
            let prev = balance;
            if prev > 0.0 {
                balance = (prev + b.lot_pnl).max(0.0);
            }
            let r = if prev > 0.0 { (balance - prev) / prev } else { 0.0 };
            (r, balance)
        })
        .unzip()
}

/// Most negative (balance - running_peak) / running_peak, as a fraction ≤ 0.
/// The starting balance seeds the running peak.
pub fn compute_max_drawdown(start: f64, balances: &[f64]) -> f64 {
    let mut peak = start;
    let mut max_dd = 0.0_f64;

    for &balance in balances {
        if balance > peak {
            peak = balance;
        }
        if peak > 0.0 {
            let dd = (balance - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }

    max_dd
}

/// sqrt(252) × mean / sample stddev; 0 with fewer than two bars or zero deviation.
pub fn compute_sharpe(returns: &[f64]) -> f64 {
    if returns.len() < 2 {
        return 0.0;
    }

    let n = returns.len() as f64;
    let mean = returns.iter().sum::<f64>() / n;
    let variance = returns.iter().map(|r| (r - mean).powi(2)).sum::<f64>() / (n - 1.0);
    let stddev = variance.sqrt();

    if stddev > 0.0 && stddev.is_finite() {
        TRADING_DAYS_PER_YEAR.sqrt() * mean / stddev
    } else {
        0.0
    }
}

/// Share of active bars (non-zero return) that made money; FLAT bars are excluded.
pub fn compute_win_rate(returns: &[f64]) -> f64 {
    let active = returns.iter().filter(|&&r| r != 0.0).count();
    if active == 0 {
        return 0.0;
    }
    let wins = returns.iter().filter(|&&r| r > 0.0).count();
    wins as f64 / active as f64 * 100.0
}

/// (Π(1 + period_return) − 1) × 100, skipping the undefined first return.
pub fn compute_market_return(bars: &[SimulatedBar]) -> f64 {
    let growth: f64 = bars
        .iter()
        .map(|b| b.period_return)
        .filter(|r| r.is_finite())
        .map(|r| 1.0 + r)
        .product();
    (growth - 1.0) * 100.0
}
