//! Position simulation with a one-bar execution lag.
//!
//! The position held over bar `t` is the signal of bar `t-1`, so a bar's own
//! signal never touches that bar's return.

use crate::domain::indicator::IndicatorFrame;
use crate::domain::signal::Signal;
use chrono::NaiveDate;

/// How signals are turned into returns.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ExecutionModel {
    /// Pure return-multiple tracking: strategy_return = position × period_return.
    Percentage,
    /// Fixed currency-lot sizing against an account balance floored at zero.
    Account {
        lot_size: f64,
        conversion_rate: f64,
    },
}

impl ExecutionModel {
    /// Currency P&L of holding `direction` from `entry` to `exit`.
    pub fn trade_pnl(&self, direction: f64, entry: f64, exit: f64, initial_capital: f64) -> f64 {
        match *self {
            ExecutionModel::Percentage => {
                if entry == 0.0 {
                    0.0
                } else {
                    direction * (exit / entry - 1.0) * initial_capital
                }
            }
            ExecutionModel::Account {
                lot_size,
                conversion_rate,
            } => direction * lot_size * (exit - entry) / conversion_rate,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SimulatedBar {
    pub date: NaiveDate,
    pub price: f64,
    pub signal: Signal,
    /// Signal of the previous bar; what is actually held over this bar.
    pub position: Signal,
    /// Units requested by this bar's signal (±lot size, or ±1 in the percentage model).
    pub position_units: f64,
    /// `NaN` on the first bar.
    pub period_return: f64,
    /// Account model: currency P&L of the previous bar's units over this
    /// bar, whatever the account balance. Zero in the percentage model.
    pub lot_pnl: f64,
    /// P&L actually booked to this series' account; zero once it is empty.
    pub pnl: f64,
    pub strategy_return: f64,
    pub cumulative_return: f64,
    pub balance: f64,
}

pub fn simulate(
    frame: &IndicatorFrame,
    signals: &[Signal],
    model: &ExecutionModel,
    initial_capital: f64,
) -> Vec<SimulatedBar> {
    let n = frame.len().min(signals.len());
    let mut out: Vec<SimulatedBar> = Vec::with_capacity(n);

    let mut cumulative = 1.0;
    let mut balance = initial_capital;

    for i in 0..n {
        let price = frame.prices[i];
        let signal = signals[i];
        let position = if i == 0 { Signal::Flat } else { signals[i - 1] };
        let period_return = if i == 0 {
            f64::NAN
        } else {
            price / frame.prices[i - 1] - 1.0
        };

        let (position_units, lot_pnl, pnl, strategy_return) = match *model {
            ExecutionModel::Percentage => {
                let r = if position.is_active() {
                    position.as_f64() * period_return
                } else {
                    0.0
                };
                let r = if r.is_finite() { r } else { 0.0 };
                let prev = balance;
                balance = initial_capital * cumulative * (1.0 + r);
                (signal.as_f64(), 0.0, balance - prev, r)
            }
            ExecutionModel::Account {
                lot_size,
                conversion_rate,
            } => {
                let units = signal.as_f64() * lot_size;
                let prev = balance;
                let lot_pnl = match out.last() {
                    Some(last) => last.position_units * (price - last.price) / conversion_rate,
                    None => 0.0,
                };
                let lot_pnl = if lot_pnl.is_finite() { lot_pnl } else { 0.0 };
                let pnl = if prev > 0.0 { lot_pnl } else { 0.0 };
                balance = (prev + pnl).max(0.0);
                let r = if prev == 0.0 { 0.0 } else { pnl / prev };
                (units, lot_pnl, pnl, if r.is_finite() { r } else { 0.0 })
            }
        };

        cumulative = match *model {
            ExecutionModel::Percentage => cumulative * (1.0 + strategy_return),
            ExecutionModel::Account { .. } => {
                if initial_capital > 0.0 {
                    balance / initial_capital
                } else {
                    0.0
                }
            }
        };

        out.push(SimulatedBar {
            date: frame.bars[i].date,
            price,
            signal,
            position,
            position_units,
            period_return,
            lot_pnl,
            pnl,
            strategy_return,
            cumulative_return: cumulative,
            balance,
        });
    }

    out
}
