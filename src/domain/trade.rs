//! Trade reconstruction for reporting.
//!
//! Trades are not tracked by the simulator. They are rebuilt afterwards by
//! pairing each bar that carries a non-FLAT signal with the next such bar:
//! the first is the entry, the second is the exit. Every active bar except
//! the last therefore opens exactly one trade.

use crate::domain::signal::Signal;
use crate::domain::simulator::{ExecutionModel, SimulatedBar};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct Trade {
    pub entry_date: NaiveDate,
    pub exit_date: NaiveDate,
    pub direction: Signal,
    pub entry_price: f64,
    pub exit_price: f64,
    pub pips: f64,
    pub pnl: f64,
}

impl Trade {
    pub fn holding_days(&self) -> i64 {
        (self.exit_date - self.entry_date).num_days()
    }
}

pub fn reconstruct_trades(
    bars: &[SimulatedBar],
    model: &ExecutionModel,
    initial_capital: f64,
    pip_size: f64,
) -> Vec<Trade> {
    let active: Vec<&SimulatedBar> = bars.iter().filter(|b| b.signal.is_active()).collect();

    active
        .windows(2)
        .map(|pair| {
            let (entry, exit) = (pair[0], pair[1]);
            let direction = entry.signal;
            let dir = direction.as_f64();
            let pips = if pip_size > 0.0 {
                dir * (exit.price - entry.price) / pip_size
            } else {
                0.0
            };
            Trade {
                entry_date: entry.date,
                exit_date: exit.date,
                direction,
                entry_price: entry.price,
                exit_price: exit.price,
                pips,
                pnl: model.trade_pnl(dir, entry.price, exit.price, initial_capital),
            }
        })
        .collect()
}
