//! CSV export of trade lists and simulated series.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;
use crate::ports::report_port::ReportPort;
use std::fs::File;

const TRADE_HEADER: [&str; 10] = [
    "pair",
    "split",
    "entry_date",
    "exit_date",
    "direction",
    "entry_price",
    "exit_price",
    "pips",
    "pnl",
    "holding_days",
];

const SERIES_HEADER: [&str; 11] = [
    "date",
    "split",
    "price",
    "signal",
    "position",
    "period_return",
    "strategy_return",
    "cumulative_return",
    "balance",
    "pnl",
    "indicator",
];

pub struct CsvReportAdapter;

fn export_error(path: &str, e: impl std::fmt::Display) -> BacktestError {
    BacktestError::Export {
        path: path.to_string(),
        reason: e.to_string(),
    }
}

/// Empty cell for undefined values.
fn num(value: f64) -> String {
    if value.is_nan() {
        String::new()
    } else {
        format!("{}", value)
    }
}

fn writer(path: &str) -> Result<csv::Writer<File>, BacktestError> {
    let file = File::create(path).map_err(|e| export_error(path, e))?;
    Ok(csv::Writer::from_writer(file))
}

impl ReportPort for CsvReportAdapter {
    fn write_trades(
        &self,
        results: &[&BacktestResult],
        output_path: &str,
    ) -> Result<(), BacktestError> {
        let mut wtr = writer(output_path)?;
        wtr.write_record(TRADE_HEADER)
            .map_err(|e| export_error(output_path, e))?;

        for result in results {
            for (label, trade) in result.labeled_trades() {
                wtr.write_record([
                    result.pair.clone(),
                    label.to_string(),
                    trade.entry_date.to_string(),
                    trade.exit_date.to_string(),
                    trade.direction.to_string(),
                    num(trade.entry_price),
                    num(trade.exit_price),
                    format!("{:.1}", trade.pips),
                    format!("{:.2}", trade.pnl),
                    trade.holding_days().to_string(),
                ])
                .map_err(|e| export_error(output_path, e))?;
            }
        }

        wtr.flush().map_err(|e| export_error(output_path, e))
    }

    fn write_series(&self, result: &BacktestResult, output_path: &str) -> Result<(), BacktestError> {
        let mut wtr = writer(output_path)?;
        wtr.write_record(SERIES_HEADER)
            .map_err(|e| export_error(output_path, e))?;

        let boundary = result.test.start_index;
        let primary = result.frame.primary_column();

        for (i, bar) in result.bars.iter().enumerate() {
            let split = if i < boundary { "train" } else { "test" };
            let indicator = primary.and_then(|col| col.get(i)).copied().unwrap_or(f64::NAN);
            wtr.write_record([
                bar.date.to_string(),
                split.to_string(),
                num(bar.price),
                bar.signal.to_string(),
                bar.position.to_string(),
                num(bar.period_return),
                num(bar.strategy_return),
                num(bar.cumulative_return),
                format!("{:.2}", bar.balance),
                format!("{:.2}", bar.pnl),
                num(indicator),
            ])
            .map_err(|e| export_error(output_path, e))?;
        }

        wtr.flush().map_err(|e| export_error(output_path, e))
    }
}
