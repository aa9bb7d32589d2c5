//! Result export port.

use crate::domain::backtest::BacktestResult;
use crate::domain::error::BacktestError;

pub trait ReportPort {
    /// Train and test trades of one or more runs, each row tagged with its
    /// pair and split.
    fn write_trades(
        &self,
        results: &[&BacktestResult],
        output_path: &str,
    ) -> Result<(), BacktestError>;

    /// The full simulated table of one run, one row per bar.
    fn write_series(&self, result: &BacktestResult, output_path: &str) -> Result<(), BacktestError>;
}
