//! Price data access port.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::PriceBar;
use chrono::NaiveDate;

pub trait DataPort {
    /// Daily bars for `pair`, ascending by date, optionally limited to the
    /// inclusive `[start, end]` range. An unknown pair or an empty result is
    /// `DataUnavailable`.
    fn fetch_prices(
        &self,
        pair: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, BacktestError>;

    fn list_pairs(&self) -> Result<Vec<String>, BacktestError>;
}
