//! Price bar representation.

use chrono::NaiveDate;

/// One row of the input price table. Dates are strictly increasing within a series.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub adj_close: f64,
    pub volume: Option<i64>,
}

impl PriceBar {
    /// Build a bar whose adjusted close falls back to `close` when absent.
    pub fn new(
        date: NaiveDate,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        adj_close: Option<f64>,
        volume: Option<i64>,
    ) -> Self {
        Self {
            date,
            open,
            high,
            low,
            close,
            adj_close: adj_close.unwrap_or(close),
            volume,
        }
    }

    /// The price every indicator and return is computed from.
    pub fn price(&self) -> f64 {
        self.adj_close
    }
}

/// Extract the adjusted-close column.
pub fn price_column(bars: &[PriceBar]) -> Vec<f64> {
    bars.iter().map(PriceBar::price).collect()
}

/// True when every date is strictly greater than the one before it.
pub fn dates_strictly_increasing(bars: &[PriceBar]) -> bool {
    bars.windows(2).all(|w| w[0].date < w[1].date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    #[test]
    fn adj_close_falls_back_to_close() {
        let bar = PriceBar::new(date(1), 1.10, 1.12, 1.09, 1.11, None, None);
        assert_eq!(bar.price(), 1.11);
    }

    #[test]
    fn adj_close_preferred_when_present() {
        let bar = PriceBar::new(date(1), 1.10, 1.12, 1.09, 1.11, Some(1.105), Some(10));
        assert_eq!(bar.price(), 1.105);
        assert_eq!(bar.volume, Some(10));
    }

    #[test]
    fn price_column_order() {
        let bars = vec![
            PriceBar::new(date(1), 1.0, 1.0, 1.0, 1.0, None, None),
            PriceBar::new(date(2), 2.0, 2.0, 2.0, 2.0, Some(1.5), None),
        ];
        assert_eq!(price_column(&bars), vec![1.0, 1.5]);
    }

    #[test]
    fn strictly_increasing_dates() {
        let a = PriceBar::new(date(1), 1.0, 1.0, 1.0, 1.0, None, None);
        let b = PriceBar::new(date(2), 1.0, 1.0, 1.0, 1.0, None, None);
        assert!(dates_strictly_increasing(&[a.clone(), b.clone()]));
        assert!(!dates_strictly_increasing(&[b.clone(), a]));
        assert!(!dates_strictly_increasing(&[b.clone(), b]));
        assert!(dates_strictly_increasing(&[]));
    }
}
