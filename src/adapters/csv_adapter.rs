//! Local CSV price loader.
//!
//! Pair `EURUSD=X` is read from `<dir>/EURUSD.csv`. Columns are located by
//! header name, so Yahoo-style exports (`Date,Open,High,Low,Close,Adj Close,Volume`)
//! and minimal `Date,Close` files both load.

use crate::domain::error::BacktestError;
use crate::domain::ohlcv::PriceBar;
use crate::domain::universe::base_symbol;
use crate::ports::data_port::DataPort;
use chrono::NaiveDate;
use std::collections::HashSet;
use std::fs;
use std::path::PathBuf;

pub struct CsvAdapter {
    base_path: PathBuf,
}

#[derive(Debug, Default)]
struct Columns {
    date: usize,
    open: Option<usize>,
    high: Option<usize>,
    low: Option<usize>,
    close: usize,
    adj_close: Option<usize>,
    volume: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &csv::StringRecord) -> Option<Self> {
        let mut date = None;
        let mut close = None;
        let mut cols = Columns::default();

        for (i, header) in headers.iter().enumerate() {
            let key: String = header
                .chars()
                .filter(|c| !c.is_whitespace() && *c != '_')
                .collect::<String>()
                .to_lowercase();
            match key.as_str() {
                "date" | "datetime" => date = Some(i),
                "open" => cols.open = Some(i),
                "high" => cols.high = Some(i),
                "low" => cols.low = Some(i),
                "close" => close = Some(i),
                "adjclose" | "price" => cols.adj_close = Some(i),
                "volume" => cols.volume = Some(i),
                _ => {}
            }
        }

        cols.date = date?;
        // A file with only an adjusted column still has a usable price.
        cols.close = close.or(cols.adj_close)?;
        Some(cols)
    }
}

impl CsvAdapter {
    pub fn new(base_path: PathBuf) -> Self {
        Self { base_path }
    }

    fn csv_path(&self, pair: &str) -> PathBuf {
        self.base_path.join(format!("{}.csv", base_symbol(pair)))
    }
}

fn unavailable(pair: &str, reason: impl Into<String>) -> BacktestError {
    BacktestError::DataUnavailable {
        pair: pair.to_string(),
        reason: reason.into(),
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .or_else(|| raw.get(..10).and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok()))
}

/// `None` for an empty or `null` cell.
fn parse_field(
    pair: &str,
    record: &csv::StringRecord,
    idx: usize,
    name: &str,
) -> Result<Option<f64>, BacktestError> {
    let raw = record.get(idx).unwrap_or("").trim();
    if raw.is_empty() || raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    raw.parse::<f64>()
        .map(Some)
        .map_err(|e| unavailable(pair, format!("invalid {} value '{}': {}", name, raw, e)))
}

impl DataPort for CsvAdapter {
    fn fetch_prices(
        &self,
        pair: &str,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<PriceBar>, BacktestError> {
        let path = self.csv_path(pair);
        let content = fs::read_to_string(&path)
            .map_err(|e| unavailable(pair, format!("failed to read {}: {}", path.display(), e)))?;

        let mut rdr = csv::Reader::from_reader(content.as_bytes());
        let headers = rdr
            .headers()
            .map_err(|e| unavailable(pair, format!("CSV parse error: {}", e)))?
            .clone();
        let cols = Columns::from_headers(&headers)
            .ok_or_else(|| unavailable(pair, "CSV needs a Date and a Close column"))?;

        let mut bars = Vec::new();
        let mut seen = HashSet::new();

        for result in rdr.records() {
            let record =
                result.map_err(|e| unavailable(pair, format!("CSV parse error: {}", e)))?;

            let date_str = record.get(cols.date).unwrap_or("");
            let date = parse_date(date_str)
                .ok_or_else(|| unavailable(pair, format!("invalid date '{}'", date_str)))?;

            if start.is_some_and(|s| date < s) || end.is_some_and(|e| date > e) {
                continue;
            }

            // Rows without a close are market holidays in Yahoo exports.
            let Some(close) = parse_field(pair, &record, cols.close, "close")? else {
                continue;
            };
            let field = |idx: Option<usize>, name: &str| -> Result<Option<f64>, BacktestError> {
                match idx {
                    Some(i) => parse_field(pair, &record, i, name),
                    None => Ok(None),
                }
            };
            let open = field(cols.open, "open")?.unwrap_or(close);
            let high = field(cols.high, "high")?.unwrap_or(close);
            let low = field(cols.low, "low")?.unwrap_or(close);
            let adj_close = field(cols.adj_close, "adj close")?;
            let volume = field(cols.volume, "volume")?.map(|v| v as i64);

            if !seen.insert(date) {
                return Err(unavailable(pair, format!("duplicate date {}", date)));
            }

            bars.push(PriceBar::new(date, open, high, low, close, adj_close, volume));
        }

        if bars.is_empty() {
            return Err(unavailable(pair, "no rows in the requested range"));
        }

        bars.sort_by_key(|b| b.date);
        Ok(bars)
    }

    fn list_pairs(&self) -> Result<Vec<String>, BacktestError> {
        let entries = fs::read_dir(&self.base_path)?;

        let mut pairs = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("csv")) {
                if let Some(stem) = path.file_stem() {
                    pairs.push(format!("{}=X", stem.to_string_lossy().to_uppercase()));
                }
            }
        }

        pairs.sort();
        Ok(pairs)
    }
}
