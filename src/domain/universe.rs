//! Currency-pair universe for multi-pair runs.
//!
//! The default pair list and pip-size rules are fixed; pair lists from
//! configuration are parsed here.

use std::collections::HashSet;

pub const DEFAULT_PAIRS: [&str; 5] = ["EURUSD=X", "GBPUSD=X", "AUDUSD=X", "USDCAD=X", "USDJPY=X"];

pub const JPY_PIP_SIZE: f64 = 0.01;
pub const STANDARD_PIP_SIZE: f64 = 0.0001;

#[derive(Debug, Clone, PartialEq)]
pub struct Universe {
    pub pairs: Vec<String>,
}

impl Universe {
    pub fn count(&self) -> usize {
        self.pairs.len()
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self {
            pairs: DEFAULT_PAIRS.iter().map(|p| p.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum UniverseError {
    #[error("empty token in pair list")]
    EmptyToken,

    #[error("duplicate pair: {0}")]
    DuplicatePair(String),
}

pub fn parse_pairs(input: &str) -> Result<Vec<String>, UniverseError> {
    let mut pairs = Vec::new();
    let mut seen = HashSet::new();

    for token in input.split(',') {
        let trimmed = token.trim();
        if trimmed.is_empty() {
            return Err(UniverseError::EmptyToken);
        }
        let pair = trimmed.to_uppercase();
        if !seen.insert(pair.clone()) {
            return Err(UniverseError::DuplicatePair(pair));
        }
        pairs.push(pair);
    }

    Ok(pairs)
}

/// Pair symbol without the `=X` quote suffix, e.g. `EURUSD`.
pub fn base_symbol(pair: &str) -> &str {
    pair.strip_suffix("=X")
        .or_else(|| pair.strip_suffix("=x"))
        .unwrap_or(pair)
}

/// JPY-quoted pairs move in hundredths; everything else in ten-thousandths.
pub fn pip_size_for(pair: &str) -> f64 {
    let symbol = base_symbol(pair).to_uppercase();
    if symbol.ends_with("JPY") {
        JPY_PIP_SIZE
    } else {
        STANDARD_PIP_SIZE
    }
}
