//! Bollinger Bands indicator.
//!
//! Bollinger Bands consist of:
//! - Middle: Simple Moving Average (SMA) over n periods
//! - Upper: Middle + (multiplier × StdDev)
//! - Lower: Middle - (multiplier × StdDev)
//!
//! Where StdDev is the sample standard deviation (divides by N-1).
//!
//! Default parameters: period=20, multiplier=2.0
//! Warmup: first (period-1) bars are NaN.

use crate::domain::indicator::rolling::{rolling_mean, rolling_std};

#[derive(Debug, Clone, PartialEq)]
pub struct BollingerColumns {
    pub upper: Vec<f64>,
    pub middle: Vec<f64>,
    pub lower: Vec<f64>,
    /// Rolling sample deviation behind the band width.
    pub std: Vec<f64>,
}

pub fn calculate_bollinger(prices: &[f64], period: usize, num_std: f64) -> BollingerColumns {
    let middle = rolling_mean(prices, period);
    let std = rolling_std(prices, period);

    let upper = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| m + num_std * s)
        .collect();
    let lower = middle
        .iter()
        .zip(&std)
        .map(|(m, s)| m - num_std * s)
        .collect();

    BollingerColumns {
        upper,
        middle,
        lower,
        std,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn bollinger_warmup() {
        let cols = calculate_bollinger(&[10.0, 20.0, 30.0, 40.0, 50.0], 3, 2.0);
        assert!(cols.middle[0].is_nan());
        assert!(cols.upper[1].is_nan());
        assert!(cols.lower[1].is_nan());
        assert!(!cols.middle[2].is_nan());
        assert!(!cols.upper[4].is_nan());
    }

    #[test]
    fn bollinger_constant_values_collapse() {
        let cols = calculate_bollinger(&[1.25; 6], 3, 2.0);
        for i in 2..6 {
            assert_eq!(cols.upper[i], 1.25);
            assert_eq!(cols.middle[i], 1.25);
            assert_eq!(cols.lower[i], 1.25);
            assert_eq!(cols.std[i], 0.0);
        }
    }

    #[test]
    fn bollinger_basic_calculation() {
        let cols = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 2.0);
        // sample std of 10,20,30 = 10
        assert_relative_eq!(cols.middle[2], 20.0);
        assert_relative_eq!(cols.upper[2], 40.0, epsilon = 1e-10);
        assert_relative_eq!(cols.lower[2], 0.0, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_multiplier_variations() {
        let cols = calculate_bollinger(&[10.0, 20.0, 30.0], 3, 1.5);
        assert_relative_eq!(cols.upper[2], 35.0, epsilon = 1e-10);
        assert_relative_eq!(cols.lower[2], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn bollinger_symmetry() {
        let cols = calculate_bollinger(&[1.1, 1.3, 1.2, 1.4, 1.0], 4, 2.0);
        for i in 3..5 {
            let up = cols.upper[i] - cols.middle[i];
            let down = cols.middle[i] - cols.lower[i];
            assert_relative_eq!(up, down, epsilon = 1e-12);
        }
    }

    #[test]
    fn bollinger_zero_multiplier_collapses_to_middle() {
        let cols = calculate_bollinger(&[1.1, 1.3, 1.2, 1.4], 3, 0.0);
        assert_eq!(cols.upper[3], cols.middle[3]);
        assert_eq!(cols.lower[3], cols.middle[3]);
    }
}
