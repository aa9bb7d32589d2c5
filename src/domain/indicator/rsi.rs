//! RSI (Relative Strength Index) indicator.
//!
//! Uses a plain rolling mean for average gain/loss (not Wilder's smoothing):
//! - delta[i] = P[i] - P[i-1]
//! - gain = max(delta, 0), loss = max(-delta, 0)
//! - avg_gain, avg_loss = MEAN(n) of gain, loss
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Warmup: first n bars are NaN (need n price changes).

use crate::domain::indicator::rolling::rolling_mean;

pub fn calculate_rsi(prices: &[f64], period: usize) -> Vec<f64> {
    if prices.is_empty() {
        return Vec::new();
    }

    let mut gains = Vec::with_capacity(prices.len());
    let mut losses = Vec::with_capacity(prices.len());
    gains.push(f64::NAN);
    losses.push(f64::NAN);

    for w in prices.windows(2) {
        let change = w[1] - w[0];
        gains.push(change.max(0.0));
        losses.push((-change).max(0.0));
    }

    let avg_gain = rolling_mean(&gains, period);
    let avg_loss = rolling_mean(&losses, period);

    avg_gain
        .iter()
        .zip(&avg_loss)
        .map(|(&g, &l)| {
            if g.is_nan() || l.is_nan() {
                f64::NAN
            } else if l == 0.0 {
                100.0
            } else {
                100.0 - (100.0 / (1.0 + g / l))
            }
        })
        .collect()
}
