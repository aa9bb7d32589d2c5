//! Fixed-window rolling statistics.
//!
//! MEAN(n)[i] = sum(X[i-n+1..=i]) / n
//! STD(n)[i]  = sqrt(sum((X[j] - MEAN(n)[i])^2) / (n - 1))   (sample deviation)
//!
//! Warmup: first (n-1) outputs are NaN. Any NaN inside a window makes that
//! output NaN. A one-bar window has no sample deviation, so STD(1) is NaN.
//! A window of identical values has exactly that value as its mean and an
//! exact zero deviation.

pub fn rolling_mean(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |window| {
        if is_flat(window) {
            return window[0];
        }
        window.iter().sum::<f64>() / window.len() as f64
    })
}

pub fn rolling_std(values: &[f64], period: usize) -> Vec<f64> {
    rolling(values, period, |window| {
        let n = window.len();
        if n < 2 {
            return f64::NAN;
        }
        if is_flat(window) {
            return 0.0;
        }
        let mean = window.iter().sum::<f64>() / n as f64;
        let sum_sq: f64 = window
            .iter()
            .map(|v| {
                let diff = v - mean;
                diff * diff
            })
            .sum();
        (sum_sq / (n - 1) as f64).sqrt()
    })
}

fn is_flat(window: &[f64]) -> bool {
    window.iter().all(|&v| v == window[0])
}

fn rolling<F>(values: &[f64], period: usize, stat: F) -> Vec<f64>
where
    F: Fn(&[f64]) -> f64,
{
    if period == 0 {
        return vec![f64::NAN; values.len()];
    }

    let warmup = period - 1;
    (0..values.len())
        .map(|i| {
            if i < warmup {
                return f64::NAN;
            }
            let window = &values[i + 1 - period..=i];
            if window.iter().any(|v| v.is_nan()) {
                f64::NAN
            } else {
                stat(window)
            }
        })
        .collect()
}
