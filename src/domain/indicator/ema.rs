//! Exponential Moving Average.
//!
//! k = 2/(span+1), seeded with the first defined value, then
//! EMA[i] = X[i]*k + EMA[i-1]*(1-k). No bias-adjustment correction is applied.
//! There is no warmup: the output is defined from the first defined input.
//! Leading NaNs stay NaN; an interior NaN carries the previous EMA forward.

pub fn calculate_ema(values: &[f64], span: usize) -> Vec<f64> {
    if span == 0 {
        return vec![f64::NAN; values.len()];
    }

    let k = 2.0 / (span as f64 + 1.0);
    let mut ema: Option<f64> = None;

    values
        .iter()
        .map(|&x| {
            ema = match ema {
                None if x.is_nan() => None,
                None => Some(x),
                Some(prev) if x.is_nan() => Some(prev),
                Some(prev) => Some(x * k + prev * (1.0 - k)),
            };
            ema.unwrap_or(f64::NAN)
        })
        .collect()
}
