//! EMA (Exponential Moving Average)

/// Exponential moving average seeded with the simple average of the first
/// `period` values.
///
/// Recurrence: `ema[i] = (price[i] - ema[i-1]) * (2 / (period + 1)) + ema[i-1]`.
/// The first `period - 1` entries are `None`.
pub fn ema(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    let seed: f64 = values[..period].iter().sum::<f64>() / period as f64;
    let multiplier = 2.0 / (period as f64 + 1.0);

    let mut prev = seed;
    out[period - 1] = Some(seed);

    for i in period..values.len() {
        prev = (values[i] - prev) * multiplier + prev;
        out[i] = Some(prev);
    }

    out
}
