//! MACD (Moving Average Convergence Divergence)

use crate::indicators::trend::ema;

/// MACD line, signal line, and histogram, index-aligned with the input.
#[derive(Debug, Clone)]
pub struct MacdSeries {
    pub macd: Vec<Option<f64>>,
    pub signal: Vec<Option<f64>>,
    pub histogram: Vec<Option<f64>>,
}

/// MACD = EMA(fast) - EMA(slow); signal = EMA(signal_period) of the MACD
/// line; histogram = MACD - signal.
pub fn macd(
    values: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> MacdSeries {
    let fast = ema(values, fast_period);
    let slow = ema(values, slow_period);

    let macd_line: Vec<Option<f64>> = fast
        .iter()
        .zip(slow.iter())
        .map(|(f, s)| match (f, s) {
            (Some(f), Some(s)) => Some(f - s),
            _ => None,
        })
        .collect();

    // Signal EMA runs over the defined portion of the MACD line and is
    // placed back at the matching indices.
    let first_defined = macd_line.iter().position(|v| v.is_some());
    let mut signal_line = vec![None; values.len()];
    if let Some(offset) = first_defined {
        let defined: Vec<f64> = macd_line[offset..].iter().flatten().copied().collect();
        for (i, v) in ema(&defined, signal_period).into_iter().enumerate() {
            signal_line[offset + i] = v;
        }
    }

    let histogram: Vec<Option<f64>> = macd_line
        .iter()
        .zip(signal_line.iter())
        .map(|(m, s)| match (m, s) {
            (Some(m), Some(s)) => Some(m - s),
            _ => None,
        })
        .collect();

    MacdSeries {
        macd: macd_line,
        signal: signal_line,
        histogram,
    }
}
