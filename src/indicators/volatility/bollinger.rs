//! Bollinger Bands

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BollingerBand {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
}

/// Middle band = SMA(period); upper/lower = middle ± k · population stddev
/// of the same window. The first `period - 1` entries are `None`.
pub fn bollinger(values: &[f64], period: usize, k: f64) -> Vec<Option<BollingerBand>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() < period {
        return out;
    }

    for i in (period - 1)..values.len() {
        let window = &values[i + 1 - period..=i];
        let middle = window.iter().sum::<f64>() / period as f64;
        let variance =
            window.iter().map(|v| (v - middle).powi(2)).sum::<f64>() / period as f64;
        let std = variance.sqrt();
        out[i] = Some(BollingerBand {
            upper: middle + k * std,
            middle,
            lower: middle - k * std,
        });
    }

    out
}
