//! VWAP (Volume-Weighted Average Price)

use crate::models::market::Candle;

/// Cumulative typical-price·volume over cumulative volume.
///
/// `None` while cumulative volume is still zero.
pub fn vwap(candles: &[Candle]) -> Vec<Option<f64>> {
    let mut out = vec![None; candles.len()];
    let mut pv_sum = 0.0;
    let mut volume_sum = 0.0;

    for (i, candle) in candles.iter().enumerate() {
        pv_sum += candle.typical_price() * candle.volume;
        volume_sum += candle.volume;
        if volume_sum > 0.0 {
            out[i] = Some(pv_sum / volume_sum);
        }
    }

    out
}
