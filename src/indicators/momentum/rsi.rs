//! RSI (Relative Strength Index)

/// RSI over a trailing window of `period` first differences.
///
/// RSI = 100 - 100 / (1 + avg_gain / avg_loss), and 100 when the average
/// loss is zero. Defined from index `period` onward (one extra value is
/// needed for the first difference).
pub fn rsi(values: &[f64], period: usize) -> Vec<Option<f64>> {
    let mut out = vec![None; values.len()];
    if period == 0 || values.len() <= period {
        return out;
    }

    for i in period..values.len() {
        let mut gain_sum = 0.0;
        let mut loss_sum = 0.0;
        for j in (i - period + 1)..=i {
            let change = values[j] - values[j - 1];
            if change > 0.0 {
                gain_sum += change;
            } else {
                loss_sum += -change;
            }
        }

        let avg_gain = gain_sum / period as f64;
        let avg_loss = loss_sum / period as f64;

        out[i] = Some(if avg_loss == 0.0 {
            100.0
        } else {
            100.0 - 100.0 / (1.0 + avg_gain / avg_loss)
        });
    }

    out
}
