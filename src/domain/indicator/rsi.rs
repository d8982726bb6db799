//! RSI (Relative Strength Index) indicator.
//!
//! Looks at the first n price changes of the supplied window (callers slice
//! the window if they want a trailing one). A positive change counts as a
//! gain; anything else, flat moves included, counts as a loss. Each side is
//! averaged over its own entries, an empty side averaging 0.
//!
//! Formula: RSI = 100 - (100 / (1 + avg_gain / avg_loss))
//! If avg_loss == 0: RSI = 100
//!
//! Requires n + 1 prices; the result is rounded to 2 decimals.

use super::round2;

pub const DEFAULT_RSI_PERIOD: usize = 14;

pub fn calculate_rsi(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period + 1 {
        return None;
    }

    let mut gains: Vec<f64> = Vec::with_capacity(period);
    let mut losses: Vec<f64> = Vec::with_capacity(period);

    for window in prices[..=period].windows(2) {
        let change = window[1] - window[0];
        if change > 0.0 {
            gains.push(change);
        } else {
            losses.push(change.abs());
        }
    }

    let avg_gain = average(&gains);
    let avg_loss = average(&losses);

    if avg_loss == 0.0 {
        return Some(100.0);
    }

    Some(round2(100.0 - (100.0 / (1.0 + avg_gain / avg_loss))))
}

fn average(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
