//! Exponential Moving Average indicator.
//!
//! k = 2/(n+1), seeded with the first price (not an SMA), then
//! EMA = P[i]*k + EMA*(1-k) over the remaining prices.
//! Requires at least n prices; the result is rounded to 2 decimals.

use super::round2;

pub fn calculate_ema(prices: &[f64], period: usize) -> Option<f64> {
    if period == 0 || prices.len() < period {
        return None;
    }

    let k = 2.0 / (period as f64 + 1.0);
    let mut ema = prices[0];
    for &price in &prices[1..] {
        ema = price * k + ema * (1.0 - k);
    }

    Some(round2(ema))
}
