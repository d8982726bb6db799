//! Technical indicator implementations.
//!
//! This module provides:
//! - `IndicatorType`: indicator identity + parameters, used in reasons and logs
//! - `IndicatorPeriods`: the configured lookbacks
//! - `IndicatorSnapshot`: the values derived fresh from one price series
//!
//! Each indicator returns `None` when the series is shorter than its lookback.

pub mod ema;
pub mod rsi;

use std::fmt;

use self::ema::calculate_ema;
use self::rsi::calculate_rsi;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorType {
    Ema(usize),
    Rsi(usize),
}

impl IndicatorType {
    /// Number of prices needed before the indicator yields a value.
    pub fn lookback(&self) -> usize {
        match self {
            IndicatorType::Ema(period) => *period,
            IndicatorType::Rsi(period) => period + 1,
        }
    }
}

impl fmt::Display for IndicatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IndicatorType::Ema(period) => write!(f, "EMA({})", period),
            IndicatorType::Rsi(period) => write!(f, "RSI({})", period),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorPeriods {
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub rsi: usize,
}

impl Default for IndicatorPeriods {
    fn default() -> Self {
        IndicatorPeriods {
            ema_fast: 10,
            ema_slow: 20,
            rsi: rsi::DEFAULT_RSI_PERIOD,
        }
    }
}

impl IndicatorPeriods {
    pub fn indicator_types(&self) -> [IndicatorType; 3] {
        [
            IndicatorType::Rsi(self.rsi),
            IndicatorType::Ema(self.ema_fast),
            IndicatorType::Ema(self.ema_slow),
        ]
    }

    /// Longest lookback among the configured indicators.
    pub fn required_prices(&self) -> usize {
        self.indicator_types()
            .iter()
            .map(IndicatorType::lookback)
            .max()
            .unwrap_or(0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct IndicatorSnapshot {
    pub rsi: Option<f64>,
    pub ema_fast: Option<f64>,
    pub ema_slow: Option<f64>,
}

impl IndicatorSnapshot {
    pub fn compute(prices: &[f64], periods: &IndicatorPeriods) -> Self {
        IndicatorSnapshot {
            rsi: calculate_rsi(prices, periods.rsi),
            ema_fast: calculate_ema(prices, periods.ema_fast),
            ema_slow: calculate_ema(prices, periods.ema_slow),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.rsi.is_some() && self.ema_fast.is_some() && self.ema_slow.is_some()
    }

    /// Indicators the series was too short for.
    pub fn missing(&self, periods: &IndicatorPeriods) -> Vec<IndicatorType> {
        let mut missing = Vec::new();
        if self.rsi.is_none() {
            missing.push(IndicatorType::Rsi(periods.rsi));
        }
        if self.ema_fast.is_none() {
            missing.push(IndicatorType::Ema(periods.ema_fast));
        }
        if self.ema_slow.is_none() {
            missing.push(IndicatorType::Ema(periods.ema_slow));
        }
        missing
    }
}

impl fmt::Display for IndicatorSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn opt(v: Option<f64>) -> String {
            v.map(|v| format!("{v:.2}")).unwrap_or_else(|| "n/a".to_string())
        }
        write!(
            f,
            "rsi={} ema_fast={} ema_slow={}",
            opt(self.rsi),
            opt(self.ema_fast),
            opt(self.ema_slow)
        )
    }
}

/// Round to 2 decimal places.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
