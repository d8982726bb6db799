//! Signal classification.
//!
//! Maps an indicator snapshot to a raw trading signal according to the
//! configured decision mode:
//! - `Passive` (A): observation only, always HOLD
//! - `Reversal` (B): oversold RSI with a rising EMA buys, overbought with a
//!   falling EMA sells
//! - `Momentum` (C): strong RSI with a rising EMA buys, weak RSI with a
//!   falling EMA sells
//!
//! A snapshot with any missing indicator is always HOLD.

use std::fmt;
use std::str::FromStr;

use super::indicator::IndicatorSnapshot;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Signal {
    Buy,
    Sell,
    Hold,
}

impl Signal {
    pub fn is_actionable(&self) -> bool {
        !matches!(self, Signal::Hold)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Signal::Buy => write!(f, "BUY"),
            Signal::Sell => write!(f, "SELL"),
            Signal::Hold => write!(f, "HOLD"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionMode {
    Passive,
    Reversal,
    #[default]
    Momentum,
}

impl DecisionMode {
    pub fn code(&self) -> char {
        match self {
            DecisionMode::Passive => 'A',
            DecisionMode::Reversal => 'B',
            DecisionMode::Momentum => 'C',
        }
    }
}

impl fmt::Display for DecisionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DecisionMode::Passive => "passive",
            DecisionMode::Reversal => "reversal",
            DecisionMode::Momentum => "momentum",
        };
        write!(f, "{} ({})", self.code(), name)
    }
}

impl FromStr for DecisionMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" | "PASSIVE" => Ok(DecisionMode::Passive),
            "B" | "REVERSAL" | "SEMI" => Ok(DecisionMode::Reversal),
            "C" | "MOMENTUM" | "AGGRESSIVE" => Ok(DecisionMode::Momentum),
            other => Err(format!("unknown decision mode '{other}' (expected A, B or C)")),
        }
    }
}

/// RSI levels used by the classifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SignalThresholds {
    pub buy_rsi: f64,
    pub sell_rsi: f64,
    pub oversold_rsi: f64,
    pub overbought_rsi: f64,
}

impl Default for SignalThresholds {
    fn default() -> Self {
        SignalThresholds {
            buy_rsi: 60.0,
            sell_rsi: 40.0,
            oversold_rsi: 30.0,
            overbought_rsi: 70.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Classification {
    pub signal: Signal,
    pub reason: String,
}

impl Classification {
    fn new(signal: Signal, reason: impl Into<String>) -> Self {
        Classification {
            signal,
            reason: reason.into(),
        }
    }
}

pub fn classify(
    snapshot: &IndicatorSnapshot,
    mode: DecisionMode,
    thresholds: &SignalThresholds,
) -> Classification {
    let (rsi, fast, slow) = match (snapshot.rsi, snapshot.ema_fast, snapshot.ema_slow) {
        (Some(rsi), Some(fast), Some(slow)) => (rsi, fast, slow),
        _ => return Classification::new(Signal::Hold, "indicators unavailable"),
    };

    match mode {
        DecisionMode::Passive => Classification::new(Signal::Hold, "passive mode, observing only"),
        DecisionMode::Momentum => {
            if rsi > thresholds.buy_rsi && fast > slow {
                Classification::new(
                    Signal::Buy,
                    format!("RSI above {} with rising EMA", thresholds.buy_rsi),
                )
            } else if rsi < thresholds.sell_rsi && fast < slow {
                Classification::new(
                    Signal::Sell,
                    format!("RSI below {} with falling EMA", thresholds.sell_rsi),
                )
            } else {
                Classification::new(Signal::Hold, "no momentum condition met")
            }
        }
        DecisionMode::Reversal => {
            if rsi < thresholds.oversold_rsi && fast > slow {
                Classification::new(Signal::Buy, "RSI oversold with rising EMA")
            } else if rsi > thresholds.overbought_rsi && fast < slow {
                Classification::new(Signal::Sell, "RSI overbought with falling EMA")
            } else {
                Classification::new(Signal::Hold, "no reversal condition met")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(rsi: f64, fast: f64, slow: f64) -> IndicatorSnapshot {
        IndicatorSnapshot {
            rsi: Some(rsi),
            ema_fast: Some(fast),
            ema_slow: Some(slow),
        }
    }

    fn momentum(s: &IndicatorSnapshot) -> Signal {
        classify(s, DecisionMode::Momentum, &SignalThresholds::default()).signal
    }

    #[test]
    fn signal_display() {
        assert_eq!(Signal::Buy.to_string(), "BUY");
        assert_eq!(Signal::Sell.to_string(), "SELL");
        assert_eq!(Signal::Hold.to_string(), "HOLD");
    }

    #[test]
    fn momentum_buy() {
        assert_eq!(momentum(&snapshot(65.0, 105.0, 100.0)), Signal::Buy);
    }

    #[test]
    fn momentum_sell() {
        assert_eq!(momentum(&snapshot(35.0, 95.0, 100.0)), Signal::Sell);
    }

    #[test]
    fn momentum_boundaries_are_exclusive() {
        assert_eq!(momentum(&snapshot(60.0, 105.0, 100.0)), Signal::Hold);
        assert_eq!(momentum(&snapshot(40.0, 95.0, 100.0)), Signal::Hold);
    }

    #[test]
    fn momentum_mixed_conditions_hold() {
        assert_eq!(momentum(&snapshot(65.0, 95.0, 100.0)), Signal::Hold);
        assert_eq!(momentum(&snapshot(35.0, 105.0, 100.0)), Signal::Hold);
    }

    #[test]
    fn equal_emas_hold_even_when_rsi_saturated() {
        assert_eq!(momentum(&snapshot(100.0, 100.0, 100.0)), Signal::Hold);
    }

    #[test]
    fn missing_indicator_forces_hold() {
        let s = IndicatorSnapshot {
            rsi: Some(90.0),
            ema_fast: Some(110.0),
            ema_slow: None,
        };
        let c = classify(&s, DecisionMode::Momentum, &SignalThresholds::default());
        assert_eq!(c.signal, Signal::Hold);
        assert_eq!(c.reason, "indicators unavailable");
    }

    #[test]
    fn reversal_mode() {
        let t = SignalThresholds::default();
        let buy = classify(&snapshot(25.0, 105.0, 100.0), DecisionMode::Reversal, &t);
        let sell = classify(&snapshot(75.0, 95.0, 100.0), DecisionMode::Reversal, &t);
        let hold = classify(&snapshot(65.0, 105.0, 100.0), DecisionMode::Reversal, &t);
        assert_eq!(buy.signal, Signal::Buy);
        assert_eq!(sell.signal, Signal::Sell);
        assert_eq!(hold.signal, Signal::Hold);
    }

    #[test]
    fn passive_mode_always_holds() {
        let t = SignalThresholds::default();
        let c = classify(&snapshot(90.0, 120.0, 100.0), DecisionMode::Passive, &t);
        assert_eq!(c.signal, Signal::Hold);
    }

    #[test]
    fn custom_thresholds() {
        let t = SignalThresholds {
            buy_rsi: 80.0,
            ..SignalThresholds::default()
        };
        let c = classify(&snapshot(70.0, 105.0, 100.0), DecisionMode::Momentum, &t);
        assert_eq!(c.signal, Signal::Hold);
    }

    #[test]
    fn decision_mode_parsing() {
        assert_eq!("a".parse::<DecisionMode>(), Ok(DecisionMode::Passive));
        assert_eq!(" B ".parse::<DecisionMode>(), Ok(DecisionMode::Reversal));
        assert_eq!("C".parse::<DecisionMode>(), Ok(DecisionMode::Momentum));
        assert_eq!("momentum".parse::<DecisionMode>(), Ok(DecisionMode::Momentum));
        assert!("Z".parse::<DecisionMode>().is_err());
    }

    #[test]
    fn decision_mode_display() {
        assert_eq!(DecisionMode::Momentum.to_string(), "C (momentum)");
        assert_eq!(DecisionMode::default(), DecisionMode::Momentum);
    }

    #[test]
    fn hold_is_not_actionable() {
        assert!(Signal::Buy.is_actionable());
        assert!(Signal::Sell.is_actionable());
        assert!(!Signal::Hold.is_actionable());
    }
}
