//! Configuration validation.
//!
//! Validates every engine setting before an engine is built. Missing keys fall
//! back to defaults; present keys must be well-formed and in range.

use crate::domain::error::StoError;
use crate::domain::signal::DecisionMode;
use crate::ports::config_port::ConfigPort;

pub const ENGINE: &str = "engine";
pub const INDICATORS: &str = "indicators";
pub const SIGNALS: &str = "signals";

/// Upper bound on the confirmation history length.
pub const MAX_HISTORY_CAPACITY: i64 = 1024;
/// Upper bound on retained decisions and trades.
pub const MAX_JOURNAL_CAPACITY: i64 = 100_000;
/// Upper bound on any indicator lookback.
pub const MAX_PERIOD: i64 = 10_000;

const FLOAT_KEYS: &[(&str, &str)] = &[
    (ENGINE, "initial_capital"),
    (ENGINE, "risk_per_trade"),
    (ENGINE, "take_profit_pct"),
    (ENGINE, "stop_loss_pct"),
    (SIGNALS, "buy_rsi"),
    (SIGNALS, "sell_rsi"),
    (SIGNALS, "oversold_rsi"),
    (SIGNALS, "overbought_rsi"),
];

const INTEGER_KEYS: &[(&str, &str)] = &[
    (ENGINE, "daily_threshold"),
    (ENGINE, "journal_capacity"),
    (INDICATORS, "ema_fast_period"),
    (INDICATORS, "ema_slow_period"),
    (INDICATORS, "rsi_period"),
    (SIGNALS, "confirmation_threshold"),
    (SIGNALS, "history_capacity"),
];

pub fn validate_engine_config(config: &dyn ConfigPort) -> Result<(), StoError> {
    validate_numbers(config)?;
    validate_decision_mode(config)?;
    validate_capital(config)?;
    validate_risk(config)?;
    validate_exit_levels(config)?;
    validate_daily_threshold(config)?;
    validate_periods(config)?;
    validate_confirmation(config)?;
    validate_rsi_thresholds(config)?;
    validate_journal(config)?;
    Ok(())
}

fn invalid(section: &str, key: &str, reason: impl Into<String>) -> StoError {
    StoError::ConfigInvalid {
        section: section.to_string(),
        key: key.to_string(),
        reason: reason.into(),
    }
}

fn validate_numbers(config: &dyn ConfigPort) -> Result<(), StoError> {
    for (section, key) in FLOAT_KEYS {
        if let Some(raw) = config.malformed_number(section, key) {
            return Err(invalid(section, key, format!("'{raw}' is not a number")));
        }
    }
    for (section, key) in INTEGER_KEYS {
        if let Some(raw) = config
            .get_string(section, key)
            .filter(|raw| raw.trim().parse::<i64>().is_err())
        {
            return Err(invalid(section, key, format!("'{raw}' is not a whole number")));
        }
    }
    Ok(())
}

fn validate_decision_mode(config: &dyn ConfigPort) -> Result<(), StoError> {
    match config.get_string(ENGINE, "decision_mode") {
        Some(raw) => raw
            .parse::<DecisionMode>()
            .map(|_| ())
            .map_err(|reason| invalid(ENGINE, "decision_mode", reason)),
        None => Ok(()),
    }
}

fn validate_capital(config: &dyn ConfigPort) -> Result<(), StoError> {
    let value = config.get_double(ENGINE, "initial_capital", 1000.0);
    if !value.is_finite() || value <= 0.0 {
        return Err(invalid(
            ENGINE,
            "initial_capital",
            "initial_capital must be a positive finite number",
        ));
    }
    Ok(())
}

fn validate_risk(config: &dyn ConfigPort) -> Result<(), StoError> {
    let value = config.get_double(ENGINE, "risk_per_trade", 0.02);
    if !value.is_finite() || value <= 0.0 || value > 1.0 {
        return Err(invalid(
            ENGINE,
            "risk_per_trade",
            "risk_per_trade must be in (0, 1]",
        ));
    }
    Ok(())
}

fn validate_exit_levels(config: &dyn ConfigPort) -> Result<(), StoError> {
    for key in ["take_profit_pct", "stop_loss_pct"] {
        let value = config.get_double(ENGINE, key, 0.0);
        if !value.is_finite() || !(0.0..1.0).contains(&value) {
            return Err(invalid(ENGINE, key, format!("{key} must be in [0, 1)")));
        }
    }
    Ok(())
}

fn validate_daily_threshold(config: &dyn ConfigPort) -> Result<(), StoError> {
    let value = config.get_int(ENGINE, "daily_threshold", 5);
    if value < 1 || value > u32::MAX as i64 {
        return Err(invalid(
            ENGINE,
            "daily_threshold",
            "daily_threshold must be at least 1",
        ));
    }
    Ok(())
}

fn validate_periods(config: &dyn ConfigPort) -> Result<(), StoError> {
    let fast = config.get_int(INDICATORS, "ema_fast_period", 10);
    let slow = config.get_int(INDICATORS, "ema_slow_period", 20);
    let rsi = config.get_int(INDICATORS, "rsi_period", 14);

    for (key, value) in [
        ("ema_fast_period", fast),
        ("ema_slow_period", slow),
        ("rsi_period", rsi),
    ] {
        if !(1..=MAX_PERIOD).contains(&value) {
            return Err(invalid(
                INDICATORS,
                key,
                format!("{key} must be between 1 and {MAX_PERIOD}"),
            ));
        }
    }

    if fast >= slow {
        return Err(invalid(
            INDICATORS,
            "ema_fast_period",
            "ema_fast_period must be shorter than ema_slow_period",
        ));
    }
    Ok(())
}

fn validate_confirmation(config: &dyn ConfigPort) -> Result<(), StoError> {
    let capacity = config.get_int(SIGNALS, "history_capacity", 5);
    if !(1..=MAX_HISTORY_CAPACITY).contains(&capacity) {
        return Err(invalid(
            SIGNALS,
            "history_capacity",
            format!("history_capacity must be between 1 and {MAX_HISTORY_CAPACITY}"),
        ));
    }
    let threshold = config.get_int(SIGNALS, "confirmation_threshold", 2);
    if threshold < 1 || threshold > capacity {
        return Err(invalid(
            SIGNALS,
            "confirmation_threshold",
            "confirmation_threshold must be between 1 and history_capacity",
        ));
    }
    Ok(())
}

fn validate_rsi_thresholds(config: &dyn ConfigPort) -> Result<(), StoError> {
    let buy = config.get_double(SIGNALS, "buy_rsi", 60.0);
    let sell = config.get_double(SIGNALS, "sell_rsi", 40.0);
    let oversold = config.get_double(SIGNALS, "oversold_rsi", 30.0);
    let overbought = config.get_double(SIGNALS, "overbought_rsi", 70.0);

    for (key, value) in [
        ("buy_rsi", buy),
        ("sell_rsi", sell),
        ("oversold_rsi", oversold),
        ("overbought_rsi", overbought),
    ] {
        if !value.is_finite() || !(0.0..=100.0).contains(&value) {
            return Err(invalid(SIGNALS, key, format!("{key} must be between 0 and 100")));
        }
    }

    if sell >= buy {
        return Err(invalid(SIGNALS, "sell_rsi", "sell_rsi must be below buy_rsi"));
    }
    if oversold >= overbought {
        return Err(invalid(
            SIGNALS,
            "oversold_rsi",
            "oversold_rsi must be below overbought_rsi",
        ));
    }
    Ok(())
}

fn validate_journal(config: &dyn ConfigPort) -> Result<(), StoError> {
    let value = config.get_int(ENGINE, "journal_capacity", 500);
    if !(1..=MAX_JOURNAL_CAPACITY).contains(&value) {
        return Err(invalid(
            ENGINE,
            "journal_capacity",
            format!("journal_capacity must be between 1 and {MAX_JOURNAL_CAPACITY}"),
        ));
    }
    Ok(())
}
