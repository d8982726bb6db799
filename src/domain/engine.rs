//! Decision and paper-execution engine.
//!
//! One `evaluate` call runs the full pipeline over a price series:
//! validate → indicators → classify → confirm → protective exits →
//! entry/exit (rate limited) → journal. The engine owns all mutable state
//! (account, signal history, daily counter, journal), so each call is a
//! single atomic step. `SharedEngine` serializes calls from several threads.
//!
//! EngineConfig defines the tunable constants.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use super::account::Account;
use super::confirmation::ConfirmationFilter;
use super::error::StoError;
use super::execution::{
    check_protective_exit, enter_long, exit_long, position_size, EntryResult, ExecutionParams,
};
use super::indicator::{IndicatorPeriods, IndicatorSnapshot};
use super::journal::{Action, DecisionDraft, DecisionJournal, DecisionRecord, Gate};
use super::metrics::TradeSummary;
use super::position::{ClosedTrade, ExitReason, Position};
use super::price::{last_price, validate_prices};
use super::rate_limit::RateLimiter;
use super::signal::{classify, DecisionMode, Signal, SignalThresholds};
use crate::ports::clock_port::ClockPort;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub decision_mode: DecisionMode,
    pub initial_capital: f64,
    pub execution: ExecutionParams,
    pub daily_threshold: u32,
    pub confirmation_threshold: usize,
    pub history_capacity: usize,
    pub periods: IndicatorPeriods,
    pub thresholds: SignalThresholds,
    pub exit_on_sell_signal: bool,
    pub journal_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            decision_mode: DecisionMode::Momentum,
            initial_capital: 1000.0,
            execution: ExecutionParams::default(),
            daily_threshold: 5,
            confirmation_threshold: 2,
            history_capacity: 5,
            periods: IndicatorPeriods::default(),
            thresholds: SignalThresholds::default(),
            exit_on_sell_signal: true,
            journal_capacity: super::journal::DEFAULT_JOURNAL_CAPACITY,
        }
    }
}

/// Result of one evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
    pub confirmed: bool,
    pub indicators: IndicatorSnapshot,
    pub price: f64,
    pub gate: Gate,
    pub action: Action,
    pub position: Option<Position>,
    pub trade_outcome: Option<f64>,
    pub capital: f64,
    pub daily_count: u32,
    pub position_size: f64,
    pub reason: String,
}

/// Engine overview for status displays.
#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub version: &'static str,
    pub decision_mode: DecisionMode,
    pub capital: f64,
    pub initial_capital: f64,
    pub last_action: Option<Signal>,
    pub reason: String,
    pub uptime_secs: i64,
    pub open_position: Option<Position>,
    /// Capital plus the open position marked at the last evaluated price.
    pub equity: f64,
    pub total_return: f64,
    pub entries_remaining_today: u32,
    pub decisions_recorded: u64,
    pub trades_closed: u64,
}

pub struct Engine<C: ClockPort> {
    config: EngineConfig,
    clock: C,
    account: Account,
    confirmation: ConfirmationFilter,
    limiter: RateLimiter,
    journal: DecisionJournal,
    started_at: DateTime<Utc>,
}

impl<C: ClockPort> Engine<C> {
    pub fn new(config: EngineConfig, clock: C) -> Self {
        let started_at = clock.now();
        Engine {
            account: Account::new(config.initial_capital),
            confirmation: ConfirmationFilter::new(
                config.history_capacity,
                config.confirmation_threshold,
            ),
            limiter: RateLimiter::new(config.daily_threshold, clock.today()),
            journal: DecisionJournal::new(config.journal_capacity),
            started_at,
            clock,
            config,
        }
    }

    /// Evaluate a price series and act on the outcome.
    ///
    /// Invalid input is journaled and returned as `StoError::InvalidInput`.
    /// Short series are not errors: they come back with
    /// `Gate::InsufficientData` and a HOLD signal.
    pub fn evaluate(&mut self, prices: &[f64]) -> Result<Evaluation, StoError> {
        let now = self.clock.now();
        let today = self.clock.today();
        if self.limiter.refresh(today) {
            debug!(%today, "daily counter reset");
        }

        let validated = validate_prices(prices).and_then(|()| {
            last_price(prices).ok_or_else(|| StoError::invalid_input(0, "price series is empty"))
        });
        let price = match validated {
            Ok(price) => price,
            Err(err) => {
                warn!(error = %err, "rejected price series");
                self.journal.record_decision(DecisionDraft {
                    timestamp: now,
                    signal: Signal::Hold,
                    confirmed: false,
                    indicators: IndicatorSnapshot::default(),
                    price: None,
                    gate: Gate::InvalidInput,
                    action: Action::None,
                    trade_outcome: None,
                    reason: err.to_string(),
                });
                return Err(err);
            }
        };

        let indicators = IndicatorSnapshot::compute(prices, &self.config.periods);
        let classification = classify(
            &indicators,
            self.config.decision_mode,
            &self.config.thresholds,
        );
        let signal = classification.signal;
        let confirmed = self.confirmation.observe(signal);

        let (mut gate, mut reason) = if indicators.is_complete() {
            (Gate::Passed, classification.reason)
        } else {
            (Gate::InsufficientData, self.insufficient_reason(prices.len(), &indicators))
        };
        let mut action = Action::None;
        let mut trade_outcome = None;

        if let Some(trade) = check_protective_exit(&mut self.account, price, now) {
            action = Action::Closed(trade.exit_reason);
            trade_outcome = Some(trade.pnl);
            reason = format!("{} hit at {:.2}", trade.exit_reason, price);
            self.close_trade(trade);
        }

        if confirmed && action == Action::None {
            match signal {
                Signal::Buy => {
                    if self.account.has_position() {
                        reason = format!("{reason}; position already open");
                    } else if !self.limiter.permits(today) {
                        gate = Gate::RateLimited;
                        reason = format!(
                            "daily limit of {} entries reached",
                            self.limiter.threshold()
                        );
                        warn!(threshold = self.limiter.threshold(), "entry blocked by daily limit");
                    } else {
                        match enter_long(&mut self.account, price, now, &self.config.execution) {
                            EntryResult::Entered {
                                quantity,
                                take_profit,
                                stop_loss,
                                ..
                            } => {
                                self.limiter.record_entry(today);
                                action = Action::Opened;
                                info!(price, quantity, take_profit, stop_loss, "opened long position");
                            }
                            EntryResult::AlreadyOpen => {}
                            EntryResult::InsufficientCapital => {
                                reason = format!("{reason}; insufficient capital");
                            }
                        }
                    }
                }
                Signal::Sell => {
                    if self.config.exit_on_sell_signal {
                        if let Some(trade) =
                            exit_long(&mut self.account, price, now, ExitReason::Signal)
                        {
                            action = Action::Closed(ExitReason::Signal);
                            trade_outcome = Some(trade.pnl);
                            self.close_trade(trade);
                        }
                    }
                }
                Signal::Hold => {}
            }
        }

        let record = self.journal.record_decision(DecisionDraft {
            timestamp: now,
            signal,
            confirmed,
            indicators,
            price: Some(price),
            gate,
            action,
            trade_outcome,
            reason,
        });
        debug!(id = record.id, %signal, confirmed, %gate, %action, "evaluation recorded");

        Ok(Evaluation {
            id: record.id,
            timestamp: now,
            signal,
            confirmed,
            indicators,
            price,
            gate,
            action,
            position: self.account.position.clone(),
            trade_outcome,
            capital: self.account.capital,
            daily_count: self.limiter.counter().count,
            position_size: position_size(self.account.capital, &self.config.execution),
            reason: record.reason.clone(),
        })
    }

    fn close_trade(&mut self, trade: ClosedTrade) {
        info!(
            id = trade.id,
            reason = %trade.exit_reason,
            entry = trade.entry_price,
            exit = trade.exit_price,
            pnl = trade.pnl,
            capital = self.account.capital,
            "closed long position"
        );
        self.journal.record_trade(trade);
    }

    fn insufficient_reason(&self, have: usize, indicators: &IndicatorSnapshot) -> String {
        let missing: Vec<String> = indicators
            .missing(&self.config.periods)
            .iter()
            .map(|i| i.to_string())
            .collect();
        format!(
            "insufficient data: have {} prices, need {} for {}",
            have,
            self.config.periods.required_prices(),
            missing.join(", ")
        )
    }

    pub fn last_decisions(&self, n: usize) -> Vec<DecisionRecord> {
        self.journal.last_decisions(n)
    }

    pub fn last_trades(&self, n: usize) -> Vec<ClosedTrade> {
        self.journal.last_trades(n)
    }

    /// Statistics over the retained trade log.
    pub fn summary(&self) -> TradeSummary {
        TradeSummary::compute(self.journal.trades())
    }

    pub fn status(&self) -> Status {
        let latest = self.journal.latest();
        let mark = self
            .journal
            .last_priced()
            .or_else(|| self.account.position.as_ref().map(|p| p.entry_price));
        Status {
            version: VERSION,
            decision_mode: self.config.decision_mode,
            capital: self.account.capital,
            initial_capital: self.account.initial_capital,
            last_action: latest.map(|r| r.signal),
            reason: latest
                .map(|r| r.reason.clone())
                .unwrap_or_else(|| "initialised".to_string()),
            uptime_secs: (self.clock.now() - self.started_at).num_seconds(),
            open_position: self.account.position.clone(),
            equity: mark.map_or(self.account.capital, |price| self.account.equity(price)),
            total_return: self.account.total_return(),
            entries_remaining_today: self.limiter.remaining(self.clock.today()),
            decisions_recorded: self.journal.total_recorded(),
            trades_closed: self.account.trades_closed(),
        }
    }

    pub fn account(&self) -> &Account {
        &self.account
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn signal_history(&self) -> Vec<Signal> {
        self.confirmation.history().iter().copied().collect()
    }

    pub fn daily_count(&self) -> u32 {
        self.limiter.counter().count
    }
}

/// Thread-safe handle; every call holds the lock for the whole operation.
pub struct SharedEngine<C: ClockPort> {
    inner: Arc<Mutex<Engine<C>>>,
}

impl<C: ClockPort> Clone for SharedEngine<C> {
    fn clone(&self) -> Self {
        SharedEngine {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C: ClockPort> SharedEngine<C> {
    pub fn new(engine: Engine<C>) -> Self {
        SharedEngine {
            inner: Arc::new(Mutex::new(engine)),
        }
    }

    fn lock(&self) -> MutexGuard<'_, Engine<C>> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn evaluate(&self, prices: &[f64]) -> Result<Evaluation, StoError> {
        self.lock().evaluate(prices)
    }

    pub fn with<R>(&self, f: impl FnOnce(&Engine<C>) -> R) -> R {
        f(&self.lock())
    }

    pub fn status(&self) -> Status {
        self.lock().status()
    }

    pub fn last_decisions(&self, n: usize) -> Vec<DecisionRecord> {
        self.lock().last_decisions(n)
    }

    pub fn last_trades(&self, n: usize) -> Vec<ClosedTrade> {
        self.lock().last_trades(n)
    }
}
