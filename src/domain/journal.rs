//! Decision and trade journal.
//!
//! Every evaluation appends exactly one `DecisionRecord`; every closed
//! position appends one `ClosedTrade` to a separate trade log. Both logs keep
//! at most `capacity` entries, dropping the oldest first. Record ids keep
//! increasing across evictions. `last_*` queries return entries oldest to
//! newest.

use std::collections::VecDeque;
use std::fmt;

use chrono::{DateTime, Utc};

use super::indicator::IndicatorSnapshot;
use super::position::{ClosedTrade, ExitReason};
use super::signal::Signal;

pub const DEFAULT_JOURNAL_CAPACITY: usize = 500;

/// Which gate, if any, stopped an evaluation short.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    Passed,
    InsufficientData,
    InvalidInput,
    RateLimited,
}

impl fmt::Display for Gate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Gate::Passed => write!(f, "passed"),
            Gate::InsufficientData => write!(f, "insufficient data"),
            Gate::InvalidInput => write!(f, "invalid input"),
            Gate::RateLimited => write!(f, "rate limited"),
        }
    }
}

/// What the evaluation did to the position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Opened,
    Closed(ExitReason),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::None => write!(f, "-"),
            Action::Opened => write!(f, "opened"),
            Action::Closed(reason) => write!(f, "closed ({reason})"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionRecord {
    pub id: u64,
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
    pub confirmed: bool,
    pub indicators: IndicatorSnapshot,
    pub price: Option<f64>,
    pub gate: Gate,
    pub action: Action,
    pub trade_outcome: Option<f64>,
    pub reason: String,
}

impl fmt::Display for DecisionRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let price = self
            .price
            .map(|p| format!("{p:.2}"))
            .unwrap_or_else(|| "n/a".to_string());
        write!(
            f,
            "#{} {} {}{} price={} {} gate={} action={}",
            self.id,
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.signal,
            if self.confirmed { " (confirmed)" } else { "" },
            price,
            self.indicators,
            self.gate,
            self.action,
        )?;
        if let Some(pnl) = self.trade_outcome {
            write!(f, " pnl={pnl:.4}")?;
        }
        write!(f, " | {}", self.reason)
    }
}

/// Everything needed to append a decision; the journal assigns the id.
#[derive(Debug, Clone, PartialEq)]
pub struct DecisionDraft {
    pub timestamp: DateTime<Utc>,
    pub signal: Signal,
    pub confirmed: bool,
    pub indicators: IndicatorSnapshot,
    pub price: Option<f64>,
    pub gate: Gate,
    pub action: Action,
    pub trade_outcome: Option<f64>,
    pub reason: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DecisionJournal {
    capacity: usize,
    next_id: u64,
    decisions: VecDeque<DecisionRecord>,
    trades: VecDeque<ClosedTrade>,
}

impl Default for DecisionJournal {
    fn default() -> Self {
        DecisionJournal::new(DEFAULT_JOURNAL_CAPACITY)
    }
}

impl DecisionJournal {
    pub fn new(capacity: usize) -> Self {
        DecisionJournal {
            capacity: capacity.max(1),
            next_id: 1,
            decisions: VecDeque::new(),
            trades: VecDeque::new(),
        }
    }

    pub fn record_decision(&mut self, draft: DecisionDraft) -> &DecisionRecord {
        let record = DecisionRecord {
            id: self.next_id,
            timestamp: draft.timestamp,
            signal: draft.signal,
            confirmed: draft.confirmed,
            indicators: draft.indicators,
            price: draft.price,
            gate: draft.gate,
            action: draft.action,
            trade_outcome: draft.trade_outcome,
            reason: draft.reason,
        };
        self.next_id += 1;
        if self.decisions.len() == self.capacity {
            self.decisions.pop_front();
        }
        self.decisions.push_back(record);
        // Just pushed, never empty here.
        &self.decisions[self.decisions.len() - 1]
    }

    pub fn record_trade(&mut self, trade: ClosedTrade) {
        if self.trades.len() == self.capacity {
            self.trades.pop_front();
        }
        self.trades.push_back(trade);
    }

    pub fn last_decisions(&self, n: usize) -> Vec<DecisionRecord> {
        let skip = self.decisions.len().saturating_sub(n);
        self.decisions.iter().skip(skip).cloned().collect()
    }

    pub fn last_trades(&self, n: usize) -> Vec<ClosedTrade> {
        let skip = self.trades.len().saturating_sub(n);
        self.trades.iter().skip(skip).cloned().collect()
    }

    pub fn latest(&self) -> Option<&DecisionRecord> {
        self.decisions.back()
    }

    /// Price of the most recent decision that had one.
    pub fn last_priced(&self) -> Option<f64> {
        self.decisions.iter().rev().find_map(|r| r.price)
    }

    pub fn decision_count(&self) -> usize {
        self.decisions.len()
    }

    pub fn trade_count(&self) -> usize {
        self.trades.len()
    }

    /// Total decisions ever recorded, evicted ones included.
    pub fn total_recorded(&self) -> u64 {
        self.next_id - 1
    }

    pub fn trades(&self) -> impl Iterator<Item = &ClosedTrade> {
        self.trades.iter()
    }
}
