//! Paper position tracking.

use std::fmt;

use chrono::{DateTime, Utc};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Long,
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub side: Side,
    pub entry_price: f64,
    pub quantity: f64,
    pub take_profit: f64,
    pub stop_loss: f64,
    pub opened_at: DateTime<Utc>,
}

impl Position {
    pub fn unrealized_pnl(&self, price: f64) -> f64 {
        self.quantity * (price - self.entry_price)
    }

    pub fn should_stop_loss(&self, price: f64) -> bool {
        price <= self.stop_loss
    }

    pub fn should_take_profit(&self, price: f64) -> bool {
        price >= self.take_profit
    }

    /// Which protective level, if any, the price has crossed.
    /// Take-profit wins if both are somehow hit.
    pub fn protective_exit(&self, price: f64) -> Option<ExitReason> {
        if self.should_take_profit(price) {
            Some(ExitReason::TakeProfit)
        } else if self.should_stop_loss(price) {
            Some(ExitReason::StopLoss)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitReason {
    TakeProfit,
    StopLoss,
    Signal,
}

impl fmt::Display for ExitReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExitReason::TakeProfit => write!(f, "take-profit"),
            ExitReason::StopLoss => write!(f, "stop-loss"),
            ExitReason::Signal => write!(f, "sell signal"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ClosedTrade {
    pub id: u64,
    pub side: Side,
    pub quantity: f64,
    pub entry_price: f64,
    pub exit_price: f64,
    pub opened_at: DateTime<Utc>,
    pub closed_at: DateTime<Utc>,
    pub exit_reason: ExitReason,
    pub pnl: f64,
}

impl ClosedTrade {
    pub fn is_win(&self) -> bool {
        self.pnl > 0.0
    }
}
