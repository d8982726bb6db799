//! Paper trade execution.
//!
//! Implements long entries sized by a risk fraction of capital, protective
//! take-profit/stop-loss levels, and exits. Capital is settled on exit only:
//! opening a position leaves capital untouched, closing it credits
//! `(exit_price - entry_price) * quantity`.

use chrono::{DateTime, Utc};

use super::account::Account;
use super::position::{ClosedTrade, ExitReason, Position, Side};

/// Sizing and exit parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct ExecutionParams {
    pub risk_per_trade: f64,
    pub take_profit_pct: f64,
    pub stop_loss_pct: f64,
}

impl Default for ExecutionParams {
    fn default() -> Self {
        ExecutionParams {
            risk_per_trade: 0.02,
            take_profit_pct: 0.03,
            stop_loss_pct: 0.015,
        }
    }
}

/// Notional committed to a new position: capital * risk_per_trade.
pub fn position_size(capital: f64, params: &ExecutionParams) -> f64 {
    (capital * params.risk_per_trade).max(0.0)
}

/// Result of an entry attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum EntryResult {
    Entered {
        quantity: f64,
        entry_price: f64,
        take_profit: f64,
        stop_loss: f64,
    },
    AlreadyOpen,
    InsufficientCapital,
}

/// Enter a long position at `price`.
///
/// 1. Refuse if a position is already open (no pyramiding)
/// 2. quantity = capital * risk_per_trade / price
/// 3. take_profit = price * (1 + tp_pct), stop_loss = price * (1 - sl_pct)
/// 4. Store the position; capital is not reduced
pub fn enter_long(
    account: &mut Account,
    price: f64,
    at: DateTime<Utc>,
    params: &ExecutionParams,
) -> EntryResult {
    if account.has_position() {
        return EntryResult::AlreadyOpen;
    }

    let notional = position_size(account.capital, params);
    if notional <= 0.0 || price <= 0.0 {
        return EntryResult::InsufficientCapital;
    }
    let quantity = notional / price;

    let take_profit = price * (1.0 + params.take_profit_pct);
    let stop_loss = price * (1.0 - params.stop_loss_pct);

    let position = Position {
        side: Side::Long,
        entry_price: price,
        quantity,
        take_profit,
        stop_loss,
        opened_at: at,
    };

    if account.open_position(position).is_err() {
        return EntryResult::AlreadyOpen;
    }

    EntryResult::Entered {
        quantity,
        entry_price: price,
        take_profit,
        stop_loss,
    }
}

/// Close the open position at `price`, settling its PnL into capital.
/// Returns `None` when flat.
pub fn exit_long(
    account: &mut Account,
    price: f64,
    at: DateTime<Utc>,
    reason: ExitReason,
) -> Option<ClosedTrade> {
    let position = account.take_position()?;
    let pnl = (price - position.entry_price) * position.quantity;
    let id = account.settle(pnl);

    Some(ClosedTrade {
        id,
        side: position.side,
        quantity: position.quantity,
        entry_price: position.entry_price,
        exit_price: price,
        opened_at: position.opened_at,
        closed_at: at,
        exit_reason: reason,
        pnl,
    })
}

/// Close the open position if `price` has crossed its take-profit or
/// stop-loss level.
pub fn check_protective_exit(
    account: &mut Account,
    price: f64,
    at: DateTime<Utc>,
) -> Option<ClosedTrade> {
    let reason = account.position.as_ref()?.protective_exit(price)?;
    exit_long(account, price, at, reason)
}
