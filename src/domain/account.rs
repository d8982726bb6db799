//! Simulated account: capital plus the single open position.

use super::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub struct Account {
    pub capital: f64,
    pub initial_capital: f64,
    pub position: Option<Position>,
    trades_closed: u64,
}

impl Account {
    pub fn new(initial_capital: f64) -> Self {
        Account {
            capital: initial_capital,
            initial_capital,
            position: None,
            trades_closed: 0,
        }
    }

    pub fn has_position(&self) -> bool {
        self.position.is_some()
    }

    /// Store a new position. Refuses, handing the position back, when one is
    /// already open.
    pub fn open_position(&mut self, position: Position) -> Result<(), Position> {
        if self.position.is_some() {
            return Err(position);
        }
        self.position = Some(position);
        Ok(())
    }

    pub fn take_position(&mut self) -> Option<Position> {
        self.position.take()
    }

    /// Credit realized profit or loss and return the id of the closed trade.
    pub fn settle(&mut self, pnl: f64) -> u64 {
        self.capital += pnl;
        self.trades_closed += 1;
        self.trades_closed
    }

    pub fn trades_closed(&self) -> u64 {
        self.trades_closed
    }

    /// Capital plus the unrealized result of the open position.
    pub fn equity(&self, price: f64) -> f64 {
        self.capital
            + self
                .position
                .as_ref()
                .map(|p| p.unrealized_pnl(price))
                .unwrap_or(0.0)
    }

    pub fn total_return(&self) -> f64 {
        if self.initial_capital > 0.0 {
            (self.capital - self.initial_capital) / self.initial_capital
        } else {
            0.0
        }
    }
}
