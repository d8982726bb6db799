//! Closed-trade statistics.

use super::position::ClosedTrade;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct TradeSummary {
    pub total_trades: usize,
    pub wins: usize,
    pub losses: usize,
    pub breakeven: usize,
    pub win_rate: f64,
    pub total_pnl: f64,
    pub largest_win: f64,
    pub largest_loss: f64,
}

impl TradeSummary {
    pub fn compute<'a>(trades: impl IntoIterator<Item = &'a ClosedTrade>) -> Self {
        let mut summary = TradeSummary::default();

        for trade in trades {
            let pnl = trade.pnl;
            summary.total_trades += 1;
            summary.total_pnl += pnl;
            if pnl > 0.0 {
                summary.wins += 1;
                if pnl > summary.largest_win {
                    summary.largest_win = pnl;
                }
            } else if pnl < 0.0 {
                summary.losses += 1;
                if pnl.abs() > summary.largest_loss {
                    summary.largest_loss = pnl.abs();
                }
            } else {
                summary.breakeven += 1;
            }
        }

        summary.win_rate = if summary.total_trades > 0 {
            summary.wins as f64 / summary.total_trades as f64
        } else {
            0.0
        };

        summary
    }
}
