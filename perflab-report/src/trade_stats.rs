//! Trade statistics — aggregate counts and PnL sums over the trade list.

use perflab_core::domain::TradeRecord;
use perflab_core::ratios::RATIO_CAP;
use serde::{Deserialize, Serialize};

/// Aggregate statistics over a backtest's reconstructed trades.
///
/// Transient: built once from the trade list and consumed by the metrics
/// engine and the report assembler.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TradeStatistics {
    pub count: usize,
    pub profitable_count: usize,
    pub total_profit: f64,
    pub total_fee: f64,
    pub final_amount: f64,
    pub gross_profit: f64,
    pub gross_loss: f64,
    pub profit_factor: f64,
    pub win_rate: f64,
    /// Mean per-trade net return (fraction of capital carried in).
    pub average_profit: f64,
    /// Worst per-trade intra-trade loss magnitude.
    pub max_loss: f64,
    /// Worst per-trade intra-trade drawdown magnitude.
    pub max_drawdown: f64,
}

impl TradeStatistics {
    /// Aggregate a trade list. An empty list yields the all-zero statistics
    /// except `final_amount`, which equals the untouched initial capital.
    pub fn compute(trades: &[TradeRecord], initial_capital: f64) -> Self {
        let count = trades.len();
        let profitable_count = trades.iter().filter(|t| t.is_winner()).count();
        let total_profit: f64 = trades.iter().map(|t| t.profit).sum();
        let total_fee: f64 = trades.iter().map(|t| t.fee).sum();
        let gross_profit: f64 = trades
            .iter()
            .filter(|t| t.profit > 0.0)
            .map(|t| t.profit)
            .sum();
        let gross_loss: f64 = trades
            .iter()
            .filter(|t| t.profit < 0.0)
            .map(|t| t.profit.abs())
            .sum();

        let profit_factor = if gross_loss < 1e-10 {
            if gross_profit > 0.0 {
                RATIO_CAP
            } else {
                0.0
            }
        } else {
            gross_profit / gross_loss
        };

        let win_rate = if count > 0 {
            profitable_count as f64 / count as f64
        } else {
            0.0
        };
        let average_profit = if count > 0 {
            trades.iter().map(|t| t.profit_pct).sum::<f64>() / count as f64
        } else {
            0.0
        };

        let max_loss = trades.iter().map(|t| t.max_loss).fold(0.0, f64::max);
        let max_drawdown = trades.iter().map(|t| t.max_drawdown).fold(0.0, f64::max);

        Self {
            count,
            profitable_count,
            total_profit,
            total_fee,
            final_amount: initial_capital + total_profit,
            gross_profit,
            gross_loss,
            profit_factor,
            win_rate,
            average_profit,
            max_loss,
            max_drawdown,
        }
    }
}
