//! Trade reconstruction — closed positions + prices + fee rate → trade records.
//!
//! Walks positions in order, compounding capital trade-to-trade (full
//! reinvestment, no position sizing). Fees are charged twice per trade, on
//! the entry notional and again on the exit notional.

use perflab_core::domain::{Bar, ClosedPosition, TradeRecord};

use crate::excursion;
use crate::report::EvalError;

/// Round to 4 decimal places, half away from zero.
pub(crate) fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Reconstruct the fee-adjusted economics of every closed position.
///
/// Capital starts at `initial_capital` and the net exit proceeds of each
/// trade fund the next one. Any malformed position aborts the whole
/// reconstruction; the caller surfaces the error as a failed report.
pub fn reconstruct_trades(
    positions: &[ClosedPosition],
    bars: &[Bar],
    initial_capital: f64,
    fee_ratio: f64,
) -> Result<Vec<TradeRecord>, EvalError> {
    let mut trades = Vec::with_capacity(positions.len());
    let mut amount = initial_capital;

    for (i, position) in positions.iter().enumerate() {
        validate_position(i, position, bars.len())?;

        let entry_fee = amount * fee_ratio;
        let net_entry = amount - entry_fee;
        let pct = round4(position.price_move_pct());
        let exit_amount = net_entry * (1.0 + pct);
        let exit_fee = exit_amount * fee_ratio;
        let net_exit = exit_amount - exit_fee;
        let profit = net_exit - amount;

        let ex = excursion::scan(bars, position);

        trades.push(TradeRecord {
            index: i + 1,
            direction: position.direction,
            entry_time: bars[position.entry_index].end_time,
            exit_time: bars[position.exit_index].end_time,
            entry_price: position.entry_price,
            exit_price: position.exit_price,
            entry_amount: amount,
            exit_amount: net_exit,
            profit,
            profit_pct: profit / amount,
            fee: entry_fee + exit_fee,
            max_loss: ex.max_loss,
            max_drawdown: ex.max_drawdown,
        });

        amount = net_exit;
    }

    Ok(trades)
}

fn validate_position(
    index: usize,
    position: &ClosedPosition,
    bar_count: usize,
) -> Result<(), EvalError> {
    if position.exit_index < position.entry_index {
        return Err(EvalError::InvertedRange {
            index,
            entry: position.entry_index,
            exit: position.exit_index,
        });
    }
    if position.exit_index >= bar_count {
        return Err(EvalError::BarRangeOutOfBounds {
            index,
            entry: position.entry_index,
            exit: position.exit_index,
            len: bar_count,
        });
    }
    if position.entry_price <= 0.0 {
        return Err(EvalError::NonPositiveEntryPrice {
            index,
            price: position.entry_price,
        });
    }
    Ok(())
}
