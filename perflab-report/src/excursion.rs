//! Intra-trade excursion — worst loss and worst drawdown inside one trade.
//!
//! Scans the closes of the trade's bar sub-range `[entry_index, exit_index]`
//! once, tracking a running peak (long) or trough (short). Pure function:
//! bars + position in, two magnitudes out.

use perflab_core::domain::{Bar, ClosedPosition, Direction};

/// Worst intra-trade loss and drawdown, both as non-negative fractions.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Excursion {
    pub max_loss: f64,
    pub max_drawdown: f64,
}

/// Scan a closed position's bar sub-range for its worst loss and drawdown.
///
/// Long trades measure loss against the entry price and drawdown against the
/// running highest close. Short trades measure loss as
/// `(close - exit_price) / entry_price` and drawdown against the running
/// lowest close, where a close above the trough is the adverse move.
///
/// The caller guarantees the index range is within `bars` and the entry
/// price is positive.
pub fn scan(bars: &[Bar], position: &ClosedPosition) -> Excursion {
    let closes = &bars[position.entry_index..=position.exit_index];
    match position.direction {
        Direction::Long => scan_long(closes, position.entry_price),
        Direction::Short => scan_short(closes, position.entry_price, position.exit_price),
    }
}

fn scan_long(closes: &[Bar], entry_price: f64) -> Excursion {
    let mut peak = f64::MIN;
    let mut worst_loss = 0.0_f64;
    let mut worst_drawdown = 0.0_f64;

    for bar in closes {
        let close = bar.close;
        if close > peak {
            peak = close;
        }
        let loss = (close - entry_price) / entry_price;
        if loss < worst_loss {
            worst_loss = loss;
        }
        if peak > 0.0 {
            let drawdown = (close - peak) / peak;
            if drawdown < worst_drawdown {
                worst_drawdown = drawdown;
            }
        }
    }

    Excursion {
        max_loss: -worst_loss,
        max_drawdown: -worst_drawdown,
    }
}

fn scan_short(closes: &[Bar], entry_price: f64, exit_price: f64) -> Excursion {
    let mut trough = f64::MAX;
    let mut worst_loss = 0.0_f64;
    let mut worst_drawdown = 0.0_f64;

    for bar in closes {
        let close = bar.close;
        if close < trough {
            trough = close;
        }
        let loss = (close - exit_price) / entry_price;
        if loss < worst_loss {
            worst_loss = loss;
        }
        if trough > 0.0 {
            // For a short the adverse move is the close rising off the trough.
            let drawdown = (close - trough) / trough;
            if drawdown > worst_drawdown {
                worst_drawdown = drawdown;
            }
        }
    }

    Excursion {
        max_loss: -worst_loss,
        max_drawdown: worst_drawdown,
    }
}
