//! ClosedPosition — a completed trade reference into the price series.

use serde::{Deserialize, Serialize};

/// Direction of a trade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Long,
    Short,
}

/// A closed trade produced by the external signal engine.
///
/// `entry_index`/`exit_index` reference bars of the price series the
/// positions were generated against. Open positions never reach the
/// evaluator; only closed ones are reported here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClosedPosition {
    pub entry_index: usize,
    pub entry_price: f64,
    pub exit_index: usize,
    pub exit_price: f64,
    pub direction: Direction,
}

impl ClosedPosition {
    /// Signed price move of the position as a fraction of the entry price.
    ///
    /// Positive means the move went in the position's favor.
    pub fn price_move_pct(&self) -> f64 {
        if self.entry_price == 0.0 {
            return 0.0;
        }
        match self.direction {
            Direction::Long => (self.exit_price - self.entry_price) / self.entry_price,
            Direction::Short => (self.entry_price - self.exit_price) / self.entry_price,
        }
    }
}
