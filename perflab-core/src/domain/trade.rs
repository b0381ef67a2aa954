//! TradeRecord — the fee-adjusted economics of one completed round-trip.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::position::Direction;

/// One reconstructed trade: entry → exit with fees and intra-trade excursion.
///
/// Amounts compound trade-to-trade (full reinvestment): `entry_amount` is the
/// capital carried into the trade, `exit_amount` the capital carried out of
/// it after both fees. Built once by the reconstruction stage and immutable
/// thereafter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRecord {
    /// 1-based sequence number of the trade.
    pub index: usize,
    pub direction: Direction,

    // ── Entry / exit ──
    pub entry_time: DateTime<Utc>,
    pub exit_time: DateTime<Utc>,
    pub entry_price: f64,
    pub exit_price: f64,

    // ── Capital ──
    pub entry_amount: f64,
    pub exit_amount: f64,

    // ── PnL ──
    pub profit: f64,
    /// Net profit as a fraction of the capital carried into the trade.
    pub profit_pct: f64,
    /// Entry fee + exit fee.
    pub fee: f64,

    // ── Intra-trade excursion (magnitudes, always >= 0) ──
    pub max_loss: f64,
    pub max_drawdown: f64,
}

impl TradeRecord {
    pub fn is_winner(&self) -> bool {
        self.profit > 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_trade() -> TradeRecord {
        TradeRecord {
            index: 1,
            direction: Direction::Long,
            entry_time: Utc.with_ymd_and_hms(2024, 1, 5, 0, 0, 0).unwrap(),
            exit_time: Utc.with_ymd_and_hms(2024, 1, 11, 0, 0, 0).unwrap(),
            entry_price: 100.0,
            exit_price: 110.0,
            entry_amount: 10_000.0,
            exit_amount: 10_978.011,
            profit: 978.011,
            profit_pct: 0.0978011,
            fee: 20.989,
            max_loss: 0.02,
            max_drawdown: 0.03,
        }
    }

    #[test]
    fn is_winner() {
        assert!(sample_trade().is_winner());
        let mut loser = sample_trade();
        loser.profit = -50.0;
        assert!(!loser.is_winner());
    }

    #[test]
    fn trade_serialization_roundtrip() {
        let trade = sample_trade();
        let json = serde_json::to_string(&trade).unwrap();
        let deser: TradeRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(trade, deser);
    }
}
