//! PerfLab Core — domain types and collaborator interfaces for backtest
//! evaluation.
//!
//! This crate contains:
//! - Domain types (bars, closed positions, trade records)
//! - Bar interval parsing and annualization factors
//! - The ratio-calculator collaborator trait plus a standard implementation

pub mod domain;
pub mod interval;
pub mod ratios;

pub use domain::{Bar, ClosedPosition, Direction, TradeRecord};
pub use interval::{annualization_factor, interval_minutes, DEFAULT_ANNUALIZATION};
pub use ratios::{RatioCalculator, StandardRatios, RATIO_CAP};
