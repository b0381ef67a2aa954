//! PerfLab Report — backtest evaluation engine.
//!
//! This crate builds on `perflab-core` to turn a completed backtest (price
//! series + closed positions) into a standardized performance-and-risk
//! report:
//! - Trade reconstruction with fees and trade-to-trade compounding
//! - Intra-trade worst-loss / worst-drawdown extraction
//! - Aggregate trade statistics
//! - The return/risk metric battery over a synthetic per-bar return series
//! - The weighted 0–10 comprehensive score
//! - Report assembly with a defined no-trades report and soft failure

pub mod excursion;
pub mod metrics;
pub mod reconstruct;
pub mod report;
pub mod scoring;
pub mod series;
pub mod trade_stats;

pub use excursion::Excursion;
pub use metrics::{ReturnMetrics, RiskInputs, RiskMetrics};
pub use reconstruct::reconstruct_trades;
pub use report::{evaluate, evaluate_batch, BacktestInput, BacktestReport, EvalError};
pub use scoring::comprehensive_score;
pub use series::{strategy_returns, LevelSeries, ReturnSeries};
pub use trade_stats::TradeStatistics;
