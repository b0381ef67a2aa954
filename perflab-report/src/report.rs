//! Report assembly — wires reconstruction, statistics, metrics and scoring
//! into one `BacktestReport`.
//!
//! `evaluate()` is a pure builder: it either returns a fully-populated
//! report, the defined all-zero report for a backtest with no trades, or a
//! `success = false` report carrying the first stage error's message. No
//! partially-computed state is ever observable.

use perflab_core::domain::{Bar, ClosedPosition, TradeRecord};
use perflab_core::interval::annualization_factor;
use perflab_core::ratios::RatioCalculator;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::metrics::{ReturnMetrics, RiskInputs, RiskMetrics};
use crate::reconstruct::reconstruct_trades;
use crate::scoring::comprehensive_score;
use crate::series::strategy_returns;
use crate::trade_stats::TradeStatistics;

/// Errors that abort an evaluation.
///
/// These cover malformed inputs only; degenerate numerics (empty series,
/// zero denominators) are handled inside each metric with a fallback value.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("initial capital must be positive, got {0}")]
    NonPositiveCapital(f64),
    #[error("position {index}: bar range {entry}..={exit} exceeds series length {len}")]
    BarRangeOutOfBounds {
        index: usize,
        entry: usize,
        exit: usize,
        len: usize,
    },
    #[error("position {index}: exit bar {exit} precedes entry bar {entry}")]
    InvertedRange {
        index: usize,
        entry: usize,
        exit: usize,
    },
    #[error("position {index}: entry price must be positive, got {price}")]
    NonPositiveEntryPrice { index: usize, price: f64 },
}

/// Everything one evaluation consumes. Read-only.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestInput {
    pub strategy_name: String,
    /// Human-readable parameter description of the strategy.
    pub parameters: String,
    pub bars: Vec<Bar>,
    /// Optional benchmark closes; absent means benchmark-relative metrics
    /// fall back to their neutral values.
    #[serde(default)]
    pub benchmark: Option<Vec<Bar>>,
    pub positions: Vec<ClosedPosition>,
    pub initial_capital: f64,
    /// Fraction charged on entry and again on exit notional (e.g. 0.001).
    pub fee_ratio: f64,
    /// Bar interval label ("1m", "1h", "1d", ...).
    pub interval: String,
    #[serde(default)]
    pub risk_free_rate: f64,
}

/// The externally visible evaluation result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BacktestReport {
    pub strategy_name: String,
    pub parameters: String,
    pub success: bool,
    pub error_message: Option<String>,

    // ── Capital ──
    pub initial_amount: f64,
    pub final_amount: f64,
    pub total_profit: f64,
    pub total_fee: f64,

    // ── Trade statistics ──
    pub trade_count: usize,
    pub profitable_count: usize,
    pub win_rate: f64,
    pub profit_factor: f64,
    pub average_profit: f64,
    pub max_loss: f64,
    pub max_drawdown: f64,

    // ── Metrics ──
    pub returns: ReturnMetrics,
    pub risk: RiskMetrics,

    pub trades: Vec<TradeRecord>,
}

impl BacktestReport {
    /// The defined report for a backtest that produced no closed trades:
    /// all-zero metrics, untouched capital, and `success = true`.
    pub fn no_trades(input: &BacktestInput) -> Self {
        Self {
            strategy_name: input.strategy_name.clone(),
            parameters: input.parameters.clone(),
            success: true,
            error_message: None,
            initial_amount: input.initial_capital,
            final_amount: input.initial_capital,
            total_profit: 0.0,
            total_fee: 0.0,
            trade_count: 0,
            profitable_count: 0,
            win_rate: 0.0,
            profit_factor: 0.0,
            average_profit: 0.0,
            max_loss: 0.0,
            max_drawdown: 0.0,
            returns: ReturnMetrics::default(),
            risk: RiskMetrics::default(),
            trades: Vec::new(),
        }
    }

    /// A failed report: no partial metrics, just the error text.
    pub fn failed(input: &BacktestInput, message: &str) -> Self {
        Self {
            success: false,
            error_message: Some(message.to_string()),
            final_amount: 0.0,
            initial_amount: input.initial_capital,
            ..Self::no_trades(input)
        }
    }

    /// Ranking key for leaderboard-style comparisons.
    pub fn fitness(&self) -> f64 {
        self.risk.comprehensive_score
    }
}

/// Evaluate a completed backtest into a performance-and-risk report.
///
/// Never panics on malformed input: validation errors surface as a
/// `success = false` report with a descriptive message.
pub fn evaluate(input: &BacktestInput, ratios: &dyn RatioCalculator) -> BacktestReport {
    match evaluate_inner(input, ratios) {
        Ok(report) => report,
        Err(e) => BacktestReport::failed(input, &e.to_string()),
    }
}

fn evaluate_inner(
    input: &BacktestInput,
    ratios: &dyn RatioCalculator,
) -> Result<BacktestReport, EvalError> {
    if input.initial_capital <= 0.0 {
        return Err(EvalError::NonPositiveCapital(input.initial_capital));
    }
    if input.positions.is_empty() {
        return Ok(BacktestReport::no_trades(input));
    }

    let trades = reconstruct_trades(
        &input.positions,
        &input.bars,
        input.initial_capital,
        input.fee_ratio,
    )?;
    let stats = TradeStatistics::compute(&trades, input.initial_capital);

    let factor = annualization_factor(&input.interval);
    let returns = strategy_returns(&input.bars, &input.positions);
    let total_return = stats.final_amount / input.initial_capital - 1.0;
    let return_metrics = ReturnMetrics::compute(total_return, input.bars.len(), factor);

    let closes: Vec<f64> = input.bars.iter().map(|b| b.close).collect();
    let benchmark_closes: Option<Vec<f64>> = input
        .benchmark
        .as_ref()
        .map(|bars| bars.iter().map(|b| b.close).collect());

    let risk = RiskMetrics::compute(
        &RiskInputs {
            returns: &returns,
            closes: &closes,
            benchmark_closes: benchmark_closes.as_deref(),
            return_metrics: &return_metrics,
            stats: &stats,
            risk_free_rate: input.risk_free_rate,
            annualization_factor: factor,
        },
        ratios,
    );
    let score = comprehensive_score(&return_metrics, &risk, &stats);
    let risk = RiskMetrics {
        comprehensive_score: score,
        ..risk
    };

    Ok(BacktestReport {
        strategy_name: input.strategy_name.clone(),
        parameters: input.parameters.clone(),
        success: true,
        error_message: None,
        initial_amount: input.initial_capital,
        final_amount: stats.final_amount,
        total_profit: stats.total_profit,
        total_fee: stats.total_fee,
        trade_count: stats.count,
        profitable_count: stats.profitable_count,
        win_rate: stats.win_rate,
        profit_factor: stats.profit_factor,
        average_profit: stats.average_profit,
        max_loss: stats.max_loss,
        max_drawdown: stats.max_drawdown,
        returns: return_metrics,
        risk,
        trades,
    })
}

/// Evaluate independent backtests in parallel, one rayon task each.
///
/// Evaluations share no state, so order in equals order out.
pub fn evaluate_batch(
    inputs: &[BacktestInput],
    ratios: &(dyn RatioCalculator + Sync),
) -> Vec<BacktestReport> {
    inputs
        .par_iter()
        .map(|input| evaluate(input, ratios))
        .collect()
}
