//! Comprehensive scoring — maps the metric battery into a single 0–10 score.
//!
//! Five weighted sub-scores, each the average of its constituent metric
//! scores. Every metric maps to [0, 10] piecewise-linearly: hitting the
//! target earns the full 10, the floor (0 for higher-is-better metrics,
//! three times the target for lower-is-better ones) earns 0. The weighted
//! sum is clamped to [0, 10] and then capped when the annualized return is
//! too small to be meaningful.

use crate::metrics::{ReturnMetrics, RiskMetrics};
use crate::trade_stats::TradeStatistics;

// ── Sub-score weights ──
const WEIGHT_RETURN: f64 = 0.35;
const WEIGHT_CORE_RISK: f64 = 0.25;
const WEIGHT_ADVANCED_RISK: f64 = 0.20;
const WEIGHT_TRADE_QUALITY: f64 = 0.12;
const WEIGHT_STABILITY: f64 = 0.08;

// ── Low-return caps ──
const LOW_RETURN_THRESHOLD: f64 = 0.01;
const LOW_RETURN_CAP: f64 = 3.0;
const MODEST_RETURN_THRESHOLD: f64 = 0.05;
const MODEST_RETURN_CAP: f64 = 6.0;

/// Combine the sub-scores into the final 0–10 comprehensive score.
pub fn comprehensive_score(
    returns: &ReturnMetrics,
    risk: &RiskMetrics,
    stats: &TradeStatistics,
) -> f64 {
    let weighted = WEIGHT_RETURN * return_score(returns, stats)
        + WEIGHT_CORE_RISK * core_risk_score(risk, stats)
        + WEIGHT_ADVANCED_RISK * advanced_risk_score(risk)
        + WEIGHT_TRADE_QUALITY * trade_quality_score(stats)
        + WEIGHT_STABILITY * stability_score(risk);

    let score = weighted.clamp(0.0, 10.0);
    if returns.annualized_return < LOW_RETURN_THRESHOLD {
        score.min(LOW_RETURN_CAP)
    } else if returns.annualized_return < MODEST_RETURN_THRESHOLD {
        score.min(MODEST_RETURN_CAP)
    } else {
        score
    }
}

/// Return sub-score: annualized return (20%), total return (50%),
/// profit factor (2.0).
pub(crate) fn return_score(returns: &ReturnMetrics, stats: &TradeStatistics) -> f64 {
    average(&[
        score_at_least(returns.annualized_return, 0.20),
        score_at_least(returns.total_return, 0.50),
        score_at_least(stats.profit_factor, 2.0),
    ])
}

/// Core risk sub-score: Sharpe (1.5), max drawdown (≤10%), Sortino (1.2),
/// Calmar (0.8), volatility (≤25%), Treynor (0.15).
pub(crate) fn core_risk_score(risk: &RiskMetrics, stats: &TradeStatistics) -> f64 {
    average(&[
        score_at_least(risk.sharpe, 1.5),
        score_at_most(stats.max_drawdown, 0.10),
        score_at_least(risk.sortino, 1.2),
        score_at_least(risk.calmar, 0.8),
        score_at_most(risk.volatility, 0.25),
        score_at_least(risk.treynor, 0.15),
    ])
}

/// Advanced risk sub-score: the tail, benchmark-relative and drawdown-shape
/// battery (15 constituents; the capture pair counts as two).
pub(crate) fn advanced_risk_score(risk: &RiskMetrics) -> f64 {
    average(&[
        score_at_most(risk.var_95, 0.04),
        score_at_most(risk.var_99, 0.06),
        score_at_most(risk.cvar, 0.06),
        score_at_least(risk.information_ratio, 0.5),
        score_at_most(risk.tracking_error, 0.05),
        score_at_least(risk.sterling_ratio, 1.0),
        score_at_least(risk.burke_ratio, 1.0),
        score_at_least(risk.modified_sharpe, 1.5),
        score_at_most(risk.downside_deviation, 0.10),
        score_at_least(risk.upside_capture, 1.0),
        score_at_most(risk.downside_capture, 0.8),
        score_at_most(risk.max_drawdown_duration as f64, 30.0),
        score_at_most(risk.ulcer_index, 0.05),
        score_at_least(risk.risk_adjusted_return, 0.15),
        score_at_least(risk.omega, 1.3),
    ])
}

/// Trade quality sub-score: win rate (≥65%), trade count (10–100 ideal
/// band), average profit (≥2%).
pub(crate) fn trade_quality_score(stats: &TradeStatistics) -> f64 {
    average(&[
        score_at_least(stats.win_rate, 0.65),
        score_count_band(stats.count),
        score_at_least(stats.average_profit, 0.02),
    ])
}

/// Stability sub-score: |skewness| ≤ 0.5, |kurtosis| ≤ 2.0, pain index ≤ 1%.
pub(crate) fn stability_score(risk: &RiskMetrics) -> f64 {
    average(&[
        score_at_most(risk.skewness.abs(), 0.5),
        score_at_most(risk.kurtosis.abs(), 2.0),
        score_at_most(risk.pain_index, 0.01),
    ])
}

// ─── Piecewise-linear mapping ───────────────────────────────────────

/// Higher is better: 10 at or above `target`, 0 at or below zero.
fn score_at_least(value: f64, target: f64) -> f64 {
    if value >= target {
        10.0
    } else if value <= 0.0 {
        0.0
    } else {
        10.0 * value / target
    }
}

/// Lower is better: 10 at or below `target`, 0 at or above three times it.
fn score_at_most(value: f64, target: f64) -> f64 {
    let ceiling = 3.0 * target;
    if value <= target {
        10.0
    } else if value >= ceiling {
        0.0
    } else {
        10.0 * (ceiling - value) / (ceiling - target)
    }
}

/// Trade count band: 0 at no trades, full score between 10 and 100,
/// tapering back to 0 at 300 (overtrading).
fn score_count_band(count: usize) -> f64 {
    let c = count as f64;
    if count == 0 {
        0.0
    } else if c < 10.0 {
        10.0 * c / 10.0
    } else if c <= 100.0 {
        10.0
    } else if c >= 300.0 {
        0.0
    } else {
        10.0 * (300.0 - c) / 200.0
    }
}

fn average(scores: &[f64]) -> f64 {
    if scores.is_empty() {
        return 0.0;
    }
    scores.iter().sum::<f64>() / scores.len() as f64
}
