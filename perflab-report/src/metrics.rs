//! Return and risk metrics — pure functions over the synthetic return series.
//!
//! Every metric is a pure function with a documented fallback for degenerate
//! input (empty series, zero denominators, insufficient sample). The classic
//! ratios (Sharpe, Sortino, Omega, Treynor, Ulcer, skewness, Calmar) are
//! delegated to the `RatioCalculator` collaborator.

use perflab_core::ratios::{RatioCalculator, RATIO_CAP};
use serde::{Deserialize, Serialize};

use crate::series::{
    self, drawdown_episodes, max_drawdown_duration, pain_index, ReturnSeries,
};
use crate::trade_stats::TradeStatistics;

/// Headline return figures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReturnMetrics {
    pub total_return: f64,
    pub annualized_return: f64,
}

impl ReturnMetrics {
    /// Compound `total_return` over the evaluated window to a yearly basis:
    /// `(1 + total) ^ (factor / bars) - 1`.
    pub fn compute(total_return: f64, bar_count: usize, annualization_factor: f64) -> Self {
        let annualized_return = if bar_count == 0 || total_return <= -1.0 {
            0.0
        } else {
            (1.0 + total_return).powf(annualization_factor / bar_count as f64) - 1.0
        };
        Self {
            total_return,
            annualized_return,
        }
    }
}

/// The full battery of risk statistics plus the comprehensive score.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    // ── Delegated ratios ──
    pub sharpe: f64,
    pub sortino: f64,
    pub calmar: f64,
    pub omega: f64,
    pub treynor: f64,
    pub ulcer_index: f64,
    pub skewness: f64,

    // ── Distribution / dispersion ──
    pub volatility: f64,
    pub kurtosis: f64,
    pub downside_deviation: f64,

    // ── Tail risk ──
    pub var_95: f64,
    pub var_99: f64,
    pub cvar: f64,

    // ── Benchmark-relative ──
    pub alpha: f64,
    pub beta: f64,
    pub tracking_error: f64,
    pub information_ratio: f64,
    pub upside_capture: f64,
    pub downside_capture: f64,

    // ── Drawdown shape (over the return series read as levels) ──
    pub sterling_ratio: f64,
    pub burke_ratio: f64,
    pub max_drawdown_duration: usize,
    pub pain_index: f64,

    // ── Composites ──
    pub modified_sharpe: f64,
    pub risk_adjusted_return: f64,
    pub comprehensive_score: f64,
}

/// Everything the risk battery reads. All borrows; nothing is mutated.
pub struct RiskInputs<'a> {
    pub returns: &'a ReturnSeries,
    /// Raw close series of the evaluated price history.
    pub closes: &'a [f64],
    /// Raw benchmark close series, when one was supplied.
    pub benchmark_closes: Option<&'a [f64]>,
    pub return_metrics: &'a ReturnMetrics,
    pub stats: &'a TradeStatistics,
    pub risk_free_rate: f64,
    pub annualization_factor: f64,
}

impl RiskMetrics {
    /// Compute every risk statistic except the comprehensive score (the
    /// scorer fills that in afterwards, see `scoring`).
    pub fn compute(inputs: &RiskInputs<'_>, ratios: &dyn RatioCalculator) -> Self {
        let r = inputs.returns.values();
        let rf = inputs.risk_free_rate;
        let factor = inputs.annualization_factor;
        let annualized = inputs.return_metrics.annualized_return;

        let sharpe = ratios.sharpe(r, rf, factor);
        let skewness = ratios.skewness(r);
        let kurtosis = excess_kurtosis(r);
        let vol = volatility(inputs.closes, factor);
        let downside = downside_deviation(r, 0.0);
        let (var_95, var_99, cvar) = var_cvar(r);

        let (alpha, beta) = match inputs.benchmark_closes {
            Some(closes) => alpha_beta(r, &series::log_returns(closes)),
            None => (0.0, 1.0),
        };
        let bench = inputs
            .benchmark_closes
            .map(|closes| series::benchmark_returns(closes, r.len()));
        let (tracking_error, information_ratio) = match &bench {
            Some(b) => tracking(r, b.values()),
            None => (0.0, 0.0),
        };
        let (upside_capture, downside_capture) = match &bench {
            Some(b) => capture_ratios(r, b.values()),
            None => (0.0, 0.0),
        };

        let levels = inputs.returns.as_levels();
        let episodes = drawdown_episodes(&levels);

        Self {
            sharpe,
            sortino: ratios.sortino(r, rf, factor),
            calmar: ratios.calmar(annualized, inputs.stats.max_drawdown),
            omega: ratios.omega(r, rf, factor),
            treynor: ratios.treynor(r, rf, beta),
            ulcer_index: ratios.ulcer_index(r),
            skewness,
            volatility: vol,
            kurtosis,
            downside_deviation: downside,
            var_95,
            var_99,
            cvar,
            alpha,
            beta,
            tracking_error,
            information_ratio,
            upside_capture,
            downside_capture,
            sterling_ratio: sterling_ratio(annualized, &episodes),
            burke_ratio: burke_ratio(annualized, &episodes),
            max_drawdown_duration: max_drawdown_duration(&levels),
            pain_index: pain_index(&levels),
            modified_sharpe: modified_sharpe(sharpe, skewness, kurtosis),
            risk_adjusted_return: risk_adjusted_return(
                inputs.return_metrics.total_return,
                vol,
                inputs.stats.max_drawdown,
                downside,
            ),
            comprehensive_score: 0.0,
        }
    }
}

// ─── Individual metric functions ────────────────────────────────────

/// Annualized volatility: stdev of the raw close series' log returns times
/// the square root of the annualization factor.
pub fn volatility(closes: &[f64], annualization_factor: f64) -> f64 {
    let log_r = series::log_returns(closes);
    series::std_dev(&log_r) * annualization_factor.max(0.0).sqrt()
}

/// OLS alpha/beta of strategy returns against benchmark returns.
///
/// Both series are truncated to the shorter length. Empty input (or a flat
/// benchmark) falls back to the neutral `{alpha: 0, beta: 1}`.
pub fn alpha_beta(strategy: &[f64], benchmark: &[f64]) -> (f64, f64) {
    let n = strategy.len().min(benchmark.len());
    if n == 0 {
        return (0.0, 1.0);
    }
    let s = &strategy[..n];
    let b = &benchmark[..n];
    let mean_s = series::mean(s);
    let mean_b = series::mean(b);

    let var_b: f64 = b.iter().map(|x| (x - mean_b).powi(2)).sum::<f64>() / n as f64;
    if var_b < 1e-15 {
        return (0.0, 1.0);
    }
    let cov: f64 = s
        .iter()
        .zip(b)
        .map(|(x, y)| (x - mean_s) * (y - mean_b))
        .sum::<f64>()
        / n as f64;

    let beta = cov / var_b;
    let alpha = mean_s - beta * mean_b;
    (alpha, beta)
}

/// Excess kurtosis: `E[(r - μ)^4] / σ^4 - 3` with population moments.
/// Needs at least 4 observations; 0 otherwise.
pub fn excess_kurtosis(returns: &[f64]) -> f64 {
    let n = returns.len();
    if n < 4 {
        return 0.0;
    }
    let mu = series::mean(returns);
    let var = returns.iter().map(|r| (r - mu).powi(2)).sum::<f64>() / n as f64;
    let sigma = var.sqrt();
    if sigma < 1e-15 {
        return 0.0;
    }
    returns.iter().map(|r| ((r - mu) / sigma).powi(4)).sum::<f64>() / n as f64 - 3.0
}

/// Empirical VaR at 95%/99% and CVaR, all as positive magnitudes.
///
/// Sort ascending and read the clamped `ceil(n * p) - 1` index; CVaR is the
/// mean of the tail through the VaR95 index (inclusive).
pub fn var_cvar(returns: &[f64]) -> (f64, f64, f64) {
    if returns.is_empty() {
        return (0.0, 0.0, 0.0);
    }
    let mut sorted = returns.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = sorted.len();

    let idx = |p: f64| -> usize {
        let raw = (n as f64 * p).ceil() as isize - 1;
        raw.clamp(0, n as isize - 1) as usize
    };
    let idx_95 = idx(0.05);
    let idx_99 = idx(0.01);

    let var_95 = -sorted[idx_95];
    let var_99 = -sorted[idx_99];
    let cvar = -series::mean(&sorted[..=idx_95]);
    (var_95, var_99, cvar)
}

/// Downside deviation: RMS of returns below `target`, over those returns
/// only. 0 when nothing falls below the target.
pub fn downside_deviation(returns: &[f64], target: f64) -> f64 {
    let below: Vec<f64> = returns
        .iter()
        .filter(|&&r| r < target)
        .map(|r| (r - target).powi(2))
        .collect();
    if below.is_empty() {
        return 0.0;
    }
    series::mean(&below).sqrt()
}

/// Tracking error (stdev of active returns) and information ratio
/// (mean active return over tracking error; 0 when the error is 0).
pub fn tracking(strategy: &[f64], benchmark: &[f64]) -> (f64, f64) {
    let diff: Vec<f64> = strategy.iter().zip(benchmark).map(|(s, b)| s - b).collect();
    let te = series::std_dev(&diff);
    let ir = if te < 1e-15 {
        0.0
    } else {
        series::mean(&diff) / te
    };
    (te, ir)
}

/// Sterling ratio: annualized return over the mean drawdown-episode depth.
pub fn sterling_ratio(annualized_return: f64, episodes: &[f64]) -> f64 {
    if episodes.is_empty() {
        return if annualized_return > 0.0 { RATIO_CAP } else { 0.0 };
    }
    let mean_dd = series::mean(episodes);
    if mean_dd < 1e-15 {
        return if annualized_return > 0.0 { RATIO_CAP } else { 0.0 };
    }
    annualized_return / mean_dd
}

/// Burke ratio: annualized return over the RMS drawdown-episode depth.
pub fn burke_ratio(annualized_return: f64, episodes: &[f64]) -> f64 {
    if episodes.is_empty() {
        return if annualized_return > 0.0 { RATIO_CAP } else { 0.0 };
    }
    let rms = (episodes.iter().map(|d| d * d).sum::<f64>() / episodes.len() as f64).sqrt();
    if rms < 1e-15 {
        return if annualized_return > 0.0 { RATIO_CAP } else { 0.0 };
    }
    annualized_return / rms
}

/// Modified Sharpe (Cornish-Fisher style adjustment):
/// `sharpe * (1 + (skew / 6) * sharpe - ((kurt - 3) / 24) * sharpe^2)`.
///
/// `kurt` arrives as excess kurtosis and the formula subtracts 3 again;
/// this double adjustment matches the historical behavior and is kept
/// deliberately (see DESIGN.md).
pub fn modified_sharpe(sharpe: f64, skewness: f64, kurtosis: f64) -> f64 {
    sharpe * (1.0 + (skewness / 6.0) * sharpe - ((kurtosis - 3.0) / 24.0) * sharpe * sharpe)
}

/// Up/down capture: strategy return summed over bars where the benchmark
/// was up (down), over the benchmark's own sum on those bars.
pub fn capture_ratios(strategy: &[f64], benchmark: &[f64]) -> (f64, f64) {
    let mut up_s = 0.0;
    let mut up_b = 0.0;
    let mut down_s = 0.0;
    let mut down_b = 0.0;
    for (&s, &b) in strategy.iter().zip(benchmark) {
        if b > 0.0 {
            up_s += s;
            up_b += b;
        } else if b < 0.0 {
            down_s += s;
            down_b += b;
        }
    }
    let up = if up_b.abs() < 1e-15 { 0.0 } else { up_s / up_b };
    let down = if down_b.abs() < 1e-15 {
        0.0
    } else {
        down_s / down_b
    };
    (up, down)
}

/// Total return discounted by a weighted blend of the risk magnitudes:
/// `total / (1 + 0.4|vol| + 0.4|max_dd| + 0.2|downside_dev|)`.
pub fn risk_adjusted_return(
    total_return: f64,
    volatility: f64,
    max_drawdown: f64,
    downside_deviation: f64,
) -> f64 {
    let denom =
        1.0 + 0.4 * volatility.abs() + 0.4 * max_drawdown.abs() + 0.2 * downside_deviation.abs();
    total_return / denom
}
