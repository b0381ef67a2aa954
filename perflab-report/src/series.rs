//! Return and level series — the synthetic per-bar return curve and the
//! peak/trough analyses that run over it.
//!
//! The evaluator reuses one array with two meanings: the ratio formulas read
//! it as per-bar *returns*, while Sterling/Burke, drawdown duration and the
//! pain index read the very same values as a *level* line and run
//! peak-to-trough analysis on them. `ReturnSeries` and `LevelSeries` make
//! that reuse explicit: the only way to get a level view of returns is the
//! documented `as_levels` conversion.

use perflab_core::domain::{Bar, ClosedPosition};
use serde::{Deserialize, Serialize};

/// Per-bar returns of the strategy (or a benchmark).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReturnSeries(Vec<f64>);

/// A series read as price/equity levels for peak-to-trough analysis.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelSeries(Vec<f64>);

impl ReturnSeries {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reinterpret the raw return values as a level line.
    ///
    /// This is NOT a cumulation into an equity curve: the historical
    /// behavior runs peak-to-trough analysis directly on the per-bar return
    /// values, and Sterling/Burke, drawdown duration and pain index keep
    /// that behavior. The conversion exists so every such call site is
    /// visible and deliberate.
    pub fn as_levels(&self) -> LevelSeries {
        LevelSeries(self.0.clone())
    }
}

impl LevelSeries {
    pub fn values(&self) -> &[f64] {
        &self.0
    }
}

/// Build the synthetic per-bar return series for a set of closed positions.
///
/// Out-of-position bars contribute 0. The entry bar of each position
/// contributes 0 (no P&L realized yet); every later in-position bar
/// contributes `ln(close[i] / close[i-1])`. The bar after an exit is out of
/// position again, so it is 0 unless it is the entry bar of the next
/// position (also 0).
pub fn strategy_returns(bars: &[Bar], positions: &[ClosedPosition]) -> ReturnSeries {
    let n = bars.len();
    let mut in_position = vec![false; n];
    let mut is_entry = vec![false; n];
    for p in positions {
        if p.entry_index < n {
            is_entry[p.entry_index] = true;
        }
        for flag in in_position
            .iter_mut()
            .take(p.exit_index.min(n.saturating_sub(1)) + 1)
            .skip(p.entry_index)
        {
            *flag = true;
        }
    }

    let mut returns = vec![0.0; n];
    for i in 1..n {
        if in_position[i] && !is_entry[i] && bars[i - 1].close > 0.0 && bars[i].close > 0.0 {
            returns[i] = (bars[i].close / bars[i - 1].close).ln();
        }
    }
    ReturnSeries(returns)
}

/// Log returns of a raw close series (length `n - 1`).
pub fn log_returns(closes: &[f64]) -> Vec<f64> {
    if closes.len() < 2 {
        return Vec::new();
    }
    closes
        .windows(2)
        .map(|w| {
            if w[0] > 0.0 && w[1] > 0.0 {
                (w[1] / w[0]).ln()
            } else {
                0.0
            }
        })
        .collect()
}

/// Benchmark returns aligned to the strategy series.
///
/// Index 0 is 0 (no prior close), then log returns; the result is truncated
/// or zero-padded to `target_len`.
pub fn benchmark_returns(closes: &[f64], target_len: usize) -> ReturnSeries {
    let mut returns = Vec::with_capacity(target_len);
    returns.push(0.0);
    returns.extend(log_returns(closes));
    returns.resize(target_len, 0.0);
    returns.truncate(target_len);
    ReturnSeries(returns)
}

// ─── Level-series analyses ──────────────────────────────────────────

/// Peak-to-trough depth of every completed or unresolved drawdown episode.
///
/// An episode starts when the level falls below the running peak and ends
/// when it recovers to the peak (or the series ends). Episodes whose peak is
/// not positive are skipped (the depth ratio is undefined there).
pub fn drawdown_episodes(levels: &LevelSeries) -> Vec<f64> {
    let values = levels.values();
    let mut episodes = Vec::new();
    if values.is_empty() {
        return episodes;
    }

    let mut peak = values[0];
    let mut trough = values[0];
    let mut in_drawdown = false;

    for &v in &values[1..] {
        if v >= peak {
            if in_drawdown && peak > 0.0 {
                episodes.push((peak - trough) / peak);
            }
            in_drawdown = false;
            peak = v;
        } else {
            if !in_drawdown {
                in_drawdown = true;
                trough = v;
            } else if v < trough {
                trough = v;
            }
        }
    }
    if in_drawdown && peak > 0.0 {
        episodes.push((peak - trough) / peak);
    }
    episodes
}

/// Longest run of bars where the level stays below its running peak,
/// counting an unresolved run at the end of the series.
pub fn max_drawdown_duration(levels: &LevelSeries) -> usize {
    let values = levels.values();
    if values.is_empty() {
        return 0;
    }
    let mut peak = values[0];
    let mut run = 0;
    let mut longest = 0;
    for &v in &values[1..] {
        if v >= peak {
            peak = v;
            run = 0;
        } else {
            run += 1;
            longest = longest.max(run);
        }
    }
    longest
}

/// Mean depth below the running peak over all points.
///
/// A point contributes `(peak - current) / peak` when it sits below the peak
/// and is positive, 0 otherwise.
pub fn pain_index(levels: &LevelSeries) -> f64 {
    let values = levels.values();
    if values.is_empty() {
        return 0.0;
    }
    let mut peak = values[0];
    let mut sum = 0.0;
    for &v in values {
        if v > peak {
            peak = v;
        }
        if v < peak && v > 0.0 {
            sum += (peak - v) / peak;
        }
    }
    sum / values.len() as f64
}

// ─── Scalar helpers ─────────────────────────────────────────────────

pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn std_dev(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mu = mean(values);
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}
