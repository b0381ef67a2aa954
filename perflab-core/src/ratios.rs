//! Ratio calculator — the standard-ratio collaborator interface.
//!
//! The report engine delegates the classic risk-adjusted ratios (Sharpe,
//! Sortino, Omega, Treynor, Ulcer index, skewness, Calmar) to this trait so
//! it never depends on a concrete statistics library. `StandardRatios`
//! provides the textbook formulas for callers that have no external
//! calculator to plug in.

/// Cap returned when a ratio's denominator is zero but its numerator is
/// strictly positive ("infinitely good" sentinel).
pub const RATIO_CAP: f64 = 999.9999;

/// Standard risk-adjusted ratios over a per-bar return series.
///
/// Implementations must be pure: same inputs, same outputs. Degenerate
/// inputs (empty series, zero variance) yield a fallback value, never a
/// panic.
pub trait RatioCalculator {
    /// Annualized Sharpe ratio.
    fn sharpe(&self, returns: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64;

    /// Annualized Sortino ratio (downside deviation only).
    fn sortino(&self, returns: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64;

    /// Omega ratio: probability-weighted gains over losses at the threshold.
    fn omega(&self, returns: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64;

    /// Treynor ratio: annualized excess return per unit of beta.
    fn treynor(&self, returns: &[f64], risk_free_rate: f64, beta: f64) -> f64;

    /// Ulcer index: RMS depth of drawdowns over the series.
    fn ulcer_index(&self, returns: &[f64]) -> f64;

    /// Skewness (third standardized moment) of the series.
    fn skewness(&self, returns: &[f64]) -> f64;

    /// Calmar ratio: annualized return over maximum drawdown magnitude.
    fn calmar(&self, annualized_return: f64, max_drawdown: f64) -> f64;
}

/// Textbook implementation of [`RatioCalculator`].
#[derive(Debug, Clone, Copy, Default)]
pub struct StandardRatios;

impl RatioCalculator for StandardRatios {
    fn sharpe(&self, returns: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64 {
        if returns.len() < 2 || annualization_factor <= 0.0 {
            return 0.0;
        }
        let per_bar_rf = risk_free_rate / annualization_factor;
        let excess: Vec<f64> = returns.iter().map(|r| r - per_bar_rf).collect();
        let std = sample_std(&excess);
        if std < 1e-15 {
            return 0.0;
        }
        mean(&excess) / std * annualization_factor.sqrt()
    }

    fn sortino(&self, returns: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64 {
        if returns.len() < 2 || annualization_factor <= 0.0 {
            return 0.0;
        }
        let per_bar_rf = risk_free_rate / annualization_factor;
        let excess: Vec<f64> = returns.iter().map(|r| r - per_bar_rf).collect();
        let downside_var =
            excess.iter().map(|r| r.min(0.0).powi(2)).sum::<f64>() / excess.len() as f64;
        let downside_std = downside_var.sqrt();
        if downside_std < 1e-15 {
            return 0.0;
        }
        mean(&excess) / downside_std * annualization_factor.sqrt()
    }

    fn omega(&self, returns: &[f64], risk_free_rate: f64, annualization_factor: f64) -> f64 {
        if returns.is_empty() || annualization_factor <= 0.0 {
            return 0.0;
        }
        let threshold = risk_free_rate / annualization_factor;
        let gains: f64 = returns.iter().map(|r| (r - threshold).max(0.0)).sum();
        let losses: f64 = returns.iter().map(|r| (threshold - r).max(0.0)).sum();
        if losses < 1e-15 {
            return if gains > 0.0 { RATIO_CAP } else { 0.0 };
        }
        gains / losses
    }

    fn treynor(&self, returns: &[f64], risk_free_rate: f64, beta: f64) -> f64 {
        if returns.is_empty() || beta.abs() < 1e-15 {
            return 0.0;
        }
        // The signature carries no interval, so annualize with the daily
        // trading convention.
        (mean(returns) * crate::interval::DEFAULT_ANNUALIZATION - risk_free_rate) / beta
    }

    fn ulcer_index(&self, returns: &[f64]) -> f64 {
        if returns.is_empty() {
            return 0.0;
        }
        let mut peak = returns[0];
        let mut sum_sq = 0.0;
        for &v in returns {
            if v > peak {
                peak = v;
            }
            if peak > 0.0 && v < peak {
                let dd = (peak - v) / peak;
                sum_sq += dd * dd;
            }
        }
        (sum_sq / returns.len() as f64).sqrt()
    }

    fn skewness(&self, returns: &[f64]) -> f64 {
        let n = returns.len();
        if n < 3 {
            return 0.0;
        }
        let mu = mean(returns);
        let var = returns.iter().map(|r| (r - mu).powi(2)).sum::<f64>() / n as f64;
        let sigma = var.sqrt();
        if sigma < 1e-15 {
            return 0.0;
        }
        returns.iter().map(|r| ((r - mu) / sigma).powi(3)).sum::<f64>() / n as f64
    }

    fn calmar(&self, annualized_return: f64, max_drawdown: f64) -> f64 {
        if max_drawdown.abs() < 1e-15 {
            return if annualized_return > 0.0 { RATIO_CAP } else { 0.0 };
        }
        annualized_return / max_drawdown.abs()
    }
}

fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

fn sample_std(values: &[f64]) -> f64 {
    if values.len() < 2 {
        return 0.0;
    }
    let mu = mean(values);
    let var = values.iter().map(|v| (v - mu).powi(2)).sum::<f64>() / (values.len() - 1) as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    const R: StandardRatios = StandardRatios;

    #[test]
    fn sharpe_zero_for_constant_returns() {
        let returns = vec![0.001; 100];
        assert_eq!(R.sharpe(&returns, 0.0, 252.0), 0.0);
    }

    #[test]
    fn sharpe_positive_for_positive_drift() {
        let returns: Vec<f64> = (0..252)
            .map(|i| if i % 2 == 0 { 0.002 } else { 0.0005 })
            .collect();
        let s = R.sharpe(&returns, 0.0, 252.0);
        assert!(s > 1.0, "expected high sharpe, got {s}");
    }

    #[test]
    fn sortino_zero_without_downside() {
        let returns = vec![0.001, 0.002, 0.003];
        assert_eq!(R.sortino(&returns, 0.0, 252.0), 0.0);
    }

    #[test]
    fn sortino_positive_with_small_downside() {
        let returns: Vec<f64> = (0..100)
            .map(|i| if i % 4 == 0 { -0.001 } else { 0.002 })
            .collect();
        assert!(R.sortino(&returns, 0.0, 252.0) > 0.0);
    }

    #[test]
    fn omega_all_gains_is_capped() {
        let returns = vec![0.01, 0.02];
        assert_eq!(R.omega(&returns, 0.0, 252.0), RATIO_CAP);
    }

    #[test]
    fn omega_balanced_near_one() {
        let returns = vec![0.01, -0.01, 0.02, -0.02];
        let o = R.omega(&returns, 0.0, 252.0);
        assert!((o - 1.0).abs() < 1e-10, "got {o}");
    }

    #[test]
    fn treynor_zero_beta_falls_back() {
        assert_eq!(R.treynor(&[0.01, 0.02], 0.0, 0.0), 0.0);
    }

    #[test]
    fn ulcer_zero_for_monotonic_rise() {
        let returns = vec![0.01, 0.02, 0.03, 0.04];
        assert_eq!(R.ulcer_index(&returns), 0.0);
    }

    #[test]
    fn ulcer_positive_after_drop_from_positive_peak() {
        let returns = vec![0.04, 0.01, 0.02, 0.04];
        assert!(R.ulcer_index(&returns) > 0.0);
    }

    #[test]
    fn skewness_zero_for_symmetric() {
        let returns = vec![-0.02, -0.01, 0.0, 0.01, 0.02];
        assert!(R.skewness(&returns).abs() < 1e-10);
    }

    #[test]
    fn skewness_negative_for_left_tail() {
        let mut returns = vec![0.001; 50];
        returns[10] = -0.05;
        returns[30] = -0.06;
        assert!(R.skewness(&returns) < 0.0);
    }

    #[test]
    fn calmar_basic_and_sentinel() {
        assert!((R.calmar(0.2, 0.1) - 2.0).abs() < 1e-10);
        assert_eq!(R.calmar(0.2, 0.0), RATIO_CAP);
        assert_eq!(R.calmar(-0.2, 0.0), 0.0);
    }
}
