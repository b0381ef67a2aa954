//! End-to-end evaluation tests: full pipeline from positions to report.

use chrono::{TimeZone, Utc};
use perflab_core::domain::{Bar, ClosedPosition, Direction};
use perflab_core::ratios::{RatioCalculator, StandardRatios, RATIO_CAP};
use perflab_report::{evaluate, BacktestInput};

fn bars(closes: &[f64]) -> Vec<Bar> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| {
            Bar::new(
                Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                    + chrono::Duration::hours(i as i64),
                c,
            )
        })
        .collect()
}

fn long(entry: usize, exit: usize, entry_price: f64, exit_price: f64) -> ClosedPosition {
    ClosedPosition {
        entry_index: entry,
        entry_price,
        exit_index: exit,
        exit_price,
        direction: Direction::Long,
    }
}

fn make_input(closes: &[f64], positions: Vec<ClosedPosition>) -> BacktestInput {
    BacktestInput {
        strategy_name: "donchian-breakout".into(),
        parameters: "channel=20".into(),
        bars: bars(closes),
        benchmark: None,
        positions,
        initial_capital: 10_000.0,
        fee_ratio: 0.001,
        interval: "1h".into(),
        risk_free_rate: 0.0,
    }
}

/// A trending close series with enough structure for non-trivial metrics.
fn trending_closes(n: usize) -> Vec<f64> {
    (0..n)
        .map(|i| 100.0 * (1.0 + 0.001 * i as f64) + (i as f64 * 0.7).sin() * 2.0)
        .collect()
}

#[test]
fn zero_trades_is_a_defined_success_report() {
    let report = evaluate(&make_input(&trending_closes(50), vec![]), &StandardRatios);
    assert!(report.success);
    assert!(report.error_message.is_none());
    assert!(report.trades.is_empty());
    assert_eq!(report.trade_count, 0);
    assert_eq!(report.total_profit, 0.0);
    assert_eq!(report.total_fee, 0.0);
    assert_eq!(report.max_loss, 0.0);
    assert_eq!(report.max_drawdown, 0.0);
    assert_eq!(report.returns.total_return, 0.0);
    assert_eq!(report.returns.annualized_return, 0.0);
    assert_eq!(report.risk.sharpe, 0.0);
    assert_eq!(report.risk.comprehensive_score, 0.0);
}

#[test]
fn worked_fee_example_flows_through_the_report() {
    let report = evaluate(
        &make_input(&[100.0, 104.0, 110.0], vec![long(0, 2, 100.0, 110.0)]),
        &StandardRatios,
    );
    assert!(report.success);
    let t = &report.trades[0];
    assert!((t.fee - 20.989).abs() < 1e-9);
    assert!((t.profit - 978.011).abs() < 1e-9);
    assert!((report.final_amount - 10_978.011).abs() < 1e-9);
    assert!((report.total_fee - 20.989).abs() < 1e-9);
}

#[test]
fn all_winning_trades_hit_the_profit_factor_sentinel() {
    let closes = [100.0, 105.0, 106.0, 111.0, 112.0, 118.0];
    let positions = vec![
        long(0, 1, 100.0, 105.0),
        long(2, 3, 106.0, 111.0),
        long(4, 5, 112.0, 118.0),
    ];
    let report = evaluate(&make_input(&closes, positions), &StandardRatios);
    assert!(report.success);
    assert_eq!(report.profit_factor, RATIO_CAP);
    assert!((report.win_rate - 1.0).abs() < 1e-12);
}

#[test]
fn losses_and_drawdowns_are_never_negative() {
    let closes = [100.0, 92.0, 97.0, 88.0, 95.0, 91.0, 99.0, 94.0];
    let positions = vec![
        long(0, 3, 100.0, 88.0),
        ClosedPosition {
            entry_index: 4,
            entry_price: 95.0,
            exit_index: 7,
            exit_price: 94.0,
            direction: Direction::Short,
        },
    ];
    let report = evaluate(&make_input(&closes, positions), &StandardRatios);
    assert!(report.success);
    for t in &report.trades {
        assert!(t.max_loss >= 0.0, "trade {} max_loss negative", t.index);
        assert!(t.max_drawdown >= 0.0, "trade {} max_drawdown negative", t.index);
    }
    assert!(report.max_loss >= 0.0);
    assert!(report.max_drawdown >= 0.0);
}

#[test]
fn losing_strategy_scores_low_but_in_bounds() {
    let closes = [100.0, 96.0, 98.0, 93.0, 95.0, 90.0];
    let positions = vec![long(0, 2, 100.0, 98.0), long(3, 5, 93.0, 90.0)];
    let report = evaluate(&make_input(&closes, positions), &StandardRatios);
    assert!(report.success);
    assert!(report.total_profit < 0.0);
    let score = report.risk.comprehensive_score;
    assert!((0.0..=3.0).contains(&score), "expected capped score, got {score}");
}

#[test]
fn profitable_strategy_with_benchmark_produces_full_battery() {
    let closes = trending_closes(120);
    let bench: Vec<f64> = (0..120).map(|i| 50.0 * (1.0 + 0.0008 * i as f64)).collect();
    let positions = vec![
        long(0, 30, closes[0], closes[30]),
        long(40, 70, closes[40], closes[70]),
        long(80, 110, closes[80], closes[110]),
    ];
    let mut input = make_input(&closes, positions);
    input.benchmark = Some(bars(&bench));
    let report = evaluate(&input, &StandardRatios);

    assert!(report.success);
    assert!(report.total_profit > 0.0);
    assert!(report.risk.volatility > 0.0);
    assert!(report.risk.var_95.is_finite());
    assert!(report.risk.tracking_error > 0.0);
    assert!(report.risk.beta.is_finite());
    assert!(report.risk.sterling_ratio.is_finite());
    assert!(report.risk.burke_ratio.is_finite());
    assert!(report.risk.modified_sharpe.is_finite());
    assert!(report.risk.risk_adjusted_return.is_finite());
    assert!((0.0..=10.0).contains(&report.risk.comprehensive_score));
}

#[test]
fn interval_drives_annualization() {
    let closes = trending_closes(60);
    let positions = vec![long(0, 59, closes[0], closes[59])];
    let hourly = evaluate(&make_input(&closes, positions.clone()), &StandardRatios);

    let mut daily_input = make_input(&closes, positions);
    daily_input.interval = "1d".into();
    let daily = evaluate(&daily_input, &StandardRatios);

    // Same window compounded with factor 8760 vs 365.
    assert!(hourly.returns.annualized_return > daily.returns.annualized_return);
    assert_eq!(hourly.returns.total_return, daily.returns.total_return);
}

/// The engine only sees the trait, so a custom calculator can be plugged in.
struct FixedRatios;

impl RatioCalculator for FixedRatios {
    fn sharpe(&self, _: &[f64], _: f64, _: f64) -> f64 {
        2.5
    }
    fn sortino(&self, _: &[f64], _: f64, _: f64) -> f64 {
        3.0
    }
    fn omega(&self, _: &[f64], _: f64, _: f64) -> f64 {
        1.4
    }
    fn treynor(&self, _: &[f64], _: f64, _: f64) -> f64 {
        0.2
    }
    fn ulcer_index(&self, _: &[f64]) -> f64 {
        0.01
    }
    fn skewness(&self, _: &[f64]) -> f64 {
        0.1
    }
    fn calmar(&self, _: f64, _: f64) -> f64 {
        1.0
    }
}

#[test]
fn delegated_ratios_come_from_the_collaborator() {
    let closes = trending_closes(40);
    let report = evaluate(
        &make_input(&closes, vec![long(0, 39, closes[0], closes[39])]),
        &FixedRatios,
    );
    assert!(report.success);
    assert_eq!(report.risk.sharpe, 2.5);
    assert_eq!(report.risk.sortino, 3.0);
    assert_eq!(report.risk.omega, 1.4);
    assert_eq!(report.risk.ulcer_index, 0.01);
    assert_eq!(report.risk.calmar, 1.0);
}
