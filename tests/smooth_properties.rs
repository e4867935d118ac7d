//! Property-based tests for track smoothing
//!
//! **Feature: yeastwig, sliding-window and kernel smoothing**

use proptest::prelude::*;
use std::collections::BTreeSet;
use yeastwig::core::{
    kernel_regression, sliding_window_mean, smooth, ChromosomeTrack, EvaluationGrid,
    SignalError, SmoothInput, SmoothedPoint, SmoothingStrategy,
};

/// Generate a sorted series with distinct positions and small integer signals
fn arb_series() -> impl Strategy<Value = Vec<(i64, f64)>> {
    prop::collection::btree_map(-5_000i64..5_000, 0u8..50, 1..150)
        .prop_map(|m| m.into_iter().map(|(p, s)| (p, s as f64)).collect())
}

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: a 1 bp window returns the series unchanged
    #[test]
    fn prop_unit_bandwidth_identity(series in arb_series()) {
        let smoothed = sliding_window_mean(&series, 1).unwrap();
        let expected: Vec<SmoothedPoint> = series
            .iter()
            .map(|&(position, signal)| SmoothedPoint { position, signal })
            .collect();
        prop_assert_eq!(smoothed.points, expected);
    }

    /// Property: a window covering the inclusive span `last - first + 1` collapses the series to its mean
    #[test]
    fn prop_wide_window_single_mean(series in arb_series(), extra in 0u64..1_000) {
        let first = series[0].0;
        let last = series[series.len() - 1].0;
        let bandwidth = (last - first + 1) as u64 + extra;
        let smoothed = sliding_window_mean(&series, bandwidth).unwrap();

        prop_assert_eq!(smoothed.len(), 1);
        let mean = series.iter().map(|&(_, s)| s).sum::<f64>() / series.len() as f64;
        prop_assert!(approx_eq(smoothed.points[0].signal, mean));
        prop_assert_eq!(smoothed.points[0].position, first + (bandwidth as i64 - 1) / 2);
    }

    /// Property: a window one short of the inclusive span leaves the last position on its own
    #[test]
    fn prop_exclusive_span_splits_last(series in arb_series()) {
        let first = series[0].0;
        let last = series[series.len() - 1].0;
        prop_assume!(last > first);
        let bandwidth = (last - first) as u64;
        let smoothed = sliding_window_mean(&series, bandwidth).unwrap();

        prop_assert_eq!(smoothed.len(), 2);
        prop_assert_eq!(smoothed.points[1].signal, series[series.len() - 1].1);
        prop_assert_eq!(smoothed.points[1].position, last + (bandwidth as i64 - 1) / 2);
    }

    /// Property: windows are non-empty, ordered and each covers its own bandwidth
    #[test]
    fn prop_windows_ordered(series in arb_series(), bandwidth in 1u64..2_000) {
        let smoothed = sliding_window_mean(&series, bandwidth).unwrap();
        let first = series[0].0;
        let occupied: BTreeSet<i64> = series
            .iter()
            .map(|&(p, _)| (p - first).div_euclid(bandwidth as i64))
            .collect();

        prop_assert_eq!(smoothed.len(), occupied.len());
        for (point, window) in smoothed.points.iter().zip(&occupied) {
            let start = first + window * bandwidth as i64;
            prop_assert_eq!(point.position, start + (bandwidth as i64 - 1) / 2);
        }
    }

    /// Property: kernel smoothing of a constant series stays at that constant
    #[test]
    fn prop_kernel_constant(series in arb_series(), bandwidth in 1u64..3_000, c in -100.0f64..100.0) {
        let constant: Vec<(i64, f64)> = series.iter().map(|&(p, _)| (p, c)).collect();
        let smoothed = kernel_regression(&constant, bandwidth, EvaluationGrid::Original).unwrap();

        prop_assert_eq!(smoothed.len(), constant.len());
        prop_assert!(smoothed.unsupported.is_empty());
        for point in &smoothed.points {
            prop_assert!(approx_eq(point.signal, c));
        }
    }

    /// Property: kernel estimates stay within the range of the inputs
    #[test]
    fn prop_kernel_bounded(series in arb_series(), bandwidth in 1u64..3_000, step in 1u64..500) {
        let min = series.iter().map(|&(_, s)| s).fold(f64::INFINITY, f64::min);
        let max = series.iter().map(|&(_, s)| s).fold(f64::NEG_INFINITY, f64::max);
        let grid = EvaluationGrid::Regular { step };
        let smoothed = kernel_regression(&series, bandwidth, grid).unwrap();

        let first = series[0].0;
        let last = series[series.len() - 1].0;
        let grid_len = ((last - first) as u64 / step + 1) as usize;
        prop_assert_eq!(smoothed.len() + smoothed.unsupported.len(), grid_len);
        for point in &smoothed.points {
            prop_assert!(point.signal >= min - 1e-9 && point.signal <= max + 1e-9);
        }
    }
}

#[test]
fn test_sliding_window_documented_example() {
    let track = ChromosomeTrack::from_pairs([(0, 1.0), (100, 3.0), (199, 5.0), (300, 2.0)]).unwrap();
    let smoothed = smooth(
        SmoothInput::Track(&track),
        &SmoothingStrategy::SlidingWindow { bandwidth: 200 },
    )
    .unwrap();
    assert_eq!(
        smoothed.points,
        vec![
            SmoothedPoint { position: 99, signal: 3.0 },
            SmoothedPoint { position: 299, signal: 2.0 },
        ]
    );
}

#[test]
fn test_invalid_parameters() {
    let series = vec![(0, 1.0), (10, 2.0)];
    assert!(matches!(
        sliding_window_mean(&series, 0),
        Err(SignalError::InvalidParameter(_))
    ));
    assert!(matches!(
        kernel_regression(&series, 0, EvaluationGrid::Original),
        Err(SignalError::InvalidParameter(_))
    ));
    assert!(matches!(
        kernel_regression(&series, 10, EvaluationGrid::Regular { step: 0 }),
        Err(SignalError::InvalidParameter(_))
    ));
    assert!(matches!(
        sliding_window_mean(&[], 10),
        Err(SignalError::EmptyInput(_))
    ));
}
