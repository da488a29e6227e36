//! Accuracy regression tests for divergent-metrics.
//!
//! Reference values for the fixed series pair below were computed once with an
//! independent double-precision evaluation of each formula and are hardcoded
//! to catch regressions.

use divergent_metrics::{
    MetricError, calculate_season_error, coefficient_of_variation, horizoned_metric, kendall, mae, mape, marre,
    mase, mse, mutual_information, nrmse, ope, pearson, r2_score, rmse, rmsle, smape, spearman, wape,
};
use divergent_series::{ErrorKind, Series};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn ts(values: &[f64]) -> Series {
    Series::univariate(values).expect("valid test series")
}

fn reference_pair() -> (Series, Series) {
    (
        ts(&[3.0, 1.0, 4.0, 1.0, 5.0, 9.0, 2.0, 6.0]),
        ts(&[2.0, 7.0, 1.0, 8.0, 2.0, 8.0, 1.0, 8.0]),
    )
}

type MetricFn = fn(&Series, &Series) -> Result<f64, MetricError>;

// ---------------------------------------------------------------------------
// a) metrics_match_known_values
// ---------------------------------------------------------------------------

#[test]
fn metrics_match_known_values() {
    let (t, p) = reference_pair();
    let cases: [(&str, MetricFn, f64); 14] = [
        ("mse", mse, 13.75),
        ("mae", mae, 3.0),
        ("rmse", rmse, 3.708_099_243_547_831_5),
        ("wape", wape, 77.419_354_838_709_68),
        ("marre", marre, 37.5),
        ("ope", ope, 1.411_764_705_882_353),
        ("r2_score", r2_score, -1.080_378_250_591_016_4),
        ("mape", mape, 195.347_222_222_222_2),
        ("smape", smape, 82.284_080_298_786_17),
        ("coefficient_of_variation", coefficient_of_variation, 93.715_090_621_509_35),
        ("rmsle", rmsle, 1.204_861_655_749_592_4),
        ("pearson", pearson, 0.209_655_319_073_012_2),
        ("spearman", spearman, 0.198_853_681_209_924_64),
        ("kendall", kendall, 0.160_514_470_781_025_63),
    ];

    for (name, metric, expected) in cases {
        let got = metric(&t, &p).unwrap();
        assert!(
            (got - expected).abs() < 1e-10,
            "{name}: got {got:.15}, expected {expected:.15}"
        );
    }

    let got = nrmse(&t, &p, None).unwrap();
    assert!((got - 1.442_351_637_931_402).abs() < 1e-10, "nrmse: got {got:.15}");
}

// ---------------------------------------------------------------------------
// b) seasonal_scaling_matches_known_values
// ---------------------------------------------------------------------------

#[test]
fn seasonal_scaling_matches_known_values() {
    let (t, p) = reference_pair();
    assert!((calculate_season_error(&t, 1).unwrap() - 27.0 / 7.0).abs() < 1e-12);
    assert!((calculate_season_error(&t, 2).unwrap() - 16.0 / 6.0).abs() < 1e-12);
    assert!((mase(&t, &p, None, 1).unwrap() - 7.0 / 9.0).abs() < 1e-12);
    assert!((mase(&t, &p, None, 2).unwrap() - 1.125).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// c) identical_inputs_are_perfect
// ---------------------------------------------------------------------------

#[test]
fn identical_inputs_are_perfect() {
    let (t, _) = reference_pair();
    for metric in [mse, mae, rmse, wape, marre, ope, mape, smape, rmsle] {
        assert!(metric(&t, &t).unwrap().abs() < 1e-12);
    }
    assert!((r2_score(&t, &t).unwrap() - 1.0).abs() < 1e-12);
    assert!((pearson(&t, &t).unwrap() - 1.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// d) broadcast_violation_fails_before_computing
// ---------------------------------------------------------------------------

#[test]
fn broadcast_violation_fails_before_computing() {
    let t = Series::from_flat(vec![1.0; 12], 3, 4).unwrap();
    let p = Series::from_flat(vec![2.0; 15], 3, 5).unwrap();
    let all: [MetricFn; 10] = [mse, mae, rmse, wape, marre, ope, r2_score, mape, smape, rmsle];
    for metric in all {
        let err = metric(&t, &p).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
    }
}

// ---------------------------------------------------------------------------
// e) multichannel_correlation_averages_channels
// ---------------------------------------------------------------------------

#[test]
fn multichannel_correlation_averages_channels() {
    let (t, p) = reference_pair();
    let wide_true = Series::from_channels(&[t.channel(0), t.channel(0)]).unwrap();
    let wide_pred = Series::from_channels(&[p.channel(0), t.channel(0)]).unwrap();
    let expected = (0.209_655_319_073_012_2 + 1.0) / 2.0;
    assert!((pearson(&wide_true, &wide_pred).unwrap() - expected).abs() < 1e-10);
}

// ---------------------------------------------------------------------------
// f) horizon_curve_is_prefix_wise
// ---------------------------------------------------------------------------

#[test]
fn horizon_curve_is_prefix_wise() {
    let (t, p) = reference_pair();
    let curve = horizoned_metric(&t, &p, None, mae).unwrap();
    assert_eq!(curve.len(), t.n_time());
    for (i, value) in curve.iter().enumerate() {
        let expected = mae(&t.head(i + 1), &p.head(i + 1)).unwrap();
        assert!((value - expected).abs() < 1e-12);
    }
    assert!((curve[t.n_time() - 1] - 3.0).abs() < 1e-12);
}

// ---------------------------------------------------------------------------
// g) mutual_information_requires_backend
// ---------------------------------------------------------------------------

#[test]
fn mutual_information_requires_backend() {
    let (t, p) = reference_pair();
    let err = mutual_information(&t, &p, None).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::CapabilityUnavailable);
}

#[cfg(feature = "knn-mi")]
#[test]
fn builtin_backend_detects_dependence() {
    use divergent_metrics::available_backend;

    let backend = available_backend().expect("knn-mi compiled in");
    let x: Vec<f64> = (0..200).map(|i| (i as f64 * 0.37).sin()).collect();
    let related: Vec<f64> = x.iter().map(|v| v * 3.0 - 1.0).collect();
    let t = ts(&x);
    let dependent = mutual_information(&t, &ts(&related), Some(backend.as_ref())).unwrap();
    assert!(dependent > 1.0, "dependent mi was {dependent}");
}
