//! Accuracy regression tests for divergent-dtw.
//!
//! These tests pin the normalized alignment cost, the traceback tie-break order,
//! and the structural guarantees of the warping path. Reference values were
//! computed once and are hardcoded to catch regressions.

use divergent_dtw::{Dtw, DtwError, dtw};
use divergent_series::{ErrorKind, Series};

// ---------------------------------------------------------------------------
// Helper
// ---------------------------------------------------------------------------

fn ts(values: &[f64]) -> Series {
    Series::univariate(values).expect("valid test series")
}

fn sine(n: usize, freq: f64, phase: f64) -> Series {
    let values: Vec<f64> = (0..n).map(|i| (i as f64 * freq + phase).sin()).collect();
    ts(&values)
}

// ---------------------------------------------------------------------------
// a) costs_and_paths_match_known_values
// ---------------------------------------------------------------------------

/// (y_true, y_pred, normalized cost, D[n, m], true indices, pred indices)
type Case = (Vec<f64>, Vec<f64>, f64, f64, Vec<usize>, Vec<usize>);

#[test]
fn costs_and_paths_match_known_values() {
    let cases: Vec<Case> = vec![
        (vec![1.0, 2.0, 3.0], vec![3.0, 2.0, 1.0], 0.5, 4.0, vec![0, 1, 2], vec![0, 1, 2]),
        (vec![0.0, 0.0, 0.0], vec![1.0, 1.0, 1.0], 0.375, 3.0, vec![0, 1, 2], vec![0, 1, 2]),
        (vec![1.0], vec![5.0], 1.0, 4.0, vec![0], vec![0]),
        (
            vec![0.0, 1.0, 0.0],
            vec![0.0, 0.0, 0.0],
            0.125,
            1.0,
            vec![0, 1, 2, 2, 2],
            vec![0, 0, 0, 1, 2],
        ),
        (
            vec![0.0, 5.0, 0.0, 5.0],
            vec![5.0, 0.0, 5.0, 0.0],
            1.0,
            10.0,
            vec![0, 1, 2, 3, 3],
            vec![0, 0, 1, 2, 3],
        ),
        (
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![2.0, 3.0, 4.0],
            0.2,
            2.0,
            vec![0, 1, 2, 3, 4],
            vec![0, 0, 1, 2, 2],
        ),
    ];

    for (k, (a, b, cost, total, t_idx, p_idx)) in cases.into_iter().enumerate() {
        let (got_cost, matrix, got_t, got_p) = dtw(&ts(&a), &ts(&b)).unwrap();
        assert!((got_cost - cost).abs() < 1e-12, "case {k}: cost {got_cost:.15}");
        assert!((matrix.total() - total).abs() < 1e-12, "case {k}: total {}", matrix.total());
        assert_eq!(got_t, t_idx, "case {k}: true indices");
        assert_eq!(got_p, p_idx, "case {k}: pred indices");
    }
}

#[test]
fn multichannel_known_value() {
    let a = Series::from_rows(&[vec![0.0, 0.0], vec![1.0, 1.0], vec![2.0, 2.0]]).unwrap();
    let b = Series::from_rows(&[vec![0.0, 0.0], vec![2.0, 2.0]]).unwrap();
    let (cost, matrix, t, p) = dtw(&a, &b).unwrap();
    assert!((matrix.total() - 2.0_f64.sqrt()).abs() < 1e-12);
    assert!((cost - 2.0_f64.sqrt() / 7.0).abs() < 1e-12);
    assert_eq!(t, vec![0, 1, 2]);
    assert_eq!(p, vec![0, 1, 1]);
}

// ---------------------------------------------------------------------------
// b) identity_is_diagonal
// ---------------------------------------------------------------------------

#[test]
fn identity_is_diagonal() {
    for x in [sine(40, 0.3, 0.0), ts(&[2.0, -1.0, 7.5, 0.0, 3.25])] {
        let alignment = Dtw::new().align(&x, &x).unwrap();
        assert_eq!(alignment.cost(), 0.0);
        let diagonal: Vec<usize> = (0..x.n_time()).collect();
        assert_eq!(alignment.true_indices(), diagonal);
        assert_eq!(alignment.pred_indices(), diagonal);
    }
}

// ---------------------------------------------------------------------------
// c) path_is_monotone_and_anchored
// ---------------------------------------------------------------------------

#[test]
fn path_is_monotone_and_anchored() {
    let pairs = [
        (sine(30, 0.2, 0.0), sine(45, 0.15, 0.4)),
        (sine(50, 0.5, 1.0), sine(12, 0.1, 0.0)),
        (ts(&[1.0, 1.0, 1.0]), ts(&[1.0, 1.0, 1.0, 1.0, 1.0])),
        (ts(&[4.0]), sine(9, 0.7, 0.0)),
    ];
    for (a, b) in &pairs {
        let alignment = Dtw::new().align(a, b).unwrap();
        let steps = alignment.path().steps();
        let first = steps.first().unwrap();
        let last = steps.last().unwrap();
        assert_eq!((first.t, first.p), (0, 0));
        assert_eq!((last.t, last.p), (a.n_time() - 1, b.n_time() - 1));
        for w in steps.windows(2) {
            let dt = w[1].t - w[0].t;
            let dp = w[1].p - w[0].p;
            assert!(dt <= 1 && dp <= 1 && dt + dp >= 1, "bad step {:?} -> {:?}", w[0], w[1]);
        }
        assert_eq!(alignment.true_indices().len(), alignment.pred_indices().len());
    }
}

// ---------------------------------------------------------------------------
// d) padding_costs_far_less_than_reversal
// ---------------------------------------------------------------------------

/// Repeating every sample is absorbed by warping; reversing is not.
#[test]
fn padding_costs_far_less_than_reversal() {
    let base = ts(&[1.0, 2.0, 3.0]);
    let padded = ts(&[1.0, 1.0, 2.0, 2.0, 3.0, 3.0]);
    let reversed = ts(&[3.0, 2.0, 1.0]);
    let padded_cost = Dtw::new().align(&base, &padded).unwrap().cost();
    let reversed_cost = Dtw::new().align(&base, &reversed).unwrap().cost();
    assert!(padded_cost >= 0.0);
    assert!(padded_cost < 0.1 * reversed_cost);
}

// ---------------------------------------------------------------------------
// e) warp_produces_equal_lengths
// ---------------------------------------------------------------------------

#[test]
fn warp_produces_equal_lengths() {
    let a = sine(25, 0.3, 0.0);
    let b = sine(35, 0.2, 0.0);
    let alignment = Dtw::new().align(&a, &b).unwrap();
    let (wa, wb) = alignment.warp(&a, &b).unwrap();
    assert_eq!(wa.n_time(), alignment.path().len());
    assert_eq!(wb.n_time(), alignment.path().len());
}

// ---------------------------------------------------------------------------
// f) errors_are_preconditions
// ---------------------------------------------------------------------------

#[test]
fn errors_are_preconditions() {
    let a = Series::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0]]).unwrap();
    let b = ts(&[1.0, 2.0]);
    let err = Dtw::new().align(&a, &b).unwrap_err();
    assert!(matches!(err, DtwError::ChannelMismatch { .. }));
    assert_eq!(err.kind(), ErrorKind::PreconditionViolation);
}
