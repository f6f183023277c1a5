//! Integration tests for the HLWB projection operator.

use metric_nearness::{
    count_violations, hlwb_projection, max_violation, normalized_squared_error, repair_triangles,
    DissimilarityMatrix, HlwbProjection, IterationRecord, MetricError, HALPERN_STEP,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ─── helpers ─────────────────────────────────────────────────────────────────

fn random_dissimilarity(rng: &mut ChaCha8Rng, n: usize, lo: f64, hi: f64) -> DissimilarityMatrix {
    let mut m = DissimilarityMatrix::zeros(n);
    for i in 0..n {
        for j in (i + 1)..n {
            m.set_symmetric(i, j, rng.gen_range(lo..hi));
        }
    }
    m
}

/// Five points, all one apart except a single edge of length 10.
fn one_long_edge() -> DissimilarityMatrix {
    DissimilarityMatrix::from_fn(5, |i, j| match (i.min(j), i.max(j)) {
        (a, b) if a == b => 0.0,
        (0, 1) => 10.0,
        _ => 1.0,
    })
}

// ─── triple correction ───────────────────────────────────────────────────────

#[test]
fn test_single_repair_pass_redistributes_excess() {
    let mut x = DissimilarityMatrix::from_rows(&[
        [0.0, 1.0, 1.0],
        [1.0, 0.0, 5.0],
        [1.0, 5.0, 0.0],
    ])
    .unwrap();
    let corrected = repair_triangles(&mut x);
    assert_eq!(corrected, 1);
    assert_eq!(x[(0, 1)], 2.0);
    assert_eq!(x[(0, 2)], 2.0);
    assert_eq!(x[(1, 2)], 4.0);
    assert_eq!(x[(2, 1)], 4.0);
    assert!(x[(1, 2)] <= x[(0, 1)] + x[(0, 2)]);
}

#[test]
fn test_corrections_are_visible_to_later_triples() {
    // Triple (0,1,2) is fixed first and raises (0,2) from 1 to 3, which then
    // makes (0,2,3) violated: 3 > 1 + 1.
    let mut x = DissimilarityMatrix::from_rows(&[
        [0.0, 1.0, 1.0, 1.0],
        [1.0, 0.0, 8.0, 4.0],
        [1.0, 8.0, 0.0, 1.0],
        [1.0, 4.0, 1.0, 0.0],
    ])
    .unwrap();
    assert_eq!(count_violations(&x).triples, 3);
    let corrected = repair_triangles(&mut x);
    // (0,1,2), then (0,2,3) through the raised edge, then (1,2,3).
    assert_eq!(corrected, 3);
    assert!(x[(0, 3)] > 1.0);
    assert!(x.is_symmetric());
}

// ─── contract ────────────────────────────────────────────────────────────────

#[test]
fn test_output_shape_symmetry_and_diagonal() {
    let mut rng = ChaCha8Rng::seed_from_u64(1);
    for n in [0, 1, 2, 3, 6, 10] {
        let d = random_dissimilarity(&mut rng, n, 0.5, 10.0);
        let x = hlwb_projection(&d, &d, 5).unwrap();
        assert_eq!(x.dim(), n);
        assert!(x.is_symmetric());
        assert!(x.has_zero_diagonal());
    }
}

#[test]
fn test_inputs_are_not_modified() {
    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let x0 = random_dissimilarity(&mut rng, 7, 0.0, 10.0);
    let d = random_dissimilarity(&mut rng, 7, 0.0, 10.0);
    let (x0_copy, d_copy) = (x0.clone(), d.clone());
    let _ = hlwb_projection(&x0, &d, 10).unwrap();
    assert_eq!(x0, x0_copy);
    assert_eq!(d, d_copy);
}

#[test]
fn test_invalid_arguments() {
    let d = DissimilarityMatrix::zeros(3);
    assert_eq!(
        hlwb_projection(&d, &d, 0),
        Err(MetricError::InvalidIterationCount { count: 0 })
    );
    let x0 = DissimilarityMatrix::zeros(4);
    assert_eq!(
        HlwbProjection::default().run(&x0, &d),
        Err(MetricError::DimensionMismatch { initial: 4, target: 3 })
    );
}

#[test]
fn test_default_runs_one_hundred_iterations() {
    let d = one_long_edge();
    let mut history: Vec<IterationRecord> = Vec::new();
    HlwbProjection::default().run_observed(&d, &d, &mut history).unwrap();
    assert_eq!(history.len(), 100);
    assert_eq!(history.last().map(|r| r.iteration), Some(100));
}

#[test]
fn test_step_size_schedule() {
    let d = one_long_edge();
    let mut history: Vec<IterationRecord> = Vec::new();
    HlwbProjection::new(4).run_observed(&d, &d, &mut history).unwrap();
    let lambdas: Vec<f64> = history.iter().map(|r| r.lambda).collect();
    assert_eq!(
        lambdas,
        vec![HALPERN_STEP, HALPERN_STEP / 2.0, HALPERN_STEP / 3.0, HALPERN_STEP / 4.0]
    );
}

#[test]
fn test_metric_input_is_preserved() {
    let d = DissimilarityMatrix::from_rows(&[
        [0.0, 3.0, 4.0],
        [3.0, 0.0, 5.0],
        [4.0, 5.0, 0.0],
    ])
    .unwrap();
    let x = hlwb_projection(&d, &d, 20).unwrap();
    for (a, b) in x.as_slice().iter().zip(d.as_slice()) {
        assert!((a - b).abs() < 1e-12, "{a} vs {b}");
    }
}

#[test]
fn test_nan_entry_propagates_without_error() {
    let mut d = one_long_edge();
    d.set_symmetric(2, 3, f64::NAN);
    let x = hlwb_projection(&d, &d, 3).unwrap();
    assert!(x[(2, 3)].is_nan());
    assert!(x[(3, 2)].is_nan());
}

// ─── convergence ─────────────────────────────────────────────────────────────

/// Any three points are repaired exactly by a single projection, so the
/// violation count is zero after every iteration count.
#[test]
fn test_three_points_end_violation_free() {
    let mut rng = ChaCha8Rng::seed_from_u64(17);
    for _ in 0..20 {
        let d = random_dissimilarity(&mut rng, 3, 0.0, 10.0);
        for iters in [1, 5, 50] {
            let x = hlwb_projection(&d, &d, iters).unwrap();
            assert!(count_violations(&x).is_zero(), "violations after {iters} iterations");
        }
    }
}

/// Small seeded matrices: the violation count never grows with more
/// iterations and is already zero at every tested iteration count.
#[test]
fn test_violation_count_trends_to_zero_for_small_matrices() {
    let mut started_violated = 0;
    for seed in [1, 2, 3, 2024] {
        for n in 4..=6 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let d = random_dissimilarity(&mut rng, n, 0.5, 10.0);
            started_violated += count_violations(&d).triples;

            let mut previous = usize::MAX;
            for iters in [1, 10, 100] {
                let x = hlwb_projection(&d, &d, iters).unwrap();
                let count = count_violations(&x);
                assert!(
                    count.triples <= previous,
                    "seed {seed}, n = {n}: count rose to {} at {iters} iterations",
                    count.triples
                );
                assert!(
                    count.is_zero(),
                    "seed {seed}, n = {n}: {count:?} after {iters} iterations"
                );
                previous = count.triples;
            }
        }
    }
    assert!(started_violated > 0, "seeded inputs should include violated triangles");
}

#[test]
fn test_long_edge_violation_shrinks() {
    let d = one_long_edge();
    let start = max_violation(&d);
    assert_eq!(start, 8.0);
    assert_eq!(count_violations(&d).triples, 3);

    let x = hlwb_projection(&d, &d, 300).unwrap();
    let end = count_violations(&x);
    assert!(end.is_zero(), "still violated: {end:?}");
    // The long edge is pulled in and its neighbours pushed out.
    assert!(x[(0, 1)] < 10.0);
    assert!(x[(0, 2)] > 1.0);
}

#[test]
fn test_random_matrix_violation_shrinks() {
    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let d = random_dissimilarity(&mut rng, 6, 0.5, 10.0);
    let start = max_violation(&d);
    assert!(start > 0.0, "seeded matrix should start non-metric");

    let x = hlwb_projection(&d, &d, 400).unwrap();
    let end = max_violation(&x);
    assert!(end < 0.1 * start, "max violation {end} vs initial {start}");
    let nmse = normalized_squared_error(&x, &d).unwrap();
    assert!(nmse.is_finite() && nmse < 1.0, "nmse = {nmse}");
}

#[test]
fn test_observer_records_progress() {
    let d = one_long_edge();
    let mut history: Vec<IterationRecord> = Vec::new();
    let x = HlwbProjection::new(30)
        .run_observed(&d, &d, &mut history)
        .unwrap();

    assert_eq!(history.len(), 30);
    let first = &history[0];
    // Averaging toward D itself leaves the violations in place for the first pass.
    assert!(first.violations_before.triples > 0);
    assert!(first.corrections > 0);
    assert!(history.iter().all(|r| r.elapsed_secs >= 0.0));
    let last = history.last().unwrap();
    assert!(last.last);
    assert_eq!(Ok(last.nmse_after), normalized_squared_error(&x, &d));
}
