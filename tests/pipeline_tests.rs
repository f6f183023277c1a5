//! End-to-end tests for the improve-then-project driver.

use metric_nearness::{
    heuristic_improve, hlwb_projection, max_violation, normalized_squared_error,
    DissimilarityMatrix, IterationRecord, MetricNearness,
};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

// ─── helpers ─────────────────────────────────────────────────────────────────

/// Euclidean distances between random planar points, each pair perturbed by
/// multiplicative noise so that some triangles break.
fn noisy_distances(rng: &mut ChaCha8Rng, n: usize, noise: f64) -> DissimilarityMatrix {
    let points: Vec<(f64, f64)> = (0..n)
        .map(|_| (rng.gen_range(0.0..10.0), rng.gen_range(0.0..10.0)))
        .collect();
    let mut d = DissimilarityMatrix::zeros(n);
    for i in 0..n {
        for j in (i + 1)..n {
            let (dx, dy) = (points[i].0 - points[j].0, points[i].1 - points[j].1);
            let scale = 1.0 + rng.gen_range(-noise..noise);
            d.set_symmetric(i, j, (dx * dx + dy * dy).sqrt() * scale);
        }
    }
    d
}

// ─── tests ───────────────────────────────────────────────────────────────────

#[test]
fn test_solve_matches_manual_composition() {
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let d = noisy_distances(&mut rng, 8, 0.6);
    let solver = MetricNearness::new(1, 40);

    let manual = {
        let warm = heuristic_improve(&d, &d, 1).unwrap();
        hlwb_projection(&warm, &d, 40).unwrap()
    };
    assert_eq!(solver.solve(&d).unwrap(), manual);
}

#[test]
fn test_solve_repairs_noisy_distances() {
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let d = noisy_distances(&mut rng, 10, 0.8);
    let x = MetricNearness::default().solve(&d).unwrap();

    assert_eq!(x.dim(), 10);
    assert!(x.is_symmetric());
    assert!(x.has_zero_diagonal());
    assert!(max_violation(&x) <= max_violation(&d));
    assert!(normalized_squared_error(&x, &d).unwrap() < 0.5);
}

#[test]
fn test_asymmetric_target_is_symmetrised_first() {
    let d = DissimilarityMatrix::from_rows(&[
        [0.0, 2.0, 3.0],
        [4.0, 0.0, 4.0],
        [3.0, 4.0, 0.0],
    ])
    .unwrap();
    let x = MetricNearness::new(1, 10).solve(&d).unwrap();
    // (0,1) averages to 3; the 3-3-4 triangle is already metric.
    assert!((x[(0, 1)] - 3.0).abs() < 1e-12);
    assert!((x[(1, 0)] - 3.0).abs() < 1e-12);
    assert!((x[(1, 2)] - 4.0).abs() < 1e-12);
}

#[test]
fn test_observer_sees_every_projection_iteration() {
    let mut rng = ChaCha8Rng::seed_from_u64(4);
    let d = noisy_distances(&mut rng, 6, 0.5);
    let mut history: Vec<IterationRecord> = Vec::new();
    let x = MetricNearness::new(2, 15)
        .solve_observed(&d, &mut history)
        .unwrap();
    assert_eq!(history.len(), 15);
    assert_eq!(x, MetricNearness::new(2, 15).solve(&d).unwrap());
}
