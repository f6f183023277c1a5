//! HLWB projection — Halpern-type averaged projection onto triangle-consistent matrices.
//!
//! Each iteration pulls the working matrix toward the target with a decaying
//! Halpern weight, then sweeps every triple `i < j < k` once, projecting it
//! onto its triangle-inequality half-space:
//!
//! ```text
//! λ      = 0.382 / iter
//! X      ← λ·D + (1 − λ)·X
//! δ      = longest edge − other two edges        (first positive of three checks)
//! X(long)  -= δ/3,   X(other) += δ/3  (both others)
//! ```
//!
//! The repair sweep runs in place in row-major triple order, so a correction
//! is visible to every later triple of the same sweep. The visiting order fixes
//! the numeric trajectory, not the limit.
//!
//! # Invariants
//! - Exactly `iterations` iterations run; there is no early stop.
//! - The output is exactly symmetric with a zero diagonal.
//! - The repair sweep performs no heap allocation.

use std::time::Instant;

use crate::diagnostics::{blend_toward, count_violations, squared_error_ratio};
use crate::error::{MetricError, MetricResult};
use crate::matrix::DissimilarityMatrix;
use crate::observer::{IterationRecord, ProjectionObserver};

/// Numerator of the Halpern step `λ = HALPERN_STEP / iter`.
pub const HALPERN_STEP: f64 = 0.382;

/// HLWB projection operator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HlwbProjection {
    /// Number of averaging + repair iterations (default: 100). Must be at least 1.
    pub iterations: usize,
}

impl Default for HlwbProjection {
    fn default() -> Self {
        Self { iterations: 100 }
    }
}

impl HlwbProjection {
    /// Create an operator running `iterations` iterations.
    pub fn new(iterations: usize) -> Self {
        Self { iterations }
    }

    /// Project a private copy of `x0` toward `d`.
    pub fn run(
        &self,
        x0: &DissimilarityMatrix,
        d: &DissimilarityMatrix,
    ) -> MetricResult<DissimilarityMatrix> {
        self.run_observed(x0, d, ())
    }

    /// Same as [`run`](Self::run), reporting each iteration to `observer`.
    ///
    /// The observer never changes the trajectory; an inactive one costs nothing.
    pub fn run_observed<O: ProjectionObserver>(
        &self,
        x0: &DissimilarityMatrix,
        d: &DissimilarityMatrix,
        mut observer: O,
    ) -> MetricResult<DissimilarityMatrix> {
        x0.ensure_same_dim(d)?;
        if self.iterations == 0 {
            return Err(MetricError::InvalidIterationCount {
                count: self.iterations,
            });
        }

        let mut x = x0.clone();
        let mut total_corrections = 0u64;

        for iter in 1..=self.iterations {
            let lambda = HALPERN_STEP / iter as f64;
            blend_toward(&mut x, d, lambda);

            if !observer.is_active() {
                total_corrections += repair_triangles(&mut x);
                continue;
            }

            let nmse_before = squared_error_ratio(&x, d);
            let violations_before = count_violations(&x);
            let started = Instant::now();
            let corrections = repair_triangles(&mut x);
            let elapsed_secs = started.elapsed().as_secs_f64();
            total_corrections += corrections;

            observer.on_iteration(&IterationRecord {
                iteration: iter,
                lambda,
                nmse_before,
                violations_before,
                corrections,
                total_corrections,
                nmse_after: squared_error_ratio(&x, d),
                violations_after: count_violations(&x),
                elapsed_secs,
                last: iter == self.iterations,
            });
        }

        x.zero_diagonal();
        x.mirror_upper();
        Ok(x)
    }
}

/// Run `n_projection` HLWB iterations starting from `x0` toward `d`.
///
/// Shorthand for `HlwbProjection::new(n_projection).run(x0, d)`.
pub fn hlwb_projection(
    x0: &DissimilarityMatrix,
    d: &DissimilarityMatrix,
    n_projection: usize,
) -> MetricResult<DissimilarityMatrix> {
    HlwbProjection::new(n_projection).run(x0, d)
}

/// One in-place repair sweep over every triple `i < j < k`.
///
/// For each triple the three slacks are checked in the order `(i,j)`,
/// `(i,k)`, `(j,k)`; the first positive one is split evenly over the three
/// edges and the rest of the triple is skipped. Every write is mirrored.
///
/// Returns the number of corrected triples.
pub fn repair_triangles(x: &mut DissimilarityMatrix) -> u64 {
    let n = x.dim();
    let data = x.as_mut_slice();
    let mut corrections = 0u64;

    for i in 0..n {
        let ri = i * n;
        for j in (i + 1)..n {
            let rj = j * n;
            let mut rk = rj;
            for k in (j + 1)..n {
                rk += n;

                let delta = data[ri + j] - data[ri + k] - data[rj + k];
                if delta > 0.0 {
                    let s = delta / 3.0;
                    shift(data, ri + j, rj + i, -s);
                    shift(data, ri + k, rk + i, s);
                    shift(data, rj + k, rk + j, s);
                    corrections += 1;
                    continue;
                }

                let delta = data[ri + k] - data[ri + j] - data[rj + k];
                if delta > 0.0 {
                    let s = delta / 3.0;
                    shift(data, ri + k, rk + i, -s);
                    shift(data, ri + j, rj + i, s);
                    shift(data, rj + k, rk + j, s);
                    corrections += 1;
                    continue;
                }

                let delta = data[rj + k] - data[ri + j] - data[ri + k];
                if delta > 0.0 {
                    let s = delta / 3.0;
                    shift(data, rj + k, rk + j, -s);
                    shift(data, ri + j, rj + i, s);
                    shift(data, ri + k, rk + i, s);
                    corrections += 1;
                }
            }
        }
    }

    corrections
}

/// Add `by` to the upper entry and copy it into its mirror.
#[inline(always)]
fn shift(data: &mut [f64], upper: usize, lower: usize, by: f64) {
    data[upper] += by;
    data[lower] = data[upper];
}
