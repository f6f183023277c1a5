//! Shared numerical utilities: in-place blending and progress metrics.
//!
//! The crate-internal blend step is part of the projection trajectory. The
//! public functions are pure reporting and never feed back into either operator.

use crate::error::MetricResult;
use crate::matrix::DissimilarityMatrix;

/// Slack a triangle may exceed before it counts as violated.
pub const VIOLATION_EPSILON: f64 = 1.0e-10;

/// Triangle-inequality violation tally.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ViolationCount {
    /// Violating `(i, j, k)` combinations, with `i < j` and `k ∉ {i, j}`.
    pub triples: usize,
    /// Pairs `i < j` with at least one violating `k`.
    pub pairs: usize,
}

impl ViolationCount {
    /// `true` when no triangle is violated.
    pub fn is_zero(&self) -> bool {
        self.triples == 0
    }
}

/// `X ← λ·D + (1 − λ)·X` over all n² entries, diagonal included.
///
/// Callers check dimensions first; a shorter `d` would leave the tail untouched.
pub(crate) fn blend_toward(x: &mut DissimilarityMatrix, d: &DissimilarityMatrix, lambda: f64) {
    debug_assert_eq!(x.dim(), d.dim());
    let keep = 1.0 - lambda;
    for (xv, &dv) in x.as_mut_slice().iter_mut().zip(d.as_slice()) {
        *xv = lambda * dv + keep * *xv;
    }
}

/// Normalised squared error `‖X − D‖² / ‖D‖²` (Frobenius, all n² entries).
///
/// No special case for a zero `D`: the division follows IEEE rules.
///
/// # Errors
///
/// [`MetricError::DimensionMismatch`](crate::MetricError::DimensionMismatch)
/// when `x` and `d` differ in size.
pub fn normalized_squared_error(
    x: &DissimilarityMatrix,
    d: &DissimilarityMatrix,
) -> MetricResult<f64> {
    x.ensure_same_dim(d)?;
    Ok(squared_error_ratio(x, d))
}

/// Unchecked body of [`normalized_squared_error`] for callers that already
/// validated the dimensions.
pub(crate) fn squared_error_ratio(x: &DissimilarityMatrix, d: &DissimilarityMatrix) -> f64 {
    debug_assert_eq!(x.dim(), d.dim());
    let mut se = 0.0;
    let mut norm_d = 0.0;
    for (&xv, &dv) in x.as_slice().iter().zip(d.as_slice()) {
        let diff = dv - xv;
        se += diff * diff;
        norm_d += dv * dv;
    }
    se / norm_d
}

/// Count triangles with `X(i,j) − ε > X(i,k) + X(j,k)` for `i < j`, `k ∉ {i, j}`.
pub fn count_violations(x: &DissimilarityMatrix) -> ViolationCount {
    let n = x.dim();
    let data = x.as_slice();
    let mut count = ViolationCount::default();
    for i in 0..n {
        let ri = &data[i * n..(i + 1) * n];
        for j in (i + 1)..n {
            let rj = &data[j * n..(j + 1) * n];
            let edge = ri[j];
            let mut pair_violated = false;
            for k in 0..n {
                if k == i || k == j {
                    continue;
                }
                if edge - VIOLATION_EPSILON > rj[k] + ri[k] {
                    count.triples += 1;
                    pair_violated = true;
                }
            }
            if pair_violated {
                count.pairs += 1;
            }
        }
    }
    count
}

/// Largest excess `X(i,j) − X(i,k) − X(j,k)` over all pairs and third points.
///
/// Zero when the matrix is metric or has fewer than three points.
pub fn max_violation(x: &DissimilarityMatrix) -> f64 {
    let n = x.dim();
    let mut worst = 0.0_f64;
    for i in 0..n {
        for j in (i + 1)..n {
            let edge = x.get(i, j);
            for k in 0..n {
                if k == i || k == j {
                    continue;
                }
                let excess = edge - x.get(i, k) - x.get(j, k);
                if excess > worst {
                    worst = excess;
                }
            }
        }
    }
    worst
}
