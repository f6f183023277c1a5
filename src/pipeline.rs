//! End-to-end metric repair: heuristic warm start followed by HLWB projection.

use crate::error::MetricResult;
use crate::improve::HeuristicImprove;
use crate::matrix::DissimilarityMatrix;
use crate::observer::ProjectionObserver;
use crate::projection::HlwbProjection;

/// Absolute tolerance under which a target is treated as already symmetric.
pub const SYMMETRY_TOLERANCE: f64 = 1.0e-8;

/// Improve-then-project driver.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MetricNearness {
    /// Heuristic sweeps used as a warm start (default: 1).
    pub improve_sweeps: usize,
    /// HLWB iterations (default: 100). Must be at least 1.
    pub projection_iterations: usize,
}

impl Default for MetricNearness {
    fn default() -> Self {
        Self {
            improve_sweeps: 1,
            projection_iterations: 100,
        }
    }
}

impl MetricNearness {
    /// Create a driver with explicit sweep and iteration counts.
    pub fn new(improve_sweeps: usize, projection_iterations: usize) -> Self {
        Self {
            improve_sweeps,
            projection_iterations,
        }
    }

    /// Repair `d` into a nearby matrix that (approximately) satisfies every
    /// triangle inequality.
    pub fn solve(&self, d: &DissimilarityMatrix) -> MetricResult<DissimilarityMatrix> {
        self.solve_observed(d, ())
    }

    /// Same as [`solve`](Self::solve), reporting projection progress to `observer`.
    ///
    /// An asymmetric target is replaced by `(D + Dᵀ)/2` and its diagonal is
    /// zeroed before either operator runs; the prepared target also serves as
    /// the starting matrix.
    pub fn solve_observed<O: ProjectionObserver>(
        &self,
        d: &DissimilarityMatrix,
        observer: O,
    ) -> MetricResult<DissimilarityMatrix> {
        let target = prepare_target(d);
        log::debug!(
            "metric repair on {}x{} target: {} improve sweeps, {} projection iterations",
            target.dim(),
            target.dim(),
            self.improve_sweeps,
            self.projection_iterations,
        );

        let warm = HeuristicImprove::new(self.improve_sweeps).run(&target, &target)?;
        HlwbProjection::new(self.projection_iterations).run_observed(&warm, &target, observer)
    }
}

fn prepare_target(d: &DissimilarityMatrix) -> DissimilarityMatrix {
    let mut target = d.clone();
    if !target.is_symmetric_within(SYMMETRY_TOLERANCE) {
        log::debug!("target is not symmetric, averaging with its transpose");
        target.symmetrize_mean();
    }
    target.zero_diagonal();
    target
}
