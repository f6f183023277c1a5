//! Heuristic Improve — greedy single-sweep triangle tightening.
//!
//! Every off-diagonal pair `(i, j)` is first pulled to its target `D(i,j)`,
//! then tightened toward the bound implied by the current matrix:
//!
//! ```text
//! X(i,j) > D(i,j) at sweep start  →  X(i,j) = max(D(i,j), maxₖ |X(k,i) − X(k,j)|)
//! otherwise                        →  X(i,j) = min(D(i,j), minₖ  X(k,i) + X(k,j))
//! ```
//!
//! Pairs are visited in row-major order (`i` outer, `j > i` inner) and the
//! scans read entries already rewritten earlier in the same sweep. The
//! "exceeds D" flags, in contrast, are captured for the whole sweep before the
//! first write.
//!
//! This is a heuristic: no convergence test is made and the result may still
//! violate some triangles.

use crate::error::MetricResult;
use crate::matrix::DissimilarityMatrix;

/// Configuration for the heuristic improve operator.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HeuristicImprove {
    /// Number of full sweeps over all pairs. Zero returns the initial matrix unchanged.
    pub sweeps: usize,
}

impl Default for HeuristicImprove {
    fn default() -> Self {
        Self { sweeps: 1 }
    }
}

impl HeuristicImprove {
    /// Create an operator running `sweeps` sweeps.
    pub fn new(sweeps: usize) -> Self {
        Self { sweeps }
    }

    /// Run the sweeps on a private copy of `x0`, pulling toward `d`.
    ///
    /// Fails only if `x0` and `d` differ in dimension. Neither input is modified.
    pub fn run(
        &self,
        x0: &DissimilarityMatrix,
        d: &DissimilarityMatrix,
    ) -> MetricResult<DissimilarityMatrix> {
        x0.ensure_same_dim(d)?;
        let mut x = x0.clone();
        if self.sweeps == 0 {
            return Ok(x);
        }

        let mut exceeds = vec![false; d.dim() * d.dim()];
        for _ in 0..self.sweeps {
            snapshot_exceeds(&x, d, &mut exceeds);
            sweep(&mut x, d, &exceeds);
        }
        Ok(x)
    }
}

/// Run `n_improve` heuristic sweeps starting from `x0` toward `d`.
///
/// Shorthand for `HeuristicImprove::new(n_improve).run(x0, d)`.
pub fn heuristic_improve(
    x0: &DissimilarityMatrix,
    d: &DissimilarityMatrix,
    n_improve: usize,
) -> MetricResult<DissimilarityMatrix> {
    HeuristicImprove::new(n_improve).run(x0, d)
}

fn snapshot_exceeds(x: &DissimilarityMatrix, d: &DissimilarityMatrix, exceeds: &mut [bool]) {
    for ((flag, &xv), &dv) in exceeds.iter_mut().zip(x.as_slice()).zip(d.as_slice()) {
        *flag = xv > dv;
    }
}

fn sweep(x: &mut DissimilarityMatrix, d: &DissimilarityMatrix, exceeds: &[bool]) {
    let n = x.dim();
    let target = d.as_slice();
    let data = x.as_mut_slice();

    for i in 0..n {
        for j in (i + 1)..n {
            let ij = i * n + j;
            let ji = j * n + i;
            let dij = target[ij];
            data[ij] = dij;
            data[ji] = dij;

            // Column scan over X(k,i), X(k,j); k includes i and j.
            let mut v = dij;
            if exceeds[ij] {
                for row in data.chunks_exact(n) {
                    let gap = (row[i] - row[j]).abs();
                    if gap > v {
                        v = gap;
                    }
                }
            } else {
                for row in data.chunks_exact(n) {
                    let path = row[i] + row[j];
                    if path < v {
                        v = path;
                    }
                }
            }

            data[ij] = v;
            data[ji] = v;
        }
    }
}
