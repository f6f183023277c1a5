//! # metric-nearness
//!
//! Metric repair for dissimilarity matrices.
//!
//! Given a target matrix `D` that may break the triangle inequality and a
//! starting matrix `X0` (usually `D` itself), produce a nearby matrix in which
//! every triple `(i, j, k)` satisfies `X(i,j) ≤ X(i,k) + X(k,j)`.
//!
//! ---
//!
//! ## Two operators
//!
//! **Heuristic Improve** — pull each pair to its target, then clamp it to the
//! tightest triangle bound the current matrix implies. One O(n³) sweep; a
//! cheap warm start with no guarantee of full metric validity.
//!
//! **HLWB Projection** — Halpern-type averaged projection. Every iteration
//! blends the matrix toward `D` with a decaying weight `0.382 / iter`, then
//! projects every triple onto its triangle half-space by splitting the excess
//! in thirds. Converges toward the metric closest to `D`.
//!
//! Both are pure functions of `(X0, D, count)`: inputs are never modified and
//! every call works on its own copy.
//!
//! ## Pipeline
//!
//! ```text
//! D ──► prepare (symmetrise, zero diagonal) ──► HeuristicImprove ──► HlwbProjection ──► X
//!                                                                         │
//!                                                               ProjectionObserver
//!                                                           (nmse, violations, timing)
//! ```
//!
//! ## Module overview
//!
//! | Module | Key types | What it does |
//! |--------|-----------|--------------|
//! | [`matrix`] | [`DissimilarityMatrix`] | Owned row-major n×n buffer, shape checks, symmetry helpers |
//! | [`improve`] | [`HeuristicImprove`] | Greedy triangle tightening |
//! | [`projection`] | [`HlwbProjection`] | Averaged projection with cyclic triple repair |
//! | [`diagnostics`] | [`ViolationCount`] | Blending, normalised error, violation counts |
//! | [`observer`] | [`ProjectionObserver`], [`IterationRecord`] | Opt-in per-iteration progress |
//! | [`pipeline`] | [`MetricNearness`] | Improve-then-project driver |
//! | [`error`] | [`MetricError`] | Shape and iteration-count errors |
//!
//! ## Example
//!
//! ```
//! use metric_nearness::{hlwb_projection, DissimilarityMatrix};
//!
//! let d = DissimilarityMatrix::from_rows(&[
//!     [0.0, 1.0, 1.0],
//!     [1.0, 0.0, 5.0],
//!     [1.0, 5.0, 0.0],
//! ])?;
//! let x = hlwb_projection(&d, &d, 100)?;
//! assert!(x[(1, 2)] <= x[(0, 1)] + x[(0, 2)] + 1e-9);
//! # Ok::<(), metric_nearness::MetricError>(())
//! ```
//!
//! ## Features
//!
//! - `serde` — `Serialize`/`Deserialize` for the operator configs,
//!   [`IterationRecord`] and [`ViolationCount`].
//! - `python-ffi` — PyO3/numpy module `metric_nearness` exposing
//!   `heuristic_improve`, `hlwb_projection` and `metric_nearness`.

#![deny(unsafe_code)]
#![deny(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod diagnostics;
pub mod error;
pub mod improve;
pub mod matrix;
pub mod observer;
pub mod pipeline;
pub mod projection;

#[cfg(feature = "python-ffi")]
pub mod ffi;

pub use diagnostics::{count_violations, max_violation, normalized_squared_error, ViolationCount};
pub use error::{MetricError, MetricResult};
pub use improve::{heuristic_improve, HeuristicImprove};
pub use matrix::DissimilarityMatrix;
pub use observer::{IterationRecord, LogObserver, ProjectionObserver};
pub use pipeline::MetricNearness;
pub use projection::{hlwb_projection, repair_triangles, HlwbProjection, HALPERN_STEP};
