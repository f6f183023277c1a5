//! Python FFI bindings via PyO3 and numpy.
//!
//! Thin adapter: arrays are copied into [`DissimilarityMatrix`] values, the
//! canonical Rust operators run with the GIL released, and a new float64
//! array is returned. Inputs are never written to.
//!
//! # Building the Python extension
//!
//! ```bash
//! pip install maturin
//! maturin develop --features python-ffi
//! ```
//!
//! # Usage
//!
//! ```python
//! import numpy as np
//! import metric_nearness as mn
//!
//! D = np.array([[0, 1, 1], [1, 0, 5], [1, 5, 0]], dtype=np.float64)
//! X0 = mn.heuristic_improve(D, D, n_improve=1)
//! X = mn.hlwb_projection(X0, D, n_projection=100)
//! # or both steps at once
//! X = mn.metric_nearness(D)
//! ```

#![allow(non_snake_case)]

use numpy::ndarray::Array2;
use numpy::{IntoPyArray, PyArray2, PyReadonlyArray2};
use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;

use crate::error::MetricError;
use crate::matrix::DissimilarityMatrix;
use crate::pipeline::MetricNearness;

impl From<MetricError> for PyErr {
    fn from(err: MetricError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

// ── Conversion ────────────────────────────────────────────────────────────────

fn to_matrix(array: &PyReadonlyArray2<'_, f64>) -> Result<DissimilarityMatrix, MetricError> {
    let view = array.as_array();
    let (rows, cols) = view.dim();
    if rows != cols {
        return Err(MetricError::NotSquare { rows, cols });
    }
    // Logical (row-major) order regardless of the array's memory layout.
    DissimilarityMatrix::from_row_major(rows, view.iter().copied().collect())
}

fn to_pyarray<'py>(
    py: Python<'py>,
    m: DissimilarityMatrix,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let n = m.dim();
    let array = Array2::from_shape_vec((n, n), m.into_vec())
        .map_err(|e| PyValueError::new_err(e.to_string()))?;
    Ok(array.into_pyarray_bound(py))
}

// ── Operators ─────────────────────────────────────────────────────────────────

/// Greedy triangle tightening of X0 toward D.
///
/// Args:
///     X0:        initial n×n float64 matrix
///     D:         target n×n float64 matrix
///     n_improve: number of full sweeps (0 returns a copy of X0)
///
/// Returns:
///     A new n×n float64 matrix.
#[pyfunction]
#[pyo3(name = "heuristic_improve", signature = (X0, D, n_improve=1))]
fn py_heuristic_improve<'py>(
    py: Python<'py>,
    X0: PyReadonlyArray2<'py, f64>,
    D: PyReadonlyArray2<'py, f64>,
    n_improve: usize,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let x0 = to_matrix(&X0)?;
    let d = to_matrix(&D)?;
    let x = py.allow_threads(|| crate::improve::heuristic_improve(&x0, &d, n_improve))?;
    to_pyarray(py, x)
}

/// HLWB averaged projection of X0 toward D.
///
/// Args:
///     X0:           initial n×n float64 matrix
///     D:            target n×n float64 matrix
///     n_projection: number of iterations, at least 1
///
/// Returns:
///     A new symmetric n×n float64 matrix with zero diagonal.
#[pyfunction]
#[pyo3(name = "hlwb_projection", signature = (X0, D, n_projection=100))]
fn py_hlwb_projection<'py>(
    py: Python<'py>,
    X0: PyReadonlyArray2<'py, f64>,
    D: PyReadonlyArray2<'py, f64>,
    n_projection: usize,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let x0 = to_matrix(&X0)?;
    let d = to_matrix(&D)?;
    let x = py.allow_threads(|| crate::projection::hlwb_projection(&x0, &d, n_projection))?;
    to_pyarray(py, x)
}

/// Heuristic warm start followed by HLWB projection.
///
/// Args:
///     D:            target n×n float64 matrix (averaged with D.T if asymmetric)
///     n_improve:    heuristic sweeps
///     n_projection: projection iterations, at least 1
#[pyfunction]
#[pyo3(name = "metric_nearness", signature = (D, n_improve=1, n_projection=100))]
fn py_metric_nearness<'py>(
    py: Python<'py>,
    D: PyReadonlyArray2<'py, f64>,
    n_improve: usize,
    n_projection: usize,
) -> PyResult<Bound<'py, PyArray2<f64>>> {
    let d = to_matrix(&D)?;
    let solver = MetricNearness::new(n_improve, n_projection);
    let x = py.allow_threads(|| solver.solve(&d))?;
    to_pyarray(py, x)
}

// ── Module entry point ────────────────────────────────────────────────────────

/// Metric repair for dissimilarity matrices.
#[pymodule]
pub fn metric_nearness(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(py_heuristic_improve, m)?)?;
    m.add_function(wrap_pyfunction!(py_hlwb_projection, m)?)?;
    m.add_function(wrap_pyfunction!(py_metric_nearness, m)?)?;
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    m.add("HALPERN_STEP", crate::projection::HALPERN_STEP)?;
    Ok(())
}
