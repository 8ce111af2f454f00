use numpy::PyReadonlyArray1;
use pyo3::prelude::*;

use skymatch::MatchError;

/// Map a matching error onto the Python exception hierarchy.
///
/// Input problems become `ValueError`; a broken partition is a bug, so it
/// surfaces as `RuntimeError`.
pub(crate) fn to_py_err(err: MatchError) -> PyErr {
    match err {
        MatchError::InternalConsistencyViolation { .. } => {
            pyo3::exceptions::PyRuntimeError::new_err(err.to_string())
        }
        _ => pyo3::exceptions::PyValueError::new_err(err.to_string()),
    }
}

/// Parse a coordinate column from Python: a float, a sequence of floats, or a
/// 1-D float64 array.
pub(crate) fn parse_column(obj: &Bound<'_, pyo3::PyAny>, name: &str) -> PyResult<Vec<f64>> {
    if let Ok(value) = obj.extract::<f64>() {
        Ok(vec![value])
    } else if let Ok(arr) = obj.extract::<PyReadonlyArray1<f64>>() {
        Ok(arr.as_array().iter().copied().collect())
    } else if let Ok(values) = obj.extract::<Vec<f64>>() {
        Ok(values)
    } else {
        Err(pyo3::exceptions::PyTypeError::new_err(format!(
            "{name} must be a float, a sequence of floats or a 1-D float64 array"
        )))
    }
}

/// Parse the four RA/Dec columns of a two-set call.
pub(crate) fn parse_pair(
    ra1: &Bound<'_, pyo3::PyAny>,
    dec1: &Bound<'_, pyo3::PyAny>,
    ra2: &Bound<'_, pyo3::PyAny>,
    dec2: &Bound<'_, pyo3::PyAny>,
) -> PyResult<[Vec<f64>; 4]> {
    Ok([
        parse_column(ra1, "ra1")?,
        parse_column(dec1, "dec1")?,
        parse_column(ra2, "ra2")?,
        parse_column(dec2, "dec2")?,
    ])
}
