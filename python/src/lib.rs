//! Python bindings for skymatch via PyO3.
//!
//! Exposes catalog cross-matching to Python as the `pyskymatch` module. Every
//! function takes RA/Dec in degrees as floats, sequences, or 1-D float64 arrays.

mod helpers;

use numpy::ndarray;
use numpy::{PyArray1, PyArray2};
use pyo3::prelude::*;

use skymatch::arrays::{self, Separations};

use helpers::{parse_column, parse_pair, to_py_err};

// ═══════════════════════════════════════════════════════════════════════════
// Separations
// ═══════════════════════════════════════════════════════════════════════════

/// Angular separation in degrees between (ra1, dec1) and (ra2, dec2).
///
/// Returns a float when both inputs hold one position, a 1-D array when one
/// of them does, and an (N, M) array otherwise.
#[pyfunction]
fn ang_sep<'py>(
    py: Python<'py>,
    ra1: &Bound<'py, PyAny>,
    dec1: &Bound<'py, PyAny>,
    ra2: &Bound<'py, PyAny>,
    dec2: &Bound<'py, PyAny>,
) -> PyResult<Py<PyAny>> {
    let [ra1, dec1, ra2, dec2] = parse_pair(ra1, dec1, ra2, dec2)?;
    let seps = arrays::angular_separation_arrays(&ra1, &dec1, &ra2, &dec2).map_err(to_py_err)?;

    match seps {
        Separations::Scalar(s) => Ok(s.into_pyobject(py)?.into_any().unbind()),
        Separations::Row(row) => Ok(PyArray1::from_vec(py, row).into_any().unbind()),
        Separations::Matrix(m) => {
            let data = ndarray::Array2::from_shape_fn(m.shape(), |(i, j)| m[(i, j)]);
            Ok(PyArray2::from_owned_array(py, data).into_any().unbind())
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Matching
// ═══════════════════════════════════════════════════════════════════════════

/// Match each position of the first set against the second within `tol` arcsec.
///
/// By default returns `(ind, sep)`: for every first-set position, the index of
/// the closest second-set position and its separation in arcsec, or -1 and -1.0
/// when nothing is strictly closer than `tol`.
///
/// With `allmatches=True` returns a list with one `(ind, sep)` pair of arrays per
/// first-set position, holding every match sorted by separation.
///
/// Example:
///     ind, sep = pyskymatch.match(ra1, dec1, ra2, dec2, 2.0)
///     unmatched = numpy.setdiff1d(numpy.arange(len(ra2)), ind[ind >= 0])
#[pyfunction]
#[pyo3(name = "match", signature = (ra1, dec1, ra2, dec2, tol, allmatches = false))]
fn match_radec<'py>(
    py: Python<'py>,
    ra1: &Bound<'py, PyAny>,
    dec1: &Bound<'py, PyAny>,
    ra2: &Bound<'py, PyAny>,
    dec2: &Bound<'py, PyAny>,
    tol: f64,
    allmatches: bool,
) -> PyResult<Py<PyAny>> {
    let [ra1, dec1, ra2, dec2] = parse_pair(ra1, dec1, ra2, dec2)?;

    if allmatches {
        let groups =
            arrays::all_matches_arrays(&ra1, &dec1, &ra2, &dec2, tol).map_err(to_py_err)?;
        let per_position: Vec<_> = groups
            .iter()
            .map(|group| {
                let ind: Vec<i64> = group.indices().map(|j| j as i64).collect();
                let sep: Vec<f64> =
                    group.neighbors.iter().map(|n| n.separation_arcsec).collect();
                (PyArray1::from_vec(py, ind), PyArray1::from_vec(py, sep))
            })
            .collect();
        return Ok(per_position.into_pyobject(py)?.into_any().unbind());
    }

    let results = arrays::best_match_arrays(&ra1, &dec1, &ra2, &dec2, tol).map_err(to_py_err)?;
    let (ind, sep): (Vec<i64>, Vec<f64>) = results.iter().map(|r| r.to_sentinel()).unzip();
    let pair = (PyArray1::from_vec(py, ind), PyArray1::from_vec(py, sep));
    Ok(pair.into_pyobject(py)?.into_any().unbind())
}

/// Indices of first-set positions with a match, and of the second-set
/// positions they matched.
///
/// Returns `(i1, i2)` as int64 arrays of equal length.
#[pyfunction]
fn indmatch<'py>(
    py: Python<'py>,
    ra1: &Bound<'py, PyAny>,
    dec1: &Bound<'py, PyAny>,
    ra2: &Bound<'py, PyAny>,
    dec2: &Bound<'py, PyAny>,
    tol: f64,
) -> PyResult<(Bound<'py, PyArray1<i64>>, Bound<'py, PyArray1<i64>>)> {
    let [ra1, dec1, ra2, dec2] = parse_pair(ra1, dec1, ra2, dec2)?;
    let (i1, i2) =
        arrays::matched_pairs_arrays(&ra1, &dec1, &ra2, &dec2, tol).map_err(to_py_err)?;
    Ok((
        PyArray1::from_vec(py, i1.into_iter().map(|i| i as i64).collect()),
        PyArray1::from_vec(py, i2.into_iter().map(|i| i as i64).collect()),
    ))
}

/// Fold duplicate detections of one catalog together.
///
/// Returns `(iunique, iextras)`: the canonical (lowest) index of every group,
/// and for each group the list of all its member indices, canonical first.
#[pyfunction]
fn unique_radec<'py>(
    py: Python<'py>,
    ra: &Bound<'py, PyAny>,
    dec: &Bound<'py, PyAny>,
    tol: f64,
) -> PyResult<(Bound<'py, PyArray1<i64>>, Vec<Vec<i64>>)> {
    let ra = parse_column(ra, "ra")?;
    let dec = parse_column(dec, "dec")?;
    let unique = arrays::unique_coordinates_arrays(&ra, &dec, tol).map_err(to_py_err)?;

    let iunique: Vec<i64> = unique.iunique().into_iter().map(|i| i as i64).collect();
    let iextras: Vec<Vec<i64>> = unique
        .classes()
        .iter()
        .map(|c| c.members.iter().map(|&i| i as i64).collect())
        .collect();
    Ok((PyArray1::from_vec(py, iunique), iextras))
}

// ═══════════════════════════════════════════════════════════════════════════
// Module definition
// ═══════════════════════════════════════════════════════════════════════════

/// pyskymatch: cross-matching of celestial RA/Dec catalogs.
#[pymodule]
fn pyskymatch(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(ang_sep, m)?)?;
    m.add_function(wrap_pyfunction!(match_radec, m)?)?;
    m.add_function(wrap_pyfunction!(indmatch, m)?)?;
    m.add_function(wrap_pyfunction!(unique_radec, m)?)?;
    m.add("DEG_PER_ASEC", skymatch::DEG_PER_ASEC)?;
    m.add("DEG_PER_AMIN", skymatch::DEG_PER_AMIN)?;
    m.add("DEG_PER_HR", skymatch::DEG_PER_HR)?;
    Ok(())
}
