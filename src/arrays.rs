//! Entry points over parallel RA/Dec arrays in degrees.
//!
//! Each function validates every input array (lengths first, then ranges) and the
//! tolerance before any matching work, so a call either fails with the first
//! offending value or returns complete results.

use nalgebra::DMatrix;

use crate::coordinate::CoordinateSet;
use crate::error::Result;
use crate::matcher::unique::{unique_coordinates_with, SelfMatchPolicy, UniqueCoordinates};
use crate::matcher::{matched_pairs, MatchConfig, MatchGroup, MatchResult, RaSortedIndex};
use crate::metric::{separation_matrix, separations_from};

/// Pairwise separations in degrees, with length-1 dimensions dropped.
#[derive(Debug, Clone, PartialEq)]
pub enum Separations {
    /// Both inputs had one coordinate.
    Scalar(f64),
    /// One input had one coordinate; one value per entry of the other.
    Row(Vec<f64>),
    /// N×M separations, rows following the first input.
    Matrix(DMatrix<f64>),
}

/// Angular separations between `(ra1, dec1)` and `(ra2, dec2)`, in degrees.
pub fn angular_separation_arrays(
    ra1: &[f64],
    dec1: &[f64],
    ra2: &[f64],
    dec2: &[f64],
) -> Result<Separations> {
    let a = CoordinateSet::from_radec(ra1, dec1)?;
    let b = CoordinateSet::from_radec(ra2, dec2)?;

    let seps = match (a.as_slice(), b.as_slice()) {
        ([c1], [c2]) => Separations::Scalar(crate::metric::angular_separation(c1, c2)),
        ([c], _) => Separations::Row(separations_from(c, &b)),
        (_, [c]) => Separations::Row(separations_from(c, &a)),
        _ => Separations::Matrix(separation_matrix(&a, &b)),
    };
    Ok(seps)
}

/// Best match in the second set for each coordinate of the first.
pub fn best_match_arrays(
    ra1: &[f64],
    dec1: &[f64],
    ra2: &[f64],
    dec2: &[f64],
    tol_arcsec: f64,
) -> Result<Vec<MatchResult>> {
    let (primary, secondary, config) = prepare(ra1, dec1, ra2, dec2, tol_arcsec)?;
    RaSortedIndex::new(&secondary).best_match(&primary, &config)
}

/// All matches in the second set for each coordinate of the first.
pub fn all_matches_arrays(
    ra1: &[f64],
    dec1: &[f64],
    ra2: &[f64],
    dec2: &[f64],
    tol_arcsec: f64,
) -> Result<Vec<MatchGroup>> {
    let (primary, secondary, config) = prepare(ra1, dec1, ra2, dec2, tol_arcsec)?;
    RaSortedIndex::new(&secondary).all_matches(&primary, &config)
}

/// Indices into the first set that found a match, and the matching indices into the second.
pub fn matched_pairs_arrays(
    ra1: &[f64],
    dec1: &[f64],
    ra2: &[f64],
    dec2: &[f64],
    tol_arcsec: f64,
) -> Result<(Vec<usize>, Vec<usize>)> {
    let results = best_match_arrays(ra1, dec1, ra2, dec2, tol_arcsec)?;
    Ok(matched_pairs(&results))
}

/// Unique coordinates of one set, with each coordinate included in its own group.
pub fn unique_coordinates_arrays(
    ra: &[f64],
    dec: &[f64],
    tol_arcsec: f64,
) -> Result<UniqueCoordinates> {
    let set = CoordinateSet::from_radec(ra, dec)?;
    let config = MatchConfig::new(tol_arcsec);
    config.validate()?;
    unique_coordinates_with(&set, &config, SelfMatchPolicy::IncludeSelf)
}

fn prepare(
    ra1: &[f64],
    dec1: &[f64],
    ra2: &[f64],
    dec2: &[f64],
    tol_arcsec: f64,
) -> Result<(CoordinateSet, CoordinateSet, MatchConfig)> {
    let primary = CoordinateSet::from_radec(ra1, dec1)?;
    let secondary = CoordinateSet::from_radec(ra2, dec2)?;
    let config = MatchConfig::new(tol_arcsec);
    config.validate()?;
    Ok((primary, secondary, config))
}
