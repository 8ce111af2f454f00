//! Angular distance primitives on the unit sphere.
//!
//! Positions are compared as squared chord lengths between unit vectors, which
//! needs no trigonometry once the vectors exist. The chord is turned back into an
//! angle with the spherical law of cosines only for final candidates:
//!
//! ```text
//! d² = |u − v|² = 2 (1 − cos θ)        θ = arccos(1 − d² / 2)
//! ```

use nalgebra::DMatrix;

use crate::coordinate::{Coordinate, CoordinateSet};
use crate::error::Result;
use crate::Vector3;

/// Convert RA/Dec in degrees to a Cartesian unit vector.
///
/// `x = cos(dec)·cos(ra)`, `y = cos(dec)·sin(ra)`, `z = sin(dec)`.
pub fn to_unit_vector(ra_deg: f64, dec_deg: f64) -> Vector3 {
    let (sin_ra, cos_ra) = ra_deg.to_radians().sin_cos();
    let (sin_dec, cos_dec) = dec_deg.to_radians().sin_cos();
    Vector3::new(cos_dec * cos_ra, cos_dec * sin_ra, sin_dec)
}

/// Squared Euclidean distance between two unit vectors, in [0, 4].
pub fn chord_distance_sq(u: &Vector3, v: &Vector3) -> f64 {
    (u - v).norm_squared()
}

/// Angle in radians subtended by a squared chord `d2` on the unit sphere.
///
/// `d2` is clamped to [0, 4] first so rounding on nearly coincident or
/// antipodal points cannot produce NaN.
pub fn chord_to_angle(d2: f64) -> f64 {
    (1.0 - 0.5 * d2.clamp(0.0, 4.0)).acos()
}

/// Squared chord length for an angle in radians. Inverse of [`chord_to_angle`].
///
/// Evaluated as `4·sin²(θ/2)`, which keeps full relative precision for tiny
/// angles where `2·(1 − cos θ)` cancels to zero.
pub fn angle_to_chord(radians: f64) -> f64 {
    let half = (0.5 * radians).sin();
    4.0 * half * half
}

/// Angular separation between two coordinates, in degrees.
pub fn angular_separation(c1: &Coordinate, c2: &Coordinate) -> f64 {
    chord_to_angle(chord_distance_sq(&c1.uvec(), &c2.uvec())).to_degrees()
}

/// Angular separation between two raw RA/Dec pairs, in degrees.
///
/// Both positions are validated first; an out-of-range value fails with
/// [`MatchError::OutOfRangeCoordinate`](crate::MatchError::OutOfRangeCoordinate)
/// at index 0.
pub fn angular_separation_deg(ra1: f64, dec1: f64, ra2: f64, dec2: f64) -> Result<f64> {
    let c1 = Coordinate::new(ra1, dec1)?;
    let c2 = Coordinate::new(ra2, dec2)?;
    Ok(angular_separation(&c1, &c2))
}

/// Separations in degrees from one coordinate to every member of `set`.
pub fn separations_from(c: &Coordinate, set: &CoordinateSet) -> Vec<f64> {
    let u = c.uvec();
    set.iter()
        .map(|other| chord_to_angle(chord_distance_sq(&u, &other.uvec())).to_degrees())
        .collect()
}

/// N×M matrix of squared chord distances; row `i` is `a[i]`, column `j` is `b[j]`.
pub fn chord_distance_sq_matrix(a: &CoordinateSet, b: &CoordinateSet) -> DMatrix<f64> {
    let ua: Vec<Vector3> = a.iter().map(Coordinate::uvec).collect();
    let ub: Vec<Vector3> = b.iter().map(Coordinate::uvec).collect();
    DMatrix::from_fn(ua.len(), ub.len(), |i, j| chord_distance_sq(&ua[i], &ub[j]))
}

/// N×M matrix of angular separations in degrees.
pub fn separation_matrix(a: &CoordinateSet, b: &CoordinateSet) -> DMatrix<f64> {
    chord_distance_sq_matrix(a, b).map(|d2| chord_to_angle(d2).to_degrees())
}
