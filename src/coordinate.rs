use crate::error::{Axis, MatchError, Result};
use crate::Vector3;

/// Degrees of right ascension per hour.
pub const DEG_PER_HR: f64 = 360.0 / 24.0;
/// Degrees of right ascension per minute of time.
pub const DEG_PER_MIN: f64 = DEG_PER_HR / 60.0;
/// Degrees of right ascension per second of time.
pub const DEG_PER_S: f64 = DEG_PER_MIN / 60.0;
/// Degrees per arcminute.
pub const DEG_PER_AMIN: f64 = 1.0 / 60.0;
/// Degrees per arcsecond.
pub const DEG_PER_ASEC: f64 = DEG_PER_AMIN / 60.0;
/// Arcseconds per degree.
pub const ARCSEC_PER_DEG: f64 = 3600.0;

/// An equatorial sky position in degrees.
///
/// RA is in [0, 360) and Dec in [-90, 90]. Construction through [`Coordinate::new`]
/// rejects anything else; values are never wrapped or clamped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinate {
    ra_deg: f64,
    dec_deg: f64,
}

impl Coordinate {
    /// Validate and build a coordinate. Errors report index 0.
    pub fn new(ra_deg: f64, dec_deg: f64) -> Result<Self> {
        Self::validated(0, ra_deg, dec_deg)
    }

    pub(crate) fn validated(index: usize, ra_deg: f64, dec_deg: f64) -> Result<Self> {
        // NaN fails both comparisons and is rejected here too
        if !(0.0..360.0).contains(&ra_deg) {
            return Err(MatchError::out_of_range(Axis::Ra, index, ra_deg));
        }
        if !(-90.0..=90.0).contains(&dec_deg) {
            return Err(MatchError::out_of_range(Axis::Dec, index, dec_deg));
        }
        Ok(Self { ra_deg, dec_deg })
    }

    pub fn ra_deg(&self) -> f64 {
        self.ra_deg
    }

    pub fn dec_deg(&self) -> f64 {
        self.dec_deg
    }

    /// Unit vector pointing to this position on the celestial sphere.
    pub fn uvec(&self) -> Vector3 {
        crate::metric::to_unit_vector(self.ra_deg, self.dec_deg)
    }
}

/// An ordered list of coordinates; the position of each entry is its identity
/// in every match result.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoordinateSet {
    coords: Vec<Coordinate>,
}

impl CoordinateSet {
    /// Build a set from parallel RA and Dec arrays in degrees.
    ///
    /// Fails with [`MatchError::MismatchedLengths`] if the arrays differ in length,
    /// or with [`MatchError::OutOfRangeCoordinate`] naming the first offending
    /// index and value.
    pub fn from_radec(ra_deg: &[f64], dec_deg: &[f64]) -> Result<Self> {
        if ra_deg.len() != dec_deg.len() {
            return Err(MatchError::MismatchedLengths {
                ra_len: ra_deg.len(),
                dec_len: dec_deg.len(),
            });
        }
        let coords = ra_deg
            .iter()
            .zip(dec_deg)
            .enumerate()
            .map(|(i, (&ra, &dec))| Coordinate::validated(i, ra, dec))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { coords })
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    pub fn as_slice(&self) -> &[Coordinate] {
        &self.coords
    }

    pub fn get(&self, index: usize) -> Option<&Coordinate> {
        self.coords.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Coordinate> {
        self.coords.iter()
    }

    /// Mean declination in degrees, or 0 for an empty set.
    pub fn mean_dec_deg(&self) -> f64 {
        if self.coords.is_empty() {
            return 0.0;
        }
        self.coords.iter().map(|c| c.dec_deg).sum::<f64>() / self.coords.len() as f64
    }
}

impl From<Vec<Coordinate>> for CoordinateSet {
    fn from(coords: Vec<Coordinate>) -> Self {
        Self { coords }
    }
}

impl FromIterator<Coordinate> for CoordinateSet {
    fn from_iter<I: IntoIterator<Item = Coordinate>>(iter: I) -> Self {
        Self {
            coords: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a CoordinateSet {
    type Item = &'a Coordinate;
    type IntoIter = std::slice::Iter<'a, Coordinate>;

    fn into_iter(self) -> Self::IntoIter {
        self.coords.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_range_boundaries() {
        assert!(Coordinate::new(0.0, -90.0).is_ok());
        assert!(Coordinate::new(359.999_999, 90.0).is_ok());
    }

    #[test]
    fn rejects_ra_of_360_and_negative() {
        assert_eq!(
            Coordinate::new(360.0, 0.0),
            Err(MatchError::OutOfRangeCoordinate {
                axis: Axis::Ra,
                index: 0,
                value: 360.0
            })
        );
        assert!(matches!(
            Coordinate::new(-1.0, 0.0),
            Err(MatchError::OutOfRangeCoordinate { axis: Axis::Ra, .. })
        ));
    }

    #[test]
    fn rejects_dec_beyond_pole_and_nan() {
        assert!(matches!(
            Coordinate::new(10.0, 90.5),
            Err(MatchError::OutOfRangeCoordinate { axis: Axis::Dec, .. })
        ));
        assert!(Coordinate::new(f64::NAN, 0.0).is_err());
        assert!(Coordinate::new(0.0, f64::NAN).is_err());
        assert!(Coordinate::new(f64::INFINITY, 0.0).is_err());
    }

    #[test]
    fn from_radec_reports_first_bad_index() {
        let err = CoordinateSet::from_radec(&[10.0, 20.0, -1.0, -2.0], &[0.0, 0.0, 0.0, 0.0])
            .unwrap_err();
        assert_eq!(
            err,
            MatchError::OutOfRangeCoordinate {
                axis: Axis::Ra,
                index: 2,
                value: -1.0
            }
        );
    }

    #[test]
    fn from_radec_rejects_mismatched_lengths() {
        let err = CoordinateSet::from_radec(&[1.0, 2.0], &[0.0]).unwrap_err();
        assert_eq!(
            err,
            MatchError::MismatchedLengths {
                ra_len: 2,
                dec_len: 1
            }
        );
    }

    #[test]
    fn empty_set_is_valid() {
        let set = CoordinateSet::from_radec(&[], &[]).unwrap();
        assert!(set.is_empty());
        assert_eq!(set.mean_dec_deg(), 0.0);
    }

    #[test]
    fn uvec_points_along_axes() {
        let v = Coordinate::new(90.0, 0.0).unwrap().uvec();
        assert!(v.x.abs() < 1e-15);
        assert!((v.y - 1.0).abs() < 1e-15);
        let pole = Coordinate::new(0.0, 90.0).unwrap().uvec();
        assert!((pole.z - 1.0).abs() < 1e-15);
    }

    #[test]
    fn unit_constants_agree() {
        assert!((DEG_PER_ASEC * ARCSEC_PER_DEG - 1.0).abs() < 1e-15);
        assert!((DEG_PER_S * 3600.0 - DEG_PER_HR).abs() < 1e-12);
    }
}
