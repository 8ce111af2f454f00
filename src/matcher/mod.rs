//! Tolerance-bounded nearest-neighbour matching between coordinate sets.
//!
//! The engine has three layers:
//!
//! 1. **Index**: [`RaSortedIndex`] sorts a secondary set by RA once and narrows each
//!    query to an RA window and a Dec band.
//! 2. **Search**: [`RaSortedIndex::best_match`] and [`RaSortedIndex::all_matches`]
//!    evaluate exact separations for the surviving candidates and apply the
//!    strict `separation < tolerance` policy.
//! 3. **Unique**: [`unique::unique_coordinates`] self-matches one set and folds the
//!    match groups into disjoint equivalence classes.

pub mod index;
pub mod search;
pub mod unique;

pub use index::RaSortedIndex;
pub use search::{all_matches, best_match, matched_pairs, unmatched_secondary};

use crate::coordinate::DEG_PER_ASEC;
use crate::error::{MatchError, Result};

// ── Configuration ───────────────────────────────────────────────────────────

/// How wide an RA window the pruner scans around each query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RaWindow {
    /// Widen by the query's own declination: half-width `asin(sin(tol) / cos(dec))`,
    /// or the full circle once the tolerance cone reaches a pole.
    /// Never excludes a true match.
    #[default]
    PerQuery,
    /// Widen every query by `tol / cos(mean_dec)`, where `mean_dec` averages the
    /// primary and secondary mean declinations.
    ///
    /// Cheaper to reason about but only approximate: queries far from the mean
    /// declination can miss matches near the edge of their window.
    MeanDeclination,
}

/// Parameters for a matching call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    /// Match radius in arcseconds; separations must be strictly below it. Default 2.0.
    pub tolerance_arcsec: f64,
    /// RA window policy. Default [`RaWindow::PerQuery`].
    pub ra_window: RaWindow,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            tolerance_arcsec: 2.0,
            ra_window: RaWindow::PerQuery,
        }
    }
}

impl MatchConfig {
    /// Configuration with the given tolerance and default window policy.
    pub fn new(tolerance_arcsec: f64) -> Self {
        Self {
            tolerance_arcsec,
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.tolerance_arcsec.is_finite() && self.tolerance_arcsec >= 0.0 {
            Ok(())
        } else {
            Err(MatchError::InvalidTolerance {
                value: self.tolerance_arcsec,
            })
        }
    }

    pub(crate) fn tolerance_deg(&self) -> f64 {
        self.tolerance_arcsec * DEG_PER_ASEC
    }
}

// ── Results ─────────────────────────────────────────────────────────────────

/// Best match for one primary coordinate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MatchResult {
    NoMatch,
    /// `index` is into the secondary set.
    Matched { index: usize, separation_arcsec: f64 },
}

impl MatchResult {
    pub fn index(&self) -> Option<usize> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Matched { index, .. } => Some(*index),
        }
    }

    pub fn separation_arcsec(&self) -> Option<f64> {
        match self {
            MatchResult::NoMatch => None,
            MatchResult::Matched {
                separation_arcsec, ..
            } => Some(*separation_arcsec),
        }
    }

    pub fn is_match(&self) -> bool {
        matches!(self, MatchResult::Matched { .. })
    }

    /// Flat `(index, separation_arcsec)` encoding with `(-1, -1.0)` for no match.
    pub fn to_sentinel(&self) -> (i64, f64) {
        match self {
            MatchResult::NoMatch => (-1, -1.0),
            MatchResult::Matched {
                index,
                separation_arcsec,
            } => (*index as i64, *separation_arcsec),
        }
    }
}

/// One secondary coordinate found within tolerance of a query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Neighbor {
    pub index: usize,
    pub separation_arcsec: f64,
}

/// Every secondary coordinate within tolerance of one primary coordinate,
/// ordered by increasing separation (ties by increasing index).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MatchGroup {
    pub neighbors: Vec<Neighbor>,
}

impl MatchGroup {
    pub fn len(&self) -> usize {
        self.neighbors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.neighbors.is_empty()
    }

    /// Secondary indices in separation order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.neighbors.iter().map(|n| n.index)
    }

    pub fn contains(&self, index: usize) -> bool {
        self.neighbors.iter().any(|n| n.index == index)
    }

    /// The closest neighbour, if any.
    pub fn best(&self) -> MatchResult {
        self.neighbors
            .first()
            .map_or(MatchResult::NoMatch, |n| MatchResult::Matched {
                index: n.index,
                separation_arcsec: n.separation_arcsec,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = MatchConfig::default();
        assert_eq!(config.tolerance_arcsec, 2.0);
        assert_eq!(config.ra_window, RaWindow::PerQuery);
        assert_eq!(MatchConfig::new(0.5).tolerance_arcsec, 0.5);
    }

    #[test]
    fn config_rejects_bad_tolerance() {
        assert!(MatchConfig::new(0.0).validate().is_ok());
        for bad in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                MatchConfig::new(bad).validate(),
                Err(MatchError::InvalidTolerance { .. })
            ));
        }
    }

    #[test]
    fn sentinel_encoding() {
        assert_eq!(MatchResult::NoMatch.to_sentinel(), (-1, -1.0));
        let m = MatchResult::Matched {
            index: 7,
            separation_arcsec: 0.25,
        };
        assert_eq!(m.to_sentinel(), (7, 0.25));
        assert_eq!(m.index(), Some(7));
        assert!(m.is_match());
    }

    #[test]
    fn group_best_is_first_neighbor() {
        let group = MatchGroup {
            neighbors: vec![
                Neighbor {
                    index: 4,
                    separation_arcsec: 0.1,
                },
                Neighbor {
                    index: 1,
                    separation_arcsec: 0.9,
                },
            ],
        };
        assert_eq!(group.best().index(), Some(4));
        assert!(group.contains(1));
        assert_eq!(group.indices().collect::<Vec<_>>(), vec![4, 1]);
        assert_eq!(MatchGroup::default().best(), MatchResult::NoMatch);
    }
}
