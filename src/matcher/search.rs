//! Best-match and all-matches queries of a primary set against an indexed secondary set.

use tracing::debug;

use super::{MatchConfig, MatchGroup, MatchResult, RaSortedIndex};
use crate::coordinate::CoordinateSet;
use crate::error::Result;

impl RaSortedIndex {
    /// For every primary coordinate, the closest indexed coordinate strictly within
    /// tolerance, or [`MatchResult::NoMatch`].
    ///
    /// Equal separations resolve to the lowest secondary index. The output has one
    /// entry per primary coordinate, in primary order.
    pub fn best_match(
        &self,
        primary: &CoordinateSet,
        config: &MatchConfig,
    ) -> Result<Vec<MatchResult>> {
        let groups = self.all_matches(primary, config)?;
        let results: Vec<MatchResult> = groups.iter().map(MatchGroup::best).collect();
        debug!(
            "best_match: {} of {} primary coordinates matched",
            results.iter().filter(|r| r.is_match()).count(),
            results.len()
        );
        Ok(results)
    }

    /// For every primary coordinate, all indexed coordinates strictly within
    /// tolerance, sorted by increasing separation.
    ///
    /// When `primary` is the indexed set itself, each coordinate finds itself at zero
    /// separation (for any positive tolerance); filtering that out is up to the caller.
    pub fn all_matches(
        &self,
        primary: &CoordinateSet,
        config: &MatchConfig,
    ) -> Result<Vec<MatchGroup>> {
        config.validate()?;
        let tol_deg = config.tolerance_deg();
        let call_mean_dec = 0.5 * (primary.mean_dec_deg() + self.mean_dec_deg());

        debug!(
            "Matching {} primary against {} secondary coordinates (tol {}\", window {:?})",
            primary.len(),
            self.len(),
            config.tolerance_arcsec,
            config.ra_window
        );

        let groups = primary
            .iter()
            .map(|query| {
                let half_width = Self::half_width_for(
                    config.ra_window,
                    query.dec_deg(),
                    tol_deg,
                    call_mean_dec,
                );
                MatchGroup {
                    neighbors: self.neighbors(query, config.tolerance_arcsec, half_width),
                }
            })
            .collect();
        Ok(groups)
    }
}

/// Best match of each `primary` coordinate in `secondary` within `tol_arcsec`.
///
/// Sorts `secondary` for this call only; build a [`RaSortedIndex`] directly to reuse
/// it across calls.
pub fn best_match(
    primary: &CoordinateSet,
    secondary: &CoordinateSet,
    tol_arcsec: f64,
) -> Result<Vec<MatchResult>> {
    let config = MatchConfig::new(tol_arcsec);
    config.validate()?;
    RaSortedIndex::new(secondary).best_match(primary, &config)
}

/// All matches of each `primary` coordinate in `secondary` within `tol_arcsec`.
pub fn all_matches(
    primary: &CoordinateSet,
    secondary: &CoordinateSet,
    tol_arcsec: f64,
) -> Result<Vec<MatchGroup>> {
    let config = MatchConfig::new(tol_arcsec);
    config.validate()?;
    RaSortedIndex::new(secondary).all_matches(primary, &config)
}

/// Split best-match results into parallel lists of primary indices that matched
/// and the secondary indices they matched.
pub fn matched_pairs(results: &[MatchResult]) -> (Vec<usize>, Vec<usize>) {
    results
        .iter()
        .enumerate()
        .filter_map(|(i, r)| r.index().map(|j| (i, j)))
        .unzip()
}

/// Secondary indices in `0..secondary_len` that no result matched, ascending.
pub fn unmatched_secondary(results: &[MatchResult], secondary_len: usize) -> Vec<usize> {
    let mut used = vec![false; secondary_len];
    for j in results.iter().filter_map(MatchResult::index) {
        if let Some(slot) = used.get_mut(j) {
            *slot = true;
        }
    }
    (0..secondary_len).filter(|&j| !used[j]).collect()
}
