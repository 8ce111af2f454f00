//! RA-sorted view of a coordinate set, used to prune match candidates.
//!
//! `RaSortedIndex` stores a secondary catalog sorted by right ascension, along
//! with the original index of every entry and its precomputed unit vector.
//!
//! Query flow:
//! 1. Binary-search the sorted RA column for `[ra − w, ra + w]`, where the
//!    half-width `w` is the tolerance widened for RA compression away from the
//!    equator. Windows crossing 0°/360° are split into two ranges.
//! 2. Skip entries outside the Dec band `|dec − dec_q| ≤ tol`.
//! 3. Compute the exact chord distance for what is left.
//!
//! Both filters over-approximate; they only reduce the number of exact
//! evaluations and never drop a coordinate that is within tolerance.

use std::ops::Range;

use tracing::debug;

use super::{Neighbor, RaWindow};
use crate::coordinate::{Coordinate, CoordinateSet, ARCSEC_PER_DEG};
use crate::metric::{angle_to_chord, chord_distance_sq, chord_to_angle};
use crate::Vector3;

/// Slack added to every pruning bound.
///
/// `acos(1 - d²/2)` resolves angles near zero only to about `sqrt(2ε)` rad
/// (~1.2e-6°), so a computed separation can sit that far below the true one.
/// The absolute term stays well above that floor so no bound rejects a pair
/// whose computed separation is inside tolerance.
const PRUNE_PAD_REL: f64 = 1e-6;
const PRUNE_PAD_ABS_DEG: f64 = 1e-5;

fn padded(deg: f64) -> f64 {
    deg * (1.0 + PRUNE_PAD_REL) + PRUNE_PAD_ABS_DEG
}

/// Immutable secondary catalog sorted by RA.
///
/// Built once and shared read-only between any number of matching calls and threads.
#[derive(Debug, Clone, Default)]
pub struct RaSortedIndex {
    /// Original index of each sorted entry.
    order: Vec<usize>,
    ra_deg: Vec<f64>,
    dec_deg: Vec<f64>,
    uvecs: Vec<Vector3>,
    mean_dec_deg: f64,
}

impl RaSortedIndex {
    /// Sort `set` by RA. Entries with equal RA keep their original order.
    pub fn new(set: &CoordinateSet) -> Self {
        let coords = set.as_slice();
        let mut order: Vec<usize> = (0..coords.len()).collect();
        order.sort_by(|&a, &b| coords[a].ra_deg().total_cmp(&coords[b].ra_deg()));

        let ra_deg = order.iter().map(|&i| coords[i].ra_deg()).collect();
        let dec_deg = order.iter().map(|&i| coords[i].dec_deg()).collect();
        let uvecs = order.iter().map(|&i| coords[i].uvec()).collect();
        let mean_dec_deg = set.mean_dec_deg();

        debug!(
            "Built RA index over {} coordinates (mean Dec {:.3}°)",
            coords.len(),
            mean_dec_deg
        );

        Self {
            order,
            ra_deg,
            dec_deg,
            uvecs,
            mean_dec_deg,
        }
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Mean declination of the indexed set, in degrees.
    pub fn mean_dec_deg(&self) -> f64 {
        self.mean_dec_deg
    }

    /// Original indices in RA order.
    pub fn order(&self) -> &[usize] {
        &self.order
    }

    /// RA values in ascending order.
    pub fn sorted_ra_deg(&self) -> &[f64] {
        &self.ra_deg
    }

    /// RA half-width of a cone of radius `tol_deg` (plus pruning slack) centred at `dec_deg`.
    ///
    /// Returns `None` when the cone touches a pole, in which case every RA qualifies.
    pub fn per_query_half_width_deg(dec_deg: f64, tol_deg: f64) -> Option<f64> {
        let tol_deg = padded(tol_deg);
        if dec_deg.abs() + tol_deg >= 90.0 {
            return None;
        }
        let ratio = tol_deg.to_radians().sin() / dec_deg.to_radians().cos();
        Some(padded(ratio.min(1.0).asin().to_degrees()))
    }

    /// Call-level RA half-width `tol / cos(mean_dec)`.
    ///
    /// Returns `None` when the window would cover the whole circle.
    pub fn mean_dec_half_width_deg(mean_dec_deg: f64, tol_deg: f64) -> Option<f64> {
        let cos_dec = mean_dec_deg.to_radians().cos();
        if cos_dec <= 0.0 {
            return None;
        }
        let half = padded(tol_deg / cos_dec);
        (half < 180.0).then_some(half)
    }

    /// Positions in the sorted arrays whose RA lies within `half_width_deg` of `ra_deg`.
    ///
    /// The second range is empty unless the window wraps past 0° or 360°.
    /// `None`, or a half-width of 180° or more, selects everything.
    pub fn candidate_ranges(
        &self,
        ra_deg: f64,
        half_width_deg: Option<f64>,
    ) -> [Range<usize>; 2] {
        let n = self.len();
        let w = match half_width_deg {
            Some(w) if w < 180.0 => w,
            _ => return [0..n, 0..0],
        };

        let lo = ra_deg - w;
        let hi = ra_deg + w;
        let main = self.first_at_or_above(lo.max(0.0))..self.first_above(hi.min(360.0));
        let wrapped = if lo < 0.0 {
            self.first_at_or_above(lo + 360.0)..n
        } else if hi >= 360.0 {
            0..self.first_above(hi - 360.0)
        } else {
            0..0
        };
        [main, wrapped]
    }

    /// Original indices of entries passing both the RA window and the Dec band.
    pub fn candidates(
        &self,
        query: &Coordinate,
        tol_deg: f64,
        half_width_deg: Option<f64>,
    ) -> Vec<usize> {
        self.band_positions(query, tol_deg, half_width_deg)
            .map(|pos| self.order[pos])
            .collect()
    }

    /// Sorted positions inside the RA window whose Dec is within `tol_deg` of the query.
    fn band_positions<'a>(
        &'a self,
        query: &Coordinate,
        tol_deg: f64,
        half_width_deg: Option<f64>,
    ) -> impl Iterator<Item = usize> + 'a {
        let band = padded(tol_deg);
        let dec_q = query.dec_deg();
        self.candidate_ranges(query.ra_deg(), half_width_deg)
            .into_iter()
            .flatten()
            .filter(move |&pos| (self.dec_deg[pos] - dec_q).abs() <= band)
    }

    /// Every indexed coordinate strictly within `tol_arcsec` of `query`, sorted by
    /// separation and then by original index.
    pub fn neighbors(
        &self,
        query: &Coordinate,
        tol_arcsec: f64,
        half_width_deg: Option<f64>,
    ) -> Vec<Neighbor> {
        let tol_deg = tol_arcsec / ARCSEC_PER_DEG;
        let max_d2 = angle_to_chord(padded(tol_deg).to_radians().min(std::f64::consts::PI));
        let u = query.uvec();

        let mut out = Vec::new();
        for pos in self.band_positions(query, tol_deg, half_width_deg) {
            let d2 = chord_distance_sq(&u, &self.uvecs[pos]);
            if d2 > max_d2 {
                continue;
            }
            let separation_arcsec = chord_to_angle(d2).to_degrees() * ARCSEC_PER_DEG;
            if separation_arcsec < tol_arcsec {
                out.push(Neighbor {
                    index: self.order[pos],
                    separation_arcsec,
                });
            }
        }

        out.sort_by(|a, b| {
            a.separation_arcsec
                .total_cmp(&b.separation_arcsec)
                .then(a.index.cmp(&b.index))
        });
        out
    }

    /// RA half-width for one query under `policy`. `call_mean_dec_deg` is only used
    /// by [`RaWindow::MeanDeclination`].
    pub(crate) fn half_width_for(
        policy: RaWindow,
        query_dec_deg: f64,
        tol_deg: f64,
        call_mean_dec_deg: f64,
    ) -> Option<f64> {
        match policy {
            RaWindow::PerQuery => Self::per_query_half_width_deg(query_dec_deg, tol_deg),
            RaWindow::MeanDeclination => {
                Self::mean_dec_half_width_deg(call_mean_dec_deg, tol_deg)
            }
        }
    }

    fn first_at_or_above(&self, ra: f64) -> usize {
        self.ra_deg.partition_point(|&r| r < ra)
    }

    fn first_above(&self, ra: f64) -> usize {
        self.ra_deg.partition_point(|&r| r <= ra)
    }
}
