//! # skymatch
//!
//! Positional cross-matching of celestial catalogs.
//!
//! Given lists of sky positions (right ascension / declination in degrees),
//! `skymatch` finds, for each position in a primary list, the nearest position(s)
//! in a secondary list within an angular tolerance, and folds a single list into
//! groups of mutually close entries with one canonical representative each.
//!
//! ## Features
//!
//! - **Chord-space metric** — positions are compared as squared chord lengths between
//!   unit vectors; the inverse cosine is evaluated once per surviving candidate
//! - **Declination-band pruning** — the secondary list is sorted by RA once, and each
//!   query scans only an RA window widened for its declination, then a Dec band
//! - **Reusable index** — [`RaSortedIndex`] is immutable and `Send + Sync`, so one
//!   sorted secondary catalog can serve many primary lists, from many threads
//! - **Unique coordinates** — partition a catalog into equivalence classes of
//!   duplicate detections
//!
//! ## Example
//!
//! ```
//! use skymatch::{CoordinateSet, MatchConfig, MatchResult, RaSortedIndex};
//!
//! let primary = CoordinateSet::from_radec(&[10.0, 150.0], &[0.0, -30.0]).unwrap();
//! let secondary = CoordinateSet::from_radec(&[10.0002, 42.0], &[0.0, 12.0]).unwrap();
//!
//! let index = RaSortedIndex::new(&secondary);
//! let results = index.best_match(&primary, &MatchConfig::new(2.0)).unwrap();
//!
//! assert!(matches!(results[0], MatchResult::Matched { index: 0, .. }));
//! assert_eq!(results[1], MatchResult::NoMatch);
//! ```
//!
//! ## Tolerance
//!
//! Tolerances are given in arcseconds and are exclusive: two positions match only
//! when their separation is strictly less than the tolerance.
//!
//! ## Array entry points
//!
//! The [`arrays`] module accepts parallel `&[f64]` RA/Dec slices, validates them, and
//! runs the same engine. These are the functions the Python bindings wrap.

pub mod arrays;
pub mod coordinate;
mod error;
pub mod matcher;
pub mod metric;

pub use coordinate::*;
pub use error::{Axis, MatchError, Result};
pub use matcher::unique::{
    self_match_groups, unique_coordinates, unique_coordinates_with, EquivalenceClass,
    SelfMatchPolicy, UniqueCoordinates,
};
pub use matcher::{
    all_matches, best_match, matched_pairs, unmatched_secondary, MatchConfig, MatchGroup,
    MatchResult, Neighbor, RaSortedIndex, RaWindow,
};
pub use metric::{angular_separation, angular_separation_deg};

// Geometry is 64-bit throughout; sub-arcsecond chords are below f32 resolution.
pub type Vector3 = nalgebra::Vector3<f64>;
