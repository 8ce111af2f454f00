//! Error types for coordinate validation and catalog matching.
//!
//! | Variant | Raised when |
//! |---------|-------------|
//! | [`OutOfRangeCoordinate`](MatchError::OutOfRangeCoordinate) | RA not in [0°, 360°) or Dec not in [-90°, +90°] |
//! | [`MismatchedLengths`](MatchError::MismatchedLengths) | Paired RA/Dec arrays differ in length |
//! | [`InvalidTolerance`](MatchError::InvalidTolerance) | Tolerance is negative or not finite |
//! | [`InternalConsistencyViolation`](MatchError::InternalConsistencyViolation) | The unique-coordinate partition lost or duplicated an index |
//!
//! All validation happens before any matching work starts, so a failed call
//! never returns partial results.

use std::fmt;

use thiserror::Error;

/// Which half of a coordinate pair failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Ra,
    Dec,
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Ra => f.write_str("RA"),
            Axis::Dec => f.write_str("Dec"),
        }
    }
}

/// Error returned by every fallible operation in the crate.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MatchError {
    /// A coordinate lies outside RA ∈ [0, 360) or Dec ∈ [-90, 90].
    #[error("{axis} out of range at index {index}: {value}")]
    OutOfRangeCoordinate { axis: Axis, index: usize, value: f64 },

    /// RA and Dec arrays describing one coordinate set differ in length.
    #[error("RA and Dec arrays differ in length: {ra_len} RA values, {dec_len} Dec values")]
    MismatchedLengths { ra_len: usize, dec_len: usize },

    /// Matching tolerance must be finite and non-negative.
    #[error("tolerance must be finite and >= 0 arcsec, got {value}")]
    InvalidTolerance { value: f64 },

    /// A logic defect in the unique-coordinate resolver. Never caused by input.
    #[error("internal consistency violation: {message}")]
    InternalConsistencyViolation { message: String },
}

/// Convenience alias for `Result<T, MatchError>`.
pub type Result<T> = std::result::Result<T, MatchError>;

impl MatchError {
    pub(crate) fn out_of_range(axis: Axis, index: usize, value: f64) -> Self {
        Self::OutOfRangeCoordinate { axis, index, value }
    }

    pub(crate) fn internal(message: impl Into<String>) -> Self {
        Self::InternalConsistencyViolation {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn out_of_range_message_names_axis_index_and_value() {
        let err = MatchError::out_of_range(Axis::Ra, 3, -1.0);
        assert_eq!(err.to_string(), "RA out of range at index 3: -1");

        let err = MatchError::out_of_range(Axis::Dec, 0, 91.5);
        assert_eq!(err.to_string(), "Dec out of range at index 0: 91.5");
    }

    #[test]
    fn mismatched_lengths_message() {
        let err = MatchError::MismatchedLengths {
            ra_len: 4,
            dec_len: 2,
        };
        assert!(err.to_string().contains("4 RA values, 2 Dec values"));
    }
}
