//! Error taxonomy shared by every component of the crate.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, DdeError>;

#[derive(Debug, Error)]
pub enum DdeError {
    #[error("`ts` must be strictly increasing or decreasing.")]
    NotMonotonic,

    #[error("Numbers of time stamps and state values don't match ({ts} vs {ys}).")]
    LengthMismatch { ts: usize, ys: usize },

    #[error("Numbers of time stamps and interpolants don't match ({ts} time stamps for {interpolants} interpolants).")]
    SegmentCountMismatch { ts: usize, interpolants: usize },

    #[error("At least one interpolant is required.")]
    NoSegments,

    #[error("Solution has discontinuities; the query must repeat each discontinuity time.")]
    MissingDiscontinuityMarkers,

    #[error("Repeated query time {t} does not match any discontinuity of the solution.")]
    UnmatchedDiscontinuityMarker { t: f64 },

    #[error("Interpolant of segment {segment} returned {got} components, expected {expected}.")]
    InterpolantShape {
        segment: usize,
        expected: usize,
        got: usize,
    },

    #[error("`first_step` must be positive.")]
    NonPositiveFirstStep,

    #[error("`first_step` exceeds bounds.")]
    FirstStepExceedsBounds,

    #[error("`max_step` must be positive.")]
    NonPositiveMaxStep,

    #[error("`atol` has wrong shape (expected {expected} components, got {got}).")]
    ToleranceShape { expected: usize, got: usize },

    #[error("`atol` must be positive.")]
    NegativeTolerance,

    #[error("State dimension mismatch. Expected {expected}, got {got}.")]
    StateDimension { expected: usize, got: usize },

    #[error("Right-hand side evaluation failed: {0}")]
    RightHandSide(#[from] anyhow::Error),
}
