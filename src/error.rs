use thiserror::Error;

use crate::kernel::MAX_RADIUS;

/// Precondition failures reported by the blur engine.
///
/// All of these are raised before any pixel is touched, so a failed call
/// never leaves a partially blurred buffer behind.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum BlurError {
    /// Radius is negative or above [`MAX_RADIUS`].
    #[error("invalid radius {0} (expected 0..={max})", max = MAX_RADIUS)]
    InvalidRadius(i64),
    /// Fewer than one worker thread was requested.
    #[error("invalid thread count {0} (expected at least 1)")]
    InvalidThreadCount(i64),
    /// A channel plane does not hold `width * height` samples.
    #[error("{channel} plane holds {actual} samples, expected {expected}")]
    PlaneLength {
        /// Which plane was wrong.
        channel: &'static str,
        /// `width * height`.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },
    /// `width * height` does not fit in `usize`.
    #[error("{width}x{height} pixels overflow the address space")]
    TooManyPixels { width: usize, height: usize },
}
