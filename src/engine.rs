//! Two-pass orchestration: horizontal pass, join, vertical pass, join.

use std::panic;
use std::thread;

use log::{debug, trace};
use serde::Serialize;
use umath::FF32;

use crate::boundary::BoundaryPolicy;
use crate::buffer::PixelBuffer;
use crate::error::BlurError;
use crate::kernel::Kernel;
use crate::partition::partition;
use crate::pass::{self, Axis};

/// Knobs for [`blur_with`].
///
/// ```rust
/// use gaussblur::{BlurParams, BoundaryPolicy};
///
/// let params = BlurParams::new()
///     .with_radius(15)
///     .with_threads(4)
///     .with_boundary(BoundaryPolicy::ClampToEdge);
/// assert_eq!(params.radius, 15);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct BlurParams {
    /// Kernel half-width, `0..=MAX_RADIUS`.
    pub radius: i64,
    /// Worker threads per pass, at least 1.
    pub threads: i64,
    pub boundary: BoundaryPolicy,
}

impl Default for BlurParams {
    fn default() -> Self {
        Self {
            radius: 0,
            threads: 1,
            boundary: BoundaryPolicy::SkipRenormalize,
        }
    }
}

impl BlurParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_radius(mut self, radius: i64) -> Self {
        self.radius = radius;
        self
    }

    #[must_use]
    pub fn with_threads(mut self, threads: i64) -> Self {
        self.threads = threads;
        self
    }

    #[must_use]
    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }
}

/// Gaussian blur `buffer` with the default boundary policy.
///
/// The result does not depend on `num_threads`.
pub fn blur(buffer: PixelBuffer, radius: i64, num_threads: i64) -> Result<PixelBuffer, BlurError> {
    blur_with(
        buffer,
        &BlurParams::new()
            .with_radius(radius)
            .with_threads(num_threads),
    )
}

/// Gaussian blur `buffer` as configured by `params`.
///
/// Rows are blurred into a scratch buffer by up to `params.threads` workers;
/// once every one of them has finished, columns of the scratch buffer are
/// blurred back into `buffer`'s storage, which is returned.
pub fn blur_with(mut buffer: PixelBuffer, params: &BlurParams) -> Result<PixelBuffer, BlurError> {
    let kernel = Kernel::gaussian(params.radius)?;
    let threads = usize::try_from(params.threads)
        .ok()
        .filter(|&t| t >= 1)
        .ok_or(BlurError::InvalidThreadCount(params.threads))?;

    if buffer.is_empty() {
        debug!("blur: empty {}x{} buffer, nothing to do", buffer.width(), buffer.height());
        return Ok(buffer);
    }

    debug!(
        "blur: {}x{} radius={} threads={} boundary={}",
        buffer.width(),
        buffer.height(),
        kernel.radius(),
        threads,
        params.boundary
    );
    let weights = kernel.fast_weights();
    let mut scratch = PixelBuffer::new(buffer.width(), buffer.height(), buffer.color_max());

    run_pass(Axis::Horizontal, &buffer, &mut scratch, &weights, params.boundary, threads);
    run_pass(Axis::Vertical, &scratch, &mut buffer, &weights, params.boundary, threads);

    Ok(buffer)
}

/// Run one pass with a fresh set of scoped workers and wait for all of them.
///
/// Returning from here is the barrier between passes: every write to `dst`
/// has happened before the caller can read it.
fn run_pass(
    axis: Axis,
    src: &PixelBuffer,
    dst: &mut PixelBuffer,
    weights: &[FF32],
    policy: BoundaryPolicy,
    threads: usize,
) {
    let chunks: Vec<_> = partition(axis.extent(src), threads).non_empty().collect();
    debug!("{axis} pass: {} worker(s) over {} lines", chunks.len(), axis.extent(src));

    thread::scope(|s| {
        let handles: Vec<_> = match axis {
            Axis::Horizontal => dst
                .row_bands_mut(chunks)
                .into_iter()
                .map(|band| {
                    trace!("{axis} worker: rows {:?}", band.rows.range());
                    s.spawn(move || pass::horizontal(src, band, weights, policy))
                })
                .collect(),
            Axis::Vertical => dst
                .column_bands_mut(chunks)
                .into_iter()
                .map(|band| {
                    trace!("{axis} worker: columns {:?}", band.cols.range());
                    s.spawn(move || pass::vertical(src, band, weights, policy))
                })
                .collect(),
        };
        for handle in handles {
            if let Err(payload) = handle.join() {
                panic::resume_unwind(payload);
            }
        }
    });
}
