//! One-dimensional convolution over a chunk of rows or columns.
//!
//! Workers read a shared source buffer and write only to the part of the
//! destination they were handed, so no locking happens here.

use std::fmt;

use umath::FF32;

use crate::boundary::BoundaryPolicy;
use crate::buffer::{ColumnBand, PixelBuffer, RowBand};

/// Direction a pass scans in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Along each row; chunked over rows.
    Horizontal,
    /// Along each column; chunked over columns.
    Vertical,
}

impl Axis {
    /// The dimension a pass along this axis is partitioned over.
    pub fn extent(self, buffer: &PixelBuffer) -> usize {
        match self {
            Self::Horizontal => buffer.height(),
            Self::Vertical => buffer.width(),
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Horizontal => "horizontal",
            Self::Vertical => "vertical",
        })
    }
}

/// Blur every row in `band`, reading from `src`.
pub(crate) fn horizontal(
    src: &PixelBuffer,
    band: RowBand<'_>,
    weights: &[FF32],
    policy: BoundaryPolicy,
) {
    let width = src.width();
    let planes = src.planes();
    let RowBand {
        rows,
        planes: [r, g, b],
    } = band;
    for (local, row) in rows.range().enumerate() {
        let line = Line {
            base: row * width,
            stride: 1,
            len: width,
        };
        for col in 0..width {
            let [vr, vg, vb] = line.convolve(planes, col, weights, policy);
            let i = local * width + col;
            r[i] = vr;
            g[i] = vg;
            b[i] = vb;
        }
    }
}

/// Blur every column in `band`, reading from `src`.
pub(crate) fn vertical(
    src: &PixelBuffer,
    mut band: ColumnBand<'_>,
    weights: &[FF32],
    policy: BoundaryPolicy,
) {
    let (width, height) = (src.width(), src.height());
    let planes = src.planes();
    for col in band.cols.range() {
        let line = Line {
            base: col,
            stride: width,
            len: height,
        };
        for row in 0..height {
            band.set(col, row, line.convolve(planes, row, weights, policy));
        }
    }
}

/// A single row or column laid over the planar storage.
struct Line {
    base: usize,
    stride: usize,
    len: usize,
}

impl Line {
    #[inline]
    fn at(&self, pos: usize) -> usize {
        self.base + pos * self.stride
    }

    /// Weighted average of the three channels around `pos`, divided by the
    /// sum of the weights that were applied.
    #[inline]
    fn convolve(
        &self,
        planes: [&[u8]; 3],
        pos: usize,
        weights: &[FF32],
        policy: BoundaryPolicy,
    ) -> [u8; 3] {
        let radius = weights.len() - 1;
        let w0 = weights[0];
        let center = self.at(pos);
        let mut acc = planes.map(|p| w0 * sample(p[center]));
        let mut total = w0;

        if pos >= radius && pos + radius < self.len {
            // interior: every tap is in range
            for (i, &w) in weights.iter().enumerate().skip(1) {
                let (lo, hi) = (self.at(pos - i), self.at(pos + i));
                for (a, p) in acc.iter_mut().zip(planes) {
                    *a = *a + w * (sample(p[lo]) + sample(p[hi]));
                }
                total = total + w + w;
            }
        } else {
            for (i, &w) in weights.iter().enumerate().skip(1) {
                let i = i as isize;
                for offset in [-i, i] {
                    let Some(p) = policy.resolve(pos as isize + offset, self.len) else {
                        continue;
                    };
                    let idx = self.at(p);
                    for (a, plane) in acc.iter_mut().zip(planes) {
                        *a = *a + w * sample(plane[idx]);
                    }
                    total = total + w;
                }
            }
        }

        acc.map(|a| quantize(a / total))
    }
}

#[inline]
fn sample(v: u8) -> FF32 {
    // SAFETY: 0..=255 is finite
    unsafe { FF32::new(f32::from(v)) }
}

/// Round to nearest; `as` saturates anything outside `0..=255`.
#[inline]
fn quantize(v: FF32) -> u8 {
    (*v).round() as u8
}
