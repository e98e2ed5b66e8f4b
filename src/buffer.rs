//! Planar three-channel 8-bit pixel storage.
//!
//! Samples are kept as three separate planes (red, green, blue), each
//! `width * height` long and indexed `row * width + col`.

use std::marker::PhantomData;

use fimg::Image;

use crate::error::BlurError;
use crate::partition::WorkChunk;

/// An owned RGB image split into three channel planes.
///
/// `color_max` is the maximum intensity declared by the source format. The
/// blur never changes it; it is carried through to the encoder.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    color_max: u16,
    r: Vec<u8>,
    g: Vec<u8>,
    b: Vec<u8>,
}

impl PixelBuffer {
    /// Allocate a black buffer.
    ///
    /// # Panics
    ///
    /// If `width * height` overflows `usize`, like any other oversized
    /// allocation.
    pub fn new(width: usize, height: usize, color_max: u16) -> Self {
        let Some(len) = width.checked_mul(height) else {
            panic!("{width}x{height} pixel buffer overflows usize");
        };
        Self {
            width,
            height,
            color_max,
            r: vec![0; len],
            g: vec![0; len],
            b: vec![0; len],
        }
    }

    /// The zero-area buffer handed out when decoding fails.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a buffer from already separated planes.
    pub fn from_planes(
        width: usize,
        height: usize,
        color_max: u16,
        r: Vec<u8>,
        g: Vec<u8>,
        b: Vec<u8>,
    ) -> Result<Self, BlurError> {
        let expected = pixel_count(width, height)?;
        for (channel, plane) in [("red", &r), ("green", &g), ("blue", &b)] {
            if plane.len() != expected {
                return Err(BlurError::PlaneLength {
                    channel,
                    expected,
                    actual: plane.len(),
                });
            }
        }
        Ok(Self {
            width,
            height,
            color_max,
            r,
            g,
            b,
        })
    }

    /// Split packed `RGBRGB...` bytes into planes.
    pub fn from_interleaved(
        width: usize,
        height: usize,
        color_max: u16,
        data: &[u8],
    ) -> Result<Self, BlurError> {
        let expected = pixel_count(width, height)?
            .checked_mul(3)
            .ok_or(BlurError::TooManyPixels { width, height })?;
        if data.len() != expected {
            return Err(BlurError::PlaneLength {
                channel: "interleaved",
                expected,
                actual: data.len(),
            });
        }
        let mut out = Self::new(width, height, color_max);
        for (i, px) in data.chunks_exact(3).enumerate() {
            out.r[i] = px[0];
            out.g[i] = px[1];
            out.b[i] = px[2];
        }
        Ok(out)
    }

    /// Pack the planes back into `RGBRGB...` order.
    pub fn to_interleaved(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.len() * 3);
        for i in 0..self.len() {
            out.extend_from_slice(&[self.r[i], self.g[i], self.b[i]]);
        }
        out
    }

    /// Copy an interleaved [`fimg`] image into planar storage.
    pub fn from_image<T: AsRef<[u8]>>(image: &Image<T, 3>, color_max: u16) -> Self {
        let width = image.width() as usize;
        let height = image.height() as usize;
        let mut out = Self::new(width, height, color_max);
        for (i, px) in image.buffer().as_ref().chunks_exact(3).enumerate() {
            out.r[i] = px[0];
            out.g[i] = px[1];
            out.b[i] = px[2];
        }
        out
    }

    /// Interleave into an owned [`fimg`] image.
    ///
    /// Returns `None` for a zero-area buffer, which `fimg` cannot hold.
    pub fn to_image(&self) -> Option<Image<Vec<u8>, 3>> {
        if self.is_empty() {
            return None;
        }
        let width = u32::try_from(self.width).ok()?;
        let height = u32::try_from(self.height).ok()?;
        Some(Image::build(width, height).buf(self.to_interleaved()))
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn color_max(&self) -> u16 {
        self.color_max
    }

    /// Number of pixels (`width * height`).
    pub fn len(&self) -> usize {
        self.width * self.height
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[inline]
    pub fn index(&self, col: usize, row: usize) -> usize {
        row * self.width + col
    }

    #[inline]
    pub fn pixel(&self, col: usize, row: usize) -> [u8; 3] {
        let i = self.index(col, row);
        [self.r[i], self.g[i], self.b[i]]
    }

    #[inline]
    pub fn set_pixel(&mut self, col: usize, row: usize, rgb: [u8; 3]) {
        let i = self.index(col, row);
        self.r[i] = rgb[0];
        self.g[i] = rgb[1];
        self.b[i] = rgb[2];
    }

    /// Borrow the red, green and blue planes.
    pub fn planes(&self) -> [&[u8]; 3] {
        [&self.r, &self.g, &self.b]
    }

    /// Split the planes into exclusive row bands, one per chunk.
    ///
    /// Chunks must be ordered, disjoint and contiguous from row 0 once empty
    /// ones are dropped, which is what
    /// [`Partition::non_empty`](crate::partition::Partition::non_empty) yields.
    pub(crate) fn row_bands_mut(
        &mut self,
        chunks: impl IntoIterator<Item = WorkChunk>,
    ) -> Vec<RowBand<'_>> {
        let width = self.width;
        let (mut r, mut g, mut b) = (&mut self.r[..], &mut self.g[..], &mut self.b[..]);
        let mut next_row = 0;
        let mut bands = Vec::new();
        for chunk in chunks {
            assert_eq!(chunk.start, next_row, "row chunks must be contiguous");
            next_row = chunk.end;
            let n = chunk.len() * width;
            let (r_band, r_rest) = std::mem::take(&mut r).split_at_mut(n);
            let (g_band, g_rest) = std::mem::take(&mut g).split_at_mut(n);
            let (b_band, b_rest) = std::mem::take(&mut b).split_at_mut(n);
            (r, g, b) = (r_rest, g_rest, b_rest);
            bands.push(RowBand {
                rows: chunk,
                planes: [r_band, g_band, b_band],
            });
        }
        bands
    }

    /// Hand out write access to disjoint column ranges, one per chunk.
    ///
    /// Chunks must be ordered and non-overlapping; this is checked, since
    /// the bands write through shared raw pointers.
    pub(crate) fn column_bands_mut(
        &mut self,
        chunks: impl IntoIterator<Item = WorkChunk>,
    ) -> Vec<ColumnBand<'_>> {
        let (width, height) = (self.width, self.height);
        let planes = [
            self.r.as_mut_ptr(),
            self.g.as_mut_ptr(),
            self.b.as_mut_ptr(),
        ];
        let mut next_col = 0;
        let mut bands = Vec::new();
        for cols in chunks {
            assert!(
                cols.start >= next_col && cols.end <= width,
                "column chunks must be ordered, disjoint and in range"
            );
            next_col = cols.end;
            bands.push(ColumnBand {
                cols,
                width,
                height,
                planes,
                _buffer: PhantomData,
            });
        }
        bands
    }
}

fn pixel_count(width: usize, height: usize) -> Result<usize, BlurError> {
    width
        .checked_mul(height)
        .ok_or(BlurError::TooManyPixels { width, height })
}

/// Exclusive write access to a contiguous range of rows.
pub(crate) struct RowBand<'a> {
    pub rows: WorkChunk,
    pub planes: [&'a mut [u8]; 3],
}

/// Exclusive write access to the columns `cols` of every row.
///
/// Columns of a row-major image are strided, so this cannot be a plain
/// slice; writes go through the plane pointers and are confined to `cols`.
pub(crate) struct ColumnBand<'a> {
    pub cols: WorkChunk,
    width: usize,
    height: usize,
    planes: [*mut u8; 3],
    _buffer: PhantomData<&'a mut [u8]>,
}

// SAFETY: bands handed out by one `column_bands_mut` call cover disjoint
// columns and hold the buffer mutably borrowed, so no two threads can touch
// the same sample.
unsafe impl Send for ColumnBand<'_> {}

impl ColumnBand<'_> {
    #[inline]
    pub fn set(&mut self, col: usize, row: usize, rgb: [u8; 3]) {
        assert!(self.cols.range().contains(&col) && row < self.height);
        let i = row * self.width + col;
        for (plane, v) in self.planes.iter().zip(rgb) {
            // SAFETY: `i < width * height`, the length of every plane, and
            // `col` lies in this band's columns only.
            unsafe { *plane.add(i) = v };
        }
    }
}
