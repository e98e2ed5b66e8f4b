//! Binary PPM (`P6`) reading and writing.
//!
//! The header is a `P6` line, any number of `#` comment lines, a
//! `"<width> <height>"` line and a `<color_max>` line, followed by
//! `width * height` packed RGB byte triples.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, error};
use thiserror::Error;

use crate::buffer::PixelBuffer;

pub const MAGIC: &str = "P6";
pub const MAX_DIMENSION: usize = 3000;
pub const MAX_PIXELS: usize = MAX_DIMENSION * MAX_DIMENSION;

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PpmError {
    #[error("couldn't access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("incorrect magic number: {0:?}")]
    BadMagic(String),
    #[error("couldn't read dimensions from {0:?}")]
    BadDimensions(String),
    #[error("image size is too big: {0} pixels (limit {limit})", limit = MAX_PIXELS)]
    TooLarge(usize),
    #[error("couldn't read color max from {0:?}")]
    BadColorMax(String),
    #[error("image data truncated: expected {expected} bytes, found {actual}")]
    Truncated { expected: usize, actual: usize },
}

/// Parse an in-memory `P6` file.
pub fn decode(bytes: &[u8]) -> Result<PixelBuffer, PpmError> {
    let mut rest = bytes;

    let magic = next_line(&mut rest);
    if magic != MAGIC.as_bytes() {
        return Err(PpmError::BadMagic(lossy(magic)));
    }

    let mut line = next_line(&mut rest);
    while line.first() == Some(&b'#') {
        line = next_line(&mut rest);
    }
    let (width, height) =
        parse_dimensions(line).ok_or_else(|| PpmError::BadDimensions(lossy(line)))?;
    let pixels = width
        .checked_mul(height)
        .filter(|&n| n <= MAX_PIXELS)
        .ok_or(PpmError::TooLarge(width.saturating_mul(height)))?;

    let line = next_line(&mut rest);
    let color_max = parse_number::<u16>(line)
        .filter(|&m| m > 0)
        .ok_or_else(|| PpmError::BadColorMax(lossy(line)))?;

    let expected = pixels * 3;
    let data = rest.get(..expected).ok_or(PpmError::Truncated {
        expected,
        actual: rest.len(),
    })?;
    debug!("ppm: decoded {width}x{height} color_max={color_max}");
    PixelBuffer::from_interleaved(width, height, color_max, data).map_err(|_| {
        PpmError::Truncated {
            expected,
            actual: data.len(),
        }
    })
}

/// Serialize `buffer` as a `P6` file.
pub fn encode(buffer: &PixelBuffer) -> Vec<u8> {
    let header = format!(
        "{MAGIC}\n{} {}\n{}\n",
        buffer.width(),
        buffer.height(),
        buffer.color_max()
    );
    let mut out = Vec::with_capacity(header.len() + buffer.len() * 3);
    out.extend_from_slice(header.as_bytes());
    out.extend_from_slice(&buffer.to_interleaved());
    out
}

pub fn read(path: impl AsRef<Path>) -> Result<PixelBuffer, PpmError> {
    let path = path.as_ref();
    let bytes = fs::read(path).map_err(|source| PpmError::Io {
        path: path.to_owned(),
        source,
    })?;
    decode(&bytes)
}

/// Read `path`, logging any failure and falling back to an empty buffer.
///
/// The error is swallowed, so the caller cannot tell a failed read from a
/// zero-area image. The `gaussblur` binary calls [`read`] instead so it can
/// report the failure and exit nonzero; this is for embedders that want to
/// keep going with an empty image.
pub fn read_or_empty(path: impl AsRef<Path>) -> PixelBuffer {
    read(path).unwrap_or_else(|e| {
        error!("Encountered PPM error during reading: {e}");
        PixelBuffer::empty()
    })
}

pub fn write(buffer: &PixelBuffer, path: impl AsRef<Path>) -> Result<(), PpmError> {
    let path = path.as_ref();
    fs::write(path, encode(buffer)).map_err(|source| PpmError::Io {
        path: path.to_owned(),
        source,
    })
}

/// Split off everything up to the next `\n` (dropped, as is a trailing `\r`).
fn next_line<'a>(rest: &mut &'a [u8]) -> &'a [u8] {
    let bytes: &'a [u8] = *rest;
    let (line, tail) = match bytes.iter().position(|&b| b == b'\n') {
        Some(i) => (&bytes[..i], &bytes[i + 1..]),
        None => (bytes, &[][..]),
    };
    *rest = tail;
    line.strip_suffix(b"\r").unwrap_or(line)
}

fn parse_dimensions(line: &[u8]) -> Option<(usize, usize)> {
    let text = std::str::from_utf8(line).ok()?;
    let (w, h) = text.split_once(' ')?;
    let width = parse_number(w.as_bytes())?;
    let height = parse_number(h.as_bytes())?;
    (width > 0 && height > 0).then_some((width, height))
}

fn parse_number<T: std::str::FromStr>(digits: &[u8]) -> Option<T> {
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return None;
    }
    std::str::from_utf8(digits).ok()?.parse().ok()
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
