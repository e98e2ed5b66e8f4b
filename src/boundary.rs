use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// What to do with a kernel tap that lands outside the image.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum BoundaryPolicy {
    /// Drop the tap and its weight; the pixel is renormalized by the weights
    /// that were actually applied.
    #[default]
    SkipRenormalize,
    /// Sample the nearest edge pixel instead and keep the full weight.
    ClampToEdge,
}

impl BoundaryPolicy {
    /// Map a possibly out-of-range position along an axis of length `len` to
    /// the sample that should be read, or `None` if the tap is dropped.
    #[inline]
    pub fn resolve(self, position: isize, len: usize) -> Option<usize> {
        if let Ok(p) = usize::try_from(position) {
            if p < len {
                return Some(p);
            }
        }
        match self {
            Self::SkipRenormalize => None,
            Self::ClampToEdge if len == 0 => None,
            Self::ClampToEdge if position < 0 => Some(0),
            Self::ClampToEdge => Some(len - 1),
        }
    }
}

impl fmt::Display for BoundaryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::SkipRenormalize => "skip",
            Self::ClampToEdge => "clamp",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown boundary policy {0:?} (expected \"skip\" or \"clamp\")")]
pub struct ParseBoundaryError(String);

impl FromStr for BoundaryPolicy {
    type Err = ParseBoundaryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(Self::SkipRenormalize),
            "clamp" => Ok(Self::ClampToEdge),
            other => Err(ParseBoundaryError(other.to_owned())),
        }
    }
}
