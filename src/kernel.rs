//! Exponential-decay Gaussian weights.

use umath::FF32;

use crate::error::BlurError;

/// Largest radius accepted by [`Kernel::gaussian`].
pub const MAX_RADIUS: usize = 1000;
/// Offset at which the outermost tap is evaluated.
pub const MAX_X: f64 = 1.33;
/// The truncated pi the weights have always been tuned with.
#[allow(clippy::approx_constant)]
pub const PI: f64 = 3.14159;

/// Half of a symmetric 1-D kernel.
///
/// `weights()[0]` is the center tap; `weights()[i]` is shared by the taps at
/// `+i` and `-i`.
#[derive(Clone, Debug, PartialEq)]
pub struct Kernel {
    weights: Box<[f32]>,
}

impl Kernel {
    /// Build the weights `exp(-(i * MAX_X / radius)^2 * PI)` for `i` in `0..=radius`.
    ///
    /// Radius zero yields the identity kernel `[1.0]`.
    pub fn gaussian(radius: i64) -> Result<Self, BlurError> {
        let r = usize::try_from(radius)
            .ok()
            .filter(|&r| r <= MAX_RADIUS)
            .ok_or(BlurError::InvalidRadius(radius))?;
        if r == 0 {
            return Ok(Self {
                weights: Box::new([1.0_f32]),
            });
        }
        let step = MAX_X / r as f64;
        let weights = (0..=r)
            .map(|i| {
                let x = i as f64 * step;
                (-x * x * PI).exp() as f32
            })
            .collect();
        Ok(Self { weights })
    }

    pub fn radius(&self) -> usize {
        self.weights.len() - 1
    }

    pub fn weights(&self) -> &[f32] {
        &self.weights
    }

    pub fn center(&self) -> f32 {
        self.weights[0]
    }

    /// Weight of the tap at a signed offset from the center.
    pub fn weight(&self, offset: isize) -> Option<f32> {
        self.weights.get(offset.unsigned_abs()).copied()
    }

    /// The weights as fast-math floats for the convolution loop.
    pub(crate) fn fast_weights(&self) -> Vec<FF32> {
        // SAFETY: every weight is an `exp` of a finite non-positive number,
        // so it is finite and in (0, 1].
        self.weights
            .iter()
            .map(|&w| unsafe { FF32::new(w) })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identity_kernel() {
        let k = Kernel::gaussian(0).unwrap();
        assert_eq!(k.weights(), &[1.0_f32]);
        assert_eq!(k.radius(), 0);
    }

    #[test]
    fn strictly_decreasing() {
        for radius in [1, 2, 5, 50, MAX_RADIUS as i64] {
            let k = Kernel::gaussian(radius).unwrap();
            assert_eq!(k.weights().len(), radius as usize + 1);
            assert_eq!(k.center(), 1.0);
            for pair in k.weights().windows(2) {
                assert!(pair[0] > pair[1], "radius {radius}: {pair:?}");
            }
            assert!(*k.weights().last().unwrap() >= 0.0);
        }
    }

    #[test]
    fn outermost_tap() {
        let k = Kernel::gaussian(4).unwrap();
        let expected = (-(MAX_X * MAX_X) * PI).exp() as f32;
        assert!((k.weights()[4] - expected).abs() < 1e-7);
    }

    #[test]
    fn symmetric_lookup() {
        let k = Kernel::gaussian(3).unwrap();
        for i in 1..=3 {
            assert_eq!(k.weight(i), k.weight(-i));
        }
        assert_eq!(k.weight(4), None);
        assert_eq!(k.weight(-4), None);
    }

    #[test]
    fn rejects_out_of_range() {
        assert_eq!(Kernel::gaussian(-1), Err(BlurError::InvalidRadius(-1)));
        assert_eq!(
            Kernel::gaussian(MAX_RADIUS as i64 + 1),
            Err(BlurError::InvalidRadius(MAX_RADIUS as i64 + 1))
        );
    }
}
