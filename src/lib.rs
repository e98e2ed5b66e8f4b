#![doc = include_str!("../README.md")]
pub mod boundary;
pub mod buffer;
mod engine;
pub mod error;
pub mod kernel;
pub mod partition;
pub mod pass;
pub mod ppm;

pub use boundary::BoundaryPolicy;
pub use buffer::PixelBuffer;
pub use engine::{blur, blur_with, BlurParams};
pub use error::BlurError;
pub use kernel::{Kernel, MAX_RADIUS};
