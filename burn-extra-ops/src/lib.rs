//! Additional operations for the Burn deep learning framework
//!
//! This crate provides operations that are commonly used in deep learning but are not
//! yet available in the core Burn framework.

use burn::prelude::*;

mod reflect_pad;
mod window_variance;

// Convenient re-exports
pub use reflect_pad::reflect_pad_2d;
pub use window_variance::window_variance;

/// Additional operations for Burn tensors
pub trait TensorExtraOps<B: Backend> {
    /// Pad the spatial dimensions by reflecting the rows and columns next to each border
    fn reflect_pad_2d(self, pad: usize) -> Self;

    /// Unbiased variance of every `ksize` x `ksize` sliding window
    fn window_variance(self, ksize: usize) -> Self;
}

impl<B: Backend> TensorExtraOps<B> for Tensor<B, 4> {
    fn reflect_pad_2d(self, pad: usize) -> Self {
        reflect_pad_2d(self, pad)
    }

    fn window_variance(self, ksize: usize) -> Self {
        window_variance(self, ksize)
    }
}
