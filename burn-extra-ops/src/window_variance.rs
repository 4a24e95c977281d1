//! Sliding-window variance over the spatial dimensions of a tensor.

use burn::{nn::Unfold4dConfig, prelude::*};

/// Unbiased variance of every `ksize` x `ksize` sliding window of a
/// `[N, C, H, W]` tensor, computed per channel with stride 1 and no padding.
///
/// The output has shape `[N, C, H - ksize + 1, W - ksize + 1]`, one value per
/// window position. `ksize` must be at least 2 (a single-element window has no
/// unbiased variance) and no larger than either spatial extent.
pub fn window_variance<B: Backend>(tensor: Tensor<B, 4>, ksize: usize) -> Tensor<B, 4> {
    let [batch, channels, height, width] = tensor.dims();
    assert!(
        (2..=height.min(width)).contains(&ksize),
        "window size ({ksize}) must be between 2 and the smallest spatial dimension ({})",
        height.min(width)
    );

    let out_height = height - ksize + 1;
    let out_width = width - ksize + 1;

    // [N, C * ksize * ksize, L] with the channel blocks contiguous, so the
    // window elements of each channel land on their own axis after reshaping.
    let windows = Unfold4dConfig::new([ksize, ksize]).init().forward(tensor);
    let windows = windows.reshape([batch, channels, ksize * ksize, out_height * out_width]);

    windows
        .var(2)
        .reshape([batch, channels, out_height, out_width])
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::{backend::ndarray::NdArray, tensor::cast::ToElement};

    type TestBackend = NdArray<f32>;

    #[test]
    fn constant_windows_have_zero_variance() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 4>::full([1, 2, 5, 5], 3.0, &device);

        let variance = window_variance(tensor, 3);
        assert_eq!(variance.dims(), [1, 2, 3, 3]);

        let max = variance.max().into_scalar().to_f32();
        assert!(max.abs() < 1e-6, "expected zero variance, got {max}");
    }

    #[test]
    fn matches_hand_computed_unbiased_variance() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 4>::from_floats(
            [[[[1.0, 2.0, 3.0], [4.0, 5.0, 6.0], [7.0, 8.0, 9.0]]]],
            &device,
        );

        // Single 3x3 window with mean 5: sum of squared deviations is 60,
        // divided by n - 1 = 8.
        let variance = window_variance(tensor, 3);
        assert_eq!(variance.dims(), [1, 1, 1, 1]);

        let value = variance.into_scalar().to_f32();
        assert!((value - 7.5).abs() < 1e-5, "expected 7.5, got {value}");
    }

    #[test]
    #[should_panic(expected = "window size")]
    fn window_cannot_exceed_the_spatial_extent() {
        let device = Default::default();
        let tensor = Tensor::<TestBackend, 4>::zeros([1, 1, 3, 3], &device);
        window_variance(tensor, 4);
    }
}
