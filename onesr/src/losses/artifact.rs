//! Artifact map for locally discriminative learning (LDL).
//!
//! Combines a patch-level statistic (per-sample residual variance) with a
//! pixel-level statistic (sliding-window residual variance) to weight pixels
//! that are likely visual artifacts, so the training loss can emphasize them.

use burn::{prelude::*, tensor::backend::Backend};
use burn_extra_ops::TensorExtraOps;

/// Calculate the per-pixel artifact weights for a batch of images.
///
/// `img_gt`, `img_output` and `img_ema` are same-shaped `[N, C, H, W]`
/// tensors: the ground truth, the optimizing model's output and the EMA
/// model's output. `ksize` is the odd size of the local variance window.
///
/// The returned `[N, 1, H, W]` map is non-negative. A pixel keeps its weight
/// only where the optimizing model's residual strictly exceeds the EMA
/// model's residual; everywhere else the map is zero, so a model that matches
/// its EMA copy receives no artifact penalty at all.
pub fn refined_artifact_map<B: Backend>(
    img_gt: Tensor<B, 4>,
    img_output: Tensor<B, 4>,
    img_ema: Tensor<B, 4>,
    ksize: usize,
) -> Tensor<B, 4> {
    assert!(ksize % 2 == 1, "local window size ({ksize}) must be odd");

    let residual_ema = (img_gt.clone() - img_ema).abs().sum_dim(1);
    let residual_sr = (img_gt - img_output).abs().sum_dim(1);

    let patch_level_weight = sample_variance(residual_sr.clone()).powf_scalar(0.2);
    let pixel_level_weight = local_weights(residual_sr.clone(), ksize);
    let overall_weight = patch_level_weight * pixel_level_weight;

    overall_weight.mask_fill(residual_sr.lower_equal(residual_ema), 0.0)
}

/// Unbiased variance over all non-batch dimensions, kept as `[N, 1, 1, 1]`.
fn sample_variance<B: Backend>(tensor: Tensor<B, 4>) -> Tensor<B, 4> {
    let [batch, channels, height, width] = tensor.dims();
    tensor
        .reshape([batch, channels * height * width])
        .var(1)
        .reshape([batch, 1, 1, 1])
}

/// Local variance of the residual around every pixel, at input resolution.
fn local_weights<B: Backend>(residual: Tensor<B, 4>, ksize: usize) -> Tensor<B, 4> {
    let pad = (ksize - 1) / 2;
    residual.reflect_pad_2d(pad).window_variance(ksize)
}
