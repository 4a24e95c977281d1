//! Loss weighting and reduction utilities for super-resolution training.
//!
//! Every concrete pixel loss shares the same weighting/reduction semantics
//! through the [`weighted_loss`] combinator; the artifact map supplies the
//! per-pixel weights for locally discriminative fine-tuning.

pub mod artifact;
pub mod basic;
pub mod reduction;

// Re-export loss functions and their configs
pub use artifact::refined_artifact_map;
pub use basic::{
    charbonnier_loss, l1_loss, mse_loss, CharbonnierLoss, CharbonnierLossConfig, L1Loss,
    L1LossConfig, MseLoss, MseLossConfig, WeightedTvLoss, WeightedTvLossConfig,
};
pub use reduction::{reduce_loss, weight_reduce_loss, weighted_loss, LossOutput, Reduction};
