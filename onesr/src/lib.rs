//! Super-resolution training utilities for the Burn framework.
//!
//! This crate ports the data sampling and loss weighting/reduction layer of the
//! OneSR toolbox: an epoch-seeded distributed sampler for iteration-based
//! training, the shared weighting/reduction semantics behind every pixel loss,
//! and the locally discriminative (LDL) artifact map used to emphasize
//! artifact-prone pixels during fine-tuning.

pub mod data;
pub mod error;
pub mod losses;

pub use data::EnlargedSampler;
#[cfg(feature = "train")]
pub use data::EnlargedDataset;
pub use error::{OneSrError, OneSrResult};
pub use losses::{
    reduce_loss, refined_artifact_map, weight_reduce_loss, weighted_loss, LossOutput, Reduction,
};
