//! Data sampling utilities for iteration-based distributed training.

pub mod sampler;

#[cfg(feature = "train")]
pub mod dataset;

pub use sampler::EnlargedSampler;

#[cfg(feature = "train")]
pub use dataset::EnlargedDataset;
