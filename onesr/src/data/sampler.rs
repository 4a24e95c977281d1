//! Epoch-seeded distributed sampler with dataset enlarging.

use rand::{rngs::StdRng, seq::SliceRandom, SeedableRng};

use crate::error::{OneSrError, OneSrResult};

/// Sampler that restricts data loading to a subset of the dataset.
///
/// Supports enlarging the dataset for iteration-based training, which saves
/// time when the data loader is restarted after each epoch: with `ratio > 1`
/// the index space is tiled `ratio` times before sharding, so short datasets
/// still yield enough samples per epoch.
///
/// Every participating process constructs its own instance with the same
/// `dataset_size`, `num_replicas` and `ratio` and its own `rank`. As long as
/// all processes agree on the epoch value, they derive the same permutation
/// and therefore consistent, non-overlapping index subsets.
#[derive(Debug, Clone)]
pub struct EnlargedSampler {
    dataset_size: usize,
    num_replicas: usize,
    rank: usize,
    epoch: u64,
    num_samples: usize,
    total_size: usize,
}

impl EnlargedSampler {
    /// Create a sampler over `dataset_size` samples, sharded across
    /// `num_replicas` processes, yielding the shard for `rank`.
    ///
    /// # Errors
    ///
    /// Returns [`OneSrError::InvalidConfiguration`] when `dataset_size`,
    /// `num_replicas` or `ratio` is zero, or when `rank` is not a valid
    /// replica index.
    pub fn new(
        dataset_size: usize,
        num_replicas: usize,
        rank: usize,
        ratio: usize,
    ) -> OneSrResult<Self> {
        if dataset_size == 0 {
            return Err(OneSrError::InvalidConfiguration {
                reason: "dataset must contain at least one sample".to_string(),
            });
        }
        if num_replicas == 0 {
            return Err(OneSrError::InvalidConfiguration {
                reason: "num_replicas must be at least 1".to_string(),
            });
        }
        if rank >= num_replicas {
            return Err(OneSrError::InvalidConfiguration {
                reason: format!("rank ({rank}) must be smaller than num_replicas ({num_replicas})"),
            });
        }
        if ratio == 0 {
            return Err(OneSrError::InvalidConfiguration {
                reason: "enlarging ratio must be at least 1".to_string(),
            });
        }

        let num_samples = (dataset_size * ratio).div_ceil(num_replicas);
        let total_size = num_samples * num_replicas;

        Ok(Self {
            dataset_size,
            num_replicas,
            rank,
            epoch: 0,
            num_samples,
            total_size,
        })
    }

    /// Set the epoch used to seed the shuffle.
    ///
    /// Must be called once per training epoch before the index order is
    /// re-derived; the sampler never advances the epoch on its own.
    pub fn set_epoch(&mut self, epoch: u64) {
        self.epoch = epoch;
    }

    /// Derive this rank's index sequence for the current epoch.
    ///
    /// The permutation of `[0, total_size)` is seeded with exactly the epoch
    /// value, so every replica computes the same order before subsampling.
    /// Values are folded into the dataset range with a modulo, which repeats
    /// indices when the enlarged size exceeds the dataset size.
    pub fn indices(&self) -> Vec<usize> {
        let mut rng = StdRng::seed_from_u64(self.epoch);
        let mut permutation: Vec<usize> = (0..self.total_size).collect();
        permutation.shuffle(&mut rng);

        let indices: Vec<usize> = permutation
            .into_iter()
            .map(|value| value % self.dataset_size)
            .skip(self.rank)
            .step_by(self.num_replicas)
            .collect();
        assert_eq!(
            indices.len(),
            self.num_samples,
            "subsampled index count diverged from num_samples"
        );

        indices
    }

    /// Iterate over this rank's index sequence for the current epoch.
    ///
    /// Re-iterating without calling [`set_epoch`](Self::set_epoch) reproduces
    /// the identical order.
    pub fn iter(&self) -> impl Iterator<Item = usize> {
        self.indices().into_iter()
    }

    /// Number of indices yielded per epoch for this rank.
    pub const fn len(&self) -> usize {
        self.num_samples
    }

    /// A sampler always yields at least one index.
    pub const fn is_empty(&self) -> bool {
        self.num_samples == 0
    }

    /// Size of the underlying dataset index space.
    pub const fn dataset_size(&self) -> usize {
        self.dataset_size
    }

    /// Enlarged index space size, `num_samples * num_replicas`.
    pub const fn total_size(&self) -> usize {
        self.total_size
    }

    /// The epoch currently used to seed the shuffle.
    pub const fn epoch(&self) -> u64 {
        self.epoch
    }
}
