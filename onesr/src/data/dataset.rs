//! Dataset view over one epoch of an [`EnlargedSampler`].

use std::marker::PhantomData;

use burn::data::dataset::Dataset;

use crate::{
    data::sampler::EnlargedSampler,
    error::{OneSrError, OneSrResult},
};

/// A dataset transform that materializes one epoch of an enlarged, sharded
/// sampling plan over a base dataset.
///
/// The view snapshots the sampler's index sequence at construction, so a data
/// loader iterating it sees exactly this rank's shard in epoch order. Building
/// a new view after [`EnlargedSampler::set_epoch`] is the per-epoch reshuffle.
pub struct EnlargedDataset<D, I> {
    dataset: D,
    indices: Vec<usize>,
    input: PhantomData<I>,
}

impl<D, I> EnlargedDataset<D, I>
where
    D: Dataset<I>,
{
    /// Wrap `dataset` with the current-epoch index sequence of `sampler`.
    ///
    /// # Errors
    ///
    /// Returns [`OneSrError::InvalidConfiguration`] when the sampler was sized
    /// for a different dataset length.
    pub fn new(dataset: D, sampler: &EnlargedSampler) -> OneSrResult<Self> {
        if sampler.dataset_size() != dataset.len() {
            return Err(OneSrError::InvalidConfiguration {
                reason: format!(
                    "sampler covers {} samples but the dataset holds {}",
                    sampler.dataset_size(),
                    dataset.len()
                ),
            });
        }

        Ok(Self {
            dataset,
            indices: sampler.indices(),
            input: PhantomData,
        })
    }
}

impl<D, I> Dataset<I> for EnlargedDataset<D, I>
where
    D: Dataset<I>,
    I: Clone + Send + Sync,
{
    fn get(&self, index: usize) -> Option<I> {
        self.dataset.get(*self.indices.get(index)?)
    }

    fn len(&self) -> usize {
        self.indices.len()
    }
}
