//! Shared weighting and reduction semantics for elementwise losses.

use std::str::FromStr;

use burn::{prelude::*, tensor::backend::Backend};

use crate::error::{OneSrError, OneSrResult};

/// How an elementwise loss tensor is collapsed into the final loss value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reduction {
    /// Keep the elementwise loss unchanged.
    None,
    /// Average over all elements.
    #[default]
    Mean,
    /// Total over all elements.
    Sum,
}

impl FromStr for Reduction {
    type Err = OneSrError;

    fn from_str(value: &str) -> OneSrResult<Self> {
        match value {
            "none" => Ok(Self::None),
            "mean" => Ok(Self::Mean),
            "elementwise_mean" => {
                eprintln!(
                    "Warning: reduction='elementwise_mean' is deprecated, \
                     please use reduction='mean' instead."
                );
                Ok(Self::Mean)
            }
            "sum" => Ok(Self::Sum),
            _ => Err(OneSrError::InvalidReduction {
                reduction: value.to_string(),
            }),
        }
    }
}

/// Outcome of reducing an elementwise loss tensor.
///
/// [`Reduction::None`] keeps the input rank, while `Mean` and `Sum` collapse
/// the loss to a single value; the two shapes stay distinguishable so callers
/// cannot mistake one for the other.
#[derive(Debug, Clone)]
pub enum LossOutput<B: Backend, const D: usize> {
    /// The elementwise loss, kept as is.
    Elementwise(Tensor<B, D>),
    /// The loss collapsed to a single-element tensor.
    Reduced(Tensor<B, 1>),
}

impl<B: Backend, const D: usize> LossOutput<B, D> {
    /// Multiply the loss by a scalar factor, preserving the variant.
    #[must_use]
    pub fn scale(self, factor: f32) -> Self {
        match self {
            Self::Elementwise(loss) => Self::Elementwise(loss * factor),
            Self::Reduced(loss) => Self::Reduced(loss * factor),
        }
    }

    /// The collapsed loss, if a `Mean` or `Sum` reduction was applied.
    pub fn reduced(self) -> Option<Tensor<B, 1>> {
        match self {
            Self::Reduced(loss) => Some(loss),
            Self::Elementwise(_) => None,
        }
    }

    /// The elementwise loss, if no reduction was applied.
    pub fn elementwise(self) -> Option<Tensor<B, D>> {
        match self {
            Self::Elementwise(loss) => Some(loss),
            Self::Reduced(_) => None,
        }
    }
}

/// Reduce an elementwise loss tensor as specified.
pub fn reduce_loss<B: Backend, const D: usize>(
    loss: Tensor<B, D>,
    reduction: Reduction,
) -> LossOutput<B, D> {
    match reduction {
        Reduction::None => LossOutput::Elementwise(loss),
        Reduction::Mean => LossOutput::Reduced(loss.mean()),
        Reduction::Sum => LossOutput::Reduced(loss.sum()),
    }
}

/// Apply an elementwise weight and reduce the loss.
///
/// The weight must have the same rank as the loss (enforced by the type
/// system) and either a single channel, broadcast across the loss channels,
/// or exactly as many channels as the loss. A `Mean` reduction with a weight
/// averages over the weighted region: the weighted sum is divided by the total
/// weight mass instead of the element count, so zero-weighted positions are
/// excluded rather than averaged in at value 0.
pub fn weight_reduce_loss<B: Backend, const D: usize>(
    loss: Tensor<B, D>,
    weight: Option<Tensor<B, D>>,
    reduction: Reduction,
) -> LossOutput<B, D> {
    let Some(weight) = weight else {
        return reduce_loss(loss, reduction);
    };

    let loss_channels = channel_count(loss.dims());
    let weight_channels = channel_count(weight.dims());
    assert!(
        weight_channels == 1 || weight_channels == loss_channels,
        "weight must have a single channel or match the loss channels \
         (weight: {weight_channels}, loss: {loss_channels})"
    );

    let weighted = loss * weight.clone();

    match reduction {
        Reduction::Mean => {
            // A single-channel weight counts once per loss channel it is
            // broadcast over.
            let normalizer = if weight_channels > 1 {
                weight.sum()
            } else {
                weight.sum() * loss_channels as f32
            };
            LossOutput::Reduced(weighted.sum() / normalizer)
        }
        other => reduce_loss(weighted, other),
    }
}

/// Create a weighted version of a pure elementwise loss function.
///
/// `loss_fn` only computes the elementwise loss, without any reduction; the
/// returned function adds `weight` and `reduction` parameters and routes the
/// result through [`weight_reduce_loss`]. Every concrete pixel loss shares
/// this path instead of duplicating the weighting semantics.
pub fn weighted_loss<B, const D: usize, F>(
    loss_fn: F,
) -> impl Fn(Tensor<B, D>, Tensor<B, D>, Option<Tensor<B, D>>, Reduction) -> LossOutput<B, D>
where
    B: Backend,
    F: Fn(Tensor<B, D>, Tensor<B, D>) -> Tensor<B, D>,
{
    move |pred, target, weight, reduction| {
        weight_reduce_loss(loss_fn(pred, target), weight, reduction)
    }
}

/// Size of the channel dimension, with rank < 2 treated as single-channel.
const fn channel_count<const D: usize>(dims: [usize; D]) -> usize {
    if D > 1 {
        dims[1]
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use burn::backend::ndarray::NdArray;
    use burn::tensor::cast::ToElement;

    use super::*;

    type TestBackend = NdArray<f32>;

    fn scalar(output: LossOutput<TestBackend, 1>) -> f32 {
        output.reduced().unwrap().into_scalar().to_f32()
    }

    #[test]
    fn parses_all_supported_reduction_modes() {
        assert_eq!("none".parse::<Reduction>().unwrap(), Reduction::None);
        assert_eq!("mean".parse::<Reduction>().unwrap(), Reduction::Mean);
        assert_eq!("sum".parse::<Reduction>().unwrap(), Reduction::Sum);
    }

    #[test]
    fn deprecated_alias_behaves_like_mean() {
        assert_eq!(
            "elementwise_mean".parse::<Reduction>().unwrap(),
            Reduction::Mean
        );
    }

    #[test]
    fn unknown_reduction_is_an_error() {
        let result = "unknown".parse::<Reduction>();
        assert!(matches!(
            result,
            Err(OneSrError::InvalidReduction { reduction }) if reduction == "unknown"
        ));
    }

    #[test]
    fn reduce_loss_matches_the_documented_values() {
        let device = Default::default();
        let loss = Tensor::<TestBackend, 1>::from_floats([1.0, 2.0, 3.0], &device);

        assert_eq!(scalar(reduce_loss(loss.clone(), Reduction::Sum)), 6.0);
        assert_eq!(scalar(reduce_loss(loss.clone(), Reduction::Mean)), 2.0);

        let unchanged = reduce_loss(loss, Reduction::None).elementwise().unwrap();
        assert_eq!(
            unchanged.into_data().to_vec::<f32>().unwrap(),
            vec![1.0, 2.0, 3.0]
        );
    }

    #[test]
    fn reduce_loss_of_zeros_is_zero() {
        let device = Default::default();
        let loss = Tensor::<TestBackend, 4>::zeros([1, 3, 4, 4], &device);

        let sum = reduce_loss(loss.clone(), Reduction::Sum).reduced().unwrap();
        let mean = reduce_loss(loss, Reduction::Mean).reduced().unwrap();
        assert_eq!(sum.into_scalar().to_f32(), 0.0);
        assert_eq!(mean.into_scalar().to_f32(), 0.0);
    }

    #[test]
    fn weighted_mean_excludes_zero_weighted_elements() {
        let device = Default::default();
        let loss = Tensor::<TestBackend, 1>::from_floats([1.0, 1.0, 2.0], &device);
        let weight = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 1.0], &device);

        // sum(loss * weight) / sum(weight) = 3 / 2
        let output = weight_reduce_loss(loss, Some(weight), Reduction::Mean);
        assert_eq!(scalar(output), 1.5);
    }

    #[test]
    fn single_channel_weight_counts_every_broadcast_channel() {
        let device = Default::default();
        let loss = Tensor::<TestBackend, 4>::ones([1, 2, 2, 2], &device);
        let weight = Tensor::<TestBackend, 4>::ones([1, 1, 2, 2], &device);

        // Broadcast weight mass: 4 * 2 channels = 8, weighted sum = 8.
        let output = weight_reduce_loss(loss, Some(weight), Reduction::Mean);
        let value = output.reduced().unwrap().into_scalar().to_f32();
        assert!((value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn full_channel_weight_uses_its_own_mass() {
        let device = Default::default();
        let loss = Tensor::<TestBackend, 4>::ones([1, 2, 2, 2], &device);
        let weight = Tensor::<TestBackend, 4>::cat(
            vec![
                Tensor::ones([1, 1, 2, 2], &device),
                Tensor::zeros([1, 1, 2, 2], &device),
            ],
            1,
        );

        // Weight mass 4, weighted sum 4: the zeroed channel is excluded.
        let output = weight_reduce_loss(loss, Some(weight), Reduction::Mean);
        let value = output.reduced().unwrap().into_scalar().to_f32();
        assert!((value - 1.0).abs() < 1e-6);
    }

    #[test]
    fn sum_reduction_applies_the_weight_before_totaling() {
        let device = Default::default();
        let loss = Tensor::<TestBackend, 1>::from_floats([1.0, 1.0, 2.0], &device);
        let weight = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 1.0], &device);

        let output = weight_reduce_loss(loss, Some(weight), Reduction::Sum);
        assert_eq!(scalar(output), 3.0);
    }

    #[test]
    #[should_panic(expected = "weight must have a single channel")]
    fn channel_mismatch_is_a_contract_violation() {
        let device = Default::default();
        let loss = Tensor::<TestBackend, 4>::ones([1, 3, 2, 2], &device);
        let weight = Tensor::<TestBackend, 4>::ones([1, 2, 2, 2], &device);

        let _ = weight_reduce_loss(loss, Some(weight), Reduction::Mean);
    }

    #[test]
    fn wrapped_loss_matches_the_documented_example() {
        let device = Default::default();
        let l1 = weighted_loss(|pred: Tensor<TestBackend, 1>, target| (pred - target).abs());

        let pred = Tensor::<TestBackend, 1>::from_floats([0.0, 2.0, 3.0], &device);
        let target = Tensor::<TestBackend, 1>::from_floats([1.0, 1.0, 1.0], &device);
        let weight = Tensor::<TestBackend, 1>::from_floats([1.0, 0.0, 1.0], &device);

        let mean = l1(pred.clone(), target.clone(), None, Reduction::Mean);
        assert!((scalar(mean) - 4.0 / 3.0).abs() < 1e-6);

        let weighted = l1(
            pred.clone(),
            target.clone(),
            Some(weight.clone()),
            Reduction::Mean,
        );
        assert!((scalar(weighted) - 1.5).abs() < 1e-6);

        let unchanged = l1(pred.clone(), target.clone(), None, Reduction::None)
            .elementwise()
            .unwrap();
        assert_eq!(
            unchanged.into_data().to_vec::<f32>().unwrap(),
            vec![1.0, 1.0, 2.0]
        );

        let total = l1(pred, target, Some(weight), Reduction::Sum);
        assert_eq!(scalar(total), 3.0);
    }
}
