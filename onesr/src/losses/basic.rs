//! Basic pixel losses built on the shared weighting and reduction semantics.

use std::marker::PhantomData;

use burn::{module::Ignored, prelude::*, tensor::backend::Backend};

use super::reduction::{weighted_loss, LossOutput, Reduction};
use crate::error::{OneSrError, OneSrResult};

/// Elementwise L1 distance with optional weighting and reduction.
pub fn l1_loss<B: Backend, const D: usize>(
    pred: Tensor<B, D>,
    target: Tensor<B, D>,
    weight: Option<Tensor<B, D>>,
    reduction: Reduction,
) -> LossOutput<B, D> {
    weighted_loss(|pred, target| (pred - target).abs())(pred, target, weight, reduction)
}

/// Elementwise squared distance with optional weighting and reduction.
pub fn mse_loss<B: Backend, const D: usize>(
    pred: Tensor<B, D>,
    target: Tensor<B, D>,
    weight: Option<Tensor<B, D>>,
    reduction: Reduction,
) -> LossOutput<B, D> {
    weighted_loss(|pred, target| (pred - target).powf_scalar(2.0))(pred, target, weight, reduction)
}

/// Elementwise Charbonnier distance, a differentiable variant of L1.
///
/// `sqrt(diff^2 + eps)` stays smooth around zero; `eps` controls how closely
/// it approaches the L1 kink.
pub fn charbonnier_loss<B: Backend, const D: usize>(
    pred: Tensor<B, D>,
    target: Tensor<B, D>,
    weight: Option<Tensor<B, D>>,
    eps: f32,
    reduction: Reduction,
) -> LossOutput<B, D> {
    weighted_loss(move |pred, target| ((pred - target).powf_scalar(2.0) + eps).sqrt())(
        pred, target, weight, reduction,
    )
}

/// Configuration for L1 (mean absolute error) loss.
#[derive(Config, Debug)]
pub struct L1LossConfig {
    #[config(default = 1.0)]
    pub loss_weight: f32,
    #[config(default = "String::from(\"mean\")")]
    pub reduction: String,
}

/// L1 (mean absolute error) loss.
#[derive(Module, Debug)]
pub struct L1Loss<B: Backend> {
    pub loss_weight: f32,
    pub reduction: Ignored<Reduction>,
    _phantom: PhantomData<B>,
}

impl L1LossConfig {
    /// Initialize an L1 loss, validating the reduction mode.
    pub fn init<B: Backend>(&self) -> OneSrResult<L1Loss<B>> {
        Ok(L1Loss {
            loss_weight: self.loss_weight,
            reduction: Ignored(self.reduction.parse()?),
            _phantom: PhantomData,
        })
    }
}

impl<B: Backend> L1Loss<B> {
    /// Calculate the L1 loss between `pred` and `target`.
    pub fn forward(
        &self,
        pred: Tensor<B, 4>,
        target: Tensor<B, 4>,
        weight: Option<Tensor<B, 4>>,
    ) -> LossOutput<B, 4> {
        l1_loss(pred, target, weight, self.reduction.0).scale(self.loss_weight)
    }
}

/// Configuration for MSE (L2) loss.
#[derive(Config, Debug)]
pub struct MseLossConfig {
    #[config(default = 1.0)]
    pub loss_weight: f32,
    #[config(default = "String::from(\"mean\")")]
    pub reduction: String,
}

/// Mean squared error (L2) loss.
#[derive(Module, Debug)]
pub struct MseLoss<B: Backend> {
    pub loss_weight: f32,
    pub reduction: Ignored<Reduction>,
    _phantom: PhantomData<B>,
}

impl MseLossConfig {
    /// Initialize an MSE loss, validating the reduction mode.
    pub fn init<B: Backend>(&self) -> OneSrResult<MseLoss<B>> {
        Ok(MseLoss {
            loss_weight: self.loss_weight,
            reduction: Ignored(self.reduction.parse()?),
            _phantom: PhantomData,
        })
    }
}

impl<B: Backend> MseLoss<B> {
    /// Calculate the MSE loss between `pred` and `target`.
    pub fn forward(
        &self,
        pred: Tensor<B, 4>,
        target: Tensor<B, 4>,
        weight: Option<Tensor<B, 4>>,
    ) -> LossOutput<B, 4> {
        mse_loss(pred, target, weight, self.reduction.0).scale(self.loss_weight)
    }
}

/// Configuration for Charbonnier loss.
#[derive(Config, Debug)]
pub struct CharbonnierLossConfig {
    #[config(default = 1.0)]
    pub loss_weight: f32,
    #[config(default = "String::from(\"mean\")")]
    pub reduction: String,
    #[config(default = 1e-12)]
    pub eps: f32,
}

/// Charbonnier loss, a differentiable variant of L1.
#[derive(Module, Debug)]
pub struct CharbonnierLoss<B: Backend> {
    pub loss_weight: f32,
    pub reduction: Ignored<Reduction>,
    pub eps: f32,
    _phantom: PhantomData<B>,
}

impl CharbonnierLossConfig {
    /// Initialize a Charbonnier loss, validating the reduction mode.
    pub fn init<B: Backend>(&self) -> OneSrResult<CharbonnierLoss<B>> {
        Ok(CharbonnierLoss {
            loss_weight: self.loss_weight,
            reduction: Ignored(self.reduction.parse()?),
            eps: self.eps,
            _phantom: PhantomData,
        })
    }
}

impl<B: Backend> CharbonnierLoss<B> {
    /// Calculate the Charbonnier loss between `pred` and `target`.
    pub fn forward(
        &self,
        pred: Tensor<B, 4>,
        target: Tensor<B, 4>,
        weight: Option<Tensor<B, 4>>,
    ) -> LossOutput<B, 4> {
        charbonnier_loss(pred, target, weight, self.eps, self.reduction.0)
            .scale(self.loss_weight)
    }
}

/// Configuration for weighted total-variation loss.
#[derive(Config, Debug)]
pub struct WeightedTvLossConfig {
    #[config(default = 1.0)]
    pub loss_weight: f32,
    #[config(default = "String::from(\"mean\")")]
    pub reduction: String,
}

/// Weighted total-variation loss over adjacent-pixel differences.
///
/// Both spatial directions are measured with the L1 path, the weight cropped
/// to line up with each difference map. Only `mean` and `sum` reductions make
/// sense for a total; `none` is rejected at construction.
#[derive(Module, Debug)]
pub struct WeightedTvLoss<B: Backend> {
    pub loss_weight: f32,
    pub reduction: Ignored<Reduction>,
    _phantom: PhantomData<B>,
}

impl WeightedTvLossConfig {
    /// Initialize a TV loss, rejecting `none` and invalid reduction modes.
    pub fn init<B: Backend>(&self) -> OneSrResult<WeightedTvLoss<B>> {
        let reduction: Reduction = self.reduction.parse()?;
        if reduction == Reduction::None {
            return Err(OneSrError::InvalidReduction {
                reduction: self.reduction.clone(),
            });
        }

        Ok(WeightedTvLoss {
            loss_weight: self.loss_weight,
            reduction: Ignored(reduction),
            _phantom: PhantomData,
        })
    }
}

impl<B: Backend> WeightedTvLoss<B> {
    /// Calculate the total-variation loss of `pred`.
    pub fn forward(&self, pred: Tensor<B, 4>, weight: Option<Tensor<B, 4>>) -> Tensor<B, 1> {
        let y_weight = weight.clone().map(|w| w.slice(s![.., .., 0..-1, ..]));
        let x_weight = weight.map(|w| w.slice(s![.., .., .., 0..-1]));

        let y_diff = l1_loss(
            pred.clone().slice(s![.., .., 0..-1, ..]),
            pred.clone().slice(s![.., .., 1.., ..]),
            y_weight,
            self.reduction.0,
        );
        let x_diff = l1_loss(
            pred.clone().slice(s![.., .., .., 0..-1]),
            pred.slice(s![.., .., .., 1..]),
            x_weight,
            self.reduction.0,
        );

        let (LossOutput::Reduced(y_diff), LossOutput::Reduced(x_diff)) = (y_diff, x_diff) else {
            unreachable!("`none` reduction is rejected when the loss is constructed");
        };

        (x_diff + y_diff) * self.loss_weight
    }
}
