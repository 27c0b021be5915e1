use ndarray::ArrayView1;

use super::Float;
use crate::helpers::prox::soft_thresholding;


/// This trait provides the two methods needed to update the weights during the
/// optimization routine.
pub trait Penalty<F: Float> {
    /// This method is called when evaluating the objective value.
    ///
    /// It is jointly used with [`crate::datafits::Datafit::value`] in order to
    /// compute the value of the objective.
    fn value(&self, w: ArrayView1<F>) -> F;

    /// This method computes the proximal step during the update of the
    /// weights. For a given penalty, it implements its proximal operator.
    fn prox(&self, value: F, step_size: F) -> F;
}

/// Where the soft-thresholding window of the Lasso update sits relative to
/// the regularization strength `lambda`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ThresholdRule {
    /// Threshold the partial correlation at `lambda / 2`. This minimizes
    /// `1 / (2 * n_samples) * ||y - Xw||^2_2 + lambda / 2 * ||w||_1`.
    #[default]
    HalfLambda,
    /// Threshold the partial correlation at `lambda`, the usual Lasso
    /// operator minimizing `1 / (2 * n_samples) * ||y - Xw||^2_2 + lambda * ||w||_1`.
    Lambda,
}

impl ThresholdRule {
    /// Returns the L1 weight actually applied for a regularization strength.
    pub fn threshold<F: Float>(&self, lambda: F) -> F {
        match self {
            ThresholdRule::HalfLambda => lambda / F::cast(2.),
            ThresholdRule::Lambda => lambda,
        }
    }

    /// Inverse of [`ThresholdRule::threshold`].
    pub fn penalty_for_threshold<F: Float>(&self, threshold: F) -> F {
        match self {
            ThresholdRule::HalfLambda => threshold * F::cast(2.),
            ThresholdRule::Lambda => threshold,
        }
    }
}

/// The L1 penalty
///
/// A widely-used penalty made popular by the LASSO model. It is used in a
/// regression setting and yields sparse solutions. Note that LASSO yields a
/// biased solution compared to the ordinary least square solution.
#[derive(Debug, Clone, PartialEq)]
pub struct L1<F: Float> {
    alpha: F,
}

impl<F: Float> L1<F> {
    /// Instantiates a L1 penalty with a positive regularization hyperparameter.
    pub fn new(alpha: F) -> Self {
        L1 { alpha }
    }

    /// Builds the L1 penalty matching a regularization strength under the
    /// given threshold rule.
    pub fn from_rule(lambda: F, rule: ThresholdRule) -> Self {
        L1::new(rule.threshold(lambda))
    }

    pub fn alpha(&self) -> F {
        self.alpha
    }
}

impl<F: Float> Penalty<F> for L1<F> {
    /// Computes the L1-norm of the weights
    fn value(&self, w: ArrayView1<F>) -> F {
        self.alpha * w.mapv(|wj| wj.abs()).sum()
    }

    /// Applies the soft-thresholding operator to a weight scalar
    fn prox(&self, value: F, stepsize: F) -> F {
        soft_thresholding(value, self.alpha * stepsize)
    }
}
