use ndarray::Array1;

use super::error::{EstimatorError, Result};
use super::param_guard::ParamGuard;
use crate::cd::FeatureSelection;
use crate::penalties::ThresholdRule;
use crate::Float;

/// A verified hyperparameter set ready for the fitting of a Lasso regression model
#[derive(Debug, Clone, PartialEq)]
pub struct LassoValidParams<F> {
    alpha: F,
    max_iterations: usize,
    tolerance: F,
    selection: FeatureSelection,
    threshold_rule: ThresholdRule,
    fit_intercept: bool,
    warm_start: Option<Array1<F>>,
}

impl<F: Float> LassoValidParams<F> {
    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn max_iterations(&self) -> usize {
        self.max_iterations
    }

    pub fn tolerance(&self) -> F {
        self.tolerance
    }

    pub fn selection(&self) -> FeatureSelection {
        self.selection
    }

    pub fn threshold_rule(&self) -> ThresholdRule {
        self.threshold_rule
    }

    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }

    pub fn warm_start(&self) -> Option<&Array1<F>> {
        self.warm_start.as_ref()
    }
}

/// A hyper-parameter set during construction
///
/// Configures and minimizes the following objective function:
/// ```ignore
/// 1 / (2 * n_samples) * ||y - Xw - intercept||^2_2
///     + threshold(alpha) * ||w||_1
/// ```
///
/// where `threshold(alpha)` is `alpha / 2` under [`ThresholdRule::HalfLambda`]
/// (the default) and `alpha` under [`ThresholdRule::Lambda`].
#[derive(Debug, Clone, PartialEq)]
pub struct LassoParams<F>(LassoValidParams<F>);

impl<F: Float> Default for LassoParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit a Lasso model
impl<F: Float> LassoParams<F> {
    /// Create default Lasso hyper parameters
    pub fn new() -> LassoParams<F> {
        Self(LassoValidParams {
            alpha: F::one(),
            max_iterations: 1000,
            tolerance: F::cast(1e-4),
            selection: FeatureSelection::Sequential,
            threshold_rule: ThresholdRule::HalfLambda,
            fit_intercept: true,
            warm_start: None,
        })
    }

    /// Set the regularization hyperparameter. A higher value yields sparser
    /// solutions; `0` yields the ordinary least squares solution.
    /// Defaults to `1` if not set.
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Set the maximum number of passes over the features.
    ///
    /// Defaults to `1000` if not set.
    pub fn max_iterations(mut self, max_iterations: usize) -> Self {
        self.0.max_iterations = max_iterations;
        self
    }

    /// Set the stopping criterion for the optimization routine: the largest
    /// coefficient change during a full pass.
    ///
    /// Defaults to `1e-4` if not set.
    pub fn tolerance(mut self, tolerance: F) -> Self {
        self.0.tolerance = tolerance;
        self
    }

    /// Set the order in which features are visited.
    ///
    /// Defaults to [`FeatureSelection::Sequential`] if not set.
    pub fn selection(mut self, selection: FeatureSelection) -> Self {
        self.0.selection = selection;
        self
    }

    /// Set where the soft-thresholding window sits relative to `alpha`.
    ///
    /// Defaults to [`ThresholdRule::HalfLambda`] if not set.
    pub fn threshold_rule(mut self, threshold_rule: ThresholdRule) -> Self {
        self.0.threshold_rule = threshold_rule;
        self
    }

    /// Whether to fit an intercept. When disabled, the data are not centered
    /// and the intercept is zero.
    ///
    /// Defaults to `true` if not set.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.0.fit_intercept = fit_intercept;
        self
    }

    /// Start the descent from the given coefficients instead of zero.
    pub fn warm_start(mut self, coefficients: Array1<F>) -> Self {
        self.0.warm_start = Some(coefficients);
        self
    }
}

impl<F: Float> ParamGuard for LassoParams<F> {
    type Checked = LassoValidParams<F>;
    type Error = EstimatorError;

    /// Validate the hyper parameters
    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.alpha < F::zero() || !self.0.alpha.is_finite() {
            Err(EstimatorError::InvalidRegularization(
                self.0.alpha.to_f32_lossy(),
            ))
        } else if !(self.0.tolerance > F::zero()) || !self.0.tolerance.is_finite() {
            Err(EstimatorError::InvalidTolerance(
                self.0.tolerance.to_f32_lossy(),
            ))
        } else if self.0.max_iterations == 0 {
            Err(EstimatorError::InvalidMaxIterations(self.0.max_iterations))
        } else if self
            .0
            .warm_start
            .as_ref()
            .map_or(false, |w| w.iter().any(|wj| !wj.is_finite()))
        {
            Err(EstimatorError::NonFinite("warm start"))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}

/// A verified hyperparameter set ready for the fitting of a Ridge regression model
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeValidParams<F> {
    alpha: F,
    fit_intercept: bool,
}

impl<F: Float> RidgeValidParams<F> {
    pub fn alpha(&self) -> F {
        self.alpha
    }

    pub fn fit_intercept(&self) -> bool {
        self.fit_intercept
    }
}

/// A hyper-parameter set during construction
///
/// Configures and minimizes the following objective function:
/// ```ignore
/// 1 / (2 * n_samples) * ||y - Xw - intercept||^2_2
///     + alpha / 2 * ||w||^2_2
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct RidgeParams<F>(RidgeValidParams<F>);

impl<F: Float> Default for RidgeParams<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Configure and fit a Ridge model
impl<F: Float> RidgeParams<F> {
    /// Create default Ridge hyper parameters
    pub fn new() -> RidgeParams<F> {
        Self(RidgeValidParams {
            alpha: F::one(),
            fit_intercept: true,
        })
    }

    /// Set the regularization hyperparameter.
    /// Defaults to `1` if not set.
    pub fn alpha(mut self, alpha: F) -> Self {
        self.0.alpha = alpha;
        self
    }

    /// Defaults to `true` if not set.
    pub fn fit_intercept(mut self, fit_intercept: bool) -> Self {
        self.0.fit_intercept = fit_intercept;
        self
    }
}

impl<F: Float> ParamGuard for RidgeParams<F> {
    type Checked = RidgeValidParams<F>;
    type Error = EstimatorError;

    fn check_ref(&self) -> Result<&Self::Checked> {
        if self.0.alpha < F::zero() || !self.0.alpha.is_finite() {
            Err(EstimatorError::InvalidRegularization(
                self.0.alpha.to_f32_lossy(),
            ))
        } else {
            Ok(&self.0)
        }
    }

    fn check(self) -> Result<Self::Checked> {
        self.check_ref()?;
        Ok(self.0)
    }
}
