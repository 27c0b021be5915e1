use ndarray::{Array1, Array2, ArrayBase, ArrayView1, Data, Ix1, Ix2};

use super::error::{EstimatorError, Result};
use super::hyperparams::{LassoParams, LassoValidParams, RidgeParams, RidgeValidParams};
use super::traits::{Fit, Predict};

use crate::cd::{coordinate_descent, DescentConfig};
use crate::datafits::Quadratic;
use crate::datasets::DatasetBase;
use crate::helpers::helpers::{center_data, r2_score, solve_lin_sys};
use crate::penalties::L1;
use crate::Float;

/// The Lasso estimator
///
/// The Lasso estimator solves a regularized least-square regression problem.
/// The L1-regularization used yields sparse solutions.
///
/// Besides the coefficients and the intercept, the estimator keeps the
/// diagnostics of the coordinate descent that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Lasso<F> {
    coefficients: Array1<F>,
    intercept: F,
    n_iterations: usize,
    max_change: F,
    converged: bool,
}

impl<F: Float> Lasso<F> {
    /// This method instantiates a Lasso estimator with default parameters
    /// for the coordinate descent solver.
    pub fn params() -> LassoParams<F> {
        LassoParams::new()
    }

    /// This method is a getter for the coefficients vector.
    pub fn coefficients(&self) -> ArrayView1<F> {
        self.coefficients.view()
    }

    pub fn intercept(&self) -> F {
        self.intercept
    }

    /// Number of full passes over the features carried out by the solver.
    pub fn n_iterations(&self) -> usize {
        self.n_iterations
    }

    /// Largest absolute coefficient change observed during the last pass.
    pub fn max_change(&self) -> F {
        self.max_change
    }

    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Returns [`EstimatorError::DidNotConverge`] if the solver stopped on its
    /// iteration cap. The coefficients remain usable; the caller decides
    /// whether to refit with more iterations or a looser tolerance.
    pub fn check_convergence(&self) -> Result<()> {
        if self.converged {
            Ok(())
        } else {
            Err(EstimatorError::DidNotConverge {
                n_iterations: self.n_iterations,
                max_change: self.max_change.to_f32_lossy(),
            })
        }
    }

    /// Number of coefficients that are exactly zero.
    pub fn n_zeros(&self) -> usize {
        self.coefficients.iter().filter(|&&w| w == F::zero()).count()
    }

    /// Coefficient of determination of the predictions on a dataset.
    pub fn score<D: Data<Elem = F>, D2: Data<Elem = F>>(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>>,
    ) -> F
    where
        F: 'static,
    {
        let y_pred = self.predict(dataset.design_matrix());
        r2_score(dataset.targets().view(), y_pred.view())
    }
}

/// This implements the coordinate descent optimization procedure for dense
/// design matrices.
impl<F: 'static + Float, D: Data<Elem = F>, D2: Data<Elem = F>>
    Fit<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>, EstimatorError> for LassoValidParams<F>
{
    /// If successful, the output of the coordinate descent solver is an instance
    /// of [`Lasso`] containing the fitted coefficients.
    type Object = Lasso<F>;

    /// This method fits a [`Lasso`] instance to a dataset with a dense design
    /// matrix.
    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>>) -> Result<Self::Object> {
        dataset.check()?;
        let n_features = dataset.n_features();

        let w_init = match self.warm_start() {
            Some(w) if w.len() != n_features => {
                return Err(EstimatorError::WarmStartMismatch {
                    got: w.len(),
                    expected: n_features,
                })
            }
            Some(w) => w.clone(),
            None => Array1::<F>::zeros(n_features),
        };

        let data = center_data(
            dataset.design_matrix(),
            dataset.targets(),
            self.fit_intercept(),
        )?;

        let mut datafit = Quadratic::new();
        let penalty = L1::from_rule(self.alpha(), self.threshold_rule());
        let config = DescentConfig {
            max_iterations: self.max_iterations(),
            tolerance: self.tolerance(),
            selection: self.selection(),
        };

        let state = coordinate_descent(
            data.x.view(),
            data.y.view(),
            &mut datafit,
            &penalty,
            w_init,
            &config,
        );

        let intercept = if self.fit_intercept() {
            data.y_mean - data.x_mean.dot(&state.w)
        } else {
            F::zero()
        };

        Ok(Lasso {
            coefficients: state.w,
            intercept,
            n_iterations: state.n_iterations,
            max_change: state.max_change,
            converged: state.converged,
        })
    }
}

impl<F: 'static + Float, D: Data<Elem = F>> Predict<&ArrayBase<D, Ix2>, Array1<F>> for Lasso<F> {
    /// Given an input matrix `X`, with shape `(n_samples, n_features)`,
    /// `predict` returns `X w + intercept`. `X` must have as many columns as
    /// the design matrix the model was fitted on.
    fn predict(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        debug_assert_eq!(
            x.ncols(),
            self.coefficients.len(),
            "predict: input has {} features, model was fitted on {}",
            x.ncols(),
            self.coefficients.len()
        );
        x.dot(&self.coefficients) + self.intercept
    }
}

/// The Ridge estimator
///
/// The Ridge estimator solves a L2-regularized least-square regression
/// problem in closed form. It shrinks the coefficients without zeroing them
/// and serves as the dense counterpart of the [`Lasso`].
#[derive(Debug, Clone, PartialEq)]
pub struct Ridge<F> {
    coefficients: Array1<F>,
    intercept: F,
}

impl<F: Float> Ridge<F> {
    /// This method instantiates a Ridge estimator with default parameters.
    pub fn params() -> RidgeParams<F> {
        RidgeParams::new()
    }

    /// This method is a getter for the coefficients vector.
    pub fn coefficients(&self) -> ArrayView1<F> {
        self.coefficients.view()
    }

    pub fn intercept(&self) -> F {
        self.intercept
    }

    /// Coefficient of determination of the predictions on a dataset.
    pub fn score<D: Data<Elem = F>, D2: Data<Elem = F>>(
        &self,
        dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>>,
    ) -> F
    where
        F: 'static,
    {
        let y_pred = self.predict(dataset.design_matrix());
        r2_score(dataset.targets().view(), y_pred.view())
    }
}

/// This solves the regularized normal equations
/// `(X^T X / n_samples + alpha * I) w = X^T y / n_samples` on centered data.
impl<F: 'static + Float, D: Data<Elem = F>, D2: Data<Elem = F>>
    Fit<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>, EstimatorError> for RidgeValidParams<F>
{
    type Object = Ridge<F>;

    fn fit(&self, dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>>) -> Result<Self::Object> {
        dataset.check()?;
        let data = center_data(
            dataset.design_matrix(),
            dataset.targets(),
            self.fit_intercept(),
        )?;

        let n_samples = F::cast(dataset.n_samples());
        let n_features = dataset.n_features();

        let mut gram: Array2<F> = data.x.t().dot(&data.x) / n_samples;
        gram.diag_mut().mapv_inplace(|g| g + self.alpha());
        let xty = data.x.t().dot(&data.y) / n_samples;

        // Constant columns were zeroed by the centering: pin their
        // coefficients to zero instead of leaving a null row in the system.
        for j in 0..n_features {
            if gram[[j, j]] == F::zero() {
                gram[[j, j]] = F::one();
            }
        }

        let coefficients = solve_lin_sys(gram.view(), xty.view())?;
        let intercept = if self.fit_intercept() {
            data.y_mean - data.x_mean.dot(&coefficients)
        } else {
            F::zero()
        };

        Ok(Ridge {
            coefficients,
            intercept,
        })
    }
}

impl<F: 'static + Float, D: Data<Elem = F>> Predict<&ArrayBase<D, Ix2>, Array1<F>> for Ridge<F> {
    fn predict(&self, x: &ArrayBase<D, Ix2>) -> Array1<F> {
        debug_assert_eq!(
            x.ncols(),
            self.coefficients.len(),
            "predict: input has {} features, model was fitted on {}",
            x.ncols(),
            self.coefficients.len()
        );
        x.dot(&self.coefficients) + self.intercept
    }
}

/// This function fits a [`Lasso`] for every regularization strength in
/// `alphas`, in the given order. Every fit but the first is warm-started from
/// the coefficients of the previous one, which makes decreasing sequences of
/// `alphas` cheap to compute.
///
/// The remaining hyperparameters (tolerance, selection policy, ...) are taken
/// from `params`; its own alpha and warm start are ignored.
pub fn lasso_path<F, D, D2>(
    dataset: &DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>>,
    alphas: &[F],
    params: &LassoParams<F>,
) -> Result<Vec<Lasso<F>>>
where
    F: 'static + Float,
    D: Data<Elem = F>,
    D2: Data<Elem = F>,
{
    let mut path: Vec<Lasso<F>> = Vec::with_capacity(alphas.len());
    let mut w = Array1::<F>::zeros(dataset.n_features());

    for &alpha in alphas {
        let model = params.clone().alpha(alpha).warm_start(w).fit(dataset)?;
        log::debug!(
            "alpha: {} :: {} zeros :: {} iterations",
            alpha,
            model.n_zeros(),
            model.n_iterations()
        );
        w = model.coefficients.clone();
        path.push(model);
    }

    Ok(path)
}
