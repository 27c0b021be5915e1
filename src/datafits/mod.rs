use ndarray::{Array1, ArrayView1, ArrayView2, Axis};

use super::Float;


/// This trait provides the quantities the coordinate descent routine needs
/// from the data term of the objective. All methods work on centered data and
/// on the residual `y - Xw`, which the solver keeps up to date.
pub trait Datafit<F: Float> {
    /// This method is called before looping onto the features, to precompute
    /// the per-feature curvature (used as inverse step sizes).
    fn initialize(&mut self, X: ArrayView2<F>);

    /// This method is called when evaluating the objective value.
    ///
    /// It is jointly used with [`crate::penalties::Penalty::value`] in order
    /// to compute the value of the objective.
    fn value(&self, residual: ArrayView1<F>) -> F;

    /// This method computes the correlation of feature `j` with the residual
    /// obtained when the contribution of `w_j` is left out of the model fit.
    fn partial_correlation(&self, X: ArrayView2<F>, residual: ArrayView1<F>, w_j: F, j: usize) -> F;

    /// This method returns the curvature of the datafit along each coordinate.
    /// A null entry marks a feature that carries no information.
    fn step_size(&self) -> ArrayView1<F>;
}

/// Quadratic datafit
///
/// The squared-norm residuals datafit `1 / (2 * n_samples) * ||y - Xw||^2_2`.
/// Along coordinate `j` its curvature is the mean square of column `j`, which
/// equals one for standardized features.
#[derive(Debug, Clone, PartialEq)]
pub struct Quadratic<F: Float> {
    lipschitz: Array1<F>,
}

impl<F: Float> Default for Quadratic<F> {
    fn default() -> Self {
        Self::new()
    }
}

impl<F: Float> Quadratic<F> {
    pub fn new() -> Self {
        Quadratic {
            lipschitz: Array1::<F>::zeros(0),
        }
    }
}

impl<F: 'static + Float> Datafit<F> for Quadratic<F> {
    /// This method pre-computes the Lipschitz constants of the datafit along
    /// every coordinate.
    fn initialize(&mut self, X: ArrayView2<F>) {
        let n_samples = F::cast(X.len_of(Axis(0)));
        self.lipschitz = X.map_axis(Axis(0), |Xj| Xj.dot(&Xj) / n_samples);
    }

    /// This method computes the value of the datafit given the residual.
    fn value(&self, residual: ArrayView1<F>) -> F {
        let n_samples = residual.len();
        residual.dot(&residual) / F::cast(2 * n_samples)
    }

    fn partial_correlation(&self, X: ArrayView2<F>, residual: ArrayView1<F>, w_j: F, j: usize) -> F {
        let n_samples = F::cast(residual.len());
        X.column(j).dot(&residual) / n_samples + self.lipschitz[j] * w_j
    }

    fn step_size(&self) -> ArrayView1<F> {
        self.lipschitz.view()
    }
}
