use ndarray::{Array1, ArrayView1, ArrayView2};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

use super::Float;
use crate::datafits::Datafit;
use crate::penalties::Penalty;


/// The order in which coordinates are visited during an epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FeatureSelection {
    /// Cycle through the features `0..n_features` at every epoch.
    #[default]
    Sequential,
    /// Visit every feature once per epoch, in a fresh random permutation drawn
    /// from a generator seeded with the given value.
    Random(u64),
}

/// Stopping parameters of [`coordinate_descent`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DescentConfig<F> {
    pub max_iterations: usize,
    pub tolerance: F,
    pub selection: FeatureSelection,
}

/// The state of the descent when it stops.
#[derive(Debug, Clone, PartialEq)]
pub struct DescentState<F> {
    /// Coefficients after the last completed epoch.
    pub w: Array1<F>,
    /// Number of completed epochs.
    pub n_iterations: usize,
    /// Largest absolute coefficient change during the last epoch.
    pub max_change: F,
    /// Whether `max_change` went below the tolerance.
    pub converged: bool,
}

/// Yields the coordinates to update during one epoch.
enum Traversal {
    Sequential,
    Random(SmallRng),
}

impl Traversal {
    fn new(selection: FeatureSelection) -> Self {
        match selection {
            FeatureSelection::Sequential => Traversal::Sequential,
            FeatureSelection::Random(seed) => Traversal::Random(SmallRng::seed_from_u64(seed)),
        }
    }

    fn epoch(&mut self, n_features: usize) -> Vec<usize> {
        let mut ws: Vec<usize> = (0..n_features).collect();
        if let Traversal::Random(rng) = self {
            ws.shuffle(rng);
        }
        ws
    }
}

/// This function performs one epoch of coordinate descent over the features
/// listed in `ws`. For every feature, the correlation with the partial residual
/// is soft-thresholded by the penalty and rescaled by the curvature of the
/// datafit; the residual is then updated in place.
///
/// Features with a null curvature are left out of the model fit.
///
/// It returns the largest absolute change of a coefficient.
pub fn cd_epoch<F, DF, P>(
    X: ArrayView2<F>,
    datafit: &DF,
    penalty: &P,
    w: &mut Array1<F>,
    residual: &mut Array1<F>,
    ws: &[usize],
) -> F
where
    F: 'static + Float,
    DF: Datafit<F>,
    P: Penalty<F>,
{
    let lipschitz = datafit.step_size();
    let mut max_change = F::zero();

    for &j in ws {
        let old_w_j = w[j];
        let new_w_j = if lipschitz[j] == F::zero() {
            F::zero()
        } else {
            let rho_j = datafit.partial_correlation(X, residual.view(), old_w_j, j);
            penalty.prox(rho_j, F::one()) / lipschitz[j]
        };

        let diff = new_w_j - old_w_j;
        if diff != F::zero() {
            w[j] = new_w_j;
            residual.scaled_add(-diff, &X.column(j));
            max_change = max_change.max(diff.abs());
        }
    }

    max_change
}

/// This is the backbone function of the crate. It implements the coordinate
/// descent routine for the Lasso on centered data.
///
/// Starting from `w_init`, the routine runs epochs of [`cd_epoch`] in the
/// order given by the [`FeatureSelection`] policy. After each epoch, the
/// largest coefficient change is compared to the tolerance; the descent stops
/// as soon as it falls below it, or when `max_iterations` epochs have been
/// carried out.
///
/// Coefficients of features with a null curvature (constant columns once
/// centered) are set to zero before the first epoch, so that the policy used
/// to visit the features has no effect on them.
pub fn coordinate_descent<F, DF, P>(
    X: ArrayView2<F>,
    y: ArrayView1<F>,
    datafit: &mut DF,
    penalty: &P,
    w_init: Array1<F>,
    config: &DescentConfig<F>,
) -> DescentState<F>
where
    F: 'static + Float,
    DF: Datafit<F>,
    P: Penalty<F>,
{
    let n_features = X.ncols();

    datafit.initialize(X);

    let mut w = w_init;
    for (w_j, &lc) in w.iter_mut().zip(datafit.step_size()) {
        if lc == F::zero() {
            *w_j = F::zero();
        }
    }
    let mut residual = &y - &X.dot(&w);

    let mut traversal = Traversal::new(config.selection);
    let mut max_change = F::infinity();
    let mut n_iterations = 0;

    while n_iterations < config.max_iterations {
        let ws = traversal.epoch(n_features);
        max_change = cd_epoch(X, &*datafit, penalty, &mut w, &mut residual, &ws);
        n_iterations += 1;

        log::debug!(
            "epoch: {} :: obj: {} :: max change: {}",
            n_iterations,
            datafit.value(residual.view()) + penalty.value(w.view()),
            max_change
        );

        if max_change < config.tolerance {
            return DescentState {
                w,
                n_iterations,
                max_change,
                converged: true,
            };
        }
    }

    log::warn!(
        "coordinate descent did not converge after {} epochs (max change {} >= tolerance {})",
        n_iterations,
        max_change,
        config.tolerance
    );

    DescentState {
        w,
        n_iterations,
        max_change,
        converged: false,
    }
}
