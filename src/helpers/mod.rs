
/// This module implements the proximal operator of the L1 penalty.
pub mod prox {
    use crate::Float;

    /// The soft-thresholding operator is the proximal operator used by
    /// [`crate::penalties::L1`].
    pub fn soft_thresholding<F: Float>(x: F, threshold: F) -> F {
        if x > threshold {
            x - threshold
        } else if x < -threshold {
            x + threshold
        } else {
            F::zero()
        }
    }
}

/// This module contains the numerical helpers shared by the estimators:
/// centering of the data, the maximum regularization strength, a small linear
/// solver and the coefficient of determination.
pub mod helpers {
    use crate::estimators::error::{EstimatorError, Result};
    use crate::penalties::ThresholdRule;
    use crate::Float;
    use ndarray::{Array1, Array2, ArrayBase, ArrayView1, ArrayView2, Axis, Data, Ix1, Ix2};
    use ndarray_stats::QuantileExt;

    /// The centered copy of a dataset, along with the means that were removed.
    #[derive(Debug, Clone, PartialEq)]
    pub struct CenteredData<F> {
        pub x: Array2<F>,
        pub y: Array1<F>,
        pub x_mean: Array1<F>,
        pub y_mean: F,
    }

    /// Returns `true` when every entry of the column equals the first one.
    pub fn is_constant<F: Float>(column: ArrayView1<F>) -> bool {
        match column.first() {
            Some(&first) => column.iter().all(|&v| v == first),
            None => true,
        }
    }

    /// This function copies the design matrix and the targets and, when
    /// `fit_intercept` is set, removes the column means and the target mean.
    ///
    /// Constant columns are written as exact zeros in both cases, so that the
    /// solver sees a feature with no variance whatever rounding the mean
    /// computation introduced.
    pub fn center_data<F, D, D2>(
        x: &ArrayBase<D, Ix2>,
        y: &ArrayBase<D2, Ix1>,
        fit_intercept: bool,
    ) -> Result<CenteredData<F>>
    where
        F: 'static + Float,
        D: Data<Elem = F>,
        D2: Data<Elem = F>,
    {
        let n_features = x.len_of(Axis(1));
        let (x_mean, y_mean) = if fit_intercept {
            let x_mean = x.mean_axis(Axis(0)).ok_or(EstimatorError::EmptyDataset)?;
            let y_mean = y.mean().ok_or(EstimatorError::EmptyDataset)?;
            (x_mean, y_mean)
        } else {
            (Array1::<F>::zeros(n_features), F::zero())
        };

        let mut x_centered = x.to_owned();
        for (j, mut column) in x_centered.columns_mut().into_iter().enumerate() {
            if is_constant(column.view()) {
                column.fill(F::zero());
            } else if fit_intercept {
                let mean_j = x_mean[j];
                column.mapv_inplace(|v| v - mean_j);
            }
        }
        let y_centered = y.mapv(|v| v - y_mean);

        Ok(CenteredData {
            x: x_centered,
            y: y_centered,
            x_mean,
            y_mean,
        })
    }

    /// This function computes the smallest regularization strength for which
    /// the Lasso solution is the null vector. Inputs are expected to be
    /// centered; a larger value yields a null solution after a single pass.
    pub fn compute_lambda_max<F: 'static + Float>(
        X: ArrayView2<F>,
        y: ArrayView1<F>,
        rule: ThresholdRule,
    ) -> F {
        let n_samples = F::cast(X.shape()[0]);
        let Xty = X.t().dot(&y).mapv(|v| v.abs() / n_samples);
        let rho_max = Xty.max().map(|&m| m).unwrap_or_else(|_| F::zero());
        rule.penalty_for_threshold(rho_max)
    }

    /// This function solves a linear system using Gaussian elimination with
    /// partial pivoting. It is used by [`crate::estimators::Ridge`] to solve the
    /// regularized normal equations. We made the choice not to use a LAPACK
    /// subroutine since it introduces a system dependency for a system that
    /// rarely exceeds a few hundred unknowns.
    pub fn solve_lin_sys<F: 'static + Float>(A: ArrayView2<F>, b: ArrayView1<F>) -> Result<Array1<F>> {
        let size = b.len();
        let mut system = Array2::<F>::zeros((size, size + 1));
        for i in 0..size {
            for j in 0..size {
                system[[i, j]] = A[[i, j]];
            }
            system[[i, size]] = b[i];
        }

        // Echelon form
        for i in 0..size {
            let pivot = (i..size)
                .max_by(|&a, &b| {
                    system[[a, i]]
                        .abs()
                        .partial_cmp(&system[[b, i]].abs())
                        .unwrap_or(std::cmp::Ordering::Equal)
                })
                .unwrap_or(i);
            if system[[pivot, i]].abs() <= F::epsilon() {
                return Err(EstimatorError::SingularSystem);
            }
            if pivot != i {
                for k in 0..size + 1 {
                    system.swap([i, k], [pivot, k]);
                }
            }
            for j in i + 1..size {
                let factor = system[[j, i]] / system[[i, i]];
                if factor != F::zero() {
                    for k in i..size + 1 {
                        let s_ik = system[[i, k]];
                        system[[j, k]] -= factor * s_ik;
                    }
                }
            }
        }

        // Back substitution
        let mut x = Array1::<F>::zeros(size);
        for i in (0..size).rev() {
            let mut acc = system[[i, size]];
            for k in i + 1..size {
                acc -= system[[i, k]] * x[k];
            }
            x[i] = acc / system[[i, i]];
        }

        Ok(x)
    }

    /// This function computes the coefficient of determination
    /// `1 - SS_res / SS_tot`. Constant targets score `1` when predicted
    /// exactly and `0` otherwise.
    pub fn r2_score<F: 'static + Float>(y_true: ArrayView1<F>, y_pred: ArrayView1<F>) -> F {
        let y_mean = y_true.mean().unwrap_or_else(F::zero);
        let ss_res: F = y_true
            .iter()
            .zip(y_pred.iter())
            .map(|(&t, &p)| (t - p) * (t - p))
            .sum();
        let ss_tot: F = y_true.iter().map(|&t| (t - y_mean) * (t - y_mean)).sum();

        if ss_tot == F::zero() {
            if ss_res == F::zero() {
                F::one()
            } else {
                F::zero()
            }
        } else {
            F::one() - ss_res / ss_tot
        }
    }
}

/// This module contains helpers functions to efficiently write tests and
/// benchmarks.
pub mod test_helpers {
    use crate::Float;
    use approx::AbsDiffEq;
    use ndarray::prelude::*;
    use ndarray::{Array1, Array2, ArrayView1, Axis};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rand_distr::{Distribution, Normal};

    pub fn assert_array_all_close<F>(x: ArrayView1<F>, y: ArrayView1<F>, delta: F)
    where
        F: Float + AbsDiffEq<Epsilon = F>,
    {
        assert_eq!(x.len(), y.len());
        for i in 0..x.len() {
            if x[i].abs_diff_ne(&y[i], delta) {
                panic!("x: {}, y: {} ; with precision level {}", x[i], y[i], delta);
            }
        }
    }

    pub fn fill_random_vector(capacity: usize, seed: u64) -> Vec<f64> {
        let mut r = StdRng::seed_from_u64(seed);
        let normal = Normal::new(0., 1.).unwrap();

        let mut data_x: Vec<f64> = Vec::with_capacity(capacity);
        for _ in 0..data_x.capacity() {
            data_x.push(normal.sample(&mut r));
        }
        data_x
    }

    pub fn generate_random_data(n_samples: usize, n_features: usize) -> (Array2<f64>, Array1<f64>) {
        let data_x = fill_random_vector(n_samples * n_features, 42);
        let data_w = fill_random_vector(n_features, 43);
        let data_e = fill_random_vector(n_samples, 44);
        let X = Array2::from_shape_vec((n_samples, n_features).f(), data_x).unwrap();
        let true_w = Array1::from_shape_vec(n_features, data_w).unwrap();
        let noise = Array1::from_shape_vec(n_samples, data_e).unwrap();
        let y = X.dot(&true_w) + noise * 0.1;

        (X, y)
    }

    /// Centers every column and scales it to unit mean square.
    pub fn standardize(X: &Array2<f64>) -> Array2<f64> {
        let mut X = X.clone();
        for mut column in X.axis_iter_mut(Axis(1)) {
            let mean = column.mean().unwrap();
            column.mapv_inplace(|v| v - mean);
            let scale = (column.dot(&column) / column.len() as f64).sqrt();
            if scale > 0. {
                column.mapv_inplace(|v| v / scale);
            }
        }
        X
    }

    /// Builds the columns `1..=n_features` of the Sylvester-Hadamard matrix of
    /// order `n_samples` (a power of two). The columns are centered,
    /// orthogonal and have unit mean square.
    pub fn hadamard_design(n_samples: usize, n_features: usize) -> Array2<f64> {
        assert!(n_samples.is_power_of_two() && n_features < n_samples);
        Array2::from_shape_fn((n_samples, n_features), |(i, j)| {
            if (i & (j + 1)).count_ones() % 2 == 0 {
                1.
            } else {
                -1.
            }
        })
    }
}
