use ndarray::{array, s, Array1, Array2};

use crate::cd::FeatureSelection;
use crate::datasets::DatasetBase;
use crate::estimators::error::EstimatorError;
use crate::estimators::hyperparams::LassoParams;
use crate::estimators::param_guard::ParamGuard;
use crate::estimators::traits::{Fit, Predict};
use crate::estimators::{lasso_path, Lasso, Ridge};
use crate::helpers::helpers::{center_data, compute_lambda_max};
use crate::helpers::test_helpers::*;
use crate::penalties::ThresholdRule;

fn orthogonal_problem() -> (Array2<f64>, Array1<f64>, Array1<f64>) {
    let x = hadamard_design(16, 8);
    let true_w = array![3., -2., 1.5, -1., 0.5, 0.25, -0.1, 0.05];
    let y = x.dot(&true_w);
    (x, y, true_w)
}

fn soft(x: f64, threshold: f64) -> f64 {
    x.signum() * (x.abs() - threshold).max(0.)
}

#[test]
fn test_default_params() {
    let params = LassoParams::<f64>::new().check().unwrap();
    assert_eq!(params.alpha(), 1.);
    assert_eq!(params.tolerance(), 1e-4);
    assert_eq!(params.max_iterations(), 1000);
    assert_eq!(params.selection(), FeatureSelection::Sequential);
    assert_eq!(params.threshold_rule(), ThresholdRule::HalfLambda);
    assert!(params.fit_intercept());
    assert!(params.warm_start().is_none());
}

#[test]
fn test_noiseless_single_feature_ols() {
    let x: Array2<f64> = array![[-2.], [-1.], [0.], [1.], [2.]];
    let y = &x.column(0) * 3.;
    let dataset = DatasetBase::from((x, y));

    let model = Lasso::<f64>::params().alpha(0.).fit(&dataset).unwrap();

    assert!((model.coefficients()[0] - 3.).abs() < 1e-3);
    assert!(model.intercept().abs() < 1e-12);
    assert!(model.converged());
}

#[test]
fn test_intercept_recovery() {
    let x: Array2<f64> = array![[1.], [2.], [3.], [4.]];
    let y: Array1<f64> = array![8., 11., 14., 17.];
    let dataset = DatasetBase::from((x.clone(), y.clone()));

    let model = Lasso::<f64>::params()
        .alpha(0.)
        .tolerance(1e-10)
        .fit(&dataset)
        .unwrap();

    assert!((model.coefficients()[0] - 3.).abs() < 1e-8);
    assert!((model.intercept() - 5.).abs() < 1e-8);
    assert_array_all_close(model.predict(&x).view(), y.view(), 1e-8);
    assert!((model.score(&dataset) - 1.).abs() < 1e-10);
}

#[test]
fn test_zero_penalty_matches_least_squares() {
    let (x, y) = generate_random_data(50, 5);
    let dataset = DatasetBase::from((x.view(), y.view()));

    let lasso = Lasso::params()
        .alpha(0.)
        .tolerance(1e-12)
        .max_iterations(100_000)
        .fit(&dataset)
        .unwrap();
    let ols = Ridge::params().alpha(0.).fit(&dataset).unwrap();

    assert!(lasso.converged());
    assert_array_all_close(lasso.coefficients(), ols.coefficients(), 1e-7);
    assert!((lasso.intercept() - ols.intercept()).abs() < 1e-7);

    // Normal equations: the residual is orthogonal to every centered feature.
    let data = center_data(&x, &y, true).unwrap();
    let residual = &data.y - &data.x.dot(&lasso.coefficients());
    let correlations = data.x.t().dot(&residual) / 50.;
    assert_array_all_close(correlations.view(), Array1::zeros(5).view(), 1e-8);
}

#[test]
fn test_orthogonal_design_closed_form() {
    let (x, y, true_w) = orthogonal_problem();
    let dataset = DatasetBase::from((x, y));

    for &alpha in &[0., 0.3, 1., 2.5] {
        let model = Lasso::params()
            .alpha(alpha)
            .tolerance(1e-10)
            .fit(&dataset)
            .unwrap();
        let expected = true_w.mapv(|w| soft(w, alpha / 2.));
        assert_array_all_close(model.coefficients(), expected.view(), 1e-10);
    }
}

#[test]
fn test_sparsity_is_monotonic_in_alpha() {
    let (x, y, _) = orthogonal_problem();
    let dataset = DatasetBase::from((x, y));

    let alphas = [0., 0.1, 0.3, 0.6, 1., 2.5, 4., 7.];
    let n_zeros: Vec<usize> = alphas
        .iter()
        .map(|&alpha| Lasso::params().alpha(alpha).fit(&dataset).unwrap().n_zeros())
        .collect();

    for pair in n_zeros.windows(2) {
        assert!(pair[0] <= pair[1], "{:?}", n_zeros);
    }
    assert_eq!(n_zeros[0], 0);
    assert_eq!(n_zeros[n_zeros.len() - 1], 8);
}

#[test]
fn test_null_weight_above_lambda_max() {
    let (x, y) = generate_random_data(30, 10);
    let data = center_data(&x, &y, true).unwrap();
    let dataset = DatasetBase::from((x, y));

    for rule in [ThresholdRule::HalfLambda, ThresholdRule::Lambda] {
        let lambda_max = compute_lambda_max(data.x.view(), data.y.view(), rule);

        let model = Lasso::params()
            .alpha(lambda_max * 1.01)
            .threshold_rule(rule)
            .fit(&dataset)
            .unwrap();
        assert_eq!(model.n_zeros(), 10);
        assert_eq!(model.n_iterations(), 1);
        assert!(model.converged());
        assert!((model.intercept() - data.y_mean).abs() < 1e-12);

        let model = Lasso::params()
            .alpha(lambda_max * 0.99)
            .threshold_rule(rule)
            .fit(&dataset)
            .unwrap();
        assert!(model.n_zeros() < 10);
    }
}

#[test]
fn test_threshold_rules_are_consistent() {
    let (x, y, _) = orthogonal_problem();
    let dataset = DatasetBase::from((x, y));

    let half = Lasso::params().alpha(1.).fit(&dataset).unwrap();
    let full = Lasso::params()
        .alpha(0.5)
        .threshold_rule(ThresholdRule::Lambda)
        .fit(&dataset)
        .unwrap();

    assert_array_all_close(half.coefficients(), full.coefficients(), 1e-12);
}

#[test]
fn test_irrelevant_features_are_discarded() {
    let data = fill_random_vector(400, 5);
    let x = standardize(&Array2::from_shape_vec((100, 4), data).unwrap());
    let y = &x.column(0) * 2.;
    let dataset = DatasetBase::from((x, y));

    let model = Lasso::params().alpha(0.5).fit(&dataset).unwrap();
    let w = model.coefficients();

    assert_eq!(w.slice(s![1..]), Array1::<f64>::zeros(3));
    assert!((w[0] - 2.).abs() < 0.3);
    assert!((w[0] - 1.75).abs() < 1e-6);
}

#[test]
fn test_constant_feature_has_null_coefficient() {
    let (x, y) = generate_random_data(20, 3);
    let mut x_const = Array2::<f64>::zeros((20, 4));
    x_const.slice_mut(s![.., 0..3]).assign(&x);
    x_const.column_mut(3).fill(0.1);
    let dataset = DatasetBase::from((x_const, y));

    for &alpha in &[0., 1e-3, 0.1, 10.] {
        for selection in [FeatureSelection::Sequential, FeatureSelection::Random(3)] {
            for fit_intercept in [true, false] {
                let model = Lasso::params()
                    .alpha(alpha)
                    .selection(selection)
                    .fit_intercept(fit_intercept)
                    .warm_start(array![0., 0., 0., 4.])
                    .fit(&dataset)
                    .unwrap();
                assert_eq!(model.coefficients()[3], 0.);
            }
        }
    }
}

#[test]
fn test_sequential_fit_is_deterministic() {
    let (x, y) = generate_random_data(40, 12);
    let dataset = DatasetBase::from((x, y));
    let params = Lasso::params().alpha(0.05).tolerance(1e-8);

    let first = params.fit(&dataset).unwrap();
    let second = params.fit(&dataset).unwrap();

    assert_eq!(first, second);
    assert_eq!(first.n_iterations(), second.n_iterations());
}

#[test]
fn test_random_fit_is_reproducible() {
    let (x, y) = generate_random_data(40, 12);
    let dataset = DatasetBase::from((x, y));
    let params = Lasso::params()
        .alpha(0.05)
        .tolerance(1e-10)
        .selection(FeatureSelection::Random(42));

    let first = params.fit(&dataset).unwrap();
    let second = params.fit(&dataset).unwrap();
    assert_eq!(first, second);

    let sequential = Lasso::params()
        .alpha(0.05)
        .tolerance(1e-10)
        .fit(&dataset)
        .unwrap();
    assert_array_all_close(first.coefficients(), sequential.coefficients(), 1e-6);
}

#[test]
fn test_random_fit_on_orthogonal_design() {
    let (x, y, true_w) = orthogonal_problem();
    let dataset = DatasetBase::from((x, y));
    let expected = true_w.mapv(|w| soft(w, 0.5));

    for seed in 0..50 {
        let model = Lasso::params()
            .alpha(1.)
            .selection(FeatureSelection::Random(seed))
            .fit(&dataset)
            .unwrap();
        assert!(model.converged());
        assert_array_all_close(model.coefficients(), expected.view(), 1e-10);
    }
}

#[test]
fn test_did_not_converge_is_reported() {
    let (x, y) = generate_random_data(30, 10);
    let dataset = DatasetBase::from((x, y));

    let model = Lasso::params()
        .alpha(0.01)
        .tolerance(1e-12)
        .max_iterations(1)
        .fit(&dataset)
        .unwrap();

    assert!(!model.converged());
    assert_eq!(model.n_iterations(), 1);
    assert!(model.n_zeros() < 10);

    match model.check_convergence() {
        Err(err @ EstimatorError::DidNotConverge { n_iterations, .. }) => {
            assert_eq!(n_iterations, 1);
            assert!(!err.is_invalid_input());
        }
        other => panic!("expected a convergence error, got {:?}", other),
    }
}

#[test]
fn test_warm_start_at_solution() {
    let (x, y) = generate_random_data(40, 6);
    let dataset = DatasetBase::from((x, y));

    let model = Lasso::params()
        .alpha(0.1)
        .tolerance(1e-12)
        .fit(&dataset)
        .unwrap();
    let refit = Lasso::params()
        .alpha(0.1)
        .tolerance(1e-8)
        .warm_start(model.coefficients().to_owned())
        .fit(&dataset)
        .unwrap();

    assert_eq!(refit.n_iterations(), 1);
    assert_array_all_close(refit.coefficients(), model.coefficients(), 1e-8);
}

#[test]
fn test_invalid_hyperparameters() {
    let (x, y) = generate_random_data(10, 3);
    let dataset = DatasetBase::from((x, y));

    let res = Lasso::params().alpha(-1.).fit(&dataset);
    assert!(matches!(res, Err(EstimatorError::InvalidRegularization(a)) if a == -1.));

    let res = Lasso::params().alpha(f64::NAN).fit(&dataset);
    assert!(matches!(res, Err(EstimatorError::InvalidRegularization(_))));

    let res = Lasso::params().tolerance(0.).fit(&dataset);
    assert!(matches!(res, Err(EstimatorError::InvalidTolerance(_))));

    let res = Lasso::params().tolerance(-1e-3).fit(&dataset);
    assert!(matches!(res, Err(EstimatorError::InvalidTolerance(_))));

    let res = Lasso::params().max_iterations(0).fit(&dataset);
    assert!(matches!(res, Err(EstimatorError::InvalidMaxIterations(0))));

    let res = Lasso::params().warm_start(array![1., 2.]).fit(&dataset);
    assert!(matches!(
        res,
        Err(EstimatorError::WarmStartMismatch {
            got: 2,
            expected: 3
        })
    ));

    let res = Lasso::params()
        .warm_start(array![1., f64::INFINITY, 0.])
        .fit(&dataset);
    assert!(matches!(res, Err(EstimatorError::NonFinite("warm start"))));

    let res = Ridge::params().alpha(-0.5).fit(&dataset);
    assert!(matches!(res, Err(EstimatorError::InvalidRegularization(_))));
}

#[test]
fn test_invalid_dataset() {
    let x = array![[1., 2.], [3., f64::NAN]];
    let y = array![1., 2.];
    let res = Lasso::params().fit(&DatasetBase::from((x, y)));
    match res {
        Err(err) => assert!(err.is_invalid_input()),
        Ok(_) => panic!("Should return an error but didn't"),
    }

    let x = array![[1., 2.], [3., 4.]];
    let y = array![1., 2., 3.];
    let res = Lasso::params().fit(&DatasetBase::from((x, y)));
    assert!(matches!(res, Err(EstimatorError::ShapeMismatch { .. })));
}

#[test]
fn test_no_features() {
    let x = Array2::<f64>::zeros((4, 0));
    let y = array![1., 2., 3., 6.];
    let dataset = DatasetBase::from((x.clone(), y));

    let model = Lasso::params().fit(&dataset).unwrap();
    assert!(model.converged());
    assert_eq!(model.n_iterations(), 1);
    assert_eq!(model.coefficients().len(), 0);
    assert_eq!(model.intercept(), 3.);
    assert_eq!(model.predict(&x), array![3., 3., 3., 3.]);
}

#[test]
#[should_panic(expected = "model was fitted on 2")]
fn test_predict_checks_number_of_features() {
    let (x, y) = generate_random_data(10, 2);
    let dataset = DatasetBase::from((x, y));
    let model = Lasso::params().alpha(0.1).fit(&dataset).unwrap();

    model.predict(&Array2::<f64>::zeros((10, 3)));
}

#[test]
fn test_ridge_orthogonal_design() {
    let x = hadamard_design(8, 3);
    let true_w = array![2., -0.5, 0.1];
    let y = x.dot(&true_w) + 1.5;
    let dataset = DatasetBase::from((x, y));

    let model = Ridge::params().alpha(1.).fit(&dataset).unwrap();
    assert_array_all_close(model.coefficients(), (&true_w / 2.).view(), 1e-12);
    assert!((model.intercept() - 1.5).abs() < 1e-12);
}

#[test]
fn test_ridge_constant_feature() {
    let x: Array2<f64> = array![[1., 1.], [2., 1.], [3., 1.], [4., 1.]];
    let y: Array1<f64> = array![2., 4., 6., 8.];
    let dataset = DatasetBase::from((x, y));

    let model = Ridge::<f64>::params().alpha(0.).fit(&dataset).unwrap();
    assert_eq!(model.coefficients()[1], 0.);
    assert!((model.coefficients()[0] - 2.).abs() < 1e-10);
    assert!(model.intercept().abs() < 1e-10);
}

#[test]
fn test_ridge_shrinks_more_than_lasso_keeps_dense() {
    let (x, y, _) = orthogonal_problem();
    let dataset = DatasetBase::from((x, y));

    let lasso = Lasso::params().alpha(1.).fit(&dataset).unwrap();
    let ridge = Ridge::params().alpha(1.).fit(&dataset).unwrap();

    assert!(lasso.n_zeros() > 0);
    assert!(ridge.coefficients().iter().all(|&w| w != 0.));
    assert!(lasso.score(&dataset) < 1.);
    assert!(ridge.score(&dataset) < 1.);
}

#[test]
fn test_lasso_path_matches_independent_fits() {
    let (x, y) = generate_random_data(60, 6);
    let x = standardize(&x);
    let dataset = DatasetBase::from((x, y));

    let alphas = [2., 1., 0.5, 0.1, 0.01];
    let params = Lasso::params().tolerance(1e-10);
    let path = lasso_path(&dataset, &alphas, &params).unwrap();

    assert_eq!(path.len(), alphas.len());
    for (model, &alpha) in path.iter().zip(alphas.iter()) {
        let independent = params.clone().alpha(alpha).fit(&dataset).unwrap();
        assert_array_all_close(model.coefficients(), independent.coefficients(), 1e-6);
        assert!(model.converged());
    }
}

#[test]
fn test_lasso_path_propagates_errors() {
    let (x, y) = generate_random_data(10, 2);
    let dataset = DatasetBase::from((x, y));

    let res = lasso_path(&dataset, &[1., -1.], &Lasso::params());
    assert!(matches!(res, Err(EstimatorError::InvalidRegularization(_))));
}
