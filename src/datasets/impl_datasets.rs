use super::{DatasetBase, DesignMatrix, Targets};
use crate::estimators::error::{EstimatorError, Result};
use crate::Float;
use ndarray::{ArrayBase, Data, Ix1, Ix2};

/// This implementation block provides a method for the creation of datasets
/// from dense matrices.
impl<F: Float, D: Data<Elem = F>, T: Targets> From<(ArrayBase<D, Ix2>, T)>
    for DatasetBase<ArrayBase<D, Ix2>, T>
{
    fn from(data: (ArrayBase<D, Ix2>, T)) -> Self {
        DatasetBase {
            design_matrix: data.0,
            targets: data.1,
        }
    }
}

/// This implementation block provides methods to get record and target objects
/// from the dataset.
impl<DM: DesignMatrix, T: Targets> DatasetBase<DM, T> {
    /// This method instantiates a new dataset from a design matrix and targets.
    pub fn new(design_matrix: DM, targets: T) -> DatasetBase<DM, T> {
        DatasetBase {
            design_matrix,
            targets,
        }
    }

    /// This method is a getter for the targets.
    pub fn targets(&self) -> &T {
        &self.targets
    }

    /// This method is a getter for the design matrix.
    pub fn design_matrix(&self) -> &DM {
        &self.design_matrix
    }

    pub fn n_samples(&self) -> usize {
        self.design_matrix.n_samples()
    }

    pub fn n_features(&self) -> usize {
        self.design_matrix.n_features()
    }
}

impl<F: Float, D: Data<Elem = F>, D2: Data<Elem = F>> DatasetBase<ArrayBase<D, Ix2>, ArrayBase<D2, Ix1>> {
    /// Checks that the dataset holds at least one sample, that the design
    /// matrix and the targets agree on the number of samples, and that no
    /// value is NaN or infinite.
    pub fn check(&self) -> Result<()> {
        let n_samples = self.design_matrix.n_samples();
        let n_targets = self.targets.n_samples();

        if n_samples != n_targets {
            return Err(EstimatorError::ShapeMismatch {
                n_samples,
                n_targets,
            });
        }
        if n_samples == 0 {
            return Err(EstimatorError::EmptyDataset);
        }
        if self.design_matrix.iter().any(|x| !x.is_finite()) {
            return Err(EstimatorError::NonFinite("design matrix"));
        }
        if self.targets.iter().any(|y| !y.is_finite()) {
            return Err(EstimatorError::NonFinite("targets"));
        }
        Ok(())
    }
}
