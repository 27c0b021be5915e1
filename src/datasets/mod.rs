mod impl_datasets;
mod impl_design_matrix;


/// A dataset pairs a design matrix (one row per sample, one column per
/// feature) with the targets, aligned row by row.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetBase<DM, T>
where
    DM: DesignMatrix,
    T: Targets,
{
    pub design_matrix: DM,
    pub targets: T,
}

/// This trait gives access to the shape of a design matrix.
pub trait DesignMatrix: Sized {
    type Elem;

    fn n_samples(&self) -> usize;
    fn n_features(&self) -> usize;
}

/// This trait gives access to the number of samples of a target vector.
pub trait Targets: Sized {
    type Elem;

    fn n_samples(&self) -> usize;
}
