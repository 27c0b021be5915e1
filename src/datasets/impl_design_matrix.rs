use super::{DesignMatrix, Targets};
use crate::Float;
use ndarray::{ArrayBase, Axis, Data, Ix1, Ix2};

/// This implements the [`DesignMatrix`] trait for dense matrices.
impl<F: Float, S: Data<Elem = F>> DesignMatrix for ArrayBase<S, Ix2> {
    type Elem = F;

    fn n_samples(&self) -> usize {
        self.len_of(Axis(0))
    }

    fn n_features(&self) -> usize {
        self.len_of(Axis(1))
    }
}

/// This implements the [`Targets`] trait for single-task target vectors.
impl<F: Float, S: Data<Elem = F>> Targets for ArrayBase<S, Ix1> {
    type Elem = F;

    fn n_samples(&self) -> usize {
        self.len_of(Axis(0))
    }
}

/// This implements the [`DesignMatrix`] trait for references.
impl<DM: DesignMatrix> DesignMatrix for &DM {
    type Elem = DM::Elem;

    fn n_samples(&self) -> usize {
        (*self).n_samples()
    }

    fn n_features(&self) -> usize {
        (*self).n_features()
    }
}

impl<T: Targets> Targets for &T {
    type Elem = T::Elem;

    fn n_samples(&self) -> usize {
        (*self).n_samples()
    }
}
