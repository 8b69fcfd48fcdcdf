//! Output matrices produced by the flattener.
//!
//! Dense output is a plain `ndarray::Array2<f64>`; sparse output is a
//! [`CsrMatrix`]. [`FeatureMatrix`] wraps either so callers that configure
//! the representation at runtime get a single return type.

mod csr;

pub use csr::CsrMatrix;

use ndarray::Array2;

/// A flattened dataset, dense or sparse.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureMatrix {
    Dense(Array2<f64>),
    Sparse(CsrMatrix),
}

impl FeatureMatrix {
    pub fn shape(&self) -> (usize, usize) {
        match self {
            FeatureMatrix::Dense(m) => m.dim(),
            FeatureMatrix::Sparse(m) => m.shape(),
        }
    }

    pub fn n_rows(&self) -> usize {
        self.shape().0
    }

    pub fn n_cols(&self) -> usize {
        self.shape().1
    }

    pub fn is_sparse(&self) -> bool {
        matches!(self, FeatureMatrix::Sparse(_))
    }

    /// Number of stored entries; every cell for dense matrices.
    pub fn nnz(&self) -> usize {
        match self {
            FeatureMatrix::Dense(m) => m.len(),
            FeatureMatrix::Sparse(m) => m.nnz(),
        }
    }

    pub fn as_dense(&self) -> Option<&Array2<f64>> {
        match self {
            FeatureMatrix::Dense(m) => Some(m),
            FeatureMatrix::Sparse(_) => None,
        }
    }

    pub fn as_sparse(&self) -> Option<&CsrMatrix> {
        match self {
            FeatureMatrix::Dense(_) => None,
            FeatureMatrix::Sparse(m) => Some(m),
        }
    }

    /// Dense copy of the matrix, whatever its representation.
    pub fn to_dense(&self) -> Array2<f64> {
        match self {
            FeatureMatrix::Dense(m) => m.clone(),
            FeatureMatrix::Sparse(m) => m.to_dense(),
        }
    }

    pub fn into_dense(self) -> Array2<f64> {
        match self {
            FeatureMatrix::Dense(m) => m,
            FeatureMatrix::Sparse(m) => m.to_dense(),
        }
    }
}

impl From<Array2<f64>> for FeatureMatrix {
    fn from(m: Array2<f64>) -> Self {
        FeatureMatrix::Dense(m)
    }
}

impl From<CsrMatrix> for FeatureMatrix {
    fn from(m: CsrMatrix) -> Self {
        FeatureMatrix::Sparse(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    #[test]
    fn test_dense_accessors() {
        let m = FeatureMatrix::from(array![[1.0, 0.0], [0.0, 2.0], [3.0, 0.0]]);
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.n_rows(), 3);
        assert_eq!(m.n_cols(), 2);
        assert_eq!(m.nnz(), 6);
        assert!(!m.is_sparse());
        assert!(m.as_sparse().is_none());
        assert_eq!(m.as_dense().unwrap()[[1, 1]], 2.0);
    }

    #[test]
    fn test_sparse_accessors() {
        let csr = CsrMatrix::from_parts(vec![1.0, 2.0], vec![0, 1], vec![0, 1, 2], 2).unwrap();
        let m = FeatureMatrix::from(csr);
        assert!(m.is_sparse());
        assert_eq!(m.shape(), (2, 2));
        assert_eq!(m.nnz(), 2);
        assert!(m.as_dense().is_none());
        assert_eq!(m.into_dense(), array![[1.0, 0.0], [0.0, 2.0]]);
    }
}
