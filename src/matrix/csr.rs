//! Compressed Sparse Row (CSR) matrix.

use ndarray::Array2;

use crate::preprocessing::error::FlattenError;

/// Compressed Sparse Row matrix of `f64` values.
///
/// # Structure
///
/// - `values`: stored values, row by row
/// - `indices`: column index of each stored value
/// - `indptr`: row pointers; length is `n_rows + 1` and row `i` owns
///   `values[indptr[i]..indptr[i + 1]]`
///
/// Entries that are not stored are zero.
///
/// # Example
///
/// ```
/// use featureforge::matrix::CsrMatrix;
///
/// let csr = CsrMatrix::from_parts(vec![1.0, 2.0, 3.0], vec![0, 2, 1], vec![0, 2, 3], 3).unwrap();
/// assert_eq!(csr.shape(), (2, 3));
/// assert_eq!(csr.row(0).collect::<Vec<_>>(), vec![(0, 1.0), (2, 2.0)]);
/// assert_eq!(csr.get(1, 0), 0.0);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct CsrMatrix {
    values: Vec<f64>,
    indices: Vec<usize>,
    indptr: Vec<usize>,
    n_cols: usize,
}

impl CsrMatrix {
    /// An `n_rows x n_cols` matrix with no stored entries.
    pub fn zeros(n_rows: usize, n_cols: usize) -> Self {
        Self {
            values: Vec::new(),
            indices: Vec::new(),
            indptr: vec![0; n_rows + 1],
            n_cols,
        }
    }

    /// Build a matrix from raw CSR arrays, checking their consistency.
    pub fn from_parts(
        values: Vec<f64>,
        indices: Vec<usize>,
        indptr: Vec<usize>,
        n_cols: usize,
    ) -> Result<Self, FlattenError> {
        if indptr.first() != Some(&0) {
            return Err(FlattenError::InconsistentState(
                "row pointers must start at 0".to_string(),
            ));
        }
        if indptr.windows(2).any(|w| w[0] > w[1]) {
            return Err(FlattenError::InconsistentState(
                "row pointers must be non-decreasing".to_string(),
            ));
        }
        if indptr.last() != Some(&values.len()) || indices.len() != values.len() {
            return Err(FlattenError::InconsistentState(format!(
                "{} values, {} column indices and a final row pointer of {:?} disagree",
                values.len(),
                indices.len(),
                indptr.last()
            )));
        }
        if let Some(&col) = indices.iter().find(|&&col| col >= n_cols) {
            return Err(FlattenError::InconsistentState(format!(
                "column index {col} out of bounds for {n_cols} columns"
            )));
        }
        Ok(Self {
            values,
            indices,
            indptr,
            n_cols,
        })
    }

    pub fn n_rows(&self) -> usize {
        self.indptr.len() - 1
    }

    pub fn n_cols(&self) -> usize {
        self.n_cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.n_rows(), self.n_cols)
    }

    /// Number of stored entries.
    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Stored `(column, value)` entries of one row.
    ///
    /// # Panics
    /// If `row >= n_rows()`.
    pub fn row(&self, row: usize) -> impl Iterator<Item = (usize, f64)> + '_ {
        let range = self.indptr[row]..self.indptr[row + 1];
        self.indices[range.clone()]
            .iter()
            .copied()
            .zip(self.values[range].iter().copied())
    }

    /// Value at `(row, col)`, zero when not stored.
    ///
    /// # Panics
    /// If `row >= n_rows()`.
    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.row(row)
            .find(|&(c, _)| c == col)
            .map_or(0.0, |(_, value)| value)
    }

    /// Expand into a dense row-major array.
    pub fn to_dense(&self) -> Array2<f64> {
        let mut dense = Array2::zeros(self.shape());
        for row in 0..self.n_rows() {
            for (col, value) in self.row(row) {
                dense[[row, col]] = value;
            }
        }
        dense
    }
}
