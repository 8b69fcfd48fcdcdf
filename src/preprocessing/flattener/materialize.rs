//! Turning validated tuples into matrix rows.
//!
//! [`for_each_entry`] walks a normalized tuple and yields `(column, value)`
//! pairs through the fitted column map. The two [`RowMaterializer`]s collect
//! those pairs into a dense array or a CSR matrix; both produce the same
//! logical matrix.

use ndarray::Array2;

use crate::matrix::CsrMatrix;
use crate::preprocessing::error::FlattenError;
use crate::preprocessing::flattener::column_map::ColumnIndexMap;
use crate::preprocessing::flattener::validator::NormalizedValue;

/// Emit the `(column, value)` pairs of one normalized tuple.
///
/// Categorical values without a column (never seen during fit) emit
/// nothing, which leaves their indicator columns at zero.
pub fn for_each_entry<F>(
    columns: &ColumnIndexMap,
    tuple: &[NormalizedValue<'_>],
    mut emit: F,
) -> Result<(), FlattenError>
where
    F: FnMut(usize, f64),
{
    for (position, value) in tuple.iter().enumerate() {
        match value {
            NormalizedValue::Number(x) => {
                let column = columns.scalar(position).ok_or_else(|| missing(position))?;
                emit(column, *x);
            }
            NormalizedValue::Category(category) => match columns.category(position, category) {
                Some(column) => emit(column, 1.0),
                None => {
                    // Unseen category: all indicators of this position stay zero.
                }
            },
            NormalizedValue::Vector(values) => {
                let (start, len) = columns.vector(position).ok_or_else(|| missing(position))?;
                if len != values.len() {
                    return Err(FlattenError::InconsistentState(format!(
                        "position {position} has {len} columns but a vector of {} values",
                        values.len()
                    )));
                }
                for (offset, x) in values.iter().enumerate() {
                    emit(start + offset, *x);
                }
            }
        }
    }
    Ok(())
}

fn missing(position: usize) -> FlattenError {
    FlattenError::InconsistentState(format!("no column registered for position {position}"))
}

/// Accumulates rows and assembles the final matrix.
pub trait RowMaterializer {
    type Output;

    /// Append one row using the current column map.
    fn push_row(
        &mut self,
        columns: &ColumnIndexMap,
        tuple: &[NormalizedValue<'_>],
    ) -> Result<(), FlattenError>;

    /// Assemble the matrix with the final column count.
    ///
    /// `n_cols` may exceed the width some rows were materialized with when
    /// categorical columns were appended after those rows.
    fn finish(self, n_cols: usize) -> Result<Self::Output, FlattenError>;
}

/// Builds a dense `Array2<f64>`; every cell is written, zeros included.
#[derive(Debug, Default)]
pub struct DenseMaterializer {
    rows: Vec<Vec<f64>>,
}

impl DenseMaterializer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RowMaterializer for DenseMaterializer {
    type Output = Array2<f64>;

    fn push_row(
        &mut self,
        columns: &ColumnIndexMap,
        tuple: &[NormalizedValue<'_>],
    ) -> Result<(), FlattenError> {
        let mut row = vec![0.0; columns.len()];
        for_each_entry(columns, tuple, |column, value| row[column] = value)?;
        self.rows.push(row);
        Ok(())
    }

    fn finish(self, n_cols: usize) -> Result<Self::Output, FlattenError> {
        let n_rows = self.rows.len();
        let mut data = Vec::with_capacity(n_rows * n_cols);
        for row in self.rows {
            if row.len() > n_cols {
                return Err(FlattenError::InconsistentState(format!(
                    "row of width {} exceeds the final width {n_cols}",
                    row.len()
                )));
            }
            // Columns appended after this row was built are all categorical
            // and therefore trail every column the row already has.
            let pad = n_cols - row.len();
            data.extend(row);
            data.extend(std::iter::repeat(0.0).take(pad));
        }
        Array2::from_shape_vec((n_rows, n_cols), data)
            .map_err(|err| FlattenError::InconsistentState(err.to_string()))
    }
}

/// Builds a [`CsrMatrix`], storing only non-zero entries with column
/// indices ascending within each row.
#[derive(Debug)]
pub struct SparseMaterializer {
    values: Vec<f64>,
    indices: Vec<usize>,
    indptr: Vec<usize>,
}

impl SparseMaterializer {
    pub fn new() -> Self {
        Self {
            values: Vec::new(),
            indices: Vec::new(),
            indptr: vec![0],
        }
    }
}

impl Default for SparseMaterializer {
    fn default() -> Self {
        Self::new()
    }
}

impl RowMaterializer for SparseMaterializer {
    type Output = CsrMatrix;

    fn push_row(
        &mut self,
        columns: &ColumnIndexMap,
        tuple: &[NormalizedValue<'_>],
    ) -> Result<(), FlattenError> {
        let mut row = Vec::new();
        for_each_entry(columns, tuple, |column, value| {
            // An explicit zero contributes nothing to a sparse matrix.
            if value == 0.0 {
                return;
            }
            row.push((column, value));
        })?;
        // Categorical columns trail the fixed ones, so positions alone do
        // not give ascending column order.
        row.sort_unstable_by_key(|&(column, _)| column);
        for (column, value) in row {
            self.indices.push(column);
            self.values.push(value);
        }
        self.indptr.push(self.values.len());
        Ok(())
    }

    fn finish(self, n_cols: usize) -> Result<Self::Output, FlattenError> {
        CsrMatrix::from_parts(self.values, self.indices, self.indptr, n_cols)
    }
}
