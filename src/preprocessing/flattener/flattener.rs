//! Feature tuple flattening.
//!
//! Maps heterogeneous feature tuples into dense or sparse `f64` matrices,
//! one-hot encoding string values along the way.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::matrix::FeatureMatrix;
use crate::preprocessing::error::FlattenError;
use crate::preprocessing::flattener::column_map::{ColumnIndexMap, ColumnKey, SubKey};
use crate::preprocessing::flattener::materialize::{
    DenseMaterializer, RowMaterializer, SparseMaterializer,
};
use crate::preprocessing::flattener::schema::{infer_schema, ColumnKind, Schema};
use crate::preprocessing::flattener::validator::TupleValidator;
use crate::preprocessing::flattener::vocabulary::grow_vocabulary;
use crate::preprocessing::traits::{FittedTransformer, Transformer};
use crate::preprocessing::value::FeatureValue;

/// Flattens feature tuples into numeric matrices.
///
/// A feature tuple mixes three kinds of values, decided per position by the
/// first tuple of the fit dataset:
///
/// - numbers (int or float): one output column
/// - strings: one-hot encoded, one column per value seen during fit
/// - numeric sequences (lists or arrays): one column per element; the length
///   is fixed by the first tuple
///
/// Fitting computes the output width, fixes the mapping from tuple positions
/// to output columns, infers the schema used for validation and learns the
/// one-hot vocabulary. Numeric and vector columns come first, in position
/// order; categorical columns follow in the order their values were first
/// seen.
///
/// # Example
/// ```
/// use featureforge::feature_tuple;
/// use featureforge::preprocessing::{FeatureFlattener, FittedTransformer, Transformer};
/// use ndarray::array;
///
/// let data = vec![
///     feature_tuple![1, "a", [1.0, 2.0]],
///     feature_tuple![2.5, "b", [3.0, 4.0]],
/// ];
///
/// let flattener = FeatureFlattener::new().with_sparse(false);
/// let fitted = flattener.fit(&data)?;
/// assert_eq!(fitted.n_features_out(), 5);
///
/// let matrix = fitted.transform(&data)?;
/// assert_eq!(
///     matrix.into_dense(),
///     array![[1.0, 1.0, 2.0, 1.0, 0.0], [2.5, 3.0, 4.0, 0.0, 1.0]]
/// );
/// # Ok::<(), featureforge::preprocessing::FlattenError>(())
/// ```
#[derive(Clone, Debug)]
pub struct FeatureFlattener {
    /// Produce a [`CsrMatrix`](crate::matrix::CsrMatrix) instead of a dense array.
    sparse: bool,
}

impl FeatureFlattener {
    /// Create a new flattener producing sparse output.
    pub fn new() -> Self {
        Self { sparse: true }
    }

    /// Choose between sparse (`true`) and dense (`false`) output.
    ///
    /// Only the output representation changes; learned state does not.
    pub fn with_sparse(mut self, sparse: bool) -> Self {
        self.sparse = sparse;
        self
    }

    pub fn is_sparse(&self) -> bool {
        self.sparse
    }
}

impl Default for FeatureFlattener {
    fn default() -> Self {
        Self::new()
    }
}

/// Serializable parameters for a fitted FeatureFlattener.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct FlattenerParams {
    /// Output representation.
    pub sparse: bool,
    /// Column kind of every tuple position.
    pub kinds: Vec<ColumnKind>,
    /// Column keys ordered by output column.
    pub columns: Vec<ColumnKey>,
}

/// Fitted FeatureFlattener ready for transformation.
#[derive(Clone, Debug)]
pub struct FittedFeatureFlattener {
    sparse: bool,
    schema: Schema,
    columns: ColumnIndexMap,
}

impl FittedFeatureFlattener {
    /// Infer the schema from the first tuple of a dataset.
    fn from_first(first: &[FeatureValue], sparse: bool) -> Result<Self, FlattenError> {
        let (schema, columns) = infer_schema(first)?;
        Ok(Self {
            sparse,
            schema,
            columns,
        })
    }

    /// Validate one fit tuple and learn its categorical values.
    fn observe(&mut self, row: usize, tuple: &[FeatureValue]) -> Result<(), FlattenError> {
        let normalized = TupleValidator::new(&self.schema)
            .validate(tuple)
            .inspect_err(|err| warn!(row, %err, "rejected feature tuple"))?;
        grow_vocabulary(&self.schema, &mut self.columns, &normalized)?;
        Ok(())
    }

    /// Validate and materialize every tuple with the frozen column map.
    fn materialize<I, M>(&self, data: I, mut sink: M) -> Result<M::Output, FlattenError>
    where
        I: IntoIterator,
        I::Item: AsRef<[FeatureValue]>,
        M: RowMaterializer,
    {
        let validator = TupleValidator::new(&self.schema);
        for (row, tuple) in data.into_iter().enumerate() {
            let normalized = validator
                .validate(tuple.as_ref())
                .inspect_err(|err| warn!(row, %err, "rejected feature tuple"))?;
            sink.push_row(&self.columns, &normalized)?;
        }
        sink.finish(self.columns.len())
    }

    /// Single pass that learns categorical values and materializes rows.
    ///
    /// Rows built early may be narrower than the final width; the
    /// materializer pads them at the tail in `finish`.
    fn learn_and_materialize<I, M>(&mut self, data: I, mut sink: M) -> Result<M::Output, FlattenError>
    where
        I: Iterator,
        I::Item: AsRef<[FeatureValue]>,
        M: RowMaterializer,
    {
        let validator = TupleValidator::new(&self.schema);
        for (row, tuple) in data.enumerate() {
            let normalized = validator
                .validate(tuple.as_ref())
                .inspect_err(|err| warn!(row, %err, "rejected feature tuple"))?;
            grow_vocabulary(&self.schema, &mut self.columns, &normalized)?;
            sink.push_row(&self.columns, &normalized)?;
        }
        sink.finish(self.columns.len())
    }

    /// The schema inferred at fit time.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// The mapping between tuple positions and output columns.
    pub fn columns(&self) -> &ColumnIndexMap {
        &self.columns
    }

    pub fn is_sparse(&self) -> bool {
        self.sparse
    }

    /// Key of an output column.
    pub fn column_key(&self, column: usize) -> Option<&ColumnKey> {
        self.columns.key(column)
    }

    /// Output column of a key, if it was learned.
    pub fn column_index(&self, key: &ColumnKey) -> Option<usize> {
        self.columns.get(key)
    }

    /// Categorical values learned for a position, in column order.
    pub fn vocabulary(&self, position: usize) -> Vec<&str> {
        self.columns.categories(position)
    }

    /// A readable name for every output column, e.g. `x0`, `x1=red`, `x2[0]`.
    pub fn feature_names(&self) -> Vec<String> {
        self.columns.keys().iter().map(ToString::to_string).collect()
    }
}

impl Transformer for FeatureFlattener {
    type Output = FeatureMatrix;
    type Params = FlattenerParams;
    type Fitted = FittedFeatureFlattener;

    fn fit<I>(&self, data: I) -> Result<Self::Fitted, FlattenError>
    where
        I: IntoIterator,
        I::Item: AsRef<[FeatureValue]>,
    {
        let mut rows = data.into_iter();
        let first = rows.next().ok_or(FlattenError::EmptyDataset)?;
        info!("starting flattener fit");

        let mut fitted = FittedFeatureFlattener::from_first(first.as_ref(), self.sparse)?;

        // Without categorical positions the first tuple determines everything.
        if fitted.schema.has_categorical() {
            fitted.observe(0, first.as_ref())?;
            for (row, tuple) in rows.enumerate() {
                fitted.observe(row + 1, tuple.as_ref())?;
            }
        }

        info!(
            n_features_in = fitted.n_features_in(),
            n_features_out = fitted.n_features_out(),
            "finished flattener fit"
        );
        Ok(fitted)
    }

    fn fit_transform<I>(&self, data: I) -> Result<(Self::Fitted, Self::Output), FlattenError>
    where
        I: IntoIterator,
        I::Item: AsRef<[FeatureValue]>,
    {
        let mut rows = data.into_iter();
        let first = rows.next().ok_or(FlattenError::EmptyDataset)?;
        info!(sparse = self.sparse, "starting flattener fit_transform");

        let mut fitted = FittedFeatureFlattener::from_first(first.as_ref(), self.sparse)?;
        let rows = std::iter::once(first).chain(rows);
        let matrix = if self.sparse {
            FeatureMatrix::Sparse(fitted.learn_and_materialize(rows, SparseMaterializer::new())?)
        } else {
            FeatureMatrix::Dense(fitted.learn_and_materialize(rows, DenseMaterializer::new())?)
        };

        let (n_rows, n_cols) = matrix.shape();
        info!(
            n_features_in = fitted.n_features_in(),
            n_rows,
            n_cols,
            nnz = matrix.nnz(),
            "finished flattener fit_transform"
        );
        Ok((fitted, matrix))
    }
}

impl FittedTransformer for FittedFeatureFlattener {
    type Output = FeatureMatrix;
    type Params = FlattenerParams;

    fn transform<I>(&self, data: I) -> Result<Self::Output, FlattenError>
    where
        I: IntoIterator,
        I::Item: AsRef<[FeatureValue]>,
    {
        info!(sparse = self.sparse, "starting flattener transform");
        let matrix = if self.sparse {
            FeatureMatrix::Sparse(self.materialize(data, SparseMaterializer::new())?)
        } else {
            FeatureMatrix::Dense(self.materialize(data, DenseMaterializer::new())?)
        };

        let (n_rows, n_cols) = matrix.shape();
        info!(n_rows, n_cols, nnz = matrix.nnz(), "finished flattener transform");
        Ok(matrix)
    }

    fn extract_params(&self) -> Self::Params {
        FlattenerParams {
            sparse: self.sparse,
            kinds: self.schema.kinds().to_vec(),
            columns: self.columns.keys().to_vec(),
        }
    }

    fn from_params(params: Self::Params) -> Result<Self, FlattenError> {
        if params.kinds.is_empty() {
            return Err(FlattenError::InconsistentState(
                "schema has no positions".to_string(),
            ));
        }
        let schema = Schema::from_kinds(params.kinds);

        let mut columns = ColumnIndexMap::new();
        for (expected, key) in params.columns.into_iter().enumerate() {
            check_key(&schema, &key)?;
            let label = key.to_string();
            if columns.insert(key)? != expected {
                return Err(FlattenError::InconsistentState(format!(
                    "column {label} appears more than once"
                )));
            }
        }
        check_layout(&schema, &columns)?;

        Ok(FittedFeatureFlattener {
            sparse: params.sparse,
            schema,
            columns,
        })
    }

    fn n_features_in(&self) -> usize {
        self.schema.len()
    }

    fn n_features_out(&self) -> usize {
        self.columns.len()
    }
}

/// A restored key must address a position of the matching kind.
fn check_key(schema: &Schema, key: &ColumnKey) -> Result<(), FlattenError> {
    let valid = match (schema.kind(key.position), &key.sub_key) {
        (Some(ColumnKind::Numeric), SubKey::Scalar) => true,
        (Some(ColumnKind::Categorical), SubKey::Category(_)) => true,
        (Some(ColumnKind::FixedVector(size)), SubKey::Offset(offset)) => *offset < size,
        _ => false,
    };
    if valid {
        Ok(())
    } else {
        Err(FlattenError::InconsistentState(format!(
            "column {key} does not fit position kind {:?}",
            schema.kind(key.position)
        )))
    }
}

/// Every numeric and vector column must be present, and all of them must
/// precede the categorical columns.
fn check_layout(schema: &Schema, columns: &ColumnIndexMap) -> Result<(), FlattenError> {
    let fixed = schema.fixed_width();
    let complete = schema
        .kinds()
        .iter()
        .enumerate()
        .all(|(position, kind)| match kind {
            ColumnKind::Numeric => columns.scalar(position).is_some(),
            ColumnKind::Categorical => true,
            ColumnKind::FixedVector(size) => columns.vector(position).map(|(_, len)| len) == Some(*size),
        });
    let ordered = columns
        .keys()
        .iter()
        .enumerate()
        .all(|(column, key)| key.is_category() == (column >= fixed));
    if complete && ordered {
        Ok(())
    } else {
        Err(FlattenError::InconsistentState(
            "numeric and vector columns must all be present and precede categorical columns"
                .to_string(),
        ))
    }
}
