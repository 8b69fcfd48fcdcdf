//! Per-position column kinds, inferred from the first tuple of a dataset.

use serde::{Deserialize, Serialize};

use crate::preprocessing::error::FlattenError;
use crate::preprocessing::flattener::column_map::{ColumnIndexMap, ColumnKey};
use crate::preprocessing::flattener::sequence::SequenceValidator;
use crate::preprocessing::value::FeatureValue;

/// How one tuple position is flattened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ColumnKind {
    /// A number; one output column.
    Numeric,
    /// A string; one indicator column per value seen during fit.
    Categorical,
    /// A numeric sequence of fixed length; that many contiguous columns.
    FixedVector(usize),
}

impl ColumnKind {
    /// Name of the value type this kind accepts, for error messages.
    pub fn expected(&self) -> &'static str {
        match self {
            ColumnKind::Numeric => "number",
            ColumnKind::Categorical => "string",
            ColumnKind::FixedVector(_) => "sequence",
        }
    }

    /// Number of columns registered for this kind at schema inference time.
    pub fn fixed_width(&self) -> usize {
        match self {
            ColumnKind::Numeric => 1,
            ColumnKind::Categorical => 0,
            ColumnKind::FixedVector(size) => *size,
        }
    }
}

/// The frozen, ordered column kinds of every tuple position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    kinds: Vec<ColumnKind>,
}

impl Schema {
    pub(crate) fn from_kinds(kinds: Vec<ColumnKind>) -> Self {
        Self { kinds }
    }

    pub fn kinds(&self) -> &[ColumnKind] {
        &self.kinds
    }

    pub fn kind(&self, position: usize) -> Option<ColumnKind> {
        self.kinds.get(position).copied()
    }

    /// Tuple size.
    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn categorical_positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == ColumnKind::Categorical)
            .map(|(position, _)| position)
    }

    pub fn has_categorical(&self) -> bool {
        self.kinds.contains(&ColumnKind::Categorical)
    }

    /// Total width of the numeric and vector columns.
    pub fn fixed_width(&self) -> usize {
        self.kinds.iter().map(ColumnKind::fixed_width).sum()
    }
}

/// Infer the schema from the first tuple of a dataset.
///
/// Numeric and vector columns are registered immediately, in position order,
/// so they occupy the lowest column indices. Categorical positions register
/// nothing; their columns are appended while scanning the fit dataset.
pub fn infer_schema(first: &[FeatureValue]) -> Result<(Schema, ColumnIndexMap), FlattenError> {
    if first.is_empty() {
        return Err(FlattenError::EmptyFeatures);
    }

    let mut columns = ColumnIndexMap::new();
    let mut kinds = Vec::with_capacity(first.len());
    for (position, value) in first.iter().enumerate() {
        let kind = match value {
            FeatureValue::Int(_) | FeatureValue::Float(_) => {
                columns.insert(ColumnKey::scalar(position))?;
                ColumnKind::Numeric
            }
            FeatureValue::Str(_) => ColumnKind::Categorical,
            FeatureValue::Seq(_) | FeatureValue::Array(_) => {
                let size = SequenceValidator::from_example(value)
                    .map_err(|err| FlattenError::from_sequence(position, err))?
                    .size()
                    .unwrap_or_default();
                for offset in 0..size {
                    columns.insert(ColumnKey::offset(position, offset))?;
                }
                ColumnKind::FixedVector(size)
            }
            FeatureValue::Bool(_) | FeatureValue::Null => {
                return Err(FlattenError::UnsupportedType {
                    position,
                    found: value.type_name(),
                })
            }
        };
        kinds.push(kind);
    }

    Ok((Schema::from_kinds(kinds), columns))
}
