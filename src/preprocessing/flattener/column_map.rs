//! Append-only mapping between tuple positions and output columns.

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::preprocessing::error::FlattenError;

/// Second half of a column key: what inside a tuple position a column holds.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SubKey {
    /// The single column of a numeric position.
    Scalar,
    /// The indicator column for one categorical value.
    Category(String),
    /// One element of a fixed-size vector position.
    Offset(usize),
}

/// Identifies one output column: a tuple position plus a sub-key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ColumnKey {
    pub position: usize,
    pub sub_key: SubKey,
}

impl ColumnKey {
    pub fn scalar(position: usize) -> Self {
        Self {
            position,
            sub_key: SubKey::Scalar,
        }
    }

    pub fn category(position: usize, value: impl Into<String>) -> Self {
        Self {
            position,
            sub_key: SubKey::Category(value.into()),
        }
    }

    pub fn offset(position: usize, offset: usize) -> Self {
        Self {
            position,
            sub_key: SubKey::Offset(offset),
        }
    }

    pub fn is_category(&self) -> bool {
        matches!(self.sub_key, SubKey::Category(_))
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.sub_key {
            SubKey::Scalar => write!(f, "x{}", self.position),
            SubKey::Category(value) => write!(f, "x{}={}", self.position, value),
            SubKey::Offset(offset) => write!(f, "x{}[{}]", self.position, offset),
        }
    }
}

/// Registration failures. These only arise from inconsistent input to
/// [`ColumnIndexMap::insert`], e.g. when restoring persisted parameters.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ColumnMapError {
    #[error("position {position} already holds columns of another kind")]
    KindConflict { position: usize },
    #[error("position {position}: offset {offset} is not contiguous with earlier offsets")]
    NonContiguous { position: usize, offset: usize },
}

impl From<ColumnMapError> for FlattenError {
    fn from(err: ColumnMapError) -> Self {
        FlattenError::InconsistentState(err.to_string())
    }
}

/// Columns owned by one tuple position.
#[derive(Debug, Clone)]
enum PositionColumns {
    Scalar(usize),
    /// `len` contiguous columns starting at `start`, ordered by offset.
    Vector { start: usize, len: usize },
    Categories(HashMap<String, usize>),
}

/// Ordered bijection between [`ColumnKey`]s and dense column indices.
///
/// Columns are numbered `0..len()` in registration order with no gaps and are
/// never removed. `keys` is the column -> key direction, `positions` the
/// key -> column lookup, grouped by tuple position so categorical lookups can
/// borrow a `&str` instead of building a key.
#[derive(Debug, Clone, Default)]
pub struct ColumnIndexMap {
    keys: Vec<ColumnKey>,
    positions: HashMap<usize, PositionColumns>,
}

impl ColumnIndexMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of registered columns.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// All keys, ordered by column index.
    pub fn keys(&self) -> &[ColumnKey] {
        &self.keys
    }

    /// Key of the given column.
    pub fn key(&self, column: usize) -> Option<&ColumnKey> {
        self.keys.get(column)
    }

    /// Column of the given key, if registered.
    pub fn get(&self, key: &ColumnKey) -> Option<usize> {
        match &key.sub_key {
            SubKey::Scalar => self.scalar(key.position),
            SubKey::Category(value) => self.category(key.position, value),
            SubKey::Offset(offset) => match self.vector(key.position) {
                Some((start, len)) if *offset < len => Some(start + offset),
                _ => None,
            },
        }
    }

    /// Column of a numeric position.
    pub fn scalar(&self, position: usize) -> Option<usize> {
        match self.positions.get(&position) {
            Some(PositionColumns::Scalar(column)) => Some(*column),
            _ => None,
        }
    }

    /// First column and length of a vector position.
    pub fn vector(&self, position: usize) -> Option<(usize, usize)> {
        match self.positions.get(&position) {
            Some(PositionColumns::Vector { start, len }) => Some((*start, *len)),
            _ => None,
        }
    }

    /// Column of one categorical value.
    pub fn category(&self, position: usize, value: &str) -> Option<usize> {
        match self.positions.get(&position) {
            Some(PositionColumns::Categories(values)) => values.get(value).copied(),
            _ => None,
        }
    }

    /// Categorical values of a position in column order.
    pub fn categories(&self, position: usize) -> Vec<&str> {
        self.keys
            .iter()
            .filter(|key| key.position == position)
            .filter_map(|key| match &key.sub_key {
                SubKey::Category(value) => Some(value.as_str()),
                _ => None,
            })
            .collect()
    }

    /// Register a key, returning its column.
    ///
    /// Registering an existing key is a no-op that returns the existing
    /// column. Vector offsets must be registered in ascending order with no
    /// other column in between, which keeps each vector contiguous.
    pub fn insert(&mut self, key: ColumnKey) -> Result<usize, ColumnMapError> {
        let next = self.keys.len();
        let position = key.position;
        let column = match (&key.sub_key, self.positions.get_mut(&position)) {
            (SubKey::Scalar, None) => {
                self.positions
                    .insert(position, PositionColumns::Scalar(next));
                next
            }
            (SubKey::Scalar, Some(PositionColumns::Scalar(column))) => return Ok(*column),
            (SubKey::Offset(0), None) => {
                self.positions
                    .insert(position, PositionColumns::Vector { start: next, len: 1 });
                next
            }
            (SubKey::Offset(offset), None) => {
                return Err(ColumnMapError::NonContiguous {
                    position,
                    offset: *offset,
                })
            }
            (SubKey::Offset(offset), Some(PositionColumns::Vector { start, len })) => {
                if *offset < *len {
                    return Ok(*start + offset);
                }
                if *offset != *len || *start + *len != next {
                    return Err(ColumnMapError::NonContiguous {
                        position,
                        offset: *offset,
                    });
                }
                *len += 1;
                next
            }
            (SubKey::Category(value), None) => {
                let values = HashMap::from([(value.clone(), next)]);
                self.positions
                    .insert(position, PositionColumns::Categories(values));
                next
            }
            (SubKey::Category(value), Some(PositionColumns::Categories(values))) => {
                if let Some(column) = values.get(value.as_str()) {
                    return Ok(*column);
                }
                values.insert(value.clone(), next);
                next
            }
            (_, Some(_)) => return Err(ColumnMapError::KindConflict { position }),
        };
        self.keys.push(key);
        Ok(column)
    }

    /// Register a categorical value, returning the column only if it is new.
    ///
    /// Avoids allocating a key when the value was seen before, which is the
    /// common case while scanning a fit dataset.
    pub fn insert_category(
        &mut self,
        position: usize,
        value: &str,
    ) -> Result<Option<usize>, ColumnMapError> {
        if self.category(position, value).is_some() {
            return Ok(None);
        }
        self.insert(ColumnKey::category(position, value)).map(Some)
    }
}
