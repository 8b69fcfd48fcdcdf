//! Input values for feature tuples.
//!
//! A feature tuple is an ordered row of [`FeatureValue`]s. Three shapes of
//! value are meaningful to the flattener:
//!
//! ```text
//! (
//!     3,            // any int or float      -> one numeric column
//!     "value",      // any string            -> one-hot encoded
//!     [1.0, 5.0],   // list/array of numbers -> one column per element
//! )
//! ```
//!
//! Booleans and nulls can be represented (JSON sources produce them) but are
//! rejected as unsupported feature types.

use ndarray::{Array1, ArrayD};

use crate::preprocessing::error::{FlattenError, SchemaMismatch};

/// A single dynamically-typed value inside a feature tuple.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    /// Integer number; flattened as `f64`.
    Int(i64),
    /// Floating point number.
    Float(f64),
    /// Categorical value, one-hot encoded.
    Str(String),
    /// List or tuple of values; every element must be numeric.
    Seq(Vec<FeatureValue>),
    /// N-dimensional float array, flattened in logical (row-major) order.
    Array(ArrayD<f64>),
    /// Boolean; not a supported feature type.
    Bool(bool),
    /// Missing value; not a supported feature type.
    Null,
}

/// One input row.
pub type FeatureTuple = Vec<FeatureValue>;

impl FeatureValue {
    /// Short human-readable name of the value's type, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            FeatureValue::Int(_) => "int",
            FeatureValue::Float(_) => "float",
            FeatureValue::Str(_) => "string",
            FeatureValue::Seq(_) => "sequence",
            FeatureValue::Array(_) => "array",
            FeatureValue::Bool(_) => "bool",
            FeatureValue::Null => "null",
        }
    }

    /// The value as `f64` if it is a number.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    /// The value as a string slice if it is categorical.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FeatureValue::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn is_number(&self) -> bool {
        matches!(self, FeatureValue::Int(_) | FeatureValue::Float(_))
    }

    pub fn is_sequence_like(&self) -> bool {
        matches!(self, FeatureValue::Seq(_) | FeatureValue::Array(_))
    }
}

impl From<i32> for FeatureValue {
    fn from(v: i32) -> Self {
        FeatureValue::Int(v.into())
    }
}

impl From<i64> for FeatureValue {
    fn from(v: i64) -> Self {
        FeatureValue::Int(v)
    }
}

impl From<u32> for FeatureValue {
    fn from(v: u32) -> Self {
        FeatureValue::Int(v.into())
    }
}

impl From<f32> for FeatureValue {
    fn from(v: f32) -> Self {
        FeatureValue::Float(v.into())
    }
}

impl From<f64> for FeatureValue {
    fn from(v: f64) -> Self {
        FeatureValue::Float(v)
    }
}

impl From<bool> for FeatureValue {
    fn from(v: bool) -> Self {
        FeatureValue::Bool(v)
    }
}

impl From<&str> for FeatureValue {
    fn from(v: &str) -> Self {
        FeatureValue::Str(v.to_string())
    }
}

impl From<String> for FeatureValue {
    fn from(v: String) -> Self {
        FeatureValue::Str(v)
    }
}

impl From<Vec<f64>> for FeatureValue {
    fn from(v: Vec<f64>) -> Self {
        FeatureValue::Seq(v.into_iter().map(FeatureValue::Float).collect())
    }
}

impl From<Vec<i64>> for FeatureValue {
    fn from(v: Vec<i64>) -> Self {
        FeatureValue::Seq(v.into_iter().map(FeatureValue::Int).collect())
    }
}

impl From<Vec<FeatureValue>> for FeatureValue {
    fn from(v: Vec<FeatureValue>) -> Self {
        FeatureValue::Seq(v)
    }
}

impl<const N: usize> From<[f64; N]> for FeatureValue {
    fn from(v: [f64; N]) -> Self {
        FeatureValue::Seq(v.into_iter().map(FeatureValue::Float).collect())
    }
}

impl From<Array1<f64>> for FeatureValue {
    fn from(v: Array1<f64>) -> Self {
        FeatureValue::Array(v.into_dyn())
    }
}

impl From<ArrayD<f64>> for FeatureValue {
    fn from(v: ArrayD<f64>) -> Self {
        FeatureValue::Array(v)
    }
}

/// Build a [`FeatureTuple`] from values convertible into [`FeatureValue`].
///
/// ```
/// use featureforge::feature_tuple;
/// use featureforge::preprocessing::FeatureValue;
///
/// let row = feature_tuple![1, "a", [1.0, 2.0]];
/// assert_eq!(row[1], FeatureValue::Str("a".to_string()));
/// ```
#[macro_export]
macro_rules! feature_tuple {
    () => {
        ::std::vec::Vec::<$crate::preprocessing::FeatureValue>::new()
    };
    ($($value:expr),+ $(,)?) => {
        ::std::vec![$($crate::preprocessing::FeatureValue::from($value)),+]
    };
}

/// Convert one JSON document into a feature tuple.
///
/// The document must be a JSON array; each element becomes one position.
/// Objects are not feature values: at the top level they are reported as
/// unsupported, nested inside a sequence they become [`FeatureValue::Null`]
/// and are rejected later as non-numeric elements.
pub fn tuple_from_json(value: &serde_json::Value) -> Result<FeatureTuple, FlattenError> {
    let items = match value {
        serde_json::Value::Array(items) => items,
        other => {
            return Err(SchemaMismatch::NotATuple {
                found: json_type_name(other),
            }
            .into())
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(position, item)| match item {
            serde_json::Value::Object(_) => Err(FlattenError::UnsupportedType {
                position,
                found: "object",
            }),
            other => Ok(value_from_json(other)),
        })
        .collect()
}

fn value_from_json(value: &serde_json::Value) -> FeatureValue {
    match value {
        serde_json::Value::Null | serde_json::Value::Object(_) => FeatureValue::Null,
        serde_json::Value::Bool(b) => FeatureValue::Bool(*b),
        serde_json::Value::Number(n) => match n.as_i64() {
            Some(i) => FeatureValue::Int(i),
            None => FeatureValue::Float(n.as_f64().unwrap_or(f64::NAN)),
        },
        serde_json::Value::String(s) => FeatureValue::Str(s.clone()),
        serde_json::Value::Array(items) => {
            FeatureValue::Seq(items.iter().map(value_from_json).collect())
        }
    }
}

fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use serde_json::json;

    #[test]
    fn test_feature_tuple_macro() {
        let row = crate::feature_tuple![1, 2.5, "a", [1.0, 2.0]];
        assert_eq!(row.len(), 4);
        assert_eq!(row[0], FeatureValue::Int(1));
        assert_eq!(row[1], FeatureValue::Float(2.5));
        assert_eq!(row[2], FeatureValue::Str("a".to_string()));
        assert_eq!(
            row[3],
            FeatureValue::Seq(vec![FeatureValue::Float(1.0), FeatureValue::Float(2.0)])
        );
    }

    #[test]
    fn test_feature_tuple_macro_empty() {
        let row: FeatureTuple = crate::feature_tuple![];
        assert!(row.is_empty());
    }

    #[test]
    fn test_as_number() {
        assert_eq!(FeatureValue::Int(3).as_number(), Some(3.0));
        assert_eq!(FeatureValue::Float(-1.5).as_number(), Some(-1.5));
        assert_eq!(FeatureValue::from("3").as_number(), None);
        assert_eq!(FeatureValue::Bool(true).as_number(), None);
    }

    #[test]
    fn test_type_names() {
        assert_eq!(FeatureValue::from(vec![1i64]).type_name(), "sequence");
        assert_eq!(FeatureValue::from(array![1.0, 2.0]).type_name(), "array");
        assert_eq!(FeatureValue::Null.type_name(), "null");
        assert!(FeatureValue::from(array![1.0]).is_sequence_like());
        assert!(!FeatureValue::from("x").is_sequence_like());
    }

    #[test]
    fn test_tuple_from_json() {
        let row = tuple_from_json(&json!([1, 2.5, "red", [1, 2.0], true, null])).unwrap();
        assert_eq!(
            row,
            vec![
                FeatureValue::Int(1),
                FeatureValue::Float(2.5),
                FeatureValue::Str("red".to_string()),
                FeatureValue::Seq(vec![FeatureValue::Int(1), FeatureValue::Float(2.0)]),
                FeatureValue::Bool(true),
                FeatureValue::Null,
            ]
        );
    }

    #[test]
    fn test_tuple_from_json_not_array() {
        let err = tuple_from_json(&json!({"a": 1})).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::NotATuple { found: "object" })
        ));
    }

    #[test]
    fn test_tuple_from_json_object_element() {
        let err = tuple_from_json(&json!([1, {"a": 1}])).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::UnsupportedType {
                position: 1,
                found: "object"
            }
        ));
    }

    #[test]
    fn test_tuple_from_json_nested_object_becomes_null() {
        let row = tuple_from_json(&json!([[1, {"a": 1}]])).unwrap();
        assert_eq!(
            row[0],
            FeatureValue::Seq(vec![FeatureValue::Int(1), FeatureValue::Null])
        );
    }
}
