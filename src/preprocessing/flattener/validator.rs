//! Validation of incoming tuples against a fitted schema.

use ndarray::Array1;

use crate::preprocessing::error::{FlattenError, SchemaMismatch};
use crate::preprocessing::flattener::schema::{ColumnKind, Schema};
use crate::preprocessing::flattener::sequence::SequenceValidator;
use crate::preprocessing::value::FeatureValue;

/// A tuple value after validation: numbers widened to `f64`, sequences
/// normalized to arrays, categories borrowed from the input.
#[derive(Debug, Clone, PartialEq)]
pub enum NormalizedValue<'a> {
    Number(f64),
    Category(&'a str),
    Vector(Array1<f64>),
}

pub type NormalizedTuple<'a> = Vec<NormalizedValue<'a>>;

/// Checks tuples against the column kinds fixed at fit time.
///
/// Categorical positions accept any string; vocabulary membership is only
/// consulted when rows are materialized.
#[derive(Debug, Clone, Copy)]
pub struct TupleValidator<'s> {
    schema: &'s Schema,
}

impl<'s> TupleValidator<'s> {
    pub fn new(schema: &'s Schema) -> Self {
        Self { schema }
    }

    pub fn validate<'t>(&self, tuple: &'t [FeatureValue]) -> Result<NormalizedTuple<'t>, FlattenError> {
        if tuple.len() != self.schema.len() {
            return Err(SchemaMismatch::TupleLength {
                expected: self.schema.len(),
                got: tuple.len(),
            }
            .into());
        }

        tuple
            .iter()
            .zip(self.schema.kinds())
            .enumerate()
            .map(|(position, (value, kind))| validate_value(position, value, *kind))
            .collect()
    }
}

fn validate_value(
    position: usize,
    value: &FeatureValue,
    kind: ColumnKind,
) -> Result<NormalizedValue<'_>, FlattenError> {
    let mismatch = || -> FlattenError {
        SchemaMismatch::Kind {
            position,
            expected: kind.expected(),
            found: value.type_name(),
        }
        .into()
    };

    match kind {
        ColumnKind::Numeric => value
            .as_number()
            .map(NormalizedValue::Number)
            .ok_or_else(mismatch),
        ColumnKind::Categorical => value
            .as_str()
            .map(NormalizedValue::Category)
            .ok_or_else(mismatch),
        ColumnKind::FixedVector(size) => SequenceValidator::with_size(size)
            .validate(value)
            .map(NormalizedValue::Vector)
            .map_err(|err| FlattenError::from_sequence(position, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_tuple;
    use crate::preprocessing::error::SequenceError;
    use ndarray::array;

    fn schema() -> Schema {
        Schema::from_kinds(vec![
            ColumnKind::Numeric,
            ColumnKind::Categorical,
            ColumnKind::FixedVector(2),
        ])
    }

    #[test]
    fn test_validate_normalizes() {
        let schema = schema();
        let tuple = feature_tuple![3, "c", vec![5i64, 6]];
        let normalized = TupleValidator::new(&schema).validate(&tuple).unwrap();
        assert_eq!(
            normalized,
            vec![
                NormalizedValue::Number(3.0),
                NormalizedValue::Category("c"),
                NormalizedValue::Vector(array![5.0, 6.0]),
            ]
        );
    }

    #[test]
    fn test_validate_tuple_length() {
        let schema = schema();
        let err = TupleValidator::new(&schema)
            .validate(&feature_tuple![1, "a"])
            .unwrap_err();
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::TupleLength {
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_validate_kind_mismatch() {
        let schema = schema();
        let validator = TupleValidator::new(&schema);

        let err = validator
            .validate(&feature_tuple!["1", "a", [1.0, 2.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::Kind {
                position: 0,
                expected: "number",
                found: "string"
            })
        ));

        let err = validator
            .validate(&feature_tuple![1, 2, [1.0, 2.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::Kind { position: 1, .. })
        ));

        let err = validator.validate(&feature_tuple![1, "a", "b"]).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::Kind {
                position: 2,
                expected: "sequence",
                ..
            })
        ));
    }

    #[test]
    fn test_validate_vector_size() {
        let schema = schema();
        let err = TupleValidator::new(&schema)
            .validate(&feature_tuple![1, "a", [1.0, 2.0, 3.0]])
            .unwrap_err();
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::SequenceLength {
                position: 2,
                expected: 2,
                got: 3
            })
        ));
    }

    #[test]
    fn test_validate_empty_vector() {
        let schema = schema();
        let tuple = vec![
            FeatureValue::Int(1),
            FeatureValue::from("a"),
            FeatureValue::Seq(vec![]),
        ];
        let err = TupleValidator::new(&schema).validate(&tuple).unwrap_err();
        assert!(matches!(
            err,
            FlattenError::InvalidSequence {
                position: 2,
                reason: SequenceError::Empty
            }
        ));
    }

    #[test]
    fn test_validate_accepts_unseen_strings() {
        let schema = schema();
        let tuple = feature_tuple![1.5, "never seen before", [0.0, 0.0]];
        assert!(TupleValidator::new(&schema).validate(&tuple).is_ok());
    }
}
