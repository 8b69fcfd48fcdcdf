//! Validation of fixed-length numeric sequences.

use ndarray::Array1;

use crate::preprocessing::error::SequenceError;
use crate::preprocessing::value::FeatureValue;

/// Checks that a value is a non-empty numeric sequence, optionally of a
/// fixed length, and normalizes it to an `f64` array.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequenceValidator {
    size: Option<usize>,
}

impl SequenceValidator {
    /// Accepts sequences of any (non-zero) length.
    pub fn unconstrained() -> Self {
        Self { size: None }
    }

    /// Accepts sequences of exactly `size` elements.
    pub fn with_size(size: usize) -> Self {
        Self { size: Some(size) }
    }

    /// Freeze the size from an example value.
    ///
    /// The example itself is validated without a size constraint first.
    pub fn from_example(example: &FeatureValue) -> Result<Self, SequenceError> {
        let normalized = Self::unconstrained().validate(example)?;
        Ok(Self::with_size(normalized.len()))
    }

    pub fn size(&self) -> Option<usize> {
        self.size
    }

    pub fn validate(&self, value: &FeatureValue) -> Result<Array1<f64>, SequenceError> {
        match value {
            FeatureValue::Seq(items) => {
                self.check_len(items.len())?;
                let numbers = items
                    .iter()
                    .enumerate()
                    .map(|(index, item)| {
                        item.as_number().ok_or(SequenceError::NonNumeric {
                            index,
                            found: item.type_name(),
                        })
                    })
                    .collect::<Result<Vec<f64>, _>>()?;
                Ok(Array1::from(numbers))
            }
            // Multi-dimensional arrays are raveled.
            FeatureValue::Array(array) => {
                self.check_len(array.len())?;
                Ok(array.iter().copied().collect())
            }
            other => Err(SequenceError::NotSequence {
                found: other.type_name(),
            }),
        }
    }

    fn check_len(&self, len: usize) -> Result<(), SequenceError> {
        if len == 0 {
            return Err(SequenceError::Empty);
        }
        match self.size {
            Some(expected) if expected != len => Err(SequenceError::LengthMismatch {
                expected,
                got: len,
            }),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_validate_list_of_numbers() {
        let value = FeatureValue::from(vec![1i64, 5, 9]);
        let out = SequenceValidator::unconstrained().validate(&value).unwrap();
        assert_eq!(out, array![1.0, 5.0, 9.0]);
    }

    #[test]
    fn test_validate_mixed_int_and_float() {
        let value = FeatureValue::Seq(vec![FeatureValue::Int(2), FeatureValue::Float(0.5)]);
        let out = SequenceValidator::with_size(2).validate(&value).unwrap();
        assert_eq!(out, array![2.0, 0.5]);
    }

    #[test]
    fn test_validate_ravels_arrays() {
        let matrix = Array2::from_shape_vec((2, 2), vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        let value = FeatureValue::Array(matrix.into_dyn());
        let out = SequenceValidator::with_size(4).validate(&value).unwrap();
        assert_eq!(out, array![1.0, 2.0, 3.0, 4.0]);
    }

    #[test]
    fn test_rejects_scalars_and_strings() {
        let validator = SequenceValidator::unconstrained();
        assert_eq!(
            validator.validate(&FeatureValue::Int(1)),
            Err(SequenceError::NotSequence { found: "int" })
        );
        assert_eq!(
            validator.validate(&FeatureValue::from("abc")),
            Err(SequenceError::NotSequence { found: "string" })
        );
    }

    #[test]
    fn test_rejects_empty_before_length() {
        let validator = SequenceValidator::with_size(3);
        assert_eq!(
            validator.validate(&FeatureValue::Seq(vec![])),
            Err(SequenceError::Empty)
        );
        let empty = FeatureValue::Array(ndarray::ArrayD::zeros(ndarray::IxDyn(&[0])));
        assert_eq!(validator.validate(&empty), Err(SequenceError::Empty));
    }

    #[test]
    fn test_rejects_length_mismatch() {
        let validator = SequenceValidator::with_size(3);
        assert_eq!(
            validator.validate(&FeatureValue::from(vec![1.0, 2.0])),
            Err(SequenceError::LengthMismatch {
                expected: 3,
                got: 2
            })
        );
    }

    #[test]
    fn test_rejects_non_numeric_element() {
        let value = FeatureValue::Seq(vec![FeatureValue::Int(1), FeatureValue::from("x")]);
        assert_eq!(
            SequenceValidator::unconstrained().validate(&value),
            Err(SequenceError::NonNumeric {
                index: 1,
                found: "string"
            })
        );
    }

    #[test]
    fn test_from_example_freezes_size() {
        let validator =
            SequenceValidator::from_example(&FeatureValue::from([1.0, 2.0, 3.0])).unwrap();
        assert_eq!(validator.size(), Some(3));
        assert!(validator
            .validate(&FeatureValue::from([4.0, 5.0, 6.0]))
            .is_ok());
        assert!(validator.validate(&FeatureValue::from([4.0])).is_err());
    }

    #[test]
    fn test_from_example_rejects_invalid_example() {
        assert_eq!(
            SequenceValidator::from_example(&FeatureValue::Seq(vec![])),
            Err(SequenceError::Empty)
        );
    }
}
