//! Error types for flattening operations.

use thiserror::Error;

/// Why a value failed sequence validation.
///
/// The position of the offending value is not known at this level; the
/// tuple validator attaches it when converting into [`FlattenError`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SequenceError {
    /// The value is a scalar or a string where a sequence was expected.
    #[error("sequence is not a list, tuple or array (got {found})")]
    NotSequence { found: &'static str },
    /// Sequences must hold at least one element.
    #[error("expecting a non-empty sequence")]
    Empty,
    /// The sequence length differs from the size fixed at fit time.
    #[error("expecting sequence length {expected} but got {got}")]
    LengthMismatch { expected: usize, got: usize },
    /// An element of the sequence is not a number.
    #[error("values in sequence are expected to be numeric, element {index} is {found}")]
    NonNumeric { index: usize, found: &'static str },
}

/// The different ways a tuple can disagree with the fitted schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaMismatch {
    /// The input row is not a tuple at all.
    #[error("expecting tuple, got {found}")]
    NotATuple { found: &'static str },
    /// The tuple has a different number of positions than the fitted schema.
    #[error("expecting a tuple of size {expected}, but got {got}")]
    TupleLength { expected: usize, got: usize },
    /// The value at a position has a different type than at fit time.
    #[error("position {position}: expecting {expected}, got {found}")]
    Kind {
        position: usize,
        expected: &'static str,
        found: &'static str,
    },
    /// A fixed-size vector position received a sequence of another length.
    #[error("position {position}: expecting sequence length {expected} but got {got}")]
    SequenceLength {
        position: usize,
        expected: usize,
        got: usize,
    },
}

/// Error type for flattening operations.
#[derive(Debug, Error)]
pub enum FlattenError {
    /// The dataset yielded no tuples during fit.
    #[error("cannot fit with an empty dataset")]
    EmptyDataset,
    /// The first tuple of the dataset has no positions.
    #[error("cannot fit with empty feature tuples")]
    EmptyFeatures,
    /// A value is neither a number, a string nor a numeric sequence.
    #[error("unsupported feature type at position {position}: {found}")]
    UnsupportedType { position: usize, found: &'static str },
    /// The tuple does not match the schema inferred at fit time.
    #[error("schema mismatch: {0}")]
    SchemaMismatch(#[from] SchemaMismatch),
    /// A sequence is empty or holds non-numeric elements.
    #[error("invalid sequence at position {position}: {reason}")]
    InvalidSequence {
        position: usize,
        reason: SequenceError,
    },
    /// Fitted state (or parameters restoring it) violates the column layout.
    #[error("inconsistent fitted state: {0}")]
    InconsistentState(String),
    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(String),
}

impl FlattenError {
    /// Attach a tuple position to a sequence validation failure.
    ///
    /// Shape problems (not a sequence, wrong length) are schema mismatches;
    /// content problems (empty, non-numeric) are invalid sequences.
    pub fn from_sequence(position: usize, err: SequenceError) -> Self {
        match err {
            SequenceError::NotSequence { found } => SchemaMismatch::Kind {
                position,
                expected: "sequence",
                found,
            }
            .into(),
            SequenceError::LengthMismatch { expected, got } => SchemaMismatch::SequenceLength {
                position,
                expected,
                got,
            }
            .into(),
            reason @ (SequenceError::Empty | SequenceError::NonNumeric { .. }) => {
                FlattenError::InvalidSequence { position, reason }
            }
        }
    }

    /// Whether this error reports a bad input value rather than a
    /// persistence or internal-state problem.
    pub fn is_value_error(&self) -> bool {
        matches!(
            self,
            FlattenError::EmptyDataset
                | FlattenError::EmptyFeatures
                | FlattenError::UnsupportedType { .. }
                | FlattenError::SchemaMismatch(_)
                | FlattenError::InvalidSequence { .. }
        )
    }
}

impl From<std::io::Error> for FlattenError {
    fn from(err: std::io::Error) -> Self {
        FlattenError::Io(err.to_string())
    }
}

impl From<bincode::Error> for FlattenError {
    fn from(err: bincode::Error) -> Self {
        FlattenError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_dataset() {
        let err = FlattenError::EmptyDataset;
        assert!(err.to_string().contains("empty dataset"));
    }

    #[test]
    fn test_error_display_tuple_length() {
        let err: FlattenError = SchemaMismatch::TupleLength {
            expected: 2,
            got: 3,
        }
        .into();
        let msg = err.to_string();
        assert!(msg.contains("schema mismatch"));
        assert!(msg.contains("size 2"));
        assert!(msg.contains("got 3"));
    }

    #[test]
    fn test_error_display_unsupported_type() {
        let err = FlattenError::UnsupportedType {
            position: 4,
            found: "bool",
        };
        assert!(err.to_string().contains("position 4"));
        assert!(err.to_string().contains("bool"));
    }

    #[test]
    fn test_sequence_shape_errors_are_schema_mismatches() {
        let err = FlattenError::from_sequence(1, SequenceError::NotSequence { found: "string" });
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::Kind { position: 1, .. })
        ));

        let err = FlattenError::from_sequence(
            2,
            SequenceError::LengthMismatch {
                expected: 3,
                got: 2,
            },
        );
        assert!(matches!(
            err,
            FlattenError::SchemaMismatch(SchemaMismatch::SequenceLength {
                position: 2,
                expected: 3,
                got: 2
            })
        ));
    }

    #[test]
    fn test_sequence_content_errors_are_invalid_sequences() {
        let err = FlattenError::from_sequence(0, SequenceError::Empty);
        assert!(matches!(
            err,
            FlattenError::InvalidSequence {
                position: 0,
                reason: SequenceError::Empty
            }
        ));

        let err = FlattenError::from_sequence(
            3,
            SequenceError::NonNumeric {
                index: 1,
                found: "string",
            },
        );
        assert!(matches!(err, FlattenError::InvalidSequence { position: 3, .. }));
    }

    #[test]
    fn test_is_value_error() {
        assert!(FlattenError::EmptyDataset.is_value_error());
        assert!(FlattenError::EmptyFeatures.is_value_error());
        assert!(FlattenError::from_sequence(0, SequenceError::Empty).is_value_error());
        assert!(!FlattenError::Io("gone".to_string()).is_value_error());
        assert!(!FlattenError::InconsistentState("bad".to_string()).is_value_error());
    }

    #[test]
    fn test_error_from_io_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "test");
        let err: FlattenError = io_err.into();
        assert!(matches!(err, FlattenError::Io(_)));
    }

    #[test]
    fn test_error_from_bincode_error() {
        let bad_bytes: &[u8] = &[0xff, 0xff, 0xff, 0xff];
        let bincode_result: Result<String, bincode::Error> = bincode::deserialize(bad_bytes);
        if let Err(e) = bincode_result {
            let err: FlattenError = e.into();
            assert!(matches!(err, FlattenError::Serialization(_)));
        }
    }

    #[test]
    fn test_error_is_std_error() {
        let err = FlattenError::EmptyFeatures;
        let _: &dyn std::error::Error = &err;
    }
}
