//! Feature tuple preprocessing.
//!
//! Turns ordered tuples of mixed values (numbers, categorical strings and
//! fixed-length numeric sequences) into a numeric matrix, following the same
//! fitted/unfitted split as the rest of the crate.
//!
//! # Core Traits
//!
//! - [`Transformer`]: Unfitted transformer holding configuration
//! - [`FittedTransformer`]: Fitted transformer ready for inference and persistence
//!
//! # Example
//!
//! ```
//! use featureforge::feature_tuple;
//! use featureforge::preprocessing::{FeatureFlattener, FittedTransformer, Transformer};
//!
//! let train = vec![
//!     feature_tuple![1, "red", [0.5, 1.5]],
//!     feature_tuple![2, "blue", [2.5, 3.5]],
//! ];
//!
//! let (fitted, matrix) = FeatureFlattener::new().fit_transform(&train)?;
//! assert_eq!(matrix.shape(), (2, 5));
//! assert_eq!(
//!     fitted.feature_names(),
//!     vec!["x0", "x2[0]", "x2[1]", "x1=red", "x1=blue"]
//! );
//!
//! // Unseen categories leave their indicator columns at zero.
//! let test = fitted.transform([feature_tuple![3, "green", [0.0, 1.0]]])?;
//! assert_eq!(test.to_dense().row(0).to_vec(), vec![3.0, 0.0, 1.0, 0.0, 0.0]);
//! # Ok::<(), featureforge::preprocessing::FlattenError>(())
//! ```

pub mod error;
pub mod flattener;
pub mod traits;
pub mod value;

// Re-export main types
pub use error::{FlattenError, SchemaMismatch, SequenceError};
pub use flattener::{
    ColumnIndexMap, ColumnKey, ColumnKind, FeatureFlattener, FittedFeatureFlattener,
    FlattenerParams, Schema, SubKey,
};
pub use traits::{FittedTransformer, Transformer};
pub use value::{tuple_from_json, FeatureTuple, FeatureValue};
