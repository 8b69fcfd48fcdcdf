//! # featureforge
//!
//! Flatten heterogeneous feature tuples into numeric matrices.
//!
//! A feature tuple is an ordered, fixed-shape mix of numbers, categorical
//! strings and fixed-length numeric vectors. [`FeatureFlattener`] learns from a
//! representative dataset how each position maps to output columns (one-hot
//! encoding the strings) and then converts new tuples of the same shape into
//! dense [`ndarray::Array2`] or sparse [`CsrMatrix`] rows.
//!
//! ## Core Design Principles
//!
//! - **Stateful Type Safety**: learning and inference live on different types
//!   ([`FeatureFlattener`] vs [`FittedFeatureFlattener`]), so a fitted
//!   flattener cannot be re-fitted in place.
//! - **Frozen Layout**: the schema and column mapping are fixed at fit time;
//!   output width never depends on the data being transformed.
//! - **Serializable**: fitted flatteners export plain parameters and can be
//!   saved to and loaded from disk.
//!
//! ## Quick Start
//!
//! ```rust
//! use featureforge::feature_tuple;
//! use featureforge::{FeatureFlattener, FittedTransformer, Transformer};
//!
//! let data = vec![
//!     feature_tuple![1, "a", [1.0, 2.0]],
//!     feature_tuple![2.5, "b", [3.0, 4.0]],
//! ];
//!
//! let fitted = FeatureFlattener::new().with_sparse(false).fit(&data)?;
//! let matrix = fitted.transform(&data)?.into_dense();
//! assert_eq!(matrix.row(0).to_vec(), vec![1.0, 1.0, 2.0, 1.0, 0.0]);
//! assert_eq!(matrix.row(1).to_vec(), vec![2.5, 3.0, 4.0, 0.0, 1.0]);
//! # Ok::<(), featureforge::FlattenError>(())
//! ```
//!
//! ## Logging
//!
//! The crate emits [`tracing`] events (fit/transform summaries at `info`, new
//! categorical columns at `debug`, rejected tuples at `warn`) and never
//! installs a subscriber itself.

pub mod matrix;
pub mod preprocessing;
pub mod serialization;

pub use matrix::{CsrMatrix, FeatureMatrix};
pub use preprocessing::{
    tuple_from_json, FeatureFlattener, FeatureTuple, FeatureValue, FittedFeatureFlattener,
    FittedTransformer, FlattenError, Transformer,
};
pub use serialization::SerializableParams;
