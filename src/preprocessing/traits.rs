//! Core traits for tuple transformers.
//!
//! This module defines the two central traits:
//! - [`Transformer`]: Used during fitting; holds configuration and learns from data.
//! - [`FittedTransformer`]: After fitting; ready for transformation and serialization.
//!
//! Fitting consumes the configuration by reference and returns a separate
//! fitted value, so learned state can never be re-fitted in place: to learn
//! from new data, fit the (unchanged) configuration again.

use crate::preprocessing::error::FlattenError;
use crate::preprocessing::value::FeatureValue;
use crate::serialization::SerializableParams;

/// Trait for unfitted transformers.
///
/// Datasets are any iterable of rows, where a row is anything that can be
/// viewed as a slice of [`FeatureValue`]s (`Vec<FeatureValue>`, arrays,
/// slices, ...). Iterators that cannot be restarted are fine: both methods
/// make exactly one pass.
///
/// # Example
/// ```
/// use featureforge::feature_tuple;
/// use featureforge::preprocessing::{FeatureFlattener, FittedTransformer, Transformer};
///
/// let data = vec![feature_tuple![1, "a"], feature_tuple![2, "b"]];
/// let fitted = FeatureFlattener::new().fit(&data)?;
/// let matrix = fitted.transform(&data)?;
/// assert_eq!(matrix.shape(), (2, 3));
/// # Ok::<(), featureforge::preprocessing::FlattenError>(())
/// ```
pub trait Transformer: Clone {
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;
    /// The fitted transformer type ready for inference.
    type Fitted: FittedTransformer<Params = Self::Params, Output = Self::Output>;

    /// Learn the fitted state from a dataset.
    ///
    /// # Errors
    /// Returns [`FlattenError`] if:
    /// - The dataset is empty
    /// - Any tuple fails validation
    fn fit<I>(&self, data: I) -> Result<Self::Fitted, FlattenError>
    where
        I: IntoIterator,
        I::Item: AsRef<[FeatureValue]>;

    /// Fit and transform in one pass over the data.
    ///
    /// Produces the same matrix as `fit` followed by `transform` on the same
    /// data, and also returns the fitted transformer.
    fn fit_transform<I>(&self, data: I) -> Result<(Self::Fitted, Self::Output), FlattenError>
    where
        I: IntoIterator,
        I::Item: AsRef<[FeatureValue]>;
}

/// Trait for fitted transformers ready for inference.
///
/// # Guarantees
/// - `extract_params()` + `from_params()` is a round-trip.
/// - `transform` never mutates the learned state, so a fitted transformer
///   can be shared between threads.
pub trait FittedTransformer: Clone + Sized {
    /// Output data type after transformation.
    type Output;
    /// Serializable representation of learned parameters.
    type Params: SerializableParams;

    /// Transform a dataset using the learned state.
    ///
    /// # Errors
    /// Returns [`FlattenError`] on the first tuple that does not match the
    /// learned schema; no partial output is returned.
    fn transform<I>(&self, data: I) -> Result<Self::Output, FlattenError>
    where
        I: IntoIterator,
        I::Item: AsRef<[FeatureValue]>;

    /// Extract learned parameters as a serializable representation.
    fn extract_params(&self) -> Self::Params;

    /// Reconstruct a fitted transformer from parameters.
    fn from_params(params: Self::Params) -> Result<Self, FlattenError>;

    /// Save the fitted transformer to a file.
    fn save_to_file<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), FlattenError> {
        let bytes = self
            .extract_params()
            .to_bytes()
            .map_err(|e| FlattenError::Serialization(e.to_string()))?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a fitted transformer from a file.
    fn load_from_file<P: AsRef<std::path::Path>>(path: P) -> Result<Self, FlattenError> {
        let bytes = std::fs::read(path)?;
        let params = Self::Params::from_bytes(&bytes)
            .map_err(|e| FlattenError::Serialization(e.to_string()))?;
        Self::from_params(params)
    }

    /// Returns the tuple size seen during fit.
    fn n_features_in(&self) -> usize;

    /// Returns the number of output columns.
    fn n_features_out(&self) -> usize;
}
