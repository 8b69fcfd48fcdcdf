//! Flattening of heterogeneous feature tuples.
//!
//! The pipeline, leaves first:
//!
//! - [`ColumnIndexMap`]: append-only mapping between `(position, sub-key)`
//!   and output columns
//! - [`SequenceValidator`]: checks and normalizes fixed-length numeric sequences
//! - [`infer_schema`]: classifies each position of the first tuple
//! - [`TupleValidator`]: checks a tuple against the frozen [`Schema`]
//! - [`grow_vocabulary`]: appends columns for newly seen categorical values
//! - [`RowMaterializer`]: turns validated tuples into dense or sparse rows
//! - [`FeatureFlattener`]: fit / transform / fit_transform on top of the above

mod column_map;
mod flattener;
mod materialize;
mod schema;
mod sequence;
mod validator;
mod vocabulary;

pub use column_map::{ColumnIndexMap, ColumnKey, ColumnMapError, SubKey};
pub use flattener::{FeatureFlattener, FittedFeatureFlattener, FlattenerParams};
pub use materialize::{for_each_entry, DenseMaterializer, RowMaterializer, SparseMaterializer};
pub use schema::{infer_schema, ColumnKind, Schema};
pub use sequence::SequenceValidator;
pub use validator::{NormalizedTuple, NormalizedValue, TupleValidator};
pub use vocabulary::grow_vocabulary;
