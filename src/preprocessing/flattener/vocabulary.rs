//! Learning one-hot columns for categorical positions.

use tracing::debug;

use crate::preprocessing::error::FlattenError;
use crate::preprocessing::flattener::column_map::ColumnIndexMap;
use crate::preprocessing::flattener::schema::Schema;
use crate::preprocessing::flattener::validator::NormalizedValue;

/// Register every categorical value of a validated tuple that has not been
/// seen yet, appending one column per new value.
///
/// Returns how many columns were added. New columns always land after every
/// existing column, so rows materialized earlier stay valid once they are
/// zero-extended at the tail.
pub fn grow_vocabulary(
    schema: &Schema,
    columns: &mut ColumnIndexMap,
    tuple: &[NormalizedValue<'_>],
) -> Result<usize, FlattenError> {
    let mut added = 0;
    for position in schema.categorical_positions() {
        let Some(NormalizedValue::Category(value)) = tuple.get(position) else {
            return Err(FlattenError::InconsistentState(format!(
                "position {position} is categorical but the tuple holds no category there"
            )));
        };
        if let Some(column) = columns.insert_category(position, value)? {
            debug!(position, value = *value, column, "new categorical column");
            added += 1;
        }
    }
    Ok(added)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::feature_tuple;
    use crate::preprocessing::flattener::column_map::ColumnKey;
    use crate::preprocessing::flattener::schema::infer_schema;
    use crate::preprocessing::flattener::validator::TupleValidator;

    #[test]
    fn test_grow_appends_in_first_seen_order() {
        let rows = vec![
            feature_tuple!["b", 1, "x"],
            feature_tuple!["a", 2, "x"],
            feature_tuple!["b", 3, "y"],
        ];
        let (schema, mut columns) = infer_schema(&rows[0]).unwrap();
        let validator = TupleValidator::new(&schema);

        let mut added = Vec::new();
        for row in &rows {
            let normalized = validator.validate(row).unwrap();
            added.push(grow_vocabulary(&schema, &mut columns, &normalized).unwrap());
        }

        assert_eq!(added, vec![2, 1, 1]);
        assert_eq!(
            columns.keys(),
            &[
                ColumnKey::scalar(1),
                ColumnKey::category(0, "b"),
                ColumnKey::category(2, "x"),
                ColumnKey::category(0, "a"),
                ColumnKey::category(2, "y"),
            ]
        );
    }

    #[test]
    fn test_grow_is_idempotent() {
        let row = feature_tuple!["a", "b"];
        let (schema, mut columns) = infer_schema(&row).unwrap();
        let normalized = TupleValidator::new(&schema).validate(&row).unwrap();

        assert_eq!(grow_vocabulary(&schema, &mut columns, &normalized).unwrap(), 2);
        assert_eq!(grow_vocabulary(&schema, &mut columns, &normalized).unwrap(), 0);
        assert_eq!(columns.len(), 2);
    }

    #[test]
    fn test_grow_without_categorical_positions() {
        let row = feature_tuple![1, [1.0, 2.0]];
        let (schema, mut columns) = infer_schema(&row).unwrap();
        let normalized = TupleValidator::new(&schema).validate(&row).unwrap();
        assert_eq!(grow_vocabulary(&schema, &mut columns, &normalized).unwrap(), 0);
        assert_eq!(columns.len(), 3);
    }
}
