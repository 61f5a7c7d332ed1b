//! Bounds checks for 1-based column indexes.

use datalink_types::DataLinkError;

/// Check that every index lies in `[1, max_column]`.
///
/// Column 0 is the date axis and is never selectable.
///
/// # Errors
/// Returns [`DataLinkError::ColumnIndexOutOfRange`] naming the first offending index.
pub fn validate_column_indexes(
    indexes: &[i64],
    max_column: usize,
    context: &str,
) -> Result<(), DataLinkError> {
    check(indexes, Some(max_column), context)
}

/// Check only that every index is at least 1, for selections made before the
/// column count is known.
///
/// # Errors
/// Returns [`DataLinkError::ColumnIndexOutOfRange`] with `max: None` for the
/// first index below 1.
pub fn validate_lower_bounds(indexes: &[i64], context: &str) -> Result<(), DataLinkError> {
    check(indexes, None, context)
}

fn check(indexes: &[i64], max: Option<usize>, context: &str) -> Result<(), DataLinkError> {
    for &index in indexes {
        let above = max.is_some_and(|max| usize::try_from(index).is_ok_and(|i| i > max));
        if index < 1 || above {
            return Err(DataLinkError::ColumnIndexOutOfRange {
                context: context.to_string(),
                index,
                max,
            });
        }
    }
    Ok(())
}
