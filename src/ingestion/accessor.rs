//! Alias-Resolving Column Accessor - finds a field's column in a named source

use arrow::array::ArrayRef;
use arrow::record_batch::RecordBatch;
use tracing::trace;

use crate::error::{TableError, TableResult};
use crate::metadata::ResolvedField;
use crate::storage::ColumnarBatch;

/// Anything that hands out columns (or cells) by name
pub trait ColumnSource {
    type Column;

    /// Names the source can supply, for diagnostics and name validation
    fn column_names(&self) -> Vec<String>;

    /// Take the column stored under `name`, if any
    fn take_column(&mut self, name: &str) -> Option<Self::Column>;
}

impl ColumnSource for &RecordBatch {
    type Column = ArrayRef;

    fn column_names(&self) -> Vec<String> {
        self.schema().fields().iter().map(|f| f.name().clone()).collect()
    }

    fn take_column(&mut self, name: &str) -> Option<ArrayRef> {
        self.column_by_name(name).cloned()
    }
}

impl ColumnSource for &ColumnarBatch {
    type Column = ArrayRef;

    fn column_names(&self) -> Vec<String> {
        ColumnarBatch::column_names(self)
            .into_iter()
            .map(str::to_string)
            .collect()
    }

    fn take_column(&mut self, name: &str) -> Option<ArrayRef> {
        self.column_by_name(name).cloned()
    }
}

/// Fetch the column for `field`: primary name first, then each alias in order
///
/// Alias attempts only happen after the primary lookup misses, and the first
/// alias that hits wins. If nothing matches, the error describes the primary
/// name and what the source did offer.
pub fn must_get_column<S: ColumnSource>(
    source: &mut S,
    field: &ResolvedField,
    expected: &str,
) -> TableResult<S::Column> {
    if let Some(column) = source.take_column(field.column_name()) {
        return Ok(column);
    }

    for alias in field.aliases() {
        if let Some(column) = source.take_column(alias) {
            trace!("Column '{}' resolved through alias '{}'", field.column_name(), alias);
            return Ok(column);
        }
    }

    Err(TableError::column(
        field.column_name(),
        expected,
        format!("{:?}", source.column_names()),
    ))
}
