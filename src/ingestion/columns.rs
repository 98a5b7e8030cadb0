//! Column-wise construction: from named columns and from an existing table

use arrow::array::ArrayRef;
use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

use super::accessor::{must_get_column, ColumnSource};
use super::cast::{cast_column, is_nested, values_to_column};
use crate::config::ConstructionConfig;
use crate::error::{TableError, TableResult};
use crate::metadata::{ResolvedField, SchemaRef};
use crate::storage::ColumnarBatch;
use crate::types::Value;

/// A column-like input value
pub enum ColumnLike {
    /// An Arrow array
    Array(ArrayRef),
    /// A finite list of cells
    List(Vec<Value>),
    /// A lazy sequence of cells, drained once
    Lazy(Box<dyn Iterator<Item = Value>>),
}

impl ColumnLike {
    /// Wrap any iterator of cell-convertible items as a lazy column
    pub fn lazy<I, V>(values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        I::IntoIter: 'static,
        V: Into<Value> + 'static,
    {
        ColumnLike::Lazy(Box::new(values.into_iter().map(Into::into)))
    }

    fn shape(&self) -> &'static str {
        match self {
            ColumnLike::Array(_) => "array",
            ColumnLike::List(_) => "list",
            ColumnLike::Lazy(_) => "lazy",
        }
    }
}

impl fmt::Debug for ColumnLike {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnLike::Array(a) => write!(f, "Array({:?}, len={})", a.data_type(), a.len()),
            ColumnLike::List(v) => write!(f, "List(len={})", v.len()),
            ColumnLike::Lazy(_) => write!(f, "Lazy"),
        }
    }
}

impl From<ArrayRef> for ColumnLike {
    fn from(array: ArrayRef) -> Self {
        ColumnLike::Array(array)
    }
}

impl<T: Into<Value>> From<Vec<T>> for ColumnLike {
    fn from(values: Vec<T>) -> Self {
        ColumnLike::List(values.into_iter().map(Into::into).collect())
    }
}

/// Named column input, in insertion order
///
/// Inserting a name twice replaces the earlier column.
#[derive(Debug, Default)]
pub struct NamedColumns {
    entries: IndexMap<String, ColumnLike>,
}

impl NamedColumns {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, column: impl Into<ColumnLike>) {
        self.entries.insert(name.into(), column.into());
    }

    /// Builder-style insert
    pub fn with(mut self, name: impl Into<String>, column: impl Into<ColumnLike>) -> Self {
        self.insert(name, column);
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn get(&self, name: &str) -> Option<&ColumnLike> {
        self.entries.get(name)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, C: Into<ColumnLike>> FromIterator<(K, C)> for NamedColumns {
    fn from_iter<I: IntoIterator<Item = (K, C)>>(iter: I) -> Self {
        let mut columns = NamedColumns::new();
        for (name, column) in iter {
            columns.insert(name, column);
        }
        columns
    }
}

impl ColumnSource for NamedColumns {
    type Column = ColumnLike;

    fn column_names(&self) -> Vec<String> {
        self.names().map(str::to_string).collect()
    }

    fn take_column(&mut self, name: &str) -> Option<ColumnLike> {
        self.entries.shift_remove(name)
    }
}

/// Expected-shape description for column input errors
pub fn allowed_repr(field: &ResolvedField) -> String {
    let typ = field.type_label();
    format!("(arrow::Array[{typ}] | Vec<Value[{typ}]> | Iterator<Value[{typ}]>)")
}

fn materialise(column: ColumnLike, field: &ResolvedField, strict: bool) -> TableResult<ArrayRef> {
    match column {
        ColumnLike::Array(array) => cast_column(&array, field, strict),
        ColumnLike::List(values) => values_to_column(&values, field, strict),
        ColumnLike::Lazy(iter) => {
            let values: Vec<Value> = iter.collect();
            values_to_column(&values, field, strict)
        }
    }
}

/// Check every supplied column's shape before extracting any of them
fn validate_shapes(schema: &SchemaRef, columns: &NamedColumns) -> TableResult<()> {
    for (name, column) in &columns.entries {
        if let ColumnLike::Array(array) = column {
            if is_nested(array.data_type()) {
                let expected = schema
                    .fields()
                    .iter()
                    .find(|f| f.accepted_names().any(|n| n == name.as_str()))
                    .map(allowed_repr)
                    .unwrap_or_else(|| "a flat column".to_string());
                return Err(TableError::column(
                    name.clone(),
                    expected,
                    format!("{:?}", array.data_type()),
                ));
            }
        }
    }
    Ok(())
}

/// Build a batch from named columns
pub fn from_columns(
    schema: &SchemaRef,
    mut columns: NamedColumns,
    config: &ConstructionConfig,
) -> TableResult<ColumnarBatch> {
    debug!(
        "{}::from_columns with {} column(s): {:?}",
        schema.name(),
        columns.len(),
        columns.entries.iter().map(|(n, c)| format!("{}={}", n, c.shape())).collect::<Vec<_>>()
    );

    validate_shapes(schema, &columns)?;
    if config.validation.reject_unknown {
        schema.validate_allowed(columns.names())?;
    }

    let mut arrays = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let column = must_get_column(&mut columns, field, &allowed_repr(field))?;
        arrays.push(materialise(column, field, config.cast.strict)?);
    }

    finish(schema, arrays)
}

/// Build a batch from an existing table's columns
pub fn from_existing<S>(
    schema: &SchemaRef,
    mut other: S,
    config: &ConstructionConfig,
) -> TableResult<ColumnarBatch>
where
    S: ColumnSource<Column = ArrayRef>,
{
    let names = other.column_names();
    debug!("{}::from_existing over columns {:?}", schema.name(), names);

    if config.validation.reject_unknown {
        schema.validate_allowed(names.iter().map(String::as_str))?;
    }

    let mut arrays = Vec::with_capacity(schema.len());
    for field in schema.fields() {
        let column = must_get_column(&mut other, field, &allowed_repr(field))?;
        arrays.push(cast_column(&column, field, config.cast.strict)?);
    }

    finish(schema, arrays)
}

/// Assemble the batch and apply the row index from the schema's index fields
pub(crate) fn finish(schema: &SchemaRef, arrays: Vec<ArrayRef>) -> TableResult<ColumnarBatch> {
    let row_count = arrays.first().map(|a| a.len()).unwrap_or(0);
    finish_with_rows(schema, arrays, row_count)
}

pub(crate) fn finish_with_rows(
    schema: &SchemaRef,
    arrays: Vec<ArrayRef>,
    row_count: usize,
) -> TableResult<ColumnarBatch> {
    let mut batch = ColumnarBatch::try_new(arrays, schema.clone(), row_count)?;

    let index = schema.index_columns();
    if !index.is_empty() {
        batch.set_index(&index)?;
    }

    debug!("{}: built {} row(s)", schema.name(), batch.num_rows());
    Ok(batch)
}
