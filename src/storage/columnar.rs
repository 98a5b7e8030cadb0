use arrow::array::*;
use arrow::datatypes::{Schema, SchemaRef};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::sync::Arc;

use crate::error::{TableError, TableResult};
use crate::metadata::SchemaRef as TableSchemaRef;

/// Row index - the columns a batch is keyed by, in field order
#[derive(Clone, Debug)]
pub struct RowIndex {
    names: Vec<String>,
    columns: Vec<ArrayRef>,
}

impl RowIndex {
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn columns(&self) -> &[ArrayRef] {
        &self.columns
    }

    /// Index level by position
    pub fn level(&self, idx: usize) -> Option<&ArrayRef> {
        self.columns.get(idx)
    }

    pub fn len(&self) -> usize {
        self.columns.first().map(|c| c.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Columnar batch - one typed Arrow column per schema field
///
/// Built by the construction strategies of a table class; carries the
/// record schema it was validated against.
#[derive(Clone, Debug)]
pub struct ColumnarBatch {
    /// Column arrays (one per field, in field order)
    pub columns: Vec<ArrayRef>,

    /// Arrow schema describing the columns
    pub schema: SchemaRef,

    /// Number of rows in this batch
    pub row_count: usize,

    table_schema: TableSchemaRef,
    index: Option<RowIndex>,
}

impl ColumnarBatch {
    /// Assemble a batch from already-typed columns
    ///
    /// Arrow checks that column types match the schema and that every column
    /// has `row_count` entries.
    pub fn try_new(
        columns: Vec<ArrayRef>,
        table_schema: TableSchemaRef,
        row_count: usize,
    ) -> TableResult<Self> {
        let schema: SchemaRef = Arc::new(table_schema.to_arrow_schema());
        let options = RecordBatchOptions::new().with_row_count(Some(row_count));
        let batch = RecordBatch::try_new_with_options(schema.clone(), columns, &options)
            .map_err(|e| TableError::from(e).with_context(format!("record {}", table_schema.name())))?;

        Ok(Self {
            columns: batch.columns().to_vec(),
            schema,
            row_count,
            table_schema,
            index: None,
        })
    }

    /// Get a column by index
    pub fn column(&self, idx: usize) -> Option<&ArrayRef> {
        self.columns.get(idx)
    }

    /// Get a column by name
    pub fn column_by_name(&self, name: &str) -> Option<&ArrayRef> {
        let idx = self.schema.index_of(name).ok()?;
        self.column(idx)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.schema.fields().iter().map(|f| f.name().as_str()).collect()
    }

    /// Record schema this batch was built against
    pub fn table_schema(&self) -> &TableSchemaRef {
        &self.table_schema
    }

    pub fn arrow_schema(&self) -> &Schema {
        &self.schema
    }

    pub fn num_rows(&self) -> usize {
        self.row_count
    }

    pub fn index(&self) -> Option<&RowIndex> {
        self.index.as_ref()
    }

    /// Key the rows by the named columns (in the order given)
    ///
    /// An empty list clears the index.
    pub fn set_index<S: AsRef<str>>(&mut self, names: &[S]) -> TableResult<()> {
        if names.is_empty() {
            self.index = None;
            return Ok(());
        }

        let mut columns = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            let column = self.column_by_name(name).ok_or_else(|| {
                TableError::column(name, "an existing column", format!("{:?}", self.column_names()))
            })?;
            columns.push(column.clone());
        }

        self.index = Some(RowIndex {
            names: names.iter().map(|n| n.as_ref().to_string()).collect(),
            columns,
        });
        Ok(())
    }

    /// Convert into a plain Arrow record batch (index columns stay as columns)
    pub fn to_record_batch(&self) -> TableResult<RecordBatch> {
        let options = RecordBatchOptions::new().with_row_count(Some(self.row_count));
        Ok(RecordBatch::try_new_with_options(
            self.schema.clone(),
            self.columns.clone(),
            &options,
        )?)
    }

    /// Slice this batch (zero-copy); the index is sliced along with it
    ///
    /// A range reaching past the last row is an error.
    pub fn slice(&self, offset: usize, length: usize) -> TableResult<Self> {
        if offset.saturating_add(length) > self.row_count {
            return Err(TableError::engine(format!(
                "slice {}..{} is out of bounds for {} row(s)",
                offset,
                offset.saturating_add(length),
                self.row_count
            ))
            .with_context(format!("record {}", self.table_schema.name())));
        }

        let columns = self
            .columns
            .iter()
            .map(|col| col.slice(offset, length))
            .collect();

        let index = self.index.as_ref().map(|index| RowIndex {
            names: index.names.clone(),
            columns: index.columns.iter().map(|c| c.slice(offset, length)).collect(),
        });

        Ok(Self {
            columns,
            schema: self.schema.clone(),
            row_count: length,
            table_schema: self.table_schema.clone(),
            index,
        })
    }
}
