//! Table classes - a record declaration bound to its resolved schema
//!
//! A [`TableClass`] is what a record shape turns into: it owns the immutable
//! schema and exposes the three construction strategies.

use arrow::array::ArrayRef;
use std::sync::Arc;
use tracing::warn;

use crate::config::ConstructionConfig;
use crate::error::TableResult;
use crate::ingestion::{self, ColumnSource, NamedColumns, Row};
use crate::metadata::{build_schema_with, ColumnSchema, FieldDecl, SchemaRef};
use crate::storage::ColumnarBatch;
use crate::types::TypeRegistry;

/// A record shape declaration
///
/// ```
/// use tableclasses::{field, tabled, FieldDecl, NativeType, Record};
///
/// struct Trade;
///
/// impl Record for Trade {
///     const NAME: &'static str = "Trade";
///
///     fn declare() -> Vec<FieldDecl> {
///         vec![
///             FieldDecl::with_meta("id", NativeType::Int, field("int64").index(true)),
///             FieldDecl::bare("symbol", NativeType::Str),
///         ]
///     }
/// }
///
/// let trades = tabled::<Trade>().unwrap();
/// assert_eq!(trades.allowed(), vec!["id", "symbol"]);
/// ```
pub trait Record {
    const NAME: &'static str;

    /// Declared fields, in declaration order
    fn declare() -> Vec<FieldDecl>;
}

/// Build the table class of a record with the standard type registry
pub fn tabled<R: Record>() -> TableResult<TableClass> {
    TableClass::new(R::NAME, R::declare())
}

/// A schema-augmented table type
#[derive(Clone, Debug)]
pub struct TableClass {
    schema: SchemaRef,
    config: ConstructionConfig,
}

impl TableClass {
    pub fn new(name: &str, decls: Vec<FieldDecl>) -> TableResult<Self> {
        Self::with_registry(TypeRegistry::standard(), name, decls)
    }

    /// Resolve field types through a custom registry
    pub fn with_registry(
        registry: &TypeRegistry,
        name: &str,
        decls: Vec<FieldDecl>,
    ) -> TableResult<Self> {
        let schema = build_schema_with(registry, name, decls)?;
        Ok(Self::from_schema(Arc::new(schema)))
    }

    pub fn from_schema(schema: SchemaRef) -> Self {
        Self {
            schema,
            config: ConstructionConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ConstructionConfig) -> Self {
        if !config.cast.strict {
            warn!(
                "{}: lenient casts turn unrepresentable values into nulls",
                self.schema.name()
            );
        }
        self.config = config;
        self
    }

    pub fn schema(&self) -> &ColumnSchema {
        &self.schema
    }

    pub fn schema_ref(&self) -> SchemaRef {
        self.schema.clone()
    }

    pub fn config(&self) -> &ConstructionConfig {
        &self.config
    }

    /// Every accepted input name: primary column names and all aliases
    pub fn allowed(&self) -> Vec<String> {
        self.schema.allowed()
    }

    /// Build from named columns
    pub fn from_columns(&self, columns: NamedColumns) -> TableResult<ColumnarBatch> {
        ingestion::from_columns(&self.schema, columns, &self.config)
    }

    /// Build from an existing Arrow table (`&RecordBatch` or `&ColumnarBatch`)
    pub fn from_existing<S>(&self, other: S) -> TableResult<ColumnarBatch>
    where
        S: ColumnSource<Column = ArrayRef>,
    {
        ingestion::from_existing(&self.schema, other, &self.config)
    }

    /// Build from a finite or lazy sequence of rows
    pub fn from_rows<I>(&self, rows: I, allow_positional: bool) -> TableResult<ColumnarBatch>
    where
        I: IntoIterator<Item = Row>,
    {
        ingestion::from_rows(&self.schema, rows, allow_positional, &self.config)
    }

    /// Build from rows, taking `allow_positional` from the configuration
    pub fn from_rows_default<I>(&self, rows: I) -> TableResult<ColumnarBatch>
    where
        I: IntoIterator<Item = Row>,
    {
        self.from_rows(rows, self.config.rows.allow_positional)
    }
}
