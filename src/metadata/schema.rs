/// Record schema built from field declarations
///
/// The schema is the ordered list of resolved fields for one declared record
/// shape. It is built once and then shared read-only by every construction
/// call against that record.
///
/// Key invariants:
/// - Field order is declaration order
/// - Every field has a column name and a resolved Arrow type
/// - Primary column names are unique across fields
use std::collections::HashMap;
use std::sync::Arc;

use arrow::datatypes::{DataType, Field, Schema};
use tracing::debug;

use super::field::{FieldDecl, ResolvedField};
use crate::error::{TableError, TableResult};
use crate::types::TypeRegistry;

/// Ordered, resolved field metadata for one record shape
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnSchema {
    /// Record name, used in logs and error context
    name: String,

    /// Resolved fields, in declaration order
    fields: Vec<ResolvedField>,

    /// Fast lookup: primary column name → position in `fields`
    column_lookup: HashMap<String, usize>,
}

/// Reference-counted ColumnSchema, shared by a table class and every batch it builds
pub type SchemaRef = Arc<ColumnSchema>;

/// Build a schema with the standard type registry
pub fn build_schema(name: &str, decls: Vec<FieldDecl>) -> TableResult<ColumnSchema> {
    build_schema_with(TypeRegistry::standard(), name, decls)
}

/// Build a schema, resolving every field's storage type through `registry`
///
/// # Rules
/// - A field without metadata gets `type_key = ""`, its own name as column name,
///   no aliases and no index flag
/// - The storage type comes from the field's native type and its type key
/// - Two fields may not share a primary column name
pub fn build_schema_with(
    registry: &TypeRegistry,
    name: &str,
    decls: Vec<FieldDecl>,
) -> TableResult<ColumnSchema> {
    let mut fields = Vec::with_capacity(decls.len());
    let mut column_lookup = HashMap::with_capacity(decls.len());

    for decl in decls {
        let meta = decl.meta_or_default();
        let data_type = registry.resolve(&decl.native, &meta.type_key)?;
        let resolved = ResolvedField::new(decl.name, meta, data_type);

        if let Some(&existing) = column_lookup.get(resolved.column_name()) {
            let other: &ResolvedField = &fields[existing];
            return Err(TableError::schema(format!(
                "fields '{}' and '{}' both map to column '{}'",
                other.name(),
                resolved.name(),
                resolved.column_name()
            ))
            .with_context(format!("record {}", name)));
        }

        column_lookup.insert(resolved.column_name().to_string(), fields.len());
        fields.push(resolved);
    }

    debug!(
        "Built schema for {}: {:?}",
        name,
        fields
            .iter()
            .map(|f| format!("{}:{:?}", f.column_name(), f.data_type()))
            .collect::<Vec<_>>()
    );

    Ok(ColumnSchema {
        name: name.to_string(),
        fields,
        column_lookup,
    })
}

impl ColumnSchema {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Resolved fields, in declaration order
    pub fn fields(&self) -> &[ResolvedField] {
        &self.fields
    }

    /// Field by primary column name
    pub fn field(&self, column_name: &str) -> Option<&ResolvedField> {
        self.column_lookup.get(column_name).map(|&idx| &self.fields[idx])
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Primary column names (in field order)
    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.column_name()).collect()
    }

    /// Data types (in field order)
    pub fn data_types(&self) -> Vec<&DataType> {
        self.fields.iter().map(|f| f.data_type()).collect()
    }

    /// Every accepted input name: each field's column name followed by its aliases
    pub fn allowed(&self) -> Vec<String> {
        self.fields
            .iter()
            .flat_map(|f| f.accepted_names().map(str::to_string))
            .collect()
    }

    /// Reject any given name outside the allowed-name set
    ///
    /// The error lists every offending name, in the order given.
    pub fn validate_allowed<'a, I>(&self, given: I) -> TableResult<()>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let allowed = self.allowed();
        let disallowed: Vec<String> = given
            .into_iter()
            .filter(|name| !allowed.iter().any(|a| a == name))
            .map(str::to_string)
            .collect();

        if disallowed.is_empty() {
            Ok(())
        } else {
            Err(TableError::unknown_names(disallowed))
        }
    }

    /// Column names of the fields flagged as index, in field order
    pub fn index_columns(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.is_index())
            .map(|f| f.column_name())
            .collect()
    }

    /// Create the Arrow schema the built batches carry
    /// Each Arrow field corresponds 1:1 with a resolved field
    pub fn to_arrow_schema(&self) -> Schema {
        let fields: Vec<Field> = self
            .fields
            .iter()
            .map(|f| Field::new(f.column_name(), f.data_type().clone(), true))
            .collect();

        Schema::new(fields)
    }
}
