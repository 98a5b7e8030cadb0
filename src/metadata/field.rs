//! Field metadata: what a record field declares, and what it resolves to

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};

use crate::types::NativeType;

/// Declaration-time metadata attached to a record field
///
/// Created with [`field`] and refined with the builder methods:
///
/// ```
/// use tableclasses::field;
///
/// let meta = field("int32").index(true).aliases(["f", "g"]);
/// assert_eq!(meta.type_key, "int32");
/// assert!(meta.index);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMeta {
    /// Semantic type key; empty means "infer from the native type"
    pub type_key: String,

    /// Output column name; defaults to the field's own name
    pub column_name: Option<String>,

    /// Alternate accepted input names, tried in order after the column name
    pub aliases: Vec<String>,

    /// Whether the column becomes part of the row index
    pub index: bool,
}

/// Start a field declaration with a semantic type key
pub fn field(type_key: impl Into<String>) -> FieldMeta {
    FieldMeta {
        type_key: type_key.into(),
        ..FieldMeta::default()
    }
}

impl FieldMeta {
    pub fn index(mut self, index: bool) -> Self {
        self.index = index;
        self
    }

    pub fn aliases<I, S>(mut self, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.aliases = aliases.into_iter().map(Into::into).collect();
        self
    }

    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    pub fn column_name(mut self, name: impl Into<String>) -> Self {
        self.column_name = Some(name.into());
        self
    }
}

/// One declared record field: its name, its native type and optional metadata
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDecl {
    pub name: String,
    pub native: NativeType,
    pub meta: Option<FieldMeta>,
}

impl FieldDecl {
    /// A bare-typed field with no explicit metadata
    pub fn bare(name: impl Into<String>, native: NativeType) -> Self {
        Self {
            name: name.into(),
            native,
            meta: None,
        }
    }

    pub fn with_meta(name: impl Into<String>, native: NativeType, meta: FieldMeta) -> Self {
        Self {
            name: name.into(),
            native,
            meta: Some(meta),
        }
    }

    /// The explicit metadata, or the defaults a bare field implies
    pub(crate) fn meta_or_default(&self) -> FieldMeta {
        match &self.meta {
            Some(meta) => meta.clone(),
            None => FieldMeta {
                type_key: String::new(),
                column_name: Some(self.name.clone()),
                aliases: Vec::new(),
                index: false,
            },
        }
    }
}

/// Frozen field metadata with its storage type resolved
///
/// Only the schema builder constructs these; afterwards they are read-only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedField {
    name: String,
    type_key: String,
    column_name: String,
    aliases: Vec<String>,
    is_index: bool,
    data_type: DataType,
}

impl ResolvedField {
    pub(crate) fn new(
        name: String,
        meta: FieldMeta,
        data_type: DataType,
    ) -> Self {
        let column_name = meta.column_name.unwrap_or_else(|| name.clone());
        Self {
            name,
            type_key: meta.type_key,
            column_name,
            aliases: meta.aliases,
            is_index: meta.index,
            data_type,
        }
    }

    /// Declared field name
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn type_key(&self) -> &str {
        &self.type_key
    }

    /// Primary column name
    pub fn column_name(&self) -> &str {
        &self.column_name
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn is_index(&self) -> bool {
        self.is_index
    }

    pub fn data_type(&self) -> &DataType {
        &self.data_type
    }

    /// Primary column name followed by the aliases, in lookup order
    pub fn accepted_names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.column_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }

    /// Human-readable type used in error messages
    pub fn type_label(&self) -> String {
        if self.type_key.is_empty() {
            format!("{:?}", self.data_type)
        } else {
            self.type_key.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_defaults() {
        let decl = FieldDecl::bare("price", NativeType::Float);
        let meta = decl.meta_or_default();
        assert_eq!(meta.type_key, "");
        assert_eq!(meta.column_name.as_deref(), Some("price"));
        assert!(meta.aliases.is_empty());
        assert!(!meta.index);
    }

    #[test]
    fn test_resolved_defaults_column_name() {
        let resolved = ResolvedField::new("a".to_string(), field("int32"), DataType::Int32);
        assert_eq!(resolved.column_name(), "a");

        let renamed = ResolvedField::new(
            "a".to_string(),
            field("int32").column_name("alpha").alias("f").alias("g"),
            DataType::Int32,
        );
        assert_eq!(renamed.column_name(), "alpha");
        assert_eq!(renamed.accepted_names().collect::<Vec<_>>(), vec!["alpha", "f", "g"]);
    }

    #[test]
    fn test_type_label() {
        let keyed = ResolvedField::new("a".to_string(), field("uint8"), DataType::UInt8);
        assert_eq!(keyed.type_label(), "uint8");

        let inferred = ResolvedField::new("a".to_string(), field(""), DataType::Int32);
        assert_eq!(inferred.type_label(), "Int32");
    }
}
