//! Type Registry - maps native types and semantic type keys to Arrow storage types
//!
//! The table is dual-keyed: a field's native type selects a default width
//! (`int` is 32-bit, `float` is 64-bit), while a semantic alias such as
//! `"uint16"` selects an exact one.

use arrow::datatypes::DataType;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

use crate::error::{TableError, TableResult};

/// The native type a record field is declared with
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NativeType {
    Str,
    Bool,
    Bytes,
    Int,
    Float,
    Date,
    DateTime,
    /// Any user type; has no registry entry unless one is added explicitly
    Other(String),
}

impl fmt::Display for NativeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NativeType::Str => write!(f, "str"),
            NativeType::Bool => write!(f, "bool"),
            NativeType::Bytes => write!(f, "bytes"),
            NativeType::Int => write!(f, "int"),
            NativeType::Float => write!(f, "float"),
            NativeType::Date => write!(f, "date"),
            NativeType::DateTime => write!(f, "datetime"),
            NativeType::Other(name) => write!(f, "{}", name),
        }
    }
}

/// Dual-keyed mapping from native types and alias strings to Arrow types
#[derive(Clone, Debug, PartialEq)]
pub struct TypeRegistry {
    natives: HashMap<NativeType, DataType>,
    aliases: HashMap<String, DataType>,
}

static STANDARD: OnceLock<TypeRegistry> = OnceLock::new();

impl TypeRegistry {
    /// Registry with no entries
    pub fn empty() -> Self {
        Self {
            natives: HashMap::new(),
            aliases: HashMap::new(),
        }
    }

    /// The process-wide standard registry, built on first use and never mutated
    pub fn standard() -> &'static TypeRegistry {
        STANDARD.get_or_init(Self::build_standard)
    }

    fn build_standard() -> Self {
        let natives = [
            (NativeType::Str, DataType::Utf8),
            (NativeType::Bool, DataType::Boolean),
            (NativeType::Bytes, DataType::Binary),
            (NativeType::Int, DataType::Int32),
            (NativeType::Float, DataType::Float64),
            (NativeType::Date, DataType::Date32),
            (NativeType::DateTime, DataType::Date64),
        ];

        let aliases = [
            // strings
            ("string", DataType::Utf8),
            ("str", DataType::Utf8),
            // booleans
            ("bool", DataType::Boolean),
            // binary
            ("bytes", DataType::Binary),
            ("byte", DataType::UInt8),
            // uint
            ("uint", DataType::UInt32),
            ("uint8", DataType::UInt8),
            ("uint16", DataType::UInt16),
            ("uint32", DataType::UInt32),
            ("uint64", DataType::UInt64),
            // int
            ("int", DataType::Int32),
            ("int8", DataType::Int8),
            ("int16", DataType::Int16),
            ("int32", DataType::Int32),
            ("int64", DataType::Int64),
            // float / double
            ("float", DataType::Float64),
            ("float16", DataType::Float16),
            ("float32", DataType::Float32),
            ("float64", DataType::Float64),
            // dates
            ("date", DataType::Date32),
            ("date32", DataType::Date32),
            ("datetime", DataType::Date64),
            ("datetime64", DataType::Date64),
            ("date64", DataType::Date64),
        ];

        Self {
            natives: natives.into_iter().collect(),
            aliases: aliases
                .into_iter()
                .map(|(alias, data_type)| (alias.to_string(), data_type))
                .collect(),
        }
    }

    /// Add or replace the storage type of a native type
    pub fn with_native(mut self, native: NativeType, data_type: DataType) -> Self {
        self.natives.insert(native, data_type);
        self
    }

    /// Add or replace the storage type of a semantic alias
    pub fn with_alias(mut self, alias: impl Into<String>, data_type: DataType) -> Self {
        self.aliases.insert(alias.into(), data_type);
        self
    }

    /// Resolve a field's storage type
    ///
    /// A non-empty alias is looked up first and falls back to the native type
    /// on a miss; an empty alias goes straight to the native type. The table is
    /// consulted at most twice.
    pub fn resolve(&self, native: &NativeType, alias: &str) -> TableResult<DataType> {
        let found = if alias.is_empty() {
            self.natives.get(native)
        } else {
            self.aliases.get(alias).or_else(|| self.natives.get(native))
        };

        found
            .cloned()
            .ok_or_else(|| TableError::unsupported_type(native, alias))
    }

    pub fn alias(&self, alias: &str) -> Option<&DataType> {
        self.aliases.get(alias)
    }

    pub fn native(&self, native: &NativeType) -> Option<&DataType> {
        self.natives.get(native)
    }

    /// All alias keys, sorted
    pub fn aliases(&self) -> Vec<&str> {
        let mut keys: Vec<&str> = self.aliases.keys().map(String::as_str).collect();
        keys.sort_unstable();
        keys
    }
}
