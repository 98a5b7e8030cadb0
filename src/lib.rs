//! # tableclasses
//!
//! Declarative, schema-validated construction of Arrow tables from record
//! declarations.
//!
//! ## Quick Start
//!
//! ```rust
//! use tableclasses::{field, FieldDecl, NamedColumns, NativeType, TableClass};
//!
//! let prices = TableClass::new(
//!     "Price",
//!     vec![
//!         FieldDecl::with_meta("symbol", NativeType::Str, field("string").index(true)),
//!         FieldDecl::with_meta("close", NativeType::Float, field("float32").alias("last")),
//!     ],
//! )
//! .unwrap();
//!
//! let batch = prices
//!     .from_columns(
//!         NamedColumns::new()
//!             .with("symbol", vec!["AAPL", "MSFT"])
//!             .with("last", vec![189.5, 411.2]),
//!     )
//!     .unwrap();
//!
//! assert_eq!(batch.num_rows(), 2);
//! assert_eq!(batch.index().unwrap().names(), &["symbol".to_string()]);
//! ```
//!
//! ## Features
//!
//! - **Type Registry**: native types and semantic keys (`"int32"`, `"datetime"`) map to Arrow types
//! - **Aliases**: alternate input names, tried only after the column name misses
//! - **Three constructors**: named columns, an existing table, or keyed/attribute/positional rows
//! - **Row index**: fields flagged as index key the built batch

pub mod config;
pub mod error;
pub mod ingestion;
pub mod metadata;
pub mod storage;
pub mod tableclass;
pub mod types;

// Public API - Main types users need
pub use tableclass::{tabled, Record, TableClass};
pub use metadata::{build_schema, build_schema_with, field, ColumnSchema, FieldDecl, FieldMeta, ResolvedField, SchemaRef};
pub use ingestion::{AttributeRow, ColumnLike, ColumnSource, KeyedRow, NamedColumns, Row, RowKind};
pub use storage::{ColumnarBatch, RowIndex};
pub use types::{NativeType, TypeRegistry, Value};
pub use config::ConstructionConfig;

// Re-export commonly used error types
pub use error::{TableError, TableResult};
