//! Ingestion - the three construction strategies and the pieces they share

pub mod accessor;
pub mod cast;
pub mod columns;
pub mod rows;

pub use accessor::{must_get_column, ColumnSource};
pub use columns::{from_columns, from_existing, ColumnLike, NamedColumns};
pub use rows::{from_rows, AttributeRow, KeyedRow, Row, RowKind};
