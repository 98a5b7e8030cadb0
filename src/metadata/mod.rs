/// Metadata module for record declarations and their resolved schemas
///
/// Field declarations go in, an immutable ordered schema of resolved fields
/// comes out.

pub mod field;
pub mod schema;

pub use field::{field, FieldDecl, FieldMeta, ResolvedField};
pub use schema::{build_schema, build_schema_with, ColumnSchema, SchemaRef};
