//! Type system: the semantic-type registry and the cell values rows and lists carry

pub mod registry;
pub mod value;

pub use registry::{NativeType, TypeRegistry};
pub use value::{Value, ValueKind};
