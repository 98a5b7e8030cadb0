/// Configuration management
pub mod construction;

pub use construction::*;
