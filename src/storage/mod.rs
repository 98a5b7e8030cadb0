pub mod columnar;

pub use columnar::*;
