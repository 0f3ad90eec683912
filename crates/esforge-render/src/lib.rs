//! esforge render: prints synthesized variants as Rust source.

pub mod printer;

pub use printer::{Printer, DEFAULT_BUILDER_PATH};
