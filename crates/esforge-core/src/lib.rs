//! esforge core: shared vocabulary, errors and per-schema generation config.

pub mod config;
pub mod error;
pub mod types;

pub use config::{config_path_for, index_name_for, FieldLists, GenerationConfig, MergedTextField};
pub use error::{Error, Result};
pub use types::*;
