//! esforge schema: classification, field descriptors and catalog loading.

pub mod catalog;
pub mod classify;
pub mod descriptor;
pub mod model;
pub mod options;
pub mod walk;

pub use catalog::FieldCatalog;
pub use classify::{classify, sub_category, TYPE_TABLE};
pub use descriptor::{sanitize_display_name, segment_display_name, FieldDescriptor};
pub use model::{DocumentModel, FieldShape, ModelField, ModelType};
pub use options::SchemaOptions;
pub use walk::SchemaWalk;
