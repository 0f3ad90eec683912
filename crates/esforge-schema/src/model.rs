//! Typed document model recorded while walking a schema: one type per
//! object/nested level.

use std::collections::HashSet;

use convert_case::{Case, Casing};
use esforge_core::ParamType;
use serde::Serialize;

/// How a model field holds its value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FieldShape {
    Scalar { ty: ParamType },
    /// A single embedded object of the named type.
    Object { type_name: String },
    /// A list of the named type.
    List { type_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelField {
    /// Name in the stored document.
    pub json_name: String,
    /// snake_case Rust field name, unique within its type.
    pub rust_name: String,
    pub raw_type: String,
    pub comment: String,
    pub shape: FieldShape,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelType {
    pub name: String,
    pub comment: String,
    pub fields: Vec<ModelField>,
}

impl ModelType {
    pub(crate) fn new(name: &str, comment: &str) -> Self {
        Self {
            name: name.to_string(),
            comment: comment.to_string(),
            fields: Vec::new(),
        }
    }

    /// Add a field, suffixing its Rust name when an earlier field already took it.
    pub(crate) fn push(
        &mut self,
        json_name: &str,
        display_name: &str,
        raw_type: &str,
        comment: &str,
        shape: FieldShape,
    ) {
        let taken: HashSet<&str> = self.fields.iter().map(|f| f.rust_name.as_str()).collect();
        let base = display_name.to_case(Case::Snake);
        let mut rust_name = base.clone();
        let mut n = 2;
        while taken.contains(rust_name.as_str()) {
            rust_name = format!("{}_{}", base, n);
            n += 1;
        }
        self.fields.push(ModelField {
            json_name: json_name.to_string(),
            rust_name,
            raw_type: raw_type.to_string(),
            comment: comment.to_string(),
            shape,
        });
    }
}

/// Model types in walk order: the root first, each nested type after its parent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DocumentModel {
    pub types: Vec<ModelType>,
}

impl DocumentModel {
    pub fn root(&self) -> Option<&ModelType> {
        self.types.first()
    }

    pub fn get(&self, name: &str) -> Option<&ModelType> {
        self.types.iter().find(|t| t.name == name)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}
