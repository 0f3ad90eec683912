//! Field catalog: the read-only view of one index schema shared by every family.

use std::collections::{BTreeMap, HashSet};
use std::path::Path;

use esforge_core::{index_name_for, Category, Error, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::descriptor::{segment_display_name, FieldDescriptor};
use crate::model::DocumentModel;
use crate::options::SchemaOptions;
use crate::walk::{RawProperty, SchemaWalk};

#[derive(Debug, Clone, Serialize)]
pub struct FieldCatalog {
    /// Index name, used for identifiers.
    pub index: String,
    /// Index comment, used for documentation. Falls back to the index name.
    pub comment: String,
    fields: Vec<FieldDescriptor>,
    #[serde(skip)]
    model: DocumentModel,
}

impl FieldCatalog {
    /// Load a schema file. The index name is taken from the file name.
    pub fn load(path: &Path, options: &SchemaOptions) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .map_err(|e| Error::Schema(format!("cannot read {}: {}", path.display(), e)))?;
        let catalog = Self::from_json(&text, &index_name_for(path), options)?;
        info!(
            "Loaded {} fields for index {} from {}",
            catalog.fields.len(),
            catalog.index,
            path.display()
        );
        Ok(catalog)
    }

    /// Parse a schema document. Fails on invalid JSON or when `mappings` or
    /// `mappings.properties` is missing.
    pub fn from_json(text: &str, index: &str, options: &SchemaOptions) -> Result<Self> {
        let doc: Value = serde_json::from_str(text)
            .map_err(|e| Error::Schema(format!("not valid JSON: {}", e)))?;
        let mappings = doc
            .get("mappings")
            .filter(|m| m.is_object())
            .ok_or_else(|| Error::Schema("missing `mappings` object".into()))?;
        let properties = mappings
            .get("properties")
            .ok_or_else(|| Error::Schema("missing `mappings.properties`".into()))?;
        let properties: BTreeMap<String, RawProperty> =
            serde_json::from_value(properties.clone())
                .map_err(|e| Error::Schema(format!("malformed properties: {}", e)))?;

        let comment = mappings
            .get("_meta")
            .or_else(|| mappings.get("meta"))
            .and_then(|m| m.get("comment"))
            .and_then(Value::as_str)
            .filter(|c| !c.is_empty())
            .unwrap_or(index)
            .to_string();

        let mut walk = SchemaWalk::new(options);
        walk.walk(&segment_display_name(index), &comment, &properties, None);
        let (fields, model) = walk.finish_with_model();

        let mut catalog = Self::new(index, &comment, fields);
        catalog.model = model;
        Ok(catalog)
    }

    /// Build a catalog from descriptors. Display names that collide are made unique.
    pub fn new(index: &str, comment: &str, mut fields: Vec<FieldDescriptor>) -> Self {
        disambiguate(&mut fields);
        fields.sort_by(|a, b| a.display_name.cmp(&b.display_name));
        Self {
            index: index.to_string(),
            comment: comment.to_string(),
            fields,
            model: DocumentModel::default(),
        }
    }

    /// Typed document model, empty for catalogs not loaded from a schema.
    pub fn model(&self) -> &DocumentModel {
        &self.model
    }

    /// PascalCase index name for identifiers.
    pub fn display_name(&self) -> String {
        segment_display_name(&self.index)
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.path == path)
    }

    /// Fields whose primary or sub-category matches.
    pub fn of_category(&self, category: Category) -> Vec<&FieldDescriptor> {
        self.fields.iter().filter(|f| f.is(category)).collect()
    }

    /// Fields usable as filter conditions.
    pub fn filterable(&self) -> Vec<&FieldDescriptor> {
        self.fields
            .iter()
            .filter(|f| f.category.is_filterable())
            .collect()
    }

    /// Field count per primary category.
    pub fn category_counts(&self) -> BTreeMap<Category, usize> {
        let mut counts = BTreeMap::new();
        for field in &self.fields {
            *counts.entry(field.category).or_insert(0) += 1;
        }
        counts
    }
}

/// Give every field a display name and a parameter base name no other field
/// uses. In path order, a later field that collides takes a numeric suffix.
fn disambiguate(fields: &mut [FieldDescriptor]) {
    let mut order: Vec<usize> = (0..fields.len()).collect();
    order.sort_by(|a, b| fields[*a].path.cmp(&fields[*b].path));

    let mut names = HashSet::new();
    let mut params = HashSet::new();
    for i in order {
        let field = &mut fields[i];
        let base = field.display_name.clone();
        let mut n = 2;
        while names.contains(&field.display_name) || params.contains(&field.param_name()) {
            field.display_name = format!("{}{}", base, n);
            n += 1;
        }
        if field.display_name != base {
            warn!(
                "Field {} renamed to {}: {} is taken by another path",
                field.path, field.display_name, base
            );
        }
        names.insert(field.display_name.clone());
        params.insert(field.param_name());
    }
}
