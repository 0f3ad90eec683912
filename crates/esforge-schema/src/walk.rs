//! Recursive walk over a schema's `properties` tree.

use std::collections::{BTreeMap, HashSet};

use esforge_core::Category;
use serde::Deserialize;
use tracing::debug;

use crate::classify::{classify, sub_category};
use crate::descriptor::{sanitize_display_name, segment_display_name, FieldDescriptor};
use crate::model::{DocumentModel, FieldShape, ModelType};
use crate::options::SchemaOptions;

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawMeta {
    #[serde(default)]
    pub comment: String,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawKeyword {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct RawFields {
    #[serde(default)]
    pub keyword: Option<RawKeyword>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RawProperty {
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    #[serde(default)]
    pub meta: RawMeta,
    #[serde(default)]
    pub fields: RawFields,
    #[serde(default)]
    pub properties: Option<BTreeMap<String, RawProperty>>,
}

impl RawProperty {
    fn raw_type(&self) -> &str {
        match (&self.kind, &self.properties) {
            (Some(kind), _) => kind,
            (None, Some(_)) => "object",
            (None, None) => "",
        }
    }
}

/// Per-invocation walk state. Structural type names seen so far stop recursion
/// so a shared nested type is expanded once.
pub struct SchemaWalk<'a> {
    options: &'a SchemaOptions,
    visited: HashSet<String>,
    fields: Vec<FieldDescriptor>,
    model: DocumentModel,
}

impl<'a> SchemaWalk<'a> {
    pub fn new(options: &'a SchemaOptions) -> Self {
        Self {
            options,
            visited: HashSet::new(),
            fields: Vec::new(),
            model: DocumentModel::default(),
        }
    }

    pub(crate) fn walk(
        &mut self,
        type_name: &str,
        type_comment: &str,
        properties: &BTreeMap<String, RawProperty>,
        parent: Option<(&str, &str)>,
    ) {
        if !self.visited.insert(type_name.to_string()) {
            debug!("Structural type {} already expanded, skipping", type_name);
            return;
        }

        // Reserve the slot so a type precedes the types nested in it.
        let slot = self.model.types.len();
        self.model.types.push(ModelType::new(type_name, type_comment));
        let mut model = ModelType::new(type_name, type_comment);

        for (name, prop) in properties {
            if self.options.skips(name) {
                debug!("Skipping field {}", name);
                continue;
            }

            let segment = self
                .options
                .field_names
                .get(name)
                .map(|n| sanitize_display_name(n))
                .unwrap_or_else(|| segment_display_name(name));
            let (path, display_name) = match parent {
                Some((p, d)) => (format!("{}.{}", p, name), format!("{}{}", d, segment)),
                None => (name.clone(), segment.clone()),
            };

            let raw_type = prop.raw_type();
            let category = classify(raw_type);
            let keyword = prop.fields.keyword.as_ref().and_then(|k| k.kind.as_deref());
            let comment = self
                .options
                .field_comments
                .get(name)
                .cloned()
                .filter(|c| !c.is_empty())
                .or_else(|| Some(prop.meta.comment.clone()).filter(|c| !c.is_empty()))
                .unwrap_or_else(|| name.clone());

            let param_type = self.options.param_type(raw_type);
            self.fields.push(FieldDescriptor {
                path: path.clone(),
                display_name: display_name.clone(),
                raw_type: raw_type.to_string(),
                category,
                sub_category: sub_category(category, keyword),
                comment: comment.clone(),
                param_type,
            });

            let children = prop
                .properties
                .as_ref()
                .filter(|_| category == Category::Object);
            let shape = match children {
                Some(children) => {
                    let nested_type = self
                        .options
                        .type_override(name)
                        .map(sanitize_display_name)
                        .unwrap_or_else(|| segment_display_name(name));
                    self.walk(
                        &nested_type,
                        &comment,
                        children,
                        Some((&path, &display_name)),
                    );
                    if raw_type == "nested" || self.options.is_list_override(name) {
                        FieldShape::List {
                            type_name: nested_type,
                        }
                    } else {
                        FieldShape::Object {
                            type_name: nested_type,
                        }
                    }
                }
                None => FieldShape::Scalar { ty: param_type },
            };
            model.push(name, &segment, raw_type, &comment, shape);
        }

        self.model.types[slot] = model;
    }

    /// Descriptors ordered by display name.
    pub fn finish(self) -> Vec<FieldDescriptor> {
        self.finish_with_model().0
    }

    /// Descriptors ordered by display name, plus the document model.
    pub fn finish_with_model(mut self) -> (Vec<FieldDescriptor>, DocumentModel) {
        self.fields
            .sort_by(|a, b| a.display_name.cmp(&b.display_name));
        (self.fields, self.model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(json: &str) -> BTreeMap<String, RawProperty> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_nested_paths_are_prefixed() {
        let options = SchemaOptions::default();
        let mut walk = SchemaWalk::new(&options);
        let properties = props(
            r#"{
                "menu_items": {"type": "nested", "properties": {
                    "price": {"type": "float"},
                    "name": {"type": "text"}
                }}
            }"#,
        );
        walk.walk("Cafe", "cafe", &properties, None);
        let fields = walk.finish();
        let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["menu_items", "menu_items.name", "menu_items.price"]);
        assert_eq!(fields[2].display_name, "MenuItemsPrice");
        assert_eq!(fields[0].category, Category::Object);
    }

    #[test]
    fn test_repeated_structural_type_expanded_once() {
        let options: SchemaOptions = serde_json::from_str(
            r#"{"typeOverrides": {"buyer": "*Party", "seller": "*Party"}}"#,
        )
        .unwrap();
        let mut walk = SchemaWalk::new(&options);
        let properties = props(
            r#"{
                "buyer": {"type": "object", "properties": {"name": {"type": "keyword"}}},
                "seller": {"type": "object", "properties": {"name": {"type": "keyword"}}}
            }"#,
        );
        walk.walk("Order", "orders", &properties, None);
        let fields = walk.finish();
        let paths: Vec<&str> = fields.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["buyer", "buyer.name", "seller"]);
    }

    #[test]
    fn test_properties_without_type_is_object() {
        let options = SchemaOptions::default();
        let mut walk = SchemaWalk::new(&options);
        let properties = props(r#"{"author": {"properties": {"age": {"type": "integer"}}}}"#);
        walk.walk("Book", "books", &properties, None);
        let fields = walk.finish();
        assert_eq!(fields[0].raw_type, "object");
        assert_eq!(fields[1].path, "author.age");
        assert_eq!(fields[1].param_type, esforge_core::ParamType::I64);
    }

    #[test]
    fn test_model_emits_shared_type_once() {
        let options: SchemaOptions = serde_json::from_str(
            r#"{"typeOverrides": {"buyer": "*Party", "seller": "*Party", "lines": "[]Line"}}"#,
        )
        .unwrap();
        let mut walk = SchemaWalk::new(&options);
        let properties = props(
            r#"{
                "@timestamp": {"type": "date", "meta": {"comment": "created"}},
                "buyer": {"type": "object", "properties": {"name": {"type": "keyword"}}},
                "seller": {"type": "object", "properties": {"name": {"type": "keyword"}}},
                "lines": {"type": "object", "properties": {"qty": {"type": "integer"}}},
                "tags": {"type": "nested", "properties": {"label": {"type": "keyword"}}}
            }"#,
        );
        walk.walk("Order", "orders", &properties, None);
        let (_, model) = walk.finish_with_model();

        let names: Vec<&str> = model.types.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["Order", "Party", "Line", "Tags"]);

        let root = model.root().unwrap();
        assert_eq!(root.comment, "orders");
        let timestamp = &root.fields[0];
        assert_eq!(timestamp.json_name, "@timestamp");
        assert_eq!(timestamp.rust_name, "timestamp");
        assert_eq!(
            timestamp.shape,
            FieldShape::Scalar {
                ty: esforge_core::ParamType::Date
            }
        );
        let shape = |json: &str| {
            root.fields
                .iter()
                .find(|f| f.json_name == json)
                .map(|f| f.shape.clone())
                .unwrap()
        };
        assert_eq!(shape("buyer"), FieldShape::Object { type_name: "Party".into() });
        assert_eq!(shape("seller"), FieldShape::Object { type_name: "Party".into() });
        assert_eq!(shape("lines"), FieldShape::List { type_name: "Line".into() });
        assert_eq!(shape("tags"), FieldShape::List { type_name: "Tags".into() });
        assert_eq!(model.get("Party").unwrap().fields.len(), 1);
    }

    #[test]
    fn test_type_mapping_applies_to_descriptors() {
        let options: SchemaOptions =
            serde_json::from_str(r#"{"typeMapping": {"long": "f64"}}"#).unwrap();
        let mut walk = SchemaWalk::new(&options);
        let properties = props(r#"{"bytes": {"type": "long"}}"#);
        walk.walk("Log", "logs", &properties, None);
        let fields = walk.finish();
        assert_eq!(fields[0].param_type, esforge_core::ParamType::F64);
    }

    #[test]
    fn test_comment_fallbacks() {
        let options: SchemaOptions =
            serde_json::from_str(r#"{"fieldComments": {"price": "售价"}}"#).unwrap();
        let mut walk = SchemaWalk::new(&options);
        let properties = props(
            r#"{
                "price": {"type": "float", "meta": {"comment": "价格"}},
                "title": {"type": "text", "meta": {"comment": "书名"}},
                "isbn": {"type": "keyword"}
            }"#,
        );
        walk.walk("Book", "books", &properties, None);
        let fields = walk.finish();
        let comments: Vec<&str> = fields.iter().map(|f| f.comment.as_str()).collect();
        assert_eq!(comments, vec!["isbn", "售价", "书名"]);
    }
}
