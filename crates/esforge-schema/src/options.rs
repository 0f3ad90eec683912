//! Optional schema-load overrides.

use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;

use esforge_core::{Error, ParamType, Result};
use serde::Deserialize;

/// Overrides applied while walking a schema. Keys are raw field names, not paths.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SchemaOptions {
    /// Field names ignored entirely, including their descendants.
    pub skip_fields: BTreeSet<String>,
    /// Display-name overrides.
    pub field_names: BTreeMap<String, String>,
    /// Structural type names for object/nested fields. A leading `*` or `[]` is ignored.
    pub type_overrides: BTreeMap<String, String>,
    /// Comment overrides, taking precedence over `meta.comment`.
    pub field_comments: BTreeMap<String, String>,
    /// Raw schema type → parameter type, replacing the built-in table entry.
    pub type_mapping: BTreeMap<String, ParamType>,
}

impl SchemaOptions {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        serde_json::from_str(&text).map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn skips(&self, name: &str) -> bool {
        self.skip_fields.contains(name)
    }

    pub fn param_type(&self, raw_type: &str) -> ParamType {
        self.type_mapping
            .get(raw_type)
            .copied()
            .unwrap_or_else(|| ParamType::for_raw_type(raw_type))
    }

    /// True when the structural type override carries the `[]` list marker.
    pub fn is_list_override(&self, name: &str) -> bool {
        self.type_overrides
            .get(name)
            .is_some_and(|t| t.starts_with("[]"))
    }

    /// Structural type name override with pointer/slice markers removed.
    pub fn type_override(&self, name: &str) -> Option<&str> {
        self.type_overrides.get(name).map(|t| {
            t.strip_prefix('*')
                .or_else(|| t.strip_prefix("[]"))
                .unwrap_or(t)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_type_override_strips_markers() {
        let options: SchemaOptions = serde_json::from_str(
            r#"{"typeOverrides": {"a": "*Author", "b": "[]Item", "c": "Plain"}}"#,
        )
        .unwrap();
        assert_eq!(options.type_override("a"), Some("Author"));
        assert_eq!(options.type_override("b"), Some("Item"));
        assert_eq!(options.type_override("c"), Some("Plain"));
        assert_eq!(options.type_override("d"), None);
    }

    #[test]
    fn test_type_mapping_overrides_table() {
        let options: SchemaOptions =
            serde_json::from_str(r#"{"typeMapping": {"long": "f64", "geo_point": "str"}}"#)
                .unwrap();
        assert_eq!(options.param_type("long"), ParamType::F64);
        assert_eq!(options.param_type("geo_point"), ParamType::Str);
        assert_eq!(options.param_type("integer"), ParamType::I64);
    }

    #[test]
    fn test_list_override_marker() {
        let options: SchemaOptions = serde_json::from_str(
            r#"{"typeOverrides": {"items": "[]Item", "owner": "*Party"}}"#,
        )
        .unwrap();
        assert!(options.is_list_override("items"));
        assert!(!options.is_list_override("owner"));
        assert!(!options.is_list_override("other"));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(
            &path,
            r#"{"skipFields": ["secret"], "fieldComments": {"price": "售价"}}"#,
        )
        .unwrap();
        let options = SchemaOptions::load(&path).unwrap();
        assert!(options.skips("secret"));
        assert_eq!(options.field_comments.get("price").map(String::as_str), Some("售价"));
    }

    #[test]
    fn test_load_malformed_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("options.json");
        std::fs::write(&path, "[1, 2").unwrap();
        assert!(matches!(SchemaOptions::load(&path), Err(Error::Config(_))));
    }
}
