//! Field descriptors produced by schema loading.

use convert_case::{Case, Casing};
use esforge_core::{Category, ParamType};
use serde::Serialize;

/// One schema field. Immutable after load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Dotted schema path, unique within a catalog.
    pub path: String,
    /// Identifier-safe PascalCase name.
    pub display_name: String,
    pub raw_type: String,
    pub category: Category,
    /// `TextKeyword` for text fields with a keyword sub-field.
    pub sub_category: Option<Category>,
    pub comment: String,
    pub param_type: ParamType,
}

impl FieldDescriptor {
    /// True when either the primary or the sub-category equals `category`.
    pub fn is(&self, category: Category) -> bool {
        self.category == category || self.sub_category == Some(category)
    }

    /// Base name for generated parameters, e.g. `menu_items_price`.
    pub fn param_name(&self) -> String {
        self.display_name.to_case(Case::Snake)
    }

    /// Path used for exact-value terms and buckets. Text fields with a keyword
    /// sub-field aggregate on `<path>.keyword`.
    pub fn exact_path(&self) -> String {
        if self.sub_category == Some(Category::TextKeyword) {
            format!("{}.keyword", self.path)
        } else {
            self.path.clone()
        }
    }
}

/// PascalCase identifier for one path segment. Only ASCII letters and digits
/// survive, so `@timestamp` becomes `Timestamp` and `user.name` becomes `UserName`.
pub fn segment_display_name(segment: &str) -> String {
    let words: String = segment
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    let pascal: String = words
        .to_case(Case::Pascal)
        .chars()
        .filter(char::is_ascii_alphanumeric)
        .collect();
    match pascal.chars().next() {
        None => "F".to_string(),
        Some(c) if c.is_ascii_digit() => format!("F{}", pascal),
        Some(_) => pascal,
    }
}

/// Keep only ASCII letters and digits of a user-supplied display name.
pub fn sanitize_display_name(name: &str) -> String {
    let clean: String = name.chars().filter(char::is_ascii_alphanumeric).collect();
    match clean.chars().next() {
        None => "F".to_string(),
        Some(c) if c.is_ascii_digit() => format!("F{}", clean),
        Some(_) => clean,
    }
}
