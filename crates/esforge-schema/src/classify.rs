//! Raw schema type → semantic category.

use esforge_core::Category;

/// Fixed classification table. Every raw type not listed falls through to `Other`.
pub const TYPE_TABLE: &[(&str, Category)] = &[
    ("text", Category::Text),
    ("match_only_text", Category::Text),
    ("search_as_you_type", Category::Text),
    ("keyword", Category::Keyword),
    ("constant_keyword", Category::Keyword),
    ("wildcard", Category::Keyword),
    ("long", Category::Number),
    ("integer", Category::Number),
    ("short", Category::Number),
    ("byte", Category::Number),
    ("double", Category::Number),
    ("float", Category::Number),
    ("half_float", Category::Number),
    ("scaled_float", Category::Number),
    ("unsigned_long", Category::Number),
    ("token_count", Category::Number),
    ("date", Category::Date),
    ("date_nanos", Category::Date),
    ("boolean", Category::Boolean),
    ("integer_range", Category::Range),
    ("float_range", Category::Range),
    ("long_range", Category::Range),
    ("double_range", Category::Range),
    ("date_range", Category::Range),
    ("ip_range", Category::Range),
    ("ip", Category::Ip),
    ("geo_point", Category::Geo),
    ("geo_shape", Category::Geo),
    ("point", Category::Geo),
    ("shape", Category::Geo),
    ("object", Category::Object),
    ("nested", Category::Object),
    ("flattened", Category::Object),
    ("dense_vector", Category::Vector),
    ("sparse_vector", Category::Vector),
    ("vector", Category::Vector),
    ("binary", Category::Special),
    ("completion", Category::Special),
    ("percolator", Category::Special),
    ("join", Category::Special),
    ("alias", Category::Special),
    ("rank_feature", Category::Special),
    ("rank_features", Category::Special),
    ("histogram", Category::Special),
    ("semantic_text", Category::Special),
];

/// Classify a raw schema type string.
pub fn classify(raw_type: &str) -> Category {
    TYPE_TABLE
        .iter()
        .find(|(name, _)| *name == raw_type)
        .map(|(_, category)| *category)
        .unwrap_or(Category::Other)
}

/// Keyword sub-field marker: a text field with `fields.keyword.type == "keyword"`.
pub fn sub_category(category: Category, keyword_subfield: Option<&str>) -> Option<Category> {
    match (category, keyword_subfield) {
        (Category::Text, Some("keyword")) => Some(Category::TextKeyword),
        _ => None,
    }
}
