//! Combination filters and field-pool restrictions.

use std::collections::BTreeMap;

use esforge_core::{Category, FieldListKind, FieldLists, MergedTextField};
use esforge_schema::FieldDescriptor;

use crate::combination::Combination;

/// Per-category member count limits.
///
/// A positive cap bounds the number of members of that category. A negative cap
/// excludes every combination containing the category. Zero means no limit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryCaps(BTreeMap<Category, i32>);

impl CategoryCaps {
    pub fn new(caps: impl IntoIterator<Item = (Category, i32)>) -> Self {
        Self(caps.into_iter().collect())
    }

    pub fn get(&self, category: Category) -> Option<i32> {
        self.0.get(&category).copied()
    }

    pub fn admits(&self, combination: &Combination<'_>) -> bool {
        self.0.iter().all(|(category, cap)| {
            let count = combination.count_category(*category);
            match *cap {
                c if c < 0 => count == 0,
                0 => true,
                c => count <= c as usize,
            }
        })
    }
}

pub fn filter_by_category_caps<'a>(
    combinations: Vec<Combination<'a>>,
    caps: &CategoryCaps,
) -> Vec<Combination<'a>> {
    combinations.into_iter().filter(|c| caps.admits(c)).collect()
}

/// Keep combinations holding at least one member of any listed category.
/// An empty list keeps everything.
pub fn filter_requiring_any_of<'a>(
    combinations: Vec<Combination<'a>>,
    categories: &[Category],
) -> Vec<Combination<'a>> {
    if categories.is_empty() {
        return combinations;
    }
    combinations
        .into_iter()
        .filter(|c| categories.iter().any(|cat| c.has_category(*cat)))
        .collect()
}

/// Keep combinations containing every listed path. An empty list keeps everything.
pub fn filter_requiring_all_paths<'a>(
    combinations: Vec<Combination<'a>>,
    paths: &[String],
) -> Vec<Combination<'a>> {
    combinations
        .into_iter()
        .filter(|c| paths.iter().all(|p| c.contains_path(p)))
        .collect()
}

/// Restriction applied to fields outside a combination.
#[derive(Debug, Clone, Default)]
pub struct MemberFilter {
    /// When non-empty, only these categories pass.
    pub categories: Vec<Category>,
    pub not_categories: Vec<Category>,
    /// When non-empty, only these paths pass.
    pub allow: Vec<String>,
    pub deny: Vec<String>,
}

impl MemberFilter {
    pub fn categories(categories: &[Category]) -> Self {
        Self {
            categories: categories.to_vec(),
            ..Default::default()
        }
    }

    /// Attach the allow/deny pair configured for `kind`.
    pub fn with_lists(mut self, lists: &FieldLists, kind: FieldListKind) -> Self {
        let (allow, deny) = lists.lists(kind);
        self.allow = allow.to_vec();
        self.deny = deny.to_vec();
        self
    }

    pub fn admits(&self, field: &FieldDescriptor) -> bool {
        let category_ok = self.categories.is_empty()
            || self.categories.iter().any(|c| field.is(*c));
        let not_category_ok = !self.not_categories.iter().any(|c| field.is(*c));
        let allow_ok = self.allow.is_empty() || self.allow.iter().any(|p| *p == field.path);
        let deny_ok = !self.deny.iter().any(|p| *p == field.path);
        category_ok && not_category_ok && allow_ok && deny_ok
    }
}

/// Fields not in `combination` that pass `filter`, in input order.
pub fn exclude_members<'a>(
    fields: &[&'a FieldDescriptor],
    combination: &Combination<'_>,
    filter: &MemberFilter,
) -> Vec<&'a FieldDescriptor> {
    fields
        .iter()
        .copied()
        .filter(|f| !combination.contains_path(&f.path) && filter.admits(f))
        .collect()
}

/// With an exclusive merged text field every other text field leaves the pool.
pub fn apply_merged_text_field<'a>(
    fields: Vec<&'a FieldDescriptor>,
    merged: Option<&MergedTextField>,
) -> Vec<&'a FieldDescriptor> {
    match merged {
        Some(m) if m.exclusive => fields
            .into_iter()
            .filter(|f| f.category != Category::Text || f.path == m.path)
            .collect(),
        _ => fields,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combination::enumerate_up_to;
    use esforge_core::ParamType;

    fn field(path: &str, category: Category) -> FieldDescriptor {
        FieldDescriptor {
            path: path.into(),
            display_name: path.to_uppercase(),
            raw_type: String::new(),
            category,
            sub_category: None,
            comment: path.into(),
            param_type: ParamType::Str,
        }
    }

    #[test]
    fn test_negative_cap_excludes_category() {
        let a = field("a", Category::Keyword);
        let v = field("v", Category::Vector);
        let combos = enumerate_up_to(&[&a, &v], 2);
        let kept = filter_by_category_caps(combos, &CategoryCaps::new([(Category::Vector, -1)]));
        assert_eq!(kept.len(), 1);
        assert!(kept.iter().all(|c| !c.has_category(Category::Vector)));
    }

    #[test]
    fn test_positive_cap_bounds_members() {
        let p = field("p", Category::Number);
        let q = field("q", Category::Number);
        let d = field("d", Category::Date);
        let combos = enumerate_up_to(&[&p, &q, &d], 3);
        let kept = filter_by_category_caps(combos, &CategoryCaps::new([(Category::Number, 1)]));
        let keys: Vec<Vec<String>> = kept.iter().map(|c| c.paths()).collect();
        assert_eq!(
            keys,
            vec![
                vec!["p".to_string()],
                vec!["q".to_string()],
                vec!["d".to_string()],
                vec!["p".to_string(), "d".to_string()],
                vec!["q".to_string(), "d".to_string()],
            ]
        );
    }

    #[test]
    fn test_cap_counts_keyword_subfields() {
        let mut title = field("title", Category::Text);
        title.sub_category = Some(Category::TextKeyword);
        let mut body = field("body", Category::Text);
        body.sub_category = Some(Category::TextKeyword);
        let genre = field("genre", Category::Keyword);
        let combos = enumerate_up_to(&[&title, &body, &genre], 3);
        let caps = CategoryCaps::new([(Category::TextKeyword, 1)]);
        let kept = filter_by_category_caps(combos, &caps);
        assert_eq!(kept.len(), 5);
        assert!(kept.iter().all(|c| c.count_category(Category::TextKeyword) <= 1));
        assert!(kept
            .iter()
            .all(|c| !(c.contains_path("title") && c.contains_path("body"))));
    }

    #[test]
    fn test_requiring_any_of() {
        let a = field("a", Category::Keyword);
        let d = field("d", Category::Date);
        let combos = enumerate_up_to(&[&a, &d], 2);
        let kept = filter_requiring_any_of(combos, &[Category::Date]);
        assert_eq!(kept.len(), 2);
        assert!(kept.iter().all(|c| c.has_category(Category::Date)));
    }

    #[test]
    fn test_requiring_all_paths() {
        let a = field("a", Category::Keyword);
        let b = field("b", Category::Keyword);
        let combos = enumerate_up_to(&[&a, &b], 2);
        let kept = filter_requiring_all_paths(combos.clone(), &["a".to_string()]);
        assert_eq!(kept.len(), 2);
        let kept = filter_requiring_all_paths(combos, &[]);
        assert_eq!(kept.len(), 3);
    }

    #[test]
    fn test_exclude_members() {
        let a = field("a", Category::Keyword);
        let p = field("p", Category::Number);
        let q = field("q", Category::Number);
        let fields = vec![&a, &p, &q];
        let combination = Combination::new([&p]);

        let left = exclude_members(&fields, &combination, &MemberFilter::default());
        assert_eq!(left.len(), 2);

        let left = exclude_members(
            &fields,
            &combination,
            &MemberFilter::categories(&[Category::Number]),
        );
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].path, "q");

        let lists = FieldLists {
            not_stats_fields: vec!["q".into()],
            ..Default::default()
        };
        let filter = MemberFilter::categories(&[Category::Number]).with_lists(&lists, FieldListKind::Stats);
        assert!(exclude_members(&fields, &combination, &filter).is_empty());
    }

    #[test]
    fn test_merged_text_field() {
        let all = field("all_text", Category::Text);
        let title = field("title", Category::Text);
        let k = field("k", Category::Keyword);
        let merged = MergedTextField {
            path: "all_text".into(),
            exclusive: true,
        };
        let pool = apply_merged_text_field(vec![&all, &title, &k], Some(&merged));
        let paths: Vec<&str> = pool.iter().map(|f| f.path.as_str()).collect();
        assert_eq!(paths, vec!["all_text", "k"]);

        let shared = MergedTextField {
            exclusive: false,
            ..merged
        };
        assert_eq!(apply_merged_text_field(vec![&all, &title, &k], Some(&shared)).len(), 3);
    }
}
