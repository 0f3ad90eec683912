//! Combination enumeration over field descriptors.

use std::collections::HashSet;

use esforge_core::Category;
use esforge_schema::FieldDescriptor;
use tracing::debug;

/// Separator for canonical keys. Never valid inside a schema path.
const KEY_SEPARATOR: char = '\u{1f}';

/// An ordered, deduplicated set of fields used together as filter conditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Combination<'a> {
    members: Vec<&'a FieldDescriptor>,
}

impl<'a> Combination<'a> {
    /// Build a combination, dropping repeated paths while keeping first-seen order.
    pub fn new(members: impl IntoIterator<Item = &'a FieldDescriptor>) -> Self {
        let mut seen = HashSet::new();
        let members = members
            .into_iter()
            .filter(|f| seen.insert(f.path.as_str()))
            .collect();
        Self { members }
    }

    /// The empty combination, used by families whose filter part is optional.
    pub fn empty() -> Self {
        Self {
            members: Vec::new(),
        }
    }

    pub fn members(&self) -> &[&'a FieldDescriptor] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn paths(&self) -> Vec<String> {
        self.members.iter().map(|f| f.path.clone()).collect()
    }

    pub fn contains_path(&self, path: &str) -> bool {
        self.members.iter().any(|f| f.path == path)
    }

    /// Canonical identity: sorted member paths joined by a separator.
    pub fn key(&self) -> String {
        let mut paths: Vec<&str> = self.members.iter().map(|f| f.path.as_str()).collect();
        paths.sort_unstable();
        paths.join(&KEY_SEPARATOR.to_string())
    }

    /// Members whose primary or sub-category is `category`.
    pub fn count_category(&self, category: Category) -> usize {
        self.members.iter().filter(|f| f.is(category)).count()
    }

    pub fn has_category(&self, category: Category) -> bool {
        self.members.iter().any(|f| f.is(category))
    }
}

/// All non-empty subsets of size `1..=max_size`, size-ascending, and within a size
/// in input order. A `max_size` above the field count clips silently.
pub fn enumerate_up_to<'a>(fields: &[&'a FieldDescriptor], max_size: usize) -> Vec<Combination<'a>> {
    let mut out = Vec::new();
    let mut seen = HashSet::new();
    let upper = max_size.min(fields.len());

    for k in 1..=upper {
        let mut path = Vec::with_capacity(k);
        choose(fields, k, 0, &mut path, &mut |picked| {
            let combination = Combination::new(picked.iter().copied());
            if combination.len() == k && seen.insert(combination.key()) {
                out.push(combination);
            }
        });
    }

    debug!(
        "Enumerated {} combinations from {} fields (max {})",
        out.len(),
        fields.len(),
        max_size
    );
    out
}

fn choose<'a, F>(
    items: &[&'a FieldDescriptor],
    k: usize,
    start: usize,
    path: &mut Vec<&'a FieldDescriptor>,
    emit: &mut F,
) where
    F: FnMut(&[&'a FieldDescriptor]),
{
    if path.len() == k {
        emit(path);
        return;
    }
    for i in start..items.len() {
        path.push(items[i]);
        choose(items, k, i + 1, path, emit);
        path.pop();
    }
}

/// Enumerate within each custom group and merge, keeping the first occurrence of
/// each canonical key. With no non-empty group this is `enumerate_up_to` over all fields.
pub fn enumerate_custom_groups<'a>(
    fields: &[&'a FieldDescriptor],
    groups: &[Vec<String>],
    max_size: usize,
) -> Vec<Combination<'a>> {
    let groups: Vec<&Vec<String>> = groups.iter().filter(|g| !g.is_empty()).collect();
    if groups.is_empty() {
        return enumerate_up_to(fields, max_size);
    }

    let mut out = Vec::new();
    let mut seen = HashSet::new();
    for group in groups {
        let members: Vec<&FieldDescriptor> = fields
            .iter()
            .copied()
            .filter(|f| group.iter().any(|p| *p == f.path))
            .collect();
        for combination in enumerate_up_to(&members, max_size) {
            if seen.insert(combination.key()) {
                out.push(combination);
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
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

    fn keys(combinations: &[Combination<'_>]) -> Vec<Vec<String>> {
        combinations.iter().map(|c| c.paths()).collect()
    }

    #[test]
    fn test_enumerate_up_to_order() {
        let a = field("a", Category::Keyword);
        let b = field("b", Category::Keyword);
        let c = field("c", Category::Keyword);
        let fields = vec![&a, &b, &c];
        let combos = enumerate_up_to(&fields, 2);
        assert_eq!(
            keys(&combos),
            vec![
                vec!["a"],
                vec!["b"],
                vec!["c"],
                vec!["a", "b"],
                vec!["a", "c"],
                vec!["b", "c"],
            ]
        );
    }

    #[test]
    fn test_max_size_clips_silently() {
        let a = field("a", Category::Keyword);
        let b = field("b", Category::Keyword);
        let combos = enumerate_up_to(&[&a, &b], 10);
        assert_eq!(combos.len(), 3);
    }

    #[test]
    fn test_empty_inputs() {
        assert!(enumerate_up_to(&[], 3).is_empty());
        let a = field("a", Category::Keyword);
        assert!(enumerate_up_to(&[&a], 0).is_empty());
    }

    #[test]
    fn test_custom_groups_never_mix() {
        let a = field("a", Category::Keyword);
        let b = field("b", Category::Keyword);
        let c = field("c", Category::Keyword);
        let fields = vec![&a, &b, &c];
        let groups = vec![vec!["a".to_string(), "b".to_string()], vec!["c".to_string()]];
        let combos = enumerate_custom_groups(&fields, &groups, 2);
        assert_eq!(
            keys(&combos),
            vec![vec!["a"], vec!["b"], vec!["a", "b"], vec!["c"]]
        );
    }

    #[test]
    fn test_custom_groups_dedup_first_wins() {
        let a = field("a", Category::Keyword);
        let b = field("b", Category::Keyword);
        let fields = vec![&a, &b];
        let groups = vec![vec!["a".to_string()], vec!["b".to_string(), "a".to_string()]];
        let combos = enumerate_custom_groups(&fields, &groups, 2);
        assert_eq!(keys(&combos), vec![vec!["a"], vec!["b"], vec!["a", "b"]]);
    }

    #[test]
    fn test_empty_groups_fall_back_to_all_fields() {
        let a = field("a", Category::Keyword);
        let b = field("b", Category::Keyword);
        let combos = enumerate_custom_groups(&[&a, &b], &[vec![]], 2);
        assert_eq!(combos.len(), 3);
    }

    #[test]
    fn test_key_ignores_member_order() {
        let a = field("a", Category::Keyword);
        let b = field("b", Category::Keyword);
        assert_eq!(
            Combination::new([&a, &b]).key(),
            Combination::new([&b, &a]).key()
        );
        assert_eq!(Combination::new([&a, &a]).len(), 1);
    }
}
