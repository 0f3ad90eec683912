//! Property-based checks over randomly shaped catalogs.

use std::collections::{BTreeMap, HashSet};

use esforge_combine::{OptionExpander, Usage};
use esforge_core::{Category, GenerationConfig, ParamType};
use esforge_schema::{FieldCatalog, FieldDescriptor};
use esforge_synth::{Family, FilterMode, OutputKind, Synthesizer};
use proptest::prelude::*;

fn param_type(category: Category) -> ParamType {
    match category {
        Category::Number => ParamType::F64,
        Category::Date => ParamType::Date,
        Category::Boolean => ParamType::Bool,
        Category::Vector => ParamType::Vector,
        _ => ParamType::Str,
    }
}

fn arb_catalog() -> impl Strategy<Value = FieldCatalog> {
    let categories = prop::sample::select(vec![
        Category::Text,
        Category::Keyword,
        Category::Number,
        Category::Date,
        Category::Boolean,
        Category::Vector,
    ]);
    prop::collection::vec(categories, 1..6).prop_map(|categories| {
        let fields = categories
            .into_iter()
            .enumerate()
            .map(|(i, category)| FieldDescriptor {
                path: format!("f{}", i),
                display_name: format!("F{}", i),
                raw_type: String::new(),
                category,
                sub_category: None,
                comment: format!("字段{}", i),
                param_type: param_type(category),
            })
            .collect();
        FieldCatalog::new("books", "图书", fields)
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    /// Every family succeeds, identifiers are unique and each variant's
    /// artifacts agree with each other.
    #[test]
    fn prop_families_produce_aligned_variants(catalog in arb_catalog(), max in 1usize..4) {
        let config = GenerationConfig { max_combine: max, ..Default::default() };
        let synth = Synthesizer::new(&catalog, &config);
        for family in Family::all() {
            let output = synth.run(family);
            prop_assert!(output.is_ok());
            let output = output.unwrap();
            let mut seen = HashSet::new();
            for variant in &output.variants {
                prop_assert!(seen.insert(variant.identifier.clone()));
                prop_assert!(variant.check_contract().is_ok());
                prop_assert_eq!(variant.doc.lines().count(), variant.params.len() + 1);
                prop_assert!(variant.options.len() <= variant.combination.len());
            }
        }
    }

    /// Per combination the variant count equals the product of candidate-list sizes.
    #[test]
    fn prop_range_variant_count_is_cartesian(catalog in arb_catalog()) {
        let config = GenerationConfig { max_combine: 2, ..Default::default() };
        let output = Synthesizer::new(&catalog, &config)
            .run(Family::new(FilterMode::Range, OutputKind::Detail))
            .unwrap();

        let mut counts: BTreeMap<Vec<String>, usize> = BTreeMap::new();
        for variant in &output.variants {
            *counts.entry(variant.combination.clone()).or_insert(0) += 1;
        }

        let expander = OptionExpander::default();
        for (paths, count) in counts {
            let expected: usize = paths
                .iter()
                .filter_map(|p| catalog.get(p))
                .map(|f| expander.expand(f, Usage::Range).len())
                .product();
            prop_assert_eq!(count, expected);
        }
    }
}
