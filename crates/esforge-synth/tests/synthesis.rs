//! End-to-end synthesis over small in-memory schemas.

use std::collections::HashSet;

use esforge_combine::OptionCandidate;
use esforge_core::{GenerationConfig, RecencyWindow, SortDirection};
use esforge_schema::{FieldCatalog, SchemaOptions};
use esforge_synth::{Family, FilterMode, OutputKind, QueryRoot, SizeSpec, Synthesizer, Variant};

const BOOKS: &str = r#"{
  "mappings": {
    "_meta": {"comment": "图书"},
    "properties": {
      "title": {"type": "text", "fields": {"keyword": {"type": "keyword"}}, "meta": {"comment": "标题"}},
      "price": {"type": "float", "meta": {"comment": "价格"}},
      "published": {"type": "date", "meta": {"comment": "出版日期"}}
    }
  }
}"#;

const LIBRARY: &str = r#"{
  "mappings": {
    "_meta": {"comment": "图书"},
    "properties": {
      "title": {"type": "text", "fields": {"keyword": {"type": "keyword"}}, "meta": {"comment": "标题"}},
      "genre": {"type": "keyword", "meta": {"comment": "类别"}},
      "price": {"type": "float", "meta": {"comment": "价格"}},
      "rating": {"type": "integer", "meta": {"comment": "评分"}},
      "published": {"type": "date", "meta": {"comment": "出版日期"}},
      "embedding": {"type": "dense_vector", "meta": {"comment": "向量"}}
    }
  }
}"#;

fn catalog(text: &str) -> FieldCatalog {
    FieldCatalog::from_json(text, "books", &SchemaOptions::default()).unwrap()
}

fn config(max_combine: usize) -> GenerationConfig {
    GenerationConfig {
        max_combine,
        ..Default::default()
    }
}

fn with_combination<'v>(variants: &'v [Variant], paths: &[&str]) -> Vec<&'v Variant> {
    variants
        .iter()
        .filter(|v| v.combination.iter().map(String::as_str).eq(paths.iter().copied()))
        .collect()
}

#[test]
fn test_price_and_published_example() {
    let catalog = catalog(BOOKS);
    let config = config(2);
    let synth = Synthesizer::new(&catalog, &config);

    let range = synth
        .run(Family::new(FilterMode::Range, OutputKind::Detail))
        .unwrap();
    let price = with_combination(&range.variants, &["price"]);
    assert_eq!(price.len(), 5);
    assert!(price
        .iter()
        .any(|v| v.identifier == "RangeBooksByPriceGteLte"));

    let recent = synth
        .run(Family::new(FilterMode::Recent, OutputKind::Detail))
        .unwrap();
    let week: Vec<&Variant> = with_combination(&recent.variants, &["price", "published"])
        .into_iter()
        .filter(|v| v.target.window == Some(RecencyWindow::Week))
        .collect();
    assert_eq!(week.len(), 5);
    assert!(week
        .iter()
        .all(|v| v.options[1].option == OptionCandidate::Recent(RecencyWindow::Week)));
    assert!(with_combination(&recent.variants, &["price"]).is_empty());
}

#[test]
fn test_every_family_satisfies_the_contract() {
    let catalog = catalog(LIBRARY);
    let config = config(3);
    let synth = Synthesizer::new(&catalog, &config);

    for family in Family::all() {
        let output = synth.run(family).unwrap();
        let mut seen = HashSet::new();
        for variant in &output.variants {
            variant.check_contract().unwrap();
            assert!(seen.insert(variant.identifier.clone()), "{}", variant.identifier);
        }
        assert_eq!(output.index, "books");
    }
}

#[test]
fn test_detail_match_identifiers_and_docs() {
    let catalog = catalog(LIBRARY);
    let config = config(2);
    let output = Synthesizer::new(&catalog, &config)
        .run(Family::new(FilterMode::Match, OutputKind::Detail))
        .unwrap();

    let genre = output
        .variants
        .iter()
        .find(|v| v.identifier == "QueryBooksByGenre")
        .unwrap();
    assert_eq!(genre.params.names(), vec!["genre"]);
    let lines: Vec<&str> = genre.doc.lines().collect();
    assert_eq!(lines[0], "根据类别检索图书的详细数据列表和总数量");
    assert_eq!(lines[1], "genre String 类别");

    assert!(output
        .variants
        .iter()
        .all(|v| !v.combination.contains(&"embedding".to_string())));
}

#[test]
fn test_knn_variants() {
    let catalog = catalog(LIBRARY);
    let config = config(2);
    let output = Synthesizer::new(&catalog, &config)
        .run(Family::new(FilterMode::Match, OutputKind::Knn))
        .unwrap();

    let lone = output
        .variants
        .iter()
        .find(|v| v.identifier == "KnnEmbeddingOfBooks")
        .unwrap();
    assert!(matches!(lone.query.root, QueryRoot::Knn { filter: None, .. }));

    let filtered = output
        .variants
        .iter()
        .find(|v| v.identifier == "KnnEmbeddingOfBooksByGenre")
        .unwrap();
    assert!(matches!(filtered.query.root, QueryRoot::Knn { filter: Some(_), .. }));
    assert!(output
        .variants
        .iter()
        .all(|v| v.combination.contains(&"embedding".to_string())));
}

#[test]
fn test_topn_targets_stay_outside_the_combination() {
    let catalog = catalog(LIBRARY);
    let config = config(2);
    let output = Synthesizer::new(&catalog, &config)
        .run(Family::new(FilterMode::Match, OutputKind::TopN))
        .unwrap();

    for variant in &output.variants {
        let target = &variant.target.fields[0];
        assert!(!variant.combination.contains(target));
        assert!(matches!(variant.query.size, Some(SizeSpec::Param { .. })));
    }
    let by_genre = with_combination(&output.variants, &["genre"]);
    // price, published, rating; both directions each
    assert_eq!(by_genre.len(), 6);
    assert!(by_genre
        .iter()
        .any(|v| v.identifier == "MinNRatingOfBooksByGenre"
            && v.target.direction == Some(SortDirection::Asc)));
}

#[test]
fn test_recent_date_histogram_buckets_the_windowed_field() {
    let catalog = catalog(LIBRARY);
    let config = config(2);
    let output = Synthesizer::new(&catalog, &config)
        .run(Family::new(FilterMode::Recent, OutputKind::DateHist))
        .unwrap();

    assert!(!output.is_empty());
    for variant in &output.variants {
        assert_eq!(variant.target.fields, vec!["published".to_string()]);
        let window = variant.target.window.unwrap();
        let unit = variant.target.bucket.unwrap();
        assert!(window.bucket_units().contains(&unit));
        assert_eq!(variant.query.size, Some(SizeSpec::Fixed { value: 0 }));
    }
}

#[test]
fn test_term_placement_and_required_fields() {
    let catalog = catalog(LIBRARY);
    let config = GenerationConfig {
        max_combine: 2,
        term_in_should: true,
        required_fields: vec!["genre".into()],
        ..Default::default()
    };
    let output = Synthesizer::new(&catalog, &config)
        .run(Family::new(FilterMode::Match, OutputKind::Term))
        .unwrap();

    assert!(!output.is_empty());
    for variant in &output.variants {
        assert!(variant.combination.contains(&"genre".to_string()));
        match &variant.query.root {
            QueryRoot::Bool(node) => {
                assert!(node.filter.is_empty());
                assert!(!node.should.is_empty());
            }
            other => panic!("unexpected root {:?}", other),
        }
    }
    assert!(output
        .variants
        .iter()
        .all(|v| !v.combination.contains(&"title".to_string())));
}

#[test]
fn test_filter_family_pairs_text_with_keywords() {
    let catalog = catalog(LIBRARY);
    let config = config(3);
    let output = Synthesizer::new(&catalog, &config)
        .run(Family::new(FilterMode::Match, OutputKind::Filter))
        .unwrap();
    assert_eq!(output.identifiers(), vec!["QueryBooksByTitleFilterGenre"]);
}

#[test]
fn test_runs_are_deterministic() {
    let catalog = catalog(LIBRARY);
    let config = config(3);
    let synth = Synthesizer::new(&catalog, &config);
    let family = Family::new(FilterMode::Range, OutputKind::HistStats);
    let first = serde_json::to_string(&synth.run(family).unwrap()).unwrap();
    let second = serde_json::to_string(&synth.run(family).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_schema_without_targets_emits_nothing() {
    let catalog = catalog(
        r#"{"mappings": {"properties": {"genre": {"type": "keyword"}}}}"#,
    );
    let config = GenerationConfig::default();
    let output = Synthesizer::new(&catalog, &config)
        .run(Family::new(FilterMode::Match, OutputKind::Stats))
        .unwrap();
    assert!(output.is_empty());
}

#[test]
fn test_log_style_field_names_synthesize_in_every_family() {
    let catalog = FieldCatalog::from_json(
        r#"{"mappings": {"properties": {
            "@timestamp": {"type": "date"},
            "level": {"type": "keyword"},
            "bytes": {"type": "long"},
            "client-ip": {"type": "ip"},
            "user.name": {"type": "keyword"},
            "message": {"type": "text"}
        }}}"#,
        "logs",
        &SchemaOptions::default(),
    )
    .unwrap();
    assert_eq!(catalog.get("@timestamp").unwrap().display_name, "Timestamp");
    assert_eq!(catalog.get("user.name").unwrap().display_name, "UserName");

    let config = GenerationConfig::default();
    let synth = Synthesizer::new(&catalog, &config);
    let mut total = 0;
    for family in Family::all() {
        let output = synth
            .run(family)
            .unwrap_or_else(|e| panic!("{} failed: {}", family, e));
        for variant in &output.variants {
            variant.check_contract().unwrap();
        }
        total += output.len();
    }
    assert!(total > 0);

    let range = synth
        .run(Family::new(FilterMode::Range, OutputKind::Detail))
        .unwrap();
    assert!(range
        .variants
        .iter()
        .any(|v| v.identifier.starts_with("RangeLogsByTimestamp")
            && v.params.names().iter().all(|n| n.starts_with("timestamp"))));
}

#[test]
fn test_nested_and_flat_fields_sharing_a_name() {
    let catalog = FieldCatalog::from_json(
        r#"{"mappings": {"properties": {
            "menu_items": {"type": "nested", "properties": {"price": {"type": "float"}}},
            "menu_items_price": {"type": "float"}
        }}}"#,
        "cafe",
        &SchemaOptions::default(),
    )
    .unwrap();
    let config = config(2);
    let synth = Synthesizer::new(&catalog, &config);
    for family in Family::all() {
        synth
            .run(family)
            .unwrap_or_else(|e| panic!("{} failed: {}", family, e));
    }

    let detail = synth
        .run(Family::new(FilterMode::Match, OutputKind::Detail))
        .unwrap();
    let both = with_combination(&detail.variants, &["menu_items.price", "menu_items_price"]);
    assert_eq!(both.len(), 1);
    let names = both[0].params.names();
    assert_eq!(names.len(), 2);
    assert_ne!(names[0], names[1]);
}

#[test]
fn test_ambiguous_concatenations_keep_every_variant() {
    let catalog = FieldCatalog::from_json(
        r#"{"mappings": {"properties": {
            "a": {"type": "keyword"},
            "a_b": {"type": "keyword"},
            "b_c": {"type": "keyword"},
            "c": {"type": "keyword"}
        }}}"#,
        "x",
        &SchemaOptions::default(),
    )
    .unwrap();
    let config = config(2);
    let synth = Synthesizer::new(&catalog, &config);

    for kind in [OutputKind::Detail, OutputKind::Term] {
        let output = synth.run(Family::new(FilterMode::Match, kind)).unwrap();
        // C(4,1) + C(4,2)
        assert_eq!(output.len(), 10);
        let ids: HashSet<&str> = output.identifiers().into_iter().collect();
        assert_eq!(ids.len(), 10);
    }

    let detail = synth
        .run(Family::new(FilterMode::Match, OutputKind::Detail))
        .unwrap();
    let ids = detail.identifiers();
    assert!(ids.contains(&"QueryXByABC"));
    assert!(ids.contains(&"QueryXByABAndC"));
}
