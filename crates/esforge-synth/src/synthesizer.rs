//! Runs one family over a catalog: enumerate combinations, pick targets, expand
//! options and build every variant.

use std::collections::HashSet;

use esforge_combine::{
    apply_merged_text_field, assignments, enumerate_custom_groups, exclude_members,
    filter_by_category_caps, filter_requiring_all_paths, filter_requiring_any_of, CategoryCaps,
    Combination, MemberFilter, OptionAssignment, OptionCandidate, OptionExpander, Usage,
};
use esforge_core::{
    CalendarUnit, Category, Error, FieldListKind, GenerationConfig, MetricKind, RecencyWindow,
    Result, SortDirection,
};
use esforge_schema::{FieldCatalog, FieldDescriptor};
use tracing::{debug, info};

use crate::builder::{bind_params, build_query};
use crate::docs::Phrasebook;
use crate::family::{Family, FilterMode, OutputKind};
use crate::naming::{identifier, joined_identifier};
use crate::target::Target;
use crate::variant::{AssignedOption, FamilyOutput, Variant};

const TERM_CATEGORIES: &[Category] = &[
    Category::Keyword,
    Category::Number,
    Category::Boolean,
    Category::Ip,
];

pub struct Synthesizer<'a> {
    catalog: &'a FieldCatalog,
    config: &'a GenerationConfig,
    expander: OptionExpander,
    phrases: Phrasebook,
    index_display: String,
}

impl<'a> Synthesizer<'a> {
    pub fn new(catalog: &'a FieldCatalog, config: &'a GenerationConfig) -> Self {
        Self {
            catalog,
            config,
            expander: OptionExpander::from_config(config),
            phrases: Phrasebook::new(config.doc_language),
            index_display: catalog.display_name(),
        }
    }

    /// Synthesize every variant of `family`. A contract violation aborts the family.
    pub fn run(&self, family: Family) -> Result<FamilyOutput> {
        let mut sink = Sink::new(family);

        match family.kind {
            OutputKind::Term => self.run_term(&mut sink)?,
            OutputKind::Filter => self.run_filter(&mut sink)?,
            OutputKind::Knn => self.run_knn(&mut sink)?,
            _ => match family.mode {
                FilterMode::Recent => {
                    let combinations = self.mode_combinations(family);
                    for window in OptionExpander::windows() {
                        self.run_combinations(&mut sink, &combinations, Some(*window))?;
                    }
                }
                _ => {
                    let combinations = self.mode_combinations(family);
                    self.run_combinations(&mut sink, &combinations, None)?;
                }
            },
        }

        info!(
            "Synthesized {} variants for {} ({} combinations)",
            sink.variants.len(),
            family,
            sink.combinations
        );
        Ok(FamilyOutput {
            family,
            index: self.catalog.index.clone(),
            variants: sink.variants,
        })
    }

    fn all_fields(&self) -> Vec<&'a FieldDescriptor> {
        self.catalog.fields().iter().collect()
    }

    /// Filterable non-vector fields, with the merged text field applied.
    fn filter_pool(&self, family: Family) -> Vec<&'a FieldDescriptor> {
        let ranged = matches!(family.mode, FilterMode::Range | FilterMode::Recent);
        let pool: Vec<&'a FieldDescriptor> = self
            .catalog
            .filterable()
            .into_iter()
            .filter(|f| f.category != Category::Vector)
            .filter(|f| {
                !ranged
                    || !matches!(f.category, Category::Number | Category::Date)
                    || self.config.lists.admits(FieldListKind::Range, &f.path)
            })
            .collect();
        apply_merged_text_field(pool, self.config.merged_text_field().as_ref())
    }

    fn combinations(
        &self,
        pool: &[&'a FieldDescriptor],
        max: usize,
        caps: &CategoryCaps,
        required: &[Category],
    ) -> Vec<Combination<'a>> {
        let combinations = enumerate_custom_groups(pool, &self.config.groups(), max);
        let combinations = filter_by_category_caps(combinations, caps);
        let combinations = filter_requiring_any_of(combinations, required);
        filter_requiring_all_paths(combinations, &self.config.required_fields)
    }

    fn mode_combinations(&self, family: Family) -> Vec<Combination<'a>> {
        let max = if family.kind.has_target() {
            self.config.target_max_combine()
        } else {
            self.config.max_combine()
        };
        self.combinations(
            &self.filter_pool(family),
            max,
            &family.mode.caps(),
            family.mode.required_categories(),
        )
    }

    fn usage(mode: FilterMode, window: Option<RecencyWindow>) -> Usage {
        match (mode, window) {
            (FilterMode::Recent, Some(window)) => Usage::Recent(window),
            (FilterMode::Range, _) | (FilterMode::Recent, None) => Usage::Range,
            (FilterMode::Match, _) => Usage::Filter,
        }
    }

    fn run_combinations(
        &self,
        sink: &mut Sink,
        combinations: &[Combination<'a>],
        window: Option<RecencyWindow>,
    ) -> Result<()> {
        let family = sink.family;
        let usage = Self::usage(family.mode, window);
        for combination in combinations {
            let before = sink.variants.len();
            let tuples = assignments(combination, &self.expander, usage);
            for target in self.targets(family.kind, combination, window) {
                for tuple in &tuples {
                    self.emit(sink, combination, tuple, target, window)?;
                }
            }
            sink.combinations += 1;
            debug!(
                "{} [{}]: {} variants",
                family,
                combination.paths().join(", "),
                sink.variants.len() - before
            );
        }
        Ok(())
    }

    fn run_term(&self, sink: &mut Sink) -> Result<()> {
        let pool: Vec<&'a FieldDescriptor> = self
            .all_fields()
            .into_iter()
            .filter(|f| TERM_CATEGORIES.contains(&f.category))
            .collect();
        let combinations = self.combinations(
            &pool,
            self.config.max_combine(),
            &CategoryCaps::default(),
            &[],
        );
        self.run_combinations(sink, &combinations, None)
    }

    /// One text field searched under keyword filters.
    fn run_filter(&self, sink: &mut Sink) -> Result<()> {
        let texts: Vec<&'a FieldDescriptor> = self
            .filter_pool(sink.family)
            .into_iter()
            .filter(|f| f.category == Category::Text)
            .collect();
        let keywords: Vec<&'a FieldDescriptor> = self
            .all_fields()
            .into_iter()
            .filter(|f| f.category == Category::Keyword)
            .collect();
        let keyword_combinations = enumerate_custom_groups(
            &keywords,
            &self.config.groups(),
            self.config.target_max_combine(),
        );

        let mut combinations = Vec::new();
        for text in &texts {
            for keyword_combination in &keyword_combinations {
                combinations.push(Combination::new(
                    std::iter::once(*text).chain(keyword_combination.members().iter().copied()),
                ));
            }
        }
        let combinations = filter_requiring_all_paths(combinations, &self.config.required_fields);
        self.run_combinations(sink, &combinations, None)
    }

    /// The vector member becomes the target, the other members the pre-filter.
    fn run_knn(&self, sink: &mut Sink) -> Result<()> {
        let pool: Vec<&'a FieldDescriptor> = apply_merged_text_field(
            self.catalog.filterable(),
            self.config.merged_text_field().as_ref(),
        );
        let combinations = self.combinations(
            &pool,
            self.config.max_combine(),
            &CategoryCaps::new([(Category::Vector, 1)]),
            &[Category::Vector],
        );

        for combination in &combinations {
            let Some(vector) = combination
                .members()
                .iter()
                .copied()
                .find(|f| f.category == Category::Vector)
            else {
                continue;
            };
            let filters = Combination::new(
                combination
                    .members()
                    .iter()
                    .copied()
                    .filter(|f| f.path != vector.path),
            );
            let before = sink.variants.len();
            for tuple in assignments(&filters, &self.expander, Usage::Filter) {
                self.emit(sink, combination, &tuple, Target::Knn { field: vector }, None)?;
            }
            sink.combinations += 1;
            debug!(
                "{} [{}]: {} variants",
                sink.family,
                combination.paths().join(", "),
                sink.variants.len() - before
            );
        }
        Ok(())
    }

    /// Fields outside `combination` that may serve as targets.
    fn outside(
        &self,
        combination: &Combination<'_>,
        categories: &[Category],
        kind: FieldListKind,
    ) -> Vec<&'a FieldDescriptor> {
        let filter = MemberFilter::categories(categories).with_lists(&self.config.lists, kind);
        exclude_members(&self.all_fields(), combination, &filter)
    }

    /// Date fields a date histogram buckets on, each with its candidate units.
    /// Inside a recency window the windowed member itself is bucketed.
    fn date_buckets(
        &self,
        combination: &Combination<'a>,
        window: Option<RecencyWindow>,
    ) -> Vec<(&'a FieldDescriptor, Vec<CalendarUnit>)> {
        match window {
            Some(window) => combination
                .members()
                .iter()
                .copied()
                .filter(|f| {
                    f.category == Category::Date
                        && self.config.lists.admits(FieldListKind::DateHist, &f.path)
                })
                .map(|f| (f, window.bucket_units().to_vec()))
                .collect(),
            None => self
                .outside(combination, &[Category::Date], FieldListKind::DateHist)
                .into_iter()
                .map(|f| (f, self.units(f)))
                .collect(),
        }
    }

    fn units(&self, field: &FieldDescriptor) -> Vec<CalendarUnit> {
        self.expander
            .expand(field, Usage::DateBucket)
            .into_iter()
            .filter_map(|option| match option {
                OptionCandidate::Bucket(unit) => Some(unit),
                _ => None,
            })
            .collect()
    }

    fn directions(&self, field: &FieldDescriptor) -> Vec<SortDirection> {
        self.expander
            .expand(field, Usage::TopN)
            .into_iter()
            .filter_map(|option| match option {
                OptionCandidate::Direction(direction) => Some(direction),
                _ => None,
            })
            .collect()
    }

    /// Target choices for one combination, target field then axis.
    fn targets(
        &self,
        kind: OutputKind,
        combination: &Combination<'a>,
        window: Option<RecencyWindow>,
    ) -> Vec<Target<'a>> {
        let mut out = Vec::new();
        match kind {
            OutputKind::Detail | OutputKind::Term | OutputKind::Filter => out.push(Target::None),
            OutputKind::Knn => {}
            OutputKind::TopN => {
                for field in self.outside(
                    combination,
                    &[Category::Number, Category::Date],
                    FieldListKind::TopN,
                ) {
                    for direction in self.directions(field) {
                        out.push(Target::TopN { field, direction });
                    }
                }
            }
            OutputKind::Terms => {
                for field in self.outside(
                    combination,
                    &[Category::Keyword, Category::TextKeyword],
                    FieldListKind::Terms,
                ) {
                    out.push(Target::Terms { field });
                }
            }
            OutputKind::Stats => {
                for field in self.outside(combination, &[Category::Number], FieldListKind::Stats) {
                    for metric in MetricKind::ALL {
                        out.push(Target::Stats { field, metric });
                    }
                }
            }
            OutputKind::Hist => {
                for field in self.outside(combination, &[Category::Number], FieldListKind::Hist) {
                    out.push(Target::Hist { field });
                }
            }
            OutputKind::HistStats => {
                let metric_fields =
                    self.outside(combination, &[Category::Number], FieldListKind::HistStats);
                for bucket in self.outside(combination, &[Category::Number], FieldListKind::Hist) {
                    for field in metric_fields.iter().copied().filter(|f| f.path != bucket.path) {
                        for metric in MetricKind::ALL {
                            out.push(Target::HistStats {
                                bucket,
                                field,
                                metric,
                            });
                        }
                    }
                }
            }
            OutputKind::DateHist => {
                for (field, units) in self.date_buckets(combination, window) {
                    for unit in units {
                        out.push(Target::DateHist { field, unit });
                    }
                }
            }
            OutputKind::DateHistStats => {
                let metric_fields =
                    self.outside(combination, &[Category::Number], FieldListKind::HistStats);
                for (date, units) in self.date_buckets(combination, window) {
                    for unit in units {
                        for field in metric_fields.iter().copied() {
                            for metric in MetricKind::ALL {
                                out.push(Target::DateHistStats {
                                    date,
                                    unit,
                                    field,
                                    metric,
                                });
                            }
                        }
                    }
                }
            }
        }
        out
    }

    fn emit(
        &self,
        sink: &mut Sink,
        combination: &Combination<'a>,
        tuple: &[OptionAssignment<'a>],
        target: Target<'a>,
        window: Option<RecencyWindow>,
    ) -> Result<()> {
        let family = sink.family;
        let mut name = identifier(family, &self.index_display, tuple, &target);
        if sink.seen.contains(&name) {
            let joined = joined_identifier(family, &self.index_display, tuple, &target);
            if sink.seen.contains(&joined) {
                return Err(Error::Contract(format!(
                    "{}: identifier {} for [{}] is already taken",
                    family,
                    joined,
                    combination.paths().join(", ")
                )));
            }
            debug!("{}: {} is taken, using {}", family, name, joined);
            name = joined;
        }
        sink.seen.insert(name.clone());

        let (params, slots) = bind_params(tuple, &target, &self.phrases)?;
        let query = build_query(tuple, &slots, &target, self.config.term_placement())?;
        let summary = self
            .phrases
            .summary(family, &self.catalog.comment, tuple, &target);

        let variant = Variant {
            identifier: name,
            doc: self.phrases.document(&summary, &params),
            params,
            query,
            combination: combination.paths(),
            options: tuple.iter().map(AssignedOption::from).collect(),
            target: target.choice(window),
        };
        variant.check_contract()?;
        sink.variants.push(variant);
        Ok(())
    }
}

struct Sink {
    family: Family,
    variants: Vec<Variant>,
    seen: HashSet<String>,
    combinations: usize,
}

impl Sink {
    fn new(family: Family) -> Self {
        Self {
            family,
            variants: Vec::new(),
            seen: HashSet::new(),
            combinations: 0,
        }
    }
}
