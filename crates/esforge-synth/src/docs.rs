//! Documentation phrases for generated functions, in Chinese or English.

use esforge_core::{CmpOp, DocLanguage, RecencyWindow};
use esforge_combine::{OptionAssignment, OptionCandidate};
use esforge_schema::FieldDescriptor;

use crate::family::{Family, FilterMode, OutputKind};
use crate::params::ParamList;
use crate::target::Target;

#[derive(Debug, Clone, Copy)]
pub struct Phrasebook {
    lang: DocLanguage,
}

impl Phrasebook {
    pub fn new(lang: DocLanguage) -> Self {
        Self { lang }
    }

    fn zh(&self) -> bool {
        self.lang == DocLanguage::Zh
    }

    fn list_sep(&self) -> &'static str {
        if self.zh() {
            "、"
        } else {
            ", "
        }
    }

    /// `价格大于等于和小于等于` / `price at least and at most`.
    pub fn condition(&self, assignment: &OptionAssignment<'_>) -> String {
        let comment = &assignment.field.comment;
        match &assignment.option {
            OptionCandidate::Compare(set) => {
                let names: Vec<&str> = set.ops().iter().map(|op| op.display_name(self.lang)).collect();
                if self.zh() {
                    format!("{}{}", comment, names.join("和"))
                } else {
                    format!("{} {}", comment, names.join(" and "))
                }
            }
            OptionCandidate::Recent(window) => self.recent(comment, *window),
            _ => comment.clone(),
        }
    }

    fn recent(&self, comment: &str, window: RecencyWindow) -> String {
        if self.zh() {
            format!("{}{}", comment, window.display_name(self.lang))
        } else {
            format!("{} {}", comment, window.display_name(self.lang))
        }
    }

    pub fn conditions(&self, assignments: &[&OptionAssignment<'_>]) -> String {
        assignments
            .iter()
            .map(|a| self.condition(a))
            .collect::<Vec<_>>()
            .join(self.list_sep())
    }

    /// Purpose of an equality or vector parameter.
    pub fn field_purpose(&self, field: &FieldDescriptor, vector: bool) -> String {
        match (vector, self.zh()) {
            (true, true) => format!("{}的查询向量", field.comment),
            (true, false) => format!("query vector for {}", field.comment),
            (false, _) => field.comment.clone(),
        }
    }

    pub fn compare_purpose(&self, field: &FieldDescriptor, op: CmpOp) -> String {
        if self.zh() {
            format!("{}{}", field.comment, op.display_name(self.lang))
        } else {
            format!("{} {}", field.comment, op.display_name(self.lang))
        }
    }

    pub fn recent_purpose(&self, field: &FieldDescriptor, window: RecencyWindow) -> String {
        self.recent(&field.comment, window)
    }

    pub fn size_purpose(&self) -> String {
        if self.zh() {
            "返回的最大数据条数".into()
        } else {
            "maximum number of documents to return".into()
        }
    }

    pub fn interval_purpose(&self, field: &FieldDescriptor) -> String {
        if self.zh() {
            format!("{}直方图的区间间隔", field.comment)
        } else {
            format!("bucket width of the {} histogram", field.comment)
        }
    }

    /// Summary sentence for one variant.
    pub fn summary(
        &self,
        family: Family,
        index_comment: &str,
        assignments: &[OptionAssignment<'_>],
        target: &Target<'_>,
    ) -> String {
        let all: Vec<&OptionAssignment<'_>> = assignments.iter().collect();
        let conds = self.conditions(&all);
        if self.zh() {
            self.summary_zh(family, index_comment, &conds, assignments, target)
        } else {
            capitalize(&self.summary_en(family, index_comment, &conds, assignments, target))
        }
    }

    fn summary_zh(
        &self,
        family: Family,
        index: &str,
        conds: &str,
        assignments: &[OptionAssignment<'_>],
        target: &Target<'_>,
    ) -> String {
        let lead = if conds.is_empty() {
            String::new()
        } else {
            format!("根据{}", conds)
        };
        match *target {
            Target::None => match (family.kind, family.mode) {
                (OutputKind::Term, _) => format!("以{}为条件精确查询{}的详细数据列表和总数量", conds, index),
                (OutputKind::Filter, _) => {
                    let (text, rest) = split_text(assignments);
                    format!(
                        "以{}为过滤条件对{}进行检索查询{}的详细数据",
                        self.conditions(&rest),
                        self.conditions(&text),
                        index
                    )
                }
                (_, FilterMode::Range) => format!("从{}查找{}指定数值的详细数据列表和总数量", index, conds),
                (_, FilterMode::Recent) => format!("从{}查找{}的详细数据列表和总数量", index, conds),
                (_, FilterMode::Match) => format!("{}检索{}的详细数据列表和总数量", lead, index),
            },
            Target::TopN { field, direction } => format!(
                "{}检索{}中{}{}的前N条详细数据",
                lead,
                index,
                field.comment,
                direction.display_name(self.lang)
            ),
            Target::Knn { field } => {
                if conds.is_empty() {
                    format!("按{}向量相似度检索{}最相似的数据", field.comment, index)
                } else {
                    format!("{}过滤后按{}向量相似度检索{}最相似的数据", lead, field.comment, index)
                }
            }
            Target::Terms { field } => format!("{}检索{}并分组统计{}的分布情况", lead, index, field.comment),
            Target::Stats { field, metric } => format!(
                "{}检索{}并统计{}的{}",
                lead,
                index,
                field.comment,
                metric.display_name(self.lang)
            ),
            Target::Hist { field } => format!(
                "{}检索{}并按{}区间分桶统计记录数量的直方图分布",
                lead, index, field.comment
            ),
            Target::HistStats {
                bucket,
                field,
                metric,
            } => format!(
                "{}检索{}，并按{}区间分桶统计{}的{}",
                lead,
                index,
                bucket.comment,
                field.comment,
                metric.display_name(self.lang)
            ),
            Target::DateHist { field, unit } => format!(
                "{}检索{}并按{}分桶统计{}的记录数量直方图分布",
                lead,
                index,
                field.comment,
                unit.display_name(self.lang)
            ),
            Target::DateHistStats {
                date,
                unit,
                field,
                metric,
            } => format!(
                "{}检索{}，并按{}分桶统计{}{}的{}",
                lead,
                index,
                date.comment,
                unit.display_name(self.lang),
                field.comment,
                metric.display_name(self.lang)
            ),
        }
    }

    fn summary_en(
        &self,
        family: Family,
        index: &str,
        conds: &str,
        assignments: &[OptionAssignment<'_>],
        target: &Target<'_>,
    ) -> String {
        let lead = if conds.is_empty() {
            String::new()
        } else {
            format!(" filtered by {}", conds)
        };
        match *target {
            Target::None => match (family.kind, family.mode) {
                (OutputKind::Term, _) => {
                    format!("Exact lookup of {} documents and total count by {}", index, conds)
                }
                (OutputKind::Filter, _) => {
                    let (text, rest) = split_text(assignments);
                    format!(
                        "Search {} in {} documents filtered by {}",
                        self.conditions(&text),
                        index,
                        self.conditions(&rest)
                    )
                }
                (_, FilterMode::Range) | (_, FilterMode::Recent) => {
                    format!("Find {} documents and total count where {}", index, conds)
                }
                (_, FilterMode::Match) => {
                    format!("Search {} documents and total count{}", index, lead)
                }
            },
            Target::TopN { field, direction } => format!(
                "Top N {} documents with the {} {}{}",
                index,
                direction.display_name(self.lang),
                field.comment,
                lead
            ),
            Target::Knn { field } => format!(
                "Nearest {} documents by {} similarity{}",
                index, field.comment, lead
            ),
            Target::Terms { field } => {
                format!("Distribution of {} over {} documents{}", field.comment, index, lead)
            }
            Target::Stats { field, metric } => format!(
                "{} of {} over {} documents{}",
                metric.display_name(self.lang),
                field.comment,
                index,
                lead
            ),
            Target::Hist { field } => format!(
                "Histogram of document counts by {} over {} documents{}",
                field.comment, index, lead
            ),
            Target::HistStats {
                bucket,
                field,
                metric,
            } => format!(
                "{} of {} per {} bucket over {} documents{}",
                metric.display_name(self.lang),
                field.comment,
                bucket.comment,
                index,
                lead
            ),
            Target::DateHist { field, unit } => format!(
                "Document counts by {} {} over {} documents{}",
                field.comment,
                unit.display_name(self.lang),
                index,
                lead
            ),
            Target::DateHistStats {
                date,
                unit,
                field,
                metric,
            } => format!(
                "{} of {} by {} {} over {} documents{}",
                metric.display_name(self.lang),
                field.comment,
                date.comment,
                unit.display_name(self.lang),
                index,
                lead
            ),
        }
    }

    /// Summary line followed by one `name type purpose` line per parameter.
    /// Line breaks inside schema comments are flattened.
    pub fn document(&self, summary: &str, params: &ParamList) -> String {
        let mut lines = vec![one_line(summary)];
        lines.extend(
            params
                .iter()
                .map(|p| format!("{} {} {}", p.name, p.ty, one_line(&p.purpose))),
        );
        lines.join("\n")
    }
}

fn capitalize(sentence: &str) -> String {
    let mut chars = sentence.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn one_line(text: &str) -> String {
    text.split(['\r', '\n'])
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn split_text<'s, 'a>(
    assignments: &'s [OptionAssignment<'a>],
) -> (Vec<&'s OptionAssignment<'a>>, Vec<&'s OptionAssignment<'a>>) {
    assignments
        .iter()
        .partition(|a| a.field.category == esforge_core::Category::Text)
}
