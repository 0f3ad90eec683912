//! Binds parameters to a variant's conditions and builds its query body.

use esforge_core::{Category, CmpOp, Error, ParamType, Result, TermPlacement};
use esforge_combine::{OptionAssignment, OptionCandidate};

use crate::docs::Phrasebook;
use crate::params::ParamList;
use crate::query::{AggKind, AggNode, BoolNode, Bound, Leaf, QueryBody, QueryRoot, SizeSpec, SortNode};
use crate::target::Target;

/// Parameter names chosen for each part of a variant.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Slots {
    /// One entry per assignment, one name per operator for comparisons.
    pub conditions: Vec<Vec<String>>,
    pub vector: Option<String>,
    pub size: Option<String>,
    pub interval: Option<String>,
}

/// Collect parameters in condition order, then the vector, then `size` or
/// `hist_interval`.
pub fn bind_params(
    assignments: &[OptionAssignment<'_>],
    target: &Target<'_>,
    phrases: &Phrasebook,
) -> Result<(ParamList, Slots)> {
    let mut params = ParamList::new();
    let mut slots = Slots::default();

    for assignment in assignments {
        let field = assignment.field;
        let base = field.param_name();
        let names = match &assignment.option {
            OptionCandidate::Equals => {
                let name = params.fresh_name(&base);
                params.push(&name, field.param_type, phrases.field_purpose(field, false))?;
                vec![name]
            }
            OptionCandidate::Compare(set) => {
                let mut names = Vec::with_capacity(set.len());
                for op in set.ops() {
                    let name = params.fresh_name(&format!("{}_{}", base, op.param_suffix()));
                    params.push(&name, field.param_type, phrases.compare_purpose(field, *op))?;
                    names.push(name);
                }
                names
            }
            OptionCandidate::Recent(window) => {
                let name = params
                    .fresh_name(&format!("{}_n_{}", base, window.token().to_lowercase()));
                params.push(&name, ParamType::I64, phrases.recent_purpose(field, *window))?;
                vec![name]
            }
            other => {
                return Err(Error::Contract(format!(
                    "{:?} cannot be used as a filter condition on {}",
                    other, field.path
                )))
            }
        };
        slots.conditions.push(names);
    }

    match *target {
        Target::Knn { field } => {
            let name = params.fresh_name(&field.param_name());
            params.push(&name, ParamType::Vector, phrases.field_purpose(field, true))?;
            slots.vector = Some(name);
        }
        Target::TopN { .. } => {
            let name = params.fresh_name("size");
            params.push(&name, ParamType::I64, phrases.size_purpose())?;
            slots.size = Some(name);
        }
        Target::Hist { field } | Target::HistStats { bucket: field, .. } => {
            let name = params.fresh_name("hist_interval");
            params.push(&name, ParamType::F64, phrases.interval_purpose(field))?;
            slots.interval = Some(name);
        }
        _ => {}
    }

    Ok((params, slots))
}

fn bool_node(
    assignments: &[OptionAssignment<'_>],
    slots: &Slots,
    placement: TermPlacement,
) -> Result<BoolNode> {
    let mut node = BoolNode::default();
    for (assignment, names) in assignments.iter().zip(&slots.conditions) {
        let field = assignment.field;
        let first = names
            .first()
            .cloned()
            .ok_or_else(|| Error::Contract(format!("no parameter bound for {}", field.path)))?;
        let leaf = match &assignment.option {
            OptionCandidate::Equals if field.category == Category::Text => {
                node.must.push(Leaf::Match {
                    path: field.path.clone(),
                    param: first,
                });
                continue;
            }
            OptionCandidate::Equals => Leaf::Term {
                path: field.path.clone(),
                param: first,
            },
            OptionCandidate::Compare(set) => {
                let mut leaf = RangeBounds::default();
                for (op, name) in set.ops().iter().zip(names) {
                    leaf.set(*op, Bound::Param { param: name.clone() });
                }
                leaf.into_leaf(&field.path)
            }
            OptionCandidate::Recent(window) => {
                let mut leaf = RangeBounds::default();
                leaf.set(
                    CmpOp::Gte,
                    Bound::Recent {
                        window: *window,
                        param: first,
                    },
                );
                leaf.into_leaf(&field.path)
            }
            other => {
                return Err(Error::Contract(format!(
                    "{:?} has no query leaf ({})",
                    other, field.path
                )))
            }
        };
        match placement {
            TermPlacement::Filter => node.filter.push(leaf),
            TermPlacement::Should => node.should.push(leaf),
        }
    }
    Ok(node)
}

#[derive(Default)]
struct RangeBounds {
    gte: Option<Bound>,
    gt: Option<Bound>,
    lt: Option<Bound>,
    lte: Option<Bound>,
}

impl RangeBounds {
    fn set(&mut self, op: CmpOp, bound: Bound) {
        match op {
            CmpOp::Gte => self.gte = Some(bound),
            CmpOp::Gt => self.gt = Some(bound),
            CmpOp::Lt => self.lt = Some(bound),
            CmpOp::Lte => self.lte = Some(bound),
        }
    }

    fn into_leaf(self, path: &str) -> Leaf {
        Leaf::Range {
            path: path.to_string(),
            gte: self.gte,
            gt: self.gt,
            lt: self.lt,
            lte: self.lte,
        }
    }
}

fn missing(slot: &str) -> Error {
    Error::Contract(format!("no `{}` parameter bound", slot))
}

/// Build the query body from the same bindings the parameter list came from.
pub fn build_query(
    assignments: &[OptionAssignment<'_>],
    slots: &Slots,
    target: &Target<'_>,
    placement: TermPlacement,
) -> Result<QueryBody> {
    let node = bool_node(assignments, slots, placement)?;

    let root = match *target {
        Target::Knn { field } => QueryRoot::Knn {
            path: field.path.clone(),
            param: slots.vector.clone().ok_or_else(|| missing("vector"))?,
            filter: (!node.is_empty()).then_some(node),
        },
        _ if node.is_empty() => QueryRoot::MatchAll,
        _ => QueryRoot::Bool(node),
    };

    let mut body = QueryBody {
        root,
        aggregation: None,
        sort: None,
        size: None,
    };

    let interval = || slots.interval.clone().ok_or_else(|| missing("hist_interval"));
    match *target {
        Target::None | Target::Knn { .. } => {}
        Target::TopN { field, direction } => {
            body.sort = Some(SortNode {
                path: field.path.clone(),
                direction,
            });
            body.size = Some(SizeSpec::Param {
                param: slots.size.clone().ok_or_else(|| missing("size"))?,
            });
        }
        Target::Terms { field } => {
            body.aggregation = Some(AggNode::new(field.exact_path(), AggKind::Terms));
        }
        Target::Stats { field, metric } => {
            body.aggregation = Some(AggNode::new(field.path.clone(), AggKind::Metric { metric }));
        }
        Target::Hist { field } => {
            body.aggregation = Some(AggNode::new(
                field.path.clone(),
                AggKind::Histogram {
                    interval_param: interval()?,
                },
            ));
        }
        Target::HistStats {
            bucket,
            field,
            metric,
        } => {
            body.aggregation = Some(
                AggNode::new(
                    bucket.path.clone(),
                    AggKind::Histogram {
                        interval_param: interval()?,
                    },
                )
                .nested(AggNode::new(field.path.clone(), AggKind::Metric { metric })),
            );
        }
        Target::DateHist { field, unit } => {
            body.aggregation = Some(AggNode::new(field.path.clone(), AggKind::DateHistogram { unit }));
        }
        Target::DateHistStats {
            date,
            unit,
            field,
            metric,
        } => {
            body.aggregation = Some(
                AggNode::new(date.path.clone(), AggKind::DateHistogram { unit })
                    .nested(AggNode::new(field.path.clone(), AggKind::Metric { metric })),
            );
        }
    }

    if body.aggregation.is_some() {
        body.size = Some(SizeSpec::Fixed { value: 0 });
    }

    Ok(body)
}
