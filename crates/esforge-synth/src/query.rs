//! Declarative query expression tree. Pure data; the printer turns it into code.

use esforge_core::{CalendarUnit, MetricKind, RecencyWindow, SortDirection};
use serde::Serialize;

/// One bound of a range leaf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Bound {
    /// Value taken directly from a parameter.
    Param { param: String },
    /// Date-math literal `now-<param><unit>/<unit>` built from an integer parameter.
    Recent { window: RecencyWindow, param: String },
}

impl Bound {
    pub fn param(&self) -> &str {
        match self {
            Self::Param { param } | Self::Recent { param, .. } => param,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Leaf {
    Match {
        path: String,
        param: String,
    },
    Term {
        path: String,
        param: String,
    },
    Range {
        path: String,
        gte: Option<Bound>,
        gt: Option<Bound>,
        lt: Option<Bound>,
        lte: Option<Bound>,
    },
}

impl Leaf {
    pub fn params(&self) -> Vec<&str> {
        match self {
            Self::Match { param, .. } | Self::Term { param, .. } => vec![param.as_str()],
            Self::Range {
                gte, gt, lt, lte, ..
            } => [gte, gt, lt, lte]
                .into_iter()
                .flatten()
                .map(Bound::param)
                .collect(),
        }
    }
}

/// Boolean node. `match` leaves always sit in `must`; exact leaves go to
/// `filter` or `should`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BoolNode {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub must: Vec<Leaf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub filter: Vec<Leaf>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub should: Vec<Leaf>,
}

impl BoolNode {
    pub fn is_empty(&self) -> bool {
        self.must.is_empty() && self.filter.is_empty() && self.should.is_empty()
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.must.iter().chain(&self.filter).chain(&self.should)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum QueryRoot {
    MatchAll,
    Bool(BoolNode),
    Knn {
        path: String,
        param: String,
        filter: Option<BoolNode>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum AggKind {
    Terms,
    Metric { metric: MetricKind },
    Histogram { interval_param: String },
    DateHistogram { unit: CalendarUnit },
}

/// Aggregation node with at most one nested sub-aggregation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AggNode {
    pub path: String,
    #[serde(flatten)]
    pub kind: AggKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub: Option<Box<AggNode>>,
}

impl AggNode {
    pub fn new(path: impl Into<String>, kind: AggKind) -> Self {
        Self {
            path: path.into(),
            kind,
            sub: None,
        }
    }

    pub fn nested(mut self, sub: AggNode) -> Self {
        self.sub = Some(Box::new(sub));
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SortNode {
    pub path: String,
    pub direction: SortDirection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum SizeSpec {
    Param { param: String },
    /// Aggregation-only requests return no hits.
    Fixed { value: u32 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QueryBody {
    pub root: QueryRoot,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aggregation: Option<AggNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortNode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<SizeSpec>,
}

impl QueryBody {
    /// Every parameter the body references, in tree order.
    pub fn param_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        match &self.root {
            QueryRoot::MatchAll => {}
            QueryRoot::Bool(node) => refs.extend(node.leaves().flat_map(Leaf::params)),
            QueryRoot::Knn { param, filter, .. } => {
                refs.push(param.as_str());
                if let Some(node) = filter {
                    refs.extend(node.leaves().flat_map(Leaf::params));
                }
            }
        }
        let mut agg = self.aggregation.as_ref();
        while let Some(node) = agg {
            if let AggKind::Histogram { interval_param } = &node.kind {
                refs.push(interval_param.as_str());
            }
            agg = node.sub.as_deref();
        }
        if let Some(SizeSpec::Param { param }) = &self.size {
            refs.push(param.as_str());
        }
        refs
    }
}
