//! Target choices: the field(s) a function sorts, aggregates or vector-matches,
//! together with the target-level axis (direction, metric, bucket unit).

use esforge_core::{CalendarUnit, MetricKind, RecencyWindow, SortDirection};
use esforge_schema::FieldDescriptor;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target<'a> {
    None,
    TopN {
        field: &'a FieldDescriptor,
        direction: SortDirection,
    },
    Knn {
        field: &'a FieldDescriptor,
    },
    Terms {
        field: &'a FieldDescriptor,
    },
    Stats {
        field: &'a FieldDescriptor,
        metric: MetricKind,
    },
    Hist {
        field: &'a FieldDescriptor,
    },
    HistStats {
        bucket: &'a FieldDescriptor,
        field: &'a FieldDescriptor,
        metric: MetricKind,
    },
    DateHist {
        field: &'a FieldDescriptor,
        unit: CalendarUnit,
    },
    DateHistStats {
        date: &'a FieldDescriptor,
        unit: CalendarUnit,
        field: &'a FieldDescriptor,
        metric: MetricKind,
    },
}

impl<'a> Target<'a> {
    /// Target fields, bucket field first.
    pub fn fields(&self) -> Vec<&'a FieldDescriptor> {
        match *self {
            Self::None => Vec::new(),
            Self::TopN { field, .. }
            | Self::Knn { field }
            | Self::Terms { field }
            | Self::Stats { field, .. }
            | Self::Hist { field }
            | Self::DateHist { field, .. } => vec![field],
            Self::HistStats { bucket, field, .. } => vec![bucket, field],
            Self::DateHistStats { date, field, .. } => vec![date, field],
        }
    }

    pub fn choice(&self, window: Option<RecencyWindow>) -> TargetChoice {
        let (direction, metric, bucket) = match *self {
            Self::TopN { direction, .. } => (Some(direction), None, None),
            Self::Stats { metric, .. } | Self::HistStats { metric, .. } => (None, Some(metric), None),
            Self::DateHist { unit, .. } => (None, None, Some(unit)),
            Self::DateHistStats { unit, metric, .. } => (None, Some(metric), Some(unit)),
            Self::None | Self::Knn { .. } | Self::Terms { .. } | Self::Hist { .. } => {
                (None, None, None)
            }
        };
        TargetChoice {
            fields: self.fields().iter().map(|f| f.path.clone()).collect(),
            direction,
            metric,
            bucket,
            window,
        }
    }
}

/// Owned record of a variant's target choice.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TargetChoice {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub direction: Option<SortDirection>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metric: Option<MetricKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bucket: Option<CalendarUnit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub window: Option<RecencyWindow>,
}
