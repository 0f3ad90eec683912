//! Per-field option expansion.

use esforge_core::{
    CalendarUnit, Category, GenerationConfig, OperatorSet, RecencyWindow, SortDirection,
};
use esforge_schema::FieldDescriptor;
use serde::Serialize;

/// How a field takes part in a generated function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Usage {
    /// Plain equality or full-text condition.
    Filter,
    /// Numbers and dates compared with operator sets.
    Range,
    /// Dates bounded by the recency window, numbers compared.
    Recent(RecencyWindow),
    /// Sort target.
    TopN,
    Knn,
    DateBucket,
}

/// One concrete option a field can take.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind", content = "value")]
pub enum OptionCandidate {
    Equals,
    Compare(OperatorSet),
    Recent(RecencyWindow),
    Direction(SortDirection),
    Nearest,
    Bucket(CalendarUnit),
}

/// A field bound to one option candidate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionAssignment<'a> {
    pub field: &'a FieldDescriptor,
    pub option: OptionCandidate,
}

#[derive(Debug, Clone)]
pub struct OptionExpander {
    operator_sets: Vec<OperatorSet>,
}

impl Default for OptionExpander {
    fn default() -> Self {
        Self::new(OperatorSet::defaults())
    }
}

impl OptionExpander {
    /// An empty operator set list falls back to the defaults.
    pub fn new(operator_sets: Vec<OperatorSet>) -> Self {
        let operator_sets = if operator_sets.is_empty() {
            OperatorSet::defaults()
        } else {
            operator_sets
        };
        Self { operator_sets }
    }

    pub fn from_config(config: &GenerationConfig) -> Self {
        Self::new(config.operator_sets())
    }

    pub fn operator_sets(&self) -> &[OperatorSet] {
        &self.operator_sets
    }

    /// Windows the recent families iterate over.
    pub fn windows() -> &'static [RecencyWindow] {
        &RecencyWindow::ALL
    }

    /// Ordered candidate list for `field` used as `usage`. Never empty.
    pub fn expand(&self, field: &FieldDescriptor, usage: Usage) -> Vec<OptionCandidate> {
        if field.category == Category::Vector {
            return vec![OptionCandidate::Nearest];
        }
        match usage {
            Usage::Filter => vec![OptionCandidate::Equals],
            Usage::Range => match field.category {
                Category::Number | Category::Date => self.compare(),
                _ => vec![OptionCandidate::Equals],
            },
            Usage::Recent(window) => match field.category {
                Category::Date => vec![OptionCandidate::Recent(window)],
                Category::Number => self.compare(),
                _ => vec![OptionCandidate::Equals],
            },
            Usage::TopN => SortDirection::ALL
                .iter()
                .map(|d| OptionCandidate::Direction(*d))
                .collect(),
            Usage::Knn => vec![OptionCandidate::Nearest],
            Usage::DateBucket => CalendarUnit::ALL
                .iter()
                .map(|u| OptionCandidate::Bucket(*u))
                .collect(),
        }
    }

    fn compare(&self) -> Vec<OptionCandidate> {
        self.operator_sets
            .iter()
            .cloned()
            .map(OptionCandidate::Compare)
            .collect()
    }
}
