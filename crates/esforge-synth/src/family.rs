//! Generator families: filter mode × output kind.

use std::fmt;

use esforge_core::Category;
use esforge_combine::CategoryCaps;
use serde::Serialize;

/// How filter fields constrain the query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterMode {
    /// Equality and full-text conditions only.
    Match,
    /// Numbers and dates bounded by operator sets.
    Range,
    /// Dates bounded by a recency window.
    Recent,
}

impl FilterMode {
    pub fn slug(self) -> &'static str {
        match self {
            Self::Match => "match",
            Self::Range => "range",
            Self::Recent => "recent",
        }
    }

    pub fn caps(self) -> CategoryCaps {
        match self {
            Self::Match => CategoryCaps::new([(Category::Vector, -1)]),
            Self::Range => CategoryCaps::new([
                (Category::Number, 1),
                (Category::Date, 1),
                (Category::Vector, -1),
            ]),
            Self::Recent => CategoryCaps::new([
                (Category::Number, 2),
                (Category::Date, 1),
                (Category::Vector, -1),
            ]),
        }
    }

    /// Combinations must hold at least one of these categories.
    pub fn required_categories(self) -> &'static [Category] {
        match self {
            Self::Match => &[],
            Self::Range => &[Category::Number, Category::Date],
            Self::Recent => &[Category::Date],
        }
    }
}

/// What a generated function returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputKind {
    /// Matching documents.
    Detail,
    /// Documents matched exactly on precise fields.
    Term,
    /// One text field searched under keyword filters.
    Filter,
    /// Top N documents sorted by a target field.
    TopN,
    /// Nearest neighbours of a query vector.
    Knn,
    Terms,
    Stats,
    Hist,
    HistStats,
    DateHist,
    DateHistStats,
}

impl OutputKind {
    pub fn slug(self) -> &'static str {
        match self {
            Self::Detail => "detail",
            Self::Term => "term",
            Self::Filter => "filter",
            Self::TopN => "topn",
            Self::Knn => "knn",
            Self::Terms => "terms",
            Self::Stats => "stats",
            Self::Hist => "hist",
            Self::HistStats => "hist_stats",
            Self::DateHist => "date_hist",
            Self::DateHistStats => "date_hist_stats",
        }
    }

    /// Kinds that reserve one combination slot for a target field.
    pub fn has_target(self) -> bool {
        !matches!(self, Self::Detail | Self::Term | Self::Filter | Self::Knn)
    }

    pub fn is_aggregation(self) -> bool {
        matches!(
            self,
            Self::Terms
                | Self::Stats
                | Self::Hist
                | Self::HistStats
                | Self::DateHist
                | Self::DateHistStats
        )
    }
}

/// One generator kind, run as an independent task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Family {
    pub mode: FilterMode,
    pub kind: OutputKind,
}

const AGGREGATIONS: [OutputKind; 6] = [
    OutputKind::Terms,
    OutputKind::Stats,
    OutputKind::Hist,
    OutputKind::HistStats,
    OutputKind::DateHist,
    OutputKind::DateHistStats,
];

const MODES: [FilterMode; 3] = [FilterMode::Match, FilterMode::Range, FilterMode::Recent];

impl Family {
    pub const fn new(mode: FilterMode, kind: OutputKind) -> Self {
        Self { mode, kind }
    }

    /// Every family in run order.
    pub fn all() -> Vec<Family> {
        let mut out: Vec<Family> = MODES
            .iter()
            .map(|m| Family::new(*m, OutputKind::Detail))
            .collect();
        out.push(Family::new(FilterMode::Match, OutputKind::Term));
        out.push(Family::new(FilterMode::Match, OutputKind::Filter));
        out.extend(MODES.iter().map(|m| Family::new(*m, OutputKind::TopN)));
        out.push(Family::new(FilterMode::Match, OutputKind::Knn));
        for mode in MODES {
            out.extend(AGGREGATIONS.iter().map(|k| Family::new(mode, *k)));
        }
        out
    }

    /// Stable name, e.g. `range_date_hist_stats`.
    pub fn slug(&self) -> String {
        match self.kind {
            OutputKind::Term | OutputKind::Filter | OutputKind::Knn => self.kind.slug().to_string(),
            _ => format!("{}_{}", self.mode.slug(), self.kind.slug()),
        }
    }

    pub fn from_slug(slug: &str) -> Option<Family> {
        Self::all().into_iter().find(|f| f.slug() == slug)
    }
}

impl fmt::Display for Family {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.slug())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_all_families_unique_slugs() {
        let all = Family::all();
        assert_eq!(all.len(), 27);
        let slugs: HashSet<String> = all.iter().map(|f| f.slug()).collect();
        assert_eq!(slugs.len(), all.len());
    }

    #[test]
    fn test_slug_roundtrip() {
        for family in Family::all() {
            assert_eq!(Family::from_slug(&family.slug()), Some(family));
        }
        assert_eq!(Family::from_slug("nope"), None);
        assert_eq!(
            Family::from_slug("recent_date_hist_stats"),
            Some(Family::new(FilterMode::Recent, OutputKind::DateHistStats))
        );
        assert_eq!(
            Family::from_slug("knn"),
            Some(Family::new(FilterMode::Match, OutputKind::Knn))
        );
    }

    #[test]
    fn test_mode_caps() {
        assert_eq!(FilterMode::Range.caps().get(Category::Number), Some(1));
        assert_eq!(FilterMode::Recent.caps().get(Category::Number), Some(2));
        assert_eq!(FilterMode::Match.caps().get(Category::Vector), Some(-1));
        assert_eq!(FilterMode::Recent.required_categories(), &[Category::Date]);
    }

    #[test]
    fn test_kind_flags() {
        assert!(OutputKind::TopN.has_target());
        assert!(!OutputKind::Detail.has_target());
        assert!(!OutputKind::Knn.has_target());
        assert!(OutputKind::DateHist.is_aggregation());
        assert!(!OutputKind::TopN.is_aggregation());
    }
}
