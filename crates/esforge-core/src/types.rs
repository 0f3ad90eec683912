//! Shared vocabulary: field categories, comparison operators, recency windows,
//! calendar units, sort directions and metric kinds.

use serde::{Deserialize, Serialize};

/// Semantic bucket a schema field is classified into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Text,
    Keyword,
    /// Text field carrying a keyword sub-field. Always held alongside `Text`.
    TextKeyword,
    Number,
    Date,
    Boolean,
    Range,
    Ip,
    Geo,
    /// `object` and `nested` containers.
    Object,
    Vector,
    Special,
    Other,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Self::Text,
        Self::Keyword,
        Self::TextKeyword,
        Self::Number,
        Self::Date,
        Self::Boolean,
        Self::Range,
        Self::Ip,
        Self::Geo,
        Self::Object,
        Self::Vector,
        Self::Special,
        Self::Other,
    ];

    /// Categories that can appear as a filter condition in a generated function.
    pub fn is_filterable(self) -> bool {
        matches!(
            self,
            Self::Text
                | Self::Keyword
                | Self::Number
                | Self::Date
                | Self::Boolean
                | Self::Ip
                | Self::Vector
        )
    }

    /// Categories whose value is compared exactly (term) rather than analysed (match).
    pub fn is_precise(self) -> bool {
        matches!(
            self,
            Self::Keyword | Self::Number | Self::Date | Self::Boolean | Self::Ip
        )
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Text => "text",
            Self::Keyword => "keyword",
            Self::TextKeyword => "text_keyword",
            Self::Number => "number",
            Self::Date => "date",
            Self::Boolean => "boolean",
            Self::Range => "range",
            Self::Ip => "ip",
            Self::Geo => "geo",
            Self::Object => "object",
            Self::Vector => "vector",
            Self::Special => "special",
            Self::Other => "other",
        };
        write!(f, "{}", s)
    }
}

/// One bound of a range expression.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum CmpOp {
    #[serde(rename = "Gte", alias = "gte", alias = ">=")]
    Gte,
    #[serde(rename = "Gt", alias = "gt", alias = ">")]
    Gt,
    #[serde(rename = "Lt", alias = "lt", alias = "<")]
    Lt,
    #[serde(rename = "Lte", alias = "lte", alias = "<=")]
    Lte,
}

impl CmpOp {
    /// Identifier abbreviation, e.g. `PriceGte`.
    pub fn token(self) -> &'static str {
        match self {
            Self::Gte => "Gte",
            Self::Gt => "Gt",
            Self::Lt => "Lt",
            Self::Lte => "Lte",
        }
    }

    /// Parameter suffix, e.g. `price_gte`.
    pub fn param_suffix(self) -> &'static str {
        match self {
            Self::Gte => "gte",
            Self::Gt => "gt",
            Self::Lt => "lt",
            Self::Lte => "lte",
        }
    }

    pub fn display_name(self, lang: DocLanguage) -> &'static str {
        match (lang, self) {
            (DocLanguage::Zh, Self::Gte) => "大于等于",
            (DocLanguage::Zh, Self::Gt) => "大于",
            (DocLanguage::Zh, Self::Lt) => "小于",
            (DocLanguage::Zh, Self::Lte) => "小于等于",
            (DocLanguage::En, Self::Gte) => "at least",
            (DocLanguage::En, Self::Gt) => "greater than",
            (DocLanguage::En, Self::Lt) => "less than",
            (DocLanguage::En, Self::Lte) => "at most",
        }
    }
}

/// A set of bounds used together in one range expression.
///
/// Stored in canonical `Gte, Gt, Lt, Lte` order without duplicates, so `[Lt, Gte]`
/// and `[Gte, Lt]` are the same set.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<CmpOp>", into = "Vec<CmpOp>")]
pub struct OperatorSet(Vec<CmpOp>);

impl OperatorSet {
    pub fn new(ops: impl IntoIterator<Item = CmpOp>) -> Self {
        let mut ops: Vec<CmpOp> = ops.into_iter().collect();
        ops.sort();
        ops.dedup();
        Self(ops)
    }

    pub fn ops(&self) -> &[CmpOp] {
        &self.0
    }

    pub fn contains(&self, op: CmpOp) -> bool {
        self.0.contains(&op)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `{≥}, {>}, {<}, {≤}, {≥ ≤}`.
    pub fn defaults() -> Vec<OperatorSet> {
        vec![
            Self::new([CmpOp::Gte]),
            Self::new([CmpOp::Gt]),
            Self::new([CmpOp::Lt]),
            Self::new([CmpOp::Lte]),
            Self::new([CmpOp::Gte, CmpOp::Lte]),
        ]
    }
}

impl From<Vec<CmpOp>> for OperatorSet {
    fn from(ops: Vec<CmpOp>) -> Self {
        Self::new(ops)
    }
}

impl From<OperatorSet> for Vec<CmpOp> {
    fn from(set: OperatorSet) -> Self {
        set.0
    }
}

/// Named relative time range for "recent N units" filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecencyWindow {
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl RecencyWindow {
    pub const ALL: [RecencyWindow; 5] = [
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Quarter => "Quarter",
            Self::Year => "Year",
        }
    }

    /// Date-math template with a single `%d` placeholder for the unit count.
    pub fn literal_format(self) -> &'static str {
        match self {
            Self::Day => "now-%dd/d",
            Self::Week => "now-%dw/w",
            Self::Month => "now-%dM/M",
            Self::Quarter => "now-%dQ/Q",
            Self::Year => "now-%dy/y",
        }
    }

    /// Concrete date-math literal for `n` units back.
    pub fn literal(self, n: u32) -> String {
        self.literal_format().replacen("%d", &n.to_string(), 1)
    }

    pub fn display_name(self, lang: DocLanguage) -> &'static str {
        match (lang, self) {
            (DocLanguage::Zh, Self::Day) => "为近几天",
            (DocLanguage::Zh, Self::Week) => "为近几周",
            (DocLanguage::Zh, Self::Month) => "为近几个月",
            (DocLanguage::Zh, Self::Quarter) => "为近几个季度",
            (DocLanguage::Zh, Self::Year) => "为近几年",
            (DocLanguage::En, Self::Day) => "within the last N days",
            (DocLanguage::En, Self::Week) => "within the last N weeks",
            (DocLanguage::En, Self::Month) => "within the last N months",
            (DocLanguage::En, Self::Quarter) => "within the last N quarters",
            (DocLanguage::En, Self::Year) => "within the last N years",
        }
    }

    /// The window's own calendar unit.
    pub fn calendar_unit(self) -> CalendarUnit {
        match self {
            Self::Day => CalendarUnit::Day,
            Self::Week => CalendarUnit::Week,
            Self::Month => CalendarUnit::Month,
            Self::Quarter => CalendarUnit::Quarter,
            Self::Year => CalendarUnit::Year,
        }
    }

    /// Bucket units worth histogramming inside this window: the window's unit and
    /// up to two finer units before it.
    pub fn bucket_units(self) -> &'static [CalendarUnit] {
        let all = &CalendarUnit::ALL;
        let idx = all
            .iter()
            .position(|u| *u == self.calendar_unit())
            .unwrap_or(0);
        &all[idx.saturating_sub(2)..=idx]
    }
}

/// Calendar interval for date-histogram buckets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CalendarUnit {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl CalendarUnit {
    pub const ALL: [CalendarUnit; 7] = [
        Self::Minute,
        Self::Hour,
        Self::Day,
        Self::Week,
        Self::Month,
        Self::Quarter,
        Self::Year,
    ];

    pub fn token(self) -> &'static str {
        match self {
            Self::Minute => "Minute",
            Self::Hour => "Hour",
            Self::Day => "Day",
            Self::Week => "Week",
            Self::Month => "Month",
            Self::Quarter => "Quarter",
            Self::Year => "Year",
        }
    }

    /// `calendar_interval` literal.
    pub fn interval(self) -> &'static str {
        match self {
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    pub fn display_name(self, lang: DocLanguage) -> &'static str {
        match (lang, self) {
            (DocLanguage::Zh, Self::Minute) => "每分钟",
            (DocLanguage::Zh, Self::Hour) => "每小时",
            (DocLanguage::Zh, Self::Day) => "每天",
            (DocLanguage::Zh, Self::Week) => "每周",
            (DocLanguage::Zh, Self::Month) => "每月",
            (DocLanguage::Zh, Self::Quarter) => "每季度",
            (DocLanguage::Zh, Self::Year) => "每年",
            (DocLanguage::En, Self::Minute) => "per minute",
            (DocLanguage::En, Self::Hour) => "per hour",
            (DocLanguage::En, Self::Day) => "per day",
            (DocLanguage::En, Self::Week) => "per week",
            (DocLanguage::En, Self::Month) => "per month",
            (DocLanguage::En, Self::Quarter) => "per quarter",
            (DocLanguage::En, Self::Year) => "per year",
        }
    }
}

/// Top-N sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    Desc,
    Asc,
}

impl SortDirection {
    pub const ALL: [SortDirection; 2] = [Self::Desc, Self::Asc];

    /// Identifier prefix: `MaxN` for descending, `MinN` for ascending.
    pub fn token(self) -> &'static str {
        match self {
            Self::Desc => "MaxN",
            Self::Asc => "MinN",
        }
    }

    /// Sort order literal passed to the query builder.
    pub fn order(self) -> &'static str {
        match self {
            Self::Desc => "desc",
            Self::Asc => "asc",
        }
    }

    pub fn display_name(self, lang: DocLanguage) -> &'static str {
        match (lang, self) {
            (DocLanguage::Zh, Self::Desc) => "最大",
            (DocLanguage::Zh, Self::Asc) => "最小",
            (DocLanguage::En, Self::Desc) => "largest",
            (DocLanguage::En, Self::Asc) => "smallest",
        }
    }
}

/// Numeric metric aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricKind {
    Avg,
    Sum,
    Min,
    Max,
    Stats,
}

impl MetricKind {
    pub const ALL: [MetricKind; 5] = [Self::Avg, Self::Sum, Self::Min, Self::Max, Self::Stats];

    pub fn token(self) -> &'static str {
        match self {
            Self::Avg => "Avg",
            Self::Sum => "Sum",
            Self::Min => "Min",
            Self::Max => "Max",
            Self::Stats => "Stats",
        }
    }

    pub fn display_name(self, lang: DocLanguage) -> &'static str {
        match (lang, self) {
            (DocLanguage::Zh, Self::Avg) => "平均值",
            (DocLanguage::Zh, Self::Sum) => "总和",
            (DocLanguage::Zh, Self::Min) => "最小值",
            (DocLanguage::Zh, Self::Max) => "最大值",
            (DocLanguage::Zh, Self::Stats) => "统计信息",
            (DocLanguage::En, Self::Avg) => "average",
            (DocLanguage::En, Self::Sum) => "sum",
            (DocLanguage::En, Self::Min) => "minimum",
            (DocLanguage::En, Self::Max) => "maximum",
            (DocLanguage::En, Self::Stats) => "statistics",
        }
    }
}

/// Value type of a generated function parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamType {
    Str,
    I64,
    F64,
    Bool,
    /// Date string accepted by the index's date format.
    Date,
    Vector,
    /// Anything without a closer mapping (geo points, ranges, objects).
    Json,
}

impl ParamType {
    /// Parameter type derived from a raw schema type.
    pub fn for_raw_type(raw_type: &str) -> Self {
        match raw_type {
            "long" | "integer" | "short" | "byte" | "unsigned_long" | "token_count" => Self::I64,
            "double" | "float" | "half_float" | "scaled_float" => Self::F64,
            "boolean" => Self::Bool,
            "date" | "date_nanos" => Self::Date,
            "dense_vector" | "sparse_vector" | "vector" => Self::Vector,
            "text" | "match_only_text" | "search_as_you_type" | "keyword" | "constant_keyword"
            | "wildcard" | "ip" => Self::Str,
            _ => Self::Json,
        }
    }

    /// Rust type spelled in generated code.
    pub fn rust_type(self) -> &'static str {
        match self {
            Self::Str | Self::Date => "String",
            Self::I64 => "i64",
            Self::F64 => "f64",
            Self::Bool => "bool",
            Self::Vector => "Vec<f32>",
            Self::Json => "serde_json::Value",
        }
    }
}

impl std::fmt::Display for ParamType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.rust_type())
    }
}

/// Clause receiving precise (term/range) conditions inside the bool node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TermPlacement {
    #[default]
    Filter,
    Should,
}

/// Language used for generated documentation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocLanguage {
    #[default]
    Zh,
    En,
}

/// Which allow/deny list pair of the generation config applies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldListKind {
    Range,
    Terms,
    Stats,
    Hist,
    HistStats,
    DateHist,
    TopN,
}
