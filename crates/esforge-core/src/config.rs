//! Per-schema generation config, colocated with the schema file as `<index>_custom.json`.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::types::{DocLanguage, FieldListKind, OperatorSet, TermPlacement};

pub const DEFAULT_MAX_COMBINE: usize = 4;

const MAPPING_SUFFIXES: &[&str] = &["_mapping", "_Mapping", "-mapping", "-Mapping"];

/// Allow/deny path lists per query family.
///
/// An empty allow list admits every path. When both lists are set a path must be
/// allowed and not denied.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FieldLists {
    pub range_fields: Vec<String>,
    pub not_range_fields: Vec<String>,
    pub terms_fields: Vec<String>,
    pub not_terms_fields: Vec<String>,
    pub stats_fields: Vec<String>,
    pub not_stats_fields: Vec<String>,
    pub hist_fields: Vec<String>,
    pub not_hist_fields: Vec<String>,
    pub hist_stats_fields: Vec<String>,
    pub not_hist_stats_fields: Vec<String>,
    pub date_hist_fields: Vec<String>,
    pub not_date_hist_fields: Vec<String>,
    #[serde(rename = "topNFields")]
    pub top_n_fields: Vec<String>,
    #[serde(rename = "notTopNFields")]
    pub not_top_n_fields: Vec<String>,
}

impl FieldLists {
    pub fn lists(&self, kind: FieldListKind) -> (&[String], &[String]) {
        match kind {
            FieldListKind::Range => (&self.range_fields, &self.not_range_fields),
            FieldListKind::Terms => (&self.terms_fields, &self.not_terms_fields),
            FieldListKind::Stats => (&self.stats_fields, &self.not_stats_fields),
            FieldListKind::Hist => (&self.hist_fields, &self.not_hist_fields),
            FieldListKind::HistStats => (&self.hist_stats_fields, &self.not_hist_stats_fields),
            FieldListKind::DateHist => (&self.date_hist_fields, &self.not_date_hist_fields),
            FieldListKind::TopN => (&self.top_n_fields, &self.not_top_n_fields),
        }
    }

    /// Whether `path` passes the allow/deny pair for `kind`.
    pub fn admits(&self, kind: FieldListKind, path: &str) -> bool {
        let (allow, deny) = self.lists(kind);
        let allowed = allow.is_empty() || allow.iter().any(|p| p == path);
        let denied = deny.iter().any(|p| p == path);
        allowed && !denied
    }
}

/// A single text field standing in for full-text search over the whole document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedTextField {
    pub path: String,
    /// Drop every other text field from the filter pool.
    pub exclusive: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    /// Custom field groups; combinations never mix members of different groups.
    #[serde(default)]
    pub combine: Vec<Vec<String>>,
    /// Upper bound on combination size. Zero means the default.
    #[serde(default = "default_max_combine")]
    pub max_combine: usize,
    #[serde(default)]
    pub term_in_should: bool,
    #[serde(default)]
    pub cmp_opt_list: Vec<OperatorSet>,
    #[serde(default)]
    pub all_text_field: Option<String>,
    #[serde(default)]
    pub all_text_field_only: bool,
    #[serde(flatten)]
    pub lists: FieldLists,
    /// Paths every filter combination must contain.
    #[serde(default)]
    pub required_fields: Vec<String>,
    #[serde(default)]
    pub doc_language: DocLanguage,
}

fn default_max_combine() -> usize {
    DEFAULT_MAX_COMBINE
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            combine: Vec::new(),
            max_combine: DEFAULT_MAX_COMBINE,
            term_in_should: false,
            cmp_opt_list: Vec::new(),
            all_text_field: None,
            all_text_field_only: false,
            lists: FieldLists::default(),
            required_fields: Vec::new(),
            doc_language: DocLanguage::default(),
        }
    }
}

impl GenerationConfig {
    /// Load the config colocated with `schema_path`, falling back to defaults.
    ///
    /// A missing file is silent. An unreadable or malformed file logs a warning.
    pub fn load(schema_path: &Path) -> Self {
        let config_path = config_path_for(schema_path);
        match Self::try_load(&config_path) {
            Ok(config) => {
                info!("Loaded generation config from {}", config_path.display());
                config
            }
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Self::default(),
            Err(e) => {
                warn!(
                    "Ignoring generation config {}: {}",
                    config_path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Read and parse a config file without any fallback.
    pub fn try_load(config_path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(config_path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self> {
        let config: GenerationConfig =
            serde_json::from_str(text).map_err(|e| Error::Config(e.to_string()))?;
        Ok(config)
    }

    pub fn max_combine(&self) -> usize {
        if self.max_combine == 0 {
            DEFAULT_MAX_COMBINE
        } else {
            self.max_combine
        }
    }

    /// Combination bound for families that reserve one slot for a target field.
    pub fn target_max_combine(&self) -> usize {
        self.max_combine().saturating_sub(1).max(1)
    }

    pub fn operator_sets(&self) -> Vec<OperatorSet> {
        let sets: Vec<OperatorSet> = self
            .cmp_opt_list
            .iter()
            .filter(|s| !s.is_empty())
            .cloned()
            .collect();
        if sets.is_empty() {
            OperatorSet::defaults()
        } else {
            sets
        }
    }

    pub fn term_placement(&self) -> TermPlacement {
        if self.term_in_should {
            TermPlacement::Should
        } else {
            TermPlacement::Filter
        }
    }

    pub fn merged_text_field(&self) -> Option<MergedTextField> {
        self.all_text_field
            .as_ref()
            .filter(|p| !p.is_empty())
            .map(|p| MergedTextField {
                path: p.clone(),
                exclusive: self.all_text_field_only,
            })
    }

    /// Custom groups with empty groups removed.
    pub fn groups(&self) -> Vec<Vec<String>> {
        self.combine
            .iter()
            .filter(|g| !g.is_empty())
            .cloned()
            .collect()
    }
}

/// `<dir>/books_mapping.json` → `<dir>/books_custom.json`.
pub fn config_path_for(schema_path: &Path) -> PathBuf {
    let stem = schema_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let mut base = stem.as_str();
    for suffix in MAPPING_SUFFIXES {
        base = base.strip_suffix(suffix).unwrap_or(base);
    }
    schema_path.with_file_name(format!("{}_custom.json", base))
}

/// Index name derived from a schema file name, with any mapping suffix removed.
pub fn index_name_for(schema_path: &Path) -> String {
    let file_name = config_path_for(schema_path)
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    file_name
        .strip_suffix("_custom.json")
        .unwrap_or(&file_name)
        .to_string()
}
