//! Runtime types.

use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

use esforge_core::{Category, Result};
use esforge_schema::{DocumentModel, FieldCatalog, FieldDescriptor};
use esforge_synth::{Family, FamilyOutput};
use serde::Serialize;

/// One family's synthesis result and how long it took.
#[derive(Debug)]
pub struct FamilyRun {
    pub family: Family,
    pub result: Result<FamilyOutput>,
    pub elapsed: Duration,
}

/// Outcome of one family written to disk.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FamilyReport {
    pub family: String,
    pub variants: usize,
    pub digest: String,
    /// Time spent synthesizing the family.
    pub synthesis_ms: u64,
    /// Synthesis plus writing the manifest and source.
    pub duration_ms: u64,
    pub manifest: PathBuf,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
}

#[derive(Debug, Clone, Serialize)]
pub struct FamilyFailure {
    pub family: String,
    pub error: String,
}

/// Summary of a full generation run, families in run order.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    pub index: String,
    pub families: Vec<FamilyReport>,
    pub failures: Vec<FamilyFailure>,
    /// Rendered document model, written alongside rendered sources.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<PathBuf>,
}

impl RunReport {
    pub fn total_variants(&self) -> usize {
        self.families.iter().map(|f| f.variants).sum()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// What `inspect` prints for a schema.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogSummary<'a> {
    pub index: &'a str,
    pub comment: &'a str,
    pub category_counts: BTreeMap<Category, usize>,
    pub fields: &'a [FieldDescriptor],
    pub model: &'a DocumentModel,
}

impl<'a> From<&'a FieldCatalog> for CatalogSummary<'a> {
    fn from(catalog: &'a FieldCatalog) -> Self {
        Self {
            index: &catalog.index,
            comment: &catalog.comment,
            category_counts: catalog.category_counts(),
            fields: catalog.fields(),
            model: catalog.model(),
        }
    }
}
