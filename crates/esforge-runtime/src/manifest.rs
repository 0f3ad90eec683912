//! Per-family JSON manifests.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use esforge_core::Result;
use esforge_synth::{FamilyOutput, Variant};
use serde::Serialize;
use sha2::{Digest, Sha256};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest<'a> {
    pub index: &'a str,
    pub family: String,
    pub generated_at: DateTime<Utc>,
    /// SHA-256 of the serialized variants. Independent of the timestamp.
    pub digest: String,
    pub variants: &'a [Variant],
}

impl<'a> Manifest<'a> {
    pub fn from_output(output: &'a FamilyOutput) -> Result<Self> {
        Ok(Self {
            index: &output.index,
            family: output.family.slug(),
            generated_at: Utc::now(),
            digest: digest(&output.variants)?,
            variants: &output.variants,
        })
    }

    /// Write `<dir>/<index>.<family>.json` and return its path.
    pub fn write(&self, dir: &Path) -> Result<PathBuf> {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(file_name(self.index, &self.family, "json"));
        std::fs::write(&path, serde_json::to_string_pretty(self)?)?;
        Ok(path)
    }
}

/// Hex SHA-256 over the JSON serialization of `variants`.
pub fn digest(variants: &[Variant]) -> Result<String> {
    let mut hasher = Sha256::new();
    hasher.update(serde_json::to_vec(variants)?);
    Ok(hex::encode(hasher.finalize()))
}

pub fn file_name(index: &str, family: &str, extension: &str) -> String {
    format!("{}.{}.{}", index, family, extension)
}
