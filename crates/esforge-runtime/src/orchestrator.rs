//! Orchestrator: fans generator families out over blocking tasks and collects
//! their outputs in family order.

use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use esforge_core::{Error, GenerationConfig, Result};
use esforge_render::Printer;
use esforge_schema::{FieldCatalog, SchemaOptions};
use esforge_synth::{Family, FamilyOutput, Synthesizer};
use futures::future::join_all;
use tracing::{error, info};

use crate::manifest::{file_name, Manifest};
use crate::types::{FamilyFailure, FamilyReport, FamilyRun, RunReport};

/// Shares one immutable catalog and config across every family task.
pub struct Orchestrator {
    catalog: Arc<FieldCatalog>,
    config: Arc<GenerationConfig>,
    timeout: Option<Duration>,
}

impl Orchestrator {
    pub fn new(catalog: FieldCatalog, config: GenerationConfig) -> Self {
        info!(
            "Orchestrator initialized: index={}, fields={}, max_combine={}",
            catalog.index,
            catalog.len(),
            config.max_combine()
        );
        Self {
            catalog: Arc::new(catalog),
            config: Arc::new(config),
            timeout: None,
        }
    }

    /// Load a schema file and its colocated config.
    pub fn load(schema_path: &Path, options: &SchemaOptions) -> Result<Self> {
        let catalog = FieldCatalog::load(schema_path, options)?;
        let config = GenerationConfig::load(schema_path);
        Ok(Self::new(catalog, config))
    }

    /// Bound each family task. A family that overruns fails with `Error::Task`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn catalog(&self) -> &FieldCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// Run one family on the blocking pool.
    pub async fn run_family(&self, family: Family) -> Result<FamilyOutput> {
        let catalog = Arc::clone(&self.catalog);
        let config = Arc::clone(&self.config);
        let task =
            tokio::task::spawn_blocking(move || Synthesizer::new(&catalog, &config).run(family));

        // An overrunning task keeps its blocking thread until it finishes on its own.
        let joined = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, task)
                .await
                .map_err(|_| Error::Task(format!("{} timed out after {:?}", family, limit)))?,
            None => task.await,
        };
        joined.map_err(|e| Error::Task(format!("{} failed to complete: {}", family, e)))?
    }

    /// Run `families` concurrently. Results keep the input order.
    pub async fn run(&self, families: &[Family]) -> Vec<FamilyRun> {
        let started = Instant::now();
        let results = join_all(families.iter().map(|family| async move {
            let started = Instant::now();
            let result = self.run_family(*family).await;
            let elapsed = started.elapsed();
            if let Ok(output) = &result {
                info!(
                    "Family {} finished: {} variants in {}ms",
                    family,
                    output.len(),
                    elapsed.as_millis()
                );
            }
            FamilyRun {
                family: *family,
                result,
                elapsed,
            }
        }))
        .await;
        info!(
            "Ran {} families in {}ms",
            families.len(),
            started.elapsed().as_millis()
        );
        results
    }

    /// Run `families` and write one manifest per family into `out_dir`. With a
    /// printer, also write each family's source and the document model. Failed
    /// families are reported, not fatal.
    pub async fn generate(
        &self,
        families: &[Family],
        out_dir: &Path,
        printer: Option<&Printer>,
    ) -> Result<RunReport> {
        let mut report = RunReport {
            index: self.catalog.index.clone(),
            ..Default::default()
        };

        for FamilyRun {
            family,
            result,
            elapsed,
        } in self.run(families).await
        {
            let started = Instant::now();
            let output = match result {
                Ok(output) => output,
                Err(e) => {
                    error!("Family {} failed: {}", family, e);
                    report.failures.push(FamilyFailure {
                        family: family.slug(),
                        error: e.to_string(),
                    });
                    continue;
                }
            };

            let manifest = Manifest::from_output(&output)?;
            let manifest_path = manifest.write(out_dir)?;

            let source = match printer {
                Some(printer) => {
                    let path = out_dir.join(file_name(&output.index, &family.slug(), "rs"));
                    std::fs::write(&path, printer.render_family(&output)?)?;
                    Some(path)
                }
                None => None,
            };

            report.families.push(FamilyReport {
                family: family.slug(),
                variants: output.len(),
                digest: manifest.digest.clone(),
                synthesis_ms: elapsed.as_millis() as u64,
                duration_ms: (elapsed + started.elapsed()).as_millis() as u64,
                manifest: manifest_path,
                source,
            });
        }

        if let Some(printer) = printer {
            std::fs::create_dir_all(out_dir)?;
            let path = out_dir.join(file_name(&self.catalog.index, "model", "rs"));
            std::fs::write(&path, printer.render_model(&self.catalog)?)?;
            report.model = Some(path);
        }

        info!(
            "Generated {} variants for index {} into {} ({} failed families)",
            report.total_variants(),
            report.index,
            out_dir.display(),
            report.failures.len()
        );
        Ok(report)
    }
}
