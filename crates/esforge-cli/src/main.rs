//! esforge: synthesizes Elasticsearch query functions from an index schema.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{anyhow, bail, Context};
use clap::{Parser, Subcommand};
use esforge_render::{Printer, DEFAULT_BUILDER_PATH};
use esforge_runtime::{CatalogSummary, Orchestrator};
use esforge_schema::{FieldCatalog, SchemaOptions};
use esforge_synth::Family;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "esforge")]
#[command(version, about = "Query function synthesis from Elasticsearch mappings", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Synthesize every selected family and write one manifest per family
    Generate {
        /// Schema (mapping) file
        #[arg(short, long)]
        schema: PathBuf,

        /// Output directory
        #[arg(short, long, default_value = "out")]
        out: PathBuf,

        /// Index name; defaults to the schema file name without its mapping suffix
        #[arg(long)]
        index: Option<String>,

        /// Family slug, e.g. `range_topn`. Repeat to select several; all by default
        #[arg(short, long = "family")]
        families: Vec<String>,

        /// Also write rendered Rust source per family and the document model
        #[arg(long)]
        render: bool,

        /// Query-builder module path used by rendered code
        #[arg(long, default_value = DEFAULT_BUILDER_PATH)]
        builder_path: String,

        /// Per-family time limit in seconds
        #[arg(long)]
        timeout_secs: Option<u64>,

        /// Schema load options file (skipFields, fieldNames, typeOverrides, fieldComments)
        #[arg(long)]
        options: Option<PathBuf>,
    },

    /// Print the classified fields of a schema
    Inspect {
        /// Schema (mapping) file
        #[arg(short, long)]
        schema: PathBuf,

        /// Schema load options file
        #[arg(long)]
        options: Option<PathBuf>,
    },

    /// List family slugs in run order
    Families,
}

fn load_options(path: Option<&PathBuf>) -> anyhow::Result<SchemaOptions> {
    match path {
        Some(path) => SchemaOptions::load(path)
            .with_context(|| format!("loading schema options {}", path.display())),
        None => Ok(SchemaOptions::default()),
    }
}

fn select_families(slugs: &[String]) -> anyhow::Result<Vec<Family>> {
    if slugs.is_empty() {
        return Ok(Family::all());
    }
    slugs
        .iter()
        .map(|slug| {
            Family::from_slug(slug)
                .ok_or_else(|| anyhow!("unknown family `{}` (see `esforge families`)", slug))
        })
        .collect()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            schema,
            out,
            index,
            families,
            render,
            builder_path,
            timeout_secs,
            options,
        } => {
            let options = load_options(options.as_ref())?;
            let families = select_families(&families)?;
            let printer = if render {
                Some(Printer::new(&builder_path)?)
            } else {
                None
            };

            let config = esforge_core::GenerationConfig::load(&schema);
            let mut catalog = FieldCatalog::load(&schema, &options)?;
            if let Some(index) = index {
                catalog.index = index;
            }
            let orchestrator = Orchestrator::new(catalog, config)
                .with_timeout(timeout_secs.map(Duration::from_secs));

            let report = orchestrator
                .generate(&families, &out, printer.as_ref())
                .await?;
            println!("{}", serde_json::to_string_pretty(&report)?);

            if !report.is_success() {
                bail!("{} of {} families failed", report.failures.len(), families.len());
            }
            info!("Done: {} variants", report.total_variants());
        }
        Commands::Inspect { schema, options } => {
            let options = load_options(options.as_ref())?;
            let catalog = FieldCatalog::load(&schema, &options)?;
            println!(
                "{}",
                serde_json::to_string_pretty(&CatalogSummary::from(&catalog))?
            );
        }
        Commands::Families => {
            for family in Family::all() {
                println!("{}", family);
            }
        }
    }

    Ok(())
}
