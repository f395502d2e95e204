//! `brick-build`: builds a Brick model from building tables and writes the
//! requested Turtle exports.
//!
//! **Inputs:**
//! - `--tables <path>`: JSON tables (`locations`, `equipment`, `points`)
//! - `--config <path>`: optional TOML run configuration
//!
//! **Outputs** (one per export mode, in `<out>`):
//! - `<timestamp>_M_<portfolio>_<building>.ttl`: full model
//! - `<timestamp>_B_<portfolio>_<building>.ttl`: building individuals
//! - `<timestamp>_B_<portfolio>_<building>_noPoints.ttl`: equipment, locations and systems
//!
//! **Usage:**
//! ```text
//! brick-build --tables <path> [--config <path>] [--portfolio <name>] [--building <name>]
//!             [--mode <mode>]... [--out <path>] [--ontology-root <path>] [--ontology <path>]...
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;

use anyhow::{Context, Result};
use brick_graph::export::export_named;
use brick_graph::{Pipeline, RunConfig, TableSet};
use brick_ontology::OntologyBundle;
use clap::Parser;
use tracing::info;

/// Build a Brick model and export it as Turtle.
#[derive(Parser)]
#[command(name = "brick-build", about = "Build a Brick model from building tables")]
struct Args {
    /// JSON file holding the locations, equipment and points tables.
    #[arg(long)]
    tables: PathBuf,

    /// TOML run configuration.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Portfolio name (overrides the configuration).
    #[arg(long)]
    portfolio: Option<String>,

    /// Building name (overrides the configuration).
    #[arg(long)]
    building: Option<String>,

    /// Export mode: full, building or equipment_locations_systems. Repeatable.
    #[arg(long = "mode")]
    modes: Vec<String>,

    /// Output directory (overrides the configuration).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory holding versioned ontologies.
    #[arg(long)]
    ontology_root: Option<PathBuf>,

    /// Additional ontology file (.ttl or .nt). Repeatable.
    #[arg(long = "ontology")]
    ontologies: Vec<PathBuf>,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Args {
    fn run_config(&self) -> Result<RunConfig> {
        let mut config = match &self.config {
            Some(path) => RunConfig::load(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?,
            None => RunConfig::default(),
        };
        if let Some(portfolio) = &self.portfolio {
            config.portfolio = portfolio.clone();
        }
        if let Some(building) = &self.building {
            config.building = building.clone();
        }
        if !self.modes.is_empty() {
            config.export_modes = self.modes.clone();
        }
        if let Some(out) = &self.out {
            config.output_dir = out.clone();
        }
        if let Some(root) = &self.ontology_root {
            config.ontology.root = root.clone();
        }
        config.ontology.paths.extend(self.ontologies.iter().cloned());
        Ok(config)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    brick_clients::init_logging(&args.log_level)?;
    let config = args.run_config()?;

    let mut bundle =
        OntologyBundle::from_config(&config.ontology).context("Failed to load ontologies")?;
    config.apply_namespaces(&mut bundle.namespaces);
    let subset = config
        .typed_subset(&bundle.namespaces)
        .context("Invalid export roots")?;
    let pipeline = Pipeline::new(config.relationships.schemas());
    let mut context = bundle
        .into_context(config.building_id())
        .with_prefixes(
            &config.vocabulary.ontology_prefix,
            &config.vocabulary.extension_prefix,
        )
        .with_subset(subset);
    info!(
        building = %context.building_stem,
        subclass_edges = context.hierarchy.edge_count(),
        inverses = context.inverses.len(),
        "Run context ready"
    );

    let tables = TableSet::load(&args.tables)
        .with_context(|| format!("Failed to load tables {}", args.tables.display()))?;
    let summary = pipeline.process(&mut context, &tables);

    println!(
        "Brick model for {}/{}: {} statements ({} inferred)",
        config.portfolio, config.building, summary.total, summary.inferred
    );
    for table in &summary.tables {
        match &table.error {
            Some(error) => println!("  {}: skipped ({error})", table.table),
            None => println!(
                "  {}: {} mapped, {} new, {} dropped, {} rows skipped",
                table.table, table.mapped, table.inserted, table.dropped, table.skipped_rows
            ),
        }
    }

    let timestamp = chrono::Local::now().naive_local();
    for mode in &config.export_modes {
        if let Some(path) = export_named(&context, mode, &config.output_dir, timestamp)
            .with_context(|| format!("Failed to export '{mode}'"))?
        {
            println!("  Written: {}", path.display());
        }
    }

    println!("Build complete.");
    Ok(())
}
