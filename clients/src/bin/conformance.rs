//! `brick-conformance`: validates the Turtle exports of a building.
//!
//! Checks every `.ttl` file in the output directory for:
//! - conforming file names
//! - Turtle 1.1 validity
//! - prefix declarations before the first statement
//! - building-only subjects in `B` exports, and `_noPoints` ⊆ `B` ⊆ `M` per run
//!
//! **Usage:**
//! ```text
//! brick-conformance --portfolio <name> --building <name> [--output <path>]
//! ```
//!
//! Exits non-zero if any conformance check fails.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

use std::path::PathBuf;
use std::process;

use anyhow::Result;
use brick_conformance::{run_all, OutputPaths};
use brick_graph::export::DEFAULT_OUTPUT_DIR;
use brick_graph::BuildingId;
use clap::Parser;

/// Validate Brick model exports.
#[derive(Parser)]
#[command(name = "brick-conformance", about = "Validate Brick model exports")]
struct Args {
    /// Portfolio the exports belong to.
    #[arg(long)]
    portfolio: String,

    /// Building the exports describe.
    #[arg(long)]
    building: String,

    /// Directory holding the exports.
    #[arg(long, default_value = DEFAULT_OUTPUT_DIR)]
    output: PathBuf,

    /// Log level used when RUST_LOG is unset.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> Result<()> {
    let args = Args::parse();
    brick_clients::init_logging(&args.log_level)?;

    let paths = OutputPaths {
        output: args.output,
        building: BuildingId::new(args.portfolio, args.building),
    };
    let report = run_all(&paths)?;

    println!("Brick Export Conformance Report");
    println!("===============================");
    println!();

    for result in &report.results {
        println!("{result}");
    }

    println!();
    println!("Summary: {}", report.summary());

    if !report.all_passed() {
        eprintln!(
            "Conformance FAILED: {} check(s) did not pass ({}).",
            report.failure_count(),
            report.failing_validators().join(", ")
        );
        process::exit(1);
    }

    println!("Conformance PASSED.");
    Ok(())
}
