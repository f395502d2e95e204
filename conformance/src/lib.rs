//! Conformance checks for exported Brick models.
//!
//! # Conformance Scope
//!
//! | Check | Standard |
//! |-------|----------|
//! | Turtle | every export parses as Turtle 1.1 |
//! | Prefixes | declared once, before the first statement |
//! | Naming | `<timestamp>_<M\|B>_<portfolio>_<building>[_noPoints].ttl` |
//! | Subgraphs | `B` subjects are building individuals; `_noPoints` ⊆ `B` ⊆ `M` per run |
//!
//! # Entry Point
//!
//! ```no_run
//! use brick_conformance::{run_all, OutputPaths};
//! use brick_graph::BuildingId;
//! use std::path::PathBuf;
//!
//! let paths = OutputPaths {
//!     output: PathBuf::from("output"),
//!     building: BuildingId::new("acme", "hq"),
//! };
//! let report = run_all(&paths)?;
//! assert!(report.all_passed());
//! # Ok::<(), anyhow::Error>(())
//! ```

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod report;
pub mod validators;

use std::path::PathBuf;

use brick_graph::namespace::building_stem;
use brick_graph::BuildingId;
use tracing::info;

pub use report::{ConformanceReport, Severity, TestResult};

/// Paths and identity required by the conformance runner.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    /// Directory the exports were written to.
    pub output: PathBuf,
    /// Building the exports describe.
    pub building: BuildingId,
}

/// Runs all conformance validators and returns the aggregated report.
///
/// Validators are run in this order:
/// 1. File naming
/// 2. Turtle 1.1 parsing
/// 3. Prefix layout
/// 4. Subject namespaces and subgraph containment
///
/// # Errors
///
/// Returns an error only if a file system operation fails.
pub fn run_all(paths: &OutputPaths) -> anyhow::Result<ConformanceReport> {
    let mut report = ConformanceReport::new();

    let files = validators::export_files(&paths.output)?;
    info!(output = %paths.output.display(), files = files.len(), "Checking exports");
    if files.is_empty() {
        report.push(TestResult::fail(
            "export/files",
            format!("no .ttl exports found in {}", paths.output.display()),
        ));
        return Ok(report);
    }

    report.extend(validators::naming::validate(&files, &paths.building));

    let (turtle, parsed) = validators::turtle::validate(&files)?;
    report.extend(turtle);

    report.extend(validators::prefixes::validate(&files)?);

    let stem = building_stem(&paths.building.portfolio, &paths.building.building);
    report.extend(validators::subgraph::validate(&parsed, &stem));

    Ok(report)
}
