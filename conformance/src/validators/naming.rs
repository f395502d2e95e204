//! File naming validator.
//!
//! Every export must be named
//! `<YYYYMMDD_HHMMSS>_<M|B>_<portfolio>_<building>[_noPoints].ttl`, where
//! `_noPoints` only appears on `B` files.

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use brick_graph::BuildingId;
use regex::Regex;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::file_name;

const VALIDATOR: &str = "export/naming";

/// The parts of a conforming export file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportName {
    /// `YYYYMMDD_HHMMSS` run timestamp.
    pub timestamp: String,
    /// `M` (whole model) or `B` (building subgraph).
    pub code: char,
    /// `<portfolio>_<building>`.
    pub building: String,
    /// Whether the name carries the `_noPoints` suffix.
    pub no_points: bool,
}

impl ExportName {
    /// Parses a file name, or returns `None` if it does not conform.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        let captures = pattern().captures(name)?;
        let code = captures.get(2)?.as_str().chars().next()?;
        let no_points = captures.get(4).is_some();
        if no_points && code != 'B' {
            return None;
        }
        Some(Self {
            timestamp: captures.get(1)?.as_str().to_string(),
            code,
            building: captures.get(3)?.as_str().to_string(),
            no_points,
        })
    }
}

// The pattern is a literal and always compiles.
#[allow(clippy::unwrap_used)]
fn pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^(\d{8}_\d{6})_(M|B)_(.+?)(_noPoints)?\.ttl$").unwrap())
}

/// Checks every file in `files` against the naming scheme for `building`.
pub fn validate(files: &[PathBuf], building: &BuildingId) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let expected = format!("{}_{}", building.portfolio, building.building);
    let mut issues = Vec::new();

    for path in files {
        let name = file_name(path);
        match ExportName::parse(&name) {
            Some(parsed) if parsed.building == expected => {}
            Some(parsed) => issues.push(format!(
                "{name}: names building {} (expected {expected})",
                parsed.building
            )),
            None => issues.push(format!(
                "{name}: does not match <timestamp>_<M|B>_<portfolio>_<building>[_noPoints].ttl"
            )),
        }
    }

    if issues.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{} export file name(s) follow the naming scheme", files.len()),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{} export file name(s) do not conform", issues.len()),
            issues,
        ));
    }
    report
}

/// Returns the parsed name of `path`, if it conforms.
pub(crate) fn parse_path(path: &Path) -> Option<ExportName> {
    ExportName::parse(&file_name(path))
}
