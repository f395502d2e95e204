//! Turtle 1.1 validator: every export parses.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::report::{ConformanceReport, TestResult};
use crate::validators::{file_name, parse_turtle, Statement};

const VALIDATOR: &str = "export/turtle";

/// Parses every file in `files`. Returns the report and the statement sets
/// of the files that parsed, keyed by path.
///
/// # Errors
///
/// Returns an error if a file cannot be read.
pub fn validate(
    files: &[PathBuf],
) -> Result<(ConformanceReport, BTreeMap<PathBuf, BTreeSet<Statement>>)> {
    let mut report = ConformanceReport::new();
    let mut parsed = BTreeMap::new();

    for path in files {
        let document = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = file_name(path);
        match parse_turtle(&document) {
            Ok(statements) if statements.is_empty() => {
                report.push(TestResult::warn(VALIDATOR, format!("{name} contains no statements")));
                parsed.insert(path.clone(), statements);
            }
            Ok(statements) => {
                report.push(TestResult::pass(
                    VALIDATOR,
                    format!("{name} parses ({} statements)", statements.len()),
                ));
                parsed.insert(path.clone(), statements);
            }
            Err(message) => report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{name} is not valid Turtle"),
                vec![message],
            )),
        }
    }
    Ok((report, parsed))
}
