//! Prefix layout validator.
//!
//! Exports declare every prefix once, before the first statement.

use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::report::{ConformanceReport, TestResult};
use crate::validators::file_name;

const VALIDATOR: &str = "export/prefixes";

/// Returns the layout problems of one document.
#[must_use]
pub fn check(document: &str) -> Vec<String> {
    let mut issues = Vec::new();
    let mut seen = HashSet::new();
    let mut body_started = false;

    for (i, line) in document.lines().enumerate() {
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }
        let Some(rest) = trimmed.strip_prefix("@prefix") else {
            body_started = true;
            continue;
        };
        if body_started {
            issues.push(format!("line {}: @prefix after the first statement", i + 1));
        }
        let prefix = rest.trim().split(':').next().unwrap_or_default().to_string();
        if !seen.insert(prefix.clone()) {
            issues.push(format!("line {}: prefix '{prefix}' declared twice", i + 1));
        }
    }
    if seen.is_empty() {
        issues.push("no @prefix declarations".to_string());
    }
    issues
}

/// Checks the prefix layout of every file in `files`.
///
/// # Errors
///
/// Returns an error if a file cannot be read.
pub fn validate(files: &[PathBuf]) -> Result<ConformanceReport> {
    let mut report = ConformanceReport::new();
    for path in files {
        let document = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        let name = file_name(path);
        let issues = check(&document);
        if issues.is_empty() {
            report.push(TestResult::pass(VALIDATOR, format!("{name} declares prefixes up front")));
        } else {
            report.push(TestResult::fail_with_details(
                VALIDATOR,
                format!("{name} has prefix layout issues"),
                issues,
            ));
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_prefixes_before_body() {
        let doc = "@prefix brick: <https://brickschema.org/schema/Brick#> .\n@prefix hq: <https://acme.com/hq#> .\n\nhq:AHU-1 a brick:AHU .\n";
        assert!(check(doc).is_empty());
    }

    #[test]
    fn flags_late_and_duplicate_prefixes() {
        let doc = "@prefix a: <https://a.com/#> .\na:x a a:Y .\n@prefix a: <https://a.com/#> .\n";
        let issues = check(doc);
        assert_eq!(issues.len(), 2);
        assert!(issues[0].contains("after the first statement"));
        assert!(issues[1].contains("declared twice"));
    }

    #[test]
    fn flags_missing_prefixes() {
        assert_eq!(check("<https://a.com/#x> <https://a.com/#p> <https://a.com/#y> .\n").len(), 1);
    }
}
