//! Subgraph validator.
//!
//! Building exports (`B`) only describe individuals of the building
//! namespace. Within one run, the building export is contained in the full
//! model (`M`) and the `_noPoints` export is contained in the building export.

use std::collections::{BTreeMap, BTreeSet};
use std::path::PathBuf;

use crate::report::{ConformanceReport, TestResult};
use crate::validators::naming::{parse_path, ExportName};
use crate::validators::{file_name, Statement};

const VALIDATOR: &str = "export/subgraph";

#[derive(Default)]
struct Run<'a> {
    full: Option<(String, &'a BTreeSet<Statement>)>,
    building: Option<(String, &'a BTreeSet<Statement>)>,
    no_points: Option<(String, &'a BTreeSet<Statement>)>,
}

/// Checks subject namespaces and containment for the parsed exports.
pub fn validate(
    parsed: &BTreeMap<PathBuf, BTreeSet<Statement>>,
    building_stem: &str,
) -> ConformanceReport {
    let mut report = ConformanceReport::new();
    let subject_prefix = format!("<{building_stem}");
    let mut runs: BTreeMap<String, Run<'_>> = BTreeMap::new();

    for (path, statements) in parsed {
        let Some(ExportName {
            timestamp,
            code,
            no_points,
            ..
        }) = parse_path(path)
        else {
            continue;
        };
        let name = file_name(path);
        let run = runs.entry(timestamp).or_default();
        match (code, no_points) {
            ('M', _) => run.full = Some((name, statements)),
            (_, false) => run.building = Some((name, statements)),
            (_, true) => run.no_points = Some((name, statements)),
        }

        if code == 'B' {
            let strays: Vec<String> = statements
                .iter()
                .filter(|(s, _, _)| !s.starts_with(&subject_prefix))
                .map(|(s, p, o)| format!("{s} {p} {o}"))
                .take(10)
                .collect();
            if strays.is_empty() {
                report.push(TestResult::pass(
                    VALIDATOR,
                    format!("{} only describes building individuals", file_name(path)),
                ));
            } else {
                report.push(TestResult::fail_with_details(
                    VALIDATOR,
                    format!("{} has subjects outside {building_stem}", file_name(path)),
                    strays,
                ));
            }
        }
    }

    for run in runs.values() {
        contained(&mut report, run.building.as_ref(), run.full.as_ref());
        contained(&mut report, run.no_points.as_ref(), run.building.as_ref());
    }
    report
}

fn contained(
    report: &mut ConformanceReport,
    part: Option<&(String, &BTreeSet<Statement>)>,
    whole: Option<&(String, &BTreeSet<Statement>)>,
) {
    let (Some((part_name, part)), Some((whole_name, whole))) = (part, whole) else {
        return;
    };
    let missing: Vec<String> = part
        .difference(whole)
        .map(|(s, p, o)| format!("{s} {p} {o}"))
        .take(10)
        .collect();
    if missing.is_empty() {
        report.push(TestResult::pass(
            VALIDATOR,
            format!("{part_name} is contained in {whole_name}"),
        ));
    } else {
        report.push(TestResult::fail_with_details(
            VALIDATOR,
            format!("{part_name} has statements missing from {whole_name}"),
            missing,
        ));
    }
}
