//! Turtle export of selectable subgraphs.
//!
//! | Mode | Code | Contents |
//! |------|------|----------|
//! | `full` | `M` | every statement |
//! | `building` | `B` | statements about building individuals |
//! | `equipment_locations_systems` | `B` + `_noPoints` | building equipment, locations and systems, without points |

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::NaiveDateTime;
use tracing::{info, warn};

use crate::context::RunContext;
use crate::error::{GraphError, Result};
use crate::query;
use crate::serializer::turtle;
use crate::term::Triple;

/// Default output directory, relative to the working directory.
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Timestamp layout used in output file names.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Which statements an export contains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportMode {
    /// The whole store.
    Full,
    /// Statements whose subject is in the building namespace.
    Building,
    /// Building equipment, locations and systems, excluding points.
    EquipmentLocationsSystems,
}

impl ExportMode {
    /// All modes, in documentation order.
    pub const ALL: [ExportMode; 3] = [
        ExportMode::Full,
        ExportMode::Building,
        ExportMode::EquipmentLocationsSystems,
    ];

    /// Returns the mode's selector string.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ExportMode::Full => "full",
            ExportMode::Building => "building",
            ExportMode::EquipmentLocationsSystems => "equipment_locations_systems",
        }
    }

    /// Returns the mode code written into file names.
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            ExportMode::Full => "M",
            ExportMode::Building | ExportMode::EquipmentLocationsSystems => "B",
        }
    }

    /// Returns the file name suffix placed before the extension.
    #[must_use]
    pub fn suffix(self) -> &'static str {
        match self {
            ExportMode::EquipmentLocationsSystems => "_noPoints",
            ExportMode::Full | ExportMode::Building => "",
        }
    }
}

impl fmt::Display for ExportMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportMode {
    type Err = GraphError;

    fn from_str(s: &str) -> Result<Self> {
        ExportMode::ALL
            .into_iter()
            .find(|mode| mode.as_str() == s)
            .ok_or_else(|| GraphError::UnsupportedExportMode(s.to_string()))
    }
}

/// Builds `<timestamp>_<code>_<portfolio>_<building>[_noPoints].ttl`.
#[must_use]
pub fn file_name(
    timestamp: NaiveDateTime,
    portfolio: &str,
    building: &str,
    mode: ExportMode,
) -> String {
    format!(
        "{}_{}_{}_{}{}.ttl",
        timestamp.format(TIMESTAMP_FORMAT),
        mode.code(),
        portfolio,
        building,
        mode.suffix()
    )
}

/// Returns the statements an export in `mode` contains.
#[must_use]
pub fn select(context: &RunContext, mode: ExportMode) -> Vec<&Triple> {
    match mode {
        ExportMode::Full => context.store.iter().collect(),
        ExportMode::Building => query::namespace_scan(&context.store, &context.building_stem),
        ExportMode::EquipmentLocationsSystems => query::typed_subset_scan(
            &context.store,
            &context.building_stem,
            &context.hierarchy,
            &context.subset,
        ),
    }
}

/// Writes the `mode` subgraph to `dir` and returns the file's path.
///
/// `dir` is created if it does not exist.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if the directory cannot be created or the file
/// cannot be written.
pub fn export(
    context: &RunContext,
    mode: ExportMode,
    dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<PathBuf> {
    fs::create_dir_all(dir).map_err(|e| GraphError::io(dir, e))?;

    info!(mode = %mode, "Exporting model");
    let triples = select(context, mode);
    let document = turtle::to_turtle(triples.iter().copied(), &context.namespaces);

    let path = dir.join(file_name(
        timestamp,
        &context.building.portfolio,
        &context.building.building,
        mode,
    ));
    fs::write(&path, document).map_err(|e| GraphError::io(&path, e))?;
    info!(path = %path.display(), statements = triples.len(), "Export complete");
    Ok(path)
}

/// Like [`export`], but takes the mode as a string. An unsupported mode is
/// logged and yields `Ok(None)` without writing anything.
///
/// # Errors
///
/// Returns [`GraphError::Io`] if the directory cannot be created or the file
/// cannot be written.
pub fn export_named(
    context: &RunContext,
    mode: &str,
    dir: &Path,
    timestamp: NaiveDateTime,
) -> Result<Option<PathBuf>> {
    match mode.parse::<ExportMode>() {
        Ok(mode) => export(context, mode, dir, timestamp).map(Some),
        Err(e) => {
            warn!(error = %e, "Skipping export");
            Ok(None)
        }
    }
}
