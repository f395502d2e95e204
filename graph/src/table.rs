//! Row-oriented input tables.
//!
//! Each table carries a two-level header `(group, column)` and string cells.
//! A cell is either present or absent; empty and whitespace-only strings are
//! absent, while any other value (including `"0"`) is data.
//!
//! Tables arrive as one JSON document holding `locations`, `equipment` and
//! `points`:
//!
//! ```json
//! {
//!   "locations": {
//!     "columns": [["Brick", "identifier"], ["Brick", "class"]],
//!     "rows": [["Room 101", "Location"]]
//!   }
//! }
//! ```

use std::collections::{BTreeSet, HashMap};
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::{GraphError, Result};

/// A two-level column header.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Deserialize)]
#[serde(from = "(String, String)")]
pub struct Column {
    /// First header level, e.g. `Brick` or `Switch`.
    pub group: String,
    /// Second header level, e.g. `identifier` or `feeds`.
    pub name: String,
}

impl Column {
    /// Creates a column header.
    pub fn new(group: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            group: group.into(),
            name: name.into(),
        }
    }
}

impl From<(String, String)> for Column {
    fn from((group, name): (String, String)) -> Self {
        Self { group, name }
    }
}

#[derive(Deserialize)]
struct TableDoc {
    #[serde(default)]
    name: String,
    columns: Vec<Column>,
    #[serde(default)]
    rows: Vec<Vec<Option<String>>>,
}

impl From<TableDoc> for Table {
    fn from(doc: TableDoc) -> Self {
        Table::new(doc.name, doc.columns, doc.rows)
    }
}

/// One input table.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(from = "TableDoc")]
pub struct Table {
    /// Table name, used in log messages and summaries.
    pub name: String,
    rows: Vec<Vec<Option<String>>>,
    index: HashMap<String, HashMap<String, usize>>,
}

impl Table {
    /// Creates a table from headers and rows of cells.
    ///
    /// Rows shorter than the header are padded with absent cells; non-breaking
    /// spaces inside cells become plain spaces.
    pub fn new(
        name: impl Into<String>,
        columns: Vec<Column>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Self {
        let mut index: HashMap<String, HashMap<String, usize>> = HashMap::new();
        for (i, column) in columns.iter().enumerate() {
            index
                .entry(column.group.clone())
                .or_default()
                .entry(column.name.clone())
                .or_insert(i);
        }
        let rows = rows
            .into_iter()
            .map(|row| {
                row.into_iter()
                    .map(|cell| cell.map(|value| value.replace('\u{a0}', " ")))
                    .collect()
            })
            .collect();
        Self {
            name: name.into(),
            rows,
            index,
        }
    }

    /// Returns the column names present under `group`.
    #[must_use]
    pub fn columns_in(&self, group: &str) -> BTreeSet<&str> {
        self.index
            .get(group)
            .map(|names| names.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Returns true if any column sits under `group`.
    #[must_use]
    pub fn has_group(&self, group: &str) -> bool {
        self.index.contains_key(group)
    }

    /// Number of data rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no data rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows in input order.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(move |cells| Row {
            table: self,
            cells,
        })
    }
}

/// A borrowed view of one table row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'t> {
    table: &'t Table,
    cells: &'t [Option<String>],
}

impl<'t> Row<'t> {
    /// Returns the cell under `(group, column)`, or `None` when the column is
    /// missing, the cell is null, or it holds only whitespace.
    #[must_use]
    pub fn get(&self, group: &str, column: &str) -> Option<&'t str> {
        let i = *self.table.index.get(group)?.get(column)?;
        self.cells
            .get(i)?
            .as_deref()
            .filter(|value| !value.trim().is_empty())
    }
}

#[derive(Deserialize)]
struct TableSetDoc {
    locations: Option<Table>,
    equipment: Option<Table>,
    points: Option<Table>,
}

/// The three tables describing a building.
#[derive(Debug, Clone, Default)]
pub struct TableSet {
    /// Spaces, floors, rooms, zones.
    pub locations: Table,
    /// Equipment and systems.
    pub equipment: Table,
    /// Sensor and control points.
    pub points: Table,
}

impl TableSet {
    /// Parses a table document.
    ///
    /// A missing table is replaced by an empty one and logged.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Json`] if the document does not match the table
    /// schema.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let doc: TableSetDoc = serde_json::from_str(json)?;
        Ok(Self {
            locations: named("locations", doc.locations),
            equipment: named("equipment", doc.equipment),
            points: named("points", doc.points),
        })
    }

    /// Reads and parses a table document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InputNotFound`] if `path` is not a file,
    /// [`GraphError::Io`] if it cannot be read, and [`GraphError::Json`] if it
    /// does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(GraphError::InputNotFound(path.to_path_buf()));
        }
        let json = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_json_str(&json)
    }

    /// Iterates over `(name, table)` in processing order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &Table)> {
        [
            ("locations", &self.locations),
            ("equipment", &self.equipment),
            ("points", &self.points),
        ]
        .into_iter()
    }
}

fn named(name: &str, table: Option<Table>) -> Table {
    match table {
        Some(mut table) => {
            if table.name.is_empty() {
                table.name = name.to_string();
            }
            table
        }
        None => {
            warn!(table = name, "Table missing from input document; treating it as empty");
            Table::new(name, Vec::new(), Vec::new())
        }
    }
}
