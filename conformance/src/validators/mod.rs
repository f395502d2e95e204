//! Export validators and the helpers they share.

pub mod naming;
pub mod prefixes;
pub mod subgraph;
pub mod turtle;

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sophia_api::source::TripleSource;
use sophia_api::term::Term;
use sophia_api::triple::Triple;
use walkdir::WalkDir;

/// A parsed statement, each term rendered as `<iri>`, `"lexical"` or `_:`.
pub type Statement = (String, String, String);

/// Returns the `.ttl` files directly inside `dir`, sorted by name.
///
/// # Errors
///
/// Returns an error if `dir` cannot be listed.
pub fn export_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in WalkDir::new(dir).min_depth(1).max_depth(1).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to list {}", dir.display()))?;
        let path = entry.path();
        if entry.file_type().is_file() && path.extension().is_some_and(|e| e == "ttl") {
            files.push(path.to_path_buf());
        }
    }
    Ok(files)
}

/// Returns the file name of `path` as a string, or an empty string.
pub(crate) fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Parses a Turtle document into its statement set.
///
/// # Errors
///
/// Returns the parser message if the document is not valid Turtle.
pub fn parse_turtle(document: &str) -> std::result::Result<BTreeSet<Statement>, String> {
    let mut statements = BTreeSet::new();
    sophia_turtle::parser::turtle::parse_str(document)
        .for_each_triple(|t| {
            statements.insert((render(t.s()), render(t.p()), render(t.o())));
        })
        .map_err(|e| e.to_string())?;
    Ok(statements)
}

fn render<T: Term>(term: T) -> String {
    if let Some(iri) = term.iri() {
        return format!("<{}>", iri.as_str());
    }
    if let Some(lexical) = term.lexical_form() {
        return format!("\"{}\"", &*lexical);
    }
    "_:".to_string()
}
