//! RDF parsing into ontology facts.
//!
//! Only three kinds of statement matter to the builder: prefix declarations,
//! `rdfs:subClassOf` edges and `owl:inverseOf` pairs. Everything else in the
//! ontology is parsed (so malformed files are rejected) and discarded.

use std::path::{Path, PathBuf};

use brick_graph::iris::{OWL_INVERSE_OF, RDFS_SUBCLASS_OF};
use brick_graph::Iri;
use sophia_api::source::TripleSource;
use sophia_api::term::Term;
use sophia_api::triple::Triple;
use sophia_turtle::parser::{nt, turtle};

use crate::error::{OntologyError, Result};

/// Serialization of an ontology document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    /// Turtle 1.1.
    Turtle,
    /// N-Triples.
    NTriples,
}

impl Format {
    /// Guesses the format from a file extension.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::UnsupportedFormat`] for anything other than
    /// `.ttl` or `.nt`.
    pub fn from_path(path: &Path) -> Result<Self> {
        match path.extension().and_then(|e| e.to_str()) {
            Some("ttl") => Ok(Format::Turtle),
            Some("nt") => Ok(Format::NTriples),
            _ => Err(OntologyError::UnsupportedFormat(path.to_path_buf())),
        }
    }
}

/// Facts extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facts {
    /// `(prefix, namespace)` declarations in document order.
    pub prefixes: Vec<(String, String)>,
    /// `(class, superclass)` edges.
    pub subclass_edges: Vec<(Iri, Iri)>,
    /// `(property, inverse)` pairs as written.
    pub inverse_pairs: Vec<(Iri, Iri)>,
    /// Statements parsed.
    pub statements: usize,
}

impl Facts {
    fn record<T: Triple>(&mut self, t: &T) {
        self.statements += 1;
        let iri_of = |term: Option<String>| term.map(Iri::new);
        let Some(predicate) = t.p().iri().map(|i| i.as_str().to_string()) else {
            return;
        };
        if predicate != RDFS_SUBCLASS_OF && predicate != OWL_INVERSE_OF {
            return;
        }
        let subject = iri_of(t.s().iri().map(|i| i.as_str().to_string()));
        let object = iri_of(t.o().iri().map(|i| i.as_str().to_string()));
        let (Some(subject), Some(object)) = (subject, object) else {
            return;
        };
        if predicate == RDFS_SUBCLASS_OF {
            self.subclass_edges.push((subject, object));
        } else {
            self.inverse_pairs.push((subject, object));
        }
    }
}

/// Parses `document` and extracts its facts. `origin` labels errors.
///
/// # Errors
///
/// Returns [`OntologyError::Parse`] if the document is not valid in `format`.
pub fn parse(document: &str, format: Format, origin: &Path) -> Result<Facts> {
    let mut facts = Facts {
        prefixes: declared_prefixes(document),
        ..Facts::default()
    };
    let outcome = match format {
        Format::Turtle => turtle::parse_str(document)
            .for_each_triple(|t| facts.record(&t))
            .map_err(|e| e.to_string()),
        Format::NTriples => nt::parse_str(document)
            .for_each_triple(|t| facts.record(&t))
            .map_err(|e| e.to_string()),
    };
    outcome.map_err(|message| OntologyError::Parse {
        path: PathBuf::from(origin),
        message,
    })?;
    Ok(facts)
}

/// Scans `@prefix` and SPARQL-style `PREFIX` lines.
fn declared_prefixes(document: &str) -> Vec<(String, String)> {
    document
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            let rest = line
                .strip_prefix("@prefix")
                .or_else(|| line.strip_prefix("PREFIX"))?;
            let (prefix, rest) = rest.trim().split_once(':')?;
            let iri = rest.trim().strip_prefix('<')?.split_once('>')?.0;
            Some((prefix.trim().to_string(), iri.to_string()))
        })
        .collect()
}
