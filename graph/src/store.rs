//! In-memory statement store.
//!
//! The store is a set: inserting a statement that is already present is a
//! no-op. Inference relies on this to be idempotent, so the representation
//! must stay duplicate-free.

use std::collections::{BTreeSet, HashMap};

use crate::iris;
use crate::term::{Iri, Term, Triple};

/// A set of statements, iterated in `(subject, predicate, object)` order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GraphStore {
    triples: BTreeSet<Triple>,
}

impl GraphStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a statement. Returns false if it was already present.
    pub fn insert(&mut self, triple: Triple) -> bool {
        self.triples.insert(triple)
    }

    /// Inserts every statement, returning how many were new.
    pub fn insert_all(&mut self, triples: impl IntoIterator<Item = Triple>) -> usize {
        triples
            .into_iter()
            .map(|t| self.insert(t))
            .filter(|inserted| *inserted)
            .count()
    }

    /// Returns true if the statement is present.
    #[must_use]
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// Number of statements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Returns true if the store holds no statements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterates over all statements.
    pub fn iter(&self) -> impl Iterator<Item = &Triple> {
        self.triples.iter()
    }

    /// Iterates over statements matching a pattern; `None` matches anything.
    pub fn matching<'s, 'q>(
        &'s self,
        subject: Option<&'q Iri>,
        predicate: Option<&'q Iri>,
        object: Option<&'q Term>,
    ) -> impl Iterator<Item = &'s Triple> + 'q
    where
        's: 'q,
    {
        self.triples.iter().filter(move |t| {
            subject.map_or(true, |s| &t.subject == s)
                && predicate.map_or(true, |p| &t.predicate == p)
                && object.map_or(true, |o| &t.object == o)
        })
    }

    /// Maps every typed individual to its `rdf:type` classes.
    #[must_use]
    pub fn type_index(&self) -> HashMap<&Iri, Vec<&Iri>> {
        let mut index: HashMap<&Iri, Vec<&Iri>> = HashMap::new();
        for t in &self.triples {
            if t.predicate.as_str() != iris::RDF_TYPE {
                continue;
            }
            if let Some(class) = t.object.as_iri() {
                index.entry(&t.subject).or_default().push(class);
            }
        }
        index
    }
}

impl Extend<Triple> for GraphStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl FromIterator<Triple> for GraphStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = Self::new();
        store.insert_all(iter);
        store
    }
}

impl<'s> IntoIterator for &'s GraphStore {
    type Item = &'s Triple;
    type IntoIter = std::collections::btree_set::Iter<'s, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}
