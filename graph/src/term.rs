//! Terms and statements.
//!
//! A [`Triple`] is only ever built from fully resolved parts: the mapper
//! resolves subject, predicate and object first and constructs the triple
//! last, so a statement is never partially constructed.

use std::fmt;

/// An absolute IRI.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Iri(String);

impl Iri {
    /// Wraps an IRI string. No syntax checks are applied.
    pub fn new(iri: impl Into<String>) -> Self {
        Self(iri.into())
    }

    /// Returns the IRI as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns true if this IRI lies under the given namespace stem.
    #[must_use]
    pub fn in_namespace(&self, stem: &str) -> bool {
        self.0.starts_with(stem)
    }
}

impl fmt::Display for Iri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for Iri {
    fn from(iri: &str) -> Self {
        Self::new(iri)
    }
}

/// An object position term: an individual or a plain literal.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Term {
    /// A resource.
    Iri(Iri),
    /// A plain string literal.
    Literal(String),
}

impl Term {
    /// Creates a literal term.
    pub fn literal(value: impl Into<String>) -> Self {
        Self::Literal(value.into())
    }

    /// Returns the IRI if this term is a resource.
    #[must_use]
    pub fn as_iri(&self) -> Option<&Iri> {
        match self {
            Term::Iri(iri) => Some(iri),
            Term::Literal(_) => None,
        }
    }
}

impl From<Iri> for Term {
    fn from(iri: Iri) -> Self {
        Self::Iri(iri)
    }
}

/// A subject–predicate–object statement.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triple {
    /// Subject; always an individual.
    pub subject: Iri,
    /// Predicate.
    pub predicate: Iri,
    /// Object.
    pub object: Term,
}

impl Triple {
    /// Builds a statement from resolved parts.
    pub fn new(subject: Iri, predicate: Iri, object: impl Into<Term>) -> Self {
        Self {
            subject,
            predicate,
            object: object.into(),
        }
    }
}

/// Makes a free-text identifier usable as an IRI local name.
///
/// Every whitespace character (non-breaking spaces included) and every `/` is
/// replaced with `_`.
#[must_use]
pub fn sanitize(fragment: &str) -> String {
    fragment
        .chars()
        .map(|c| if c.is_whitespace() || c == '/' { '_' } else { c })
        .collect()
}
