//! Prefix ↔ IRI bindings.
//!
//! The registry is owned by the run context; nothing here is global. The
//! building namespace is derived from the portfolio/building pair of the run
//! and bound once by [`NamespaceRegistry::register_building`].

use std::collections::BTreeMap;

use crate::error::{GraphError, Result};
use crate::iris;
use crate::term::{sanitize, Iri};

/// Prefix of the run-specific building namespace.
pub const BUILDING: &str = "building";
/// Alias of [`BUILDING`] used as the default target of references.
pub const REF: &str = "ref";
/// Prefix of the tag metadata namespace.
pub const META: &str = "meta";
/// Prefix of the Brick ontology namespace.
pub const BRICK: &str = "brick";
/// Prefix of the Switch extension namespace.
pub const SWITCH: &str = "switch";

/// Prefix bindings for a single processing run.
#[derive(Debug, Clone, Default)]
pub struct NamespaceRegistry {
    bindings: BTreeMap<String, String>,
    aliases: BTreeMap<String, String>,
}

impl NamespaceRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the standard W3C prefixes plus `brick` and
    /// `switch` bound to their default stems.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.bind("rdf", iris::RDF);
        registry.bind("rdfs", iris::RDFS);
        registry.bind("owl", iris::OWL);
        registry.bind("xsd", iris::XSD);
        registry.bind(BRICK, iris::BRICK);
        registry.bind(SWITCH, iris::SWITCH);
        registry
    }

    /// Binds `prefix` to `iri`, replacing any earlier binding.
    pub fn bind(&mut self, prefix: impl Into<String>, iri: impl Into<String>) {
        let prefix = prefix.into();
        self.aliases.remove(&prefix);
        self.bindings.insert(prefix, iri.into());
    }

    /// Makes `alias` resolve to whatever `target` resolves to.
    ///
    /// Aliases resolve like ordinary prefixes but are never used when
    /// abbreviating IRIs.
    pub fn alias(&mut self, alias: impl Into<String>, target: impl Into<String>) {
        self.aliases.insert(alias.into(), target.into());
    }

    /// Returns the IRI stem bound to `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNamespace`] if the prefix is not bound.
    pub fn resolve(&self, prefix: &str) -> Result<&str> {
        let key = self.aliases.get(prefix).map_or(prefix, String::as_str);
        self.bindings
            .get(key)
            .map(String::as_str)
            .ok_or_else(|| GraphError::UnknownNamespace(prefix.to_string()))
    }

    /// Returns true if `prefix` resolves.
    #[must_use]
    pub fn contains(&self, prefix: &str) -> bool {
        self.resolve(prefix).is_ok()
    }

    /// Builds the IRI of `local` inside the namespace bound to `prefix`.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNamespace`] if the prefix is not bound.
    pub fn individual(&self, prefix: &str, local: &str) -> Result<Iri> {
        let stem = self.resolve(prefix)?;
        Ok(Iri::new(format!("{stem}{local}")))
    }

    /// Splits `iri` into a bound prefix and a local name.
    ///
    /// The longest matching stem wins, so nested namespaces abbreviate
    /// against the most specific binding.
    #[must_use]
    pub fn abbreviate<'i>(&self, iri: &'i str) -> Option<(&str, &'i str)> {
        self.bindings
            .iter()
            .filter(|(_, stem)| !stem.is_empty() && iri.starts_with(stem.as_str()))
            .max_by_key(|(_, stem)| stem.len())
            .map(|(prefix, stem)| (prefix.as_str(), &iri[stem.len()..]))
    }

    /// Iterates over `(prefix, stem)` pairs in prefix order. Aliases are not
    /// included.
    pub fn prefixes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.bindings
            .iter()
            .map(|(prefix, stem)| (prefix.as_str(), stem.as_str()))
    }

    /// Registers the building-scoped and metadata namespaces for a run and
    /// returns the building stem.
    ///
    /// Calling this again with the same names leaves the registry unchanged.
    pub fn register_building(&mut self, portfolio: &str, building: &str) -> String {
        let stem = building_stem(portfolio, building);
        self.bind(BUILDING, stem.clone());
        self.alias(REF, BUILDING);
        self.bind(META, iris::META);
        stem
    }
}

/// Returns the IRI stem of the namespace holding a building's individuals.
#[must_use]
pub fn building_stem(portfolio: &str, building: &str) -> String {
    format!(
        "https://{}.com/{}#",
        sanitize(portfolio),
        sanitize(building)
    )
}
