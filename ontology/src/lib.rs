//! Ontology loading for the Brick model builder.
//!
//! Reads the Brick ontology and its Switch extension (or any other Turtle or
//! N-Triples file) and keeps only what the builder needs: prefix bindings,
//! the class hierarchy for typed exports and the inverse-property table for
//! inference.
//!
//! Versioned ontologies live under a root directory:
//!
//! | Family | Path |
//! |--------|------|
//! | Brick | `<root>/Brick/<version>/Brick.ttl` |
//! | Switch | `<root>/Switch/<version>/Brick-SwitchExtension.ttl` |
//!
//! A missing file is logged and skipped; the run continues with whatever
//! was loaded.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod error;
pub mod parse;

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use brick_graph::config::OntologyConfig;
use brick_graph::{BuildingId, ClassHierarchy, InverseTable, NamespaceRegistry, RunContext};
use tracing::{info, warn};

pub use error::{OntologyError, Result};
pub use parse::{Facts, Format};

/// A versioned ontology family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Family {
    /// The Brick schema.
    Brick,
    /// The Switch Automation extension.
    Switch,
}

impl Family {
    /// Directory and label of the family.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Family::Brick => "Brick",
            Family::Switch => "Switch",
        }
    }

    /// Returns where `version` of this family lives under `root`.
    #[must_use]
    pub fn path(self, root: &Path, version: &str) -> PathBuf {
        let file = match self {
            Family::Brick => "Brick.ttl",
            Family::Switch => "Brick-SwitchExtension.ttl",
        };
        root.join(self.name()).join(version).join(file)
    }
}

/// Ontology facts merged from every loaded file.
#[derive(Debug, Clone)]
pub struct OntologyBundle {
    /// Default prefixes plus those declared by loaded files.
    pub namespaces: NamespaceRegistry,
    /// `rdfs:subClassOf` edges.
    pub hierarchy: ClassHierarchy,
    /// `owl:inverseOf` declarations, in both directions.
    pub inverses: InverseTable,
    /// Versions loaded per family.
    pub versions: BTreeMap<Family, String>,
    /// Files loaded, in order.
    pub loaded: Vec<PathBuf>,
}

impl Default for OntologyBundle {
    fn default() -> Self {
        Self::new()
    }
}

impl OntologyBundle {
    /// Creates an empty bundle with the default prefixes bound.
    #[must_use]
    pub fn new() -> Self {
        Self {
            namespaces: NamespaceRegistry::with_defaults(),
            hierarchy: ClassHierarchy::new(),
            inverses: InverseTable::new(),
            versions: BTreeMap::new(),
            loaded: Vec::new(),
        }
    }

    /// Loads everything `config` asks for.
    ///
    /// # Errors
    ///
    /// Fails if a file exists but cannot be read or parsed. Missing files,
    /// versioned or explicit, are logged and skipped.
    pub fn from_config(config: &OntologyConfig) -> Result<Self> {
        let mut bundle = Self::new();
        if config.load_brick {
            bundle.load_version(&config.root, Family::Brick, &config.brick_version)?;
        }
        if config.load_switch {
            bundle.load_version(&config.root, Family::Switch, &config.switch_version)?;
        }
        for path in &config.paths {
            match bundle.load_path(path) {
                Ok(()) => {}
                Err(OntologyError::NotFound(missing)) => warn!(
                    path = %missing.display(),
                    "Ontology not found; continuing without it"
                ),
                Err(e) => return Err(e),
            }
        }
        Ok(bundle)
    }

    /// Loads `version` of `family` from `root`. Returns `false` if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Parse`] or [`OntologyError::Io`] if the file
    /// exists but cannot be loaded.
    pub fn load_version(&mut self, root: &Path, family: Family, version: &str) -> Result<bool> {
        let path = family.path(root, version);
        if !path.is_file() {
            warn!(
                family = family.name(),
                version,
                path = %path.display(),
                "Ontology not found; continuing without it"
            );
            return Ok(false);
        }
        self.load_path(&path)?;
        self.versions.insert(family, version.to_string());
        info!(family = family.name(), version, "Ontology loaded");
        Ok(true)
    }

    /// Loads one file, guessing its format from the extension.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::NotFound`], [`OntologyError::UnsupportedFormat`],
    /// [`OntologyError::Io`] or [`OntologyError::Parse`].
    pub fn load_path(&mut self, path: &Path) -> Result<()> {
        if !path.is_file() {
            return Err(OntologyError::NotFound(path.to_path_buf()));
        }
        let format = Format::from_path(path)?;
        let document = std::fs::read_to_string(path).map_err(|source| OntologyError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        self.load_str(&document, format, path)?;
        self.loaded.push(path.to_path_buf());
        Ok(())
    }

    /// Parses `document` and merges its facts. Returns the facts read.
    ///
    /// # Errors
    ///
    /// Returns [`OntologyError::Parse`] if the document is invalid.
    pub fn load_str(&mut self, document: &str, format: Format, origin: &Path) -> Result<Facts> {
        let facts = parse::parse(document, format, origin)?;
        self.merge(&facts);
        info!(
            origin = %origin.display(),
            statements = facts.statements,
            subclass_edges = facts.subclass_edges.len(),
            inverse_pairs = facts.inverse_pairs.len(),
            "Ontology parsed"
        );
        Ok(facts)
    }

    /// Merges `facts`. Existing prefix bindings win over declared ones.
    pub fn merge(&mut self, facts: &Facts) {
        for (prefix, iri) in &facts.prefixes {
            if !self.namespaces.contains(prefix) {
                self.namespaces.bind(prefix.clone(), iri.clone());
            }
        }
        for (class, superclass) in &facts.subclass_edges {
            self.hierarchy.add_edge(class.clone(), superclass.clone());
        }
        for (property, inverse) in &facts.inverse_pairs {
            self.inverses.declare_pair(property.clone(), inverse.clone());
        }
    }

    /// Builds a run context for `building` from this bundle.
    #[must_use]
    pub fn into_context(self, building: BuildingId) -> RunContext {
        RunContext::new(building, self.namespaces, self.hierarchy, self.inverses)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use brick_graph::Iri;

    const BRICK: &str = r#"@prefix brick: <https://brickschema.org/schema/Brick#> .
@prefix owl: <http://www.w3.org/2002/07/owl#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .
@prefix unit: <http://qudt.org/vocab/unit/> .

brick:AHU rdfs:subClassOf brick:HVAC_Equipment .
brick:HVAC_Equipment rdfs:subClassOf brick:Equipment .
brick:feeds owl:inverseOf brick:isFedBy .
"#;

    const SWITCH: &str = r#"@prefix switch: <https://switchautomation.com/schemas/BrickExtension#> .
@prefix brick: <https://brickschema.org/schema/Brick#> .
@prefix rdfs: <http://www.w3.org/2000/01/rdf-schema#> .

switch:Smart_VAV rdfs:subClassOf brick:VAV .
"#;

    fn write(root: &Path, family: Family, version: &str, doc: &str) {
        let path = family.path(root, version);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(path, doc).unwrap();
    }

    #[test]
    fn versioned_layout() {
        assert_eq!(
            Family::Switch.path(Path::new("ontologies"), "1.1"),
            Path::new("ontologies/Switch/1.1/Brick-SwitchExtension.ttl")
        );
    }

    #[test]
    fn loads_configured_versions() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), Family::Brick, "1.2", BRICK);
        write(dir.path(), Family::Switch, "1.1", SWITCH);

        let config = OntologyConfig {
            root: dir.path().to_path_buf(),
            ..OntologyConfig::default()
        };
        let bundle = OntologyBundle::from_config(&config).unwrap();

        assert_eq!(bundle.loaded.len(), 2);
        assert_eq!(bundle.versions[&Family::Brick], "1.2");
        assert_eq!(bundle.hierarchy.edge_count(), 3);
        let feeds = Iri::new("https://brickschema.org/schema/Brick#feeds");
        let is_fed_by = Iri::new("https://brickschema.org/schema/Brick#isFedBy");
        assert_eq!(bundle.inverses.inverses_of(&feeds), &[is_fed_by.clone()]);
        assert_eq!(bundle.inverses.inverses_of(&is_fed_by), &[feeds]);
        assert_eq!(bundle.namespaces.resolve("unit").unwrap(), "http://qudt.org/vocab/unit/");
    }

    #[test]
    fn missing_versions_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), Family::Brick, "1.2", BRICK);
        let config = OntologyConfig {
            root: dir.path().to_path_buf(),
            switch_version: "9.9".to_string(),
            ..OntologyConfig::default()
        };
        let bundle = OntologyBundle::from_config(&config).unwrap();
        assert_eq!(bundle.loaded.len(), 1);
        assert!(!bundle.versions.contains_key(&Family::Switch));
    }

    #[test]
    fn missing_explicit_paths_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let config = OntologyConfig {
            root: dir.path().to_path_buf(),
            paths: vec![dir.path().join("extra.ttl")],
            ..OntologyConfig::default()
        };
        let bundle = OntologyBundle::from_config(&config).unwrap();
        assert_eq!(bundle.loaded.len(), 0);

        let mut bundle = OntologyBundle::new();
        assert!(matches!(
            bundle.load_path(&dir.path().join("extra.ttl")),
            Err(OntologyError::NotFound(_))
        ));
    }

    #[test]
    fn invalid_explicit_paths_still_fail() {
        let dir = tempfile::tempdir().unwrap();
        let broken = dir.path().join("broken.ttl");
        std::fs::write(&broken, "this is not turtle").unwrap();
        let config = OntologyConfig {
            root: dir.path().to_path_buf(),
            paths: vec![broken],
            ..OntologyConfig::default()
        };
        assert!(matches!(
            OntologyBundle::from_config(&config),
            Err(OntologyError::Parse { .. })
        ));
    }

    #[test]
    fn bundle_feeds_the_run_context() {
        let mut bundle = OntologyBundle::new();
        bundle
            .load_str(BRICK, Format::Turtle, Path::new("Brick.ttl"))
            .unwrap();
        let context = bundle.into_context(BuildingId::new("acme", "hq"));
        assert_eq!(context.building_stem, "https://acme.com/hq#");
        assert_eq!(context.inverses.len(), 2);
        assert_eq!(context.hierarchy.edge_count(), 2);
    }
}
