//! Run configuration, read from TOML.
//!
//! Every field has a default, so an empty file is a valid configuration:
//!
//! ```toml
//! portfolio = "example_portfolio"
//! building = "example_building"
//! export_modes = ["full", "building"]
//!
//! [ontology]
//! brick_version = "1.2"
//!
//! [namespaces]
//! brick = "https://brickschema.org/schema/Brick#"
//! ```

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::context::BuildingId;
use crate::error::{GraphError, Result};
use crate::export::DEFAULT_OUTPUT_DIR;
use crate::namespace::{NamespaceRegistry, BRICK, SWITCH};
use crate::query::TypedSubset;
use crate::schema::{RelationshipDef, RelationshipSchema, SchemaSet};
use crate::term::Iri;

/// Top-level run configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RunConfig {
    /// Portfolio name; first part of the building namespace.
    pub portfolio: String,
    /// Building name; second part of the building namespace.
    pub building: String,
    /// Directory exports are written to.
    pub output_dir: PathBuf,
    /// Export modes to run after processing.
    pub export_modes: Vec<String>,
    /// Ontology files to load.
    pub ontology: OntologyConfig,
    /// Extra or overriding prefix bindings.
    pub namespaces: BTreeMap<String, String>,
    /// Prefixes and export roots.
    pub vocabulary: VocabularyConfig,
    /// Replacements for the built-in relationship schemas.
    pub relationships: RelationshipConfig,
}

impl Default for RunConfig {
    fn default() -> Self {
        let building = BuildingId::default();
        Self {
            portfolio: building.portfolio,
            building: building.building,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            export_modes: vec!["full".to_string()],
            ontology: OntologyConfig::default(),
            namespaces: BTreeMap::new(),
            vocabulary: VocabularyConfig::default(),
            relationships: RelationshipConfig::default(),
        }
    }
}

/// Which ontology files to load.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OntologyConfig {
    /// Directory holding `Brick/<version>/...` and `Switch/<version>/...`.
    pub root: PathBuf,
    /// Whether to load the Brick ontology.
    pub load_brick: bool,
    /// Brick version to load.
    pub brick_version: String,
    /// Whether to load the Switch extension.
    pub load_switch: bool,
    /// Switch extension version to load.
    pub switch_version: String,
    /// Additional ontology files.
    pub paths: Vec<PathBuf>,
}

impl Default for OntologyConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("ontologies"),
            load_brick: true,
            brick_version: "1.2".to_string(),
            load_switch: true,
            switch_version: "1.1".to_string(),
            paths: Vec::new(),
        }
    }
}

/// Prefixes the mapper uses and the roots of the typed export.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VocabularyConfig {
    /// Prefix classes and cross-namespace references resolve in.
    pub ontology_prefix: String,
    /// Prefix whose marker redirects values to the extension namespace.
    pub extension_prefix: String,
    /// Classes kept by `equipment_locations_systems`; `Local` or `prefix:Local`.
    pub allowed_roots: Vec<String>,
    /// Classes removed by `equipment_locations_systems`.
    pub excluded_roots: Vec<String>,
}

impl Default for VocabularyConfig {
    fn default() -> Self {
        Self {
            ontology_prefix: BRICK.to_string(),
            extension_prefix: SWITCH.to_string(),
            allowed_roots: vec![
                "Equipment".to_string(),
                "Location".to_string(),
                "System".to_string(),
            ],
            excluded_roots: vec!["Point".to_string()],
        }
    }
}

/// Optional replacements for the built-in relationship definitions.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RelationshipConfig {
    /// Replaces the Brick relationships.
    pub brick: Option<Vec<RelationshipDef>>,
    /// Replaces the Switch relationships.
    pub switch: Option<Vec<RelationshipDef>>,
    /// Replaces the tag relationships.
    pub tags: Option<Vec<RelationshipDef>>,
}

impl RelationshipConfig {
    /// Returns the schema families, falling back to the built-ins.
    #[must_use]
    pub fn schemas(&self) -> SchemaSet {
        let pick = |defs: &Option<Vec<RelationshipDef>>, builtin: RelationshipSchema| match defs {
            Some(defs) => RelationshipSchema {
                group: builtin.group,
                defs: defs.clone(),
            },
            None => builtin,
        };
        SchemaSet {
            brick: pick(&self.brick, RelationshipSchema::brick()),
            switch: pick(&self.switch, RelationshipSchema::switch()),
            tags: pick(&self.tags, RelationshipSchema::tags()),
        }
    }
}

impl RunConfig {
    /// Parses a configuration document.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::Config`] on invalid TOML or unknown keys.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        Ok(toml::from_str(s)?)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::InputNotFound`] if `path` is not a file,
    /// [`GraphError::Io`] if it cannot be read, and [`GraphError::Config`] if
    /// it does not parse.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.is_file() {
            return Err(GraphError::InputNotFound(path.to_path_buf()));
        }
        let s = std::fs::read_to_string(path).map_err(|e| GraphError::io(path, e))?;
        Self::from_toml_str(&s)
    }

    /// Returns the building identity.
    #[must_use]
    pub fn building_id(&self) -> BuildingId {
        BuildingId::new(self.portfolio.clone(), self.building.clone())
    }

    /// Binds the configured prefixes into `namespaces`.
    pub fn apply_namespaces(&self, namespaces: &mut NamespaceRegistry) {
        for (prefix, iri) in &self.namespaces {
            namespaces.bind(prefix.clone(), iri.clone());
        }
    }

    /// Resolves the configured export roots.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::UnknownNamespace`] if a root names an unbound
    /// prefix.
    pub fn typed_subset(&self, namespaces: &NamespaceRegistry) -> Result<TypedSubset> {
        let resolve = |root: &String| -> Result<Iri> {
            let (prefix, local) = root
                .split_once(':')
                .unwrap_or((self.vocabulary.ontology_prefix.as_str(), root.as_str()));
            namespaces.individual(prefix, local)
        };
        Ok(TypedSubset {
            allowed: self
                .vocabulary
                .allowed_roots
                .iter()
                .map(resolve)
                .collect::<Result<_>>()?,
            excluded: self
                .vocabulary
                .excluded_roots
                .iter()
                .map(resolve)
                .collect::<Result<_>>()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::iris;
    use crate::schema::ValueKind;

    #[test]
    fn empty_document_uses_defaults() {
        let config = RunConfig::from_toml_str("").unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.output_dir, PathBuf::from("output"));
        assert_eq!(config.ontology.brick_version, "1.2");
        assert_eq!(config.relationships.schemas(), SchemaSet::default());
    }

    #[test]
    fn overrides_are_applied() {
        let config = RunConfig::from_toml_str(
            r#"
            portfolio = "acme"
            building = "hq"
            export_modes = ["building"]

            [ontology]
            load_switch = false

            [namespaces]
            ex = "https://example.com/ext#"

            [vocabulary]
            excluded_roots = ["Point", "ex:Tag"]

            [[relationships.brick]]
            name = "feeds"
            kind = "reference"
            namespace = "brick"
            "#,
        )
        .unwrap();
        assert_eq!(config.building_id(), BuildingId::new("acme", "hq"));
        assert!(!config.ontology.load_switch);
        assert_eq!(config.ontology.switch_version, "1.1");

        let schemas = config.relationships.schemas();
        assert_eq!(schemas.brick.group, "Brick");
        assert_eq!(schemas.brick.defs.len(), 1);
        assert_eq!(schemas.brick.defs[0].kind, ValueKind::Reference);
        assert_eq!(schemas.switch, RelationshipSchema::switch());

        let mut namespaces = NamespaceRegistry::with_defaults();
        config.apply_namespaces(&mut namespaces);
        let subset = config.typed_subset(&namespaces).unwrap();
        assert!(subset.excluded.contains(&Iri::new("https://example.com/ext#Tag")));
        assert!(subset.excluded.contains(&Iri::new(format!("{}Point", iris::BRICK))));
        assert_eq!(subset.allowed.len(), 3);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(matches!(
            RunConfig::from_toml_str("buildng = \"typo\""),
            Err(GraphError::Config(_))
        ));
    }

    #[test]
    fn unbound_root_prefix_fails() {
        let config =
            RunConfig::from_toml_str("[vocabulary]\nallowed_roots = [\"nope:Thing\"]\n").unwrap();
        assert!(matches!(
            config.typed_subset(&NamespaceRegistry::with_defaults()),
            Err(GraphError::UnknownNamespace(p)) if p == "nope"
        ));
    }
}
