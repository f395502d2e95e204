//! Run-scoped state threaded through every pipeline stage.

use crate::hierarchy::ClassHierarchy;
use crate::inference::InverseTable;
use crate::iris;
use crate::mapper::Mapper;
use crate::namespace::{NamespaceRegistry, BRICK, SWITCH};
use crate::query::TypedSubset;
use crate::store::GraphStore;

/// The portfolio/building pair a run models.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildingId {
    /// Portfolio (organisation) name.
    pub portfolio: String,
    /// Building name.
    pub building: String,
}

impl BuildingId {
    /// Creates a building identity.
    pub fn new(portfolio: impl Into<String>, building: impl Into<String>) -> Self {
        Self {
            portfolio: portfolio.into(),
            building: building.into(),
        }
    }
}

impl Default for BuildingId {
    fn default() -> Self {
        Self::new("example", "example_building")
    }
}

/// Everything one processing run owns: namespaces, ontology facts and the
/// statement store.
///
/// A context is created once per run; the store is filled by the pipeline,
/// mutated by inference, then read by queries and exports.
#[derive(Debug, Clone)]
pub struct RunContext {
    /// The building being modelled.
    pub building: BuildingId,
    /// IRI stem of the building namespace.
    pub building_stem: String,
    /// Prefix bindings, including the building and metadata namespaces.
    pub namespaces: NamespaceRegistry,
    /// The statement store.
    pub store: GraphStore,
    /// Class hierarchy used by typed subgraph scans.
    pub hierarchy: ClassHierarchy,
    /// Inverse-property declarations used by inference.
    pub inverses: InverseTable,
    /// Prefix classes resolve in by default.
    pub ontology_prefix: String,
    /// Prefix whose `prefix:` marker redirects a value to the extension.
    pub extension_prefix: String,
    /// Roots of the `equipment_locations_systems` export.
    pub subset: TypedSubset,
}

impl RunContext {
    /// Creates a context and registers the building namespaces.
    #[must_use]
    pub fn new(
        building: BuildingId,
        mut namespaces: NamespaceRegistry,
        hierarchy: ClassHierarchy,
        inverses: InverseTable,
    ) -> Self {
        let building_stem = namespaces.register_building(&building.portfolio, &building.building);
        let ontology_stem = namespaces.resolve(BRICK).unwrap_or(iris::BRICK).to_string();
        Self {
            building,
            building_stem,
            namespaces,
            store: GraphStore::new(),
            hierarchy,
            inverses,
            ontology_prefix: BRICK.to_string(),
            extension_prefix: SWITCH.to_string(),
            subset: TypedSubset::equipment_locations_systems(&ontology_stem),
        }
    }

    /// Replaces the ontology and extension prefixes.
    #[must_use]
    pub fn with_prefixes(mut self, ontology: &str, extension: &str) -> Self {
        self.ontology_prefix = ontology.to_string();
        self.extension_prefix = extension.to_string();
        self
    }

    /// Replaces the roots of the typed subgraph export.
    #[must_use]
    pub fn with_subset(mut self, subset: TypedSubset) -> Self {
        self.subset = subset;
        self
    }

    /// Returns a mapper over this context's namespaces.
    #[must_use]
    pub fn mapper(&self) -> Mapper<'_> {
        Mapper::new(&self.namespaces, &self.ontology_prefix, &self.extension_prefix)
    }
}
