//! Relationship schemas and their validation against table columns.
//!
//! A schema is a column group (`Brick`, `Switch`, `Tags`) plus the
//! relationships the mapper reads from that group. The built-in schemas cover
//! the Brick relationships of interest, the Switch extension literals and the
//! tag extension.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{GraphError, Result};
use crate::namespace::{BRICK, META, REF, SWITCH};
use crate::table::Table;

/// Column group holding the identifier, class and Brick relationships.
pub const PRIMARY_GROUP: &str = "Brick";
/// Column naming each entity.
pub const IDENTIFIER: &str = "identifier";
/// Column holding each entity's class.
pub const CLASS: &str = "class";

/// How a relationship's cell values become objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueKind {
    /// Each token is a plain literal.
    Literal,
    /// Each token names another individual of the building.
    Reference,
    /// Each token names an ontology individual, unless it carries the
    /// extension marker.
    CrossNamespaceReference,
}

/// One relationship read from a table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipDef {
    /// Column name and predicate local name.
    pub name: String,
    /// How cell values are interpreted.
    pub kind: ValueKind,
    /// Prefix of the predicate's namespace.
    pub namespace: String,
    /// Prefix objects resolve in when no extension marker is present.
    /// Defaults depend on [`ValueKind`]; see [`RelationshipDef::target_prefix`].
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target: Option<String>,
}

impl RelationshipDef {
    fn new(name: &str, kind: ValueKind, namespace: &str) -> Self {
        Self {
            name: name.to_string(),
            kind,
            namespace: namespace.to_string(),
            target: None,
        }
    }

    /// A literal-valued relationship.
    #[must_use]
    pub fn literal(name: &str, namespace: &str) -> Self {
        Self::new(name, ValueKind::Literal, namespace)
    }

    /// A relationship referencing other building individuals.
    #[must_use]
    pub fn reference(name: &str, namespace: &str) -> Self {
        Self::new(name, ValueKind::Reference, namespace)
    }

    /// A relationship referencing ontology individuals.
    #[must_use]
    pub fn cross_namespace(name: &str, namespace: &str) -> Self {
        Self::new(name, ValueKind::CrossNamespaceReference, namespace)
    }

    /// Overrides the namespace objects resolve in.
    #[must_use]
    pub fn targeting(mut self, prefix: &str) -> Self {
        self.target = Some(prefix.to_string());
        self
    }

    /// Returns the prefix objects resolve in, or `None` for literals.
    ///
    /// References default to the building (`ref`); cross-namespace
    /// references default to `ontology_prefix`.
    #[must_use]
    pub fn target_prefix<'a>(&'a self, ontology_prefix: &'a str) -> Option<&'a str> {
        let explicit = self.target.as_deref();
        match self.kind {
            ValueKind::Literal => None,
            ValueKind::Reference => Some(explicit.unwrap_or(REF)),
            ValueKind::CrossNamespaceReference => Some(explicit.unwrap_or(ontology_prefix)),
        }
    }
}

/// A column group and the relationships read from it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationshipSchema {
    /// First-level header the relationship columns sit under.
    pub group: String,
    /// Relationships of interest.
    pub defs: Vec<RelationshipDef>,
}

impl RelationshipSchema {
    /// Brick relationships of interest.
    #[must_use]
    pub fn brick() -> Self {
        Self {
            group: PRIMARY_GROUP.to_string(),
            defs: vec![
                RelationshipDef::literal("label", "rdfs"),
                RelationshipDef::literal("hasUuid", BRICK),
                RelationshipDef::reference("feeds", BRICK),
                RelationshipDef::reference("isFedBy", BRICK),
                RelationshipDef::reference("hasPart", BRICK),
                RelationshipDef::reference("isPartOf", BRICK),
                RelationshipDef::reference("hasLocation", BRICK),
                RelationshipDef::reference("isLocationOf", BRICK),
                RelationshipDef::cross_namespace("hasInputSubstance", BRICK),
                RelationshipDef::cross_namespace("hasOutputSubstance", BRICK),
                RelationshipDef::literal("hasUnit", BRICK),
                RelationshipDef::reference("isPointOf", BRICK),
            ],
        }
    }

    /// Switch extension relationships.
    #[must_use]
    pub fn switch() -> Self {
        Self {
            group: "Switch".to_string(),
            defs: vec![RelationshipDef::literal("hasObjectPropertyId", SWITCH)],
        }
    }

    /// Tag extension: tag tokens become individuals of the metadata namespace.
    #[must_use]
    pub fn tags() -> Self {
        Self {
            group: "Tags".to_string(),
            defs: vec![RelationshipDef::reference("hasTag", SWITCH).targeting(META)],
        }
    }
}

/// The schema families applied to every table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaSet {
    /// Primary ontology relationships.
    pub brick: RelationshipSchema,
    /// Extension relationships, mapped alongside the primary ones.
    pub switch: RelationshipSchema,
    /// Tag relationships, applied by the tag processor.
    pub tags: RelationshipSchema,
}

impl Default for SchemaSet {
    fn default() -> Self {
        Self {
            brick: RelationshipSchema::brick(),
            switch: RelationshipSchema::switch(),
            tags: RelationshipSchema::tags(),
        }
    }
}

/// The outcome of checking a schema against a table's columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Validation<'a> {
    /// Definitions whose column exists.
    pub active: Vec<&'a RelationshipDef>,
    /// Names of definitions with no matching column.
    pub inactive: Vec<&'a str>,
}

/// Splits `defs` into those whose column exists in `columns` and those that
/// are inactive for this dataset. Inactive relationships are logged.
#[must_use]
pub fn validate<'a>(columns: &BTreeSet<&str>, defs: &'a [RelationshipDef]) -> Validation<'a> {
    let (active, missing): (Vec<&RelationshipDef>, Vec<&RelationshipDef>) =
        defs.iter().partition(|def| columns.contains(def.name.as_str()));
    let inactive: Vec<&str> = missing.iter().map(|def| def.name.as_str()).collect();
    for name in &inactive {
        warn!(relationship = name, "Input table does not define relationship");
    }
    Validation { active, inactive }
}

/// Checks that `table` has the identifier and class columns.
///
/// # Errors
///
/// Returns [`GraphError::MissingRequiredColumn`] naming the first absent
/// column.
pub fn require_columns(table: &Table) -> Result<()> {
    let columns = table.columns_in(PRIMARY_GROUP);
    for required in [IDENTIFIER, CLASS] {
        if !columns.contains(required) {
            return Err(GraphError::MissingRequiredColumn {
                table: table.name.clone(),
                column: format!("{PRIMARY_GROUP}/{required}"),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Column;

    #[test]
    fn validation_reports_missing_columns() {
        let columns: BTreeSet<&str> = ["identifier", "class", "feeds", "label"].into();
        let schema = RelationshipSchema::brick();
        let validation = validate(&columns, &schema.defs);
        let active: Vec<&str> = validation.active.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(active, vec!["label", "feeds"]);
        assert!(validation.inactive.contains(&"isPointOf"));
        assert_eq!(validation.active.len() + validation.inactive.len(), schema.defs.len());
    }

    #[test]
    fn default_targets_follow_value_kind() {
        assert_eq!(RelationshipDef::literal("label", "rdfs").target_prefix(BRICK), None);
        assert_eq!(RelationshipDef::reference("feeds", BRICK).target_prefix(BRICK), Some(REF));
        assert_eq!(
            RelationshipDef::cross_namespace("hasInputSubstance", BRICK).target_prefix(BRICK),
            Some(BRICK)
        );
        assert_eq!(RelationshipSchema::tags().defs[0].target_prefix(BRICK), Some(META));
    }

    #[test]
    fn identifier_and_class_are_required() {
        let table = Table::new("points", vec![Column::new("Brick", "identifier")], vec![]);
        let err = require_columns(&table).unwrap_err();
        assert!(matches!(
            err,
            GraphError::MissingRequiredColumn { ref table, ref column }
                if table == "points" && column == "Brick/class"
        ));

        let table = Table::new(
            "points",
            vec![Column::new("Brick", "identifier"), Column::new("Brick", "class")],
            vec![],
        );
        assert!(require_columns(&table).is_ok());
    }

    #[test]
    fn value_kinds_deserialize_from_snake_case() {
        let def: RelationshipDef = toml::from_str(
            "name = \"hasInputSubstance\"\nkind = \"cross_namespace_reference\"\nnamespace = \"brick\"\n",
        )
        .unwrap();
        assert_eq!(def.kind, ValueKind::CrossNamespaceReference);
        assert_eq!(def.target, None);
    }
}
