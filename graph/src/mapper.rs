//! Row-to-triple mapping.
//!
//! For every row the mapper emits a type statement for the row's entity and
//! one statement per token of every active relationship cell. Subjects always
//! live in the building namespace. Tokens that cannot be resolved are dropped
//! with a warning; they never abort the table.

use tracing::{debug, warn};

use crate::error::{GraphError, Result};
use crate::iris;
use crate::namespace::{NamespaceRegistry, BUILDING};
use crate::schema::{self, RelationshipDef, RelationshipSchema, ValueKind, CLASS, IDENTIFIER};
use crate::table::{Row, Table};
use crate::term::{sanitize, Iri, Term, Triple};

/// Separator between values of a multi-valued cell.
pub const VALUE_SEPARATOR: char = '|';

/// Statements produced from one table by one schema family, plus what was
/// left out.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedTable {
    /// Statements in emission order; may contain duplicates.
    pub triples: Vec<Triple>,
    /// Relationships with no column in the table.
    pub inactive: Vec<String>,
    /// Relationship tokens dropped because they did not resolve.
    pub dropped: usize,
    /// Rows skipped because they lack a class or identifier.
    pub skipped_rows: usize,
}

impl MappedTable {
    /// Appends another family's output to this one.
    pub fn merge(&mut self, other: MappedTable) {
        self.triples.extend(other.triples);
        self.inactive.extend(other.inactive);
        self.dropped += other.dropped;
        self.skipped_rows += other.skipped_rows;
    }
}

/// Converts table rows into statements.
#[derive(Debug, Clone, Copy)]
pub struct Mapper<'a> {
    namespaces: &'a NamespaceRegistry,
    ontology_prefix: &'a str,
    extension_prefix: &'a str,
}

impl<'a> Mapper<'a> {
    /// Creates a mapper resolving classes in `ontology_prefix` and honoring
    /// `{extension_prefix}:` markers on classes and reference tokens.
    #[must_use]
    pub fn new(
        namespaces: &'a NamespaceRegistry,
        ontology_prefix: &'a str,
        extension_prefix: &'a str,
    ) -> Self {
        Self {
            namespaces,
            ontology_prefix,
            extension_prefix,
        }
    }

    /// Maps every row of `table` with `schema`.
    ///
    /// A table without the schema's column group yields no statements.
    ///
    /// # Errors
    ///
    /// Returns [`GraphError::MissingRequiredColumn`] if the table lacks the
    /// identifier or class column; no statements are produced in that case.
    pub fn map_table(&self, table: &Table, schema: &RelationshipSchema) -> Result<MappedTable> {
        schema::require_columns(table)?;

        let mut out = MappedTable::default();
        if !table.has_group(&schema.group) {
            debug!(
                table = %table.name,
                group = %schema.group,
                "Table has no columns for relationship group; skipping"
            );
            return Ok(out);
        }

        let columns = table.columns_in(&schema.group);
        let validation = schema::validate(&columns, &schema.defs);
        out.inactive = validation.inactive.iter().map(|s| s.to_string()).collect();

        debug!(table = %table.name, group = %schema.group, "Processing relationships");
        for row in table.rows() {
            self.map_row(&row, &schema.group, &validation.active, &mut out);
        }
        Ok(out)
    }

    /// Maps a single row, appending to `out`.
    pub fn map_row(
        &self,
        row: &Row<'_>,
        group: &str,
        defs: &[&RelationshipDef],
        out: &mut MappedTable,
    ) {
        let Some(class) = row.get(schema::PRIMARY_GROUP, CLASS).map(str::trim) else {
            out.skipped_rows += 1;
            return;
        };
        let Some(identifier) = row.get(schema::PRIMARY_GROUP, IDENTIFIER).map(str::trim) else {
            warn!(class, "Row has a class but no identifier; skipping");
            out.skipped_rows += 1;
            return;
        };

        let subject = match self.subject(identifier) {
            Ok(subject) => subject,
            Err(e) => {
                warn!(identifier, error = %e, "Cannot build subject; skipping row");
                out.skipped_rows += 1;
                return;
            }
        };
        match self.class_iri(class) {
            Ok(class_iri) => out.triples.push(Triple::new(
                subject.clone(),
                Iri::new(iris::RDF_TYPE),
                class_iri,
            )),
            Err(e) => {
                warn!(identifier, class, error = %e, "Cannot resolve class; skipping row");
                out.skipped_rows += 1;
                return;
            }
        }

        for def in defs {
            let Some(cell) = row.get(group, &def.name) else {
                continue;
            };
            let tokens = cell.split(VALUE_SEPARATOR).map(str::trim);
            let predicate = match self.namespaces.individual(&def.namespace, &def.name) {
                Ok(predicate) => predicate,
                Err(e) => {
                    let count = tokens.count();
                    warn!(
                        relationship = %def.name,
                        dropped = count,
                        error = %e,
                        "Dropping relationship values"
                    );
                    out.dropped += count;
                    continue;
                }
            };
            for token in tokens {
                match self.object(def, token) {
                    Ok(object) => {
                        out.triples
                            .push(Triple::new(subject.clone(), predicate.clone(), object));
                    }
                    Err(e) => {
                        warn!(identifier, relationship = %def.name, error = %e, "Skipping value");
                        out.dropped += 1;
                    }
                }
            }
        }
    }

    fn subject(&self, identifier: &str) -> Result<Iri> {
        self.namespaces.individual(BUILDING, &sanitize(identifier))
    }

    fn class_iri(&self, class: &str) -> Result<Iri> {
        let (prefix, local) = match self.strip_marker(class) {
            Some(local) => (self.extension_prefix, local),
            None => (self.ontology_prefix, class),
        };
        if local.is_empty() {
            return Err(GraphError::UnresolvedReference {
                relationship: CLASS.to_string(),
                token: class.to_string(),
            });
        }
        self.namespaces.individual(prefix, &sanitize(local))
    }

    fn object(&self, def: &RelationshipDef, token: &str) -> Result<Term> {
        let unresolved = || GraphError::UnresolvedReference {
            relationship: def.name.clone(),
            token: token.to_string(),
        };
        let Some(target) = def.target_prefix(self.ontology_prefix) else {
            return Ok(Term::literal(token));
        };
        debug_assert!(def.kind != ValueKind::Literal);
        if token.is_empty() {
            return Err(unresolved());
        }
        let (prefix, local) = match self.strip_marker(token) {
            Some(local) => (self.extension_prefix, local),
            None => (target, token),
        };
        if local.is_empty() {
            return Err(unresolved());
        }
        Ok(self.namespaces.individual(prefix, &sanitize(local))?.into())
    }

    fn strip_marker<'t>(&self, value: &'t str) -> Option<&'t str> {
        value
            .strip_prefix(self.extension_prefix)?
            .strip_prefix(':')
            .map(str::trim)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::{BRICK, SWITCH};
    use crate::table::Column;

    fn registry() -> NamespaceRegistry {
        let mut registry = NamespaceRegistry::with_defaults();
        registry.register_building("acme", "hq");
        registry
    }

    fn table(columns: &[(&str, &str)], rows: &[&[Option<&str>]]) -> Table {
        Table::new(
            "equipment",
            columns.iter().map(|(g, n)| Column::new(*g, *n)).collect(),
            rows.iter()
                .map(|row| row.iter().map(|c| c.map(str::to_string)).collect())
                .collect(),
        )
    }

    fn iri(s: &str) -> Iri {
        Iri::new(s)
    }

    #[test]
    fn maps_location_with_label() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[("Brick", "identifier"), ("Brick", "class"), ("Brick", "label")],
            &[&[Some("Room 101"), Some("Location"), Some("Room 101 West")]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::brick()).unwrap();
        assert_eq!(
            mapped.triples,
            vec![
                Triple::new(
                    iri("https://acme.com/hq#Room_101"),
                    iri(iris::RDF_TYPE),
                    iri("https://brickschema.org/schema/Brick#Location"),
                ),
                Triple::new(
                    iri("https://acme.com/hq#Room_101"),
                    iri(iris::RDFS_LABEL),
                    Term::literal("Room 101 West"),
                ),
            ]
        );
    }

    #[test]
    fn row_without_class_emits_nothing() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[("Brick", "identifier"), ("Brick", "class"), ("Brick", "feeds")],
            &[
                &[Some("AHU-1"), None, Some("VAV-1")],
                &[Some("AHU-2"), Some(""), Some("VAV-2")],
            ],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::brick()).unwrap();
        assert!(mapped.triples.is_empty());
        assert_eq!(mapped.skipped_rows, 2);
    }

    #[test]
    fn pipe_delimited_references_resolve_in_building() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[("Brick", "identifier"), ("Brick", "class"), ("Brick", "hasPart")],
            &[&[Some("AHU System"), Some("HVAC_System"), Some("AHU-1 | AHU-2")]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::brick()).unwrap();
        let objects: Vec<&str> = mapped
            .triples
            .iter()
            .filter(|t| t.predicate.as_str().ends_with("#hasPart"))
            .filter_map(|t| t.object.as_iri().map(Iri::as_str))
            .collect();
        assert_eq!(objects, vec!["https://acme.com/hq#AHU-1", "https://acme.com/hq#AHU-2"]);
    }

    #[test]
    fn extension_marker_overrides_namespaces() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[
                ("Brick", "identifier"),
                ("Brick", "class"),
                ("Brick", "hasInputSubstance"),
            ],
            &[&[
                Some("Chiller 1"),
                Some("switch:Magnetic Chiller"),
                Some("Chilled_Water | switch:Glycol Mix"),
            ]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::brick()).unwrap();
        let objects: Vec<&str> = mapped
            .triples
            .iter()
            .filter_map(|t| t.object.as_iri().map(Iri::as_str))
            .collect();
        assert_eq!(
            objects,
            vec![
                "https://switchautomation.com/schemas/BrickExtension#Magnetic_Chiller",
                "https://brickschema.org/schema/Brick#Chilled_Water",
                "https://switchautomation.com/schemas/BrickExtension#Glycol_Mix",
            ]
        );
    }

    #[test]
    fn empty_tokens_are_dropped() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[("Brick", "identifier"), ("Brick", "class"), ("Brick", "feeds")],
            &[&[Some("AHU-1"), Some("AHU"), Some("VAV-1||switch:")]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::brick()).unwrap();
        assert_eq!(mapped.triples.len(), 2);
        assert_eq!(mapped.dropped, 2);
    }

    #[test]
    fn empty_literal_tokens_are_kept() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[("Brick", "identifier"), ("Brick", "class"), ("Brick", "label")],
            &[&[Some("AHU-1"), Some("AHU"), Some("A||B")]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::brick()).unwrap();
        let labels: Vec<&Term> = mapped
            .triples
            .iter()
            .filter(|t| t.predicate.as_str() == iris::RDFS_LABEL)
            .map(|t| &t.object)
            .collect();
        assert_eq!(
            labels,
            vec![&Term::literal("A"), &Term::literal(""), &Term::literal("B")]
        );
        assert_eq!(mapped.dropped, 0);
    }

    #[test]
    fn class_and_identifier_cells_are_trimmed() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[("Brick", "identifier"), ("Brick", "class")],
            &[&[Some("Room 101 "), Some(" switch:Smart VAV ")]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::brick()).unwrap();
        assert_eq!(
            mapped.triples,
            vec![Triple::new(
                iri("https://acme.com/hq#Room_101"),
                iri(iris::RDF_TYPE),
                iri("https://switchautomation.com/schemas/BrickExtension#Smart_VAV"),
            )]
        );
    }

    #[test]
    fn unbound_predicate_namespace_drops_values() {
        let mut registry = NamespaceRegistry::new();
        registry.bind(BRICK, iris::BRICK);
        registry.register_building("acme", "hq");
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[
                ("Brick", "identifier"),
                ("Brick", "class"),
                ("Switch", "hasObjectPropertyId"),
            ],
            &[&[Some("AHU-1"), Some("AHU"), Some("17|18")]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::switch()).unwrap();
        assert_eq!(mapped.triples.len(), 1);
        assert_eq!(mapped.dropped, 2);
    }

    #[test]
    fn missing_class_column_fails_the_table() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(&[("Brick", "identifier")], &[&[Some("AHU-1")]]);
        assert!(matches!(
            mapper.map_table(&t, &RelationshipSchema::brick()),
            Err(GraphError::MissingRequiredColumn { .. })
        ));
    }

    #[test]
    fn absent_group_contributes_nothing() {
        let registry = registry();
        let mapper = Mapper::new(&registry, BRICK, SWITCH);
        let t = table(
            &[("Brick", "identifier"), ("Brick", "class")],
            &[&[Some("AHU-1"), Some("AHU")]],
        );
        let mapped = mapper.map_table(&t, &RelationshipSchema::tags()).unwrap();
        assert_eq!(mapped, MappedTable::default());
    }
}
