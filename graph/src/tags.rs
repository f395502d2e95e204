//! Extension tag processing.
//!
//! Tags are a small, cross-cutting relationship vocabulary layered over the
//! primary ontology. They are mapped with the same rules as any other
//! relationship family and merged into the same store.

use tracing::info;

use crate::error::Result;
use crate::mapper::{MappedTable, Mapper};
use crate::schema::RelationshipSchema;
use crate::store::GraphStore;
use crate::table::Table;

/// Applies the tag schema to tables.
#[derive(Debug, Clone)]
pub struct TagProcessor<'a> {
    mapper: Mapper<'a>,
    schema: RelationshipSchema,
}

impl<'a> TagProcessor<'a> {
    /// Creates a processor mapping `schema` with `mapper`.
    #[must_use]
    pub fn new(mapper: Mapper<'a>, schema: RelationshipSchema) -> Self {
        Self { mapper, schema }
    }

    /// Maps the tag columns of `table` without touching any store.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GraphError::MissingRequiredColumn`] if the table lacks
    /// the identifier or class column.
    pub fn process(&self, table: &Table) -> Result<MappedTable> {
        self.mapper.map_table(table, &self.schema)
    }

    /// Maps the tag columns of `table` and inserts the result into `store`,
    /// returning the number of new statements.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GraphError::MissingRequiredColumn`] if the table lacks
    /// the identifier or class column.
    pub fn apply(&self, table: &Table, store: &mut GraphStore) -> Result<usize> {
        let mapped = self.process(table)?;
        let inserted = store.insert_all(mapped.triples);
        info!(table = %table.name, inserted, "Tags processed");
        Ok(inserted)
    }
}
