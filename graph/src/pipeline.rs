//! The processing pipeline.
//!
//! Tables are mapped independently and in parallel; the resulting statement
//! lists are inserted by a single writer, tags are merged in, and inference
//! runs once all insertion is done.

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::context::RunContext;
use crate::error::Result;
use crate::inference::infer_inverses;
use crate::mapper::{MappedTable, Mapper};
use crate::schema::SchemaSet;
use crate::table::{Table, TableSet};
use crate::tags::TagProcessor;

/// What processing did to one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TableSummary {
    /// Table name.
    pub table: String,
    /// Statements mapped from the primary and extension families.
    pub mapped: usize,
    /// Statements (including tags) that were new to the store.
    pub inserted: usize,
    /// Relationships inactive for this table.
    pub inactive: Vec<String>,
    /// Tokens dropped during mapping.
    pub dropped: usize,
    /// Rows skipped for lack of a class or identifier.
    pub skipped_rows: usize,
    /// Why the table contributed nothing, if it failed.
    pub error: Option<String>,
}

/// What a processing run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessSummary {
    /// One entry per table, in processing order.
    pub tables: Vec<TableSummary>,
    /// Statements derived by inference.
    pub inferred: usize,
    /// Store size after inference.
    pub total: usize,
}

/// Maps tables into a run context's store.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    schemas: SchemaSet,
}

impl Pipeline {
    /// Creates a pipeline applying `schemas`.
    #[must_use]
    pub fn new(schemas: SchemaSet) -> Self {
        Self { schemas }
    }

    /// Maps `table` with the primary and extension families.
    ///
    /// # Errors
    ///
    /// Returns [`crate::GraphError::MissingRequiredColumn`] if the table lacks
    /// the identifier or class column.
    pub fn map_table(&self, mapper: Mapper<'_>, table: &Table) -> Result<MappedTable> {
        let mut mapped = mapper.map_table(table, &self.schemas.brick)?;
        mapped.merge(mapper.map_table(table, &self.schemas.switch)?);
        Ok(mapped)
    }

    /// Populates `context.store` from `tables` and runs inference.
    ///
    /// A table that fails is logged and skipped; the others still contribute.
    pub fn process(&self, context: &mut RunContext, tables: &TableSet) -> ProcessSummary {
        info!("Processing building model data");
        let mapper = Mapper::new(
            &context.namespaces,
            &context.ontology_prefix,
            &context.extension_prefix,
        );

        let inputs: Vec<(&str, &Table)> = tables.iter().collect();
        let mapped: Vec<Option<Result<MappedTable>>> = inputs
            .par_iter()
            .map(|(name, table)| {
                if table.is_empty() {
                    debug!(table = name, "Table has no rows");
                    return None;
                }
                info!(table = name, "Processing table");
                Some(self.map_table(mapper, table))
            })
            .collect();

        let tags = TagProcessor::new(mapper, self.schemas.tags.clone());
        let mut summary = ProcessSummary::default();
        for ((name, table), result) in inputs.into_iter().zip(mapped) {
            let mut entry = TableSummary {
                table: name.to_string(),
                ..TableSummary::default()
            };
            match result {
                None => {}
                Some(Err(e)) => {
                    warn!(table = name, error = %e, "Table contributes no statements");
                    entry.error = Some(e.to_string());
                }
                Some(Ok(m)) => {
                    entry.mapped = m.triples.len();
                    entry.inactive = m.inactive;
                    entry.dropped = m.dropped;
                    entry.skipped_rows = m.skipped_rows;
                    entry.inserted = context.store.insert_all(m.triples);
                    match tags.apply(table, &mut context.store) {
                        Ok(n) => entry.inserted += n,
                        Err(e) => warn!(table = name, error = %e, "Tags not processed"),
                    }
                    info!(
                        table = name,
                        mapped = entry.mapped,
                        inserted = entry.inserted,
                        "Entities added to model"
                    );
                }
            }
            summary.tables.push(entry);
        }

        info!("Generating inverse relationships");
        summary.inferred = infer_inverses(&mut context.store, &context.inverses);
        summary.total = context.store.len();
        info!(
            inferred = summary.inferred,
            total = summary.total,
            "Processing complete"
        );
        summary
    }
}
