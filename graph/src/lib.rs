//! Brick model builder.
//!
//! Converts tabular building-equipment descriptions (locations, equipment,
//! points) into Brick statements, derives inverse relationships declared by
//! the ontology, and exports selectable subgraphs as Turtle.
//!
//! # Entry Point
//!
//! ```
//! use brick_graph::{
//!     BuildingId, ClassHierarchy, InverseTable, NamespaceRegistry, Pipeline, RunContext, TableSet,
//! };
//!
//! let tables = TableSet::from_json_str(
//!     r#"{"locations": {"columns": [["Brick", "identifier"], ["Brick", "class"]],
//!                       "rows": [["Room 101", "Location"]]}}"#,
//! )?;
//! let mut context = RunContext::new(
//!     BuildingId::new("acme", "hq"),
//!     NamespaceRegistry::with_defaults(),
//!     ClassHierarchy::new(),
//!     InverseTable::new(),
//! );
//! let summary = Pipeline::default().process(&mut context, &tables);
//! assert_eq!(summary.total, 1);
//! # Ok::<(), brick_graph::GraphError>(())
//! ```
//!
//! # Export
//!
//! [`export::export`] writes one of the [`ExportMode`] subgraphs to a
//! timestamped `.ttl` file; [`serializer::turtle::to_turtle`] produces the
//! document in memory.

#![deny(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    missing_docs,
    clippy::missing_errors_doc
)]

pub mod config;
pub mod context;
pub mod error;
pub mod export;
pub mod hierarchy;
pub mod inference;
pub mod iris;
pub mod mapper;
pub mod namespace;
pub mod pipeline;
pub mod query;
pub mod schema;
pub mod serializer;
pub mod store;
pub mod table;
pub mod tags;
pub mod term;

pub use config::RunConfig;
pub use context::{BuildingId, RunContext};
pub use error::{GraphError, Result};
pub use export::ExportMode;
pub use hierarchy::ClassHierarchy;
pub use inference::{infer_inverses, InverseTable};
pub use mapper::{MappedTable, Mapper};
pub use namespace::NamespaceRegistry;
pub use pipeline::{Pipeline, ProcessSummary, TableSummary};
pub use query::{namespace_scan, typed_subset_scan, TypedSubset};
pub use schema::{RelationshipDef, RelationshipSchema, SchemaSet, ValueKind};
pub use store::GraphStore;
pub use table::{Column, Row, Table, TableSet};
pub use tags::TagProcessor;
pub use term::{Iri, Term, Triple};
