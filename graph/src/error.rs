//! Error types for the model builder.

use std::path::PathBuf;

/// Errors raised while building, querying or exporting a Brick model.
///
/// Apart from [`GraphError::InputNotFound`] on the primary input, none of
/// these abort a run: callers log them and continue with partial output.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    /// A table or ontology file does not exist.
    #[error("File not found at specified path: {0}")]
    InputNotFound(PathBuf),

    /// A table lacks a column every table must carry.
    #[error("Table '{table}' has no '{column}' column")]
    MissingRequiredColumn {
        /// Table name.
        table: String,
        /// The absent column, as `group/column`.
        column: String,
    },

    /// A relationship token could not be turned into an individual.
    #[error("Unresolved reference '{token}' for relationship '{relationship}'")]
    UnresolvedReference {
        /// Relationship (column) name.
        relationship: String,
        /// The offending token, after trimming.
        token: String,
    },

    /// A namespace prefix is not bound in the registry.
    #[error("Unknown namespace prefix: {0}")]
    UnknownNamespace(String),

    /// An export mode string that is not one of the supported modes.
    #[error("Provided export mode: {0} is not supported")]
    UnsupportedExportMode(String),

    /// A file system operation failed.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// The file or directory involved.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The table document is not valid JSON for the table schema.
    #[error("Invalid table document: {0}")]
    Json(#[from] serde_json::Error),

    /// The run configuration is not valid TOML for the config schema.
    #[error("Invalid configuration: {0}")]
    Config(#[from] toml::de::Error),
}

impl GraphError {
    /// Wraps an I/O error with the path it occurred on.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result type for model builder operations.
pub type Result<T> = std::result::Result<T, GraphError>;
