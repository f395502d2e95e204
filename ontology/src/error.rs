//! Ontology loading errors.

use std::path::PathBuf;

/// Failures raised while loading an ontology file.
#[derive(Debug, thiserror::Error)]
pub enum OntologyError {
    /// The file does not exist.
    #[error("ontology file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The file extension names no supported serialization.
    #[error("unsupported ontology format: {}", .0.display())]
    UnsupportedFormat(PathBuf),

    /// The document is not valid RDF.
    #[error("failed to parse {}: {message}", path.display())]
    Parse {
        /// File (or label) of the document.
        path: PathBuf,
        /// Parser message.
        message: String,
    },

    /// The file could not be read.
    #[error("failed to read {}", path.display())]
    Io {
        /// File being read.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },
}

/// Result alias for ontology loading.
pub type Result<T> = std::result::Result<T, OntologyError>;
