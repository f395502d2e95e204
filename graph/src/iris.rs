//! Standard IRI constants used across the builder.

/// OWL namespace.
pub const OWL: &str = "http://www.w3.org/2002/07/owl#";
/// RDF namespace.
pub const RDF: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";
/// RDFS namespace.
pub const RDFS: &str = "http://www.w3.org/2000/01/rdf-schema#";
/// XSD namespace.
pub const XSD: &str = "http://www.w3.org/2001/XMLSchema#";

/// Brick 1.x schema namespace.
pub const BRICK: &str = "https://brickschema.org/schema/Brick#";
/// Switch extension namespace.
pub const SWITCH: &str = "https://switchautomation.com/schemas/BrickExtension#";
/// Temporary namespace holding the metadata items used by tags.
pub const META: &str = "https://meta.com#";

/// `rdf:type`.
pub const RDF_TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";
/// `rdfs:label`.
pub const RDFS_LABEL: &str = "http://www.w3.org/2000/01/rdf-schema#label";
/// `rdfs:subClassOf`.
pub const RDFS_SUBCLASS_OF: &str = "http://www.w3.org/2000/01/rdf-schema#subClassOf";
/// `owl:inverseOf`.
pub const OWL_INVERSE_OF: &str = "http://www.w3.org/2002/07/owl#inverseOf";
