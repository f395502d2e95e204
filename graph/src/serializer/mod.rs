//! Serializers for exported models.
//!
//! - **Turtle** ([`turtle`]): the export format, with bound prefixes and
//!   statements grouped by subject.

pub mod turtle;
