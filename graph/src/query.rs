//! Subgraph extraction.
//!
//! Two fixed traversals replace a general query language: a namespace scan
//! over subjects, and a scan that also filters by the class hierarchy.

use std::collections::{HashMap, HashSet};

use crate::hierarchy::ClassHierarchy;
use crate::store::GraphStore;
use crate::term::{Iri, Triple};

/// Root classes a typed scan keeps and excludes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypedSubset {
    /// Subjects must have a type under one of these roots.
    pub allowed: HashSet<Iri>,
    /// Statements whose object has a type under one of these roots are
    /// removed.
    pub excluded: HashSet<Iri>,
}

impl TypedSubset {
    /// Equipment, locations and systems without their points, with every
    /// class under the `ontology` stem.
    #[must_use]
    pub fn equipment_locations_systems(ontology: &str) -> Self {
        let class = |local: &str| Iri::new(format!("{ontology}{local}"));
        Self {
            allowed: ["Equipment", "Location", "System"]
                .into_iter()
                .map(class)
                .collect(),
            excluded: std::iter::once(class("Point")).collect(),
        }
    }
}

/// Returns every statement whose subject lies under the `stem` namespace.
#[must_use]
pub fn namespace_scan<'s>(store: &'s GraphStore, stem: &str) -> Vec<&'s Triple> {
    store.iter().filter(|t| t.subject.in_namespace(stem)).collect()
}

/// Returns the statements of [`namespace_scan`] whose subject is typed under
/// an allowed root and whose object is not typed under an excluded root.
#[must_use]
pub fn typed_subset_scan<'s>(
    store: &'s GraphStore,
    stem: &str,
    hierarchy: &ClassHierarchy,
    subset: &TypedSubset,
) -> Vec<&'s Triple> {
    let types = store.type_index();
    let mut allowed = Membership::new(hierarchy, &subset.allowed);
    let mut excluded = Membership::new(hierarchy, &subset.excluded);

    store
        .iter()
        .filter(|t| t.subject.in_namespace(stem))
        .filter(|t| {
            types
                .get(&t.subject)
                .is_some_and(|classes| classes.iter().any(|c| allowed.test(c)))
        })
        .filter(|t| {
            let Some(object) = t.object.as_iri() else {
                return true;
            };
            !types
                .get(object)
                .is_some_and(|classes| classes.iter().any(|c| excluded.test(c)))
        })
        .collect()
}

/// Memoized root-set membership.
struct Membership<'a> {
    hierarchy: &'a ClassHierarchy,
    roots: &'a HashSet<Iri>,
    cache: HashMap<Iri, bool>,
}

impl<'a> Membership<'a> {
    fn new(hierarchy: &'a ClassHierarchy, roots: &'a HashSet<Iri>) -> Self {
        Self {
            hierarchy,
            roots,
            cache: HashMap::new(),
        }
    }

    fn test(&mut self, class: &Iri) -> bool {
        if let Some(&member) = self.cache.get(class) {
            return member;
        }
        let member = self.hierarchy.is_member(class, self.roots);
        self.cache.insert(class.clone(), member);
        member
    }
}
