//! Class hierarchy and transitive membership tests.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::term::Iri;

/// `rdfs:subClassOf` edges, supplied by the ontology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClassHierarchy {
    supers: HashMap<Iri, Vec<Iri>>,
}

impl ClassHierarchy {
    /// Creates an empty hierarchy.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that `class` is a subclass of `superclass`.
    pub fn add_edge(&mut self, class: Iri, superclass: Iri) {
        let entry = self.supers.entry(class).or_default();
        if !entry.contains(&superclass) {
            entry.push(superclass);
        }
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.supers.values().map(Vec::len).sum()
    }

    /// Returns the direct superclasses of `class`.
    #[must_use]
    pub fn direct_superclasses(&self, class: &Iri) -> &[Iri] {
        self.supers.get(class).map_or(&[], Vec::as_slice)
    }

    /// Returns true if `class` is in `roots` or a superclass chain from it
    /// reaches one of them.
    #[must_use]
    pub fn is_member(&self, class: &Iri, roots: &HashSet<Iri>) -> bool {
        let mut visited: HashSet<&Iri> = HashSet::new();
        let mut queue: VecDeque<&Iri> = VecDeque::from([class]);
        while let Some(current) = queue.pop_front() {
            if roots.contains(current) {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            queue.extend(self.direct_superclasses(current));
        }
        false
    }
}
