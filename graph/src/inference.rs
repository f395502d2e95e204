//! Inverse-relationship inference (OWL 2 RL `prp-inv`).
//!
//! `P(x, y)` and `inverseOf(P, Q)` give `Q(y, x)`. Derivations are inserted
//! with set semantics and the rule is applied until nothing new appears, so a
//! second call over the same store always derives nothing.

use std::collections::HashMap;

use tracing::debug;

use crate::store::GraphStore;
use crate::term::{Iri, Triple};

/// Declared inverse-property pairs, supplied by the ontology.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InverseTable {
    inverses: HashMap<Iri, Vec<Iri>>,
}

impl InverseTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares `inverse` as an inverse of `property` (one direction only).
    pub fn declare(&mut self, property: Iri, inverse: Iri) {
        let entry = self.inverses.entry(property).or_default();
        if !entry.contains(&inverse) {
            entry.push(inverse);
        }
    }

    /// Declares `a` and `b` as inverses of each other.
    pub fn declare_pair(&mut self, a: Iri, b: Iri) {
        self.declare(a.clone(), b.clone());
        self.declare(b, a);
    }

    /// Returns the inverses declared for `property`.
    #[must_use]
    pub fn inverses_of(&self, property: &Iri) -> &[Iri] {
        self.inverses.get(property).map_or(&[], Vec::as_slice)
    }

    /// Number of properties with at least one inverse.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inverses.len()
    }

    /// Returns true if no inverses are declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inverses.is_empty()
    }
}

/// Inserts the inverse of every statement whose predicate has a declared
/// inverse. Returns the number of new statements.
///
/// Statements with literal objects have no inverse.
pub fn infer_inverses(store: &mut GraphStore, table: &InverseTable) -> usize {
    if table.is_empty() {
        return 0;
    }
    let mut total = 0;
    loop {
        let derived: Vec<Triple> = store
            .iter()
            .filter_map(|t| t.object.as_iri().map(|o| (t, o)))
            .flat_map(|(t, o)| {
                table
                    .inverses_of(&t.predicate)
                    .iter()
                    .map(move |inv| Triple::new(o.clone(), inv.clone(), t.subject.clone()))
            })
            .filter(|t| !store.contains(t))
            .collect();
        let inserted = store.insert_all(derived);
        debug!(inserted, "Inverse rule pass");
        if inserted == 0 {
            return total;
        }
        total += inserted;
    }
}
