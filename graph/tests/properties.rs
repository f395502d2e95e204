//! Property tests for mapping and inference.

use brick_graph::iris::BRICK;
use brick_graph::schema::RelationshipSchema;
use brick_graph::table::Column;
use brick_graph::{
    infer_inverses, GraphStore, InverseTable, Iri, Mapper, NamespaceRegistry, Table, Triple,
};
use proptest::prelude::*;

const B: &str = "https://acme.com/hq#";

fn brick(local: &str) -> Iri {
    Iri::new(format!("{BRICK}{local}"))
}

fn token() -> impl Strategy<Value = String> {
    "[A-Za-z][A-Za-z0-9_-]{0,8}"
}

proptest! {
    #[test]
    fn n_tokens_yield_n_statements(
        tokens in prop::collection::vec(token(), 1..8),
        spaced in any::<bool>(),
    ) {
        let mut registry = NamespaceRegistry::with_defaults();
        registry.register_building("acme", "hq");
        let mapper = Mapper::new(&registry, "brick", "switch");
        let cell = tokens.join(if spaced { " | " } else { "|" });
        let table = Table::new(
            "equipment",
            vec![
                Column::new("Brick", "identifier"),
                Column::new("Brick", "class"),
                Column::new("Brick", "feeds"),
            ],
            vec![vec![Some("AHU-1".to_string()), Some("AHU".to_string()), Some(cell)]],
        );

        let mapped = mapper.map_table(&table, &RelationshipSchema::brick()).unwrap();
        let feeds = brick("feeds");
        let objects: Vec<String> = mapped
            .triples
            .iter()
            .filter(|t| t.predicate == feeds)
            .filter_map(|t| t.object.as_iri().map(|i| i.as_str().to_string()))
            .collect();
        let expected: Vec<String> = tokens.iter().map(|t| format!("{B}{t}")).collect();
        prop_assert_eq!(objects, expected);
        prop_assert_eq!(mapped.dropped, 0);
    }

    #[test]
    fn inference_is_idempotent(
        edges in prop::collection::vec((0usize..6, 0usize..3, 0usize..6), 0..40),
    ) {
        let predicates = [brick("feeds"), brick("isFedBy"), brick("hasPart")];
        let mut inverses = InverseTable::new();
        inverses.declare_pair(brick("feeds"), brick("isFedBy"));
        inverses.declare_pair(brick("hasPart"), brick("isPartOf"));

        let node = |i: usize| Iri::new(format!("{B}n{i}"));
        let mut store: GraphStore = edges
            .iter()
            .map(|&(s, p, o)| Triple::new(node(s), predicates[p].clone(), node(o)))
            .collect();

        infer_inverses(&mut store, &inverses);
        let after_first = store.len();
        prop_assert_eq!(infer_inverses(&mut store, &inverses), 0);
        prop_assert_eq!(store.len(), after_first);

        for t in store.iter() {
            for inverse in inverses.inverses_of(&t.predicate) {
                let object = t.object.as_iri().unwrap().clone();
                let flipped = Triple::new(object, inverse.clone(), t.subject.clone());
                prop_assert!(store.contains(&flipped));
            }
        }
    }
}
