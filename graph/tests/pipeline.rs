//! End-to-end tests: tables in, statements and Turtle files out.

use std::collections::HashSet;

use brick_graph::export::{self, ExportMode};
use brick_graph::iris::{BRICK, RDFS_LABEL, RDF_TYPE};
use brick_graph::{
    BuildingId, ClassHierarchy, InverseTable, Iri, NamespaceRegistry, Pipeline, RunContext,
    TableSet, Term, Triple,
};
use chrono::NaiveDate;
use sophia_api::source::TripleSource;
use sophia_api::term::Term as _;
use sophia_api::triple::Triple as _;
use sophia_turtle::parser::turtle;

const TABLES: &str = r#"{
  "locations": {
    "columns": [["Brick", "identifier"], ["Brick", "class"], ["Brick", "label"], ["Brick", "isPartOf"]],
    "rows": [
      ["Level 1", "Floor", "Level 1", null],
      ["Room 101", "Location", "Room 101 West", "Level 1"],
      ["Plant Room", "Room", "", "Level 1"],
      ["Unused", null, "ignored", "Level 1"]
    ]
  },
  "equipment": {
    "columns": [
      ["Brick", "identifier"], ["Brick", "class"], ["Brick", "feeds"], ["Brick", "hasPart"],
      ["Brick", "hasLocation"], ["Switch", "hasObjectPropertyId"], ["Tags", "hasTag"]
    ],
    "rows": [
      ["AHU System", "HVAC_System", null, "AHU-1 | AHU-2", null, null, null],
      ["AHU-1", "AHU", "VAV-1|VAV-2", null, "Plant Room", "0", "Critical"],
      ["AHU-2", "AHU", null, null, "Plant Room", null, null],
      ["VAV-1", "VAV", "Room 101", null, null, null, null],
      ["VAV-2", "switch:Smart VAV", null, null, null, null, null]
    ]
  },
  "points": {
    "columns": [["Brick", "identifier"], ["Brick", "class"], ["Brick", "isPointOf"], ["Brick", "hasUnit"]],
    "rows": [
      ["AHU-1 SAT", "Supply_Air_Temperature_Sensor", "AHU-1", "DEG_C"],
      ["VAV-1 Damper", "Damper_Position_Command", "VAV-1", "PERCENT"]
    ]
  }
}"#;

fn b(local: &str) -> Iri {
    Iri::new(format!("https://acme.com/hq#{local}"))
}

fn brick(local: &str) -> Iri {
    Iri::new(format!("{BRICK}{local}"))
}

fn hierarchy() -> ClassHierarchy {
    let mut h = ClassHierarchy::new();
    for (class, superclass) in [
        ("Floor", "Location"),
        ("Room", "Space"),
        ("Space", "Location"),
        ("AHU", "HVAC_Equipment"),
        ("VAV", "Terminal_Unit"),
        ("Terminal_Unit", "HVAC_Equipment"),
        ("HVAC_Equipment", "Equipment"),
        ("HVAC_System", "System"),
        ("Supply_Air_Temperature_Sensor", "Temperature_Sensor"),
        ("Temperature_Sensor", "Sensor"),
        ("Sensor", "Point"),
        ("Damper_Position_Command", "Command"),
        ("Command", "Point"),
    ] {
        h.add_edge(brick(class), brick(superclass));
    }
    h
}

fn inverses() -> InverseTable {
    let mut table = InverseTable::new();
    for (p, q) in [
        ("feeds", "isFedBy"),
        ("hasPart", "isPartOf"),
        ("hasLocation", "isLocationOf"),
        ("hasPoint", "isPointOf"),
    ] {
        table.declare_pair(brick(p), brick(q));
    }
    table
}

fn processed() -> RunContext {
    let tables = TableSet::from_json_str(TABLES).unwrap();
    let mut context = RunContext::new(
        BuildingId::new("acme", "hq"),
        NamespaceRegistry::with_defaults(),
        hierarchy(),
        inverses(),
    );
    Pipeline::default().process(&mut context, &tables);
    context
}

#[test]
fn location_row_produces_type_and_label() {
    let context = processed();
    assert!(context
        .store
        .contains(&Triple::new(b("Room_101"), Iri::new(RDF_TYPE), brick("Location"))));
    assert!(context.store.contains(&Triple::new(
        b("Room_101"),
        Iri::new(RDFS_LABEL),
        Term::literal("Room 101 West")
    )));
}

#[test]
fn rows_without_class_produce_nothing() {
    let context = processed();
    assert_eq!(context.store.matching(Some(&b("Unused")), None, None).count(), 0);
    let ignored = Term::literal("ignored");
    assert_eq!(context.store.matching(None, None, Some(&ignored)).count(), 0);
}

#[test]
fn zero_is_kept_as_a_literal() {
    let context = processed();
    let predicate = Iri::new(format!("{}hasObjectPropertyId", brick_graph::iris::SWITCH));
    let zero = Term::literal("0");
    assert_eq!(
        context
            .store
            .matching(Some(&b("AHU-1")), Some(&predicate), Some(&zero))
            .count(),
        1
    );
}

#[test]
fn multi_valued_references_and_extension_classes() {
    let context = processed();
    let has_part = brick("hasPart");
    let parts: Vec<&Term> = context
        .store
        .matching(Some(&b("AHU_System")), Some(&has_part), None)
        .map(|t| &t.object)
        .collect();
    assert_eq!(parts, vec![&Term::Iri(b("AHU-1")), &Term::Iri(b("AHU-2"))]);

    let smart_vav = Iri::new(format!("{}Smart_VAV", brick_graph::iris::SWITCH));
    assert!(context
        .store
        .contains(&Triple::new(b("VAV-2"), Iri::new(RDF_TYPE), smart_vav)));
}

#[test]
fn inverses_are_derived_once() {
    let mut context = processed();
    assert!(context
        .store
        .contains(&Triple::new(b("VAV-1"), brick("isFedBy"), b("AHU-1"))));
    assert!(context
        .store
        .contains(&Triple::new(b("Level_1"), brick("hasPart"), b("Room_101"))));
    assert!(context
        .store
        .contains(&Triple::new(b("AHU-1"), brick("hasPoint"), b("AHU-1_SAT"))));

    let before = context.store.len();
    assert_eq!(
        brick_graph::infer_inverses(&mut context.store, &context.inverses),
        0
    );
    assert_eq!(context.store.len(), before);
}

#[test]
fn tags_land_in_the_metadata_namespace() {
    let context = processed();
    let has_tag = Iri::new(format!("{}hasTag", brick_graph::iris::SWITCH));
    let critical = Term::Iri(Iri::new("https://meta.com#Critical"));
    assert!(context
        .store
        .contains(&Triple::new(b("AHU-1"), has_tag, critical)));
}

#[test]
fn building_export_is_a_subset_of_full() {
    let context = processed();
    let full: HashSet<&Triple> = export::select(&context, ExportMode::Full).into_iter().collect();
    let building = export::select(&context, ExportMode::Building);
    assert!(!building.is_empty());
    for t in &building {
        assert!(full.contains(t));
        assert!(t.subject.in_namespace(&context.building_stem));
    }
}

#[test]
fn equipment_export_has_no_point_objects() {
    let context = processed();
    let types = context.store.type_index();
    let points: HashSet<Iri> = [brick("Point")].into();
    let selected = export::select(&context, ExportMode::EquipmentLocationsSystems);
    assert!(!selected.is_empty());
    for t in &selected {
        if let Some(object) = t.object.as_iri() {
            let is_point = types
                .get(object)
                .is_some_and(|cs| cs.iter().any(|c| context.hierarchy.is_member(c, &points)));
            assert!(!is_point, "point object leaked: {t:?}");
        }
    }
    assert!(selected.iter().all(|t| t.subject != b("AHU-1_SAT")));
    assert!(selected
        .iter()
        .any(|t| t.subject == b("AHU_System") && t.predicate.as_str() == RDF_TYPE));
}

#[test]
fn missing_required_column_skips_only_that_table() {
    let json = r#"{
      "locations": {"columns": [["Brick", "identifier"]], "rows": [["Room 101"]]},
      "equipment": {"columns": [["Brick", "identifier"], ["Brick", "class"]], "rows": [["AHU-1", "AHU"]]}
    }"#;
    let tables = TableSet::from_json_str(json).unwrap();
    let mut context = RunContext::new(
        BuildingId::new("acme", "hq"),
        NamespaceRegistry::with_defaults(),
        ClassHierarchy::new(),
        InverseTable::new(),
    );
    let summary = Pipeline::default().process(&mut context, &tables);
    assert!(summary.tables[0].error.is_some());
    assert_eq!(summary.tables[1].inserted, 1);
    assert_eq!(summary.total, 1);
}

fn parse(document: &str) -> Vec<(String, String, String)> {
    let mut triples = Vec::new();
    turtle::parse_str(document)
        .for_each_triple(|t| {
            let render = |iri: Option<String>, literal: Option<String>| {
                iri.or(literal).unwrap_or_default()
            };
            triples.push((
                render(t.s().iri().map(|i| String::from(i.as_str())), None),
                render(t.p().iri().map(|i| String::from(i.as_str())), None),
                render(
                    t.o().iri().map(|i| String::from(i.as_str())),
                    t.o().lexical_form().map(|l| String::from(&*l)),
                ),
            ));
        })
        .unwrap();
    triples
}

#[test]
fn exported_files_parse_and_match_the_store() {
    let context = processed();
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("output");
    let timestamp = NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();

    for mode in ExportMode::ALL {
        let path = export::export(&context, mode, &out, timestamp).unwrap();
        let document = std::fs::read_to_string(&path).unwrap();
        let parsed = parse(&document);
        assert_eq!(parsed.len(), export::select(&context, mode).len(), "{mode}");
        let first_statement = document
            .lines()
            .position(|l| !l.is_empty() && !l.starts_with("@prefix"))
            .unwrap();
        assert!(document
            .lines()
            .skip(first_statement)
            .all(|l| !l.starts_with("@prefix")));
    }

    let mut names: Vec<String> = std::fs::read_dir(&out)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    assert_eq!(
        names,
        vec![
            "20240102_030405_B_acme_hq.ttl",
            "20240102_030405_B_acme_hq_noPoints.ttl",
            "20240102_030405_M_acme_hq.ttl",
        ]
    );
}

#[test]
fn unsupported_mode_writes_nothing() {
    let context = processed();
    let dir = tempfile::tempdir().unwrap();
    let timestamp = NaiveDate::from_ymd_opt(2024, 1, 2)
        .and_then(|d| d.and_hms_opt(3, 4, 5))
        .unwrap();
    let written = export::export_named(&context, "points_only", dir.path(), timestamp).unwrap();
    assert!(written.is_none());
    assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
}
