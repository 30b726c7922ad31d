use super::*;
use camino::Utf8PathBuf;
use rstest::{fixture, rstest};
use tagwise_core::{
    ElementType, Feature, FeatureBase, FeatureDb, FeatureKind, OsmElement, RegistryError,
};
use tempfile::TempDir;

const CAFE_DEFINITIONS: &str = r#"[
    { "name": "cafe", "types": "node", "tags": "amenity=cafe",
      "categories": "food", "precision": 5 },
    { "name": "pub", "types": ["node", "way"], "tags": ["amenity=pub"],
      "categories": ["food", "nightlife"], "plural": "pubs" },
    { "name": "food", "kind": "category", "label": "places to eat" }
]"#;

#[fixture]
fn definitions() -> Vec<FeatureDefinition> {
    load_definitions(CAFE_DEFINITIONS).expect("valid definitions")
}

#[fixture]
fn loaded(definitions: Vec<FeatureDefinition>) -> FeatureDb {
    let mut db = FeatureDb::new();
    load_into(&mut db, definitions).expect("load definitions");
    db
}

fn node(pairs: &[(&str, &str)]) -> OsmElement {
    pairs
        .iter()
        .fold(OsmElement::new(1, ElementType::Node), |element, (k, v)| {
            element.with_tag(*k, *v)
        })
}

#[rstest]
fn single_values_are_promoted_to_lists(definitions: Vec<FeatureDefinition>) {
    let cafe = definitions.first().expect("cafe definition");
    assert_eq!(cafe.types.as_deref(), Some(["node".to_owned()].as_slice()));
    assert_eq!(cafe.tags, ["amenity=cafe"]);
    assert_eq!(cafe.categories, ["food"]);
    assert_eq!(cafe.kind, FeatureKind::Simple);
}

#[rstest]
fn unknown_fields_are_rejected() {
    let err = load_definitions(r#"[{ "name": "cafe", "colour": "brown" }]"#)
        .expect_err("unknown field");
    assert!(matches!(err, LoadError::Parse { .. }), "unexpected error: {err}");
}

#[rstest]
fn categories_and_memberships_are_wired(loaded: FeatureDb) {
    let food = loaded
        .get("food")
        .and_then(|feature| feature.as_category())
        .expect("food category");
    assert_eq!(food.members(), ["cafe", "pub"]);
    assert_eq!(food.label(), "places to eat");
    assert_eq!(food.precision(), tagwise_core::DEFAULT_CATEGORY_PRECISION);
}

#[rstest]
fn undefined_categories_are_created(loaded: FeatureDb) {
    let nightlife = loaded.get("nightlife").expect("auto-created category");
    assert_eq!(nightlife.kind(), FeatureKind::Category);
    assert_eq!(loaded.len(), 4);
}

#[rstest]
fn omitted_types_allow_everything() {
    let definition = FeatureDefinition::new("anything");
    let feature = definition.to_feature().expect("valid definition");
    assert_eq!(feature.types().len(), ElementType::ALL.len());
}

#[rstest]
fn explicit_empty_types_match_nothing() {
    let definitions = load_definitions(r#"[{ "name": "nothing", "types": [] }]"#)
        .expect("valid definitions");
    let mut db = FeatureDb::new();
    load_into(&mut db, definitions).expect("load");
    assert!(db.match_best(&node(&[])).is_none());
}

#[rstest]
fn loaded_registry_matches(loaded: FeatureDb) {
    let best = loaded
        .match_best(&node(&[("amenity", "cafe")]))
        .expect("cafe matches");
    assert_eq!(best.feature().name(), "cafe");
    let names: Vec<_> = loaded
        .match_element(&node(&[("amenity", "pub")]))
        .iter()
        .map(|found| found.feature().name().to_owned())
        .collect();
    assert_eq!(names, ["food", "nightlife", "pub"]);
}

#[rstest]
#[case(r#"{ "name": "bad", "types": "area" }"#)]
#[case(r#"{ "name": "bad", "tags": "=cafe" }"#)]
#[case(r#"{ "name": "bad", "kind": "category", "tags": "amenity" }"#)]
#[case(r#"{ "name": "bad", "members": "cafe" }"#)]
fn malformed_definitions_are_rejected(#[case] entry: &str) {
    let definitions = load_definitions(&format!("[{entry}]")).expect("parseable");
    let definition = definitions.first().expect("one definition");
    let err = definition.to_feature().expect_err("malformed");
    assert!(
        matches!(
            err,
            LoadError::InvalidType { .. }
                | LoadError::InvalidTag { .. }
                | LoadError::UnexpectedTags { .. }
                | LoadError::UnexpectedMembers { .. }
        ),
        "unexpected error: {err}"
    );
}

#[rstest]
fn invalid_type_reports_the_value() {
    let definitions =
        load_definitions(r#"[{ "name": "bad", "types": "area" }]"#).expect("parseable");
    let mut db = FeatureDb::new();
    match load_into(&mut db, definitions) {
        Err(LoadError::InvalidType { name, source }) => {
            assert_eq!(name, "bad");
            assert_eq!(source.value, "area");
        }
        other => panic!("expected invalid type, got {other:?}"),
    }
}

#[rstest]
fn failed_load_leaves_registry_unchanged(mut loaded: FeatureDb) {
    let definitions = load_definitions(
        r#"[{ "name": "bakery", "tags": "shop=bakery" }, { "name": "cafe" }]"#,
    )
    .expect("parseable");
    let err = load_into(&mut loaded, definitions).expect_err("duplicate cafe");
    assert!(matches!(
        err,
        LoadError::Registry(RegistryError::DuplicateName { .. })
    ));
    assert!(!loaded.contains("bakery"));
    assert_eq!(loaded.len(), 4);
}

#[rstest]
fn membership_of_a_plain_feature_is_rejected() {
    let definitions = load_definitions(
        r#"[{ "name": "cafe" }, { "name": "espresso bar", "categories": "cafe" }]"#,
    )
    .expect("parseable");
    let mut db = FeatureDb::new();
    let err = load_into(&mut db, definitions).expect_err("cafe is not a category");
    assert!(matches!(
        err,
        LoadError::Registry(RegistryError::NotACategory { .. })
    ));
    assert!(db.is_empty());
}

#[rstest]
fn fallbacks_rank_below_specific_rules() {
    let mut db = FeatureDb::new();
    register_fallbacks(&mut db).expect("fresh registry");
    let best_name = |element: &OsmElement| {
        db.match_best(element)
            .map(|found| found.feature().name().to_owned())
    };

    assert_eq!(best_name(&node(&[])).as_deref(), Some("untagged node"));
    assert_eq!(
        best_name(&node(&[("highway", "stop")])).as_deref(),
        Some("unidentified node")
    );
    assert_eq!(best_name(&node(&[("shop", "bakery")])).as_deref(), Some("shop"));
    assert_eq!(
        best_name(&node(&[("building", "yes")])).as_deref(),
        Some("unidentified node")
    );
    let way = OsmElement::new(2, ElementType::Way).with_tag("building", "yes");
    assert_eq!(best_name(&way).as_deref(), Some("building"));
}

#[rstest]
fn unidentified_object_has_a_custom_plural() {
    let features = fallback_features();
    let anything = features.first().expect("fallbacks");
    assert_eq!(anything.name(), UNIDENTIFIED_OBJECT);
    assert_eq!(anything.plural(), "assorted objects");
    assert_eq!(features.len(), 10);
}

#[rstest]
fn registering_fallbacks_twice_adds_nothing() {
    let mut db = FeatureDb::new();
    let added = register_fallbacks(&mut db).expect("fresh registry");
    assert_eq!(added, fallback_features().len());
    assert_eq!(register_fallbacks(&mut db).expect("second pass"), 0);
    assert_eq!(db.len(), fallback_features().len());
}

#[rstest]
#[case(r#"[{ "name": "shop", "tags": "shop", "precision": 9 }]"#, "shop", FeatureKind::Simple)]
#[case(r#"[{ "name": "building", "kind": "category" }]"#, "building", FeatureKind::Category)]
fn defined_names_displace_fallbacks(
    #[case] source: &str,
    #[case] name: &str,
    #[case] kind: FeatureKind,
) {
    let mut db = FeatureDb::new();
    load_into(&mut db, load_definitions(source).expect("parseable")).expect("load");
    let added = register_fallbacks(&mut db).expect("fallbacks skip defined names");
    assert_eq!(added, fallback_features().len() - 1);
    assert_eq!(db.len(), fallback_features().len());
    assert_eq!(db.get(name).map(Feature::kind), Some(kind));
}

#[rstest]
fn defined_shop_outranks_the_fallback() {
    let definitions =
        load_definitions(r#"[{ "name": "shop", "tags": "shop", "precision": 9 }]"#)
            .expect("parseable");
    let mut db = FeatureDb::new();
    load_into(&mut db, definitions).expect("load");
    register_fallbacks(&mut db).expect("fallbacks");
    let best = db
        .match_best(&node(&[("shop", "bakery")]))
        .expect("shop matches");
    assert_eq!(best.feature().name(), "shop");
    assert_eq!(best.precision(), 9);
}

#[rstest]
fn dumped_definitions_reload_identically(loaded: FeatureDb) {
    let dumped = dump_definitions(&loaded);
    let mut reloaded = FeatureDb::new();
    load_into(&mut reloaded, dumped.clone()).expect("reload dump");
    assert_eq!(dump_definitions(&reloaded), dumped);
}

#[rstest]
fn dump_writes_only_overrides(loaded: FeatureDb) {
    let dumped = dump_definitions(&loaded);
    let pub_entry = dumped
        .iter()
        .find(|definition| definition.name == "pub")
        .expect("pub dumped");
    assert_eq!(pub_entry.plural.as_deref(), Some("pubs"));
    assert_eq!(pub_entry.precision, None);
    assert_eq!(pub_entry.label, None);
    let nightlife = dumped
        .iter()
        .find(|definition| definition.name == "nightlife")
        .expect("nightlife dumped");
    assert_eq!(nightlife.types, None);
    assert_eq!(nightlife.members, ["pub"]);
}

#[fixture]
fn temp_dir() -> TempDir {
    TempDir::new().expect("create temp dir")
}

fn utf8(dir: &TempDir, name: &str) -> Utf8PathBuf {
    Utf8PathBuf::from_path_buf(dir.path().join(name)).expect("utf8 path")
}

#[rstest]
fn definitions_round_trip_through_a_file(loaded: FeatureDb, temp_dir: TempDir) {
    let path = utf8(&temp_dir, "features.json");
    dump_definitions_file(&loaded, &path).expect("write definitions");
    let read = load_definitions_file(&path).expect("read definitions");
    assert_eq!(read, dump_definitions(&loaded));
}

#[rstest]
fn missing_file_reports_its_path(temp_dir: TempDir) {
    let path = utf8(&temp_dir, "missing.json");
    match load_definitions_file(&path) {
        Err(LoadError::Read { path: reported, .. }) => assert_eq!(reported, path),
        other => panic!("expected read error, got {other:?}"),
    }
}
