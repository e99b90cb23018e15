//! Integration tests for init files and the dex built from them

use lingo_parser::lingo::decoding::Color;
use lingo_parser::lingo::dex::{decode_init_files, DexBuilder};
use lingo_parser::lingo::error::{InitErrorKind, RegistryError};
use lingo_parser::lingo::init::{
    decode_init, decode_init_sequential, ColorTreatment, Definition, DefinitionKind, InitSchema,
    PropKind, Tag, TileType,
};
use lingo_parser::lingo::testing::Samples;
use rstest::rstest;

#[test]
fn test_one_header_three_definitions() {
    let text = r#"-["Walls", color(30, 30, 30)]
[#nm: "A", #color: color(1, 1, 1)]
[#nm: "B", #color: color(2, 2, 2)]
[#nm: "C", #color: color(3, 3, 3)]"#;
    let records = decode_init(text, InitSchema::materials()).unwrap();
    assert_eq!(records.len(), 3);
    for record in &records {
        assert_eq!(record.category, "Walls");
        assert_eq!(record.color, Some(Color { r: 30, g: 30, b: 30 }));
    }
}

#[test]
fn test_sample_tiles() {
    let records = Samples::init("tiles").decode(InitSchema::tiles());
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Big Pipe", "Valve", "Pipe Box", "Small Stone"]);
    assert_eq!(records[3].category, "Stone");

    let Definition::Tile(pipe_box) = &records[2].definition else {
        panic!("expected a tile definition");
    };
    assert_eq!(pipe_box.kind, TileType::Box);
    assert_eq!(pipe_box.tags, vec![Tag::NonSolid, Tag::ChainHolder]);
    assert_eq!(pipe_box.specs.get(1, 1, 0), 0);
    assert!(pipe_box.specs.has_layer(1));
    assert!(!pipe_box.specs.has_layer(2));
}

#[test]
fn test_sample_props() {
    let records = Samples::init("props").decode(InitSchema::props());
    assert_eq!(records.len(), 6);

    let crate_prop = records.iter().find(|r| r.name == "Crate").unwrap();
    let Definition::Prop(prop) = &crate_prop.definition else {
        panic!("expected a prop definition");
    };
    assert_eq!(prop.depth, 6);
    assert!(matches!(
        prop.kind,
        PropKind::Standard {
            color_treatment: ColorTreatment::Bevel(3),
            ..
        }
    ));
    assert_eq!(records[4].category, "Decals");
}

#[rstest]
#[case(DefinitionKind::Tile, "tiles")]
#[case(DefinitionKind::Prop, "props")]
#[case(DefinitionKind::Material, "materials")]
#[case(DefinitionKind::Effect, "effects")]
fn test_parallel_and_sequential_agree(#[case] kind: DefinitionKind, #[case] sample: &str) {
    let source = Samples::init(sample).source();
    let schema = InitSchema::for_kind(kind);
    assert_eq!(decode_init(&source, schema), decode_init_sequential(&source, schema));
}

#[rstest]
#[case(r#"[#nm: "Rope", #tp: "rope"]"#, "unknown prop type `rope`")]
#[case(r#"[#nm: "Sign", #tp: "variedDecal"]"#, "prop `Sign` is missing required property `pxlSize`")]
#[case(r#"[#tp: "soft"]"#, "prop `` is missing required property `nm`")]
fn test_schema_failures(#[case] line: &str, #[case] message: &str) {
    let err = decode_init(&format!("-Misc\n{line}"), InitSchema::props()).unwrap_err();
    assert_eq!(err.line, 2);
    assert_eq!(err.kind.to_string(), message);
}

#[test]
fn test_parse_failure_keeps_line_number() {
    let err = decode_init("-Misc\n\n[#nm: \"x\", #tp: ", InitSchema::props()).unwrap_err();
    assert_eq!(err.line, 3);
    assert!(matches!(err.kind, InitErrorKind::Parse(_)));
}

#[test]
fn test_dex_from_sample_files() {
    let files = [
        (DefinitionKind::Tile, Samples::init("tiles").source()),
        (DefinitionKind::Prop, Samples::init("props").source()),
        (DefinitionKind::Material, Samples::init("materials").source()),
        (DefinitionKind::Effect, Samples::init("effects").source()),
    ];

    let mut builder = DexBuilder::new();
    for records in decode_init_files(&files) {
        builder.extend(records.unwrap()).unwrap();
    }
    let dex = builder.build();

    assert_eq!(dex.tiles().len(), 4);
    assert_eq!(dex.props().len(), 6);
    assert_eq!(dex.materials().len(), 3);
    assert_eq!(dex.effects().len(), 5);
    assert_eq!(dex.tiles().get("Valve").unwrap().line, 3);
    assert_eq!(
        dex.props().get("Lamp").unwrap_err(),
        RegistryError::NotFound {
            kind: DefinitionKind::Prop,
            name: "Lamp".into()
        }
    );

    let level = Samples::level("small").load();
    assert_eq!(dex.check_tiles(&level.tiles), Ok(()));
    assert!(matches!(
        dex.check_effects(&level.effects),
        Err(RegistryError::NotFound { ref name, .. }) if name == "Slime"
    ));
    assert_eq!(dex.check_effects(&level.effects[1..]), Ok(()));
    assert_eq!(dex.check_props(&level.props), Ok(()));
}
