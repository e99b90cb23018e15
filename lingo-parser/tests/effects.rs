//! Integration tests for the effects decoder and effect option generation

use lingo_parser::lingo::decoding::{decode_effects, OptionValue};
use lingo_parser::lingo::error::DecodeError;
use lingo_parser::lingo::init::{generate_options, EffectDefinition, InitSchema};
use lingo_parser::lingo::parse;
use lingo_parser::lingo::testing::{effects_line, Samples};
use proptest::prelude::*;
use rstest::rstest;

#[test]
fn test_sample_effect_stack() {
    let lines = Samples::level("small").parse_lines();
    let effects = decode_effects(&lines[2], 3, 4).unwrap();

    let names: Vec<_> = effects.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Slime", "Ivy"]);

    let slime = &effects[0];
    assert_eq!(slime.matrix.get(0, 1), Some(12.5));
    assert_eq!(slime.matrix.get(1, 2), Some(50.0));
    assert_eq!(slime.matrix.get(3, 0), None);
    assert_eq!(
        slime.option("Delete/Move").map(|o| &o.value),
        Some(&OptionValue::Text(String::new()))
    );

    let ivy = &effects[1];
    assert_eq!(
        ivy.option("Color").map(|o| &o.value),
        Some(&OptionValue::Text("Color2".into()))
    );
    assert_eq!(ivy.repeats, None);
}

#[test]
fn test_sample_effects_need_level_size() {
    let lines = Samples::level("small").parse_lines();
    assert!(matches!(
        decode_effects(&lines[2], 4, 3),
        Err(DecodeError::SizeMismatch { .. })
    ));
}

proptest! {
    #[test]
    fn test_matrix_matches_requested_size(height in 0usize..6, width in 0usize..6) {
        let node = parse(&effects_line(height, width)).unwrap();
        let effects = decode_effects(&node, height, width).unwrap();
        prop_assert_eq!(effects[0].matrix.height, height);
        prop_assert_eq!(effects[0].matrix.width, width);
        prop_assert_eq!(effects[0].matrix.values().len(), height * width);
    }

    #[test]
    fn test_other_sizes_never_truncate(
        height in 1usize..5,
        width in 1usize..5,
        dh in 0usize..2,
        dw in 0usize..2,
    ) {
        prop_assume!(dh + dw > 0);
        let node = parse(&effects_line(height + dh, width + dw)).unwrap();
        let is_size_mismatch = matches!(
            decode_effects(&node, height, width),
            Err(DecodeError::SizeMismatch { .. })
        );
        prop_assert!(is_size_mismatch);
    }
}

#[rstest]
#[case("individualHanger", "hanger", true, false, &[("Layers", "1"), ("Color", "Color1"), ("Require In-Bounds", "No")])]
#[case("individual", "standardHanger", false, false, &[("Layers", "1")])]
#[case("Ivy", "wall", true, true, &[("Layers", "All"), ("Color", "Color1"), ("3D", "Off")])]
#[case("Tendrils", "clinger", false, true, &[("Layers", "All"), ("Slide", "Random"), ("Require In-Bounds", "No")])]
#[case("Fungus", "grower", false, false, &[("Layers", "All"), ("Require In-Bounds", "No")])]
fn test_generated_options(
    #[case] name: &str,
    #[case] kind: &str,
    #[case] pick_color: bool,
    #[case] can_3d: bool,
    #[case] expected: &[(&str, &str)],
) {
    let effect = EffectDefinition {
        kind: kind.into(),
        pick_color,
        can_3d,
    };
    let options: Vec<_> = generate_options(name, &effect)
        .iter()
        .map(|o| (o.name, o.default))
        .collect();
    assert_eq!(options, expected);
}

#[test]
fn test_options_from_sample_definitions() {
    let records = Samples::init("effects").decode(InitSchema::effects());
    let ivy = records.iter().find(|r| r.name == "Ivy").unwrap();
    let names: Vec<_> = ivy.effect_options().iter().map(|o| o.name).collect();
    assert_eq!(names, vec!["Layers", "Color", "3D"]);

    let moss = records.iter().find(|r| r.name == "Moss Wall").unwrap();
    assert!(moss.effect_options().iter().all(|o| o.name != "3D"));
}
