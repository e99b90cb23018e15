//! Integration tests for the geometry decoder

use lingo_parser::lingo::decoding::{decode_geometry, GeoFallback, GeoFeature, GeoType};
use lingo_parser::lingo::error::DecodeError;
use lingo_parser::lingo::parse;
use lingo_parser::lingo::testing::{geometry_line, Samples};
use rstest::rstest;

#[test]
fn test_sample_dimensions() {
    let node = Samples::level("geometry_72x43").parse_first();
    let decoded = decode_geometry(&node).unwrap();
    assert_eq!(decoded.matrix.height, 43);
    assert_eq!(decoded.matrix.width, 72);
    assert!(decoded.fallbacks.is_empty());
}

#[test]
fn test_sample_cells() {
    let decoded = decode_geometry(&Samples::level("geometry_72x43").parse_first()).unwrap();
    let matrix = &decoded.matrix;

    assert_eq!(matrix.cell(0, 0, 0).map(|c| c.kind), Some(GeoType::Solid));
    assert_eq!(matrix.cell(42, 71, 2).map(|c| c.kind), Some(GeoType::Solid));
    assert_eq!(matrix.cell(43, 0, 0), None);
    assert_eq!(matrix.cell(0, 72, 0), None);

    let entrance = matrix.cell(20, 30, 0).unwrap();
    assert!(entrance.features.contains(GeoFeature::ShortcutPath));
    assert!(entrance.features.contains(GeoFeature::ShortcutEntrance));
    assert_eq!(entrance.features.len(), 2);
}

#[test]
fn test_decoding_is_deterministic() {
    let node = Samples::level("geometry_72x43").parse_first();
    assert_eq!(decode_geometry(&node), decode_geometry(&node));
}

#[rstest]
#[case(1, 1)]
#[case(5, 3)]
#[case(3, 5)]
fn test_generated_dimensions(#[case] height: usize, #[case] width: usize) {
    let decoded = decode_geometry(&parse(&geometry_line(height, width)).unwrap()).unwrap();
    assert_eq!((decoded.matrix.height, decoded.matrix.width), (height, width));
}

#[test]
fn test_unknown_type_code_becomes_air() {
    let node = parse("[[[[99, [1, 2]], [1, []], [1, []]]]]").unwrap();
    let decoded = decode_geometry(&node).unwrap();
    let cell = decoded.matrix.cell(0, 0, 0).unwrap();
    assert_eq!(cell.kind, GeoType::Air);
    assert!(cell.features.is_empty());
    assert_eq!(
        decoded.fallbacks,
        vec![GeoFallback::UnknownType {
            row: 0,
            col: 0,
            layer: 0,
            code: 99
        }]
    );
}

#[test]
fn test_unknown_feature_is_dropped() {
    let node = parse("[[[[1, [2, 8, 1]], [1, []], [1, []]]]]").unwrap();
    let decoded = decode_geometry(&node).unwrap();
    let cell = decoded.matrix.cell(0, 0, 0).unwrap();
    assert_eq!(cell.kind, GeoType::Solid);
    assert_eq!(
        cell.features.iter().collect::<Vec<_>>(),
        vec![GeoFeature::HorizontalPole, GeoFeature::VerticalPole]
    );
    assert_eq!(decoded.fallbacks.len(), 1);
}

#[test]
fn test_ragged_rows_fail() {
    let node = parse("[[[[1, []], [1, []], [1, []]]], []]").unwrap();
    assert_eq!(
        decode_geometry(&node).unwrap_err(),
        DecodeError::RaggedMatrix {
            context: "geometry".into(),
            row: 1,
            expected: 1,
            found: 0
        }
    );
}

#[test]
fn test_cell_needs_three_layers() {
    let node = parse("[[[[1, []], [1, []]]]]").unwrap();
    assert_eq!(
        decode_geometry(&node).unwrap_err(),
        DecodeError::Arity {
            context: "geometry[0][0]".into(),
            expected: 3,
            found: 2
        }
    );
}
