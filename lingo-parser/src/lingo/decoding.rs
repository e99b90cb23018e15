//! Domain decoders
//!
//!     Every decoder is a pure function from an already-parsed [Node] to a domain value.
//!     They check shape first (variant and arity) and only then extract values, so a
//!     failure never leaves a half-built structure behind.
//!
//!     Errors name the path into the structure being decoded. Paths are built as the
//!     decoder descends, e.g. `geometry[3][5][1]` or `effects[0].mtrx[2]`.
//!
//!     The helpers in this module are the shared vocabulary for that shape checking.

pub mod cameras;
pub mod effects;
pub mod geometry;
pub mod props;
pub mod settings;
pub mod tiles;

use crate::lingo::ast::{lookup, Node};
use crate::lingo::error::DecodeError;
use serde::Serialize;

pub use cameras::{decode_cameras, Camera, QuadCorner};
pub use effects::{decode_effects, Effect, EffectOption, IntensityMatrix, OptionValue};
pub use geometry::{
    decode_geometry, log_fallbacks, GeoCell, GeoDecode, GeoFallback, GeoFeature, GeoFeatures,
    GeoMatrix, GeoType,
};
pub use props::{decode_props, PlacedProp};
pub use settings::{
    decode_light, decode_settings, decode_terrain, decode_water, ExtraTiles, LevelSettings,
    LightSettings, WaterSettings,
};
pub use tiles::{decode_tiles, TileCell, TileLayer, TilePos};

/// Number of layers in geometry and tile matrices
pub const LAYERS: usize = 3;

/// 2-D coordinate, written as `point(x, y)` or `[x, y]`
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// RGB color, written as `color(r, g, b)` or `[r, g, b]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub(crate) fn shape(context: &str, expected: &'static str, found: &Node) -> DecodeError {
    DecodeError::Shape {
        context: context.to_string(),
        expected,
        found: found.kind_name(),
    }
}

pub(crate) fn invalid(context: &str, field: &str, value: impl ToString) -> DecodeError {
    DecodeError::InvalidValue {
        context: context.to_string(),
        field: field.to_string(),
        value: value.to_string(),
    }
}

pub(crate) fn expect_list<'a>(node: &'a Node, context: &str) -> Result<&'a [Node], DecodeError> {
    node.as_list().ok_or_else(|| shape(context, "list", node))
}

/// A list with exactly `n` elements
pub(crate) fn expect_arity<'a>(
    node: &'a Node,
    n: usize,
    context: &str,
) -> Result<&'a [Node], DecodeError> {
    let items = expect_list(node, context)?;
    if items.len() != n {
        return Err(DecodeError::Arity {
            context: context.to_string(),
            expected: n,
            found: items.len(),
        });
    }
    Ok(items)
}

pub(crate) fn expect_props<'a>(
    node: &'a Node,
    context: &str,
) -> Result<&'a [(String, Node)], DecodeError> {
    node.as_property_list()
        .ok_or_else(|| shape(context, "property list", node))
}

pub(crate) fn expect_int(node: &Node, context: &str) -> Result<i64, DecodeError> {
    node.as_int().ok_or_else(|| shape(context, "integer", node))
}

pub(crate) fn expect_number(node: &Node, context: &str) -> Result<f64, DecodeError> {
    node.as_f64().ok_or_else(|| shape(context, "number", node))
}

pub(crate) fn expect_text<'a>(node: &'a Node, context: &str) -> Result<&'a str, DecodeError> {
    node.as_str().ok_or_else(|| shape(context, "string", node))
}

/// Integers are booleans in this notation; anything but 0 is true
pub(crate) fn expect_flag(node: &Node, context: &str) -> Result<bool, DecodeError> {
    expect_int(node, context).map(|n| n != 0)
}

pub(crate) fn required<'a>(
    entries: &'a [(String, Node)],
    key: &str,
    context: &str,
) -> Result<&'a Node, DecodeError> {
    lookup(entries, key).ok_or_else(|| DecodeError::MissingProperty {
        context: context.to_string(),
        property: key.to_string(),
    })
}

pub(crate) fn optional<'a>(entries: &'a [(String, Node)], key: &str) -> Option<&'a Node> {
    lookup(entries, key)
}

/// Arguments of `name(...)` or elements of a plain list, with exactly `n` entries
fn call_or_list<'a>(
    node: &'a Node,
    name: &'static str,
    n: usize,
    context: &str,
) -> Result<&'a [Node], DecodeError> {
    let args = match node {
        Node::List(items) => items.as_slice(),
        _ => node
            .as_call(name)
            .ok_or_else(|| shape(context, name, node))?,
    };
    if args.len() != n {
        return Err(DecodeError::Arity {
            context: context.to_string(),
            expected: n,
            found: args.len(),
        });
    }
    Ok(args)
}

pub(crate) fn expect_point(node: &Node, context: &str) -> Result<Point, DecodeError> {
    let args = call_or_list(node, "point", 2, context)?;
    Ok(Point {
        x: expect_number(&args[0], &format!("{context}.x"))?,
        y: expect_number(&args[1], &format!("{context}.y"))?,
    })
}

/// A point whose coordinates must be integers, such as tile sizes
pub(crate) fn expect_int_point(node: &Node, context: &str) -> Result<(i64, i64), DecodeError> {
    let args = call_or_list(node, "point", 2, context)?;
    Ok((
        expect_int(&args[0], &format!("{context}.x"))?,
        expect_int(&args[1], &format!("{context}.y"))?,
    ))
}

pub(crate) fn expect_color(node: &Node, context: &str) -> Result<Color, DecodeError> {
    let args = call_or_list(node, "color", 3, context)?;
    let channel = |i: usize, name: &str| -> Result<u8, DecodeError> {
        let value = expect_int(&args[i], &format!("{context}.{name}"))?;
        u8::try_from(value).map_err(|_| invalid(context, name, value))
    };
    Ok(Color {
        r: channel(0, "r")?,
        g: channel(1, "g")?,
        b: channel(2, "b")?,
    })
}

pub(crate) fn expect_strings(node: &Node, context: &str) -> Result<Vec<String>, DecodeError> {
    expect_list(node, context)?
        .iter()
        .enumerate()
        .map(|(i, item)| expect_text(item, &format!("{context}[{i}]")).map(str::to_string))
        .collect()
}

pub(crate) fn expect_ints(node: &Node, context: &str) -> Result<Vec<i64>, DecodeError> {
    expect_list(node, context)?
        .iter()
        .enumerate()
        .map(|(i, item)| expect_int(item, &format!("{context}[{i}]")))
        .collect()
}
