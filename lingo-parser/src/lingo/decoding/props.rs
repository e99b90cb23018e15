//! Placed props decoder
//!
//! The props line keeps every placed prop as a five element list:
//!
//!     [#props: [[-5, "Crate", point(2, 7),
//!                [point(0, 0), point(40, 0), point(40, 40), point(0, 40)],
//!                [#settings: [#renderorder: 0, #seed: 412, #renderTime: 0]]], ...], ...]
//!
//! Depth comes first (negative, deeper is smaller), then the definition name and the
//! category/index pair the editor recorded when the prop was placed. The quad holds the
//! four corners in clockwise order starting at the top left. The last element carries
//! `#settings` and, for ropes, the simulated `#points`.
//!
//! Whether the name refers to a prop or to a tile drawn as a prop is a registry question;
//! see [DexSet::check_props](crate::lingo::dex::DexSet::check_props).

use super::{
    expect_arity, expect_int, expect_int_point, expect_list, expect_point, expect_props,
    expect_text, optional, required, Point,
};
use crate::lingo::ast::{lookup, Node};
use crate::lingo::error::DecodeError;
use serde::Serialize;
use tracing::debug;

pub const PROP_QUAD_CORNERS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedProp {
    pub depth: i64,
    pub name: String,
    /// `(category, index)` as recorded by the editor
    pub position: (i64, i64),
    pub quad: [Point; PROP_QUAD_CORNERS],
    /// The `#settings` property list, keys as written
    pub settings: Vec<(String, Node)>,
    /// Rope segment positions; empty for every other prop
    pub points: Vec<Point>,
}

impl PlacedProp {
    pub fn setting(&self, key: &str) -> Option<&Node> {
        lookup(&self.settings, key)
    }

    pub fn render_order(&self) -> Option<i64> {
        self.setting("renderorder").and_then(Node::as_int)
    }

    pub fn seed(&self) -> Option<i64> {
        self.setting("seed").and_then(Node::as_int)
    }

    /// Variations are 1-based in files
    pub fn variation(&self) -> Option<i64> {
        self.setting("variation").and_then(Node::as_int)
    }
}

/// Decode the props line, or the `#props` list on its own
pub fn decode_props(node: &Node) -> Result<Vec<PlacedProp>, DecodeError> {
    let list = match node {
        Node::PropertyList(entries) => required(entries, "props", "props")?,
        other => other,
    };

    let props = expect_list(list, "props")?
        .iter()
        .enumerate()
        .map(|(i, entry)| decode_prop(entry, &format!("props[{i}]")))
        .collect::<Result<Vec<_>, _>>()?;

    debug!(count = props.len(), "decoded placed props");
    Ok(props)
}

fn decode_prop(node: &Node, context: &str) -> Result<PlacedProp, DecodeError> {
    let parts = expect_arity(node, 5, context)?;

    let depth = expect_int(&parts[0], &format!("{context}.depth"))?;
    let name = expect_text(&parts[1], &format!("{context}.name"))?.to_string();
    let position = expect_int_point(&parts[2], &format!("{context}.position"))?;

    let quad_context = format!("{context}.quad");
    let corners = expect_arity(&parts[3], PROP_QUAD_CORNERS, &quad_context)?;
    let mut quad = [Point::default(); PROP_QUAD_CORNERS];
    for (i, corner) in corners.iter().enumerate() {
        quad[i] = expect_point(corner, &format!("{quad_context}[{i}]"))?;
    }

    let extra_context = format!("{context}.extra");
    let extra = expect_props(&parts[4], &extra_context)?;
    let settings = expect_props(
        required(extra, "settings", &extra_context)?,
        &format!("{context}.settings"),
    )?
    .to_vec();

    let points = match optional(extra, "points") {
        Some(node) => {
            let points_context = format!("{context}.points");
            expect_list(node, &points_context)?
                .iter()
                .enumerate()
                .map(|(i, point)| expect_point(point, &format!("{points_context}[{i}]")))
                .collect::<Result<Vec<_>, _>>()?
        }
        None => Vec::new(),
    };

    Ok(PlacedProp {
        depth,
        name,
        position,
        quad,
        settings,
        points,
    })
}
