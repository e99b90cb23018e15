//! Cameras decoder
//!
//! Two layouts are accepted. Level files written by the authoring tool keep positions
//! and quads in parallel lists:
//!
//!     [#cameras: [point(20, 30), ...], #quads: [[[0, 0], [45, 2.5], [0, 0], [0, 0]], ...]]
//!
//! The per-camera form is a list of property lists:
//!
//!     [[#pos: point(20, 30), #quad: [[0, 0], [45, 2.5], [0, 0], [0, 0]]], ...]

use super::{
    expect_arity, expect_list, expect_number, expect_point, expect_props, optional, required,
    shape, Point,
};
use crate::lingo::ast::Node;
use crate::lingo::error::DecodeError;
use serde::Serialize;

/// Corners of a camera quad
pub const QUAD_CORNERS: usize = 4;

/// Distortion of one quad corner in polar form
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct QuadCorner {
    pub angle: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Camera {
    pub position: Point,
    /// Top-left, top-right, bottom-right, bottom-left
    pub quad: [QuadCorner; QUAD_CORNERS],
}

pub fn decode_cameras(node: &Node) -> Result<Vec<Camera>, DecodeError> {
    match node {
        Node::PropertyList(entries) => decode_parallel(entries),
        Node::List(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| decode_camera(item, &format!("cameras[{i}]")))
            .collect(),
        other => Err(shape("cameras", "list or property list", other)),
    }
}

fn decode_parallel(entries: &[(String, Node)]) -> Result<Vec<Camera>, DecodeError> {
    let positions = expect_list(required(entries, "cameras", "cameras")?, "cameras")?;

    let quads = match optional(entries, "quads") {
        Some(node) => {
            let quads = expect_list(node, "quads")?;
            if quads.len() != positions.len() {
                return Err(DecodeError::Arity {
                    context: "quads".into(),
                    expected: positions.len(),
                    found: quads.len(),
                });
            }
            quads
                .iter()
                .enumerate()
                .map(|(i, quad)| decode_quad(quad, &format!("quads[{i}]")))
                .collect::<Result<Vec<_>, _>>()?
        }
        None => vec![[QuadCorner::default(); QUAD_CORNERS]; positions.len()],
    };

    positions
        .iter()
        .zip(quads)
        .enumerate()
        .map(|(i, (position, quad))| {
            Ok::<_, DecodeError>(Camera {
                position: expect_point(position, &format!("cameras[{i}]"))?,
                quad,
            })
        })
        .collect()
}

fn decode_camera(node: &Node, context: &str) -> Result<Camera, DecodeError> {
    let entries = expect_props(node, context)?;
    let position = expect_point(required(entries, "pos", context)?, &format!("{context}.pos"))?;
    let quad = decode_quad(required(entries, "quad", context)?, &format!("{context}.quad"))?;
    Ok(Camera { position, quad })
}

fn decode_quad(node: &Node, context: &str) -> Result<[QuadCorner; QUAD_CORNERS], DecodeError> {
    let corners = expect_arity(node, QUAD_CORNERS, context)?;
    let mut quad = [QuadCorner::default(); QUAD_CORNERS];
    for (i, corner) in corners.iter().enumerate() {
        let corner_context = format!("{context}[{i}]");
        let parts = expect_arity(corner, 2, &corner_context)?;
        quad[i] = QuadCorner {
            angle: expect_number(&parts[0], &format!("{corner_context}.angle"))?,
            radius: expect_number(&parts[1], &format!("{corner_context}.radius"))?,
        };
    }
    Ok(quad)
}
