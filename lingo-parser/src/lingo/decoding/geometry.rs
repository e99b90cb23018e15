//! Geometry matrix decoder
//!
//!     Input shape, outermost first:
//!
//!         [ row, row, ... ]                      height = number of rows
//!         row   := [ cell, cell, ... ]           width  = length of the first row
//!         cell  := [ layer, layer, layer ]       exactly 3 layers
//!         layer := [ typeCode, [featureId, ...] ]
//!
//!     Decoding is lenient about values and strict about shape. A type code outside
//!     [GeoType] turns the whole layer cell into air with no features, and feature IDs
//!     outside [GeoFeature] are dropped. Both are recorded as [GeoFallback]s on the
//!     result instead of failing. A ragged row, a wrong layer count or a non-integer code
//!     fails the whole matrix.

use super::{expect_arity, expect_int, expect_list, LAYERS};
use crate::lingo::ast::Node;
use crate::lingo::error::DecodeError;
use serde::{Serialize, Serializer};
use std::fmt;
use tracing::{debug, warn};

/// Terrain type of one geometry layer cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum GeoType {
    #[default]
    Air,
    Solid,
    SlopeNE,
    SlopeNW,
    SlopeES,
    SlopeSW,
    Platform,
    ShortcutEntrance,
    Glass,
}

impl GeoType {
    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(GeoType::Air),
            1 => Some(GeoType::Solid),
            2 => Some(GeoType::SlopeNE),
            3 => Some(GeoType::SlopeNW),
            4 => Some(GeoType::SlopeES),
            5 => Some(GeoType::SlopeSW),
            6 => Some(GeoType::Platform),
            7 => Some(GeoType::ShortcutEntrance),
            9 => Some(GeoType::Glass),
            _ => None,
        }
    }

    pub fn code(self) -> u8 {
        match self {
            GeoType::Air => 0,
            GeoType::Solid => 1,
            GeoType::SlopeNE => 2,
            GeoType::SlopeNW => 3,
            GeoType::SlopeES => 4,
            GeoType::SlopeSW => 5,
            GeoType::Platform => 6,
            GeoType::ShortcutEntrance => 7,
            GeoType::Glass => 9,
        }
    }
}

/// Feature placed on a geometry cell, identified by its ID in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum GeoFeature {
    HorizontalPole,
    VerticalPole,
    Bathive,
    ShortcutEntrance,
    ShortcutPath,
    RoomEntrance,
    DragonDen,
    PlaceRock,
    PlaceSpear,
    CrackedTerrain,
    ForbidFlyChains,
    GarbageWormHole,
    Waterfall,
    WackAMoleHole,
    WormGrass,
    ScavengerHole,
}

impl GeoFeature {
    pub const ALL: [GeoFeature; 16] = [
        GeoFeature::HorizontalPole,
        GeoFeature::VerticalPole,
        GeoFeature::Bathive,
        GeoFeature::ShortcutEntrance,
        GeoFeature::ShortcutPath,
        GeoFeature::RoomEntrance,
        GeoFeature::DragonDen,
        GeoFeature::PlaceRock,
        GeoFeature::PlaceSpear,
        GeoFeature::CrackedTerrain,
        GeoFeature::ForbidFlyChains,
        GeoFeature::GarbageWormHole,
        GeoFeature::Waterfall,
        GeoFeature::WackAMoleHole,
        GeoFeature::WormGrass,
        GeoFeature::ScavengerHole,
    ];

    pub fn from_id(id: i64) -> Option<Self> {
        Self::ALL.into_iter().find(|feature| i64::from(feature.id()) == id)
    }

    pub fn id(self) -> u8 {
        match self {
            GeoFeature::HorizontalPole => 1,
            GeoFeature::VerticalPole => 2,
            GeoFeature::Bathive => 3,
            GeoFeature::ShortcutEntrance => 4,
            GeoFeature::ShortcutPath => 5,
            GeoFeature::RoomEntrance => 6,
            GeoFeature::DragonDen => 7,
            GeoFeature::PlaceRock => 9,
            GeoFeature::PlaceSpear => 10,
            GeoFeature::CrackedTerrain => 11,
            GeoFeature::ForbidFlyChains => 12,
            GeoFeature::GarbageWormHole => 13,
            GeoFeature::Waterfall => 18,
            GeoFeature::WackAMoleHole => 19,
            GeoFeature::WormGrass => 20,
            GeoFeature::ScavengerHole => 21,
        }
    }

    fn bit(self) -> u32 {
        1 << self.id()
    }
}

/// Set of features on one cell, one bit per feature ID
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GeoFeatures(u32);

impl GeoFeatures {
    pub fn empty() -> Self {
        Self(0)
    }

    pub fn insert(&mut self, feature: GeoFeature) {
        self.0 |= feature.bit();
    }

    pub fn contains(&self, feature: GeoFeature) -> bool {
        self.0 & feature.bit() != 0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }

    pub fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Features in ascending ID order
    pub fn iter(&self) -> impl Iterator<Item = GeoFeature> + '_ {
        GeoFeature::ALL
            .into_iter()
            .filter(move |feature| self.contains(*feature))
    }
}

impl FromIterator<GeoFeature> for GeoFeatures {
    fn from_iter<I: IntoIterator<Item = GeoFeature>>(iter: I) -> Self {
        let mut set = GeoFeatures::empty();
        for feature in iter {
            set.insert(feature);
        }
        set
    }
}

impl fmt::Debug for GeoFeatures {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl Serialize for GeoFeatures {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

/// One layer of one geometry cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct GeoCell {
    pub kind: GeoType,
    pub features: GeoFeatures,
}

/// `[row][col][layer]` geometry, stored row-major
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoMatrix {
    pub height: usize,
    pub width: usize,
    cells: Vec<[GeoCell; LAYERS]>,
}

impl GeoMatrix {
    pub fn cell(&self, row: usize, col: usize, layer: usize) -> Option<&GeoCell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col)?.get(layer)
    }

    /// All three layers of one cell
    pub fn layers(&self, row: usize, col: usize) -> Option<&[GeoCell; LAYERS]> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col)
    }

    pub fn row(&self, row: usize) -> Option<&[[GeoCell; LAYERS]]> {
        if row >= self.height {
            return None;
        }
        let start = row * self.width;
        self.cells.get(start..start + self.width)
    }
}

/// A value the decoder tolerated instead of failing on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GeoFallback {
    /// The cell was decoded as air with no features
    UnknownType {
        row: usize,
        col: usize,
        layer: usize,
        code: i64,
    },
    /// The feature ID was dropped from the cell
    UnknownFeature {
        row: usize,
        col: usize,
        layer: usize,
        id: i64,
    },
}

impl fmt::Display for GeoFallback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GeoFallback::UnknownType {
                row,
                col,
                layer,
                code,
            } => write!(
                f,
                "geometry[{row}][{col}][{layer}]: unknown type code {code}, decoded as air"
            ),
            GeoFallback::UnknownFeature {
                row,
                col,
                layer,
                id,
            } => write!(
                f,
                "geometry[{row}][{col}][{layer}]: unknown feature id {id}, dropped"
            ),
        }
    }
}

/// Decoded matrix plus every lenient fallback applied while decoding it
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoDecode {
    pub matrix: GeoMatrix,
    pub fallbacks: Vec<GeoFallback>,
}

/// Emit one `warn!` per fallback
pub fn log_fallbacks(fallbacks: &[GeoFallback]) {
    for fallback in fallbacks {
        warn!("{}", fallback);
    }
}

/// Decode a geometry matrix line
pub fn decode_geometry(node: &Node) -> Result<GeoDecode, DecodeError> {
    let rows = expect_list(node, "geometry")?;
    let height = rows.len();
    let width = match rows.first() {
        Some(first) => expect_list(first, "geometry[0]")?.len(),
        None => 0,
    };

    let mut cells = Vec::with_capacity(height * width);
    let mut fallbacks = Vec::new();

    for (row, row_node) in rows.iter().enumerate() {
        let cols = expect_list(row_node, &format!("geometry[{row}]"))?;
        if cols.len() != width {
            return Err(DecodeError::RaggedMatrix {
                context: "geometry".into(),
                row,
                expected: width,
                found: cols.len(),
            });
        }

        for (col, cell_node) in cols.iter().enumerate() {
            let context = format!("geometry[{row}][{col}]");
            let layer_nodes = expect_arity(cell_node, LAYERS, &context)?;
            let mut cell = [GeoCell::default(); LAYERS];
            for (layer, layer_node) in layer_nodes.iter().enumerate() {
                cell[layer] = decode_layer(
                    layer_node,
                    (row, col, layer),
                    &format!("{context}[{layer}]"),
                    &mut fallbacks,
                )?;
            }
            cells.push(cell);
        }
    }

    debug!(height, width, fallbacks = fallbacks.len(), "decoded geometry");

    Ok(GeoDecode {
        matrix: GeoMatrix {
            height,
            width,
            cells,
        },
        fallbacks,
    })
}

fn decode_layer(
    node: &Node,
    (row, col, layer): (usize, usize, usize),
    context: &str,
    fallbacks: &mut Vec<GeoFallback>,
) -> Result<GeoCell, DecodeError> {
    let parts = expect_arity(node, 2, context)?;
    let code = expect_int(&parts[0], &format!("{context}.type"))?;
    let ids = expect_list(&parts[1], &format!("{context}.features"))?;

    // Shape of the feature list is checked even when the cell collapses to air
    let mut features = GeoFeatures::empty();
    let mut dropped = Vec::new();
    for (i, id_node) in ids.iter().enumerate() {
        let id = expect_int(id_node, &format!("{context}.features[{i}]"))?;
        match GeoFeature::from_id(id) {
            Some(feature) => features.insert(feature),
            None => dropped.push(id),
        }
    }

    let Some(kind) = GeoType::from_code(code) else {
        fallbacks.push(GeoFallback::UnknownType {
            row,
            col,
            layer,
            code,
        });
        return Ok(GeoCell::default());
    };

    fallbacks.extend(dropped.into_iter().map(|id| GeoFallback::UnknownFeature {
        row,
        col,
        layer,
        id,
    }));

    Ok(GeoCell { kind, features })
}
