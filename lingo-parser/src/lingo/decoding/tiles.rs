//! Tile matrix decoder
//!
//!     The tile line is a property list. `#tlMatrix` holds the matrix, with the same
//!     `[row][col][layer]` nesting as geometry. Each cell is one of:
//!
//!         -1, #void, #empty                                 empty
//!         [#tp: "default", #data: 0]                        material default
//!         [#tp: "material", #data: "Concrete"]              explicit material
//!         [#tp: "tileHead", #data: [point(c, i), "Name"]]   root cell of a placed tile
//!         [#tp: "tileBody", #data: [point(x, y), z]]        back-reference to the root
//!
//!     Body cells point at their head with the 1-based position the authoring tool writes.
//!     `#defaultMaterial` and the flat `#bufferTiles` name list live on the same line.
//!
//!     Tile and material names are not checked here; see [dex](crate::lingo::dex).

use super::{
    expect_arity, expect_int, expect_int_point, expect_list, expect_props, expect_strings,
    expect_text, invalid, optional, required, shape, LAYERS,
};
use crate::lingo::ast::Node;
use crate::lingo::error::DecodeError;
use serde::Serialize;
use tracing::debug;

/// 1-based `(x, y, layer)` position of a tile head, as written in level files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct TilePos {
    pub x: i64,
    pub y: i64,
    pub layer: i64,
}

impl TilePos {
    /// Zero-based `(row, col, layer)`, if the position is not below 1
    pub fn to_index(self) -> Option<(usize, usize, usize)> {
        let row = usize::try_from(self.y.checked_sub(1)?).ok()?;
        let col = usize::try_from(self.x.checked_sub(1)?).ok()?;
        let layer = usize::try_from(self.layer.checked_sub(1)?).ok()?;
        Some((row, col, layer))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub enum TileCell {
    #[default]
    Empty,
    /// Uses the level's default material
    Default,
    Material { name: String },
    Head {
        name: String,
        category: i64,
        index: i64,
    },
    Body { head: TilePos },
}

impl TileCell {
    /// Offset `(dx, dy)` from the cell at zero-based `(row, col)` to its head
    pub fn head_offset(&self, row: usize, col: usize) -> Option<(i64, i64)> {
        match self {
            TileCell::Body { head } => {
                let (head_row, head_col, _) = head.to_index()?;
                Some((
                    head_col as i64 - col as i64,
                    head_row as i64 - row as i64,
                ))
            }
            _ => None,
        }
    }
}

/// Decoded tile line
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TileLayer {
    pub height: usize,
    pub width: usize,
    cells: Vec<[TileCell; LAYERS]>,
    pub default_material: Option<String>,
    pub buffer_tiles: Vec<String>,
}

impl TileLayer {
    pub fn cell(&self, row: usize, col: usize, layer: usize) -> Option<&TileCell> {
        if row >= self.height || col >= self.width {
            return None;
        }
        self.cells.get(row * self.width + col)?.get(layer)
    }

    /// Follow a body cell to the head it references
    ///
    /// Returns `None` for cells that are not bodies, for positions outside the matrix and
    /// for references that do not land on a head.
    pub fn resolve_head(&self, row: usize, col: usize, layer: usize) -> Option<&TileCell> {
        let TileCell::Body { head } = self.cell(row, col, layer)? else {
            return None;
        };
        let (head_row, head_col, head_layer) = head.to_index()?;
        match self.cell(head_row, head_col, head_layer)? {
            found @ TileCell::Head { .. } => Some(found),
            _ => None,
        }
    }

    /// Every head cell with its zero-based position
    pub fn heads(&self) -> impl Iterator<Item = ((usize, usize, usize), &TileCell)> + '_ {
        self.cells.iter().enumerate().flat_map(move |(i, layers)| {
            layers
                .iter()
                .enumerate()
                .filter(|(_, cell)| matches!(cell, TileCell::Head { .. }))
                .map(move |(layer, cell)| ((i / self.width, i % self.width, layer), cell))
        })
    }

    /// Every material name referenced by a cell
    pub fn materials(&self) -> impl Iterator<Item = &str> + '_ {
        self.cells.iter().flatten().filter_map(|cell| match cell {
            TileCell::Material { name } => Some(name.as_str()),
            _ => None,
        })
    }
}

/// Decode the tile line
pub fn decode_tiles(node: &Node) -> Result<TileLayer, DecodeError> {
    let entries = expect_props(node, "tiles")?;
    let rows = expect_list(required(entries, "tlMatrix", "tiles")?, "tlMatrix")?;

    let height = rows.len();
    let width = match rows.first() {
        Some(first) => expect_list(first, "tlMatrix[0]")?.len(),
        None => 0,
    };

    let mut cells = Vec::with_capacity(height * width);
    for (row, row_node) in rows.iter().enumerate() {
        let cols = expect_list(row_node, &format!("tlMatrix[{row}]"))?;
        if cols.len() != width {
            return Err(DecodeError::RaggedMatrix {
                context: "tlMatrix".into(),
                row,
                expected: width,
                found: cols.len(),
            });
        }
        for (col, cell_node) in cols.iter().enumerate() {
            let context = format!("tlMatrix[{row}][{col}]");
            let layer_nodes = expect_arity(cell_node, LAYERS, &context)?;
            let mut cell: [TileCell; LAYERS] = Default::default();
            for (layer, layer_node) in layer_nodes.iter().enumerate() {
                cell[layer] = decode_cell(layer_node, &format!("{context}[{layer}]"))?;
            }
            cells.push(cell);
        }
    }

    let default_material = optional(entries, "defaultMaterial")
        .map(|node| expect_text(node, "defaultMaterial").map(str::to_string))
        .transpose()?;
    let buffer_tiles = match optional(entries, "bufferTiles") {
        Some(node) => expect_strings(node, "bufferTiles")?,
        None => Vec::new(),
    };

    debug!(height, width, buffer_tiles = buffer_tiles.len(), "decoded tile matrix");

    Ok(TileLayer {
        height,
        width,
        cells,
        default_material,
        buffer_tiles,
    })
}

fn decode_cell(node: &Node, context: &str) -> Result<TileCell, DecodeError> {
    let entries = match node {
        Node::Number(-1) => return Ok(TileCell::Empty),
        Node::Number(n) => return Err(invalid(context, "cell", n)),
        Node::Symbol(s) if s.eq_ignore_ascii_case("void") || s.eq_ignore_ascii_case("empty") => {
            return Ok(TileCell::Empty)
        }
        Node::PropertyList(entries) => entries,
        other => return Err(shape(context, "tile cell", other)),
    };

    let tp = expect_text(required(entries, "tp", context)?, &format!("{context}.tp"))?;
    let data_context = format!("{context}.data");

    if tp.eq_ignore_ascii_case("default") {
        Ok(TileCell::Default)
    } else if tp.eq_ignore_ascii_case("material") {
        let name = expect_text(required(entries, "data", context)?, &data_context)?;
        Ok(TileCell::Material {
            name: name.to_string(),
        })
    } else if tp.eq_ignore_ascii_case("tileHead") {
        let data = expect_arity(required(entries, "data", context)?, 2, &data_context)?;
        let (category, index) = expect_int_point(&data[0], &format!("{data_context}[0]"))?;
        let name = expect_text(&data[1], &format!("{data_context}[1]"))?;
        Ok(TileCell::Head {
            name: name.to_string(),
            category,
            index,
        })
    } else if tp.eq_ignore_ascii_case("tileBody") {
        let data = expect_arity(required(entries, "data", context)?, 2, &data_context)?;
        let (x, y) = expect_int_point(&data[0], &format!("{data_context}[0]"))?;
        let layer = expect_int(&data[1], &format!("{data_context}[1]"))?;
        Ok(TileCell::Body {
            head: TilePos { x, y, layer },
        })
    } else {
        Err(invalid(context, "tp", tp))
    }
}
