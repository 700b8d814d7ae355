//! Occupancy grids.
//!
//! A grid backend answers traversability queries for a fixed, immutable map
//! and defines the node id scheme the search uses. Every backend surrounds the
//! logical map with a border of permanently blocked cells, so that reading
//! the 3×3 neighbourhood of any traversable cell never leaves the storage.
//!
//! | Backend | Storage | Border |
//! |---|---|---|
//! | [`BitGrid`] | one bit per cell, 64-bit words | 2 cells |
//! | [`ByteGrid`] | one byte per cell | 1 cell |

use crate::bits::{BitTable, WORD_BITS};
use crate::error::{GridError, MAX_NODES};
use crate::geom::{Point, Range};

/// Read-only traversability map plus the node id scheme built on it.
///
/// Node ids are padded linear indices: `id = (y + pad) * row_stride() + x + pad`
/// for a logical cell `(x, y)`. Ids of the east, west, north and south
/// neighbours are `id + 1`, `id - 1`, `id - row_stride()` and
/// `id + row_stride()`.
pub trait GridBackend: Send + Sync {
    /// Build the grid from a row-major boolean array (`bits[y * width + x]`).
    fn build(bits: &[bool], width: u32, height: u32) -> Result<Self, GridError>
    where
        Self: Sized;

    /// Logical width.
    fn width(&self) -> u32;

    /// Logical height.
    fn height(&self) -> u32;

    /// Distance in node ids between vertically adjacent cells.
    fn row_stride(&self) -> u32;

    /// Number of node ids, i.e. one past the largest id.
    fn node_count(&self) -> usize;

    /// Node id of a logical cell. `p` must be inside [`range`](Self::range).
    fn node_id(&self, p: Point) -> u32;

    /// Logical position of a node id.
    fn node_point(&self, id: u32) -> Point;

    /// Whether the node id is a traversable cell.
    fn node_traversable(&self, id: u32) -> bool;

    /// The 3×3 neighbourhood centred on `id`, bit `row * 3 + col` set for
    /// traversable cells.
    fn region3x3(&self, id: u32) -> u16;

    /// Logical bounds.
    fn range(&self) -> Range {
        Range::with_size(self.width(), self.height())
    }

    /// Whether the logical cell is traversable. Cells outside the logical
    /// range read as blocked.
    fn traversable(&self, p: Point) -> bool {
        self.range().contains(p) && self.node_traversable(self.node_id(p))
    }
}

fn check_input(bits: &[bool], width: u32, height: u32) -> Result<(), GridError> {
    let expected = width as usize * height as usize;
    if bits.len() != expected {
        return Err(GridError::SizeMismatch {
            expected,
            actual: bits.len(),
        });
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// BitGrid
// ---------------------------------------------------------------------------

/// Bit-packed grid with a 2-cell blocked border.
///
/// Each padded row occupies whole 64-bit words; the row stride of the node id
/// scheme equals the row length in bits, so a node id is also the cell's bit
/// index in the table.
#[derive(Clone, Debug)]
pub struct BitGrid {
    table: BitTable,
    width: u32,
    height: u32,
}

impl BitGrid {
    /// Width of the blocked border on each side.
    pub const PADDING: u32 = 2;

    /// The padded bit table. Logical cell `(x, y)` lives at table position
    /// `(x + PADDING, y + PADDING)`.
    #[inline]
    pub fn table(&self) -> &BitTable {
        &self.table
    }

    /// Number of traversable cells.
    pub fn open_cells(&self) -> usize {
        self.table.count_ones()
    }
}

impl GridBackend for BitGrid {
    fn build(bits: &[bool], width: u32, height: u32) -> Result<Self, GridError> {
        let pad = Self::PADDING as usize;
        let (cols, rows) = (width as usize + 2 * pad, height as usize + 2 * pad);
        if cols.div_ceil(WORD_BITS) * WORD_BITS * rows > MAX_NODES {
            return Err(GridError::TooLarge { width, height });
        }
        check_input(bits, width, height)?;
        let mut table = BitTable::new(cols, rows);
        let w = width as usize;
        for (i, _) in bits.iter().enumerate().filter(|(_, b)| **b) {
            table.set(i % w + pad, i / w + pad, true);
        }
        let grid = Self {
            table,
            width,
            height,
        };
        log::debug!(
            "bit grid {}x{} built: {} open cells, {} bits per row",
            width,
            height,
            grid.open_cells(),
            grid.table.row_bits()
        );
        Ok(grid)
    }

    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn row_stride(&self) -> u32 {
        self.table.row_bits() as u32
    }

    #[inline]
    fn node_count(&self) -> usize {
        self.table.row_bits() * self.table.height()
    }

    #[inline]
    fn node_id(&self, p: Point) -> u32 {
        let pad = Self::PADDING as usize;
        self.table.bit_index(p.x as usize + pad, p.y as usize + pad) as u32
    }

    #[inline]
    fn node_point(&self, id: u32) -> Point {
        let stride = self.row_stride();
        let pad = Self::PADDING as i32;
        Point::new((id % stride) as i32 - pad, (id / stride) as i32 - pad)
    }

    #[inline]
    fn node_traversable(&self, id: u32) -> bool {
        self.table.get_bit(id as usize)
    }

    #[inline]
    fn region3x3(&self, id: u32) -> u16 {
        let top_left = id as usize - self.table.row_bits() - 1;
        self.table.region3x3(top_left)
    }
}

// ---------------------------------------------------------------------------
// ByteGrid
// ---------------------------------------------------------------------------

/// One byte per cell with a 1-cell blocked border.
#[derive(Clone, Debug)]
pub struct ByteGrid {
    cells: Vec<u8>,
    width: u32,
    height: u32,
}

impl ByteGrid {
    /// Width of the blocked border on each side.
    pub const PADDING: u32 = 1;
}

impl GridBackend for ByteGrid {
    fn build(bits: &[bool], width: u32, height: u32) -> Result<Self, GridError> {
        let stride = width as usize + 2;
        let rows = height as usize + 2;
        if stride * rows > MAX_NODES {
            return Err(GridError::TooLarge { width, height });
        }
        check_input(bits, width, height)?;
        let mut cells = vec![0u8; stride * rows];
        let w = width as usize;
        for (i, &open) in bits.iter().enumerate() {
            cells[(i / w + 1) * stride + i % w + 1] = u8::from(open);
        }
        log::debug!(
            "byte grid {}x{} built: {} open cells",
            width,
            height,
            bits.iter().filter(|b| **b).count()
        );
        Ok(Self {
            cells,
            width,
            height,
        })
    }

    #[inline]
    fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    fn row_stride(&self) -> u32 {
        self.width + 2
    }

    #[inline]
    fn node_count(&self) -> usize {
        self.cells.len()
    }

    #[inline]
    fn node_id(&self, p: Point) -> u32 {
        (p.y as u32 + 1) * self.row_stride() + p.x as u32 + 1
    }

    #[inline]
    fn node_point(&self, id: u32) -> Point {
        let stride = self.row_stride();
        Point::new((id % stride) as i32 - 1, (id / stride) as i32 - 1)
    }

    #[inline]
    fn node_traversable(&self, id: u32) -> bool {
        self.cells[id as usize] != 0
    }

    fn region3x3(&self, id: u32) -> u16 {
        let stride = self.row_stride() as usize;
        let top_left = id as usize - stride - 1;
        let mut region = 0u16;
        for row in 0..3 {
            let base = top_left + row * stride;
            for col in 0..3 {
                region |= u16::from(self.cells[base + col]) << (row * 3 + col);
            }
        }
        region
    }
}

// ---------------------------------------------------------------------------
// GridMap
// ---------------------------------------------------------------------------

/// Mutable row-major boolean map, the input format for grid backends.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridMap {
    bits: Vec<bool>,
    width: u32,
    height: u32,
}

impl GridMap {
    /// A fully open map.
    pub fn open(width: u32, height: u32) -> Self {
        Self {
            bits: vec![true; width as usize * height as usize],
            width,
            height,
        }
    }

    /// Wrap a row-major array (`bits[y * width + x]`, `true` = open).
    pub fn from_bits(bits: Vec<bool>, width: u32, height: u32) -> Result<Self, GridError> {
        check_input(&bits, width, height)?;
        Ok(Self {
            bits,
            width,
            height,
        })
    }

    /// Parse rows of characters; `.`, `G` and `S` are traversable, anything
    /// else is blocked. All rows must have the same length.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Result<Self, GridError> {
        let height = rows.len() as u32;
        let width = rows.first().map_or(0, |r| r.as_ref().chars().count()) as u32;
        let mut bits = Vec::with_capacity(width as usize * height as usize);
        for row in rows {
            bits.extend(row.as_ref().chars().map(is_open_tile));
        }
        check_input(&bits, width, height)?;
        Ok(Self {
            bits,
            width,
            height,
        })
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    #[inline]
    pub fn bits(&self) -> &[bool] {
        &self.bits
    }

    #[inline]
    pub fn range(&self) -> Range {
        Range::with_size(self.width, self.height)
    }

    /// Traversability of `p`; outside the map reads as blocked.
    pub fn get(&self, p: Point) -> bool {
        self.range()
            .index(p)
            .is_some_and(|i| self.bits[i])
    }

    /// Set the traversability of `p`. Points outside the map are ignored.
    pub fn set(&mut self, p: Point, open: bool) {
        if let Some(i) = self.range().index(p) {
            self.bits[i] = open;
        }
    }

    /// Build a grid backend from this map.
    pub fn to_grid<G: GridBackend>(&self) -> Result<G, GridError> {
        G::build(&self.bits, self.width, self.height)
    }
}

/// Whether a map character denotes a traversable tile.
#[inline]
pub fn is_open_tile(c: char) -> bool {
    matches!(c, '.' | 'G' | 'S')
}
