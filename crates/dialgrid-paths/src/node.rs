//! Search-state records, directions and packed queue entries.

use dialgrid_core::Point;

use crate::distance::{DIST_1, DIST_R2, Dist};

/// Padded linear cell index, as defined by the grid backend.
pub type NodeId = u32;

/// Epoch counter. A node record is live only while its stamp equals the
/// driver's current search id. Zero never names a search.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SearchId(pub u32);

impl SearchId {
    /// The stamp of records no search has touched.
    pub const NONE: Self = Self(0);
}

// ---------------------------------------------------------------------------
// Dir
// ---------------------------------------------------------------------------

/// One of the eight octile moves. Y grows downwards, so north is `-y`.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Dir {
    North = 0,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

// Neighbourhood bit order once the centre is dropped.
const NW: u8 = 1 << 0;
const N: u8 = 1 << 1;
const NE: u8 = 1 << 2;
const W: u8 = 1 << 3;
const E: u8 = 1 << 4;
const SW: u8 = 1 << 5;
const S: u8 = 1 << 6;
const SE: u8 = 1 << 7;

impl Dir {
    /// All directions, in discriminant order.
    pub const ALL: [Dir; 8] = [
        Dir::North,
        Dir::South,
        Dir::East,
        Dir::West,
        Dir::NorthEast,
        Dir::NorthWest,
        Dir::SouthEast,
        Dir::SouthWest,
    ];

    /// Inverse of `self as u8`; only the low three bits are read.
    #[inline]
    pub const fn from_index(i: u32) -> Dir {
        Self::ALL[(i & 0b111) as usize]
    }

    /// Unit step in grid coordinates.
    #[inline]
    pub const fn offset(self) -> Point {
        match self {
            Dir::North => Point::new(0, -1),
            Dir::South => Point::new(0, 1),
            Dir::East => Point::new(1, 0),
            Dir::West => Point::new(-1, 0),
            Dir::NorthEast => Point::new(1, -1),
            Dir::NorthWest => Point::new(-1, -1),
            Dir::SouthEast => Point::new(1, 1),
            Dir::SouthWest => Point::new(-1, 1),
        }
    }

    #[inline]
    pub const fn is_diagonal(self) -> bool {
        self as u8 >= Dir::NorthEast as u8
    }

    /// Cost of one step in this direction.
    #[inline]
    pub const fn cost(self) -> Dist {
        if self.is_diagonal() { DIST_R2 } else { DIST_1 }
    }

    /// Node id delta of one step for a grid with the given row stride.
    #[inline]
    pub const fn id_delta(self, stride: u32) -> i32 {
        let o = self.offset();
        o.y * stride as i32 + o.x
    }

    /// Cells that must all be open for the move to be legal. Diagonals need
    /// both flanking cardinals, which forbids corner cutting.
    #[inline]
    pub(crate) const fn required(self) -> u8 {
        match self {
            Dir::North => N,
            Dir::South => S,
            Dir::East => E,
            Dir::West => W,
            Dir::NorthEast => NE | N | E,
            Dir::NorthWest => NW | N | W,
            Dir::SouthEast => SE | S | E,
            Dir::SouthWest => SW | S | W,
        }
    }

    /// Cells behind a node entered by this move. They are reached at least
    /// as cheaply through the predecessor and are skipped on expansion.
    #[inline]
    pub(crate) const fn behind(self) -> u8 {
        match self {
            Dir::North => SW | S | SE,
            Dir::South => NW | N | NE,
            Dir::East => NW | W | SW,
            Dir::West => NE | E | SE,
            Dir::NorthEast => W | SW | S,
            Dir::NorthWest => E | SE | S,
            Dir::SouthEast => N | NW | W,
            Dir::SouthWest => N | NE | E,
        }
    }
}

/// Blocked-neighbour mask of a 3×3 region (bit `row * 3 + col` set when
/// open). The centre is dropped and the rest complemented, giving bit order
/// NW, N, NE, W, E, SW, S, SE.
#[inline]
pub(crate) const fn blocked_mask(region: u16) -> u8 {
    let open = (region & 0b1111) | ((region >> 1) & 0b1111_0000);
    !(open as u8)
}

// ---------------------------------------------------------------------------
// NodeEntry
// ---------------------------------------------------------------------------

/// A queued successor: node id and arrival direction packed as
/// `(id << 3) | dir`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeEntry(u32);

impl NodeEntry {
    #[inline]
    pub const fn new(id: NodeId, dir: Dir) -> Self {
        Self((id << 3) | dir as u32)
    }

    #[inline]
    pub const fn id(self) -> NodeId {
        self.0 >> 3
    }

    #[inline]
    pub const fn dir(self) -> Dir {
        Dir::from_index(self.0)
    }
}

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// Per-cell search record.
///
/// Live iff `sid` equals the current search id. A live record is closed iff
/// `f == 0`; open records carry `f = g + h > 0`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Node {
    pub pos: Point,
    pub sid: SearchId,
    pub pred: NodeId,
    pub g: Dist,
    pub f: Dist,
}

impl Node {
    #[inline]
    pub fn is_live(&self, sid: SearchId) -> bool {
        self.sid == sid
    }

    #[inline]
    pub fn is_closed(&self) -> bool {
        self.f == 0
    }

    /// Whether a path of cost `g` improves this record in search `sid`.
    #[inline]
    pub(crate) fn can_push(&self, sid: SearchId, g: Dist) -> bool {
        self.sid != sid || g < self.g
    }

    #[inline]
    pub(crate) fn close(&mut self) {
        self.f = 0;
    }
}
