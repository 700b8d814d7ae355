//! **dialgrid-core** - geometry and occupancy grids for octile pathfinding.
//!
//! This crate provides the foundational types used across the *dialgrid*
//! workspace: integer geometry primitives, a packed bit table, and the
//! [`GridBackend`] trait with its bit-packed and byte-per-cell
//! implementations. Grids are immutable after construction and are meant to
//! be shared (`Arc`) between search drivers.

pub mod bits;
pub mod error;
pub mod geom;
pub mod grid;

pub use bits::BitTable;
pub use error::{GridError, MAX_NODES};
pub use geom::{Point, Range, RangeIter};
pub use grid::{BitGrid, ByteGrid, GridBackend, GridMap, is_open_tile};
