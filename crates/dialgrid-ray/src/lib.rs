//! Exact line of sight on bit-packed occupancy grids.
//!
//! Rays start on a grid vertex (the corner shared by up to four cells) and
//! travel along an integer direction until they enter the interior of a
//! blocked cell, run along an edge with blocked cells on both sides, or pass
//! through a vertex pinched between two diagonally opposite blocked cells.
//!
//! | Ray | Method |
//! |---|---|
//! | cardinal | word-at-a-time scan of the two rows bordering the ray |
//! | ordinal | integer DDA, one column per step |
//!
//! Rays steeper than 45° run on a transposed copy of the table, so both
//! methods only ever step along rows.

mod caster;

pub use caster::{HitKind, RayCaster, RayHit};
