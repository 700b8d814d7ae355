//! Octile shortest paths on occupancy grids.
//!
//! The main entry point is [`Search`], a best-first search that replaces the
//! usual binary heap with a Dial's-style bucket queue. Costs are fixed-point
//! integers (see [`distance`]), and with the octile heuristic an expansion
//! can only raise `f` by one of six known amounts. Successors are therefore
//! grouped into six scratch buckets and merged into the queue a whole bucket
//! at a time.
//!
//! All per-query state lives in the [`Search`] value and is invalidated by
//! bumping a search id, so repeated queries incur no allocations after
//! warm-up.
//!
//! # Pieces
//!
//! | Item | Role |
//! |---|---|
//! | [`Search`] | driver: seeding, expand/merge/pop loop, path reconstruction |
//! | [`BucketQueue`] | [`HeapQueue`] (hash + heap) or [`TreeQueue`] (AVL) |
//! | [`AstarSearch`] | reference binary-heap A* over [`AstarPather`] |
//! | [`validate_path`] | checks waypoints and segments against a grid |
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | neighbour enumeration |
//! | [`WeightedPather`] : [`Pather`] | edge costs |
//! | [`AstarPather`] : [`WeightedPather`] | [`AstarSearch`] |

mod arena;
mod astar;
mod bucket;
pub mod distance;
mod expander;
mod neighbors;
mod node;
mod queue;
mod search;
mod state;
mod traits;
mod validate;

pub use astar::AstarSearch;
pub use bucket::{INLINE_CAPACITY, ScratchBuckets};
pub use distance::{Dist, octile, path_length};
pub use neighbors::OctilePather;
pub use node::{Dir, Node, NodeEntry, NodeId, SearchId};
pub use queue::{BucketQueue, HeapQueue, TreeQueue};
pub use search::{Search, SearchStats};
pub use traits::{AstarPather, Pather, WeightedPather};
pub use validate::{InvalidPath, validate_path};
