//! Bucket priority queues.
//!
//! A bucket queue holds, for every distinct open `f`, the entries waiting to
//! be expanded at that cost. Because an expansion only produces five distinct
//! non-zero cost deltas, successors arrive pre-grouped in
//! [`ScratchBuckets`] and are merged a whole bucket at a time.
//!
//! | Queue | Index | Merge order |
//! |---|---|---|
//! | [`HeapQueue`] | hash map + binary heap of distinct `f` | ascending delta |
//! | [`TreeQueue`] | AVL tree in an index arena | balanced around the median |

mod heap;
mod tree;

pub use heap::HeapQueue;
pub use tree::TreeQueue;

use crate::bucket::ScratchBuckets;
use crate::distance::{Dist, merge_order};
use crate::node::{NodeEntry, SearchId};

/// Contract shared by the bucket queues.
pub trait BucketQueue: Default {
    /// Packed order in which [`merge_bucket_array`](Self::merge_bucket_array)
    /// visits the scratch buckets. See [`crate::distance::merge_order`].
    const MERGE_ORDER: u32;

    /// Prepare for search `sid`, dropping everything from earlier searches.
    fn setup_search(&mut self, sid: SearchId);

    fn is_empty(&self) -> bool;

    /// The smallest `f` and its entries.
    fn top(&mut self) -> Option<(Dist, &[NodeEntry])>;

    /// Drop the bucket returned by [`top`](Self::top).
    fn pop(&mut self);

    /// Add `entries` to the bucket for `f`, creating it if needed.
    fn merge_bucket(&mut self, f: Dist, entries: &[NodeEntry]);

    /// Merge the five non-zero scratch buckets of an expansion at `base`,
    /// leaving them empty.
    fn merge_bucket_array(&mut self, base: Dist, scratch: &mut ScratchBuckets) {
        debug_assert!(scratch.get(0).is_empty(), "zero-delta entries must be expanded in place");
        for hash in merge_order(Self::MERGE_ORDER) {
            if scratch.get(hash).is_empty() {
                continue;
            }
            self.merge_bucket(ScratchBuckets::f_of(hash, base), scratch.get(hash));
            scratch.clear(hash);
        }
    }
}
