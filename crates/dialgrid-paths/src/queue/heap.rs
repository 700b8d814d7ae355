use std::collections::BinaryHeap;

use rustc_hash::FxHashMap;

use super::BucketQueue;
use crate::arena::SliceArena;
use crate::bucket::NodeBucket;
use crate::distance::{ASCENDING_ORDER, Dist};
use crate::node::{NodeEntry, SearchId};

/// A distinct open `f` and the slot of its bucket, ordered by `f` for use in
/// `BinaryHeap`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
struct QueueValue {
    f: Dist,
    slot: u32,
}

impl Ord for QueueValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.cmp(&self.f)
    }
}

impl PartialOrd for QueueValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// Hash map from `f` to a bucket slot, plus a min-heap of the distinct `f`
/// values open in the current search.
///
/// Slots outlive searches: a slot stamped with an older search id is stale
/// and is claimed afresh the first time the current search fills it.
#[derive(Debug, Default)]
pub struct HeapQueue {
    slots: FxHashMap<Dist, u32>,
    buckets: Vec<NodeBucket>,
    heap: BinaryHeap<QueueValue>,
    arena: SliceArena,
    sid: SearchId,
}

impl HeapQueue {
    /// Number of bucket slots allocated so far.
    pub fn slot_count(&self) -> usize {
        self.buckets.len()
    }
}

impl BucketQueue for HeapQueue {
    const MERGE_ORDER: u32 = ASCENDING_ORDER;

    fn setup_search(&mut self, sid: SearchId) {
        if sid <= self.sid {
            // The search id wrapped; old stamps could collide with new ones.
            for b in &mut self.buckets {
                b.claim(SearchId::NONE);
            }
        }
        self.sid = sid;
        self.heap.clear();
        self.arena.reset();
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn top(&mut self) -> Option<(Dist, &[NodeEntry])> {
        let v = self.heap.peek()?;
        let bucket = &self.buckets[v.slot as usize];
        Some((v.f, bucket.entries(&self.arena)))
    }

    fn pop(&mut self) {
        if let Some(v) = self.heap.pop() {
            self.buckets[v.slot as usize].release(&mut self.arena);
        }
    }

    fn merge_bucket(&mut self, f: Dist, entries: &[NodeEntry]) {
        let Self {
            slots,
            buckets,
            heap,
            arena,
            sid,
        } = self;
        let slot = *slots.entry(f).or_insert_with(|| {
            buckets.push(NodeBucket::default());
            (buckets.len() - 1) as u32
        });
        let bucket = &mut buckets[slot as usize];
        if bucket.sid != *sid {
            bucket.claim(*sid);
            heap.push(QueueValue { f, slot });
        }
        bucket.append(entries, arena);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Dir;

    #[test]
    fn slots_are_reused_across_searches() {
        let mut q = HeapQueue::default();
        for sid in 1..=3 {
            q.setup_search(SearchId(sid));
            for f in [10, 20, 30] {
                q.merge_bucket(f, &[NodeEntry::new(sid, Dir::East)]);
            }
        }
        assert_eq!(q.slot_count(), 3);
        assert_eq!(q.top().map(|(f, e)| (f, e.len())), Some((10, 1)));
    }

    #[test]
    fn heap_orders_by_smallest_f() {
        let mut heap = BinaryHeap::new();
        heap.push(QueueValue { f: 5, slot: 0 });
        heap.push(QueueValue { f: 2, slot: 1 });
        heap.push(QueueValue { f: 9, slot: 2 });
        assert_eq!(heap.pop().map(|v| v.f), Some(2));
        assert_eq!(heap.pop().map(|v| v.f), Some(5));
    }
}
