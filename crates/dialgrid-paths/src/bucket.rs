//! Node buckets: all queued entries sharing one `f` value.

use crate::arena::{ArenaSlice, SliceArena};
use crate::distance::{Dist, RELATIVE_F};
use crate::node::{NodeEntry, SearchId};

/// Entries a bucket holds before spilling into the arena.
pub const INLINE_CAPACITY: usize = 4;

/// Initial capacity of each scratch bucket.
const SCRATCH_RESERVE: usize = 64;

#[derive(Copy, Clone, Debug)]
enum Storage {
    Inline {
        len: u8,
        items: [NodeEntry; INLINE_CAPACITY],
    },
    Spilled {
        slice: ArenaSlice,
        len: u32,
    },
}

impl Default for Storage {
    fn default() -> Self {
        Storage::Inline {
            len: 0,
            items: [NodeEntry::default(); INLINE_CAPACITY],
        }
    }
}

/// A queue bucket. Small buckets live inline; larger ones own an arena
/// slice of the queue they belong to.
#[derive(Copy, Clone, Debug, Default)]
pub(crate) struct NodeBucket {
    pub(crate) sid: SearchId,
    storage: Storage,
}

impl NodeBucket {
    #[inline]
    pub(crate) fn len(&self) -> usize {
        match self.storage {
            Storage::Inline { len, .. } => len as usize,
            Storage::Spilled { len, .. } => len as usize,
        }
    }

    #[inline]
    pub(crate) fn entries<'a>(&'a self, arena: &'a SliceArena) -> &'a [NodeEntry] {
        match &self.storage {
            Storage::Inline { len, items } => &items[..*len as usize],
            Storage::Spilled { slice, len } => &arena.get(*slice)[..*len as usize],
        }
    }

    /// Claim the bucket for search `sid`, forgetting its contents without
    /// touching the arena. Used for buckets whose arena has been reset.
    #[inline]
    pub(crate) fn claim(&mut self, sid: SearchId) {
        self.sid = sid;
        self.storage = Storage::default();
    }

    /// Give any spilled slice back to the arena and empty the bucket.
    pub(crate) fn release(&mut self, arena: &mut SliceArena) {
        if let Storage::Spilled { slice, .. } = self.storage {
            arena.release(slice);
        }
        self.sid = SearchId::NONE;
        self.storage = Storage::default();
    }

    pub(crate) fn append(&mut self, new: &[NodeEntry], arena: &mut SliceArena) {
        let old_len = self.len();
        let total = old_len + new.len();
        let fits = match self.storage {
            Storage::Inline { .. } => total <= INLINE_CAPACITY,
            Storage::Spilled { slice, .. } => total <= slice.capacity(),
        };
        if fits {
            match &mut self.storage {
                Storage::Inline { len, items } => {
                    items[old_len..total].copy_from_slice(new);
                    *len = total as u8;
                }
                Storage::Spilled { slice, len } => {
                    arena.get_mut(*slice)[old_len..total].copy_from_slice(new);
                    *len = total as u32;
                }
            }
            return;
        }

        let grown = arena.alloc(total.max(2 * old_len));
        match self.storage {
            Storage::Inline { items, .. } => {
                arena.get_mut(grown)[..old_len].copy_from_slice(&items[..old_len]);
            }
            Storage::Spilled { slice, .. } => {
                arena.copy(slice, grown, old_len);
                arena.release(slice);
            }
        }
        arena.get_mut(grown)[old_len..total].copy_from_slice(new);
        self.storage = Storage::Spilled {
            slice: grown,
            len: total as u32,
        };
    }
}

// ---------------------------------------------------------------------------
// Scratch buckets
// ---------------------------------------------------------------------------

/// The six successor lists filled by one expansion, indexed by the hash of
/// their relative `f`.
#[derive(Debug)]
pub struct ScratchBuckets {
    buckets: [Vec<NodeEntry>; 6],
}

impl Default for ScratchBuckets {
    fn default() -> Self {
        Self {
            buckets: std::array::from_fn(|_| Vec::with_capacity(SCRATCH_RESERVE)),
        }
    }
}

impl ScratchBuckets {
    #[inline]
    pub(crate) fn push(&mut self, hash: usize, entry: NodeEntry) {
        self.buckets[hash].push(entry);
    }

    /// Entries of bucket `hash`.
    #[inline]
    pub fn get(&self, hash: usize) -> &[NodeEntry] {
        &self.buckets[hash]
    }

    /// Absolute `f` of bucket `hash` after expanding at `base`.
    #[inline]
    pub fn f_of(hash: usize, base: Dist) -> Dist {
        base + RELATIVE_F[hash]
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.buckets.iter().all(Vec::is_empty)
    }

    #[inline]
    pub fn clear(&mut self, hash: usize) {
        self.buckets[hash].clear();
    }

    pub(crate) fn clear_all(&mut self) {
        self.buckets.iter_mut().for_each(Vec::clear);
    }
}
