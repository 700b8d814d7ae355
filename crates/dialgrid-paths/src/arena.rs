//! Slice arena for spilled bucket storage.
//!
//! Slices come in power-of-two capacities. Released slices go onto a free
//! list per capacity and are handed out again before the arena grows. A
//! reset drops every slice at once while keeping the backing allocation.

use crate::node::NodeEntry;

/// Smallest slice capacity, as a power of two.
const MIN_LEVEL: u8 = 3;

/// Handle to a slice of `1 << level` entries starting at `offset`.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct ArenaSlice {
    offset: u32,
    level: u8,
}

impl ArenaSlice {
    #[inline]
    pub(crate) fn capacity(self) -> usize {
        1 << self.level
    }
}

#[derive(Debug, Default)]
pub(crate) struct SliceArena {
    storage: Vec<NodeEntry>,
    free: Vec<Vec<u32>>,
}

impl SliceArena {
    /// Allocate a slice holding at least `len` entries.
    pub(crate) fn alloc(&mut self, len: usize) -> ArenaSlice {
        let level = (len.next_power_of_two().trailing_zeros() as u8).max(MIN_LEVEL);
        if let Some(offset) = self.free.get_mut(level as usize).and_then(Vec::pop) {
            return ArenaSlice { offset, level };
        }
        let offset = self.storage.len();
        let end = offset + (1 << level);
        assert!(end <= u32::MAX as usize, "slice arena exhausted");
        self.storage.resize(end, NodeEntry::default());
        ArenaSlice {
            offset: offset as u32,
            level,
        }
    }

    /// Return a slice to its free list.
    pub(crate) fn release(&mut self, slice: ArenaSlice) {
        let level = slice.level as usize;
        if self.free.len() <= level {
            self.free.resize_with(level + 1, Vec::new);
        }
        self.free[level].push(slice.offset);
    }

    /// Drop every slice. Outstanding handles become invalid.
    pub(crate) fn reset(&mut self) {
        self.storage.clear();
        self.free.iter_mut().for_each(Vec::clear);
    }

    #[inline]
    pub(crate) fn get(&self, slice: ArenaSlice) -> &[NodeEntry] {
        let start = slice.offset as usize;
        &self.storage[start..start + slice.capacity()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, slice: ArenaSlice) -> &mut [NodeEntry] {
        let start = slice.offset as usize;
        &mut self.storage[start..start + slice.capacity()]
    }

    /// Copy the first `len` entries of `src` to the start of `dst`.
    #[inline]
    pub(crate) fn copy(&mut self, src: ArenaSlice, dst: ArenaSlice, len: usize) {
        let start = src.offset as usize;
        self.storage.copy_within(start..start + len, dst.offset as usize);
    }

    /// Entries currently backed by storage.
    #[cfg(test)]
    pub(crate) fn used(&self) -> usize {
        self.storage.len()
    }
}
