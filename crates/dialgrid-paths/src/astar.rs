//! Reference A* over the [`AstarPather`] trait family.
//!
//! A plain binary-heap A*, kept as the baseline the bucket search is checked
//! and benchmarked against.

use std::cmp::Reverse;
use std::collections::BinaryHeap;

use dialgrid_core::{Point, Range};

use crate::distance::Dist;
use crate::traits::AstarPather;

/// Per-cell record, valid only while `stamp` matches the search's.
#[derive(Clone, Copy, Debug, Default)]
struct Slot {
    stamp: u32,
    g: Dist,
    parent: Option<usize>,
    closed: bool,
}

/// Binary-heap A* over the cells of a [`Range`].
///
/// Slots are stamped with a query counter, so a new query never clears the
/// whole array.
#[derive(Debug)]
pub struct AstarSearch {
    cells: Range,
    slots: Vec<Slot>,
    stamp: u32,
    open: BinaryHeap<Reverse<(Dist, usize)>>,
    succ: Vec<Point>,
    expanded: u64,
}

impl AstarSearch {
    pub fn new(cells: Range) -> Self {
        Self {
            cells,
            slots: vec![Slot::default(); cells.len()],
            stamp: 0,
            open: BinaryHeap::new(),
            succ: Vec::with_capacity(8),
            expanded: 0,
        }
    }

    #[inline]
    pub fn range(&self) -> Range {
        self.cells
    }

    /// Nodes closed by the last query.
    #[inline]
    pub fn expanded(&self) -> u64 {
        self.expanded
    }

    fn next_stamp(&mut self) -> u32 {
        self.stamp = self.stamp.wrapping_add(1);
        if self.stamp == 0 {
            self.slots.fill(Slot::default());
            self.stamp = 1;
        }
        self.stamp
    }

    /// Shortest path from `from` to `to`, both endpoints included.
    ///
    /// `None` when either endpoint is outside the range or `to` cannot be
    /// reached. A query with `from == to` yields `[from]`.
    pub fn path<P: AstarPather>(&mut self, pather: &P, from: Point, to: Point) -> Option<Vec<Point>> {
        let source = self.cells.index(from)?;
        let target = self.cells.index(to)?;
        self.expanded = 0;
        if source == target {
            return Some(vec![from]);
        }

        let stamp = self.next_stamp();
        self.slots[source] = Slot {
            stamp,
            ..Slot::default()
        };
        self.open.clear();
        self.open.push(Reverse((pather.estimate(from, to), source)));

        let mut succ = std::mem::take(&mut self.succ);
        let mut reached = false;
        while let Some(Reverse((_, i))) = self.open.pop() {
            // Stale duplicates of closed cells.
            if self.slots[i].closed {
                continue;
            }
            if i == target {
                reached = true;
                break;
            }
            self.slots[i].closed = true;
            self.expanded += 1;

            let g = self.slots[i].g;
            let p = self.cells.point(i);
            succ.clear();
            pather.neighbors(p, &mut succ);
            for &q in &succ {
                let Some(j) = self.cells.index(q) else {
                    continue;
                };
                let cand = g + pather.cost(p, q);
                let slot = &mut self.slots[j];
                if slot.stamp == stamp && (slot.closed || cand >= slot.g) {
                    continue;
                }
                *slot = Slot {
                    stamp,
                    g: cand,
                    parent: Some(i),
                    closed: false,
                };
                self.open.push(Reverse((cand + pather.estimate(q, to), j)));
            }
        }
        self.succ = succ;

        if !reached {
            log::trace!("astar: {from} -> {to} unreachable after {} expansions", self.expanded);
            return None;
        }
        let mut path: Vec<Point> = std::iter::successors(Some(target), |&i| self.slots[i].parent)
            .map(|i| self.cells.point(i))
            .collect();
        path.reverse();
        Some(path)
    }

    /// `g` of `to` after the last query, if it was reached.
    pub fn cost_to(&self, to: Point) -> Option<Dist> {
        let slot = self.slots[self.cells.index(to)?];
        (slot.stamp == self.stamp).then_some(slot.g)
    }
}
