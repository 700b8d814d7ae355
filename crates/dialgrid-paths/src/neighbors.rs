use dialgrid_core::{GridBackend, Point};

use crate::distance::{DIST_1, DIST_R2, Dist, octile};
use crate::node::Dir;
use crate::traits::{AstarPather, Pather, WeightedPather};

/// Octile moves over any grid backend: cardinal steps into open cells and
/// diagonal steps whose two flanking cells are open too.
#[derive(Debug, Clone, Copy)]
pub struct OctilePather<'a, G: GridBackend + ?Sized> {
    grid: &'a G,
}

impl<'a, G: GridBackend + ?Sized> OctilePather<'a, G> {
    pub fn new(grid: &'a G) -> Self {
        Self { grid }
    }

    /// Whether the single step `from -> from + d` is legal.
    pub fn can_step(&self, from: Point, d: Point) -> bool {
        let open = |p: Point| self.grid.traversable(p);
        if !open(from + d) {
            return false;
        }
        d.x == 0 || d.y == 0 || (open(from.shift(d.x, 0)) && open(from.shift(0, d.y)))
    }
}

impl<G: GridBackend + ?Sized> Pather for OctilePather<'_, G> {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for dir in Dir::ALL {
            let d = dir.offset();
            if self.can_step(p, d) {
                buf.push(p + d);
            }
        }
    }
}

impl<G: GridBackend + ?Sized> WeightedPather for OctilePather<'_, G> {
    fn cost(&self, from: Point, to: Point) -> Dist {
        if from.x != to.x && from.y != to.y {
            DIST_R2
        } else {
            DIST_1
        }
    }
}

impl<G: GridBackend + ?Sized> AstarPather for OctilePather<'_, G> {
    fn estimate(&self, from: Point, to: Point) -> Dist {
        octile(from, to)
    }
}

#[cfg(test)]
mod tests {
    use dialgrid_core::{BitGrid, GridMap};

    use super::*;

    #[test]
    fn no_corner_cutting() {
        let grid: BitGrid = GridMap::from_rows(&["..", "#."]).unwrap().to_grid().unwrap();
        let pather = OctilePather::new(&grid);
        let mut buf = Vec::new();
        pather.neighbors(Point::new(0, 0), &mut buf);
        assert_eq!(buf, [Point::new(1, 0)]);
        buf.clear();
        pather.neighbors(Point::new(1, 1), &mut buf);
        assert_eq!(buf, [Point::new(1, 0)]);
        buf.clear();
        pather.neighbors(Point::new(1, 0), &mut buf);
        buf.sort();
        assert_eq!(buf, [Point::new(0, 0), Point::new(1, 1)]);
    }

    #[test]
    fn costs_and_estimate() {
        let grid: BitGrid = GridMap::open(4, 4).to_grid().unwrap();
        let pather = OctilePather::new(&grid);
        assert_eq!(pather.cost(Point::new(0, 0), Point::new(1, 1)), DIST_R2);
        assert_eq!(pather.cost(Point::new(0, 0), Point::new(0, 1)), DIST_1);
        assert_eq!(pather.estimate(Point::new(0, 0), Point::new(3, 1)), DIST_R2 + 2 * DIST_1);
        let mut buf = Vec::new();
        pather.neighbors(Point::new(1, 1), &mut buf);
        assert_eq!(buf.len(), 8);
    }
}
