//! Integer geometry: [`Point`] and [`Range`].
//!
//! Cells and vertices share one coordinate type. X grows right and Y grows
//! down; cell `(x, y)` is the unit square whose top-left vertex is `(x, y)`.

use std::cmp::Ordering;
use std::fmt;
use std::ops::{Add, Neg, Sub};

/// A cell, a vertex or a displacement between them.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const ZERO: Self = Self::new(0, 0);

    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Swap the axes.
    #[inline]
    pub const fn transpose(self) -> Self {
        Self::new(self.y, self.x)
    }

    #[inline]
    pub const fn abs(self) -> Self {
        Self::new(self.x.abs(), self.y.abs())
    }

    /// Per-axis sign, each component in `-1..=1`.
    #[inline]
    pub const fn signum(self) -> Self {
        Self::new(self.x.signum(), self.y.signum())
    }

    /// Whether this displacement runs along one of the eight octile
    /// directions (any length, zero included).
    #[inline]
    pub const fn is_octile(self) -> bool {
        self.x == 0 || self.y == 0 || self.x.abs() == self.y.abs()
    }

    /// Euclidean length.
    #[inline]
    pub fn length(self) -> f64 {
        f64::from(self.x).hypot(f64::from(self.y))
    }
}

/// Row-major: by `y`, then by `x`.
impl Ord for Point {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.y, self.x).cmp(&(other.y, other.x))
    }
}

impl PartialOrd for Point {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.shift(rhs.x, rhs.y)
    }
}

impl Sub for Point {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.shift(-rhs.x, -rhs.y)
    }
}

impl Neg for Point {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

impl From<(i32, i32)> for Point {
    #[inline]
    fn from((x, y): (i32, i32)) -> Self {
        Self::new(x, y)
    }
}

/// Half-open rectangle of cells, `min` inclusive and `max` exclusive.
///
/// Cells are numbered row-major from `min`; [`index`](Range::index) and
/// [`point`](Range::point) convert between the two.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    #[inline]
    pub const fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    /// `[0, width) × [0, height)`.
    #[inline]
    pub const fn with_size(width: u32, height: u32) -> Self {
        Self::new(Point::ZERO, Point::new(width as i32, height as i32))
    }

    #[inline]
    pub const fn width(self) -> i32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub const fn height(self) -> i32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub const fn is_empty(self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Number of cells.
    #[inline]
    pub const fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    #[inline]
    pub const fn contains(self, p: Point) -> bool {
        p.x >= self.min.x && p.x < self.max.x && p.y >= self.min.y && p.y < self.max.y
    }

    /// Row-major number of `p`, or `None` outside the range.
    #[inline]
    pub fn index(self, p: Point) -> Option<usize> {
        self.contains(p).then(|| {
            let d = p - self.min;
            d.y as usize * self.width() as usize + d.x as usize
        })
    }

    /// The cell numbered `i`. `i` must be below [`len`](Range::len).
    #[inline]
    pub fn point(self, i: usize) -> Point {
        let w = self.width() as usize;
        self.min.shift((i % w) as i32, (i / w) as i32)
    }

    /// Cells in row-major order.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: 0,
            end: self.len(),
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;

    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.min, self.max)
    }
}

/// Row-major iterator over a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: usize,
    end: usize,
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        (self.next < self.end).then(|| {
            self.next += 1;
            self.range.point(self.next - 1)
        })
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.end - self.next;
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn point_ops() {
        let a = Point::new(1, 2);
        let b = Point::new(3, -4);
        assert_eq!(a + b, Point::new(4, -2));
        assert_eq!(b - a, Point::new(2, -6));
        assert_eq!((b - a).abs(), Point::new(2, 6));
        assert_eq!(b.signum(), Point::new(1, -1));
        assert_eq!(a.transpose(), Point::new(2, 1));
        assert_eq!(-b, Point::new(-3, 4));
        assert_eq!(a + -a, Point::ZERO);
        assert_eq!(Point::from((7, 8)), Point::new(7, 8));
        assert_eq!(a.to_string(), "(1, 2)");
    }

    #[test]
    fn octile_displacements() {
        assert!(Point::new(0, 5).is_octile());
        assert!(Point::new(-3, 0).is_octile());
        assert!(Point::new(-3, 3).is_octile());
        assert!(Point::ZERO.is_octile());
        assert!(!Point::new(2, 1).is_octile());
        assert!((Point::new(3, 4).length() - 5.0).abs() < 1e-12);
        assert!((Point::new(1, -1).length() - std::f64::consts::SQRT_2).abs() < 1e-12);
    }

    #[test]
    fn points_sort_row_major() {
        let mut v = vec![Point::new(1, 1), Point::new(0, 2), Point::new(2, 0)];
        v.sort();
        assert_eq!(v, [Point::new(2, 0), Point::new(1, 1), Point::new(0, 2)]);
    }

    #[test]
    fn range_bounds() {
        let r = Range::with_size(3, 2);
        assert_eq!((r.width(), r.height(), r.len()), (3, 2, 6));
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 0)));
        assert!(!r.contains(Point::new(0, -1)));
        let flat = Range::new(Point::new(4, 4), Point::new(2, 9));
        assert!(flat.is_empty());
        assert_eq!(flat.len(), 0);
        assert_eq!(flat.iter().count(), 0);
    }

    #[test]
    fn index_and_point_agree() {
        let r = Range::new(Point::new(2, -3), Point::new(7, 1));
        assert_eq!(r.iter().len(), 20);
        for (i, p) in r.iter().enumerate() {
            assert_eq!(r.index(p), Some(i));
            assert_eq!(r.point(i), p);
        }
        assert_eq!(r.index(Point::new(0, 0)), None);
        assert_eq!(r.iter().next(), Some(Point::new(2, -3)));
        assert_eq!(r.iter().last(), Some(Point::new(6, 0)));
    }
}

#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn range_round_trip() {
        let r = Range::new(Point::new(-3, 7), Point::new(4, 9));
        let json = serde_json::to_string(&r).unwrap();
        let back: Range = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
