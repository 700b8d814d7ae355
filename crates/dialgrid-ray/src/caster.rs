use std::sync::Arc;

use dialgrid_core::{BitGrid, BitTable, GridBackend, Point};

/// What a ray ran into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HitKind {
    /// A grid vertex: a wall starting there, a pinch between two blocked
    /// corners, or a blocked cell entered exactly at its corner.
    Vertex,
    /// The ray crossed a vertical grid line into a blocked cell.
    VerticalEdge,
    /// The ray crossed a horizontal grid line into a blocked cell.
    HorizontalEdge,
}

impl HitKind {
    fn transpose(self) -> Self {
        match self {
            HitKind::Vertex => HitKind::Vertex,
            HitKind::VerticalEdge => HitKind::HorizontalEdge,
            HitKind::HorizontalEdge => HitKind::VerticalEdge,
        }
    }
}

/// First obstruction along a ray.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RayHit {
    /// Offset from the origin. For a vertex hit this is the vertex itself;
    /// for an edge hit it is the lower-coordinate end of the unit edge that
    /// was crossed.
    pub offset: Point,
    pub kind: HitKind,
    /// Whether the ray got to `origin + dir` before the obstruction. A hit
    /// exactly on that vertex counts as reaching it.
    pub reaches_target: bool,
}

impl RayHit {
    /// Absolute position of the hit for a ray cast from `origin`.
    #[inline]
    pub fn point(&self, origin: Point) -> Point {
        origin + self.offset
    }
}

/// Ray caster over a shared [`BitGrid`].
///
/// Holds a transposed copy of the grid's table for steep rays; build one per
/// grid and reuse it.
#[derive(Clone, Debug)]
pub struct RayCaster {
    grid: Arc<BitGrid>,
    transposed: BitTable,
}

impl RayCaster {
    pub fn new(grid: Arc<BitGrid>) -> Self {
        let transposed = grid.table().transposed();
        log::debug!(
            "ray caster for {}x{} grid, transposed table {}x{}",
            grid.width(),
            grid.height(),
            transposed.width(),
            transposed.height()
        );
        Self { grid, transposed }
    }

    #[inline]
    pub fn grid(&self) -> &Arc<BitGrid> {
        &self.grid
    }

    /// Cast a ray from vertex `origin` along `dir` and return the first
    /// obstruction.
    ///
    /// Vertices range over `0..=width` × `0..=height`. The grid is surrounded
    /// by blocked cells, so every ray terminates.
    ///
    /// # Panics
    ///
    /// Panics if `dir` is zero or `origin` is not a vertex of the grid.
    pub fn cast(&self, origin: Point, dir: Point) -> RayHit {
        assert!(dir != Point::ZERO, "ray from {origin} has no direction");
        let (w, h) = (self.grid.width() as i32, self.grid.height() as i32);
        assert!(
            (0..=w).contains(&origin.x) && (0..=h).contains(&origin.y),
            "ray origin {origin} is not a vertex of the {w}x{h} grid"
        );
        let pad = BitGrid::PADDING as i32;
        let u = origin.shift(pad, pad);
        let hit = if dir.y.abs() <= dir.x.abs() {
            cast_shallow(self.grid.table(), u, dir)
        } else {
            let hit = cast_shallow(&self.transposed, u.transpose(), dir.transpose());
            RayHit {
                offset: hit.offset.transpose(),
                kind: hit.kind.transpose(),
                ..hit
            }
        };
        log::trace!(
            "ray {} along {}: {:?} at {} (target reached: {})",
            origin,
            dir,
            hit.kind,
            hit.point(origin),
            hit.reaches_target
        );
        hit
    }

    /// Whether vertex `b` is visible from vertex `a`.
    pub fn line_of_sight(&self, a: Point, b: Point) -> bool {
        a == b || self.cast(a, b - a).reaches_target
    }
}

/// Cast on `table` from padded vertex `u`, with `|dir.y| <= |dir.x|`.
fn cast_shallow(table: &BitTable, u: Point, dir: Point) -> RayHit {
    if dir.y != 0 {
        return walk_ordinal(table, u, dir);
    }
    let len = if dir.x > 0 {
        scan_forward(table, u)
    } else {
        scan_backward(table, u)
    };
    RayHit {
        offset: Point::new(len * dir.x.signum(), 0),
        kind: HitKind::Vertex,
        reaches_target: len >= dir.x.abs(),
    }
}

/// Stopping vertices for a horizontal ray, given the blocked bits of the
/// rows above (`a`) and below (`b`). Bit `i` covers the column starting at
/// vertex `i`; the carries hold the column just before the window.
#[inline]
fn stops(a: u64, b: u64, carry_a: u64, carry_b: u64) -> u64 {
    let wall = a & b;
    let pinch = (((a << 1) | carry_a) & b) | (a & ((b << 1) | carry_b));
    wall | pinch
}

fn scan_forward(table: &BitTable, u: Point) -> i32 {
    let (x, y) = (u.x as usize, u.y as usize);
    let above = table.bit_index(x, y - 1);
    let below = table.bit_index(x, y);
    let (mut carry_a, mut carry_b) = (0, 0);
    let mut len = 0;
    loop {
        let a = !table.window(above + len);
        let b = !table.window(below + len);
        let hit = stops(a, b, carry_a, carry_b);
        if hit != 0 {
            return (len + hit.trailing_zeros() as usize) as i32;
        }
        carry_a = a >> (u64::BITS - 1);
        carry_b = b >> (u64::BITS - 1);
        len += u64::BITS as usize;
    }
}

fn scan_backward(table: &BitTable, u: Point) -> i32 {
    let (x, y) = (u.x as usize, u.y as usize);
    let above = table.bit_index(x - 1, y - 1);
    let below = table.bit_index(x - 1, y);
    let (mut carry_a, mut carry_b) = (0, 0);
    let mut len = 0;
    loop {
        let a = !table.window_rev(above - len);
        let b = !table.window_rev(below - len);
        let hit = stops(a, b, carry_a, carry_b);
        if hit != 0 {
            return (len + hit.trailing_zeros() as usize) as i32;
        }
        carry_a = a >> (u64::BITS - 1);
        carry_b = b >> (u64::BITS - 1);
        len += u64::BITS as usize;
    }
}

/// DDA along x. Column `k` and row `j` count cells away from the origin, and
/// `frac / run` is the ray's height inside the current row at the column's
/// far edge.
fn walk_ordinal(table: &BitTable, u: Point, dir: Point) -> RayHit {
    let (sx, sy) = (dir.x.signum(), dir.y.signum());
    let (run, rise) = (dir.x.abs() as i64, dir.y.abs() as i64);
    let cell_x = |k: i32| if sx > 0 { u.x + k } else { u.x - 1 - k };
    let cell_y = |j: i32| if sy > 0 { u.y + j } else { u.y - 1 - j };
    let blocked = |k: i32, j: i32| !table.get(cell_x(k) as usize, cell_y(j) as usize);
    let hit = |offset: Point, kind: HitKind, reached: i32| RayHit {
        offset,
        kind,
        reaches_target: reached as i64 >= run,
    };

    let (mut k, mut j, mut frac) = (0i32, 0i32, 0i64);
    loop {
        if blocked(k, j) {
            // Only the first cell can be entered at a corner here; later
            // corners test their diagonal cell below.
            if frac == 0 {
                return hit(Point::new(sx * k, sy * j), HitKind::Vertex, k);
            }
            let low_y = if sy > 0 { j } else { -j - 1 };
            return hit(Point::new(sx * k, low_y), HitKind::VerticalEdge, k);
        }
        frac += rise;
        if frac > run {
            frac -= run;
            j += 1;
            if blocked(k, j) {
                let low_x = if sx > 0 { k } else { -k - 1 };
                return hit(Point::new(low_x, sy * j), HitKind::HorizontalEdge, k);
            }
        } else if frac == run {
            frac = 0;
            let pinched = blocked(k + 1, j) && blocked(k, j + 1);
            if pinched || blocked(k + 1, j + 1) {
                let corner = Point::new(sx * (k + 1), sy * (j + 1));
                return hit(corner, HitKind::Vertex, k + 1);
            }
            j += 1;
        }
        k += 1;
    }
}
