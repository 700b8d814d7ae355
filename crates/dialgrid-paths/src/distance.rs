//! Fixed-point octile distances.
//!
//! Costs are unsigned integers scaled by 10^10. A unit step is exactly
//! [`DIST_1`] and a diagonal step is `round(√2 × 10^10)`, so every `g` and `f`
//! is an exact sum of two atoms and equal costs compare equal.
//!
//! With the octile heuristic, the `f` of a successor minus the `f` of the node
//! being expanded takes one of six values, listed in [`RELATIVE_F`] and told
//! apart by [`f_hash`]. Both are tied to the scale: changing [`DIST_1`] means
//! re-deriving the deltas and [`F_HASH_MASK`].

use dialgrid_core::Point;

/// A path cost in fixed point.
pub type Dist = u64;

/// Cost of a cardinal step.
pub const DIST_1: Dist = 10_000_000_000;

/// Cost of a diagonal step.
pub const DIST_R2: Dist = 14_142_135_624;

/// Bit mask whose popcount separates the six relative-f deltas.
pub const F_HASH_MASK: Dist = 14_286_848;

/// The possible `f(successor) - f(parent)` deltas, indexed by [`f_hash`]:
/// `0, 2-√2, 2, 2√2-2, √2, 2√2`.
pub const RELATIVE_F: [Dist; 6] = [
    0,
    2 * DIST_1 - DIST_R2,
    2 * DIST_1,
    2 * DIST_R2 - 2 * DIST_1,
    DIST_R2,
    2 * DIST_R2,
];

/// Merge order visiting the non-zero deltas in ascending order: 1, 3, 4, 2, 5.
/// Three bits per step, lowest first.
pub const ASCENDING_ORDER: u32 = 0b101_010_100_011_001;

/// Merge order alternating around the median delta: 4, 2, 3, 5, 1.
pub const BALANCED_ORDER: u32 = 0b001_101_011_010_100;

/// Perfect hash of a relative-f delta into `0..6`.
#[inline]
pub const fn f_hash(rel_f: Dist) -> usize {
    (rel_f & F_HASH_MASK).count_ones() as usize
}

/// Decode a packed merge order into bucket indices.
#[inline]
pub fn merge_order(order: u32) -> impl Iterator<Item = usize> {
    (0..5).map(move |i| ((order >> (3 * i)) & 0b111) as usize)
}

/// Octile distance: the cost of the shortest obstacle-free path.
#[inline]
pub fn octile(a: Point, b: Point) -> Dist {
    let dx = (a.x - b.x).unsigned_abs() as Dist;
    let dy = (a.y - b.y).unsigned_abs() as Dist;
    let (lo, hi) = if dx < dy { (dx, dy) } else { (dy, dx) };
    lo * DIST_R2 + (hi - lo) * DIST_1
}

/// Convert a fixed-point cost to grid units.
#[inline]
pub fn to_units(d: Dist) -> f64 {
    d as f64 / DIST_1 as f64
}

/// Sum of Euclidean distances between consecutive waypoints.
pub fn path_length(path: &[Point]) -> f64 {
    path.windows(2)
        .fold(0.0, |acc, w| acc + (w[1] - w[0]).length())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_separates_deltas() {
        for (i, &rel) in RELATIVE_F.iter().enumerate() {
            assert_eq!(f_hash(rel), i, "delta {rel}");
        }
    }

    #[test]
    fn deltas_cover_every_move() {
        // Every (parent, successor) pair around a goal yields a listed delta.
        let goal = Point::new(0, 0);
        for py in -6..=6 {
            for px in -6..=6 {
                let parent = Point::new(px, py);
                for dy in -1..=1 {
                    for dx in -1..=1 {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let step = if dx != 0 && dy != 0 { DIST_R2 } else { DIST_1 };
                        let succ = parent.shift(dx, dy);
                        let rel = step + octile(succ, goal) - octile(parent, goal);
                        assert!(RELATIVE_F.contains(&rel), "{parent} -> {succ}: {rel}");
                    }
                }
            }
        }
    }

    #[test]
    fn diagonal_atom_is_rounded_root_two() {
        let exact = std::f64::consts::SQRT_2 * DIST_1 as f64;
        assert!((DIST_R2 as f64 - exact).abs() <= 0.5);
    }

    #[test]
    fn merge_orders() {
        let asc: Vec<usize> = merge_order(ASCENDING_ORDER).collect();
        assert_eq!(asc, [1, 3, 4, 2, 5]);
        assert!(asc.windows(2).all(|w| RELATIVE_F[w[0]] < RELATIVE_F[w[1]]));
        let bal: Vec<usize> = merge_order(BALANCED_ORDER).collect();
        assert_eq!(bal, [4, 2, 3, 5, 1]);
    }

    #[test]
    fn octile_distance() {
        let a = Point::new(1, 1);
        assert_eq!(octile(a, a), 0);
        assert_eq!(octile(a, Point::new(4, 1)), 3 * DIST_1);
        assert_eq!(octile(a, Point::new(4, 3)), 2 * DIST_R2 + DIST_1);
        assert_eq!(octile(Point::new(4, 3), a), 2 * DIST_R2 + DIST_1);
    }

    #[test]
    fn length_of_path() {
        let path = [Point::new(0, 0), Point::new(1, 1), Point::new(1, 2)];
        assert!((path_length(&path) - (std::f64::consts::SQRT_2 + 1.0)).abs() < 1e-12);
        // Positive zero, so empty paths print as `0`, not `-0`.
        assert_eq!(path_length(&[]).to_bits(), 0.0f64.to_bits());
        assert_eq!(path_length(&[Point::new(3, 3)]).to_bits(), 0.0f64.to_bits());
        assert_eq!(format!("{:.5}", path_length(&[])), "0.00000");
        assert!((to_units(DIST_R2) - std::f64::consts::SQRT_2).abs() < 1e-9);
    }
}
