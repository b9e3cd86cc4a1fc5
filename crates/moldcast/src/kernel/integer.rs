//! Exact kernel on `i64` grid points.
//!
//! Differences of coordinates below `COORD_LIMIT` fit in `i64`, and their
//! products fit in `i128`, so every predicate is evaluated without rounding.

use std::cmp::Ordering;

use nalgebra::Vector2;

use super::{angle_order, CastingKernel, Direction, Orientation};

/// Exclusive bound on `|x|` and `|y|` for exact evaluation.
pub const COORD_LIMIT: i64 = 1 << 62;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct IntegerKernel;

#[inline]
fn in_range(p: &Vector2<i64>) -> bool {
    p.x.abs() < COORD_LIMIT && p.y.abs() < COORD_LIMIT
}

#[inline]
fn cross(ax: i128, ay: i128, bx: i128, by: i128) -> i128 {
    ax * by - ay * bx
}

#[inline]
fn is_upper(d: &Vector2<i64>) -> bool {
    d.y > 0 || (d.y == 0 && d.x > 0)
}

impl CastingKernel for IntegerKernel {
    type Point = Vector2<i64>;
    type Direction = Direction<i64>;

    #[inline]
    fn direction(&self, source: &Vector2<i64>, target: &Vector2<i64>) -> Direction<i64> {
        debug_assert!(
            in_range(source) && in_range(target),
            "coordinates must stay below 2^62 in magnitude"
        );
        Direction(target - source)
    }

    #[inline]
    fn opposite(&self, d: &Direction<i64>) -> Direction<i64> {
        Direction(-d.0)
    }

    fn orientation(&self, p: &Vector2<i64>, q: &Vector2<i64>, r: &Vector2<i64>) -> Orientation {
        let (px, py) = (p.x as i128, p.y as i128);
        let det = cross(
            q.x as i128 - px,
            q.y as i128 - py,
            r.x as i128 - px,
            r.y as i128 - py,
        );
        Orientation::from_sign(det.cmp(&0))
    }

    #[inline]
    fn compare_xy(&self, p: &Vector2<i64>, q: &Vector2<i64>) -> Ordering {
        p.x.cmp(&q.x).then(p.y.cmp(&q.y))
    }

    fn compare_angle(&self, a: &Direction<i64>, b: &Direction<i64>) -> Ordering {
        let c = cross(a.0.x as i128, a.0.y as i128, b.0.x as i128, b.0.y as i128);
        angle_order(is_upper(&a.0), is_upper(&b.0), c.cmp(&0))
    }

    #[inline]
    fn in_domain(&self, p: &Vector2<i64>) -> bool {
        in_range(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn orientation_signs() {
        let k = IntegerKernel;
        let (a, b) = (vector![0, 0], vector![4, 0]);
        assert_eq!(k.orientation(&a, &b, &vector![1, 1]), Orientation::Counterclockwise);
        assert_eq!(k.orientation(&a, &b, &vector![1, -1]), Orientation::Clockwise);
        assert_eq!(k.orientation(&a, &b, &vector![9, 0]), Orientation::Collinear);
    }

    #[test]
    fn large_coordinates_stay_exact() {
        // Near-collinear triple that overflows i64 products.
        let k = IntegerKernel;
        let big = (1i64 << 61) - 1;
        let p = vector![-big, -big];
        let q = vector![big, big];
        assert_eq!(k.orientation(&p, &q, &vector![0, 0]), Orientation::Collinear);
        assert_eq!(k.orientation(&p, &q, &vector![0, 1]), Orientation::Counterclockwise);
        let d1 = k.direction(&p, &q);
        let d2 = Direction::new(1, 1);
        assert!(k.equal_directions(&d1, &d2));
    }

    #[test]
    fn direction_and_opposite() {
        let k = IntegerKernel;
        let d = k.direction(&vector![1, 2], &vector![4, -2]);
        assert_eq!(d, Direction::new(3, -4));
        assert_eq!(k.opposite(&d), Direction::new(-3, 4));
        assert_eq!(k.compare_xy(&vector![1, 5], &vector![1, 7]), Ordering::Less);
    }

    #[test]
    fn domain_ends_below_coord_limit() {
        let k = IntegerKernel;
        assert!(k.in_domain(&vector![COORD_LIMIT - 1, -(COORD_LIMIT - 1)]));
        assert!(!k.in_domain(&vector![COORD_LIMIT, 0]));
        assert!(!k.in_domain(&vector![0, i64::MIN]));
    }
}
