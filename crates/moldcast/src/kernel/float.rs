//! `f64` kernel with adaptive-precision orientation signs.
//!
//! Signs of `orient2d` are exact for the given floating-point inputs (Shewchuk's
//! predicates via the `robust` crate). Edge directions are `target - source`;
//! that subtraction is exact on integer or dyadic grids of moderate range, and
//! rounds otherwise. All analyzer answers are exact with respect to the rounded
//! edge directions.
//!
//! NaN coordinates compare as `Equal`/`Collinear`; `in_domain` rejects non-finite
//! points so validation catches them.

use std::cmp::Ordering;

use nalgebra::Vector2;
use robust::{orient2d, Coord};

use super::{angle_order, CastingKernel, Direction, Orientation};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RobustKernel;

#[inline]
fn coord(p: &Vector2<f64>) -> Coord<f64> {
    Coord { x: p.x, y: p.y }
}

#[inline]
fn sign(v: f64) -> Ordering {
    v.partial_cmp(&0.0).unwrap_or(Ordering::Equal)
}

#[inline]
fn is_upper(d: &Vector2<f64>) -> bool {
    d.y > 0.0 || (d.y == 0.0 && d.x > 0.0)
}

impl CastingKernel for RobustKernel {
    type Point = Vector2<f64>;
    type Direction = Direction<f64>;

    #[inline]
    fn direction(&self, source: &Vector2<f64>, target: &Vector2<f64>) -> Direction<f64> {
        Direction(target - source)
    }

    #[inline]
    fn opposite(&self, d: &Direction<f64>) -> Direction<f64> {
        Direction(-d.0)
    }

    #[inline]
    fn orientation(&self, p: &Vector2<f64>, q: &Vector2<f64>, r: &Vector2<f64>) -> Orientation {
        Orientation::from_sign(sign(orient2d(coord(p), coord(q), coord(r))))
    }

    #[inline]
    fn compare_xy(&self, p: &Vector2<f64>, q: &Vector2<f64>) -> Ordering {
        match p.x.partial_cmp(&q.x).unwrap_or(Ordering::Equal) {
            Ordering::Equal => p.y.partial_cmp(&q.y).unwrap_or(Ordering::Equal),
            o => o,
        }
    }

    fn compare_angle(&self, a: &Direction<f64>, b: &Direction<f64>) -> Ordering {
        let origin = Coord { x: 0.0, y: 0.0 };
        let c = orient2d(origin, coord(&a.0), coord(&b.0));
        angle_order(is_upper(&a.0), is_upper(&b.0), sign(c))
    }

    #[inline]
    fn in_domain(&self, p: &Vector2<f64>) -> bool {
        p.x.is_finite() && p.y.is_finite()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::vector;

    #[test]
    fn near_degenerate_orientation_is_exact() {
        // Classic failure case for naive evaluation: points on a line through
        // tiny perturbations of 0.5.
        let k = RobustKernel;
        let p = vector![0.5, 0.5];
        let q = vector![12.0, 12.0];
        let r = vector![24.0, 24.0];
        assert_eq!(k.orientation(&p, &q, &r), Orientation::Collinear);
        let r_up = vector![24.0, 24.0 + f64::EPSILON * 16.0];
        assert_eq!(k.orientation(&p, &q, &r_up), Orientation::Counterclockwise);
    }

    #[test]
    fn non_finite_points_are_outside_the_domain() {
        let k = RobustKernel;
        assert!(k.in_domain(&vector![1e300, -0.5]));
        assert!(!k.in_domain(&vector![f64::NAN, 0.0]));
        assert!(!k.in_domain(&vector![0.0, f64::NEG_INFINITY]));
    }

    #[test]
    fn angle_order_matches_integer_kernel_on_grid() {
        let f = RobustKernel;
        let i = super::super::IntegerKernel;
        let raw = [(3, 0), (2, 1), (0, 4), (-1, 3), (-2, 0), (-3, -1), (0, -1), (5, -1)];
        for &(ax, ay) in &raw {
            for &(bx, by) in &raw {
                let fa = Direction::new(ax as f64, ay as f64);
                let fb = Direction::new(bx as f64, by as f64);
                assert_eq!(
                    f.compare_angle(&fa, &fb),
                    i.compare_angle(&Direction::new(ax, ay), &Direction::new(bx, by))
                );
            }
        }
    }
}
