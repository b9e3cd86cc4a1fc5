//! Kernel capability: exact orientation and direction-ordering predicates.
//!
//! Purpose
//! - Keep every sign decision behind one trait so the casting code never
//!   computes angles, lengths, or normalized vectors.
//! - Two backends: `IntegerKernel` (exact `i128` arithmetic on `i64` grids) and
//!   `RobustKernel` (`f64` coordinates, adaptive-precision orientation signs).
//!
//! Conventions
//! - A direction is the ray through a non-zero vector; positive multiples are equal.
//! - Directions are ordered by their angle with the positive x-axis in `[0, 2π)`.
//!   The order is derived from a half-plane test plus the sign of a cross product.
//! - `counterclockwise_in_between(d, d1, d2)` excludes both endpoints. For
//!   `d1 == d2` every direction other than `d1` is in between.

use std::cmp::Ordering;
use std::fmt;

use nalgebra::{Scalar, Vector2};

mod float;
mod integer;

pub use float::RobustKernel;
pub use integer::{IntegerKernel, COORD_LIMIT};

/// Orientation of an ordered point triple (or of a simple polygon).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Orientation {
    Clockwise,
    Collinear,
    Counterclockwise,
}

impl Orientation {
    /// Map the sign of a determinant (`Greater` = positive) to an orientation.
    #[inline]
    pub fn from_sign(sign: Ordering) -> Self {
        match sign {
            Ordering::Greater => Orientation::Counterclockwise,
            Ordering::Less => Orientation::Clockwise,
            Ordering::Equal => Orientation::Collinear,
        }
    }

    #[inline]
    pub fn reversed(self) -> Self {
        match self {
            Orientation::Clockwise => Orientation::Counterclockwise,
            Orientation::Counterclockwise => Orientation::Clockwise,
            Orientation::Collinear => Orientation::Collinear,
        }
    }
}

impl fmt::Display for Orientation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Orientation::Clockwise => "clockwise",
            Orientation::Collinear => "collinear",
            Orientation::Counterclockwise => "counterclockwise",
        };
        f.write_str(s)
    }
}

/// Direction of a non-zero 2D vector.
///
/// Equality via `PartialEq` is structural; use
/// [`CastingKernel::equal_directions`] for geometric equality.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Direction<T: Scalar>(pub Vector2<T>);

impl<T: Scalar> Direction<T> {
    #[inline]
    pub fn new(dx: T, dy: T) -> Self {
        Self(Vector2::new(dx, dy))
    }
    #[inline]
    pub fn dx(&self) -> T {
        self.0.x.clone()
    }
    #[inline]
    pub fn dy(&self) -> T {
        self.0.y.clone()
    }
}

impl<T: Scalar + fmt::Display> fmt::Display for Direction<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.0.x, self.0.y)
    }
}

/// Exact predicates consumed by the casting analyzer.
///
/// Implementors are stateless functor providers; every method is pure.
pub trait CastingKernel {
    type Point: Copy + fmt::Debug;
    type Direction: Copy + fmt::Debug;

    /// Direction of the vector `target - source`.
    fn direction(&self, source: &Self::Point, target: &Self::Point) -> Self::Direction;

    fn opposite(&self, d: &Self::Direction) -> Self::Direction;

    /// Orientation of the triple `(p, q, r)`.
    fn orientation(&self, p: &Self::Point, q: &Self::Point, r: &Self::Point) -> Orientation;

    /// Lexicographic order (x first, then y).
    fn compare_xy(&self, p: &Self::Point, q: &Self::Point) -> Ordering;

    /// Order by angle with the positive x-axis in `[0, 2π)`.
    fn compare_angle(&self, a: &Self::Direction, b: &Self::Direction) -> Ordering;

    /// Whether the predicates are exact at `p`.
    #[inline]
    fn in_domain(&self, _p: &Self::Point) -> bool {
        true
    }

    #[inline]
    fn equal_directions(&self, a: &Self::Direction, b: &Self::Direction) -> bool {
        self.compare_angle(a, b) == Ordering::Equal
    }

    /// True iff `d` lies strictly inside the counterclockwise arc from `d1` to `d2`.
    fn counterclockwise_in_between(
        &self,
        d: &Self::Direction,
        d1: &Self::Direction,
        d2: &Self::Direction,
    ) -> bool {
        let after_d1 = self.compare_angle(d1, d) == Ordering::Less;
        let before_d2 = self.compare_angle(d, d2) == Ordering::Less;
        if self.compare_angle(d1, d2) == Ordering::Less {
            after_d1 && before_d2
        } else {
            after_d1 || before_d2
        }
    }
}

/// Angle order from half-plane membership and the sign of `cross(a, b)`.
///
/// `upper` means angle in `[0, π)`: `y > 0`, or `y == 0` and `x > 0`.
#[inline]
pub(crate) fn angle_order(upper_a: bool, upper_b: bool, cross_ab: Ordering) -> Ordering {
    match (upper_a, upper_b) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        // Same half: the angular gap is below π, so the cross sign decides.
        _ => cross_ab.reverse(),
    }
}
