//! Value types produced by the analyzer.

use std::fmt;

use crate::kernel::CastingKernel;

/// Per-edge direction pair.
///
/// The closed counterclockwise arc `[first, second]` is the half-circle of
/// directions in which the edge moves away from, or slides along, the mold
/// wall. The open arc from `second` to `first` is the edge's collision arc.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OuterCircle<D> {
    pub first: D,
    pub second: D,
}

impl<D> OuterCircle<D> {
    /// `d` lies in the closed arc `[first, second]` (the edge does not block `d`).
    #[inline]
    pub fn contains<K>(&self, kernel: &K, d: &D) -> bool
    where
        K: CastingKernel<Direction = D>,
    {
        !kernel.counterclockwise_in_between(d, &self.second, &self.first)
    }
}

/// Closed counterclockwise arc of directions from `first` to `last`.
///
/// `first == last` denotes a single direction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DirectionRange<D> {
    pub first: D,
    pub last: D,
}

impl<D> DirectionRange<D> {
    pub fn contains<K>(&self, kernel: &K, d: &D) -> bool
    where
        K: CastingKernel<Direction = D>,
    {
        if kernel.equal_directions(d, &self.first) || kernel.equal_directions(d, &self.last) {
            return true;
        }
        !kernel.equal_directions(&self.first, &self.last)
            && kernel.counterclockwise_in_between(d, &self.first, &self.last)
    }

    /// Geometric equality of both endpoints.
    pub fn same_as<K>(&self, kernel: &K, other: &Self) -> bool
    where
        K: CastingKernel<Direction = D>,
    {
        kernel.equal_directions(&self.first, &other.first)
            && kernel.equal_directions(&self.last, &other.last)
    }
}

/// A feasible top edge with its closed range of pullout directions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TopEdge<D> {
    pub edge: usize,
    pub range: DirectionRange<D>,
}

/// `edge dx1 dy1 dx2 dy2`, the case-file line format.
impl<D: fmt::Display> fmt::Display for TopEdge<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.edge, self.range.first, self.range.last)
    }
}
