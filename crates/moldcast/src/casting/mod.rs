//! Pullout-direction analysis for single-mold translational casting.
//!
//! Purpose
//! - Decide whether a polygon can be pulled out of a mold shaped like its
//!   interior through a given top edge in a given direction, find the unique
//!   top edge for a direction, and compute the closed range of pullout
//!   directions of one edge.
//!
//! Model
//! - Every edge `e` with direction `s` gets an outer circle `(first, second)`:
//!   `(s, -s)` for counterclockwise polygons and `(-s, s)` for clockwise ones.
//!   A direction `d` is *ordered* for `e` when it lies in the closed arc
//!   `[first, second]`, i.e. moving along `d` never pushes `e` into the mold.
//! - `d` is a pullout direction through top edge `i` iff `d` is ordered for
//!   every edge except `i`, and not ordered for `i` (the part leaves through
//!   the open top).
//! - Only kernel predicates are evaluated; no angle is ever computed.
//!
//! Preconditions
//! - Simple polygon, at least three vertices, no three consecutive collinear
//!   vertices. Checked by `Polygon::validate` in debug builds only.
//!
//! Complexity
//! - Each entry point is O(n) with one betweenness test per edge.

use crate::kernel::{CastingKernel, Orientation};
use crate::polygon::{debug_validate, Polygon};

mod types;

pub use types::{DirectionRange, OuterCircle, TopEdge};

/// Outer circle of the edge `source → target` in a polygon of the given orientation.
#[inline]
pub fn outer_circle<K: CastingKernel>(
    kernel: &K,
    source: &K::Point,
    target: &K::Point,
    orientation: Orientation,
) -> OuterCircle<K::Direction> {
    let s = kernel.direction(source, target);
    let reversed = kernel.opposite(&s);
    match orientation {
        Orientation::Clockwise => OuterCircle {
            first: reversed,
            second: s,
        },
        _ => OuterCircle {
            first: s,
            second: reversed,
        },
    }
}

/// Outer circles of all edges, in edge order.
pub(crate) fn outer_circles<K: CastingKernel>(
    pgn: &Polygon<K::Point>,
    kernel: &K,
) -> Vec<OuterCircle<K::Direction>> {
    let orientation = pgn.orientation(kernel);
    pgn.edges()
        .map(|e| outer_circle(kernel, &e.source, &e.target, orientation))
        .collect()
}

/// Can `pgn` be pulled out along `d` with edge `top` as the top edge?
///
/// Returns `false` for an out-of-range `top`.
pub fn is_pullout_direction<K: CastingKernel>(
    pgn: &Polygon<K::Point>,
    top: usize,
    d: &K::Direction,
    kernel: &K,
) -> bool {
    debug_validate(pgn, kernel);
    let orientation = pgn.orientation(kernel);
    for e in pgn.edges() {
        let circle = outer_circle(kernel, &e.source, &e.target, orientation);
        let is_ordered = circle.contains(kernel, d);
        if is_ordered == (e.index == top) {
            return false;
        }
    }
    true
}

/// The unique top edge through which `pgn` can be pulled out along `d`.
///
/// `None` when more than one edge would have to be open (no single top edge
/// works for `d`). At least one edge always blocks nothing along `d`; zero
/// candidates is a logic error and asserted in debug builds.
pub fn find_top_edge<K: CastingKernel>(
    pgn: &Polygon<K::Point>,
    d: &K::Direction,
    kernel: &K,
) -> Option<usize> {
    debug_validate(pgn, kernel);
    let orientation = pgn.orientation(kernel);
    let mut top = None;
    for e in pgn.edges() {
        let circle = outer_circle(kernel, &e.source, &e.target, orientation);
        if !circle.contains(kernel, d) {
            if top.is_some() {
                return None;
            }
            top = Some(e.index);
        }
    }
    debug_assert!(
        top.is_some(),
        "some edge must face direction {d:?}; predicates are inconsistent"
    );
    top
}

/// Closed range of pullout directions through edge `top`, or `None` if
/// `top` is not a valid top edge.
///
/// The range is the intersection, inside the open collision arc of `top`, of
/// the closed half-circles `[first, second]` of all other edges. Its endpoints
/// are outer-circle directions of the bounding edges.
pub fn pullout_directions<K: CastingKernel>(
    pgn: &Polygon<K::Point>,
    top: usize,
    kernel: &K,
) -> Option<DirectionRange<K::Direction>> {
    debug_validate(pgn, kernel);
    let circles = outer_circles(pgn, kernel);
    let own = circles.get(top)?;
    // Open arc (start, end), swept counterclockwise.
    let (start, end) = (own.second, own.first);
    let inside = |d: &K::Direction| kernel.counterclockwise_in_between(d, &start, &end);
    // Order of two directions inside the arc.
    let before = |a: &K::Direction, b: &K::Direction| {
        kernel.counterclockwise_in_between(a, &start, b)
    };

    let mut lo: Option<K::Direction> = None;
    let mut hi: Option<K::Direction> = None;
    for (j, circle) in circles.iter().enumerate() {
        if j == top {
            continue;
        }
        if inside(&circle.first) {
            // [first, end) survives.
            if lo.as_ref().is_none_or(|l| before(l, &circle.first)) {
                lo = Some(circle.first);
            }
        } else if inside(&circle.second) {
            // (start, second] survives.
            if hi.as_ref().is_none_or(|h| before(&circle.second, h)) {
                hi = Some(circle.second);
            }
        } else if kernel.equal_directions(&circle.first, &end) {
            // Parallel edge with the same heading: its half-circle is the
            // closure of the complement, nothing survives.
            return None;
        }
        // Otherwise the edge runs antiparallel and its half-circle covers the arc.
    }

    // A non-empty range is closed and strictly inside the open arc, so both
    // bounds exist.
    let (first, last) = (lo?, hi?);
    if before(&last, &first) {
        return None;
    }
    Some(DirectionRange { first, last })
}
